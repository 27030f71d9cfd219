//! Caps word: temporary shift that lasts for one "word".
//!
//! While active, alphabetic key presses are sent shifted via the weak modifier
//! source; keys commonly typed inside identifiers (digits, underscore via
//! shifted minus, backspace, delete) keep the mode alive without being
//! shifted themselves. Any other non-modifier key ends the mode.

use crate::hid_state::HidModifiers;
use crate::keycode::KeyCode;

/// Keys that keep caps word active without being shifted.
pub fn continues_word_mode(key: KeyCode) -> bool {
    key.is_digit()
        || matches!(
            key,
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Minus
        )
}

#[derive(Debug, Default)]
pub struct CapsWord {
    active: bool,
}

impl CapsWord {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
        info!("Caps word {}", if self.active { "enabled" } else { "disabled" });
    }

    /// Observe a key press and decide whether to shift it. Returns the weak
    /// modifiers to apply for this press (shift for alphas, nothing
    /// otherwise). Modifier presses are transparent so shortcuts chorded over
    /// an active caps word neither shift nor end it.
    pub fn process_press(&mut self, key: KeyCode) -> HidModifiers {
        if !self.active {
            return HidModifiers::new();
        }
        if key.is_letter() {
            return HidModifiers::new().with_left_shift(true);
        }
        if key.is_modifier() || key == KeyCode::CapsWordToggle || continues_word_mode(key) {
            return HidModifiers::new();
        }
        self.active = false;
        info!("Caps word disabled by {:?}", key);
        HidModifiers::new()
    }
}
