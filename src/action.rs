use crate::keycode::{KeyCode, ModifierCombination};

/// A single basic action that the keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// A normal key stroke, for all keycodes defined in the `KeyCode` enum,
    /// including consumer control keys.
    Key(KeyCode),
    /// Modifier combination, the hold side of home-row mod keys.
    Modifier(ModifierCombination),
    /// Key stroke with a modifier combination applied for its duration.
    KeyWithModifier(KeyCode, ModifierCombination),
    /// Activate a layer
    LayerOn(u8),
    /// Toggle a layer
    LayerToggle(u8),
}

/// A KeyAction is the action at a keyboard position, stored in the keymap.
/// It can be a single action, or a composite one like tap/hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action
    No,
    /// Transparent action, the next lower layer will be checked
    Transparent,
    /// A single action triggered when pressed and cancelled when released
    Single(Action),
    /// Keep the action active until the next key press, then apply it to that
    /// key's report
    OneShot(Action),
    /// Dual-role key: (tap_action, hold_action). Resolved by the tap-hold
    /// resolver, exactly one of the two fires per press/release cycle.
    TapHold(Action, Action),
}
