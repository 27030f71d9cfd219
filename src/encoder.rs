//! Modifier-selected rotary encoder dispatch.
//!
//! Each encoder input (rotation in either direction, or a click of the
//! integrated switch) maps to one of several functions depending on which
//! modifier is physically held when the input arrives. The held modifiers are
//! suspended for the duration of the emitted action so that, for example,
//! Alt + clockwise can send a bare Ctrl+Tab without Alt leaking into it; the
//! suspension guard restores them afterwards.

use crate::action::Action;
use crate::event::{EncoderEvent, EncoderInput};
use crate::hid_state::{HidModifiers, ModifierState};
use crate::keycode::KeyCode;

/// Modifier category selecting an encoder function row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModifierCategory {
    Shift,
    Ctrl,
    Gui,
    Alt,
    None,
}

impl ModifierCategory {
    pub const COUNT: usize = 5;

    /// Categorize the current modifier state. Checked in a fixed precedence
    /// order so chords select deterministically: Shift wins over Ctrl, Ctrl
    /// over Gui, Gui over Alt. Left and right variants are equivalent.
    pub fn select(modifiers: HidModifiers) -> Self {
        if modifiers.has_shift() {
            ModifierCategory::Shift
        } else if modifiers.has_ctrl() {
            ModifierCategory::Ctrl
        } else if modifiers.has_gui() {
            ModifierCategory::Gui
        } else if modifiers.has_alt() {
            ModifierCategory::Alt
        } else {
            ModifierCategory::None
        }
    }

    const fn index(self) -> usize {
        match self {
            ModifierCategory::Shift => 0,
            ModifierCategory::Ctrl => 1,
            ModifierCategory::Gui => 2,
            ModifierCategory::Alt => 3,
            ModifierCategory::None => 4,
        }
    }
}

/// The unmapped cell marker. Inputs hitting it are consumed without output.
pub const ENC_NO_OP: Action = Action::Key(KeyCode::No);

/// Per-category action table for all encoders. Rows are modifier categories,
/// columns are encoder ids, inner cells are indexed by [`EncoderInput`].
pub struct EncoderActionTable<const NUM_ENCODER: usize> {
    table: [[[Action; 3]; NUM_ENCODER]; ModifierCategory::COUNT],
}

impl<const NUM_ENCODER: usize> EncoderActionTable<NUM_ENCODER> {
    pub const fn new() -> Self {
        Self {
            table: [[[ENC_NO_OP; 3]; NUM_ENCODER]; ModifierCategory::COUNT],
        }
    }

    /// Fill one encoder's row for a category: (counter-clockwise, clockwise, click).
    pub const fn with_row(
        mut self,
        category: ModifierCategory,
        encoder: usize,
        ccw: Action,
        cw: Action,
        click: Action,
    ) -> Self {
        self.table[category.index()][encoder] = [ccw, cw, click];
        self
    }

    pub fn get(&self, category: ModifierCategory, encoder: usize, input: EncoderInput) -> Option<Action> {
        let cell = *self.table.get(category.index())?.get(encoder)?.get(input as usize)?;
        if cell == ENC_NO_OP { None } else { Some(cell) }
    }
}

impl<const NUM_ENCODER: usize> Default for EncoderActionTable<NUM_ENCODER> {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatch one encoder event against the table.
///
/// Only press edges produce output, release edges of the click switch are
/// consumed silently. Returns the emitted action, or `None` when the event was
/// consumed without one. The `emit` callback runs while `modifiers` is
/// suspended; it must send the action as an isolated tap. Held and one-shot
/// modifiers are restored before this returns.
pub fn dispatch<const NUM_ENCODER: usize, F>(
    table: &EncoderActionTable<NUM_ENCODER>,
    event: EncoderEvent,
    modifiers: &mut ModifierState,
    emit: F,
) -> Option<Action>
where
    F: FnOnce(Action),
{
    if !event.pressed {
        return None;
    }
    let category = ModifierCategory::select(modifiers.combined());
    let Some(action) = table.get(category, event.id as usize, event.input) else {
        debug!("encoder {} {:?}: no action for {:?}", event.id, event.input, category);
        return None;
    };
    debug!("encoder {} {:?} under {:?}: {:?}", event.id, event.input, category, action);
    let _restore = modifiers.suspend();
    emit(action);
    Some(action)
}
