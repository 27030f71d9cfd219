use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bitfield_struct::bitfield;

/// The modifier byte of the usb hid keyboard report, one bit per modifier key.
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidModifiers {
    #[bits(1)]
    pub left_ctrl: bool,
    #[bits(1)]
    pub left_shift: bool,
    #[bits(1)]
    pub left_alt: bool,
    #[bits(1)]
    pub left_gui: bool,
    #[bits(1)]
    pub right_ctrl: bool,
    #[bits(1)]
    pub right_shift: bool,
    #[bits(1)]
    pub right_alt: bool,
    #[bits(1)]
    pub right_gui: bool,
}

impl BitOr for HidModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}
impl BitAnd for HidModifiers {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}
impl Not for HidModifiers {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(!self.into_bits())
    }
}
impl BitAndAssign for HidModifiers {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
impl BitOrAssign for HidModifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl HidModifiers {
    pub fn is_empty(&self) -> bool {
        self.into_bits() == 0
    }

    pub fn has_shift(&self) -> bool {
        self.left_shift() || self.right_shift()
    }

    pub fn has_ctrl(&self) -> bool {
        self.left_ctrl() || self.right_ctrl()
    }

    pub fn has_gui(&self) -> bool {
        self.left_gui() || self.right_gui()
    }

    pub fn has_alt(&self) -> bool {
        self.left_alt() || self.right_alt()
    }
}

/// The keyboard's modifier register, split into its three sources:
///
/// - `held`: modifiers from physically held modifier keys (including resolved
///   hold actions of dual-role keys)
/// - `one_shot`: armed one-shot modifiers waiting for the next keystroke
/// - `weak`: software-applied modifiers (e.g. caps word's forced shift), valid
///   for a single report
///
/// The rest of the system observes the union of the three. The state is passed
/// explicitly to whoever mutates it; there is no global register.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModifierState {
    pub held: HidModifiers,
    pub one_shot: HidModifiers,
    pub weak: HidModifiers,
}

impl ModifierState {
    /// The union of all three modifier sources.
    pub fn combined(&self) -> HidModifiers {
        self.held | self.one_shot | self.weak
    }

    /// Snapshot all three sources and clear them, returning a guard that
    /// restores the snapshot when dropped. While the guard is live the state
    /// reads as empty, so anything emitted in between is free of the user's
    /// modifiers. Restoration happens on every exit path, including when
    /// nothing was emitted at all.
    pub fn suspend(&mut self) -> SuspendedModifiers<'_> {
        let saved = *self;
        self.held = HidModifiers::new();
        self.one_shot = HidModifiers::new();
        self.weak = HidModifiers::new();
        SuspendedModifiers { state: self, saved }
    }
}

/// Guard holding a [`ModifierState`] snapshot; puts it back on drop.
pub struct SuspendedModifiers<'a> {
    state: &'a mut ModifierState,
    saved: ModifierState,
}

impl Drop for SuspendedModifiers<'_> {
    fn drop(&mut self) {
        *self.state = self.saved;
    }
}
