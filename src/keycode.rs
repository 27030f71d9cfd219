use bitfield_struct::bitfield;
use num_enum::FromPrimitive;

use crate::hid_state::HidModifiers;

/// To represent all combinations of modifiers, at least 5 bits are needed:
/// 1 bit for Left/Right, 4 bits for modifier type. Represented in LSB format.
///
/// | bit0 | bit1 | bit2 | bit3 | bit4 |
/// | --- | --- | --- | --- | --- |
/// | CTRL | SHIFT | ALT | GUI | L/R |
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModifierCombination {
    #[bits(1)]
    pub ctrl: bool,
    #[bits(1)]
    pub shift: bool,
    #[bits(1)]
    pub alt: bool,
    #[bits(1)]
    pub gui: bool,
    #[bits(1)]
    pub right: bool,
    #[bits(3)]
    __: u8,
}

impl ModifierCombination {
    pub const LCTRL: Self = Self::new().with_ctrl(true);
    pub const LSHIFT: Self = Self::new().with_shift(true);
    pub const LALT: Self = Self::new().with_alt(true);
    pub const LGUI: Self = Self::new().with_gui(true);
    pub const RALT: Self = Self::new().with_alt(true).with_right(true);

    /// Get the modifier hid report bits from the modifier combination.
    pub(crate) fn to_hid_modifiers(self) -> HidModifiers {
        if self.right() {
            HidModifiers::new()
                .with_right_ctrl(self.ctrl())
                .with_right_shift(self.shift())
                .with_right_alt(self.alt())
                .with_right_gui(self.gui())
        } else {
            HidModifiers::new()
                .with_left_ctrl(self.ctrl())
                .with_left_shift(self.shift())
                .with_left_alt(self.alt())
                .with_left_gui(self.gui())
        }
    }
}

/// KeyCode is the internal representation of all keycodes, keyboard operations, etc.
/// Use flat representation of keycodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum KeyCode {
    /// Reserved, no-key.
    #[num_enum(default)]
    No = 0x0000,
    /// Keyboard roll over error, too many keys are pressed simultaneously, not a physical key.
    ErrorRollover = 0x0001,
    /// Keyboard post fail error, not a physical key.
    PostFail = 0x0002,
    /// An undefined error, not a physical key.
    ErrorUndefined = 0x0003,
    A = 0x0004,
    B = 0x0005,
    C = 0x0006,
    D = 0x0007,
    E = 0x0008,
    F = 0x0009,
    G = 0x000A,
    H = 0x000B,
    I = 0x000C,
    J = 0x000D,
    K = 0x000E,
    L = 0x000F,
    M = 0x0010,
    N = 0x0011,
    O = 0x0012,
    P = 0x0013,
    Q = 0x0014,
    R = 0x0015,
    S = 0x0016,
    T = 0x0017,
    U = 0x0018,
    V = 0x0019,
    W = 0x001A,
    X = 0x001B,
    Y = 0x001C,
    Z = 0x001D,
    Kc1 = 0x001E,
    Kc2 = 0x001F,
    Kc3 = 0x0020,
    Kc4 = 0x0021,
    Kc5 = 0x0022,
    Kc6 = 0x0023,
    Kc7 = 0x0024,
    Kc8 = 0x0025,
    Kc9 = 0x0026,
    Kc0 = 0x0027,
    Enter = 0x0028,
    Escape = 0x0029,
    Backspace = 0x002A,
    Tab = 0x002B,
    Space = 0x002C,
    Minus = 0x002D,
    Equal = 0x002E,
    LeftBracket = 0x002F,
    RightBracket = 0x0030,
    Backslash = 0x0031,
    NonusHash = 0x0032,
    Semicolon = 0x0033,
    Quote = 0x0034,
    Grave = 0x0035,
    Comma = 0x0036,
    Dot = 0x0037,
    Slash = 0x0038,
    CapsLock = 0x0039,
    F1 = 0x003A,
    F2 = 0x003B,
    F3 = 0x003C,
    F4 = 0x003D,
    F5 = 0x003E,
    F6 = 0x003F,
    F7 = 0x0040,
    F8 = 0x0041,
    F9 = 0x0042,
    F10 = 0x0043,
    F11 = 0x0044,
    F12 = 0x0045,
    PrintScreen = 0x0046,
    ScrollLock = 0x0047,
    Pause = 0x0048,
    Insert = 0x0049,
    Home = 0x004A,
    PageUp = 0x004B,
    Delete = 0x004C,
    End = 0x004D,
    PageDown = 0x004E,
    Right = 0x004F,
    Left = 0x0050,
    Down = 0x0051,
    Up = 0x0052,
    NonusBackslash = 0x0064,
    Application = 0x0065,
    LCtrl = 0x00E0,
    LShift = 0x00E1,
    LAlt = 0x00E2,
    LGui = 0x00E3,
    RCtrl = 0x00E4,
    RShift = 0x00E5,
    RAlt = 0x00E6,
    RGui = 0x00E7,
    // Consumer page keycodes
    AudioMute = 0x00A8,
    AudioVolUp = 0x00A9,
    AudioVolDown = 0x00AA,
    MediaNextTrack = 0x00AB,
    MediaPrevTrack = 0x00AC,
    MediaStop = 0x00AD,
    MediaPlayPause = 0x00AE,
    BrightnessUp = 0x00BD,
    BrightnessDown = 0x00BE,
    // Keymap-level keycodes, use 0x700 ~ 0x7FF
    CapsWordToggle = 0x0700,
}

impl KeyCode {
    /// Returns `true` if the keycode is basic keycode
    pub(crate) fn is_basic(self) -> bool {
        KeyCode::No <= self && self <= KeyCode::RGui && !self.is_consumer()
    }

    /// Returns `true` if the keycode is a modifier keycode
    pub(crate) fn is_modifier(self) -> bool {
        KeyCode::LCtrl <= self && self <= KeyCode::RGui
    }

    /// Returns the byte with the bit corresponding to the USB HID
    /// modifier bitfield set.
    pub(crate) fn as_modifier_bit(self) -> u8 {
        if self.is_modifier() {
            1 << (self as u16 as u8 - KeyCode::LCtrl as u16 as u8)
        } else {
            0
        }
    }

    /// Convert a modifier keycode into its hid report bitfield.
    pub(crate) fn to_hid_modifiers(self) -> HidModifiers {
        HidModifiers::from_bits(self.as_modifier_bit())
    }

    /// Returns `true` if the keycode is a keycode in consumer page
    pub(crate) fn is_consumer(self) -> bool {
        KeyCode::AudioMute <= self && self <= KeyCode::BrightnessDown
    }

    /// Returns `true` if the keycode is an alphabetic key
    pub(crate) fn is_letter(self) -> bool {
        KeyCode::A <= self && self <= KeyCode::Z
    }

    /// Returns `true` if the keycode is a digit key (the number row, not the keypad)
    pub(crate) fn is_digit(self) -> bool {
        KeyCode::Kc1 <= self && self <= KeyCode::Kc0
    }

    /// Convert a keycode to its usage id on the usb hid consumer page
    pub(crate) fn as_consumer_control_usage_id(self) -> u16 {
        match self {
            KeyCode::AudioMute => 0x00E2,
            KeyCode::AudioVolUp => 0x00E9,
            KeyCode::AudioVolDown => 0x00EA,
            KeyCode::MediaNextTrack => 0x00B5,
            KeyCode::MediaPrevTrack => 0x00B6,
            KeyCode::MediaStop => 0x00B7,
            KeyCode::MediaPlayPause => 0x00CD,
            KeyCode::BrightnessUp => 0x006F,
            KeyCode::BrightnessDown => 0x0070,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_modifier_bits() {
        assert_eq!(KeyCode::LCtrl.as_modifier_bit(), 0b0000_0001);
        assert_eq!(KeyCode::LShift.as_modifier_bit(), 0b0000_0010);
        assert_eq!(KeyCode::RGui.as_modifier_bit(), 0b1000_0000);
        assert_eq!(KeyCode::A.as_modifier_bit(), 0);
    }

    #[test]
    fn test_modifier_combination_to_hid() {
        let m = ModifierCombination::LSHIFT.to_hid_modifiers();
        assert!(m.left_shift());
        assert!(!m.right_shift());

        let m = ModifierCombination::RALT.to_hid_modifiers();
        assert!(m.right_alt());
        assert!(!m.left_alt());
    }

    #[test]
    fn test_keycode_from_primitive() {
        assert_eq!(KeyCode::from_primitive(0x0017), KeyCode::T);
        assert_eq!(KeyCode::from_primitive(0x0700), KeyCode::CapsWordToggle);
        // Unknown values fall back to no-key
        assert_eq!(KeyCode::from_primitive(0xFFFF), KeyCode::No);
    }

    #[test]
    fn test_keycode_classes() {
        assert!(KeyCode::A.is_letter());
        assert!(KeyCode::Kc0.is_digit());
        assert!(KeyCode::AudioMute.is_consumer());
        assert!(!KeyCode::AudioMute.is_basic());
        assert!(KeyCode::LShift.is_modifier());
        assert!(KeyCode::Backspace.is_basic());
    }
}
