//! Static layout data for the BastardKB Dilemma 3x5+3: seven layers of
//! Colemak-DH with Miryoku-style home-row mods and thumb layer-taps, plus the
//! modifier-selected rotary encoder table.
//!
//! The six thumb keys sit on matrix row 3, columns 2..=7. Pointer-device and
//! RGB positions are unmapped.

use crate::action::{Action, KeyAction};
use crate::encoder::{EncoderActionTable, ModifierCategory};
use crate::keycode::{KeyCode, ModifierCombination};
use crate::{a, k, layer, lt, mt, wm};

pub const COL: usize = 10;
pub const ROW: usize = 4;
pub const NUM_LAYER: usize = 7;
pub const NUM_ENCODER: usize = 2;

pub const LAYER_BASE: u8 = 0;
pub const LAYER_FUNCTION: u8 = 1;
pub const LAYER_NAVIGATION: u8 = 2;
pub const LAYER_MEDIA: u8 = 3;
pub const LAYER_POINTER: u8 = 4;
pub const LAYER_NUMERAL: u8 = 5;
pub const LAYER_SYMBOLS: u8 = 6;

const LSFT: ModifierCombination = ModifierCombination::LSHIFT;
const LCTL: ModifierCombination = ModifierCombination::LCTRL;
const LGUI: ModifierCombination = ModifierCombination::LGUI;
const GUI_SFT: ModifierCombination = ModifierCombination::new().with_gui(true).with_shift(true);

#[rustfmt::skip]
pub fn get_default_keymap() -> [[[KeyAction; COL]; ROW]; NUM_LAYER] {
    [
        // Base: Colemak-DH, home-row mods, thumb layer-taps
        layer!([
            [k!(Q), k!(W), k!(F), k!(P), k!(B), k!(J), k!(L), k!(U), k!(Y), k!(Quote)],
            [mt!(A, ModifierCombination::RALT), mt!(R, LGUI), mt!(S, LCTL), mt!(T, LSFT), k!(G), k!(M), mt!(N, LSFT), mt!(E, LCTL), mt!(I, LGUI), mt!(O, ModifierCombination::RALT)],
            [lt!(4, Z), k!(X), k!(C), k!(D), k!(V), k!(K), k!(H), k!(Comma), k!(Dot), lt!(4, Slash)],
            [a!(No), a!(No), k!(Escape), lt!(2, Space), lt!(1, Escape), lt!(3, Tab), lt!(5, Backspace), lt!(6, Enter), a!(No), a!(No)]
        ]),
        // Function: F-keys mirroring the numeral arrangement, system keys inner
        layer!([
            [a!(No), a!(No), a!(No), a!(No), a!(No), k!(PrintScreen), k!(F7), k!(F8), k!(F9), k!(F12)],
            [k!(LAlt), k!(LGui), k!(LCtrl), k!(LShift), k!(Escape), k!(ScrollLock), k!(F4), k!(F5), k!(F6), k!(F11)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), k!(Pause), k!(F1), k!(F2), k!(F3), k!(F10)],
            [a!(No), a!(No), a!(No), a!(Transparent), a!(No), k!(Tab), k!(Backspace), k!(Enter), a!(No), a!(No)]
        ]),
        // Navigation: cursor keys on home, clipboard above, caps word inner
        layer!([
            [a!(No), a!(No), a!(No), a!(No), a!(No), wm!(Y, GUI_SFT), wm!(C, LGUI), wm!(C, LGUI), wm!(X, LGUI), wm!(Z, LGUI)],
            [k!(LGui), k!(LAlt), k!(LCtrl), k!(LShift), k!(Escape), k!(CapsWordToggle), k!(Left), k!(Down), k!(Up), k!(Right)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), k!(Insert), k!(Home), k!(PageDown), k!(PageUp), k!(End)],
            [a!(No), a!(No), a!(No), a!(No), a!(Transparent), k!(Tab), k!(Delete), k!(Enter), a!(No), a!(No)]
        ]),
        // Media: volume and transport, symmetrical on both halves
        layer!([
            [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [k!(MediaPrevTrack), k!(AudioVolDown), k!(AudioMute), k!(AudioVolUp), k!(MediaNextTrack), k!(MediaPrevTrack), k!(AudioVolDown), k!(AudioMute), k!(AudioVolUp), k!(MediaNextTrack)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), k!(Insert), k!(Home), k!(PageDown), k!(PageUp), k!(End)],
            [a!(No), a!(No), a!(Transparent), k!(MediaPlayPause), k!(MediaStop), a!(No), a!(Transparent), a!(Transparent), a!(No), a!(No)]
        ]),
        // Pointer: mouse buttons and pointer functions are host-side concerns
        // here, only the modifier rows survive
        layer!([
            [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [k!(LGui), k!(LAlt), k!(LCtrl), k!(LShift), a!(No), a!(No), k!(LShift), k!(LCtrl), k!(LAlt), k!(LGui)],
            [a!(Transparent), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(Transparent)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)]
        ]),
        // Numeral: numpad arrangement on the left half
        layer!([
            [k!(LeftBracket), k!(Kc7), k!(Kc8), k!(Kc9), k!(RightBracket), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [k!(Semicolon), k!(Kc4), k!(Kc5), k!(Kc6), k!(Equal), a!(No), k!(LShift), k!(LCtrl), k!(LGui), k!(LAlt)],
            [k!(Dot), k!(Kc1), k!(Kc2), k!(Kc3), k!(Backslash), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [a!(No), a!(No), wm!(Kc9, LSFT), k!(Kc0), k!(Minus), a!(No), a!(Transparent), a!(Transparent), a!(No), a!(No)]
        ]),
        // Symbols: shifted numerals in the same positions
        layer!([
            [wm!(LeftBracket, LSFT), wm!(Kc7, LSFT), wm!(Kc8, LSFT), wm!(Kc9, LSFT), wm!(RightBracket, LSFT), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [wm!(Semicolon, LSFT), wm!(Kc6, LSFT), wm!(Kc5, LSFT), wm!(Kc4, LSFT), wm!(Equal, LSFT), a!(No), k!(LShift), k!(LCtrl), k!(LGui), k!(LAlt)],
            [wm!(Grave, LSFT), wm!(Kc1, LSFT), wm!(Kc2, LSFT), wm!(Kc3, LSFT), wm!(Backslash, LSFT), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [a!(No), a!(No), wm!(Kc9, LSFT), wm!(Kc0, LSFT), wm!(Minus, LSFT), a!(No), a!(Transparent), a!(Transparent), a!(No), a!(No)]
        ]),
    ]
}

/// Encoder table: left encoder (id 0) carries the multi-function bindings,
/// right encoder (id 1) is media transport.
pub fn get_encoder_table() -> EncoderActionTable<NUM_ENCODER> {
    EncoderActionTable::new()
        .with_row(
            ModifierCategory::None,
            0,
            Action::Key(KeyCode::AudioVolDown),
            Action::Key(KeyCode::AudioVolUp),
            Action::Key(KeyCode::AudioMute),
        )
        .with_row(
            ModifierCategory::None,
            1,
            Action::Key(KeyCode::MediaPrevTrack),
            Action::Key(KeyCode::MediaNextTrack),
            Action::Key(KeyCode::MediaPlayPause),
        )
        .with_row(
            ModifierCategory::Shift,
            0,
            Action::Key(KeyCode::BrightnessDown),
            Action::Key(KeyCode::BrightnessUp),
            Action::Key(KeyCode::MediaPlayPause),
        )
        .with_row(
            ModifierCategory::Shift,
            1,
            Action::Key(KeyCode::MediaPrevTrack),
            Action::Key(KeyCode::MediaNextTrack),
            Action::Key(KeyCode::MediaStop),
        )
        .with_row(
            ModifierCategory::Ctrl,
            0,
            Action::KeyWithModifier(KeyCode::Minus, LCTL),
            Action::KeyWithModifier(KeyCode::Equal, LCTL),
            Action::KeyWithModifier(KeyCode::Kc0, LCTL),
        )
        .with_row(
            ModifierCategory::Gui,
            0,
            Action::KeyWithModifier(KeyCode::Left, LGUI),
            Action::KeyWithModifier(KeyCode::Right, LGUI),
            crate::encoder::ENC_NO_OP,
        )
        .with_row(
            ModifierCategory::Alt,
            0,
            Action::KeyWithModifier(KeyCode::Tab, ModifierCombination::new().with_ctrl(true).with_shift(true)),
            Action::KeyWithModifier(KeyCode::Tab, LCTL),
            Action::KeyWithModifier(KeyCode::T, LCTL),
        )
}
