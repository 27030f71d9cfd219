mod common;

use common::*;
use dilemma_keymap::event::EncoderInput;

const KC_TAB: u8 = 0x2B;
const USAGE_MUTE: u16 = 0x00E2;
const USAGE_VOL_UP: u16 = 0x00E9;
const USAGE_BRIGHTNESS_UP: u16 = 0x006F;

#[test]
fn test_click_with_no_modifiers_mutes() {
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(&mut keyboard, &[Step::Encoder(0, EncoderInput::Click, 10)]);
    assert_eq!(reports, vec![media_report(USAGE_MUTE), media_report(0)]);
}

#[test]
fn test_rotation_with_no_modifiers_is_volume() {
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(&mut keyboard, &[Step::Encoder(0, EncoderInput::Clockwise, 10)]);
    assert_eq!(reports, vec![media_report(USAGE_VOL_UP), media_report(0)]);
}

#[test]
fn test_alt_clockwise_cycles_browser_tabs() {
    // Hold MALT_A past its 400ms window so right alt is down, then rotate:
    // the emission is a bare Ctrl+Tab, and alt is back in place afterwards
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 0, true, 0),
            Step::Tick(450),
            Step::Encoder(0, EncoderInput::Clockwise, 500),
            Step::Key(1, 0, false, 600),
        ],
    );
    assert_eq!(
        reports,
        vec![
            kb_report(KC_RALT, [0; 6]),
            kb_report(KC_LCTRL, [KC_TAB, 0, 0, 0, 0, 0]),
            kb_report(0, [0; 6]),
            kb_report(KC_RALT, [0; 6]),
            kb_report(0, [0; 6]),
        ]
    );
}

#[test]
fn test_shift_wins_over_ctrl() {
    // Both shift and ctrl held from home-row mods: the shift row is selected
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 3, true, 0),
            Step::Tick(120),
            Step::Key(1, 2, true, 150),
            Step::Tick(460),
            Step::Encoder(0, EncoderInput::Clockwise, 470),
            Step::Key(1, 2, false, 500),
            Step::Key(1, 3, false, 550),
        ],
    );
    assert_eq!(
        reports,
        vec![
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(KC_LSHIFT | KC_LCTRL, [0; 6]),
            // Consumer-page emission, no keyboard report needed around it
            media_report(USAGE_BRIGHTNESS_UP),
            media_report(0),
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(0, [0; 6]),
        ]
    );
}

#[test]
fn test_unmapped_cell_is_a_silent_no_op() {
    // Gui + click has no binding; the event is consumed, nothing is emitted,
    // and gui remains held afterwards
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 1, true, 0),
            Step::Tick(450),
            Step::Encoder(0, EncoderInput::Click, 500),
            Step::Key(1, 1, false, 600),
        ],
    );
    assert_eq!(reports, vec![kb_report(KC_LGUI, [0; 6]), kb_report(0, [0; 6])]);
}

#[test]
fn test_second_encoder_is_media_transport() {
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(&mut keyboard, &[Step::Encoder(1, EncoderInput::Click, 10)]);
    // MediaPlayPause
    assert_eq!(reports, vec![media_report(0x00CD), media_report(0)]);
}
