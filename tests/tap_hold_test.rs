mod common;

use common::*;
use dilemma_keymap::config::{BehaviorConfig, TapHoldConfig};
use dilemma_keymap::tap_hold::TapHoldMode;

const KC_T: u8 = 0x17;
const KC_A: u8 = 0x04;
const KC_U: u8 = 0x18;
const KC_L: u8 = 0x0F;
const KC_SPACE: u8 = 0x2C;
const KC_LEFT: u8 = 0x50;

#[test]
fn test_index_home_row_tap() {
    // MSFT_T has a 100ms window (50% of the 200ms tapping term); a release at
    // 80ms is a tap
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[Step::Key(1, 3, true, 0), Step::Key(1, 3, false, 80)],
    );
    assert_eq!(
        reports,
        vec![kb_report(0, [KC_T, 0, 0, 0, 0, 0]), kb_report(0, [0; 6])]
    );
}

#[test]
fn test_index_home_row_hold_by_timeout() {
    // Held past 100ms with no release: the tick fires the shift hold
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 3, true, 0),
            Step::Tick(50),
            Step::Tick(120),
            Step::Key(1, 3, false, 200),
        ],
    );
    assert_eq!(reports, vec![kb_report(KC_LSHIFT, [0; 6]), kb_report(0, [0; 6])]);
}

#[test]
fn test_ring_home_row_long_window() {
    // MALT_A gets 400ms (200%); a 300ms press that would be a hold on any
    // other class still taps
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[Step::Key(1, 0, true, 0), Step::Key(1, 0, false, 300)],
    );
    assert_eq!(
        reports,
        vec![kb_report(0, [KC_A, 0, 0, 0, 0, 0]), kb_report(0, [0; 6])]
    );
}

#[test]
fn test_hold_on_other_press() {
    // Rolling onto U while MSFT_T is pending resolves the hold immediately;
    // U is typed with shift applied
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 3, true, 0),
            Step::Key(0, 7, true, 30),
            Step::Key(0, 7, false, 60),
            Step::Key(1, 3, false, 90),
        ],
    );
    assert_eq!(
        reports,
        vec![
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(KC_LSHIFT, [KC_U, 0, 0, 0, 0, 0]),
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(0, [0; 6]),
        ]
    );
}

#[test]
fn test_permissive_hold_waits_for_nested_release() {
    let config = BehaviorConfig {
        tap_hold: TapHoldConfig {
            mode: TapHoldMode::PermissiveHold,
            ..TapHoldConfig::default()
        },
        ..BehaviorConfig::default()
    };
    let mut keyboard = create_test_keyboard_with_config(config);
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 3, true, 0),
            // U press alone is buffered, produces nothing yet
            Step::Key(0, 7, true, 20),
            // Its release completes a nested press-release: hold, then replay
            Step::Key(0, 7, false, 50),
            Step::Key(1, 3, false, 90),
        ],
    );
    assert_eq!(
        reports,
        vec![
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(KC_LSHIFT, [KC_U, 0, 0, 0, 0, 0]),
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(0, [0; 6]),
        ]
    );
}

#[test]
fn test_thumb_layer_tap_types_space() {
    // NAV_SPC released inside its 340ms window taps space
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[Step::Key(3, 3, true, 0), Step::Key(3, 3, false, 250)],
    );
    assert_eq!(
        reports,
        vec![kb_report(0, [KC_SPACE, 0, 0, 0, 0, 0]), kb_report(0, [0; 6])]
    );
}

#[test]
fn test_thumb_layer_hold_activates_navigation() {
    // Holding NAV_SPC past 340ms activates the navigation layer, where the
    // home position under the right index is the left arrow; releasing the
    // thumb drops back to base, where the same column types L on the top row
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(3, 3, true, 0),
            Step::Key(1, 6, true, 400),
            Step::Key(1, 6, false, 450),
            Step::Key(3, 3, false, 500),
            Step::Key(0, 6, true, 600),
            Step::Key(0, 6, false, 650),
        ],
    );
    assert_eq!(
        reports,
        vec![
            kb_report(0, [KC_LEFT, 0, 0, 0, 0, 0]),
            kb_report(0, [0; 6]),
            kb_report(0, [KC_L, 0, 0, 0, 0, 0]),
            kb_report(0, [0; 6]),
        ]
    );
}

#[test]
fn test_chorded_home_row_mods() {
    // Shift and ctrl held together from two dual-role keys, then a plain key
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 3, true, 0),
            Step::Tick(120),
            // MCTL_S opens its own decision while shift is down (150% window)
            Step::Key(1, 2, true, 150),
            Step::Tick(460),
            Step::Key(0, 7, true, 470),
            Step::Key(0, 7, false, 500),
            Step::Key(1, 2, false, 550),
            Step::Key(1, 3, false, 600),
        ],
    );
    assert_eq!(
        reports,
        vec![
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(KC_LSHIFT | KC_LCTRL, [0; 6]),
            kb_report(KC_LSHIFT | KC_LCTRL, [KC_U, 0, 0, 0, 0, 0]),
            kb_report(KC_LSHIFT | KC_LCTRL, [0; 6]),
            kb_report(KC_LSHIFT, [0; 6]),
            kb_report(0, [0; 6]),
        ]
    );
}

#[test]
fn test_repeated_taps_resolve_independently() {
    let mut keyboard = create_test_keyboard();
    let reports = run_sequence(
        &mut keyboard,
        &[
            Step::Key(1, 3, true, 0),
            Step::Key(1, 3, false, 40),
            Step::Key(1, 3, true, 300),
            Step::Key(1, 3, false, 340),
        ],
    );
    assert_eq!(
        reports,
        vec![
            kb_report(0, [KC_T, 0, 0, 0, 0, 0]),
            kb_report(0, [0; 6]),
            kb_report(0, [KC_T, 0, 0, 0, 0, 0]),
            kb_report(0, [0; 6]),
        ]
    );
}
