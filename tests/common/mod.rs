use core::cell::RefCell;

use dilemma_keymap::config::BehaviorConfig;
use dilemma_keymap::event::{EncoderEvent, EncoderInput, Event, KeyEvent};
use dilemma_keymap::hid::{KeyboardReport, MediaKeyboardReport, Report};
use dilemma_keymap::keyboard::Keyboard;
use dilemma_keymap::keymap::KeyMap;
use dilemma_keymap::layout::{COL, NUM_ENCODER, NUM_LAYER, ROW};
use dilemma_keymap::layout;
use embassy_time::Instant;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const KC_LCTRL: u8 = 1 << 0;
pub const KC_LSHIFT: u8 = 1 << 1;
pub const KC_LGUI: u8 = 1 << 3;
pub const KC_RALT: u8 = 1 << 6;

pub type TestKeyboard = Keyboard<'static, ROW, COL, NUM_LAYER, NUM_ENCODER>;

pub fn create_test_keyboard_with_config(config: BehaviorConfig) -> TestKeyboard {
    let layers = Box::leak(Box::new(layout::get_default_keymap()));
    let keymap = Box::leak(Box::new(RefCell::new(KeyMap::new(layers))));
    Keyboard::new(keymap, layout::get_encoder_table(), config)
}

pub fn create_test_keyboard() -> TestKeyboard {
    create_test_keyboard_with_config(BehaviorConfig::default())
}

/// One step of a test sequence, fed to the keyboard at an absolute time.
#[derive(Debug, Clone)]
pub enum Step {
    Key(u8, u8, bool, u64),
    Encoder(u8, EncoderInput, u64),
    /// Bare time advancement, fires due timeouts
    Tick(u64),
}

/// Run a sequence and collect every report the keyboard produced, in order.
pub fn run_sequence<
    const ROW: usize,
    const COL: usize,
    const NUM_LAYER: usize,
    const NUM_ENCODER: usize,
>(
    keyboard: &mut Keyboard<'static, ROW, COL, NUM_LAYER, NUM_ENCODER>,
    sequence: &[Step],
) -> Vec<Report> {
    let mut reports = Vec::new();
    for step in sequence {
        match *step {
            Step::Key(row, col, pressed, at) => {
                keyboard.on_event(Event::Key(KeyEvent { row, col, pressed }), Instant::from_millis(at));
            }
            Step::Encoder(id, input, at) => {
                // Rotation ticks and clicks arrive as a press edge followed by
                // a release edge, like matrix keys
                keyboard.on_event(
                    Event::Encoder(EncoderEvent { id, input, pressed: true }),
                    Instant::from_millis(at),
                );
                keyboard.on_event(
                    Event::Encoder(EncoderEvent { id, input, pressed: false }),
                    Instant::from_millis(at),
                );
            }
            Step::Tick(at) => keyboard.on_tick(Instant::from_millis(at)),
        }
        while let Some(report) = keyboard.pop_report() {
            reports.push(report);
        }
    }
    reports
}

pub fn kb_report(modifier: u8, keys: [u8; 6]) -> Report {
    Report::KeyboardReport(KeyboardReport {
        modifier,
        reserved: 0,
        leds: 0,
        keycodes: keys,
    })
}

pub fn media_report(usage_id: u16) -> Report {
    Report::MediaKeyboardReport(MediaKeyboardReport { usage_id })
}
