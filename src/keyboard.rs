//! The keyboard front-end: consumes timestamped events from the runtime,
//! runs them through the tap-hold resolver and the encoder dispatcher, and
//! turns the resolved actions into HID reports.
//!
//! Events must be delivered in order with non-decreasing timestamps. The
//! runtime drains the report queue with [`Keyboard::pop_report`] after each
//! call, and calls [`Keyboard::on_tick`] periodically so pending tap-hold
//! decisions and one-shot timeouts fire without requiring further input.

use core::cell::RefCell;

use embassy_time::{Duration, Instant};
use heapless::Deque;

use crate::action::{Action, KeyAction};
use crate::caps_word::CapsWord;
use crate::config::BehaviorConfig;
use crate::encoder::{self, EncoderActionTable};
use crate::event::{EncoderEvent, Event, KeyEvent};
use crate::hid::{KeyboardReport, MediaKeyboardReport, Report};
use crate::hid_state::{HidModifiers, ModifierState};
use crate::keycode::{KeyCode, ModifierCombination};
use crate::keymap::KeyMap;
use crate::tap_hold::{TapHoldEvent, TapHoldResolver, TimeoutKind};

const REPORT_QUEUE_SIZE: usize = 32;

/// State machine for one-shot modifiers.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OneShotState<T> {
    /// One-shot key is pressed and not yet released
    Initial(T),
    /// One-shot key was released before any other key, armed for the next keystroke
    Single(T),
    /// Another key was pressed while the one-shot key was down; acts as a
    /// regular held modifier until the one-shot key is released
    Held(T),
    /// Inactive
    #[default]
    None,
}

impl<T: Copy> OneShotState<T> {
    fn value(&self) -> Option<T> {
        match self {
            OneShotState::Initial(value) | OneShotState::Single(value) | OneShotState::Held(value) => Some(*value),
            OneShotState::None => None,
        }
    }
}

pub struct Keyboard<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize, const NUM_ENCODER: usize> {
    keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>,
    behavior: BehaviorConfig,
    tap_hold: TapHoldResolver,
    encoder_table: EncoderActionTable<NUM_ENCODER>,
    caps_word: CapsWord,
    /// Held, one-shot and weak modifiers; `one_shot` mirrors `osm_state`
    modifiers: ModifierState,
    osm_state: OneShotState<HidModifiers>,
    osm_deadline: Option<Instant>,
    /// Keycodes currently registered in the 6KRO report
    held_keycodes: [KeyCode; 6],
    /// Matrix position each report slot was registered from
    registered_keys: [Option<(u8, u8)>; 6],
    reports: Deque<Report, REPORT_QUEUE_SIZE>,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize, const NUM_ENCODER: usize>
    Keyboard<'a, ROW, COL, NUM_LAYER, NUM_ENCODER>
{
    pub fn new(
        keymap: &'a RefCell<KeyMap<'a, ROW, COL, NUM_LAYER>>,
        encoder_table: EncoderActionTable<NUM_ENCODER>,
        behavior: BehaviorConfig,
    ) -> Self {
        Keyboard {
            keymap,
            behavior,
            tap_hold: TapHoldResolver::new(behavior.tap_hold),
            encoder_table,
            caps_word: CapsWord::default(),
            modifiers: ModifierState::default(),
            osm_state: OneShotState::None,
            osm_deadline: None,
            held_keycodes: [KeyCode::No; 6],
            registered_keys: [None; 6],
            reports: Deque::new(),
        }
    }

    /// Process one event. Returns whether the event was handled; encoder
    /// release edges are the only unhandled case.
    pub fn on_event(&mut self, event: Event, now: Instant) -> bool {
        self.expire_one_shot(now);
        match event {
            Event::Key(key_event) => {
                self.process_key_event(key_event, now);
                true
            }
            Event::Encoder(encoder_event) => self.process_encoder_event(encoder_event),
        }
    }

    /// Advance time without an event. Fires pending tap-hold decisions whose
    /// window has elapsed and expires armed one-shot modifiers.
    pub fn on_tick(&mut self, now: Instant) {
        let resolved = self.tap_hold.tick(now);
        for tap_hold_event in resolved {
            self.execute(tap_hold_event, now);
        }
        self.expire_one_shot(now);
    }

    /// Take the next outbound report, oldest first.
    pub fn pop_report(&mut self) -> Option<Report> {
        self.reports.pop_front()
    }

    /// The effective tap-hold timeout for the key currently mapped at a
    /// position. The runtime uses this to schedule its next tick.
    pub fn resolve_timeout(&self, row: u8, col: u8, kind: TimeoutKind) -> Duration {
        let action = self.keymap.borrow().get_action(row as usize, col as usize);
        self.tap_hold.resolve_timeout_for(action, kind)
    }

    fn process_key_event(&mut self, event: KeyEvent, now: Instant) {
        // Fire any elapsed tap-hold timeout first, so the keymap lookup below
        // already sees layers the hold may have activated
        let due = self.tap_hold.tick(now);
        for tap_hold_event in due {
            self.execute(tap_hold_event, now);
        }
        // Presses are resolved against the keymap up front so the resolver
        // can recognize dual-role keys; releases resolve at execution time so
        // the layer cache is popped exactly once.
        let action = if event.pressed {
            self.keymap.borrow_mut().get_action_with_layer_cache(event)
        } else {
            KeyAction::No
        };
        let resolved = self.tap_hold.feed(event, action, now);
        for tap_hold_event in resolved {
            self.execute(tap_hold_event, now);
        }
    }

    fn execute(&mut self, resolved: TapHoldEvent, now: Instant) {
        match resolved {
            TapHoldEvent::Key(event) => {
                let action = self.keymap.borrow_mut().get_action_with_layer_cache(event);
                self.process_key_action(action, event, now);
            }
            TapHoldEvent::Act(action, event) => self.process_action(action, event, now),
            TapHoldEvent::TapAct(action, event) => {
                // Synthetic press immediately followed by release
                self.process_action(action, KeyEvent { pressed: true, ..event }, now);
                self.process_action(action, KeyEvent { pressed: false, ..event }, now);
            }
        }
    }

    fn process_key_action(&mut self, action: KeyAction, event: KeyEvent, now: Instant) {
        match action {
            KeyAction::No | KeyAction::Transparent => (),
            KeyAction::Single(single) => self.process_action(single, event, now),
            KeyAction::OneShot(one_shot) => self.process_one_shot(one_shot, event, now),
            // A dual-role key replayed from the sibling buffer re-enters the
            // resolver: the decision slot freed when the earlier key resolved,
            // so it opens its own tap-hold cycle
            KeyAction::TapHold(..) => {
                for tap_hold_event in self.tap_hold.feed(event, action, now) {
                    if tap_hold_event == TapHoldEvent::Key(event) {
                        // Echoed back unchanged: no cycle is open for this
                        // key and there is nothing left to execute
                        continue;
                    }
                    self.execute(tap_hold_event, now);
                }
            }
        }
    }

    fn process_action(&mut self, action: Action, event: KeyEvent, _now: Instant) {
        match action {
            Action::Key(key) => self.process_keycode(key, event),
            Action::KeyWithModifier(key, modifiers) => {
                let hid_modifiers = modifiers.to_hid_modifiers();
                if event.pressed {
                    self.modifiers.weak |= hid_modifiers;
                } else {
                    self.modifiers.weak &= !hid_modifiers;
                }
                self.process_keycode(key, event);
            }
            Action::Modifier(modifiers) => {
                let hid_modifiers = modifiers.to_hid_modifiers();
                if event.pressed {
                    self.modifiers.held |= hid_modifiers;
                } else {
                    self.modifiers.held &= !hid_modifiers;
                }
                self.send_keyboard_report();
            }
            Action::LayerOn(layer) => {
                let mut keymap = self.keymap.borrow_mut();
                if event.pressed {
                    keymap.activate_layer(layer);
                } else {
                    keymap.deactivate_layer(layer);
                }
            }
            Action::LayerToggle(layer) => {
                if event.pressed {
                    self.keymap.borrow_mut().toggle_layer(layer);
                }
            }
        }
    }

    fn process_keycode(&mut self, key: KeyCode, event: KeyEvent) {
        if key == KeyCode::CapsWordToggle {
            if event.pressed {
                self.caps_word.toggle();
            }
            return;
        }
        if key.is_modifier() {
            let hid_modifiers = key.to_hid_modifiers();
            if event.pressed {
                self.modifiers.held |= hid_modifiers;
            } else {
                self.modifiers.held &= !hid_modifiers;
            }
            self.send_keyboard_report();
        } else if key.is_consumer() {
            let usage_id = if event.pressed {
                key.as_consumer_control_usage_id()
            } else {
                0
            };
            self.push_report(Report::MediaKeyboardReport(MediaKeyboardReport { usage_id }));
        } else if key.is_basic() {
            if event.pressed {
                self.process_basic_press(key, event);
            } else if self.unregister_key(key, event) {
                self.send_keyboard_report();
            }
        } else {
            warn!("Unsupported keycode: {:?}", key);
        }
    }

    fn process_basic_press(&mut self, key: KeyCode, event: KeyEvent) {
        let caps_word_shift = self.caps_word.process_press(key);
        self.modifiers.weak |= caps_word_shift;

        // An armed one-shot is spent on this report; one pressed together
        // with this key degrades to a plain held modifier
        let spend_one_shot = matches!(self.osm_state, OneShotState::Single(_));
        if let OneShotState::Initial(value) = self.osm_state {
            self.update_one_shot(OneShotState::Held(value));
        }

        if self.register_key(key, event) {
            self.send_keyboard_report();
        }

        self.modifiers.weak &= !caps_word_shift;
        if spend_one_shot {
            self.update_one_shot(OneShotState::None);
        }
    }

    fn process_one_shot(&mut self, action: Action, event: KeyEvent, now: Instant) {
        let Action::Modifier(modifiers) = action else {
            // Only one-shot modifiers are supported
            self.process_action(action, event, now);
            return;
        };
        let hid_modifiers = modifiers.to_hid_modifiers();
        if event.pressed {
            self.osm_deadline = None;
            let combined = match self.osm_state.value() {
                Some(armed) => armed | hid_modifiers,
                None => hid_modifiers,
            };
            self.update_one_shot(OneShotState::Initial(combined));
            self.send_keyboard_report();
        } else {
            match self.osm_state {
                OneShotState::Initial(value) => {
                    self.update_one_shot(OneShotState::Single(value));
                    self.osm_deadline = Some(now + self.behavior.one_shot.timeout);
                }
                OneShotState::Held(_) => {
                    self.update_one_shot(OneShotState::None);
                    self.send_keyboard_report();
                }
                _ => (),
            }
        }
    }

    /// One-shot timeouts are checked lazily against event timestamps instead
    /// of an async timer.
    fn expire_one_shot(&mut self, now: Instant) {
        if let OneShotState::Single(_) = self.osm_state
            && let Some(deadline) = self.osm_deadline
            && now >= deadline
        {
            debug!("One-shot modifier timed out");
            self.update_one_shot(OneShotState::None);
            self.osm_deadline = None;
            self.send_keyboard_report();
        }
    }

    fn update_one_shot(&mut self, state: OneShotState<HidModifiers>) {
        self.osm_state = state;
        self.modifiers.one_shot = state.value().unwrap_or_default();
    }

    fn process_encoder_event(&mut self, event: EncoderEvent) -> bool {
        if !event.pressed {
            return false;
        }
        let reports = &mut self.reports;
        let emitted = encoder::dispatch(&self.encoder_table, event, &mut self.modifiers, |action| {
            Self::emit_isolated_tap(reports, action);
        });
        // Keyboard-page emissions clobbered the host's modifier byte while
        // the user's modifiers were suspended; republish the restored state
        if emitted.is_some_and(|action| {
            matches!(action, Action::KeyWithModifier(..))
                || matches!(action, Action::Key(key) if !key.is_consumer())
        }) {
            self.send_keyboard_report();
        }
        true
    }

    /// Push a press/release report pair for an encoder action, containing
    /// nothing but the action itself. Runs with the modifier state suspended.
    fn emit_isolated_tap(reports: &mut Deque<Report, REPORT_QUEUE_SIZE>, action: Action) {
        match action {
            Action::Key(key) if key.is_consumer() => {
                let usage_id = key.as_consumer_control_usage_id();
                Self::push_report_to(reports, Report::MediaKeyboardReport(MediaKeyboardReport { usage_id }));
                Self::push_report_to(reports, Report::MediaKeyboardReport(MediaKeyboardReport { usage_id: 0 }));
            }
            Action::Key(key) => {
                Self::push_isolated_pair(reports, key, ModifierCombination::new());
            }
            Action::KeyWithModifier(key, modifiers) => {
                Self::push_isolated_pair(reports, key, modifiers);
            }
            _ => warn!("Unsupported encoder action: {:?}", action),
        }
    }

    fn push_isolated_pair(reports: &mut Deque<Report, REPORT_QUEUE_SIZE>, key: KeyCode, modifiers: ModifierCombination) {
        let mut keycodes = [0; 6];
        keycodes[0] = key as u16 as u8;
        Self::push_report_to(
            reports,
            Report::KeyboardReport(KeyboardReport {
                modifier: modifiers.to_hid_modifiers().into_bits(),
                keycodes,
                ..KeyboardReport::default()
            }),
        );
        Self::push_report_to(reports, Report::KeyboardReport(KeyboardReport::default()));
    }

    fn register_key(&mut self, key: KeyCode, event: KeyEvent) -> bool {
        let position = Some((event.row, event.col));
        if let Some(slot) = self.registered_keys.iter().position(|&p| p == position) {
            self.held_keycodes[slot] = key;
            return true;
        }
        if let Some(slot) = self.held_keycodes.iter().position(|&k| k == KeyCode::No) {
            self.held_keycodes[slot] = key;
            self.registered_keys[slot] = position;
            true
        } else {
            warn!("All 6 keyboard report slots occupied, dropping {:?}", key);
            false
        }
    }

    fn unregister_key(&mut self, key: KeyCode, event: KeyEvent) -> bool {
        let position = Some((event.row, event.col));
        let slot = self
            .registered_keys
            .iter()
            .position(|&p| p == position)
            .or_else(|| self.held_keycodes.iter().position(|&k| k == key && k != KeyCode::No));
        match slot {
            Some(slot) => {
                self.held_keycodes[slot] = KeyCode::No;
                self.registered_keys[slot] = None;
                true
            }
            None => false,
        }
    }

    fn send_keyboard_report(&mut self) {
        let mut keycodes = [0; 6];
        for (dst, key) in keycodes.iter_mut().zip(self.held_keycodes.iter()) {
            *dst = *key as u16 as u8;
        }
        let report = KeyboardReport {
            modifier: self.modifiers.combined().into_bits(),
            reserved: 0,
            leds: 0,
            keycodes,
        };
        self.push_report(Report::KeyboardReport(report));
    }

    fn push_report(&mut self, report: Report) {
        Self::push_report_to(&mut self.reports, report);
    }

    fn push_report_to(reports: &mut Deque<Report, REPORT_QUEUE_SIZE>, report: Report) {
        if reports.push_back(report).is_err() {
            error!("Report queue full, dropping report");
        }
    }
}
