//! Tap-hold resolution for dual-role keys.
//!
//! Every `KeyAction::TapHold` press opens a pending decision: the key either
//! taps its primary action or fires its hold action, depending on elapsed time
//! and on the other key events interleaved while the decision is open. The
//! resolver consumes raw key events and emits resolved [`TapHoldEvent`]s for
//! the keyboard to execute; events it does not care about pass through
//! untouched and in order.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::action::{Action, KeyAction};
use crate::config::TapHoldConfig;
use crate::event::KeyEvent;
use crate::keycode::KeyCode;

/// Decision mode for pending tap-hold keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldMode {
    /// The decision is made only by the key's own release or the timeout.
    /// Sibling events are buffered and replayed after the decision.
    Normal,
    /// Same as QMK's permissive hold: <https://docs.qmk.fm/tap_hold#tap-or-hold-decision-modes>
    /// When another key is pressed and released while the decision is open,
    /// the hold action is triggered.
    PermissiveHold,
    /// Trigger hold immediately when any other key is pressed while the
    /// decision is open. Rolling onto another key is evidence of a hold.
    #[default]
    HoldOnOtherPress,
}

/// Which timeout of a dual-role key is being queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeoutKind {
    /// The window within which a release resolves as a tap.
    Tap,
    /// The window used once a resolved hold enters its release phase.
    Release,
}

/// Per-key timing class of a dual-role key, derived from its actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyClass {
    /// Thumb-cluster layer-shift keys
    ThumbLayerTap,
    /// Home-row mods under ring finger or pinky-adjacent positions (A, O, R, I)
    RingHomeRow,
    /// Home-row mods under the middle fingers (S, E)
    MiddleHomeRow,
    /// Home-row mods under the index fingers (T, N)
    IndexHomeRow,
    /// Everything else
    Plain,
}

impl KeyClass {
    /// Derive the timing class from the key's tap and hold actions.
    pub fn of(tap: Action, hold: Action) -> Self {
        match hold {
            Action::LayerOn(_) => KeyClass::ThumbLayerTap,
            Action::Modifier(_) => match tap {
                Action::Key(KeyCode::A | KeyCode::O | KeyCode::R | KeyCode::I) => KeyClass::RingHomeRow,
                Action::Key(KeyCode::S | KeyCode::E) => KeyClass::MiddleHomeRow,
                Action::Key(KeyCode::T | KeyCode::N) => KeyClass::IndexHomeRow,
                _ => KeyClass::Plain,
            },
            _ => KeyClass::Plain,
        }
    }
}

struct TimeoutRule {
    class: KeyClass,
    /// Tap window as a percentage of the fallback tapping term
    tap_percent: u64,
    /// Use the tight release term instead of the fallback
    tight_release: bool,
}

/// Ordered timeout policy, first matching row wins. Weaker fingers get longer
/// tap windows, index fingers get shorter ones so their modifiers engage fast.
const TIMEOUT_POLICY: &[TimeoutRule] = &[
    TimeoutRule {
        class: KeyClass::ThumbLayerTap,
        tap_percent: 170,
        tight_release: false,
    },
    TimeoutRule {
        class: KeyClass::RingHomeRow,
        tap_percent: 200,
        tight_release: true,
    },
    TimeoutRule {
        class: KeyClass::MiddleHomeRow,
        tap_percent: 150,
        tight_release: true,
    },
    TimeoutRule {
        class: KeyClass::IndexHomeRow,
        tap_percent: 50,
        tight_release: true,
    },
    TimeoutRule {
        class: KeyClass::Plain,
        tap_percent: 100,
        tight_release: false,
    },
];

const FALLBACK_RULE: TimeoutRule = TimeoutRule {
    class: KeyClass::Plain,
    tap_percent: 100,
    tight_release: false,
};

/// Resolve the effective timeout for a key class from the configured fallback.
/// Timeouts are recomputed per resolution, never stored per key.
pub fn resolve_timeout(class: KeyClass, kind: TimeoutKind, config: &TapHoldConfig) -> Duration {
    let rule = TIMEOUT_POLICY
        .iter()
        .find(|rule| rule.class == class)
        .unwrap_or(&FALLBACK_RULE);
    match kind {
        TimeoutKind::Tap => Duration::from_millis(config.tapping_term.as_millis() * rule.tap_percent / 100),
        TimeoutKind::Release => {
            if rule.tight_release {
                config.release_term
            } else {
                config.tapping_term
            }
        }
    }
}

/// Outcome of classifying an event against a pending decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    StillPending,
    Tap,
    Hold,
}

/// A resolved event for the keyboard to execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum TapHoldEvent {
    /// Not a dual-role concern: look the position up in the keymap and process normally
    Key(KeyEvent),
    /// A resolved action edge, `event.pressed` tells press or release
    Act(Action, KeyEvent),
    /// A resolved tap: synthetic press immediately followed by release
    TapAct(Action, KeyEvent),
}

pub(crate) const TAP_HOLD_OUTPUT_CAP: usize = 16;
const SIBLING_BUF: usize = 8;
const MAX_ACTIVE_HOLDS: usize = 4;

/// Live state for the currently pending dual-role key. At most one decision
/// is open at a time; once it resolves as a hold, the slot frees up and the
/// hold moves to the active-holds list, so chorded dual-role keys each get
/// their own decision.
pub(crate) struct PendingTapHold {
    row: u8,
    col: u8,
    tap: Action,
    hold: Action,
    class: KeyClass,
    press_instant: Instant,
    /// Key events interleaved while the decision is open, in arrival order
    queued: Vec<KeyEvent, SIBLING_BUF>,
}

impl PendingTapHold {
    fn is_same_key(&self, event: &KeyEvent) -> bool {
        self.row == event.row && self.col == event.col
    }

    fn has_queued_press_of(&self, event: &KeyEvent) -> bool {
        self.queued
            .iter()
            .any(|e| e.pressed && e.row == event.row && e.col == event.col)
    }
}

/// Pure decision function: classify one incoming event against the pending
/// key, given the elapsed time since its press and the resolved tap window.
pub(crate) fn classify(
    pending: &PendingTapHold,
    incoming: &KeyEvent,
    elapsed: Duration,
    window: Duration,
    mode: TapHoldMode,
) -> Resolution {
    if elapsed >= window {
        // Past the window, tap is no longer reachable for this press instance
        return Resolution::Hold;
    }
    if pending.is_same_key(incoming) {
        if incoming.pressed {
            return Resolution::StillPending;
        }
        return Resolution::Tap;
    }
    if incoming.pressed {
        return match mode {
            TapHoldMode::HoldOnOtherPress => Resolution::Hold,
            TapHoldMode::PermissiveHold | TapHoldMode::Normal => Resolution::StillPending,
        };
    }
    // Sibling release: disqualifying only if its press happened while the
    // decision was open (a full press-release nested inside ours), and only
    // under permissive hold. A release of a key pressed before us is just the
    // tail of a rolling sequence.
    if mode == TapHoldMode::PermissiveHold && pending.has_queued_press_of(incoming) {
        return Resolution::Hold;
    }
    Resolution::StillPending
}

/// The tap-hold resolver. Feed it every key event in delivery order; it
/// returns the (possibly empty) list of resolved events to execute.
pub struct TapHoldResolver {
    pending: Option<PendingTapHold>,
    /// Fired holds waiting for their key's release
    holds: Vec<(u8, u8, Action), MAX_ACTIVE_HOLDS>,
    config: TapHoldConfig,
}

impl TapHoldResolver {
    pub fn new(config: TapHoldConfig) -> Self {
        Self {
            pending: None,
            holds: Vec::new(),
            config,
        }
    }

    /// Per-key timeout for the action at a position, from the policy table.
    pub fn resolve_timeout_for(&self, action: KeyAction, kind: TimeoutKind) -> Duration {
        let class = match action {
            KeyAction::TapHold(tap, hold) => KeyClass::of(tap, hold),
            _ => KeyClass::Plain,
        };
        resolve_timeout(class, kind, &self.config)
    }

    /// True if a decision is currently open or a resolved hold is still down.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some() || !self.holds.is_empty()
    }

    /// Advance time without an event: fires the hold of a pending key whose
    /// tap window has elapsed. Called from the runtime's periodic scan tick.
    pub(crate) fn tick(&mut self, now: Instant) -> Vec<TapHoldEvent, TAP_HOLD_OUTPUT_CAP> {
        let mut out = Vec::new();
        self.fire_hold_on_timeout(now, &mut out);
        out
    }

    /// Process one key event, in delivery order.
    pub(crate) fn feed(
        &mut self,
        event: KeyEvent,
        action: KeyAction,
        now: Instant,
    ) -> Vec<TapHoldEvent, TAP_HOLD_OUTPUT_CAP> {
        let mut out = Vec::new();
        // A pending timeout is applied first so the decision reflects event order
        self.fire_hold_on_timeout(now, &mut out);

        // Release of an already-fired hold completes its cycle
        if !event.pressed
            && let Some(slot) = self
                .holds
                .iter()
                .position(|&(row, col, _)| row == event.row && col == event.col)
        {
            let (_, _, hold) = self.holds.swap_remove(slot);
            out.push(TapHoldEvent::Act(hold, event)).ok();
            return out;
        }

        let Some(mut pending) = self.pending.take() else {
            if event.pressed
                && let KeyAction::TapHold(tap, hold) = action
            {
                debug!("Tap-hold pending: {:?}/{:?} at ({},{})", tap, hold, event.row, event.col);
                self.pending = Some(PendingTapHold {
                    row: event.row,
                    col: event.col,
                    tap,
                    hold,
                    class: KeyClass::of(tap, hold),
                    press_instant: now,
                    queued: Vec::new(),
                });
            } else {
                out.push(TapHoldEvent::Key(event)).ok();
            }
            return out;
        };

        let elapsed = now.duration_since(pending.press_instant);
        let window = resolve_timeout(pending.class, TimeoutKind::Tap, &self.config);
        match classify(&pending, &event, elapsed, window, self.config.mode) {
            Resolution::Tap => {
                debug!("TAP: {:?}, elapsed {}ms", pending.tap, elapsed.as_millis());
                let press = KeyEvent {
                    row: pending.row,
                    col: pending.col,
                    pressed: true,
                };
                out.push(TapHoldEvent::TapAct(pending.tap, press)).ok();
                Self::replay_queued(&mut pending, &mut out);
                // Tap is terminal, the decision slot is free again
            }
            Resolution::Hold => {
                let own_release = pending.is_same_key(&event) && !event.pressed;
                let hold = pending.hold;
                let (row, col) = (pending.row, pending.col);
                self.fire_hold(pending, &mut out);
                if own_release {
                    // Resolved by its own late release: deactivate in the same batch
                    if let Some(slot) = self.holds.iter().position(|&(r, c, _)| r == row && c == col) {
                        self.holds.swap_remove(slot);
                    }
                    out.push(TapHoldEvent::Act(hold, event)).ok();
                } else {
                    out.push(TapHoldEvent::Key(event)).ok();
                }
            }
            Resolution::StillPending => {
                if pending.is_same_key(&event) {
                    // Repeated press edge without a release, a debounce
                    // artifact; dropped
                } else if pending.queued.push(event).is_err() {
                    warn!("sibling buffer full, passing event through");
                    out.push(TapHoldEvent::Key(event)).ok();
                }
                self.pending = Some(pending);
            }
        }
        out
    }

    fn fire_hold_on_timeout(&mut self, now: Instant, out: &mut Vec<TapHoldEvent, TAP_HOLD_OUTPUT_CAP>) {
        let due = match &self.pending {
            Some(pending) => {
                let window = resolve_timeout(pending.class, TimeoutKind::Tap, &self.config);
                now.duration_since(pending.press_instant) >= window
            }
            None => false,
        };
        if due && let Some(pending) = self.pending.take() {
            self.fire_hold(pending, out);
        }
    }

    /// Emit the hold activation, move it to the active-holds list and replay
    /// everything buffered behind it. The decision slot is free afterwards.
    fn fire_hold(&mut self, mut pending: PendingTapHold, out: &mut Vec<TapHoldEvent, TAP_HOLD_OUTPUT_CAP>) {
        debug!("HOLD: {:?} at ({},{})", pending.hold, pending.row, pending.col);
        let press = KeyEvent {
            row: pending.row,
            col: pending.col,
            pressed: true,
        };
        out.push(TapHoldEvent::Act(pending.hold, press)).ok();
        if self.holds.push((pending.row, pending.col, pending.hold)).is_err() {
            warn!("Active hold list full, dropping hold at ({},{})", pending.row, pending.col);
        }
        Self::replay_queued(&mut pending, out);
    }

    fn replay_queued(pending: &mut PendingTapHold, out: &mut Vec<TapHoldEvent, TAP_HOLD_OUTPUT_CAP>) {
        for event in pending.queued.iter() {
            out.push(TapHoldEvent::Key(*event)).ok();
        }
        pending.queued.clear();
    }
}
