//! Timer engine implementation.
//!
//! The engine is a pomodoro/break state machine driven from outside: it has
//! no thread and no clock of its own. A driver calls [`TimerEngine::tick`]
//! once per second and [`TimerEngine::advance_cycle`] once it has told the
//! user that a phase ran out.
//!
//! ## State Transitions
//!
//! ```text
//! Pomodoro -> ShortBreak -> Pomodoro -> ShortBreak -> Pomodoro -> ShortBreak
//!          -> Pomodoro -> LongBreak -> Pomodoro -> ...
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(ConfigStore::new(cfg_path), MetricsStore::new(m_path));
//! engine.reset_state();
//! // Once per second:
//! if let Tick::Expired { .. } = engine.tick() {
//!     notify_user();
//!     engine.advance_cycle();
//! }
//! ```

use chrono::{DateTime, SubsecRound, Utc};
use tracing::debug;

use super::mode::Mode;
use super::state::{TimerPatch, TimerState};
use crate::events::Event;
use crate::storage::{Config, ConfigSource, Session, SessionSink};

/// Outcome of a single driver tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Paused or in the config menu; nothing changed.
    Suspended,
    /// Counting down. `seconds_left` is the value to display for this tick.
    Running { seconds_left: i64 },
    /// The phase of `mode` ran out after displaying zero.
    Expired { mode: Mode },
}

/// Core timer engine.
///
/// Owns its state privately; independent engines can coexist. Configuration
/// comes from `C`, finished sessions go to `S`.
#[derive(Debug)]
pub struct TimerEngine<C, S> {
    config_source: C,
    sink: S,
    /// Built lazily on first access.
    state: Option<TimerState>,
}

impl<C: ConfigSource, S: SessionSink> TimerEngine<C, S> {
    pub fn new(config_source: C, sink: S) -> Self {
        Self {
            config_source,
            sink,
            state: None,
        }
    }

    pub fn config_source(&self) -> &C {
        &self.config_source
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn current(&mut self) -> &TimerState {
        let source = &self.config_source;
        self.state
            .get_or_insert_with(|| TimerState::initial(source.load()))
    }

    // ── Core operations ──────────────────────────────────────────────

    /// Current snapshot, loading the configuration on first call.
    pub fn get_state(&mut self) -> TimerState {
        self.current().clone()
    }

    /// Merge `patch` into a new snapshot. No validation is done.
    pub fn update_state(&mut self, patch: TimerPatch) {
        let next = self.current().patched(patch);
        self.state = Some(next);
    }

    /// Back to the first pomodoro with the current config. Flags are kept.
    pub fn reset_state(&mut self) {
        let pomodoro = self.current().config.pomodoro;
        self.update_state(TimerPatch {
            current_mode: Some(Mode::Pomodoro),
            current_cycle: Some(0),
            seconds_left: Some(i64::from(pomodoro)),
            ..TimerPatch::default()
        });
    }

    /// Record the phase that just ran out and move to the next one.
    ///
    /// The session's start is derived from the configured duration, so time
    /// spent paused is not subtracted. Recording is best effort: the sink
    /// reports its own failures and the transition always happens.
    pub fn advance_cycle(&mut self) -> Event {
        let prev = self.get_state();
        let completed = prev.current_mode;
        let now = now();

        let session = Session::ending_at(completed, now, completed.duration_ms(&prev.config));
        self.sink.record_session(&session);

        let (next, cycle) = completed.next(prev.current_cycle);
        self.update_state(TimerPatch {
            current_mode: Some(next),
            current_cycle: Some(cycle),
            seconds_left: Some(i64::from(next.duration_secs(&prev.config))),
            ..TimerPatch::default()
        });
        debug!(%completed, %next, cycle, "phase advanced");

        Event::PhaseCompleted {
            completed,
            next,
            cycle,
            session,
            at: now,
        }
    }

    // ── Driver helpers ───────────────────────────────────────────────

    /// Count down one second.
    ///
    /// Returns the value to display, then decrements. Expiry is detected
    /// once the remaining time is below zero, so `0` is shown for a full
    /// tick. An expired phase stays at `-1` and keeps reporting
    /// [`Tick::Expired`] until [`Self::advance_cycle`] is called.
    pub fn tick(&mut self) -> Tick {
        let state = self.current();
        if state.is_paused || state.in_config_menu {
            return Tick::Suspended;
        }
        let shown = state.seconds_left;
        if shown < 0 {
            return Tick::Expired {
                mode: state.current_mode,
            };
        }
        self.update_state(TimerPatch::seconds_left(shown - 1));
        Tick::Running { seconds_left: shown }
    }

    /// Flip the pause flag and return its new value.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = !self.current().is_paused;
        self.update_state(TimerPatch::paused(paused));
        paused
    }

    /// Hand control to the config menu. Returns whether the timer was
    /// already paused, to be passed back to [`Self::leave_config_menu`].
    pub fn enter_config_menu(&mut self) -> bool {
        let was_paused = self.current().is_paused;
        self.update_state(TimerPatch {
            is_paused: Some(true),
            in_config_menu: Some(true),
            ..TimerPatch::default()
        });
        was_paused
    }

    pub fn leave_config_menu(&mut self, was_paused: bool) {
        self.update_state(TimerPatch {
            is_paused: Some(was_paused),
            in_config_menu: Some(false),
            ..TimerPatch::default()
        });
    }

    /// Re-read the configuration from the source.
    pub fn reload_config(&mut self) {
        let config = self.config_source.load();
        self.apply_config(config);
    }

    /// Replace the effective configuration.
    ///
    /// A changed pomodoro length restarts a running pomodoro with the new
    /// length; other phases keep counting.
    pub fn apply_config(&mut self, config: Config) {
        let state = self.current();
        let restart = state.current_mode == Mode::Pomodoro && state.config.pomodoro != config.pomodoro;
        let seconds_left = restart.then(|| i64::from(config.pomodoro));
        self.update_state(TimerPatch {
            seconds_left,
            config: Some(config),
            ..TimerPatch::default()
        });
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&mut self) -> Event {
        let state = self.current();
        Event::StateSnapshot {
            mode: state.current_mode,
            cycle: state.current_cycle,
            seconds_left: state.seconds_left,
            total_secs: state.phase_duration_secs(),
            is_paused: state.is_paused,
            in_config_menu: state.in_config_menu,
            at: Utc::now(),
        }
    }
}

/// Wall clock truncated to whole milliseconds, the precision sessions are
/// stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingSink {
        sessions: RefCell<Vec<Session>>,
    }

    impl SessionSink for RecordingSink {
        fn record_session(&self, session: &Session) {
            self.sessions.borrow_mut().push(session.clone());
        }
    }

    struct CountingSource {
        config: Config,
        loads: Cell<usize>,
    }

    impl ConfigSource for CountingSource {
        fn load(&self) -> Config {
            self.loads.set(self.loads.get() + 1);
            self.config.clone()
        }
    }

    fn test_config() -> Config {
        Config {
            pomodoro: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
            ..Config::default()
        }
    }

    fn engine() -> TimerEngine<Config, RecordingSink> {
        TimerEngine::new(test_config(), RecordingSink::default())
    }

    #[test]
    fn get_state_loads_config_once() {
        let source = CountingSource {
            config: test_config(),
            loads: Cell::new(0),
        };
        let mut engine = TimerEngine::new(source, RecordingSink::default());
        let first = engine.get_state();
        let second = engine.get_state();
        assert_eq!(first, second);
        assert_eq!(engine.config_source().loads.get(), 1);
        assert_eq!(first.seconds_left, 1500);
    }

    #[test]
    fn update_state_keeps_untouched_fields() {
        let mut engine = engine();
        let before = engine.get_state();
        engine.update_state(TimerPatch::paused(true));
        let after = engine.get_state();
        assert!(after.is_paused);
        assert_eq!(after.current_mode, before.current_mode);
        assert_eq!(after.current_cycle, before.current_cycle);
        assert_eq!(after.seconds_left, before.seconds_left);
        assert_eq!(after.in_config_menu, before.in_config_menu);
    }

    #[test]
    fn reset_state_restores_first_pomodoro_and_keeps_flags() {
        let mut engine = engine();
        engine.update_state(TimerPatch {
            current_mode: Some(Mode::ShortBreak),
            current_cycle: Some(3),
            seconds_left: Some(10),
            is_paused: Some(true),
            in_config_menu: Some(true),
            ..Default::default()
        });
        engine.reset_state();
        let state = engine.get_state();
        assert_eq!(state.current_mode, Mode::Pomodoro);
        assert_eq!(state.current_cycle, 0);
        assert_eq!(state.seconds_left, 1500);
        assert!(state.is_paused);
        assert!(state.in_config_menu);
    }

    #[test]
    fn reset_state_uses_current_config() {
        let mut engine = engine();
        engine.update_state(TimerPatch {
            config: Some(Config {
                pomodoro: 60,
                ..test_config()
            }),
            ..Default::default()
        });
        engine.reset_state();
        assert_eq!(engine.get_state().seconds_left, 60);
    }

    #[test]
    fn advances_to_short_break_after_pomodoro() {
        let mut engine = engine();
        engine.reset_state();
        engine.advance_cycle();
        let state = engine.get_state();
        assert_eq!(state.current_mode, Mode::ShortBreak);
        assert_eq!(state.current_cycle, 1);
        assert_eq!(state.seconds_left, 300);
    }

    #[test]
    fn advances_to_pomodoro_after_short_break() {
        let mut engine = engine();
        engine.update_state(TimerPatch {
            current_mode: Some(Mode::ShortBreak),
            current_cycle: Some(1),
            ..Default::default()
        });
        engine.advance_cycle();
        let state = engine.get_state();
        assert_eq!(state.current_mode, Mode::Pomodoro);
        assert_eq!(state.current_cycle, 1);
        assert_eq!(state.seconds_left, 1500);
    }

    #[test]
    fn advances_to_long_break_after_fourth_pomodoro() {
        let mut engine = engine();
        engine.update_state(TimerPatch {
            current_cycle: Some(3),
            current_mode: Some(Mode::Pomodoro),
            ..Default::default()
        });
        engine.advance_cycle();
        let state = engine.get_state();
        assert_eq!(state.current_mode, Mode::LongBreak);
        assert_eq!(state.current_cycle, 4);
        assert_eq!(state.seconds_left, 900);
    }

    #[test]
    fn advance_preserves_flags_and_config() {
        let mut engine = engine();
        engine.update_state(TimerPatch::paused(true));
        engine.advance_cycle();
        let state = engine.get_state();
        assert!(state.is_paused);
        assert!(!state.in_config_menu);
        assert_eq!(state.config, test_config());
    }

    #[test]
    fn advance_records_one_session_with_derived_start() {
        let mut engine = engine();
        engine.update_state(TimerPatch::mode(Mode::LongBreak));
        let event = engine.advance_cycle();

        let sessions = engine.sink().sessions.borrow();
        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.mode, Mode::LongBreak);
        assert_eq!(session.duration_ms(), 900_000);
        match event {
            Event::PhaseCompleted {
                completed,
                next,
                session: ref reported,
                ..
            } => {
                assert_eq!(completed, Mode::LongBreak);
                assert_eq!(next, Mode::Pomodoro);
                assert_eq!(reported, session);
            }
            _ => panic!("Expected PhaseCompleted"),
        }
    }

    #[test]
    fn session_uses_duration_of_mode_being_exited() {
        let mut engine = engine();
        engine.advance_cycle();
        engine.advance_cycle();
        let sessions = engine.sink().sessions.borrow();
        assert_eq!(sessions[0].mode, Mode::Pomodoro);
        assert_eq!(sessions[0].duration_ms(), 1_500_000);
        assert_eq!(sessions[1].mode, Mode::ShortBreak);
        assert_eq!(sessions[1].duration_ms(), 300_000);
    }

    #[test]
    fn full_cycle_pattern() {
        let mut engine = engine();
        engine.reset_state();
        let modes: Vec<Mode> = (0..9)
            .map(|_| {
                engine.advance_cycle();
                engine.get_state().current_mode
            })
            .collect();
        use Mode::*;
        assert_eq!(
            modes,
            vec![
                ShortBreak, Pomodoro, ShortBreak, Pomodoro, ShortBreak, Pomodoro, LongBreak,
                Pomodoro, ShortBreak
            ]
        );
        assert_eq!(engine.get_state().current_cycle, 5);
    }

    #[test]
    fn tick_shows_zero_before_expiring() {
        let mut engine = engine();
        engine.update_state(TimerPatch::seconds_left(1));
        assert_eq!(engine.tick(), Tick::Running { seconds_left: 1 });
        assert_eq!(engine.tick(), Tick::Running { seconds_left: 0 });
        assert_eq!(engine.tick(), Tick::Expired { mode: Mode::Pomodoro });
        assert_eq!(engine.get_state().seconds_left, -1);
        assert_eq!(engine.get_state().current_mode, Mode::Pomodoro);
    }

    #[test]
    fn expired_phase_stops_counting() {
        let mut engine = engine();
        engine.update_state(TimerPatch::seconds_left(0));
        assert_eq!(engine.tick(), Tick::Running { seconds_left: 0 });
        assert_eq!(engine.tick(), Tick::Expired { mode: Mode::Pomodoro });
        assert_eq!(engine.tick(), Tick::Expired { mode: Mode::Pomodoro });
        assert_eq!(engine.tick(), Tick::Expired { mode: Mode::Pomodoro });
        assert_eq!(engine.get_state().seconds_left, -1);
        assert!(engine.sink().sessions.borrow().is_empty());

        engine.advance_cycle();
        assert_eq!(engine.get_state().current_mode, Mode::ShortBreak);
        assert_eq!(engine.tick(), Tick::Running { seconds_left: 300 });
    }

    #[test]
    fn tick_is_suspended_while_paused_or_configuring() {
        let mut engine = engine();
        assert!(engine.toggle_pause());
        assert_eq!(engine.tick(), Tick::Suspended);
        assert!(!engine.toggle_pause());

        let was_paused = engine.enter_config_menu();
        assert!(!was_paused);
        assert_eq!(engine.tick(), Tick::Suspended);
        engine.leave_config_menu(was_paused);

        assert_eq!(engine.tick(), Tick::Running { seconds_left: 1500 });
        assert_eq!(engine.get_state().seconds_left, 1499);
    }

    #[test]
    fn config_menu_restores_previous_pause() {
        let mut engine = engine();
        engine.update_state(TimerPatch::paused(true));
        let was_paused = engine.enter_config_menu();
        assert!(engine.get_state().in_config_menu);
        engine.leave_config_menu(was_paused);
        let state = engine.get_state();
        assert!(state.is_paused);
        assert!(!state.in_config_menu);
    }

    #[test]
    fn apply_config_restarts_pomodoro_only() {
        let mut engine = engine();
        engine.apply_config(Config {
            pomodoro: 600,
            ..test_config()
        });
        assert_eq!(engine.get_state().seconds_left, 600);

        engine.update_state(TimerPatch {
            current_mode: Some(Mode::ShortBreak),
            seconds_left: Some(42),
            ..Default::default()
        });
        engine.apply_config(Config {
            pomodoro: 700,
            short_break: 100,
            ..test_config()
        });
        let state = engine.get_state();
        assert_eq!(state.seconds_left, 42);
        assert_eq!(state.config.short_break, 100);
    }

    #[test]
    fn apply_config_with_same_pomodoro_keeps_progress() {
        let mut engine = engine();
        engine.update_state(TimerPatch::seconds_left(900));
        engine.apply_config(test_config());
        assert_eq!(engine.get_state().seconds_left, 900);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let mut engine = engine();
        match engine.snapshot() {
            Event::StateSnapshot {
                mode,
                cycle,
                seconds_left,
                total_secs,
                ..
            } => {
                assert_eq!(mode, Mode::Pomodoro);
                assert_eq!(cycle, 0);
                assert_eq!(seconds_left, 1500);
                assert_eq!(total_secs, 1500);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
