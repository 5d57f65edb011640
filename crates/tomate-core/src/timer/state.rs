use serde::{Deserialize, Serialize};

use super::mode::Mode;
use crate::storage::Config;

/// Snapshot of a timer.
///
/// Never mutated in place: every change produces a new value through
/// [`TimerState::patched`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Countdown suspended by the user or by the config menu.
    pub is_paused: bool,
    /// A configuration dialog owns the terminal; nothing ticks or renders.
    pub in_config_menu: bool,
    pub current_mode: Mode,
    /// Pomodoros completed since the last reset.
    pub current_cycle: u32,
    /// Remaining seconds in the current phase. Reaches -1 on expiry.
    pub seconds_left: i64,
    pub config: Config,
}

impl TimerState {
    /// Fresh state at the start of the first pomodoro.
    pub fn initial(config: Config) -> Self {
        Self {
            is_paused: false,
            in_config_menu: false,
            current_mode: Mode::Pomodoro,
            current_cycle: 0,
            seconds_left: i64::from(config.pomodoro),
            config,
        }
    }

    /// Copy of `self` with every field present in `patch` replaced.
    pub fn patched(&self, patch: TimerPatch) -> Self {
        Self {
            is_paused: patch.is_paused.unwrap_or(self.is_paused),
            in_config_menu: patch.in_config_menu.unwrap_or(self.in_config_menu),
            current_mode: patch.current_mode.unwrap_or(self.current_mode),
            current_cycle: patch.current_cycle.unwrap_or(self.current_cycle),
            seconds_left: patch.seconds_left.unwrap_or(self.seconds_left),
            config: patch.config.unwrap_or_else(|| self.config.clone()),
        }
    }

    /// Configured length of the current phase, in seconds.
    pub fn phase_duration_secs(&self) -> u32 {
        self.current_mode.duration_secs(&self.config)
    }
}

/// Partial update of [`TimerState`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerPatch {
    pub is_paused: Option<bool>,
    pub in_config_menu: Option<bool>,
    pub current_mode: Option<Mode>,
    pub current_cycle: Option<u32>,
    pub seconds_left: Option<i64>,
    pub config: Option<Config>,
}

impl TimerPatch {
    pub fn paused(is_paused: bool) -> Self {
        Self {
            is_paused: Some(is_paused),
            ..Self::default()
        }
    }

    pub fn seconds_left(seconds_left: i64) -> Self {
        Self {
            seconds_left: Some(seconds_left),
            ..Self::default()
        }
    }

    pub fn mode(current_mode: Mode) -> Self {
        Self {
            current_mode: Some(current_mode),
            ..Self::default()
        }
    }
}
