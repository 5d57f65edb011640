use serde::{Deserialize, Serialize};

use crate::storage::Config;

/// Number of completed pomodoros after which the break is a long one.
pub const POMODOROS_PER_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Wire name, as stored in the metrics file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::ShortBreak => "shortBreak",
            Self::LongBreak => "longBreak",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Self::Pomodoro)
    }

    /// Configured length of this mode in seconds.
    pub fn duration_secs(&self, config: &Config) -> u32 {
        match self {
            Self::Pomodoro => config.pomodoro,
            Self::ShortBreak => config.short_break,
            Self::LongBreak => config.long_break,
        }
    }

    /// Configured length of this mode in milliseconds.
    pub fn duration_ms(&self, config: &Config) -> i64 {
        i64::from(self.duration_secs(config)) * 1000
    }

    /// Mode and cycle count that follow the completion of `self`.
    ///
    /// Only a finished pomodoro increments the cycle; every
    /// [`POMODOROS_PER_LONG_BREAK`]th one is followed by a long break.
    pub fn next(self, cycle: u32) -> (Mode, u32) {
        match self {
            Self::Pomodoro => {
                let cycle = cycle.saturating_add(1);
                if cycle % POMODOROS_PER_LONG_BREAK == 0 {
                    (Self::LongBreak, cycle)
                } else {
                    (Self::ShortBreak, cycle)
                }
            }
            Self::ShortBreak | Self::LongBreak => (Self::Pomodoro, cycle),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pomodoro_goes_to_short_break_and_counts() {
        assert_eq!(Mode::Pomodoro.next(0), (Mode::ShortBreak, 1));
        assert_eq!(Mode::Pomodoro.next(1), (Mode::ShortBreak, 2));
        assert_eq!(Mode::Pomodoro.next(2), (Mode::ShortBreak, 3));
    }

    #[test]
    fn every_fourth_pomodoro_earns_long_break() {
        assert_eq!(Mode::Pomodoro.next(3), (Mode::LongBreak, 4));
        assert_eq!(Mode::Pomodoro.next(7), (Mode::LongBreak, 8));
        assert_eq!(Mode::Pomodoro.next(4), (Mode::ShortBreak, 5));
    }

    #[test]
    fn breaks_return_to_pomodoro_without_counting() {
        assert_eq!(Mode::ShortBreak.next(2), (Mode::Pomodoro, 2));
        assert_eq!(Mode::LongBreak.next(4), (Mode::Pomodoro, 4));
    }

    #[test]
    fn serde_uses_camel_case_names() {
        assert_eq!(serde_json::to_string(&Mode::ShortBreak).unwrap(), "\"shortBreak\"");
        let parsed: Mode = serde_json::from_str("\"longBreak\"").unwrap();
        assert_eq!(parsed, Mode::LongBreak);
        assert_eq!(Mode::LongBreak.to_string(), "longBreak");
    }

    #[test]
    fn durations_follow_config() {
        let cfg = Config::default();
        assert_eq!(Mode::Pomodoro.duration_secs(&cfg), 1500);
        assert_eq!(Mode::ShortBreak.duration_ms(&cfg), 300_000);
        assert_eq!(Mode::LongBreak.duration_ms(&cfg), 900_000);
    }
}
