//! JSON-based session history and statistics.
//!
//! Every finished phase is appended to `metrics.json` as
//! `{"type", "start", "end"}` with millisecond ISO-8601 timestamps.
//! Persistence problems are logged and never reach the timer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::error::MetricsError;
use crate::timer::Mode;

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// One completed phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type")]
    pub mode: Mode,
    #[serde(with = "iso_millis")]
    pub start: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end: DateTime<Utc>,
}

impl Session {
    /// Session of `mode` that ended at `end` and lasted `duration_ms`.
    ///
    /// The start is derived from the duration, not observed.
    pub fn ending_at(mode: Mode, end: DateTime<Utc>, duration_ms: i64) -> Self {
        Self {
            mode,
            start: end - Duration::milliseconds(duration_ms),
            end,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }

    fn validate(&self) -> Result<(), MetricsError> {
        if self.end < self.start {
            return Err(MetricsError::InvalidSession {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Contents of the metrics file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub sessions: Vec<Session>,
}

impl Metrics {
    fn validate(&self) -> Result<(), MetricsError> {
        self.sessions.iter().try_for_each(Session::validate)
    }
}

/// Aggregates shown by `tomate stats`. Durations are in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsStats {
    pub total_pomodoros: usize,
    pub total_short_breaks: usize,
    pub total_long_breaks: usize,
    pub total_pomodoro_secs: f64,
    pub total_break_secs: f64,
    pub avg_pomodoro_secs: f64,
    pub avg_short_break_secs: f64,
    pub avg_long_break_secs: f64,
}

impl MetricsStats {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let count = |mode: Mode| sessions.iter().filter(|s| s.mode == mode).count();
        Self {
            total_pomodoros: count(Mode::Pomodoro),
            total_short_breaks: count(Mode::ShortBreak),
            total_long_breaks: count(Mode::LongBreak),
            total_pomodoro_secs: total_duration(Mode::Pomodoro, sessions),
            total_break_secs: total_duration(Mode::ShortBreak, sessions)
                + total_duration(Mode::LongBreak, sessions),
            avg_pomodoro_secs: avg_duration(Mode::Pomodoro, sessions),
            avg_short_break_secs: avg_duration(Mode::ShortBreak, sessions),
            avg_long_break_secs: avg_duration(Mode::LongBreak, sessions),
        }
    }
}

/// Summed length of all sessions of `mode`, in seconds.
pub fn total_duration(mode: Mode, sessions: &[Session]) -> f64 {
    sessions
        .iter()
        .filter(|s| s.mode == mode)
        .map(Session::duration_secs)
        .sum()
}

/// Mean length of the sessions of `mode`, in seconds; 0 when there are none.
pub fn avg_duration(mode: Mode, sessions: &[Session]) -> f64 {
    let count = sessions.iter().filter(|s| s.mode == mode).count();
    if count == 0 {
        return 0.0;
    }
    total_duration(mode, sessions) / count as f64
}

/// Receives every session the timer completes.
///
/// Implementations must not fail the caller; they report problems on their
/// own.
pub trait SessionSink {
    fn record_session(&self, session: &Session);
}

/// File-backed session history.
#[derive(Debug, Clone)]
pub struct MetricsStore {
    path: PathBuf,
}

impl MetricsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the history. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match the
    /// schema.
    pub fn try_load_all(&self) -> Result<Metrics, MetricsError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Metrics::default()),
            Err(source) => {
                return Err(MetricsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let metrics: Metrics = serde_json::from_str(&content)?;
        metrics.validate()?;
        Ok(metrics)
    }

    /// Like [`Self::try_load_all`], logging failures and returning an empty
    /// history instead.
    pub fn load_all(&self) -> Metrics {
        self.try_load_all().unwrap_or_else(|e| {
            error!(path = %self.path.display(), "failed to load metrics: {e}");
            Metrics::default()
        })
    }

    /// Validate and overwrite the history, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a session is invalid or the file cannot be written.
    pub fn save(&self, metrics: &Metrics) -> Result<(), MetricsError> {
        metrics.validate()?;
        let write_err = |source| MetricsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(write_err)?;
            }
        }
        let content = serde_json::to_string_pretty(metrics)?;
        std::fs::write(&self.path, content).map_err(write_err)?;
        Ok(())
    }

    /// Append one session.
    ///
    /// An unreadable history is left untouched rather than replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or the history cannot be
    /// read or written.
    pub fn try_record_session(&self, session: &Session) -> Result<(), MetricsError> {
        session.validate()?;
        let mut metrics = self.try_load_all()?;
        metrics.sessions.push(session.clone());
        self.save(&metrics)?;
        debug!(mode = %session.mode, total = metrics.sessions.len(), "session recorded");
        Ok(())
    }

    /// Drop all recorded sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn reset(&self) -> Result<(), MetricsError> {
        self.save(&Metrics::default())
    }

    pub fn stats(&self) -> MetricsStats {
        MetricsStats::from_sessions(&self.load_all().sessions)
    }
}

impl SessionSink for MetricsStore {
    fn record_session(&self, session: &Session) {
        if let Err(e) = self.try_record_session(session) {
            error!(path = %self.path.display(), "failed to record session: {e}");
        }
    }
}
