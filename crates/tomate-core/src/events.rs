use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Session;
use crate::timer::Mode;

/// What the timer reports to the outside world.
/// The terminal driver decides how to alert the user; the core never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A phase ran out and the timer moved on.
    PhaseCompleted {
        completed: Mode,
        next: Mode,
        cycle: u32,
        session: Session,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        cycle: u32,
        seconds_left: i64,
        total_secs: u32,
        is_paused: bool,
        in_config_menu: bool,
        at: DateTime<Utc>,
    },
}
