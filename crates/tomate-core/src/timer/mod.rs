mod engine;
mod mode;
mod state;

pub use engine::{Tick, TimerEngine};
pub use mode::{Mode, POMODOROS_PER_LONG_BREAK};
pub use state::{TimerPatch, TimerState};
