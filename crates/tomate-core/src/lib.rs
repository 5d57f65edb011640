//! # Tomate Core Library
//!
//! Core logic for the Tomate terminal Pomodoro timer. The `tomate` binary is a
//! thin terminal layer over this crate: it ticks the engine, renders the
//! countdown and decides how to alert the user.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pomodoro/short break/long break state machine with no
//!   clock of its own; the caller ticks it once per second
//! - **Storage**: JSON configuration with validation and defaulting, and a
//!   JSON session history with aggregate statistics
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`ConfigStore`]: Configuration loading and persistence
//! - [`MetricsStore`]: Session history and statistics

pub mod error;
pub mod events;
pub mod format;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, MetricsError};
pub use events::Event;
pub use storage::{
    Config, ConfigPatch, ConfigSource, ConfigStore, MetricsStats, MetricsStore, Session,
    SessionSink,
};
pub use timer::{Mode, Tick, TimerEngine, TimerPatch, TimerState};
