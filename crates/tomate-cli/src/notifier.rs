//! Alerts for the end of a phase: a sound through an external player and a
//! desktop notification. Both are best effort; failures are logged.

use std::path::Path;
use std::process::{Command, Stdio};

use notify_rust::{Notification, Urgency};
use tomate_core::{Config, Mode};
use tracing::{debug, warn};

/// Player invocation: program and the arguments preceding the file path.
const PLAYER: (&str, &[&str]) = ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]);

pub struct Notifier {
    sound: bool,
    desktop: bool,
}

impl Notifier {
    pub fn new(sound: bool, desktop: bool) -> Self {
        Self { sound, desktop }
    }

    /// Alert the user that a phase of `mode` just ran out.
    pub fn phase_ended(&self, mode: Mode, config: &Config) {
        if self.sound {
            play_sound(sound_for(mode, config));
        }
        if self.desktop {
            show_popup(mode);
        }
    }
}

/// Pomodoros end with one sound, both kinds of break with the other.
pub fn sound_for(mode: Mode, config: &Config) -> &str {
    if mode.is_break() {
        &config.sound.break_end
    } else {
        &config.sound.pomodoro_end
    }
}

fn play_sound(path: &str) {
    if !Path::new(path).exists() {
        warn!(path, "sound file not found, skipping");
        return;
    }
    let (program, args) = PLAYER;
    match Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => debug!(pid = child.id(), path, "playing sound"),
        Err(e) => warn!(program, "could not start sound player: {e}"),
    }
}

fn popup_body(mode: Mode) -> String {
    format!("Time's up! {} finished.", mode.label())
}

fn show_popup(mode: Mode) {
    let result = Notification::new()
        .summary("Tomate CLI")
        .body(&popup_body(mode))
        .appname("tomate")
        .icon("alarm-clock")
        .urgency(Urgency::Critical)
        .show();
    if let Err(e) = result {
        warn!("desktop notification failed: {e}");
    }
}
