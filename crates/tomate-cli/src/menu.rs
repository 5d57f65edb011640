//! The in-session configuration menu.
//!
//! The countdown is paused and the terminal leaves raw mode while the menu
//! reads line input; both are restored on the way out.

use std::io::{self, BufRead, Write};

use tomate_core::error::Result;
use tomate_core::storage::{validate_duration, MAX_DURATION_SECS};
use tomate_core::{ConfigPatch, ConfigSource, Mode};

use crate::commands::timer::Engine;
use crate::render;
use crate::terminal::Terminal;

/// Run the menu once and return a notice for the countdown screen.
pub fn run(engine: &mut Engine, term: &mut Terminal) -> Result<Option<String>> {
    let was_paused = engine.enter_config_menu();
    term.suspend()?;
    let outcome = prompt(engine);
    engine.leave_config_menu(was_paused);
    term.resume()?;
    outcome
}

fn prompt(engine: &mut Engine) -> Result<Option<String>> {
    let config = engine.config_source().load();
    println!();
    for line in render::config_menu(&config) {
        println!("{line}");
    }

    let choice = ask("Choose an option: ")?;
    let mode = match parse_choice(&choice) {
        Choice::Back => return Ok(None),
        Choice::Invalid => return Ok(Some("Invalid option".to_string())),
        Choice::Set(mode) => mode,
    };

    let answer = ask(&format!("New {} duration (seconds): ", mode.label()))?;
    let Some(secs) = parse_duration(&answer) else {
        return Ok(Some(format!(
            "Invalid duration (must be between 1-{MAX_DURATION_SECS} seconds)"
        )));
    };

    match engine.config_source().try_save(&patch_for(mode, secs)) {
        Ok(saved) => {
            engine.apply_config(saved);
            Ok(Some(format!("{} set to {secs}s", mode.label())))
        }
        Err(e) => Ok(Some(format!("Could not save config: {e}"))),
    }
}

fn ask(question: &str) -> io::Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Set(Mode),
    Back,
    Invalid,
}

fn parse_choice(input: &str) -> Choice {
    match input.trim() {
        "1" => Choice::Set(Mode::Pomodoro),
        "2" => Choice::Set(Mode::ShortBreak),
        "3" => Choice::Set(Mode::LongBreak),
        "q" | "Q" | "" => Choice::Back,
        _ => Choice::Invalid,
    }
}

fn parse_duration(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|secs| validate_duration(*secs))
}

fn patch_for(mode: Mode, secs: u32) -> ConfigPatch {
    let mut patch = ConfigPatch::default();
    match mode {
        Mode::Pomodoro => patch.pomodoro = Some(secs),
        Mode::ShortBreak => patch.short_break = Some(secs),
        Mode::LongBreak => patch.long_break = Some(secs),
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices() {
        assert_eq!(parse_choice("1"), Choice::Set(Mode::Pomodoro));
        assert_eq!(parse_choice(" 3\n"), Choice::Set(Mode::LongBreak));
        assert_eq!(parse_choice("q"), Choice::Back);
        assert_eq!(parse_choice(""), Choice::Back);
        assert_eq!(parse_choice("4"), Choice::Invalid);
    }

    #[test]
    fn durations_outside_one_day_are_rejected() {
        assert_eq!(parse_duration("90"), Some(90));
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("86401"), None);
        assert_eq!(parse_duration("-5"), None);
        assert_eq!(parse_duration("ten"), None);
    }

    #[test]
    fn patch_touches_only_the_chosen_phase() {
        let patch = patch_for(Mode::ShortBreak, 120);
        assert_eq!(patch.short_break, Some(120));
        assert!(patch.pomodoro.is_none());
        assert!(patch.long_break.is_none());
        assert!(patch.sound.is_none());
    }
}
