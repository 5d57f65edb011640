use std::time::{Duration, Instant};

use clap::Args;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tomate_core::error::Result;
use tomate_core::{ConfigStore, Event, MetricsStore, Tick, TimerEngine};
use tracing::info;

use super::Context;
use crate::menu;
use crate::notifier::Notifier;
use crate::render;
use crate::terminal::{self, Terminal};

const TICK_RATE: Duration = Duration::from_secs(1);

pub type Engine = TimerEngine<ConfigStore, MetricsStore>;

#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Do not play a sound when a phase ends
    #[arg(long)]
    pub no_sound: bool,
    /// Do not show a desktop notification when a phase ends
    #[arg(long)]
    pub no_notify: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive countdown until the user quits.
pub fn start(ctx: &Context, args: StartArgs) -> Result<()> {
    let mut engine = TimerEngine::new(ctx.config_store(), ctx.metrics_store());
    engine.reset_state();
    let notifier = Notifier::new(!args.no_sound, !args.no_notify);

    terminal::install_panic_hook();
    let mut term = Terminal::enter()?;
    let result = run_loop(&mut engine, &notifier, &mut term);
    term.restore()?;
    result
}

/// Print a snapshot of a freshly loaded timer as JSON.
pub fn status(ctx: &Context) -> Result<()> {
    let mut engine = TimerEngine::new(ctx.config_store(), ctx.metrics_store());
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

fn draw_countdown(
    term: &mut Terminal,
    engine: &mut Engine,
    shown: i64,
    notice: Option<&str>,
) -> Result<()> {
    let state = engine.get_state();
    if state.in_config_menu {
        return Ok(());
    }
    term.draw(&render::countdown(&state, shown, notice))?;
    Ok(())
}

fn run_loop(engine: &mut Engine, notifier: &Notifier, term: &mut Terminal) -> Result<()> {
    let mut notice: Option<String> = None;
    let mut shown = engine.get_state().seconds_left;
    draw_countdown(term, engine, shown, None)?;
    let mut last_tick = Instant::now();

    loop {
        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if handle_key(key, engine, term, &mut notice)? == Flow::Quit {
                        return Ok(());
                    }
                    draw_countdown(term, engine, shown, notice.as_deref())?;
                }
            }
        }

        if last_tick.elapsed() < TICK_RATE {
            continue;
        }
        last_tick = Instant::now();

        match engine.tick() {
            Tick::Suspended => {}
            Tick::Running { seconds_left } => {
                shown = seconds_left;
                draw_countdown(term, engine, shown, notice.as_deref())?;
            }
            Tick::Expired { mode } => {
                let state = engine.get_state();
                term.draw(&render::expired(&state))?;
                notifier.phase_ended(mode, &state.config);
                if !wait_for_ack()? {
                    return Ok(());
                }

                if let Event::PhaseCompleted { next, cycle, .. } = engine.advance_cycle() {
                    info!(completed = %mode, %next, cycle, "phase completed");
                }
                notice = None;
                shown = engine.get_state().seconds_left;
                draw_countdown(term, engine, shown, None)?;
                last_tick = Instant::now();
            }
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_key(
    key: KeyEvent,
    engine: &mut Engine,
    term: &mut Terminal,
    notice: &mut Option<String>,
) -> Result<Flow> {
    if engine.get_state().in_config_menu {
        return Ok(Flow::Continue);
    }
    if is_interrupt(&key) {
        return Ok(Flow::Quit);
    }
    match key.code {
        KeyCode::Char('q') => return Ok(Flow::Quit),
        KeyCode::Char('p') => {
            engine.toggle_pause();
            *notice = None;
        }
        KeyCode::Char('c') => {
            *notice = menu::run(engine, term)?;
        }
        _ => {}
    }
    Ok(Flow::Continue)
}

/// Block until the user acknowledges the end of a phase.
/// Returns `false` if they chose to quit instead.
fn wait_for_ack() -> Result<bool> {
    loop {
        if let TermEvent::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_interrupt(&key) {
                return Ok(false);
            }
            match key.code {
                KeyCode::Enter => return Ok(true),
                KeyCode::Char('q') => return Ok(false),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_is_an_interrupt_but_plain_c_is_not() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(is_interrupt(&ctrl_c));
        assert!(!is_interrupt(&plain_c));
    }
}
