//! Text views for the countdown, the expiry prompt, the config menu and
//! the statistics box.
//!
//! Views are plain lines; colour is applied per line after the box is laid
//! out so padding is computed on visible characters only.

use crossterm::style::Stylize;
use tomate_core::format::{format_clock, format_hms, format_min_sec};
use tomate_core::{Config, MetricsStats, Mode, Session, TimerState};

const PADDING: usize = 2;

/// Surround `lines` with a rounded box, optionally titled.
pub fn framed(title: Option<&str>, lines: &[String]) -> Vec<String> {
    let title_len = title.map(|t| t.chars().count() + 2).unwrap_or(0);
    let inner = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title_len)
        + PADDING * 2;

    let top = match title {
        Some(t) => {
            let label = format!(" {t} ");
            let left = (inner - label.chars().count()) / 2;
            let right = inner - label.chars().count() - left;
            format!("╭{}{label}{}╮", "─".repeat(left), "─".repeat(right))
        }
        None => format!("╭{}╮", "─".repeat(inner)),
    };
    let blank = format!("│{}│", " ".repeat(inner));

    let mut out = vec![top, blank.clone()];
    for line in lines {
        let fill = inner - PADDING - line.chars().count();
        out.push(format!("│{}{line}{}│", " ".repeat(PADDING), " ".repeat(fill)));
    }
    out.push(blank);
    out.push(format!("╰{}╯", "─".repeat(inner)));
    out
}

fn mode_line(mode: Mode, seconds_left: i64) -> String {
    format!("{} {}", mode.label(), format_clock(seconds_left))
}

/// The running countdown.
pub fn countdown(state: &TimerState, shown: i64, notice: Option<&str>) -> Vec<String> {
    let mut head = mode_line(state.current_mode, shown);
    if state.is_paused {
        head.push_str(" [PAUSED]");
    }
    let body = vec![
        head,
        format!("Pomodoros completed: {}", state.current_cycle),
        String::new(),
        "[p]ause   [q]uit   [c]onfig".to_string(),
    ];

    let mut out: Vec<String> = framed(None, &body)
        .into_iter()
        .map(|l| l.cyan().to_string())
        .collect();
    if let Some(text) = notice {
        out.push(String::new());
        out.push(text.to_string());
    }
    out
}

/// Shown at zero while waiting for the user to acknowledge the end of a phase.
pub fn expired(state: &TimerState) -> Vec<String> {
    let (next, _) = state.current_mode.next(state.current_cycle);
    let body = vec![
        mode_line(state.current_mode, 0),
        String::new(),
        "Time's up!".to_string(),
        format!("[Enter] start {}   [q]uit", next.label()),
    ];
    framed(None, &body)
        .into_iter()
        .map(|l| l.green().to_string())
        .collect()
}

/// Current values and choices of the config menu.
pub fn config_menu(config: &Config) -> Vec<String> {
    let body = vec![
        "Current Values:".to_string(),
        format!("Pomodoro:    {}", format_clock(config.pomodoro.into())),
        format!("Short Break: {}", format_clock(config.short_break.into())),
        format!("Long Break:  {}", format_clock(config.long_break.into())),
        String::new(),
        "[1] Set Pomodoro".to_string(),
        "[2] Set Short Break".to_string(),
        "[3] Set Long Break".to_string(),
        "[q] Back to Timer".to_string(),
    ];
    framed(Some("Configure Pomodoro Timers"), &body)
        .into_iter()
        .map(|l| l.green().to_string())
        .collect()
}

/// The statistics box printed by `tomate stats`.
pub fn stats(stats: &MetricsStats, last: Option<&Session>) -> Vec<String> {
    let mut body = vec![
        format!("Total Pomodoros: {}", stats.total_pomodoros),
        format!("Total Pomodoro Time: {}", format_hms(stats.total_pomodoro_secs)),
        String::new(),
    ];
    if stats.total_pomodoros > 0 {
        body.push(format!(
            "Average Pomodoro Duration: {}",
            format_min_sec(stats.avg_pomodoro_secs)
        ));
    }
    body.push(format!("Total Breaks Time: {}", format_hms(stats.total_break_secs)));
    body.push(format!("Short Breaks: {}", stats.total_short_breaks));
    if stats.total_short_breaks > 0 {
        body.push(format!(
            "Average Short Break Duration: {}",
            format_min_sec(stats.avg_short_break_secs)
        ));
    }
    body.push(format!("Long Breaks: {}", stats.total_long_breaks));
    if stats.total_long_breaks > 0 {
        body.push(format!(
            "Average Long Break Duration: {}",
            format_min_sec(stats.avg_long_break_secs)
        ));
    }
    if let Some(session) = last {
        let local = session.end.with_timezone(&chrono::Local);
        body.push(String::new());
        body.push(format!(
            "Last session: {} ({})",
            local.format("%Y-%m-%d %H:%M"),
            session.mode.label()
        ));
    }
    framed(Some("Pomodoro Statistics"), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framed_lines_share_one_width() {
        let lines = framed(Some("Title"), &["a".to_string(), "longer line".to_string()]);
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(lines[0].contains(" Title "));
        assert!(lines[0].starts_with('╭'));
        assert!(lines.last().unwrap().starts_with('╰'));
    }

    #[test]
    fn title_wider_than_content_widens_the_box() {
        let lines = framed(Some("A very long title indeed"), &["x".to_string()]);
        assert!(lines[2].chars().count() >= "A very long title indeed".len() + 2);
    }

    #[test]
    fn countdown_marks_pause_and_notice() {
        let mut state = TimerState::initial(Config::default());
        state.is_paused = true;
        let lines = countdown(&state, 1500, Some("Updated pomodoro"));
        assert!(lines.iter().any(|l| l.contains("Pomodoro 00:25:00 [PAUSED]")));
        assert_eq!(lines.last().unwrap(), "Updated pomodoro");
    }

    #[test]
    fn expired_announces_next_phase() {
        let mut state = TimerState::initial(Config::default());
        state.current_cycle = 3;
        let lines = expired(&state);
        assert!(lines.iter().any(|l| l.contains("start Long Break")));
    }

    #[test]
    fn stats_hide_averages_without_sessions() {
        let lines = stats(&MetricsStats::default(), None);
        assert!(lines.iter().any(|l| l.contains("Total Pomodoros: 0")));
        assert!(!lines.iter().any(|l| l.contains("Average")));
    }
}
