use std::fmt::Write;

use ansi_term::{Colour, Style};

use crate::utils::time::format_minutes_seconds;

use super::{sessions_label, DashboardView};

const CODED_CELL: &str = "■";
const EMPTY_CELL: &str = "□";

/// Renders the dashboard for a terminal. Colors are only applied when `colored` is set.
pub fn render_dashboard(view: &DashboardView, colored: bool) -> String {
    let paint = |style: Style, text: &str| {
        if colored {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    };
    let bold = Style::new().bold();
    let dimmed = Style::new().dimmed();
    let coded = Colour::Green.bold();

    let mut out = String::new();
    // Writing into a String can't fail
    let _ = writeln!(out, "{}", paint(bold, "Programming Time Tracker"));
    let _ = writeln!(out);
    let _ = writeln!(out, "Current streak: {}", view.snapshot.current_streak);
    let _ = writeln!(out, "Longest streak: {}", view.snapshot.longest_streak);
    let _ = writeln!(
        out,
        "Total recorded: {}",
        format_minutes_seconds(view.total_recorded)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", paint(bold, "Last 7 days"));
    let days = &view.snapshot.last_7_days;
    let weekdays = days
        .iter()
        .map(|d| format!("{:<4}", d.date.format("%a").to_string()))
        .collect::<String>();
    let cells = days
        .iter()
        .map(|d| {
            if d.coded {
                format!("{}   ", paint(coded, CODED_CELL))
            } else {
                format!("{}   ", paint(dimmed, EMPTY_CELL))
            }
        })
        .collect::<String>();
    let _ = writeln!(out, "{}", weekdays.trim_end());
    let _ = writeln!(out, "{}", cells.trim_end());
    if let (Some(first), Some(last)) = (days.first(), days.last()) {
        let _ = writeln!(
            out,
            "{}",
            paint(
                dimmed,
                &format!("{} .. {}", first.date.format("%b %-d"), last.date.format("%b %-d"))
            )
        );
    }
    for day in days.iter().filter(|d| d.coded) {
        let _ = writeln!(
            out,
            "  {}  {} coding",
            day.date.format("%Y-%m-%d"),
            format_minutes_seconds(day.time)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", paint(bold, "Recent coding sessions"));
    if view.recent.is_empty() {
        let _ = writeln!(out, "  {}", paint(dimmed, "Nothing recorded yet"));
    }
    for day in &view.recent {
        let _ = writeln!(
            out,
            "  {}  {:<12} {}",
            day.date.format("%Y-%m-%d"),
            sessions_label(day.session_count),
            format_minutes_seconds(day.total_time)
        );
    }
    out
}
