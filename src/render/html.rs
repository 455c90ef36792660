use std::fmt::Write;

use crate::utils::time::format_minutes_seconds;

use super::{sessions_label, DashboardView};

/// Renders a standalone dashboard page.
pub fn render_dashboard(view: &DashboardView) -> String {
    let snapshot = &view.snapshot;

    let mut cells = String::new();
    for day in &snapshot.last_7_days {
        let activity = if day.coded {
            format!("{} coding", format_minutes_seconds(day.time))
        } else {
            "No coding activity".to_string()
        };
        let _ = write!(
            cells,
            r#"
                <div class="day-cell{coded}" data-date="{date}">
                    <div class="day-label">{weekday}</div>
                    <div class="day-tooltip">
                        <div class="tooltip-date">{long_date}</div>
                        <div>{activity}</div>
                    </div>
                </div>"#,
            coded = if day.coded { " coded" } else { "" },
            date = day.date.format("%Y-%m-%d"),
            weekday = day.date.format("%a"),
            long_date = day.date.format("%b %-d, %Y"),
        );
    }

    let month_labels = match (snapshot.last_7_days.first(), snapshot.last_7_days.last()) {
        (Some(first), Some(last)) => format!(
            "<span>{}</span><span>{}</span>",
            first.date.format("%b"),
            last.date.format("%b")
        ),
        _ => String::new(),
    };

    let mut recent = String::new();
    for day in &view.recent {
        let _ = write!(
            recent,
            r#"
                <div class="activity-item">
                    <div class="activity-icon"></div>
                    <div class="activity-content">
                        <div class="activity-title">Coding session on {date}</div>
                        <div class="activity-meta">{sessions}</div>
                    </div>
                    <div class="activity-time">{time}</div>
                </div>"#,
            date = day.date.format("%b %-d, %Y"),
            sessions = sessions_label(day.session_count),
            time = format_minutes_seconds(day.total_time),
        );
    }
    if view.recent.is_empty() {
        recent.push_str(r#"<div class="activity-meta">Nothing recorded yet</div>"#);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Coding Streak Dashboard</title>
    <style>{DASHBOARD_STYLE}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div class="title">Programming Time Tracker</div>
            <p class="description">Track your coding streaks and keep consistency in your programming journey</p>
        </div>
        <div class="stats-grid">
            <div class="stat-card">
                <div class="stat-number">{current}</div>
                <div class="stat-label">Current streak</div>
            </div>
            <div class="stat-card">
                <div class="stat-number">{longest}</div>
                <div class="stat-label">Longest streak</div>
            </div>
            <div class="stat-card">
                <div class="stat-number">{total}</div>
                <div class="stat-label">Total recorded</div>
            </div>
        </div>
        <div class="section">
            <div class="section-header">Last 7 days</div>
            <div class="contribution-grid">{cells}
            </div>
            <div class="month-labels">{month_labels}</div>
        </div>
        <div class="section">
            <div class="section-header">Recent coding sessions</div>
            <div class="activity-list">{recent}
            </div>
        </div>
    </div>
</body>
</html>
"#,
        current = snapshot.current_streak,
        longest = snapshot.longest_streak,
        total = format_minutes_seconds(view.total_recorded),
    )
}

const DASHBOARD_STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            font-size: 14px;
            line-height: 1.5;
            background-color: #0d1117;
            color: #e6edf3;
            margin: 0;
            padding: 20px;
        }
        .container { max-width: 1000px; margin: 0 auto; }
        .header { border-bottom: 1px solid #30363d; padding-bottom: 16px; margin-bottom: 24px; }
        .title { font-size: 24px; font-weight: 600; }
        .description { color: #8b949e; margin: 8px 0 0 0; }
        .stats-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 16px;
            margin-bottom: 24px;
        }
        .stat-card, .section {
            background-color: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 16px;
        }
        .stat-card { text-align: center; }
        .stat-number { font-size: 48px; font-weight: 300; color: #58a6ff; line-height: 1.25; }
        .stat-label {
            font-size: 12px;
            color: #8b949e;
            text-transform: uppercase;
            letter-spacing: 0.5px;
            font-weight: 600;
        }
        .section { margin-bottom: 24px; }
        .section-header { font-size: 14px; font-weight: 600; margin-bottom: 16px; }
        .contribution-grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 4px; max-width: 600px; }
        .day-cell {
            height: 24px;
            border-radius: 4px;
            background-color: #21262d;
            border: 1px solid #30363d;
            position: relative;
            cursor: pointer;
        }
        .day-cell.coded { background-color: #39d353; border-color: #26a641; }
        .day-label { font-size: 10px; color: #8b949e; text-align: center; margin-top: 26px; }
        .day-tooltip {
            position: absolute;
            bottom: 100%;
            left: 50%;
            transform: translateX(-50%);
            background-color: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 8px 12px;
            font-size: 12px;
            white-space: nowrap;
            opacity: 0;
            pointer-events: none;
            transition: opacity 0.2s ease;
            z-index: 1000;
        }
        .day-cell:hover .day-tooltip { opacity: 1; }
        .tooltip-date { font-weight: 600; margin-bottom: 4px; }
        .month-labels {
            display: flex;
            justify-content: space-between;
            max-width: 600px;
            margin-top: 24px;
            font-size: 11px;
            color: #8b949e;
        }
        .activity-list { max-height: 300px; overflow-y: auto; }
        .activity-item { display: flex; align-items: center; padding: 8px 0; border-bottom: 1px solid #21262d; }
        .activity-item:last-child { border-bottom: none; }
        .activity-icon {
            width: 16px;
            height: 16px;
            border-radius: 50%;
            background-color: #39d353;
            margin-right: 12px;
            flex-shrink: 0;
        }
        .activity-content { flex: 1; }
        .activity-title { font-size: 12px; }
        .activity-meta, .activity-time { font-size: 11px; color: #8b949e; }
    "#;
