use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::{
    render::{html, terminal, DashboardView},
    storage::{ledger_store::load_ledger, state_store::JsonFileStore, STATE_FILE_NAME},
    tracker::RECENT_RECORDS_LIMIT,
    utils::clock::{Clock, DefaultClock},
};

#[derive(Debug, Parser)]
pub struct DashboardCommand {
    #[arg(long, help = "Write the dashboard as an html page instead of printing it")]
    html: Option<PathBuf>,
    #[arg(long = "no-color", help = "Print without terminal colors")]
    no_color: bool,
}

/// Renders the dashboard from stored data. Only days finished with `stop` are visible here.
pub async fn process_dashboard_command(
    app_dir: PathBuf,
    DashboardCommand { html, no_color }: DashboardCommand,
) -> Result<()> {
    let store = JsonFileStore::new(app_dir.join(STATE_FILE_NAME))?;
    let ledger = load_ledger(&store).await;
    let view = DashboardView::build(&ledger, DefaultClock.today(), RECENT_RECORDS_LIMIT);

    match html {
        Some(path) => {
            tokio::fs::write(&path, html::render_dashboard(&view)).await?;
            info!("Dashboard written to {path:?}");
            println!("Dashboard written to {}", path.display());
        }
        None => print!("{}", terminal::render_dashboard(&view, !no_color)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        storage::{ledger_store::save_ledger, state_store::JsonFileStore, STATE_FILE_NAME},
        tracker::ledger::{Ledger, Session},
    };

    use super::{process_dashboard_command, DashboardCommand};

    fn coded_days(days: &[u32]) -> Ledger {
        let mut ledger = Ledger::new();
        for &d in days {
            let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
            let start =
                Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
            ledger
                .record_mut(date)
                .push(Session::between(start, start + Duration::minutes(30)));
        }
        ledger
    }

    #[tokio::test]
    async fn test_html_dashboard_from_stored_ledger() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path().join(STATE_FILE_NAME))?;
        save_ledger(&store, &coded_days(&[1, 2, 3, 5])).await?;

        let page = dir.path().join("dashboard.html");
        process_dashboard_command(
            dir.path().to_path_buf(),
            DashboardCommand {
                html: Some(page.clone()),
                no_color: true,
            },
        )
        .await?;

        let html = tokio::fs::read_to_string(&page).await?;
        assert!(html.contains("<title>Coding Streak Dashboard</title>"));
        assert!(html.contains("Coding session on Jan 5, 2024"));
        assert!(html.contains("Coding session on Jan 1, 2024"));
        // Jan 5 stands alone, Jan 1-3 is the longest run
        assert!(html.contains(r#"<div class="stat-number">1</div>"#));
        assert!(html.contains(r#"<div class="stat-number">3</div>"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_dashboard_without_state() -> Result<()> {
        let dir = tempdir()?;
        process_dashboard_command(
            dir.path().join("fresh"),
            DashboardCommand {
                html: None,
                no_color: true,
            },
        )
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_html_into_missing_directory_fails() -> Result<()> {
        let dir = tempdir()?;
        let result = process_dashboard_command(
            dir.path().to_path_buf(),
            DashboardCommand {
                html: Some(dir.path().join("missing").join("dashboard.html")),
                no_color: true,
            },
        )
        .await;
        assert!(result.is_err());
        Ok(())
    }
}
