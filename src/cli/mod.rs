pub mod action;
pub mod dashboard;
pub mod session;
pub mod shutdown;
pub mod terminal;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dashboard::{process_dashboard_command, DashboardCommand};
use session::run_session;
use tracing::level_filters::LevelFilter;

use crate::utils::{
    dir::create_application_default_path,
    logging::{enable_logging, LogSettings, DASHBOARD_PREFIX, RUN_PREFIX},
};

#[derive(Parser, Debug)]
#[command(name = "Codestreak", version, long_about = None)]
#[command(about = "Track time spent coding and keep your streak going", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Mirror logs to stderr")]
    log: bool,
    #[arg(long = "log-filter", help = "Log level. Defaults to RUST_LOG or debug")]
    log_filter: Option<LevelFilter>,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(
        about = "Start an interactive session. Type `help` inside of it to see available commands"
    )]
    Run {},
    #[command(about = "Show current and longest streak together with recent activity")]
    Dashboard {
        #[command(flatten)]
        command: DashboardCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            dir
        }
        None => create_application_default_path()?,
    };

    let prefix = match args.commands {
        Commands::Run {} => RUN_PREFIX,
        Commands::Dashboard { .. } => DASHBOARD_PREFIX,
    };
    enable_logging(LogSettings {
        prefix,
        dir: app_dir.join("logs"),
        level: args.log_filter,
        console: args.log,
    })?;

    match args.commands {
        Commands::Run {} => run_session(app_dir).await,
        Commands::Dashboard { command } => process_dashboard_command(app_dir, command).await,
    }
}
