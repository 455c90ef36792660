use std::{path::PathBuf, sync::LazyLock};

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const RUN_PREFIX: &str = "run";
pub const DASHBOARD_PREFIX: &str = "dashboard";

const KEPT_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "debug";

/// Logging setup collected from command line flags.
#[derive(Debug)]
pub struct LogSettings {
    /// Log file prefix, one per subcommand.
    pub prefix: &'static str,
    pub dir: PathBuf,
    /// Falls back to `RUST_LOG`, then to debug.
    pub level: Option<LevelFilter>,
    /// Mirror logs to stderr. Off by default, the session owns the terminal.
    pub console: bool,
}

/// Logs go into daily rotated files inside [LogSettings::dir]. Only this crate's events pass.
pub fn enable_logging(settings: LogSettings) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(settings.prefix)
        .build(&settings.dir)?;

    let console = settings.console;
    let stderr = std::io::stderr.with_filter(move |_| console);

    let level = settings
        .level
        .map(|v| v.to_string())
        .or_else(|| std::env::var("RUST_LOG").ok());

    tracing_subscriber::fmt()
        .with_env_filter(crate_filter(level.as_deref())?)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .with_writer(stderr.and(appender))
        .try_init()
        .map_err(|e| anyhow!("Couldn't install logger {e}"))
}

fn crate_filter(level: Option<&str>) -> Result<EnvFilter> {
    let directive = format!(
        "{}={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        level.unwrap_or(DEFAULT_LEVEL)
    );
    Ok(EnvFilter::try_new(directive)?)
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
