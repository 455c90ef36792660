use anyhow::Result;
use codestreak::cli::run_cli;
use tracing::error;

// Everything happens on one thread, the tracker isn't built for concurrent access.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    run_cli().await.inspect_err(|e| {
        error!("Error running cli {e:?}");
    })?;
    Ok(())
}
