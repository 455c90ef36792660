use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    render::{html, terminal::render_dashboard},
    storage::{state_store::JsonFileStore, state_store::StateStore, STATE_FILE_NAME},
    tracker::{Tracker, DEFAULT_TICK_INTERVAL},
    utils::clock::DefaultClock,
};

use super::{
    action::{SessionAction, SESSION_HELP},
    shutdown::detect_shutdown,
    terminal::{TerminalNotifier, TerminalStatus},
};

/// Runs an interactive session until `quit`, end of input or Ctrl-C.
pub async fn run_session(app_dir: PathBuf) -> Result<()> {
    let store = JsonFileStore::new(app_dir.join(STATE_FILE_NAME))?;
    let status = Arc::new(TerminalStatus::new());

    let tracker = Tracker::initialize(
        store,
        Arc::new(DefaultClock),
        status.clone(),
        Box::new(TerminalNotifier),
        DEFAULT_TICK_INTERVAL,
    )
    .await;

    let shutdown_token = CancellationToken::new();
    let signals = tokio::spawn(detect_shutdown(shutdown_token.clone()));

    status.clear();
    println!("Type `help` to see available commands");
    status.refresh();

    let input = spawn_stdin_reader()?;
    let result = drive_session(tracker, input, &status, shutdown_token.clone()).await;

    shutdown_token.cancel();
    if let Err(e) = signals.await {
        error!("Signal listener ended abnormally {e:?}");
    }
    status.clear();
    result
}

/// Reads stdin lines on a plain thread. A blocking stdin read can't be cancelled, and on a
/// runtime thread it would keep the process alive after Ctrl-C until the next line arrives.
/// The channel closes on end of input or after the first read error.
fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<io::Result<String>>> {
    let (sender, receiver) = mpsc::channel(10);
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if sender.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(receiver)
}

/// Feeds actions received from `input` into the tracker. Shuts the tracker down on exit.
async fn drive_session<S: StateStore>(
    mut tracker: Tracker<S>,
    mut input: mpsc::Receiver<io::Result<String>>,
    status: &TerminalStatus,
    shutdown: CancellationToken,
) -> Result<()> {
    let result: Result<()> = loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break Ok(()),
            line = input.recv() => line,
        };
        let line = match line {
            Some(Ok(line)) => line,
            None => {
                debug!("Input closed");
                break Ok(());
            }
            Some(Err(e)) => break Err(e.into()),
        };
        if line.trim().is_empty() {
            status.refresh();
            continue;
        }

        let action = match line.parse::<SessionAction>() {
            Ok(action) => action,
            Err(e) => {
                status.clear();
                println!("{e}. Type `help` to see available commands");
                status.refresh();
                continue;
            }
        };
        debug!("Received {action:?}");

        match action {
            SessionAction::Start => tracker.start(),
            SessionAction::Stop => tracker.stop().await,
            SessionAction::Toggle => tracker.toggle().await,
            SessionAction::ShowTotal => tracker.show_total(),
            SessionAction::Dashboard(None) => {
                status.clear();
                println!("{}", render_dashboard(&tracker.dashboard(), true));
            }
            SessionAction::Dashboard(Some(path)) => {
                let page = html::render_dashboard(&tracker.dashboard());
                status.clear();
                match tokio::fs::write(&path, page).await {
                    Ok(()) => println!("Dashboard written to {}", path.display()),
                    Err(e) => {
                        warn!("Failed to write dashboard into {path:?} {e:?}");
                        println!("Couldn't write dashboard into {}: {e}", path.display());
                    }
                }
            }
            SessionAction::Help => {
                status.clear();
                println!("{SESSION_HELP}");
            }
            SessionAction::Quit => break Ok(()),
        }
        status.refresh();
    };

    info!("Session finished");
    tracker.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Arc, time::Duration};

    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::{
        cli::terminal::TerminalStatus,
        storage::{ledger_store::load_ledger, state_store::tests::InMemoryStore},
        tracker::{display::MockNotifier, Tracker, DEFAULT_TICK_INTERVAL},
        utils::clock::test_clock::ManualClock,
    };

    use super::drive_session;

    const TEST_START_DATE: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    );

    async fn create_tracker(store: Arc<InMemoryStore>) -> Tracker<Arc<InMemoryStore>> {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().return_const(());
        Tracker::initialize(
            store,
            Arc::new(ManualClock::at(TEST_START_DATE)),
            Arc::new(TerminalStatus::new()),
            Box::new(notifier),
            DEFAULT_TICK_INTERVAL,
        )
        .await
    }

    fn lines(
        values: &[&str],
    ) -> (
        mpsc::Sender<io::Result<String>>,
        mpsc::Receiver<io::Result<String>>,
    ) {
        let (sender, receiver) = mpsc::channel(values.len() + 1);
        for value in values {
            sender.try_send(Ok(value.to_string())).unwrap();
        }
        (sender, receiver)
    }

    #[tokio::test]
    async fn test_session_commands() -> Result<()> {
        let store = Arc::new(InMemoryStore::default());
        let tracker = create_tracker(store.clone()).await;

        let (sender, input) = lines(&[
            "start", "", "bogus", "start", "stop", "stop", "toggle", "quit", "start",
        ]);
        drop(sender);
        drive_session(tracker, input, &TerminalStatus::new(), CancellationToken::new()).await?;

        // Second toggle started a timer that got committed on quit, the last start never ran
        let ledger = load_ledger(&store).await;
        let record = ledger.get(TEST_START_DATE.date()).unwrap();
        assert_eq!(record.sessions.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_session_ends_with_input() -> Result<()> {
        let store = Arc::new(InMemoryStore::default());
        let tracker = create_tracker(store.clone()).await;

        let (sender, input) = lines(&["start"]);
        drop(sender);
        drive_session(tracker, input, &TerminalStatus::new(), CancellationToken::new()).await?;

        assert_eq!(load_ledger(&store).await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_session_read_error() {
        let store = Arc::new(InMemoryStore::default());
        let tracker = create_tracker(store.clone()).await;

        let (sender, input) = lines(&["start"]);
        sender
            .try_send(Err(io::Error::other("stdin went away")))
            .unwrap();
        let result =
            drive_session(tracker, input, &TerminalStatus::new(), CancellationToken::new()).await;

        assert!(result.is_err());
        // Running timer is still committed
        assert_eq!(load_ledger(&store).await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_waiting_for_input() -> Result<()> {
        let store = Arc::new(InMemoryStore::default());
        let tracker = create_tracker(store.clone()).await;

        // Sender stays alive, so the session would wait for input forever
        let (_sender, input) = lines(&["start"]);
        let token = CancellationToken::new();
        let cancel = tokio::spawn({
            let token = token.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(3)).await;
                token.cancel();
            }
        });

        drive_session(tracker, input, &TerminalStatus::new(), token).await?;
        cancel.await?;

        let ledger = load_ledger(&store).await;
        assert_eq!(ledger.get(TEST_START_DATE.date()).unwrap().sessions.len(), 1);
        Ok(())
    }
}
