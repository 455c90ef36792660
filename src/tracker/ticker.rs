use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, trace};

use crate::utils::clock::Clock;

use super::{
    display::{status_text, StatusDisplay},
    engine::LiveSession,
};

/// Periodically shows live elapsed time of a running session.
pub struct StatusTicker {
    display: Arc<dyn StatusDisplay>,
    clock: Arc<dyn Clock>,
    session: LiveSession,
    frequency: Duration,
}

impl StatusTicker {
    pub fn new(
        display: Arc<dyn StatusDisplay>,
        clock: Arc<dyn Clock>,
        session: LiveSession,
        frequency: Duration,
    ) -> Self {
        Self {
            display,
            clock,
            session,
            frequency,
        }
    }

    pub fn spawn(self) -> TickerHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(self.run(token.clone()));
        TickerHandle {
            task,
            guard: token.drop_guard(),
        }
    }

    async fn run(self, shutdown: CancellationToken) {
        let mut tick_point = self.clock.instant();
        loop {
            tick_point += self.frequency;

            let elapsed = self.session.elapsed_at(self.clock.time());
            trace!("Tick {}ms", elapsed.num_milliseconds());
            self.display.show_time(&status_text(elapsed));

            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Status ticker cancelled");
                    return
                }
                _ = self.clock.sleep_until(tick_point) => ()
            }
        }
    }
}

/// Owns a running [StatusTicker]. Dropping the handle cancels the ticker.
pub struct TickerHandle {
    task: JoinHandle<()>,
    guard: DropGuard,
}

impl TickerHandle {
    /// Cancels the ticker and waits until it can no longer touch the display.
    pub async fn cancel(self) {
        let TickerHandle { task, guard } = self;
        drop(guard);
        if let Err(e) = task.await {
            error!("Status ticker ended abnormally {e:?}");
        }
    }
}
