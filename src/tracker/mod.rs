//! Timer, ledger and streak logic plus the [Tracker] that ties them to storage and to the user.

pub mod display;
pub mod engine;
pub mod ledger;
pub mod streak;
pub mod ticker;

use std::{sync::Arc, time::Duration};

use chrono::DateTime;
use chrono::Utc;
use display::{status_text, Notifier, StatusDisplay};
use engine::{Engine, TimerState, Toggled};
use ledger::Session;
use ticker::{StatusTicker, TickerHandle};
use tracing::{error, info, instrument, warn};

use crate::{
    render::DashboardView,
    storage::{
        ledger_store::{load_ledger, save_ledger},
        state_store::StateStore,
    },
    utils::{clock::Clock, time::format_minutes_seconds},
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Number of days listed in the recent activity part of the dashboard.
pub const RECENT_RECORDS_LIMIT: usize = 10;

/// Entry point for user actions. Owns the single [Engine] of the application together with the
/// collaborators every action needs.
pub struct Tracker<S: StateStore> {
    engine: Engine,
    store: S,
    clock: Arc<dyn Clock>,
    display: Arc<dyn StatusDisplay>,
    notifier: Box<dyn Notifier>,
    ticker: Option<TickerHandle>,
    tick_interval: Duration,
}

impl<S: StateStore> Tracker<S> {
    /// Loads previously stored ledger and resets the status display.
    pub async fn initialize(
        store: S,
        clock: Arc<dyn Clock>,
        display: Arc<dyn StatusDisplay>,
        notifier: Box<dyn Notifier>,
        tick_interval: Duration,
    ) -> Self {
        let mut engine = Engine::new(clock.clone());
        engine.restore(load_ledger(&store).await);
        info!("Tracker initialized with {} days", engine.ledger().len());

        display.show_time(&status_text(chrono::Duration::zero()));
        display.show_control(false);

        Self {
            engine,
            store,
            clock,
            display,
            notifier,
            ticker: None,
            tick_interval,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    #[instrument(skip(self))]
    pub fn start(&mut self) {
        match self.engine.start() {
            Ok(at) => self.on_started(at),
            Err(e) => self.notifier.notify(&e.to_string()),
        }
    }

    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        match self.engine.stop() {
            Ok(session) => self.on_stopped(session).await,
            Err(e) => self.notifier.notify(&e.to_string()),
        }
    }

    #[instrument(skip(self))]
    pub async fn toggle(&mut self) {
        match self.engine.toggle() {
            Ok(Toggled::Started(at)) => self.on_started(at),
            Ok(Toggled::Stopped(session)) => self.on_stopped(session).await,
            Err(e) => self.notifier.notify(&e.to_string()),
        }
    }

    pub fn show_total(&self) {
        self.notifier.notify(&format!(
            "Total programming time: {}",
            format_minutes_seconds(self.engine.total_all_time())
        ));
    }

    /// Snapshot for the dashboard. Computed anew on every call.
    pub fn dashboard(&self) -> DashboardView {
        DashboardView::build(self.engine.ledger(), self.clock.today(), RECENT_RECORDS_LIMIT)
    }

    /// Stops the ticker. A running session is committed, so its time isn't lost.
    pub async fn shutdown(mut self) {
        if let TimerState::Running { started_at, .. } = self.engine.state() {
            warn!("Shutting down with a timer running since {started_at}, stopping it");
            self.stop().await;
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel().await;
        }
        info!("Tracker shut down");
    }

    fn on_started(&mut self, at: DateTime<Utc>) {
        let Some(session) = self.engine.live_session() else {
            error!("Engine reported start at {at} but isn't running");
            return;
        };
        let ticker = StatusTicker::new(
            self.display.clone(),
            self.clock.clone(),
            session,
            self.tick_interval,
        );
        // Replacing a stale handle cancels it
        self.ticker = Some(ticker.spawn());
        self.display.show_control(true);
        self.notifier.notify("Programming timer started!");
    }

    async fn on_stopped(&mut self, session: Session) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel().await;
        }

        self.display
            .show_time(&status_text(self.engine.total_all_time()));
        self.display.show_control(false);
        self.notifier.notify(&format!(
            "Timer stopped! Elapsed time: {}",
            format_minutes_seconds(session.duration)
        ));

        self.persist().await;
    }

    /// Best effort. Failures are only logged.
    async fn persist(&self) {
        if let Err(e) = save_ledger(&self.store, self.engine.ledger()).await {
            error!("Failed to save coding data {e:?}");
        }
    }
}
