use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::utils::clock::Clock;

use super::ledger::{Ledger, Session};

/// Invalid state transitions. None of them are fatal, the operation is just ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("Timer is already running!")]
    AlreadyRunning,
    #[error("No timer is running!")]
    NotRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running {
        started_at: DateTime<Utc>,
        session_started_at: DateTime<Utc>,
    },
}

/// Read-only view of a running timer. It's handed to the status ticker, which can compute live
/// elapsed time without access to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSession {
    started_at: DateTime<Utc>,
}

impl LiveSession {
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).max(Duration::zero())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled {
    Started(DateTime<Utc>),
    Stopped(Session),
}

/// Start/stop timer that commits every finished session into the [Ledger].
pub struct Engine {
    clock: Arc<dyn Clock>,
    state: TimerState,
    ledger: Ledger,
    total_all_time: Duration,
}

impl Engine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            ledger: Ledger::new(),
            total_all_time: Duration::zero(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn start(&mut self) -> Result<DateTime<Utc>, TimerError> {
        if self.is_running() {
            debug!("Ignoring start, timer is already running");
            return Err(TimerError::AlreadyRunning);
        }

        let now = self.clock.time();
        self.ledger.record_mut(self.clock.date_of(now));
        self.state = TimerState::Running {
            started_at: now,
            session_started_at: now,
        };
        info!("Timer started at {now}");
        Ok(now)
    }

    /// Commits the running session. The session goes to the day on which it was stopped, even
    /// if it started the day before.
    pub fn stop(&mut self) -> Result<Session, TimerError> {
        let TimerState::Running {
            session_started_at, ..
        } = self.state
        else {
            debug!("Ignoring stop, timer is not running");
            return Err(TimerError::NotRunning);
        };

        let now = self.clock.time();
        if now < session_started_at {
            warn!(
                "Clock went backwards by {}ms, clamping session",
                (session_started_at - now).num_milliseconds()
            );
        }
        let session = Session::between(session_started_at, now);
        let elapsed = session.duration;

        self.total_all_time = self
            .total_all_time
            .checked_add(&elapsed)
            .unwrap_or(Duration::MAX);

        let day = self.clock.date_of(now);
        self.ledger.record_mut(day).push(session.clone());
        self.state = TimerState::Idle;

        info!("Timer stopped, {}ms added to {day}", elapsed.num_milliseconds());
        Ok(session)
    }

    pub fn toggle(&mut self) -> Result<Toggled, TimerError> {
        if self.is_running() {
            self.stop().map(Toggled::Stopped)
        } else {
            self.start().map(Toggled::Started)
        }
    }

    pub fn live_session(&self) -> Option<LiveSession> {
        match self.state {
            TimerState::Running { started_at, .. } => Some(LiveSession { started_at }),
            TimerState::Idle => None,
        }
    }

    /// Live elapsed time of the running session. Doesn't affect the ledger.
    pub fn elapsed_since_start(&self) -> Option<Duration> {
        self.live_session()
            .map(|live| live.elapsed_at(self.clock.time()))
    }

    /// Sum of sessions committed since this engine was created.
    pub fn total_all_time(&self) -> Duration {
        self.total_all_time
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn serialize(&self) -> Ledger {
        self.ledger.clone()
    }

    pub fn restore(&mut self, ledger: Ledger) {
        debug!("Restoring ledger with {} records", ledger.len());
        self.ledger = ledger;
    }
}
