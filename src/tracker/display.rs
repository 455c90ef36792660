//! Contracts the tracker uses to talk to the user. Terminal implementations live in
//! [crate::cli::terminal].

use chrono::Duration;

use crate::utils::time::format_minutes_seconds;

/// Persistent status indicator, the equivalent of a status bar.
#[cfg_attr(test, mockall::automock)]
pub trait StatusDisplay: Send + Sync {
    fn show_time(&self, text: &str);

    /// Updates start/stop affordance.
    fn show_control(&self, running: bool);
}

/// Short, non-fatal messages for the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, message: &str);
}

pub fn status_text(elapsed: Duration) -> String {
    format!("Programming Time: {}", format_minutes_seconds(elapsed))
}
