use std::{path::PathBuf, str::FromStr};

use anyhow::anyhow;

/// Commands available inside of an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Start,
    Stop,
    Toggle,
    ShowTotal,
    /// Prints the dashboard, or writes it as an html page if a path is given.
    Dashboard(Option<PathBuf>),
    Help,
    Quit,
}

pub const SESSION_HELP: &str = "\
Commands:
  start              start the timer
  stop               stop the timer and save the session
  toggle | t         start or stop depending on the timer state
  total              show time tracked since the session began
  dashboard [PATH]   show streaks, or write them as an html page into PATH
  help               show this message
  quit | exit        stop the timer if needed and leave";

impl FromStr for SessionAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let argument = words.next();
        if words.next().is_some() {
            return Err(anyhow!("Too many arguments in `{s}`"));
        }

        let action = match (command.as_str(), argument) {
            ("start", None) => Self::Start,
            ("stop", None) => Self::Stop,
            ("toggle" | "t", None) => Self::Toggle,
            ("total", None) => Self::ShowTotal,
            ("dashboard" | "streak", path) => Self::Dashboard(path.map(PathBuf::from)),
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit" | "q", None) => Self::Quit,
            ("", None) => return Err(anyhow!("Empty command")),
            (_, Some(_)) if !command.is_empty() => {
                return Err(anyhow!("`{command}` doesn't take arguments"))
            }
            _ => return Err(anyhow!("Unknown command `{command}`")),
        };
        Ok(action)
    }
}
