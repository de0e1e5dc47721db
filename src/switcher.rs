//! [`DesktopSwitcher`] implementation that runs an external command.
//!
//! The command line is the `switchDesktop` variable with the desktop's
//! `value` appended verbatim, split on whitespace.  For
//! `switchDesktop = "wmctrl -s "` and value `2` that is `wmctrl -s 2`.
//! No separator is inserted, so the prefix should end in a space unless the
//! value is meant to be glued onto the last token.

use crate::command::CommandLine;
use crate::traits::DesktopSwitcher;
use log::{debug, info};
use std::process::Stdio;

/// Errors from running the switch command.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error("switch command for desktop {0:?} is empty")]
    Empty(String),
    #[error("cannot start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` failed: {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Switches desktops by running `<prefix><value>` and waiting for it.
#[derive(Debug, Clone)]
pub struct CommandSwitcher {
    prefix: String,
}

impl CommandSwitcher {
    /// Create a switcher from the `switchDesktop` variable.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The argv used to switch to `value`, or `None` if it has no tokens.
    pub fn command_for(&self, value: &str) -> Option<CommandLine> {
        CommandLine::parse(&format!("{}{}", self.prefix, value))
    }
}

impl DesktopSwitcher for CommandSwitcher {
    type Error = SwitchError;

    fn switch_to(&self, value: &str) -> Result<(), Self::Error> {
        let command = self
            .command_for(value)
            .ok_or_else(|| SwitchError::Empty(value.to_string()))?;
        info!("switching desktop: {}", command);

        let status = command
            .to_process()
            .stdin(Stdio::null())
            .status()
            .map_err(|source| SwitchError::Spawn {
                command: command.to_string(),
                source,
            })?;
        debug!("`{}` exited with {}", command, status);

        if status.success() {
            Ok(())
        } else {
            Err(SwitchError::Failed {
                command: command.to_string(),
                status,
            })
        }
    }
}
