//! Command lines and the types shared by every component.
//!
//! This module defines the vocabulary that all components share:
//! [`CommandLine`] is the explicit argv every external process is started
//! with, and [`Desktop`] / [`DesktopProgram`] mirror the rows the
//! [`ConfigStore`](crate::traits::ConfigStore) hands out.
//!
//! Command strings from the store are split on whitespace.  There is **no**
//! quoting support: a path or argument containing a space can not be passed
//! as a single argv entry.

use std::fmt;
use std::process;

/// Name of the variable holding the desktop-switch command prefix.
pub const SWITCH_DESKTOP: &str = "switchDesktop";

/// Name of the variable overriding the default wait between desktops.
pub const WAIT_BEFORE_SWITCH_DESKTOP: &str = "waitBeforeSwitchDesktop";

/// An explicit argument vector: a program followed by its arguments.
///
/// Always holds at least one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Split `line` on whitespace.
    ///
    /// Returns `None` when the line has no tokens at all.
    pub fn parse(line: &str) -> Option<Self> {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    /// The executable (first token).
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Everything after the executable.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// Build a [`process::Command`] for this argv.  No shell is involved.
    pub fn to_process(&self) -> process::Command {
        let mut cmd = process::Command::new(self.program());
        cmd.args(self.args());
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// An active row of the `desktops` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desktop {
    /// Unique name, used on the command line and by programs.
    pub name: String,
    /// Token appended to the switch command.
    pub value: String,
    /// Seconds to wait after this desktop.  `0` means "use the default".
    pub wait_seconds: u64,
}

/// An active row of the `desktopCommands` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopProgram {
    /// Whitespace-separated command line.
    pub command: String,
    /// Log file pattern; `%T` is replaced by the launch time.  `None` or an
    /// empty string discards the output.
    pub log_dir: Option<String>,
    /// Working directory for the child.  `None` inherits ours.
    pub work_dir: Option<String>,
}
