//! [`ProgramLauncher`] implementation that spawns detached OS processes.
//!
//! Every program gets its stdout **and** stderr redirected to one log file
//! (or to the null device), its working directory set, and its own process
//! group so it is not tied to the launcher's terminal.  The launcher never
//! blocks on a child: it only collects the exit status of children that have
//! already finished (see [`ProgramLauncher::reap`]), so short-lived programs
//! do not linger as zombies for the rest of the run.

use crate::command::{CommandLine, DesktopProgram};
use crate::traits::ProgramLauncher;
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::fs::File;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Child, Stdio};

/// Placeholder in `logDir` replaced by the launch time.
pub const TIME_PLACEHOLDER: &str = "%T";

/// `strftime` format of the launch time (`2024-03-02_14:05`).
pub const TIME_FORMAT: &str = "%Y-%m-%d_%H:%M";

/// Errors from starting a program.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("program command is empty")]
    Empty,
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

/// Where a program's output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// The null device.
    Discard,
    /// A file, truncated on open.
    File(PathBuf),
}

impl LogTarget {
    /// Resolve a `logDir` pattern at time `now`.
    pub fn resolve(log_dir: Option<&str>, now: NaiveDateTime) -> Self {
        match log_dir {
            None | Some("") => LogTarget::Discard,
            Some(pattern) => {
                let stamp = now.format(TIME_FORMAT).to_string();
                LogTarget::File(PathBuf::from(pattern.replace(TIME_PLACEHOLDER, &stamp)))
            }
        }
    }

    /// Stdout and stderr handles for a child.
    fn open(&self) -> Result<(Stdio, Stdio), LaunchError> {
        match self {
            LogTarget::Discard => Ok((Stdio::null(), Stdio::null())),
            LogTarget::File(path) => {
                let to_err = |source| LaunchError::LogFile {
                    path: path.clone(),
                    source,
                };
                let out = File::create(path).map_err(to_err)?;
                let err = out.try_clone().map_err(to_err)?;
                Ok((Stdio::from(out), Stdio::from(err)))
            }
        }
    }
}

/// Starts programs as detached child processes.
#[derive(Debug, Default)]
pub struct ProcessLauncher {
    /// Children not yet seen exiting.
    children: RefCell<Vec<Child>>,
}

impl ProcessLauncher {
    /// Create a new launcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of started children that have not been reaped yet.
    pub fn running(&self) -> usize {
        self.children.borrow().len()
    }
}

impl ProgramLauncher for ProcessLauncher {
    type Error = LaunchError;

    fn launch(&self, program: &DesktopProgram) -> Result<(), Self::Error> {
        let command = CommandLine::parse(&program.command).ok_or(LaunchError::Empty)?;

        // Evaluated per program, not once per desktop.
        let target = LogTarget::resolve(program.log_dir.as_deref(), Local::now().naive_local());
        debug!("log target for `{}`: {:?}", command, target);
        let (stdout, stderr) = target.open()?;

        let mut process = command.to_process();
        process
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .process_group(0);
        if let Some(dir) = program.work_dir.as_deref().filter(|d| !d.is_empty()) {
            process.current_dir(dir);
        }

        let child = process.spawn().map_err(|source| LaunchError::Spawn {
            command: command.to_string(),
            source,
        })?;
        info!("started `{}` (pid {})", command, child.id());
        self.children.borrow_mut().push(child);
        Ok(())
    }

    fn reap(&self) {
        self.children.borrow_mut().retain_mut(|child| match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!("pid {} exited with {}", child.id(), status);
                false
            }
            Err(e) => {
                warn!("cannot poll pid {}: {}", child.id(), e);
                false
            }
        });
    }
}
