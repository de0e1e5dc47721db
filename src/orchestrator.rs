//! The main orchestrator that ties the store, desktop switcher, program
//! launcher and wait together.
//!
//! [`Orchestrator`] owns the [`ConfigStore`] and reacts to a run request by
//! resolving a [`RunPlan`] and then, desktop by desktop, switching, launching
//! and waiting.
//!
//! A run moves through these states:
//!
//! ```text
//! INIT ──check_integrity──▶ VALIDATED ──plan──▶ SINGLE_DESKTOP | MULTI_DESKTOP ──execute──▶ DONE
//!   │                          │                              │
//!   └──────────────────────────┴──────────────▶ ERROR ◀────────┘
//! ```
//!
//! Every lookup (switch command, default wait, named desktop) happens in
//! [`plan`](Orchestrator::plan), so a configuration error never leaves a
//! desktop half processed.

use crate::command::{Desktop, SWITCH_DESKTOP, WAIT_BEFORE_SWITCH_DESKTOP};
use crate::traits::{ConfigStore, DesktopSwitcher, ProgramLauncher, Waiter};
use log::{debug, info, warn};
use std::time::Duration;

/// Wait used when neither the desktop nor the store specify one.
pub const DEFAULT_WAIT_SECONDS: u64 = 10;

/// A required configuration value is missing or ambiguous.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("could not find the desktop switch command")]
    MissingSwitchCommand,
    #[error("found {0} desktop switch commands, expected one")]
    AmbiguousSwitchCommand(usize),
    #[error("found {0} wait seconds, expected at most one")]
    AmbiguousWait(usize),
    #[error("wait seconds {0:?} is not a non-negative integer")]
    InvalidWait(String),
    #[error("could not find the desktop {0:?}")]
    UnknownDesktop(String),
    #[error("found {1} active desktops named {0:?}")]
    AmbiguousDesktop(String, usize),
}

/// Everything that ends a run early.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The store failed its structural or referential integrity check.
    #[error("integrity error: {0}")]
    Integrity(String),
    /// A required configuration value could not be resolved.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// The desktop switch command failed.
    #[error("cannot switch to desktop {desktop:?}: {reason}")]
    Switch { desktop: String, reason: String },
    /// A program could not be started.
    #[error("cannot start `{command}` on desktop {desktop:?}: {reason}")]
    Launch {
        desktop: String,
        command: String,
        reason: String,
    },
    /// The store returned an error while being queried.
    #[error("store error: {0}")]
    Store(String),
}

/// Which desktops a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A desktop was named on the command line.
    Single,
    /// Every active desktop, in `indexNo` order.
    All,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Value of the `switchDesktop` variable.
    pub switch_command: String,
    /// Wait used for desktops whose own `waitSeconds` is `0`.
    pub default_wait_seconds: u64,
    pub scope: Scope,
    /// Desktops to process, in order.
    pub desktops: Vec<Desktop>,
}

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Names of the processed desktops, in order.
    pub desktops: Vec<String>,
    /// Number of programs started across all desktops.
    pub programs_started: usize,
}

/// Seconds to wait after a desktop: its own value unless that is `0`.
pub fn effective_wait(desktop_wait_seconds: u64, default_wait_seconds: u64) -> Duration {
    if desktop_wait_seconds == 0 {
        Duration::from_secs(default_wait_seconds)
    } else {
        Duration::from_secs(desktop_wait_seconds)
    }
}

/// Drives a run over any [`ConfigStore`], [`ProgramLauncher`] and
/// [`Waiter`].
///
/// # Typical usage
///
/// ```ignore
/// let orchestrator = Orchestrator::new(store, ProcessLauncher::new(), pause);
/// let report = orchestrator.run(Some("web"), CommandSwitcher::new);
/// orchestrator.close();
/// ```
pub struct Orchestrator<S: ConfigStore, L: ProgramLauncher, W: Waiter> {
    store: S,
    launcher: L,
    waiter: W,
    default_wait_seconds: u64,
}

impl<S: ConfigStore, L: ProgramLauncher, W: Waiter> Orchestrator<S, L, W> {
    /// Create an orchestrator with the built-in default wait of
    /// [`DEFAULT_WAIT_SECONDS`].
    pub fn new(store: S, launcher: L, waiter: W) -> Self {
        Self {
            store,
            launcher,
            waiter,
            default_wait_seconds: DEFAULT_WAIT_SECONDS,
        }
    }

    /// Override the wait used when the store has no
    /// `waitBeforeSwitchDesktop` variable.
    pub fn with_default_wait(mut self, seconds: u64) -> Self {
        self.default_wait_seconds = seconds;
        self
    }

    /// Check the store, resolve a plan, and execute it with the switcher
    /// `make_switcher` builds from the `switchDesktop` variable.
    pub fn run<D, F>(&self, selected: Option<&str>, make_switcher: F) -> Result<RunReport, RunError>
    where
        D: DesktopSwitcher,
        F: FnOnce(String) -> D,
    {
        self.check_integrity()?;
        let plan = self.plan(selected)?;
        let switcher = make_switcher(plan.switch_command.clone());
        self.execute(&plan, &switcher)
    }

    /// INIT → VALIDATED.
    pub fn check_integrity(&self) -> Result<(), RunError> {
        self.store
            .check_integrity()
            .map_err(|e| RunError::Integrity(e.to_string()))
    }

    /// Resolve every configuration value the run needs.
    ///
    /// `selected` restricts the run to one named desktop.
    pub fn plan(&self, selected: Option<&str>) -> Result<RunPlan, RunError> {
        let switch_command = match self.variable(SWITCH_DESKTOP)?.as_slice() {
            [one] => one.clone(),
            [] => return Err(LookupError::MissingSwitchCommand.into()),
            many => return Err(LookupError::AmbiguousSwitchCommand(many.len()).into()),
        };

        let default_wait_seconds = match self.variable(WAIT_BEFORE_SWITCH_DESKTOP)?.as_slice() {
            [] => self.default_wait_seconds,
            [one] => one
                .trim()
                .parse::<u64>()
                .map_err(|_| LookupError::InvalidWait(one.clone()))?,
            many => return Err(LookupError::AmbiguousWait(many.len()).into()),
        };

        let (scope, desktops) = match selected {
            Some(name) => {
                let mut found = self.store.desktop(name).map_err(store_error)?;
                match found.len() {
                    1 => (Scope::Single, vec![found.remove(0)]),
                    0 => return Err(LookupError::UnknownDesktop(name.to_string()).into()),
                    n => return Err(LookupError::AmbiguousDesktop(name.to_string(), n).into()),
                }
            }
            None => (
                Scope::All,
                self.store.active_desktops().map_err(store_error)?,
            ),
        };
        debug!(
            "plan: {:?} scope, {} desktop(s), default wait {}s",
            scope,
            desktops.len(),
            default_wait_seconds
        );

        Ok(RunPlan {
            switch_command,
            default_wait_seconds,
            scope,
            desktops,
        })
    }

    /// Process every desktop of `plan` in order.
    ///
    /// Stops at the first failing switch or launch; desktops already
    /// processed stay processed.
    pub fn execute<D: DesktopSwitcher>(
        &self,
        plan: &RunPlan,
        switcher: &D,
    ) -> Result<RunReport, RunError> {
        let mut report = RunReport::default();
        for desktop in &plan.desktops {
            report.programs_started += self.process_desktop(desktop, plan, switcher)?;
            report.desktops.push(desktop.name.clone());
        }
        info!(
            "done: {} desktop(s), {} program(s)",
            report.desktops.len(),
            report.programs_started
        );
        Ok(report)
    }

    /// Release the store.  A failure here is logged, not returned: the run
    /// itself already succeeded or failed.
    pub fn close(self) {
        if let Err(e) = self.store.close() {
            warn!("closing the store failed: {}", e);
        }
    }

    //  Internal helpers

    fn variable(&self, name: &str) -> Result<Vec<String>, RunError> {
        self.store.variable(name).map_err(store_error)
    }

    /// Switch, launch every program, wait.  Returns the number of programs
    /// started.
    fn process_desktop<D: DesktopSwitcher>(
        &self,
        desktop: &Desktop,
        plan: &RunPlan,
        switcher: &D,
    ) -> Result<usize, RunError> {
        info!("desktop {} (value {})", desktop.name, desktop.value);
        let programs = self
            .store
            .active_programs(&desktop.name)
            .map_err(store_error)?;
        let wait = effective_wait(desktop.wait_seconds, plan.default_wait_seconds);

        switcher
            .switch_to(&desktop.value)
            .map_err(|e| RunError::Switch {
                desktop: desktop.name.clone(),
                reason: e.to_string(),
            })?;

        for program in &programs {
            self.launcher
                .launch(program)
                .map_err(|e| RunError::Launch {
                    desktop: desktop.name.clone(),
                    command: program.command.clone(),
                    reason: e.to_string(),
                })?;
        }

        self.launcher.reap();
        self.waiter.wait(wait);
        Ok(programs.len())
    }
}

fn store_error(e: impl std::error::Error) -> RunError {
    RunError::Store(e.to_string())
}
