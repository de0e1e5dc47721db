//! Core traits that decouple deskstart from any specific store, desktop
//! switcher or process spawner.
//!
//! Every concrete backend (SQLite, an external switch command, the OS
//! process spawner, a test harness, …) implements one of these traits.  The
//! [`Orchestrator`](crate::orchestrator::Orchestrator) only depends on these
//! abstractions.

use crate::command::{Desktop, DesktopProgram};
use std::time::Duration;

/// Read-only access to the launcher configuration.
///
/// All queries only ever return **active** rows (`isActive = 'T'`).
/// Multiplicity checks (e.g. "exactly one `switchDesktop`") are left to the
/// caller, so lookups return every matching row.
pub trait ConfigStore {
    /// The error type produced by this store.
    type Error: std::error::Error + Send + 'static;

    /// Verify structural and referential integrity.  Must be called before
    /// any other query is trusted.
    fn check_integrity(&self) -> Result<(), Self::Error>;

    /// All active desktops, ordered by `indexNo`.
    fn active_desktops(&self) -> Result<Vec<Desktop>, Self::Error>;

    /// Active desktops named `name`.
    ///
    /// The name is a primary key so a healthy store returns zero or one row;
    /// more than one is a configuration error detected by the caller.
    fn desktop(&self, name: &str) -> Result<Vec<Desktop>, Self::Error>;

    /// Active programs of `desktop`, ordered by `indexNo`.
    fn active_programs(&self, desktop: &str) -> Result<Vec<DesktopProgram>, Self::Error>;

    /// Every value stored for the variable `name`.
    fn variable(&self, name: &str) -> Result<Vec<String>, Self::Error>;

    /// Release the underlying connection.
    fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized;
}

/// Something that can make a desktop the active one.
pub trait DesktopSwitcher {
    /// The error type produced by this switcher.
    type Error: std::error::Error + Send + 'static;

    /// Switch to the desktop identified by `value` and return once the
    /// switch has completed.
    fn switch_to(&self, value: &str) -> Result<(), Self::Error>;
}

/// Something that can start a program and forget about it.
///
/// # Contract
///
/// * [`launch`](ProgramLauncher::launch) returns as soon as the program has
///   been **started**; it never waits for the program to exit.
/// * An `Err` only reports a failure to start, never the program's exit
///   status.
pub trait ProgramLauncher {
    /// The error type produced by this launcher.
    type Error: std::error::Error + Send + 'static;

    /// Start `program` detached from the caller.
    fn launch(&self, program: &DesktopProgram) -> Result<(), Self::Error>;

    /// Collect the exit status of programs that have already finished,
    /// without blocking on the rest.
    fn reap(&self) {}
}

/// The pause between two desktops.
pub trait Waiter {
    /// Block for `duration`, or less if the wait is interrupted.
    fn wait(&self, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    //  Mock DesktopSwitcher

    /// A test double that records every call made to it.
    #[derive(Debug, Default)]
    struct MockSwitcher {
        switch_log: RefCell<Vec<String>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl DesktopSwitcher for MockSwitcher {
        type Error = MockError;

        fn switch_to(&self, value: &str) -> Result<(), MockError> {
            self.switch_log.borrow_mut().push(value.to_string());
            Ok(())
        }
    }

    #[test]
    fn mock_switcher_records_switches() {
        let sw = MockSwitcher::default();
        sw.switch_to("2").unwrap();
        assert_eq!(sw.switch_log.borrow().len(), 1);
        assert_eq!(sw.switch_log.borrow()[0], "2");
    }

    //  Mock ProgramLauncher

    /// Fails for every command starting with `bad`.
    #[derive(Debug, Default)]
    struct MockLauncher {
        started: RefCell<Vec<String>>,
    }

    impl ProgramLauncher for MockLauncher {
        type Error = MockError;

        fn launch(&self, program: &DesktopProgram) -> Result<(), MockError> {
            if program.command.starts_with("bad") {
                return Err(MockError);
            }
            self.started.borrow_mut().push(program.command.clone());
            Ok(())
        }
    }

    #[test]
    fn mock_launcher_reports_start_failures_only() {
        let launcher = MockLauncher::default();
        let ok = DesktopProgram {
            command: "xterm".into(),
            log_dir: None,
            work_dir: None,
        };
        let bad = DesktopProgram {
            command: "bad-program".into(),
            ..ok.clone()
        };
        launcher.launch(&ok).unwrap();
        assert!(launcher.launch(&bad).is_err());
        assert_eq!(*launcher.started.borrow(), vec!["xterm".to_string()]);
    }
}
