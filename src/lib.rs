//! **deskstart** — start configured programs on their virtual desktops.
//!
//! Desktops, the programs that belong to each of them, and the command that
//! switches desktops are kept in a SQLite database.  A run switches to each
//! active desktop in turn, starts that desktop's active programs detached
//! (each with its own log file), and waits before moving on.
//!
//! # Architecture
//!
//! The crate is organised around four small traits in [`traits`]:
//!
//! * [`traits::ConfigStore`] — ordered, read-only queries over the
//!   configuration, so the run logic is not coupled to SQLite.
//! * [`traits::DesktopSwitcher`] — makes a desktop the active one.
//! * [`traits::ProgramLauncher`] — starts a program and forgets about it.
//! * [`traits::Waiter`] — the pause between desktops.
//!
//! [`orchestrator::Orchestrator`] drives a run over these.  Concrete
//! implementations live in [`store`] (SQLite), [`switcher`] (external switch
//! command), [`launcher`] (detached processes) and [`pause`].

pub mod cli;
pub mod command;
pub mod config;
pub mod launcher;
pub mod orchestrator;
pub mod pause;
pub mod store;
pub mod switcher;
pub mod traits;
