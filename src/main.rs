//! Entry point for **deskstart**.
//!
//! Opens the configuration store, switches to the user's home directory and
//! runs every active desktop (or the one named on the command line).  Any
//! fatal error is logged as a single line and ends the process with exit
//! code 1.

use deskstart::cli::{self, Invocation};
use deskstart::config::{Config, DATABASE_ENV};
use deskstart::launcher::ProcessLauncher;
use deskstart::orchestrator::Orchestrator;
use deskstart::pause::Pause;
use deskstart::store::sqlite::SqliteStore;
use deskstart::switcher::CommandSwitcher;
use log::{error, info, warn};
use signal_hook::consts::SIGUSR1;
use std::path::PathBuf;

/// The user's home directory.
fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/".into()))
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/deskstart`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("deskstart")
}

/// Try to load the config from `$XDG_CONFIG_HOME/deskstart/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "deskstart".into());

    let desktop = match cli::parse_args(args) {
        Ok(Invocation::Help) => {
            println!("{}", cli::usage(&program));
            return;
        }
        Ok(Invocation::Run { desktop }) => desktop,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", cli::usage(&program));
            std::process::exit(1);
        }
    };

    std::process::exit(run(desktop.as_deref()));
}

/// Open the store and run.  Returns the process exit code.
fn run(desktop: Option<&str>) -> i32 {
    let config = load_config();
    let home = home_dir();
    let env_db = std::env::var(DATABASE_ENV).ok();
    let db_path = config.database_path(env_db.as_deref(), &home);

    let store = match SqliteStore::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    // Relative workDir / logDir entries are relative to the home directory.
    if let Err(e) = std::env::set_current_dir(&home) {
        error!("cannot change to {}: {}", home.display(), e);
        return 1;
    }

    // SIGUSR1 skips the rest of the current wait.
    let (pause, interrupt) = Pause::new();
    if let Err(e) = interrupt.interrupt_on(SIGUSR1) {
        warn!("cannot listen for SIGUSR1: {}", e);
    }
    let orchestrator = Orchestrator::new(store, ProcessLauncher::new(), pause)
        .with_default_wait(config.default_wait_seconds);

    let code = match orchestrator.run(desktop, CommandSwitcher::new) {
        Ok(report) => {
            info!(
                "started {} program(s) on {} desktop(s)",
                report.programs_started,
                report.desktops.len()
            );
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    };
    orchestrator.close();
    code
}
