//! The interruptible wait between two desktops.
//!
//! An operator who does not want to sit out the remaining wait can cut it
//! short with a signal (the binary listens for `SIGUSR1`).

use crate::traits::Waiter;
use log::{debug, info};
use signal_hook::iterator::Signals;
use std::ffi::c_int;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

/// A blocking [`Waiter`] that can be cut short through a [`PauseHandle`].
pub struct Pause {
    rx: mpsc::Receiver<()>,
}

/// Cuts the current (or next) wait of its [`Pause`] short.
#[derive(Debug, Clone)]
pub struct PauseHandle {
    tx: mpsc::Sender<()>,
}

impl Pause {
    /// Create a pause and the handle that interrupts it.
    pub fn new() -> (Self, PauseHandle) {
        let (tx, rx) = mpsc::channel();
        (Self { rx }, PauseHandle { tx })
    }
}

impl PauseHandle {
    /// Interrupt one wait.  Returns `false` if the [`Pause`] is gone.
    pub fn interrupt(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    /// Interrupt one wait each time the process receives `signal`.
    ///
    /// The handler is installed before this returns; delivery happens on a
    /// background thread that ends once the [`Pause`] is dropped and the
    /// signal arrives again.
    pub fn interrupt_on(self, signal: c_int) -> std::io::Result<()> {
        let mut signals = Signals::new([signal])?;
        std::thread::Builder::new()
            .name(format!("pause-signal-{}", signal))
            .spawn(move || {
                for sig in signals.forever() {
                    debug!("signal {} received", sig);
                    if !self.interrupt() {
                        break;
                    }
                }
            })?;
        Ok(())
    }
}

impl Waiter for Pause {
    fn wait(&self, duration: Duration) {
        info!("waiting {}s", duration.as_secs());
        let deadline = Instant::now() + duration;
        match self.rx.recv_timeout(duration) {
            Ok(()) => debug!("wait interrupted"),
            Err(RecvTimeoutError::Timeout) => {}
            // Every handle is gone; nobody can interrupt us any more.
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
            }
        }
    }
}
