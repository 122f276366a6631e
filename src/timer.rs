use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::runtime::Ticker;

/// Periodic tick source driving wpm recomputation for one session.
/// Dropping a running timer stops it.
#[derive(Debug)]
pub struct SessionTimer {
    ticks: Arc<AtomicU64>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionTimer {
    pub fn start<T: Ticker>(ticker: &T) -> Self {
        let interval = ticker.interval();
        let ticks = Arc::new(AtomicU64::new(0));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let counter = Arc::clone(&ticks);
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        debug!(interval_ms = interval.as_millis() as u64, "session timer started");

        Self {
            ticks,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns true if this call stopped a running timer.
    pub fn stop(&mut self) -> bool {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }

        match self.handle.take() {
            Some(handle) => {
                let _ = handle.join();
                debug!(ticks = self.ticks(), "session timer stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
