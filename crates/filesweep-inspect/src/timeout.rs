//! Per-document time limit around an inspector.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use filesweep_core::{InspectError, LinkInspector};

/// Runs the wrapped inspector on a dedicated thread and gives up after
/// `timeout`.
///
/// A document that hangs or panics the inner inspector yields an error for
/// that document only. The helper thread of a timed-out inspection is left
/// to finish on its own and keeps its slot until it does; at most
/// `max_in_flight` helpers exist at once, so stalled documents cannot push
/// the number of open inspections past that limit.
pub struct TimeoutInspector<I> {
    inner: Arc<I>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl<I> TimeoutInspector<I> {
    /// Wrap `inner` with a per-document limit and no bound on helpers.
    pub fn new(inner: I, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
            max_in_flight: usize::MAX,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bound the number of helper threads alive at once, abandoned ones
    /// included. Inspections beyond the bound fail with
    /// [`InspectError::Saturated`].
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    fn acquire(&self) -> Option<Slot> {
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_in_flight).then_some(n + 1)
            })
            .ok()
            .map(|_| Slot(Arc::clone(&self.in_flight)))
    }
}

/// One helper thread's share of the in-flight count, released on drop.
struct Slot(Arc<AtomicUsize>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<I: LinkInspector + 'static> LinkInspector for TimeoutInspector<I> {
    fn contains_links(&self, path: &Path) -> Result<bool, InspectError> {
        let slot = self.acquire().ok_or_else(|| InspectError::Saturated {
            path: path.to_path_buf(),
            limit: self.max_in_flight,
        })?;

        let (tx, rx) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        let owned = path.to_path_buf();

        thread::Builder::new()
            .name("filesweep-inspect".to_string())
            .spawn(move || {
                // Bound after `tx` so a panic frees the slot before the
                // caller sees the disconnect.
                let tx = tx;
                let slot = slot;
                let result = inner.contains_links(&owned);
                drop(slot);
                // The receiver is gone if we already timed out.
                let _ = tx.send(result);
            })
            .map_err(|source| InspectError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(InspectError::Timeout {
                path: path.to_path_buf(),
                timeout: self.timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(InspectError::Aborted {
                path: path.to_path_buf(),
            }),
        }
    }
}
