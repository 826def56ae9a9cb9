//! The single-flight guard.

use crate::error::{ExecutorError, ExecutorResult};
use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// A cloneable handle on one run of the guarded action.
/// Every clone resolves to the same result.
pub type Flight<T> = Shared<BoxFuture<'static, ExecutorResult<T>>>;

struct InFlight<T> {
    generation: u64,
    flight: Flight<T>,
}

struct Slot<T> {
    current: Option<InFlight<T>>,
    started: u64,
}

/// Coalesces concurrent invocations of one action into a single execution.
///
/// The action is spawned on the ambient tokio runtime, so it runs to
/// completion even if every caller drops its [`Flight`]. The guard returns
/// to idle as soon as the action settles, whether it succeeded, failed or
/// panicked; the next `run` starts a fresh execution.
pub struct SingleFlight<T> {
    name: &'static str,
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an idle guard. `name` only appears in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Arc::new(Mutex::new(Slot {
                current: None,
                started: 0,
            })),
        }
    }

    /// Starts `action` unless a run is already in flight, in which case the
    /// pending run is returned and `action` is never called.
    ///
    /// `action` is invoked while the guard's lock is held; it must not call
    /// back into this guard. If `action` panics before returning its future,
    /// the panic reaches the caller and the guard stays idle.
    pub fn run<F, Fut>(&self, action: F) -> Flight<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut slot = self.slot.lock();
        if let Some(in_flight) = slot.current.as_ref() {
            debug!(action = self.name, "joining in-flight run");
            return in_flight.flight.clone();
        }

        let Ok(runtime) = Handle::try_current() else {
            return future::ready(Err(ExecutorError::NoRuntime))
                .boxed()
                .shared();
        };

        // A panic here unwinds with the slot untouched and unlocked.
        let pending = action();

        slot.started += 1;
        let generation = slot.started;
        let release = Release {
            slot: Arc::clone(&self.slot),
            generation,
        };

        debug!(action = self.name, generation, "starting run");
        let handle = runtime.spawn(async move {
            let _release = release;
            pending.await
        });

        let flight: Flight<T> = async move { handle.await.map_err(ExecutorError::from) }
            .boxed()
            .shared();
        slot.current = Some(InFlight {
            generation,
            flight: flight.clone(),
        });
        flight
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.slot.lock().current.is_some()
    }

    /// The pending run, if any.
    pub fn in_flight(&self) -> Option<Flight<T>> {
        self.slot
            .lock()
            .current
            .as_ref()
            .map(|in_flight| in_flight.flight.clone())
    }

    /// How many times the action has actually been started.
    pub fn started(&self) -> u64 {
        self.slot.lock().started
    }
}

/// Clears the slot when the spawned action finishes (or unwinds).
struct Release<T> {
    slot: Arc<Mutex<Slot<T>>>,
    generation: u64,
}

impl<T> Drop for Release<T> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot
            .current
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == self.generation)
        {
            slot.current = None;
        }
    }
}
