//! Controllers bridging engine observers to host lifecycles.
//!
//! A host drives its registered [`ReactiveController`]s through
//! connect → update* → disconnect. [`ResultController`] is the shared core of
//! the query and mutation variants: it owns one observer, subscribes while the
//! host is connected and mirrors each emitted snapshot into a field the
//! component reads while rendering.
//!
//! # Invariants
//!
//! 1. One observer per controller, created at construction, never replaced.
//! 2. At most one live subscription; a second connect is ignored.
//! 3. The stored unsubscribe handle is taken and run exactly once per
//!    subscription, from the disconnect hook only.
//! 4. [`ResultController::result`] is the latest snapshot delivered through the
//!    current subscription, or the observer's current result as of the last
//!    (re)subscribe before the first delivery.
//! 5. Deliveries from a severed subscription never touch the result and never
//!    request an update.

mod mutation;
mod query;

pub use mutation::MutationController;
pub use query::QueryController;

use core::fmt;
use std::sync::Arc;

use spin::Mutex;

use crate::observer::{Observer, Unsubscribe};
use crate::requester::UpdateRequester;

/// Lifecycle hooks a host invokes on each registered controller.
///
/// All hooks are infallible and default to doing nothing.
pub trait ReactiveController: Send + Sync {
    /// The host was attached.
    fn host_connected(&self) {}

    /// The host is about to render.
    fn host_update(&self) {}

    /// The host finished rendering.
    fn host_updated(&self) {}

    /// The host was detached.
    fn host_disconnected(&self) {}
}

/// What a host exposes to the controllers it drives.
pub trait ControllerHost {
    /// Register a controller. The host calls its hooks from now on.
    fn add_controller(&self, controller: Arc<dyn ReactiveController>);

    /// Unregister a controller previously added. Its hooks are not called.
    fn remove_controller(&self, controller: &Arc<dyn ReactiveController>);

    /// A handle for requesting re-renders of this host.
    fn requester(&self) -> UpdateRequester;

    fn request_update(&self) {
        self.requester().request();
    }
}

/// Options producer re-invoked on every host update.
pub(crate) type ResolveOptions<O> = Box<dyn Fn() -> <O as Observer>::Options + Send + Sync>;

struct ResultSlot<R> {
    result: R,
    /// Bumped on every subscribe; deliveries tagged with an older generation
    /// are dropped.
    generation: u64,
    live: bool,
}

/// Generic core shared by [`QueryController`] and [`MutationController`].
pub struct ResultController<O: Observer> {
    observer: O,
    resolve: ResolveOptions<O>,
    slot: Arc<Mutex<ResultSlot<O::Output>>>,
    unsubscribe: Mutex<Option<Unsubscribe>>,
    requester: UpdateRequester,
}

impl<O: Observer> ResultController<O> {
    /// Resolve options once, build the observer from them and seed the
    /// result with its current snapshot.
    pub(crate) fn new(
        requester: UpdateRequester,
        resolve: ResolveOptions<O>,
        build: impl FnOnce(O::Options) -> O,
    ) -> Self {
        let observer = build(resolve());
        let result = observer.current_result();

        ResultController {
            observer,
            resolve,
            slot: Arc::new(Mutex::new(ResultSlot {
                result,
                generation: 0,
                live: false,
            })),
            unsubscribe: Mutex::new(None),
            requester,
        }
    }

    /// The latest snapshot.
    pub fn result(&self) -> O::Output {
        self.slot.lock().result.clone()
    }

    /// Run `f` on a copy of the latest snapshot.
    ///
    /// The slot lock is released before `f` runs, so `f` may read the result
    /// again or trigger synchronous emissions.
    pub fn with_result<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&O::Output) -> R,
    {
        let result = self.result();
        f(&result)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Whether the controller currently holds a subscription.
    pub fn is_subscribed(&self) -> bool {
        self.unsubscribe.lock().is_some()
    }
}

impl<O: Observer> ReactiveController for ResultController<O> {
    fn host_connected(&self) {
        let mut unsubscribe = self.unsubscribe.lock();
        if unsubscribe.is_some() {
            tracing::warn!("host connected twice; keeping the existing subscription");
            return;
        }

        let current = self.observer.current_result();
        let generation = {
            let mut slot = self.slot.lock();
            slot.generation += 1;
            slot.live = true;
            slot.result = current;
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let requester = self.requester.clone();
        *unsubscribe = Some(self.observer.subscribe(Box::new(move |result| {
            {
                let mut slot = slot.lock();
                if !slot.live || slot.generation != generation {
                    tracing::trace!(generation, "dropping result from a severed subscription");
                    return;
                }
                slot.result = result;
            }
            tracing::trace!(generation, "observer emitted");
            requester.request();
        })));

        drop(unsubscribe);
        self.requester.request();
        tracing::debug!(generation, "subscribed to observer");
    }

    fn host_update(&self) {
        self.observer.set_options((self.resolve)());
    }

    fn host_disconnected(&self) {
        let unsubscribe = self.unsubscribe.lock().take();
        match unsubscribe {
            Some(unsubscribe) => {
                self.slot.lock().live = false;
                unsubscribe();
                tracing::debug!("unsubscribed from observer");
            }
            None => tracing::trace!("host disconnected without a subscription"),
        }
    }
}

impl<O> fmt::Debug for ResultController<O>
where
    O: Observer,
    O::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("ResultController")
            .field("result", &slot.result)
            .field("generation", &slot.generation)
            .field("live", &slot.live)
            .finish_non_exhaustive()
    }
}
