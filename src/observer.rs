//! Observer contract consumed from the query engine.
//!
//! An observer tracks one query or mutation and pushes result snapshots to
//! its listeners. The engine owns everything behind it (caching, retries,
//! garbage collection); this crate only subscribes, forwards options and
//! reads the current snapshot.

use crate::options::{BoxFuture, MutationObserverOptions, QueryObserverOptions};
use crate::result::{MutationObserverResult, QueryObserverResult};

/// Callback receiving each emitted snapshot.
pub type Listener<R> = Box<dyn Fn(R) + Send + Sync>;

/// An owned one-shot closure that removes a subscription when called.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

/// Engine object that emits result snapshots for one query or mutation.
///
/// Implementations must deliver snapshots to a listener in the order they are
/// produced and stop delivering once the returned [`Unsubscribe`] ran.
pub trait Observer: Send + Sync + 'static {
    type Options;
    type Output: Clone + Send + Sync + 'static;

    /// Register `listener`; the returned handle detaches it.
    fn subscribe(&self, listener: Listener<Self::Output>) -> Unsubscribe;

    /// Replace the observer's options.
    fn set_options(&self, options: Self::Options);

    /// Synchronously available snapshot.
    fn current_result(&self) -> Self::Output;
}

/// Observer of a query.
pub trait QueryObserver<T, E>:
    Observer<Options = QueryObserverOptions<T, E>, Output = QueryObserverResult<T, E>>
{
    /// Ask the engine to fetch again, regardless of staleness.
    fn refetch(&self);
}

/// Observer of a mutation.
pub trait MutationObserver<T, E, V>:
    Observer<Options = MutationObserverOptions<T, E, V>, Output = MutationObserverResult<T, E, V>>
{
    /// Run the mutation. Progress is also emitted to listeners.
    fn mutate(&self, variables: V) -> BoxFuture<'static, Result<T, E>>;

    /// Return to the idle snapshot.
    fn reset(&self);
}
