//! In-memory client and observers for tests.
//!
//! Only available with the `testing` feature or during tests.
//!
//! [`TestClient`] counts mounts and hands out [`TestObserver`]s. A
//! `TestObserver` is a cheap handle: the controller owns one and tests reach
//! the same state through
//! [`QueryController::observer`](crate::QueryController::observer) to emit
//! snapshots and inspect subscriptions and option pushes.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use spin::Mutex;

use crate::client::{QueryClient, QueryData};
use crate::observer::{Listener, MutationObserver, Observer, QueryObserver, Unsubscribe};
use crate::options::{BoxFuture, DefaultOptions, MutationObserverOptions, QueryObserverOptions};
use crate::result::{MutationObserverResult, QueryObserverResult};

/// Client that records its lifecycle and builds [`TestObserver`]s.
pub struct TestClient {
    defaults: Mutex<DefaultOptions>,
    mounts: AtomicUsize,
    unmounts: AtomicUsize,
    observers: AtomicUsize,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::with_defaults(DefaultOptions::default())
    }
}

impl TestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: DefaultOptions) -> Self {
        TestClient {
            defaults: Mutex::new(defaults),
            mounts: AtomicUsize::new(0),
            unmounts: AtomicUsize::new(0),
            observers: AtomicUsize::new(0),
        }
    }

    /// Replace the defaults; later merges pick them up.
    pub fn set_default_options(&self, defaults: DefaultOptions) {
        *self.defaults.lock() = defaults;
    }

    pub fn mount_count(&self) -> usize {
        self.mounts.load(Ordering::SeqCst)
    }

    pub fn unmount_count(&self) -> usize {
        self.unmounts.load(Ordering::SeqCst)
    }

    /// Number of observers built so far.
    pub fn observer_count(&self) -> usize {
        self.observers.load(Ordering::SeqCst)
    }
}

impl QueryClient for TestClient {
    type Query<T: QueryData, E: QueryData> =
        TestObserver<QueryObserverOptions<T, E>, QueryObserverResult<T, E>>;
    type Mutation<T: QueryData, E: QueryData, V: QueryData> =
        TestObserver<MutationObserverOptions<T, E, V>, MutationObserverResult<T, E, V>>;

    fn mount(&self) {
        self.mounts.fetch_add(1, Ordering::SeqCst);
    }

    fn unmount(&self) {
        self.unmounts.fetch_add(1, Ordering::SeqCst);
    }

    fn default_options(&self) -> DefaultOptions {
        self.defaults.lock().clone()
    }

    fn query_observer<T: QueryData, E: QueryData>(
        &self,
        options: QueryObserverOptions<T, E>,
    ) -> Self::Query<T, E> {
        self.observers.fetch_add(1, Ordering::SeqCst);
        TestObserver::new(options, QueryObserverResult::pending())
    }

    fn mutation_observer<T: QueryData, E: QueryData, V: QueryData>(
        &self,
        options: MutationObserverOptions<T, E, V>,
    ) -> Self::Mutation<T, E, V> {
        self.observers.fetch_add(1, Ordering::SeqCst);
        TestObserver::new(options, MutationObserverResult::idle())
    }
}

struct ObserverState<Opt, Out> {
    options: Opt,
    current: Out,
    listeners: Vec<(u64, Arc<dyn Fn(Out) + Send + Sync>)>,
    next_listener: u64,
    set_options_calls: usize,
    subscribes: usize,
    unsubscribes: usize,
    refetches: usize,
}

/// Observer whose emissions are driven by the test.
pub struct TestObserver<Opt, Out> {
    state: Arc<Mutex<ObserverState<Opt, Out>>>,
}

impl<Opt, Out> Clone for TestObserver<Opt, Out> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<Opt, Out> TestObserver<Opt, Out>
where
    Opt: Clone + Send + 'static,
    Out: Clone + Send + Sync + 'static,
{
    pub fn new(options: Opt, current: Out) -> Self {
        TestObserver {
            state: Arc::new(Mutex::new(ObserverState {
                options,
                current,
                listeners: Vec::new(),
                next_listener: 0,
                set_options_calls: 0,
                subscribes: 0,
                unsubscribes: 0,
                refetches: 0,
            })),
        }
    }

    /// Make `result` current and deliver it to every listener, in
    /// subscription order.
    pub fn emit(&self, result: Out) {
        let listeners: Vec<_> = {
            let mut state = self.state.lock();
            state.current = result.clone();
            state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        for listener in listeners {
            listener(result.clone());
        }
    }

    /// The options from construction or the latest `set_options`.
    pub fn options(&self) -> Opt {
        self.state.lock().options.clone()
    }

    pub fn set_options_count(&self) -> usize {
        self.state.lock().set_options_calls
    }

    pub fn subscribe_count(&self) -> usize {
        self.state.lock().subscribes
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.state.lock().unsubscribes
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    pub fn refetch_count(&self) -> usize {
        self.state.lock().refetches
    }
}

impl<Opt, Out> Observer for TestObserver<Opt, Out>
where
    Opt: Clone + Send + 'static,
    Out: Clone + Send + Sync + 'static,
{
    type Options = Opt;
    type Output = Out;

    fn subscribe(&self, listener: Listener<Out>) -> Unsubscribe {
        let id = {
            let mut state = self.state.lock();
            let id = state.next_listener;
            state.next_listener += 1;
            state.subscribes += 1;
            state.listeners.push((id, Arc::from(listener)));
            id
        };

        let state = Arc::clone(&self.state);
        Box::new(move || {
            let mut state = state.lock();
            state.unsubscribes += 1;
            state.listeners.retain(|(listener, _)| *listener != id);
        })
    }

    fn set_options(&self, options: Opt) {
        let mut state = self.state.lock();
        state.options = options;
        state.set_options_calls += 1;
    }

    fn current_result(&self) -> Out {
        self.state.lock().current.clone()
    }
}

impl<T: QueryData, E: QueryData> QueryObserver<T, E>
    for TestObserver<QueryObserverOptions<T, E>, QueryObserverResult<T, E>>
{
    fn refetch(&self) {
        self.state.lock().refetches += 1;
    }
}

impl<T: QueryData, E: QueryData, V: QueryData> MutationObserver<T, E, V>
    for TestObserver<MutationObserverOptions<T, E, V>, MutationObserverResult<T, E, V>>
{
    /// Emits a pending snapshot, runs the configured `mutation_fn`, then emits
    /// success or error.
    ///
    /// # Panics
    ///
    /// The returned future panics when the options carry no `mutation_fn`.
    fn mutate(&self, variables: V) -> BoxFuture<'static, Result<T, E>> {
        let mutation_fn = self.state.lock().options.mutation_fn.clone();
        let observer = self.clone();
        self.emit(MutationObserverResult::pending(variables.clone()));

        Box::pin(async move {
            let Some(mutation_fn) = mutation_fn else {
                panic!("TestObserver::mutate called without a mutation_fn");
            };

            let outcome = mutation_fn(variables.clone()).await;
            match &outcome {
                Ok(data) => observer.emit(MutationObserverResult::success(data.clone(), variables)),
                Err(error) => observer.emit(MutationObserverResult::error(error.clone(), variables)),
            }
            outcome
        })
    }

    fn reset(&self) {
        self.emit(MutationObserverResult::idle());
    }
}
