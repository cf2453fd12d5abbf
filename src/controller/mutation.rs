use std::sync::Arc;

use crate::client::{query_client, QueryClient, QueryData};
use crate::context::Scope;
use crate::observer::MutationObserver;
use crate::options::{BoxFuture, MutationObserverOptions};
use crate::result::MutationObserverResult;
use crate::Result;

use super::{ControllerHost, ReactiveController, ResultController};

/// Binds one mutation observer to a host.
///
/// Mirrors [`QueryController`](crate::QueryController): the result starts as
/// the observer's idle snapshot and follows every emission while the host is
/// connected. [`mutate`](Self::mutate) and [`reset`](Self::reset) are passed
/// straight to the observer.
pub struct MutationController<C: QueryClient, T: QueryData, E: QueryData, V: QueryData> {
    inner: ResultController<C::Mutation<T, E, V>>,
}

impl<C, T, E, V> MutationController<C, T, E, V>
where
    C: QueryClient,
    T: QueryData,
    E: QueryData,
    V: QueryData,
{
    /// Create a controller using the client provided above `scope`.
    pub fn new<H, F>(host: &H, scope: &Scope, options: F) -> Result<Arc<Self>>
    where
        H: ControllerHost + ?Sized,
        F: Fn() -> MutationObserverOptions<T, E, V> + Send + Sync + 'static,
    {
        let client = query_client::<C>(scope)?;
        Ok(Self::with_client(host, client, options))
    }

    /// Create a controller for an explicitly passed client.
    pub fn with_client<H, F>(host: &H, client: Arc<C>, options: F) -> Arc<Self>
    where
        H: ControllerHost + ?Sized,
        F: Fn() -> MutationObserverOptions<T, E, V> + Send + Sync + 'static,
    {
        let defaults = Arc::clone(&client);
        let inner = ResultController::new(
            host.requester(),
            Box::new(move || defaults.default_mutation_options(options())),
            |resolved| client.mutation_observer::<T, E, V>(resolved),
        );

        let controller = Arc::new(MutationController { inner });
        host.add_controller(controller.clone());
        controller
    }

    pub fn result(&self) -> MutationObserverResult<T, E, V> {
        self.inner.result()
    }

    pub fn with_result<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&MutationObserverResult<T, E, V>) -> R,
    {
        self.inner.with_result(f)
    }

    /// Run the mutation. The returned future resolves with the outcome; the
    /// result field follows the observer's emissions independently.
    pub fn mutate(&self, variables: V) -> BoxFuture<'static, core::result::Result<T, E>> {
        self.inner.observer().mutate(variables)
    }

    pub fn reset(&self) {
        self.inner.observer().reset();
    }

    pub fn observer(&self) -> &C::Mutation<T, E, V> {
        self.inner.observer()
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.is_subscribed()
    }
}

impl<C, T, E, V> ReactiveController for MutationController<C, T, E, V>
where
    C: QueryClient,
    T: QueryData,
    E: QueryData,
    V: QueryData,
{
    fn host_connected(&self) {
        self.inner.host_connected();
    }

    fn host_update(&self) {
        self.inner.host_update();
    }

    fn host_disconnected(&self) {
        self.inner.host_disconnected();
    }
}
