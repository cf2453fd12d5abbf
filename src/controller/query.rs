use std::sync::Arc;

use crate::client::{query_client, QueryClient, QueryData};
use crate::context::Scope;
use crate::observer::QueryObserver;
use crate::options::QueryObserverOptions;
use crate::result::QueryObserverResult;
use crate::Result;

use super::{ControllerHost, ReactiveController, ResultController};

/// Binds one query observer to a host.
///
/// The options closure runs once at construction and again before every host
/// render, so options may depend on component state that changes between
/// renders. Its output is merged with the client defaults and pushed to the
/// observer unconditionally.
///
/// # Example
///
/// ```rust
/// use oxide_query::testing::TestClient;
/// use oxide_query::{ComponentHost, QueryClientProvider, QueryController, QueryObserverOptions, TestRenderer};
///
/// let host = ComponentHost::new(TestRenderer::<()>::new());
/// QueryClientProvider::new(&host, host.scope(), TestClient::new());
///
/// let todos = QueryController::<TestClient, Vec<String>, String>::new(&host, host.scope(), || {
///     QueryObserverOptions::new(["todos"]).query_fn(|_| async { Ok(vec!["write docs".to_string()]) })
/// })
/// .unwrap();
///
/// assert!(todos.result().is_pending());
/// ```
pub struct QueryController<C: QueryClient, T: QueryData, E: QueryData> {
    inner: ResultController<C::Query<T, E>>,
}

impl<C: QueryClient, T: QueryData, E: QueryData> QueryController<C, T, E> {
    /// Create a controller using the client provided above `scope`.
    ///
    /// Fails with [`Error::NoClient`](crate::Error::NoClient) when no
    /// provider published a client of type `C`.
    pub fn new<H, F>(host: &H, scope: &Scope, options: F) -> Result<Arc<Self>>
    where
        H: ControllerHost + ?Sized,
        F: Fn() -> QueryObserverOptions<T, E> + Send + Sync + 'static,
    {
        let client = query_client::<C>(scope)?;
        Ok(Self::with_client(host, client, options))
    }

    /// Create a controller for an explicitly passed client.
    pub fn with_client<H, F>(host: &H, client: Arc<C>, options: F) -> Arc<Self>
    where
        H: ControllerHost + ?Sized,
        F: Fn() -> QueryObserverOptions<T, E> + Send + Sync + 'static,
    {
        let defaults = Arc::clone(&client);
        let inner = ResultController::new(
            host.requester(),
            Box::new(move || defaults.default_query_options(options())),
            |resolved| client.query_observer::<T, E>(resolved),
        );

        let controller = Arc::new(QueryController { inner });
        host.add_controller(controller.clone());
        controller
    }

    pub fn result(&self) -> QueryObserverResult<T, E> {
        self.inner.result()
    }

    pub fn with_result<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&QueryObserverResult<T, E>) -> R,
    {
        self.inner.with_result(f)
    }

    /// Ask the engine to fetch again.
    pub fn refetch(&self) {
        self.inner.observer().refetch();
    }

    pub fn observer(&self) -> &C::Query<T, E> {
        self.inner.observer()
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.is_subscribed()
    }
}

impl<C: QueryClient, T: QueryData, E: QueryData> ReactiveController for QueryController<C, T, E> {
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
