//! Client contract consumed from the query engine, and its context lookup.

use std::sync::Arc;

use crate::context::{ContextKey, Scope};
use crate::observer::{MutationObserver, QueryObserver};
use crate::options::{DefaultOptions, MutationObserverOptions, QueryObserverOptions};
use crate::{Error, Result};

/// Bound shared by data, error and variable types flowing through observers.
pub trait QueryData: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> QueryData for T {}

/// The engine's client: owner of the cache and factory for observers.
///
/// One client is created per provider and shared read-only with every
/// controller below it.
pub trait QueryClient: Send + Sync + 'static {
    type Query<T: QueryData, E: QueryData>: QueryObserver<T, E>;
    type Mutation<T: QueryData, E: QueryData, V: QueryData>: MutationObserver<T, E, V>;

    /// Start background bookkeeping (focus and reconnect listeners).
    fn mount(&self);

    /// Stop what [`mount`](Self::mount) started.
    fn unmount(&self);

    /// Client-wide defaults, read on every merge.
    fn default_options(&self) -> DefaultOptions;

    /// Resolve query options against the client defaults.
    fn default_query_options<T: QueryData, E: QueryData>(
        &self,
        options: QueryObserverOptions<T, E>,
    ) -> QueryObserverOptions<T, E> {
        options.with_defaults(&self.default_options().queries)
    }

    /// Resolve mutation options against the client defaults.
    fn default_mutation_options<T: QueryData, E: QueryData, V: QueryData>(
        &self,
        options: MutationObserverOptions<T, E, V>,
    ) -> MutationObserverOptions<T, E, V> {
        options.with_defaults(&self.default_options().mutations)
    }

    /// Build an observer for already-defaulted query options.
    fn query_observer<T: QueryData, E: QueryData>(
        &self,
        options: QueryObserverOptions<T, E>,
    ) -> Self::Query<T, E>;

    /// Build an observer for already-defaulted mutation options.
    fn mutation_observer<T: QueryData, E: QueryData, V: QueryData>(
        &self,
        options: MutationObserverOptions<T, E, V>,
    ) -> Self::Mutation<T, E, V>;
}

/// Name of the context slot holding the client.
pub const QUERY_CLIENT_KEY: &str = "query-client";

/// Context key under which providers publish a client of type `C`.
pub const fn query_client_key<C: QueryClient>() -> ContextKey<C> {
    ContextKey::new(QUERY_CLIENT_KEY)
}

/// Resolve the nearest client of type `C` provided above `scope`.
pub fn query_client<C: QueryClient>(scope: &Scope) -> Result<Arc<C>> {
    scope
        .get(query_client_key::<C>())
        .ok_or(Error::NoClient {
            key: QUERY_CLIENT_KEY,
        })
}
