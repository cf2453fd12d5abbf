//! Observer options and the client-wide defaults they are merged with.
//!
//! The controllers never interpret these records; they build them from the
//! component's options closure, merge them with the client's
//! [`DefaultOptions`] and hand them to the engine's observer.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::QueryKey;

/// A boxed, sendable future, as produced by query and mutation functions.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Function the engine calls to fetch a query's data.
pub type QueryFn<T, E> =
    Arc<dyn Fn(QueryFunctionContext) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Function the engine calls to perform a mutation with its variables.
pub type MutationFn<T, E, V> = Arc<dyn Fn(V) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Arguments passed to a [`QueryFn`].
#[derive(Clone, Debug, PartialEq)]
pub struct QueryFunctionContext {
    pub query_key: QueryKey,
    pub meta: Option<Value>,
}

/// When the engine is allowed to run fetches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    /// Only fetch while the network is reachable.
    #[default]
    Online,
    /// Fetch regardless of connectivity.
    Always,
    /// Run the first attempt, then pause retries while offline.
    OfflineFirst,
}

/// Retry policy, written as `true`, `false` or an attempt count in config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Retry {
    Flag(bool),
    Count(u32),
}

impl Retry {
    /// Whether another attempt is allowed after `failure_count` failures.
    pub fn should_retry(&self, failure_count: u32) -> bool {
        match *self {
            Retry::Flag(enabled) => enabled,
            Retry::Count(max) => failure_count < max,
        }
    }
}

/// Client-wide defaults, loadable from any serde format.
///
/// ```rust
/// use std::time::Duration;
/// use oxide_query::{DefaultOptions, Retry};
///
/// let defaults: DefaultOptions = serde_json::from_str(
///     r#"{ "queries": { "stale_time": 30000, "retry": 2 }, "mutations": { "retry": false } }"#,
/// ).unwrap();
///
/// assert_eq!(defaults.queries.stale_time, Some(Duration::from_secs(30)));
/// assert_eq!(defaults.queries.retry, Some(Retry::Count(2)));
/// assert_eq!(defaults.mutations.retry, Some(Retry::Flag(false)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultOptions {
    pub queries: QueryDefaults,
    pub mutations: MutationDefaults,
}

/// Defaults applied to every query observer. Durations are milliseconds in
/// serialized form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    #[serde(with = "duration_ms", skip_serializing_if = "Option::is_none")]
    pub stale_time: Option<Duration>,
    #[serde(with = "duration_ms", skip_serializing_if = "Option::is_none")]
    pub gc_time: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<Retry>,
    #[serde(with = "duration_ms", skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refetch_on_window_focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refetch_on_reconnect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refetch_on_mount: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<NetworkMode>,
}

/// Defaults applied to every mutation observer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationDefaults {
    #[serde(with = "duration_ms", skip_serializing_if = "Option::is_none")]
    pub gc_time: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<Retry>,
    #[serde(with = "duration_ms", skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<NetworkMode>,
}

/// Options for one query observer.
///
/// Built by a component's options closure on every host update; see
/// [`QueryController`](crate::QueryController).
pub struct QueryObserverOptions<T, E> {
    pub query_key: QueryKey,
    /// Cache hash of `query_key`; filled in by [`with_defaults`](Self::with_defaults).
    pub query_hash: Option<String>,
    pub query_fn: Option<QueryFn<T, E>>,
    pub enabled: Option<bool>,
    pub stale_time: Option<Duration>,
    pub gc_time: Option<Duration>,
    pub retry: Option<Retry>,
    pub retry_delay: Option<Duration>,
    pub refetch_on_window_focus: Option<bool>,
    pub refetch_on_reconnect: Option<bool>,
    pub refetch_on_mount: Option<bool>,
    pub network_mode: Option<NetworkMode>,
    pub meta: Option<Value>,
    /// Set once the record went through [`with_defaults`](Self::with_defaults).
    pub defaulted: bool,
}

impl<T, E> QueryObserverOptions<T, E> {
    pub fn new(query_key: impl Into<QueryKey>) -> Self {
        Self {
            query_key: query_key.into(),
            query_hash: None,
            query_fn: None,
            enabled: None,
            stale_time: None,
            gc_time: None,
            retry: None,
            retry_delay: None,
            refetch_on_window_focus: None,
            refetch_on_reconnect: None,
            refetch_on_mount: None,
            network_mode: None,
            meta: None,
            defaulted: false,
        }
    }

    pub fn query_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(QueryFunctionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.query_fn = Some(Arc::new(move |ctx| {
            Box::pin(f(ctx)) as BoxFuture<'static, Result<T, E>>
        }));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = Some(stale_time);
        self
    }

    pub fn gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = Some(gc_time);
        self
    }

    pub fn retry(mut self, retry: Retry) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Merge with client-wide defaults.
    ///
    /// Values set on `self` win. The query hash is derived from the key when
    /// missing, and `refetch_on_reconnect` falls back to "unless the network
    /// mode is [`NetworkMode::Always`]". Records that are already defaulted
    /// are returned unchanged.
    pub fn with_defaults(mut self, defaults: &QueryDefaults) -> Self {
        if self.defaulted {
            return self;
        }

        let network_mode = self
            .network_mode
            .or(defaults.network_mode)
            .unwrap_or_default();

        self.stale_time = self.stale_time.or(defaults.stale_time);
        self.gc_time = self.gc_time.or(defaults.gc_time);
        self.retry = self.retry.or(defaults.retry);
        self.retry_delay = self.retry_delay.or(defaults.retry_delay);
        self.enabled = self.enabled.or(defaults.enabled);
        self.refetch_on_window_focus = self
            .refetch_on_window_focus
            .or(defaults.refetch_on_window_focus);
        self.refetch_on_mount = self.refetch_on_mount.or(defaults.refetch_on_mount);
        self.refetch_on_reconnect = self
            .refetch_on_reconnect
            .or(defaults.refetch_on_reconnect)
            .or(Some(network_mode != NetworkMode::Always));
        self.network_mode = Some(network_mode);

        if self.query_hash.is_none() {
            self.query_hash = Some(self.query_key.hash());
        }

        self.defaulted = true;
        self
    }

    /// Context handed to the query function for the current key.
    pub fn function_context(&self) -> QueryFunctionContext {
        QueryFunctionContext {
            query_key: self.query_key.clone(),
            meta: self.meta.clone(),
        }
    }
}

impl<T, E> Clone for QueryObserverOptions<T, E> {
    fn clone(&self) -> Self {
        Self {
            query_key: self.query_key.clone(),
            query_hash: self.query_hash.clone(),
            query_fn: self.query_fn.clone(),
            enabled: self.enabled,
            stale_time: self.stale_time,
            gc_time: self.gc_time,
            retry: self.retry,
            retry_delay: self.retry_delay,
            refetch_on_window_focus: self.refetch_on_window_focus,
            refetch_on_reconnect: self.refetch_on_reconnect,
            refetch_on_mount: self.refetch_on_mount,
            network_mode: self.network_mode,
            meta: self.meta.clone(),
            defaulted: self.defaulted,
        }
    }
}

impl<T, E> fmt::Debug for QueryObserverOptions<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryObserverOptions")
            .field("query_key", &self.query_key)
            .field("query_hash", &self.query_hash)
            .field("query_fn", &self.query_fn.as_ref().map(|_| "<fn>"))
            .field("enabled", &self.enabled)
            .field("stale_time", &self.stale_time)
            .field("gc_time", &self.gc_time)
            .field("retry", &self.retry)
            .field("network_mode", &self.network_mode)
            .field("defaulted", &self.defaulted)
            .finish_non_exhaustive()
    }
}

/// Options for one mutation observer.
pub struct MutationObserverOptions<T, E, V> {
    pub mutation_key: Option<QueryKey>,
    pub mutation_fn: Option<MutationFn<T, E, V>>,
    pub gc_time: Option<Duration>,
    pub retry: Option<Retry>,
    pub retry_delay: Option<Duration>,
    pub network_mode: Option<NetworkMode>,
    pub meta: Option<Value>,
    pub defaulted: bool,
}

impl<T, E, V> Default for MutationObserverOptions<T, E, V> {
    fn default() -> Self {
        Self {
            mutation_key: None,
            mutation_fn: None,
            gc_time: None,
            retry: None,
            retry_delay: None,
            network_mode: None,
            meta: None,
            defaulted: false,
        }
    }
}

impl<T, E, V> MutationObserverOptions<T, E, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mutation_key(mut self, key: impl Into<QueryKey>) -> Self {
        self.mutation_key = Some(key.into());
        self
    }

    pub fn mutation_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.mutation_fn = Some(Arc::new(move |variables| {
            Box::pin(f(variables)) as BoxFuture<'static, Result<T, E>>
        }));
        self
    }

    pub fn retry(mut self, retry: Retry) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Merge with client-wide mutation defaults. Values set on `self` win.
    pub fn with_defaults(mut self, defaults: &MutationDefaults) -> Self {
        if self.defaulted {
            return self;
        }

        self.gc_time = self.gc_time.or(defaults.gc_time);
        self.retry = self.retry.or(defaults.retry);
        self.retry_delay = self.retry_delay.or(defaults.retry_delay);
        self.network_mode = Some(
            self.network_mode
                .or(defaults.network_mode)
                .unwrap_or_default(),
        );
        self.defaulted = true;
        self
    }
}

impl<T, E, V> Clone for MutationObserverOptions<T, E, V> {
    fn clone(&self) -> Self {
        Self {
            mutation_key: self.mutation_key.clone(),
            mutation_fn: self.mutation_fn.clone(),
            gc_time: self.gc_time,
            retry: self.retry,
            retry_delay: self.retry_delay,
            network_mode: self.network_mode,
            meta: self.meta.clone(),
            defaulted: self.defaulted,
        }
    }
}

impl<T, E, V> fmt::Debug for MutationObserverOptions<T, E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationObserverOptions")
            .field("mutation_key", &self.mutation_key)
            .field("mutation_fn", &self.mutation_fn.as_ref().map(|_| "<fn>"))
            .field("gc_time", &self.gc_time)
            .field("retry", &self.retry)
            .field("network_mode", &self.network_mode)
            .field("defaulted", &self.defaulted)
            .finish_non_exhaustive()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => {
                let millis = u64::try_from(duration.as_millis())
                    .map_err(|_| S::Error::custom("duration does not fit in u64 milliseconds"))?;
                s.serialize_some(&millis)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
