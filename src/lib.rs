//! Query and mutation controllers for reactive component hosts.
//!
//! Binds an external query engine (the owner of caching, retries and network
//! I/O) to the lifecycle of UI components. A component builds a
//! [`QueryController`] or [`MutationController`] in its constructor; the
//! controller subscribes to an engine observer while the host is connected,
//! mirrors each result snapshot into a field the component reads when
//! rendering, and asks the host to re-render on every emission.
//!
//! A [`QueryClientProvider`] owns the engine's client, publishes it in a
//! [`Scope`] for descendants and mounts/unmounts it with its host.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use oxide_query::testing::TestClient;
//! use oxide_query::{
//!     Component, ComponentHost, QueryClientProvider, QueryController, QueryObserverOptions,
//!     QueryObserverResult, TestRenderer,
//! };
//!
//! struct Answer {
//!     query: Arc<QueryController<TestClient, u32, String>>,
//! }
//!
//! impl Component<String> for Answer {
//!     fn render(&self) -> String {
//!         let result = self.query.result();
//!         match result.data {
//!             Some(answer) => format!("answer: {answer}"),
//!             None => "Loading...".to_string(),
//!         }
//!     }
//! }
//!
//! let renderer = TestRenderer::<String>::new();
//! let host = ComponentHost::new(renderer.clone());
//! QueryClientProvider::new(&host, host.scope(), TestClient::new());
//!
//! let answer = Answer {
//!     query: QueryController::new(&host, host.scope(), || {
//!         QueryObserverOptions::new(["x"]).query_fn(|_| async { Ok(42) })
//!     })
//!     .unwrap(),
//! };
//!
//! host.connect();
//! host.process_updates(&answer);
//! assert_eq!(renderer.last().as_deref(), Some("Loading..."));
//!
//! // The engine delivers a result; the host re-renders once.
//! answer.query.observer().emit(QueryObserverResult::success(42));
//! host.process_updates(&answer);
//! assert_eq!(renderer.last().as_deref(), Some("answer: 42"));
//!
//! host.disconnect();
//! ```

// Module declarations
mod client;
mod component;
mod context;
mod controller;
mod error;
mod host;
mod key;
mod observer;
mod options;
mod provider;
mod renderer;
mod requester;
mod result;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Public re-exports
pub use client::{query_client, query_client_key, QueryClient, QueryData, QUERY_CLIENT_KEY};
pub use component::Component;
pub use context::{ContextKey, Scope};
pub use controller::{
    ControllerHost, MutationController, QueryController, ReactiveController, ResultController,
};
pub use error::{Error, Result};
pub use host::ComponentHost;
pub use key::QueryKey;
pub use observer::{Listener, MutationObserver, Observer, QueryObserver, Unsubscribe};
pub use options::{
    BoxFuture, DefaultOptions, MutationDefaults, MutationFn, MutationObserverOptions,
    NetworkMode, QueryDefaults, QueryFn, QueryFunctionContext, QueryObserverOptions, Retry,
};
pub use provider::{ProviderState, QueryClientProvider};
pub use renderer::Renderer;
pub use requester::{UpdateRequester, UpdateRequests};
pub use result::{
    FetchStatus, MutationObserverResult, MutationStatus, QueryObserverResult, QueryStatus,
};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use renderer::TestRenderer;
