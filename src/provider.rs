//! Owns a client and publishes it to descendant components.
//!
//! A provider is composed into a host rather than inherited from: it is
//! registered as one more controller, so the host's connect and disconnect
//! hooks mount and unmount the client.
//!
//! ```text
//! Unmounted --host_connected--> Mounted --host_disconnected--> Unmounted
//! ```

use std::sync::Arc;

use spin::Mutex;

use crate::client::{query_client_key, QueryClient};
use crate::context::Scope;
use crate::controller::{ControllerHost, ReactiveController};

/// Whether the provider's client is currently mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderState {
    Unmounted,
    Mounted,
}

/// Publishes one client in a [`Scope`] and ties its mount state to a host.
///
/// The client is created once and never replaced. Controllers in the
/// provider's scope or any child scope resolve it with
/// [`query_client`](crate::query_client).
pub struct QueryClientProvider<C: QueryClient> {
    client: Arc<C>,
    scope: Scope,
    state: Mutex<ProviderState>,
}

impl<C: QueryClient> QueryClientProvider<C> {
    /// Take ownership of `client`, publish it in `scope` and register with `host`.
    pub fn new<H>(host: &H, scope: &Scope, client: C) -> Arc<Self>
    where
        H: ControllerHost + ?Sized,
    {
        Self::with_client(host, scope, Arc::new(client))
    }

    /// Like [`new`](Self::new) for a client that is already shared.
    pub fn with_client<H>(host: &H, scope: &Scope, client: Arc<C>) -> Arc<Self>
    where
        H: ControllerHost + ?Sized,
    {
        scope.provide(query_client_key::<C>(), Arc::clone(&client));

        let provider = Arc::new(QueryClientProvider {
            client,
            scope: scope.clone(),
            state: Mutex::new(ProviderState::Unmounted),
        });
        host.add_controller(provider.clone());
        provider
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// The scope the client is published in.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn state(&self) -> ProviderState {
        *self.state.lock()
    }
}

impl<C: QueryClient> ReactiveController for QueryClientProvider<C> {
    fn host_connected(&self) {
        {
            let mut state = self.state.lock();
            if *state == ProviderState::Mounted {
                tracing::warn!("provider connected while already mounted");
                return;
            }
            *state = ProviderState::Mounted;
        }
        self.client.mount();
        tracing::debug!("query client mounted");
    }

    fn host_disconnected(&self) {
        {
            let mut state = self.state.lock();
            if *state == ProviderState::Unmounted {
                tracing::trace!("provider disconnected while unmounted");
                return;
            }
            *state = ProviderState::Unmounted;
        }
        self.client.unmount();
        tracing::debug!("query client unmounted");
    }
}
