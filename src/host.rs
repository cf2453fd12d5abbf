//! Reference host that drives controllers and renders a component.

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use spin::Mutex;

use crate::component::Component;
use crate::context::Scope;
use crate::controller::{ControllerHost, ReactiveController};
use crate::renderer::Renderer;
use crate::requester::{UpdateRequester, UpdateRequests};

/// Hosts one component: owns its controller registry, its context scope and
/// its queue of re-render requests.
///
/// The host:
/// 1. Calls [`ReactiveController::host_connected`] on every controller on
///    [`connect`](Self::connect), and on controllers added while connected
/// 2. Collects re-render requests from any thread via [`UpdateRequester`]s
/// 3. Coalesces queued requests into a single update in
///    [`process_updates`](Self::process_updates) or
///    [`next_update`](Self::next_update)
/// 4. Runs `host_update` on every controller, renders the component through
///    the [`Renderer`], then runs `host_updated`
/// 5. Calls [`ReactiveController::host_disconnected`] on
///    [`disconnect`](Self::disconnect)
///
/// # Type Parameters
///
/// * `Props` - The props type produced by the component
/// * `Render` - The renderer implementation type (implements [`Renderer`])
pub struct ComponentHost<Props, Render>
where
    Render: Renderer<Props>,
{
    controllers: Mutex<Vec<Arc<dyn ReactiveController>>>,
    requester: UpdateRequester,
    requests: UpdateRequests,
    renderer: Mutex<Render>,
    connected: AtomicBool,
    scope: Scope,
    _props: PhantomData<fn(Props)>,
}

impl<Props, Render> ComponentHost<Props, Render>
where
    Render: Renderer<Props>,
{
    /// Create a disconnected host at a new root scope.
    pub fn new(renderer: Render) -> Self {
        Self::with_scope(Scope::root(), renderer)
    }

    /// Create a disconnected host at `scope`, usually a child of the parent
    /// component's scope.
    pub fn with_scope(scope: Scope, renderer: Render) -> Self {
        let (requester, requests) = UpdateRequester::channel();

        ComponentHost {
            controllers: Mutex::new(Vec::new()),
            requester,
            requests,
            renderer: Mutex::new(renderer),
            connected: AtomicBool::new(false),
            scope,
            _props: PhantomData,
        }
    }

    /// The host's position in the component tree.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.lock().len()
    }

    /// Re-render requests queued and not yet processed.
    pub fn pending_updates(&self) -> usize {
        self.requests.pending()
    }

    /// Attach the host and schedule its first render.
    pub fn connect(&self) {
        if self.connected.swap(true, Ordering::AcqRel) {
            tracing::warn!("host is already connected");
            return;
        }

        let controllers = self.controllers();
        tracing::debug!(controllers = controllers.len(), "host connected");
        for controller in &controllers {
            controller.host_connected();
        }
        self.requester.request();
    }

    /// Detach the host. Requests that arrive while disconnected are discarded
    /// by the next [`process_updates`](Self::process_updates).
    pub fn disconnect(&self) {
        if !self.connected.swap(false, Ordering::AcqRel) {
            tracing::trace!("host is already disconnected");
            return;
        }

        let controllers = self.controllers();
        tracing::debug!(controllers = controllers.len(), "host disconnected");
        for controller in &controllers {
            controller.host_disconnected();
        }
    }

    /// Run one update pass: `host_update`, render, `host_updated`.
    pub fn perform_update<C>(&self, component: &C)
    where
        C: Component<Props> + ?Sized,
    {
        let controllers = self.controllers();
        for controller in &controllers {
            controller.host_update();
        }

        let props = component.render();
        self.renderer.lock().render(props);

        for controller in &controllers {
            controller.host_updated();
        }
    }

    /// Drain queued requests and, if there were any and the host is
    /// connected, run a single update. Returns whether an update ran.
    pub fn process_updates<C>(&self, component: &C) -> bool
    where
        C: Component<Props> + ?Sized,
    {
        let drained = self.requests.drain();
        self.update_coalesced(component, drained)
    }

    /// Wait for at least one request, then behave like
    /// [`process_updates`](Self::process_updates).
    ///
    /// The host holds a requester of its own, so this only returns once a
    /// request arrives.
    pub async fn next_update<C>(&self, component: &C) -> bool
    where
        C: Component<Props> + ?Sized,
    {
        if !self.requests.recv().await {
            return false;
        }
        let drained = 1 + self.requests.drain();
        self.update_coalesced(component, drained)
    }

    fn update_coalesced<C>(&self, component: &C, requests: usize) -> bool
    where
        C: Component<Props> + ?Sized,
    {
        if requests == 0 || !self.is_connected() {
            return false;
        }

        tracing::trace!(requests, "processing coalesced update");
        self.perform_update(component);
        true
    }

    fn controllers(&self) -> Vec<Arc<dyn ReactiveController>> {
        self.controllers.lock().clone()
    }
}

impl<Props, Render> ControllerHost for ComponentHost<Props, Render>
where
    Render: Renderer<Props>,
{
    fn add_controller(&self, controller: Arc<dyn ReactiveController>) {
        self.controllers.lock().push(Arc::clone(&controller));
        if self.is_connected() {
            controller.host_connected();
        }
    }

    fn remove_controller(&self, controller: &Arc<dyn ReactiveController>) {
        let target = Arc::as_ptr(controller).cast::<()>();
        self.controllers
            .lock()
            .retain(|registered| Arc::as_ptr(registered).cast::<()>() != target);
    }

    fn requester(&self) -> UpdateRequester {
        self.requester.clone()
    }
}
