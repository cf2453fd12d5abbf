//! Renderer abstraction for rendering Props.

#[cfg(any(test, feature = "testing"))]
use std::sync::Arc;

#[cfg(any(test, feature = "testing"))]
use spin::Mutex;

/// Renderer abstraction for rendering Props.
///
/// Implement this trait to connect a [`ComponentHost`](crate::ComponentHost)
/// to your rendering system (UI framework, terminal, embedded display, etc.).
///
/// # Example
///
/// ```rust
/// use oxide_query::Renderer;
///
/// struct ConsoleRenderer;
///
/// impl Renderer<String> for ConsoleRenderer {
///     fn render(&mut self, props: String) {
///         println!("{props}");
///     }
/// }
/// ```
pub trait Renderer<Props> {
    /// Render the props produced by one host update.
    fn render(&mut self, props: Props);
}

impl<Props, R: Renderer<Props> + ?Sized> Renderer<Props> for Box<R> {
    fn render(&mut self, props: Props) {
        (**self).render(props);
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test renderer that captures all rendered Props for assertions.
///
/// Only available with the `testing` feature.
///
/// Clones share the same capture storage, so keep one clone for assertions
/// and hand the other to the host.
pub struct TestRenderer<Props> {
    renders: Arc<Mutex<Vec<Props>>>,
}

#[cfg(any(test, feature = "testing"))]
impl<Props> Clone for TestRenderer<Props> {
    fn clone(&self) -> Self {
        Self {
            renders: self.renders.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl<Props> Renderer<Props> for TestRenderer<Props> {
    fn render(&mut self, props: Props) {
        self.renders.lock().push(props);
    }
}

#[cfg(any(test, feature = "testing"))]
impl<Props> Default for TestRenderer<Props> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl<Props> TestRenderer<Props> {
    pub fn new() -> Self {
        Self {
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of renders that have occurred.
    pub fn count(&self) -> usize {
        self.renders.lock().len()
    }

    /// Access the captured renders with a closure.
    pub fn with_renders<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<Props>) -> R,
    {
        let renders = self.renders.lock();
        f(&renders)
    }
}

#[cfg(any(test, feature = "testing"))]
impl<Props: Clone> TestRenderer<Props> {
    /// The most recent render, if any.
    pub fn last(&self) -> Option<Props> {
        self.renders.lock().last().cloned()
    }
}
