//! Component trait defining what a host renders.

/// A UI component driven by a [`ComponentHost`](crate::ComponentHost).
///
/// The component builds its controllers in its constructor, passing the host
/// and its scope, and reads their results in [`render`](Self::render).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use oxide_query::testing::TestClient;
/// use oxide_query::{Component, ComponentHost, QueryController, QueryObserverOptions, Result};
///
/// struct RepoCard {
///     repo: Arc<QueryController<TestClient, String, String>>,
/// }
///
/// impl RepoCard {
///     fn new(host: &ComponentHost<String, impl oxide_query::Renderer<String>>) -> Result<Self> {
///         let repo = QueryController::new(host, host.scope(), || {
///             QueryObserverOptions::new(["repoData"])
///         })?;
///         Ok(RepoCard { repo })
///     }
/// }
///
/// impl Component<String> for RepoCard {
///     fn render(&self) -> String {
///         self.repo.with_result(|result| match (&result.data, &result.error) {
///             (_, Some(error)) => format!("An error has occurred: {error}"),
///             (Some(name), None) => name.clone(),
///             (None, None) => "Loading...".to_string(),
///         })
///     }
/// }
/// ```
pub trait Component<Props> {
    /// Reduce the component's current state, including controller results,
    /// to Props.
    ///
    /// Called once per host update, after every controller's
    /// [`host_update`](crate::ReactiveController::host_update).
    fn render(&self) -> Props;
}

/// Closures returning Props are components.
impl<Props, F> Component<Props> for F
where
    F: Fn() -> Props,
{
    fn render(&self) -> Props {
        self()
    }
}
