//! Re-render requests sent from controllers to their host.

use flume::{Receiver, Sender};

/// Handle a controller uses to ask its host for a re-render.
///
/// This is the controller's only reference back to the host. It does not keep
/// the host alive; requests sent after the host is gone are dropped.
///
/// `UpdateRequester` wraps a lock-free channel sender, making it cheap to
/// clone and usable from whichever thread the engine delivers results on.
pub struct UpdateRequester(Sender<()>);

impl Clone for UpdateRequester {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl UpdateRequester {
    /// Create a connected requester/queue pair for a host.
    pub fn channel() -> (UpdateRequester, UpdateRequests) {
        let (sender, receiver) = flume::unbounded();
        (UpdateRequester(sender), UpdateRequests(receiver))
    }

    /// Queue one re-render request.
    pub fn request(&self) {
        if self.0.send(()).is_err() {
            tracing::warn!("update requested after the host was dropped");
        }
    }
}

/// The host side of an [`UpdateRequester`].
pub struct UpdateRequests(Receiver<()>);

impl UpdateRequests {
    /// Number of requests queued and not yet drained.
    pub fn pending(&self) -> usize {
        self.0.len()
    }

    /// Remove every queued request, returning how many there were.
    pub fn drain(&self) -> usize {
        self.0.try_iter().count()
    }

    /// Wait for the next request. Returns `false` once every requester is gone.
    pub async fn recv(&self) -> bool {
        self.0.recv_async().await.is_ok()
    }
}
