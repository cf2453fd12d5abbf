//! Result snapshots emitted by observers.
//!
//! A snapshot is replaced wholesale on every emission. Controllers expose the
//! latest one to the component's render path.

/// Lifecycle of a query's data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    /// No data yet.
    Pending,
    /// The last fetch failed and no data was ever cached.
    Error,
    Success,
}

/// Whether the query function is currently running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Fetching,
    /// A fetch wanted to run but the network mode held it back.
    Paused,
    Idle,
}

/// Snapshot of one query.
///
/// Timestamps are milliseconds since the Unix epoch, `0` when never set.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryObserverResult<T, E> {
    pub status: QueryStatus,
    pub fetch_status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<E>,
    pub data_updated_at: u64,
    pub error_updated_at: u64,
    pub failure_count: u32,
    pub is_stale: bool,
}

impl<T, E> QueryObserverResult<T, E> {
    /// Nothing cached and nothing running.
    pub fn pending() -> Self {
        Self {
            status: QueryStatus::Pending,
            fetch_status: FetchStatus::Idle,
            data: None,
            error: None,
            data_updated_at: 0,
            error_updated_at: 0,
            failure_count: 0,
            is_stale: true,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            is_stale: false,
            ..Self::pending()
        }
    }

    pub fn error(error: E) -> Self {
        Self {
            status: QueryStatus::Error,
            error: Some(error),
            failure_count: 1,
            ..Self::pending()
        }
    }

    pub fn with_fetch_status(mut self, fetch_status: FetchStatus) -> Self {
        self.fetch_status = fetch_status;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_status == FetchStatus::Fetching
    }

    pub fn is_paused(&self) -> bool {
        self.fetch_status == FetchStatus::Paused
    }

    /// First load in flight: pending and fetching.
    pub fn is_loading(&self) -> bool {
        self.is_pending() && self.is_fetching()
    }

    /// A background refetch: fetching while data or an error is already shown.
    pub fn is_refetching(&self) -> bool {
        self.is_fetching() && !self.is_pending()
    }
}

/// Lifecycle of a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Error,
    Success,
}

/// Snapshot of one mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationObserverResult<T, E, V> {
    pub status: MutationStatus,
    pub data: Option<T>,
    pub error: Option<E>,
    /// Variables of the most recent `mutate` call.
    pub variables: Option<V>,
    pub submitted_at: u64,
    pub failure_count: u32,
    pub is_paused: bool,
}

impl<T, E, V> MutationObserverResult<T, E, V> {
    pub fn idle() -> Self {
        Self {
            status: MutationStatus::Idle,
            data: None,
            error: None,
            variables: None,
            submitted_at: 0,
            failure_count: 0,
            is_paused: false,
        }
    }

    pub fn pending(variables: V) -> Self {
        Self {
            status: MutationStatus::Pending,
            variables: Some(variables),
            ..Self::idle()
        }
    }

    pub fn success(data: T, variables: V) -> Self {
        Self {
            status: MutationStatus::Success,
            data: Some(data),
            variables: Some(variables),
            ..Self::idle()
        }
    }

    pub fn error(error: E, variables: V) -> Self {
        Self {
            status: MutationStatus::Error,
            error: Some(error),
            variables: Some(variables),
            failure_count: 1,
            ..Self::idle()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == MutationStatus::Idle
    }

    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == MutationStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == MutationStatus::Error
    }
}
