//! Errors raised while wiring controllers to a component.
//!
//! Only construction can fail. Failures of the queries and mutations
//! themselves never surface here; they are reported as data through the
//! `error` field of the observer result.

use thiserror::Error;

/// Construction-time failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No ancestor scope provides a client under the given context key.
    #[error("no query client in scope (context key `{key}`)")]
    NoClient { key: &'static str },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
