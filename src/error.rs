//! # error
//!
//! generator fault types
//!

use std::fmt;

use crate::state::State;

/// boxed error type returned by producers and observers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// lifecycle hook that was running when a host fault happened
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Hook {
    /// the init hook, first `step()`
    Init,
    /// the per-value notification
    Step,
    /// the dispose hook
    Dispose,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Init => "init",
            Hook::Step => "step",
            Hook::Dispose => "dispose",
        };
        f.write_str(name)
    }
}

/// an operation called outside the states it is allowed in
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Misuse {
    /// `current()` without a live value
    #[error("no value has been produced by the last step")]
    NoValue,
    /// `step()` after a terminal state
    #[error("step called on a {0} generator")]
    Terminated(State),
}

/// generator errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// the caller broke the polling contract, the generator is unchanged
    #[error("generator misuse: {0}")]
    Misuse(#[from] Misuse),
    /// the producer failed while computing a value
    #[error("producer fault: {0}")]
    Producer(#[source] BoxError),
    /// a lifecycle hook failed, the generator is poisoned
    #[error("{hook} hook failed: {source}")]
    Host {
        /// the failing hook
        hook: Hook,
        /// the hook's own error
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// is this a misuse of the polling contract
    pub fn is_misuse(&self) -> bool {
        matches!(self, Error::Misuse(_))
    }

    /// is this a fault raised by the producer
    pub fn is_producer(&self) -> bool {
        matches!(self, Error::Producer(_))
    }

    /// is this a fatal lifecycle hook fault
    pub fn is_host(&self) -> bool {
        matches!(self, Error::Host { .. })
    }
}
