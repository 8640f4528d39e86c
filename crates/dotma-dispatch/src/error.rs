//! Error types for the dispatch core.

use crate::platform::PlatformError;
use crate::store::StoreError;

/// Failure raised while running a command's action.
#[derive(thiserror::Error, Debug)]
pub enum ExecutionError {
    /// The invoking user's access level is below the command's minimum.
    #[error("access denied: requires {required}, user has {actual}")]
    AccessDenied {
        /// Minimum level the command requires.
        required: dotma_common::AccessLevel,
        /// Level the invoking user holds.
        actual: dotma_common::AccessLevel,
    },

    /// The persistence layer failed mid-action.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The platform failed to deliver a send or reply.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A confirmation flow for this user is already in progress.
    #[error("an interactive flow is already pending for this user")]
    FlowPending,

    /// Any other action failure.
    #[error("{0}")]
    Failed(String),
}

/// Failure raised by a single dispatch cycle.
///
/// Nothing here propagates past the dispatcher: the caller of
/// [`crate::Dispatcher::parse_line`] only ever sees a
/// [`crate::DispatchOutcome`].
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    /// The persistence layer is not yet connected; the command is dropped.
    #[error("persistence layer is not ready")]
    NotReady,

    /// The extracted argument count does not match the requirement.
    #[error("invalid arguments")]
    InvalidArguments,

    /// User-record lookup or mutation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A platform send/reply failed during the cycle.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The command's action failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl DispatchError {
    /// Short kind label for structured log lines.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotReady => "not_ready",
            Self::InvalidArguments => "invalid_arguments",
            Self::Store(_) => "store",
            Self::Platform(_) => "platform",
            Self::Execution(_) => "execution",
        }
    }
}
