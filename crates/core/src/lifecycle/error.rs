//! Error types for lifecycle transitions.

use thiserror::Error;

/// Errors raised when a requested transition or mutation is illegal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The requested status transition is not permitted.
    #[error("cannot transition from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },

    /// The document's financial fields are locked in its current status.
    #[error("document cannot be edited in status '{status}'")]
    EditLocked {
        /// Current status.
        status: &'static str,
    },

    /// The document cannot be deleted in its current status.
    #[error("document cannot be deleted in status '{status}'")]
    DeleteLocked {
        /// Current status.
        status: &'static str,
    },

    /// The quotation has recorded payments and is locked.
    #[error("quotation has {count} recorded payment(s) and is locked")]
    HasPayments {
        /// Number of recorded payments.
        count: usize,
    },
}
