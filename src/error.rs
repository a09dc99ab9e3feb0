//! Error type shared by the store, the recycler and the binding controller.
//!
//! Every failure here is local and synchronous. None of them are retried; the
//! only guarantee is that a failed call never leaves the index-to-view mapping
//! in a corrupted state.

use thiserror::Error;

/// Errors raised by the recycler subsystem.
#[derive(Error, Debug)]
pub enum Error {
    /// An index was read or written past the end of the model.
    #[error("index {index} is out of range for a model of length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The model length at the time of the call.
        len: usize,
    },

    /// The view pool or the model could not grow.
    #[error("allocation failure: capacity {capacity} exhausted")]
    AllocationFailure {
        /// The bound that could not be exceeded.
        capacity: usize,
    },

    /// A row view was asked to refresh or route an edit while unbound.
    #[error("binding invariant violated: row view is not bound")]
    Unbound,

    /// An edit arrived from a view that does not display the index it reports.
    #[error("binding invariant violated: slot {slot} reported index {reported} but is bound to {bound:?}")]
    MisroutedEdit {
        /// Pool slot the edit came from.
        slot: usize,
        /// Index carried by the edit.
        reported: usize,
        /// Index the slot is actually bound to, if any.
        bound: Option<usize>,
    },

    /// The recycler was asked for a visible range before its view factory was installed.
    #[error("recycler is not initialized: install a view factory first")]
    NotInitialized,

    /// A seeded record carried an `index` that does not match its position.
    #[error("record at position {position} carries index {index}")]
    IndexMismatch {
        /// Actual position in the payload.
        position: usize,
        /// Index the record claimed.
        index: usize,
    },

    /// A bulk-load payload could not be parsed.
    #[error("invalid row payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for programming errors in the view/index mapping.
    pub fn is_binding_violation(&self) -> bool {
        matches!(self, Error::Unbound | Error::MisroutedEdit { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
