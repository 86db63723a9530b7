//! Errors that stop a server node.

use thiserror::Error;

use crate::infrastructure::store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Connecting or subscribing to the shared store failed
    #[error("shared store error: {0}")]
    Store(#[from] StoreError),

    /// Binding or serving the listener failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
