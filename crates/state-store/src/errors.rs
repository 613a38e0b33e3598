use thiserror::Error;

/// Errors emitted by the persistence seam.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored value could not be encoded or decoded.
    #[error("codec failure: {0}")]
    Codec(#[from] serde_json::Error),

    /// The backing store rejected an operation.
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
