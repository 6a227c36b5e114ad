/// Crate-wide result alias.
pub type TilesortResult<T> = Result<T, TilesortError>;

/// Error taxonomy for the visualization pipeline.
///
/// `InvalidImage` and `Config` are detected eagerly, before any frame is
/// produced. `Validation` covers broken internal contracts that defensive
/// checks catch at component boundaries. `Storage` and `Encode` abort a run
/// after scratch-directory cleanup.
#[derive(thiserror::Error, Debug)]
pub enum TilesortError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("encoder error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TilesortError {
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
