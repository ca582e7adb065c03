use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Empty or non-numeric item fields, or nothing to render yet.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A command needed a selected item and none was given.
    #[error("Selection error: {0}")]
    SelectionError(String),

    #[error("Index error: item {index} does not exist (the invoice has {len} items)")]
    IndexError { index: usize, len: usize },

    /// Unreadable or undecodable logo/font.
    #[error("Asset error: {0}")]
    AssetError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DocumentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DocumentError::ValidationError(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        DocumentError::RenderError(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        DocumentError::AssetError(msg.into())
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(error: std::io::Error) -> Self {
        DocumentError::IoError(error.to_string())
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
