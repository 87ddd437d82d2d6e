use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetch error: {location}: {message}")]
    Fetch { location: String, message: String },

    #[error("Extraction error: {source_id}: {message}")]
    Extraction { source_id: String, message: String },

    #[error("Corrupt state file {path}: {message}")]
    StateCorrupt { path: String, message: String },

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        AppError::Notify(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        AppError::Notify(err.to_string())
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(err: lettre::address::AddressError) -> Self {
        AppError::Notify(format!("invalid address: {}", err))
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
