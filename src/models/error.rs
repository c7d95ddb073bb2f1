use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("File too large: {0}")]
    TooLarge(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn message(&self) -> &str {
        match self {
            AppError::Io(msg) => msg,
            AppError::Archive(msg) => msg,
            AppError::Upload(msg) => msg,
            AppError::TooLarge(msg) => msg,
            AppError::Configuration(msg) => msg,
            AppError::Internal(msg) => msg,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Upload(_) => 400,
            AppError::TooLarge(_) => 413,
            AppError::Io(_)
            | AppError::Archive(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
