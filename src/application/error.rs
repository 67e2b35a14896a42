use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid hash")]
    InvalidHash,

    #[error("Authentication failed. Invalid credentials.")]
    Unauthorized,

    #[error("Source hash '{0}' not found in simulated accounts.")]
    AccountNotFound(String),

    #[error("Insufficient funds for hash '{hash}'. Current balance: {balance}")]
    InsufficientFunds { hash: String, balance: String },

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Coarse classification of [`AppError`], used by transport layers to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    InsufficientFunds,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingFields(_) | AppError::InvalidAmount(_) | AppError::InvalidHash => {
                ErrorKind::BadRequest
            }
            AppError::Unauthorized => ErrorKind::Unauthorized,
            AppError::AccountNotFound(_) => ErrorKind::NotFound,
            AppError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AppError::InvalidSeed(_) | AppError::Database(_) => ErrorKind::Internal,
        }
    }
}
