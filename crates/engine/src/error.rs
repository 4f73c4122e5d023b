//! The module contains the error the engine can throw.
//!
//! Validation errors ([`InvalidAmount`], [`MissingField`], [`InvalidEmail`],
//! [`PasswordTooShort`], [`PasswordMismatch`], [`InvalidName`],
//! [`ExistingKey`]) leave every piece of state untouched. [`Storage`] is the
//! only error coming from the key-value backend.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`MissingField`]: EngineError::MissingField
//!  [`InvalidEmail`]: EngineError::InvalidEmail
//!  [`PasswordTooShort`]: EngineError::PasswordTooShort
//!  [`PasswordMismatch`]: EngineError::PasswordMismatch
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Storage`]: EngineError::Storage
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Missing information: {0}")]
    MissingField(String),
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Password too short: must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("Passwords don't match")]
    PasswordMismatch,
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Returns `true` for errors caused by user input rather than the backend.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::MissingField(_)
                | Self::InvalidEmail(_)
                | Self::PasswordTooShort(_)
                | Self::PasswordMismatch
                | Self::InvalidName(_)
                | Self::ExistingKey(_)
        )
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InvalidEmail(a), Self::InvalidEmail(b)) => a == b,
            (Self::PasswordTooShort(a), Self::PasswordTooShort(b)) => a == b,
            (Self::PasswordMismatch, Self::PasswordMismatch) => true,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::NotAuthenticated, Self::NotAuthenticated) => true,
            (Self::Storage(a), Self::Storage(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
