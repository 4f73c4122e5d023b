//! Identity of the signed-in user and demo sign-in/sign-up checks.
//!
//! An [`Identity`] is just an email string used to scope persisted data. The
//! checks in [`Credentials`] are cosmetic: nothing is verified against a
//! backend and passwords are never stored.

use std::fmt;

use crate::{EngineError, ResultEngine};

/// Minimum password length accepted on sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Email string that scopes a user's data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    /// Validate and wrap an email. Rejects blank input and input without `@`.
    pub fn parse(raw: &str) -> ResultEngine<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EngineError::MissingField("email".to_string()));
        }
        if !trimmed.contains('@') {
            return Err(EngineError::InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a value read back from storage, skipping the `@` check.
    pub(crate) fn from_stored(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Form-level validation for the login screen.
pub struct Credentials;

impl Credentials {
    /// Check a sign-in form and return the identity to log in as.
    pub fn sign_in(email: &str, password: &str) -> ResultEngine<Identity> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(EngineError::MissingField(
                "please enter both email and password".to_string(),
            ));
        }
        Identity::parse(email)
    }

    /// Check a sign-up form and return the identity of the new account.
    pub fn sign_up(email: &str, password: &str, confirm: &str) -> ResultEngine<Identity> {
        if email.trim().is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(EngineError::MissingField(
                "please fill in all fields".to_string(),
            ));
        }
        let identity = Identity::parse(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EngineError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        if password != confirm {
            return Err(EngineError::PasswordMismatch);
        }
        Ok(identity)
    }
}
