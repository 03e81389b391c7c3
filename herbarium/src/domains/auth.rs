//! Login and registration bodies.

use serde::Serialize;

use crate::errors::{HerbariumError, Result};

/// Login body: `{"username": ..., "password": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Registration form. The confirmation is checked locally and never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

impl Registration {
    pub fn validate(&self) -> Result<()> {
        if self.password != self.password_confirm {
            return Err(HerbariumError::PasswordMismatch);
        }
        if !self.email.contains('@') {
            return Err(HerbariumError::InvalidEmail {
                email: self.email.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, password: &str, confirm: &str) -> Registration {
        Registration {
            email: email.into(),
            username: "ana".into(),
            password: password.into(),
            password_confirm: confirm.into(),
        }
    }

    #[test]
    fn mismatched_passwords_are_checked_first() {
        let err = registration("no-at-sign", "a", "b").validate().unwrap_err();
        assert!(matches!(err, HerbariumError::PasswordMismatch));
    }

    #[test]
    fn email_needs_an_at_sign() {
        let err = registration("ana.example", "pw", "pw").validate().unwrap_err();
        assert!(matches!(err, HerbariumError::InvalidEmail { ref email } if email == "ana.example"));
        assert!(registration("ana@example", "pw", "pw").validate().is_ok());
    }
}
