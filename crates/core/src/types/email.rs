//! Account email addresses.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a string was rejected as an [`Email`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    /// Not of the form `local@domain`.
    #[error("email must look like name@domain")]
    Malformed,
}

/// The login identifier of a user account.
///
/// Surrounding whitespace is dropped. What remains must fit the
/// `users.email` column and be a single `@` with something on each side and
/// no whitespace. Deliverability is never checked.
///
/// ```
/// use hotspots_core::Email;
///
/// assert_eq!(Email::parse(" angler@lake.org ").unwrap().as_str(), "angler@lake.org");
/// assert!(Email::parse("angler").is_err());
/// assert!(Email::parse("an gler@lake.org").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Width of the `users.email` column.
    pub const MAX_LENGTH: usize = 120;

    /// Validate and normalize an address.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`] characters, or not `local@domain`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let well_formed = s.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }) && !s.chars().any(|c| c.is_whitespace() || c.is_control());

        if well_formed {
            Ok(Self(s.to_owned()))
        } else {
            Err(EmailError::Malformed)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        for ok in ["a@b.c", "test_user12@test.com", "first.last+fish@lake.co.uk"] {
            assert_eq!(Email::parse(ok).unwrap().as_str(), ok);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        for bad in [
            "angler",
            "@lake.org",
            "angler@",
            "a@b@c",
            "an gler@lake.org",
            "ang\0ler@lake.org",
        ] {
            assert_eq!(Email::parse(bad), Err(EmailError::Malformed), "{bad}");
        }
    }

    #[test]
    fn test_column_limit() {
        let exact = format!("{}@example.com", "a".repeat(Email::MAX_LENGTH - 12));
        assert!(Email::parse(&exact).is_ok());

        let over = format!("a{exact}");
        assert_eq!(
            Email::parse(&over),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_serializes_as_string() {
        let email = Email::parse("angler@lake.org").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"angler@lake.org\"");
        assert_eq!(email.to_string(), "angler@lake.org");
    }
}
