//! Seller email addresses.

use serde::{Deserialize, Serialize};

/// Why a string is not an acceptable seller email.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {0} characters")]
    TooLong(usize),
    #[error("email cannot contain spaces")]
    Whitespace,
    /// Zero or several `@`, or nothing in front of it.
    #[error("email must look like name@domain")]
    Shape,
    /// The part after `@` is not a dotted host name with a real TLD.
    #[error("email domain must look like example.com")]
    Domain,
}

/// A seller's login email, checked before the sign-in and sign-up forms
/// send anything.
///
/// The check is deliberately shallow: one `@` with a non-empty local part,
/// no whitespace, and a domain of at least two labels whose last label has
/// two or more characters. The backend remains the authority.
///
/// ```
/// use seller_panel_core::Email;
///
/// assert!(Email::parse("seller.name+shop@mail.example.com.br").is_ok());
/// assert!(Email::parse("seller@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// # Errors
    ///
    /// Returns the first [`EmailError`] the input runs into.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        match raw {
            "" => return Err(EmailError::Empty),
            _ if raw.len() > Self::MAX_LENGTH => return Err(EmailError::TooLong(Self::MAX_LENGTH)),
            _ if raw.contains(char::is_whitespace) => return Err(EmailError::Whitespace),
            _ => {}
        }

        let Some((local, domain)) = raw.split_once('@') else {
            return Err(EmailError::Shape);
        };
        if local.is_empty() || domain.contains('@') {
            return Err(EmailError::Shape);
        }

        let mut labels = domain.split('.').rev();
        let tld_ok = labels.next().is_some_and(|tld| tld.chars().count() >= 2);
        let rest: Vec<&str> = labels.collect();
        if !tld_ok || rest.is_empty() || rest.iter().any(|label| label.is_empty()) {
            return Err(EmailError::Domain);
        }

        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for raw in [
            "seller@example.com",
            "seller.name@example.com",
            "seller+tag@example.com",
            "seller@shop.example.com.br",
        ] {
            assert_eq!(Email::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_rejections() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse(" seller@example.com"), Err(EmailError::Whitespace));
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::Shape));
        assert_eq!(Email::parse("a@b@example.com"), Err(EmailError::Shape));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::Shape));

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong(254)));
    }

    #[test]
    fn test_domain_needs_a_dot_and_a_tld() {
        for raw in [
            "seller@",
            "seller@localhost",
            "seller@example.",
            "seller@example.c",
            "seller@.com",
            "seller@shop..com",
        ] {
            assert_eq!(Email::parse(raw), Err(EmailError::Domain), "{raw}");
        }
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email: Email = "seller@example.com".parse().unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"seller@example.com\"");
    }
}
