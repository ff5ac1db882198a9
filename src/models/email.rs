use std::fmt;

use lettre::Address;
use serde::Serialize;

use crate::error::AppError;

/// A syntactically valid mail address, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        trimmed
            .parse::<Address>()
            .map_err(|err| AppError::validation(format!("invalid email `{trimmed}`: {err}")))?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_valid_addresses() {
        let email = Email::parse("  ana@x.com ").unwrap();
        assert_eq!(email.as_str(), "ana@x.com");
        assert_eq!(email.domain(), "x.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "ana", "ana@", "@x.com", "ana x@x.com"] {
            assert!(
                matches!(Email::parse(raw), Err(AppError::Validation(_))),
                "`{raw}` should be rejected"
            );
        }
    }
}
