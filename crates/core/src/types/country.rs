//! Destination country code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CountryCodeError {
    /// The input string is empty or whitespace-only.
    #[error("destination country cannot be empty")]
    Empty,
}

/// A destination country code, e.g. `"US"` or `"DE"`.
///
/// Codes are stored uppercase so that lookups against the rate tables are
/// case-insensitive. Beyond trimming and rejecting empty input, no validation
/// is applied: a code with no rate coverage is a legitimate value that simply
/// resolves to the fallback courier options.
///
/// ## Constraints
///
/// - Must contain at least one non-whitespace character
/// - Normalized to uppercase with surrounding whitespace removed
///
/// ## Examples
///
/// ```
/// use hikyaku_core::CountryCode;
///
/// let us = CountryCode::parse("us").unwrap();
/// assert_eq!(us.as_str(), "US");
///
/// assert!(CountryCode::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a `CountryCode` from a string.
    ///
    /// Trims surrounding whitespace and uppercases the remainder.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or whitespace-only.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(CountryCodeError::Empty);
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the country code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CountryCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CountryCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CountryCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed normalized
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CountryCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        let code = CountryCode::parse("us").unwrap();
        assert_eq!(code.as_str(), "US");

        let code = CountryCode::parse("De").unwrap();
        assert_eq!(code.as_str(), "DE");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let code = CountryCode::parse("  gb  ").unwrap();
        assert_eq!(code.as_str(), "GB");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(CountryCode::parse(""), Err(CountryCodeError::Empty)));
    }

    #[test]
    fn test_parse_whitespace_only() {
        assert!(matches!(
            CountryCode::parse("   "),
            Err(CountryCodeError::Empty)
        ));
    }

    #[test]
    fn test_parse_accepts_unknown_codes() {
        // No allowlist: unknown destinations fall through to mock rates later.
        assert!(CountryCode::parse("XX").is_ok());
        assert!(CountryCode::parse("NARNIA").is_ok());
    }

    #[test]
    fn test_display() {
        let code = CountryCode::parse("jp").unwrap();
        assert_eq!(format!("{code}"), "JP");
    }

    #[test]
    fn test_serde_roundtrip() {
        let code = CountryCode::parse("fr").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"FR\"");

        let parsed: CountryCode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, code);
    }

    #[test]
    fn test_from_str() {
        let code: CountryCode = "au".parse().unwrap();
        assert_eq!(code.as_str(), "AU");
    }

    #[test]
    fn test_as_ref() {
        let code = CountryCode::parse("CA").unwrap();
        let s: &str = code.as_ref();
        assert_eq!(s, "CA");
    }
}
