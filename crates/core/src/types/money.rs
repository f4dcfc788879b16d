//! Type-safe money representation for shipping prices.
//!
//! Carrier rate cards and the auction back-office both quote in integer
//! Japanese yen, so [`Yen`] wraps an `i64` rather than a decimal. The USD
//! figure shown alongside each quote is derived, never stored.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount of Japanese yen.
///
/// Yen has no minor unit in practice, so the amount is an integer.
/// Serializes as a bare number, e.g. `2800`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Yen(i64);

impl Yen {
    /// Fixed conversion rate used for the advisory USD figure.
    ///
    /// The back-office displays USD as a rough guide for overseas buyers;
    /// it is intentionally a constant, not a live FX feed.
    pub const JPY_PER_USD: i64 = 150;

    /// Create an amount from integer yen.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the underlying integer amount.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Convert to US dollars at the fixed rate, rounded to 2 decimal
    /// places (half away from zero) and rescaled so `4` renders as `4.00`.
    #[must_use]
    pub fn to_usd(&self) -> Decimal {
        let mut usd = Decimal::from(self.0) / Decimal::from(Self::JPY_PER_USD);
        usd = usd.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        usd.rescale(2);
        usd
    }
}

impl fmt::Display for Yen {
    /// Formats with thousands separators, e.g. `12,800`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if self.0 < 0 {
            write!(f, "-{grouped}")
        } else {
            write!(f, "{grouped}")
        }
    }
}

impl From<i64> for Yen {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

impl From<Yen> for i64 {
    fn from(amount: Yen) -> Self {
        amount.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Yen {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Yen {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Yen {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Yen::new(0).to_string(), "0");
        assert_eq!(Yen::new(600).to_string(), "600");
        assert_eq!(Yen::new(2800).to_string(), "2,800");
        assert_eq!(Yen::new(12800).to_string(), "12,800");
        assert_eq!(Yen::new(1_234_567).to_string(), "1,234,567");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Yen::new(-2800).to_string(), "-2,800");
    }

    #[test]
    fn test_to_usd_rounds_to_cents() {
        // 2800 / 150 = 18.666... -> 18.67
        assert_eq!(Yen::new(2800).to_usd().to_string(), "18.67");
        // 4000 / 150 = 26.666... -> 26.67
        assert_eq!(Yen::new(4000).to_usd().to_string(), "26.67");
    }

    #[test]
    fn test_to_usd_pads_to_two_places() {
        // 600 / 150 = 4 exactly; still rendered with cents
        assert_eq!(Yen::new(600).to_usd().to_string(), "4.00");
        assert_eq!(Yen::new(0).to_usd().to_string(), "0.00");
    }

    #[test]
    fn test_serde_transparent() {
        let amount = Yen::new(2800);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "2800");

        let parsed: Yen = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, amount);
    }

    #[test]
    fn test_ordering() {
        let mut prices = vec![Yen::new(4200), Yen::new(1800), Yen::new(2800)];
        prices.sort();
        assert_eq!(
            prices,
            vec![Yen::new(1800), Yen::new(2800), Yen::new(4200)]
        );
    }
}
