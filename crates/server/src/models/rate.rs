//! Carrier rate table rows.

use hikyaku_core::{CountryCode, DataSource, RateId, Yen};

/// One row of the carrier rate table: a price for a destination country and
/// weight band.
///
/// Band bounds are in grams and are exclusive at the lower bound, inclusive
/// at the upper bound, so adjacent bands like (0, 500] and (500, 1000] never
/// both match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTableRow {
    pub id: RateId,
    /// Shipping company (e.g., `JP_POST`, `DHL`).
    pub company_code: String,
    /// Service within the company (e.g., `EMS`, `DHL_EXPRESS`).
    pub service_code: String,
    /// Carrier network handling the final leg.
    pub carrier_code: String,
    pub country_code: CountryCode,
    pub weight_from_g: i32,
    pub weight_to_g: i32,
    pub price_jpy: Yen,
    /// Carrier zone the destination falls in, when the rate card has zones.
    pub zone_code: Option<String>,
    pub data_source: DataSource,
}

impl RateTableRow {
    /// Whether a chargeable weight in grams falls inside this band.
    #[must_use]
    pub const fn matches(&self, weight_grams: i32) -> bool {
        self.weight_from_g < weight_grams && weight_grams <= self.weight_to_g
    }

    /// Human-readable band label, e.g. `"0.5-1 kg"`.
    #[must_use]
    pub fn band_label(&self) -> String {
        format!(
            "{}-{} kg",
            f64::from(self.weight_from_g) / 1000.0,
            f64::from(self.weight_to_g) / 1000.0
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(from_g: i32, to_g: i32) -> RateTableRow {
        RateTableRow {
            id: RateId::new(1),
            company_code: "JP_POST".to_string(),
            service_code: "EMS".to_string(),
            carrier_code: "JP_POST".to_string(),
            country_code: "US".parse().unwrap(),
            weight_from_g: from_g,
            weight_to_g: to_g,
            price_jpy: Yen::new(2100),
            zone_code: None,
            data_source: DataSource::Database,
        }
    }

    #[test]
    fn test_band_lower_bound_exclusive() {
        let band = row(500, 1000);
        assert!(!band.matches(500));
        assert!(band.matches(501));
    }

    #[test]
    fn test_band_upper_bound_inclusive() {
        let band = row(500, 1000);
        assert!(band.matches(1000));
        assert!(!band.matches(1001));
    }

    #[test]
    fn test_adjacent_bands_do_not_overlap() {
        let lower = row(0, 500);
        let upper = row(500, 1000);
        for grams in [1, 499, 500, 501, 1000] {
            let hits = usize::from(lower.matches(grams)) + usize::from(upper.matches(grams));
            assert_eq!(hits, 1, "weight {grams}g matched {hits} bands");
        }
    }

    #[test]
    fn test_band_label() {
        assert_eq!(row(500, 1000).band_label(), "0.5-1 kg");
        assert_eq!(row(1500, 2000).band_label(), "1.5-2 kg");
    }
}
