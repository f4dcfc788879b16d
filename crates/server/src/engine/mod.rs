//! The shipping quote engine.
//!
//! Produces a complete quote from declared package measurements:
//!
//! 1. Validate the measurements ([`ValidationError`] is the only error a
//!    quote can fail with).
//! 2. Resolve the correction profile (requested id, then the default, then
//!    the built-in fallback).
//! 3. Apply the profile's correction rules.
//! 4. Derive volumetric and chargeable weight.
//! 5. Look up rate table options and append the built-in estimate.
//! 6. Rank options by price and attach recommendation notes.
//!
//! Profile and rate stores are reached through the seams in [`stores`]; when
//! either store fails or times out the engine logs it and quotes from the
//! fallbacks instead. A request that validates always gets a quote.

pub mod correction;
pub mod rates;
pub mod recommend;
pub mod resolver;
pub mod stores;
pub mod volumetric;

use std::sync::Arc;
use std::time::Duration;

use hikyaku_core::{CountryCode, ProfileId};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{CorrectionSummary, PackageMeasurement, ShippingQuote};
use stores::{ProfileStore, RateStore};

/// Rejected quote input. The message is shown to the operator as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Weight missing/non-positive or destination empty.
    #[error("weight and destination required")]
    MissingWeightOrDestination,
    /// A dimension was negative (or not a number).
    #[error("dimensions must be zero or positive")]
    NegativeDimensions,
}

/// The quote engine. Cheap to clone; stores are shared.
#[derive(Clone)]
pub struct ShippingCalculator {
    profiles: Arc<dyn ProfileStore>,
    rates: Arc<dyn RateStore>,
    store_timeout: Duration,
}

impl ShippingCalculator {
    /// Create a calculator over the given stores.
    ///
    /// `store_timeout` bounds each individual store call; a call that runs
    /// past it is treated like a store failure.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        rates: Arc<dyn RateStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            profiles,
            rates,
            store_timeout,
        }
    }

    /// Produce a quote for the given measurements.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the input is unusable. Store
    /// failures never error: the engine degrades to the built-in fallback
    /// profile and estimated option.
    #[instrument(
        skip(self, measurement),
        fields(
            destination = %measurement.destination,
            weight_kg = measurement.weight_kg,
            profile_id = ?profile_id,
        )
    )]
    pub async fn calculate(
        &self,
        measurement: PackageMeasurement,
        profile_id: Option<ProfileId>,
    ) -> Result<ShippingQuote, ValidationError> {
        let destination = validate(&measurement)?;

        let profile =
            resolver::resolve_profile(self.profiles.as_ref(), profile_id, self.store_timeout).await;
        let corrected = correction::apply_profile(&profile, &measurement);

        let volumetric_weight_kg =
            volumetric::volumetric_weight(corrected.length_cm, corrected.width_cm, corrected.height_cm);
        let chargeable_weight_kg =
            volumetric::chargeable_weight(corrected.weight_kg, volumetric_weight_kg);

        let (options, database_used) = rates::lookup_options(
            self.rates.as_ref(),
            &destination,
            chargeable_weight_kg,
            self.store_timeout,
        )
        .await;

        let correction = CorrectionSummary {
            profile_id: profile.id,
            profile_name: profile.name,
            weight_change: corrected.weight_change.clone(),
        };
        let (options, recommendations) = recommend::rank_and_recommend(options, Some(&correction));

        debug!(
            chargeable_weight_kg,
            database_used,
            option_count = options.len(),
            "Quote calculated"
        );

        Ok(ShippingQuote {
            original: measurement,
            corrected,
            volumetric_weight_kg,
            chargeable_weight_kg,
            destination,
            database_used,
            correction,
            options,
            recommendations,
        })
    }
}

/// Check the measurements and normalize the destination.
fn validate(measurement: &PackageMeasurement) -> Result<CountryCode, ValidationError> {
    if !measurement.weight_kg.is_finite() || measurement.weight_kg <= 0.0 {
        return Err(ValidationError::MissingWeightOrDestination);
    }
    for dimension in [
        measurement.length_cm,
        measurement.width_cm,
        measurement.height_cm,
    ] {
        if !dimension.is_finite() || dimension < 0.0 {
            return Err(ValidationError::NegativeDimensions);
        }
    }
    measurement
        .destination
        .parse()
        .map_err(|_| ValidationError::MissingWeightOrDestination)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hikyaku_core::{DataSource, RateId, Yen};
    use stores::{StaticProfileStore, StaticRateStore};

    use crate::models::{CorrectionProfile, RateTableRow};

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn measurement(weight_kg: f64, destination: &str) -> PackageMeasurement {
        PackageMeasurement {
            weight_kg,
            length_cm: 20.0,
            width_cm: 15.0,
            height_cm: 10.0,
            destination: destination.to_string(),
        }
    }

    fn calculator_with(
        profiles: Vec<CorrectionProfile>,
        rates: Vec<RateTableRow>,
    ) -> ShippingCalculator {
        ShippingCalculator::new(
            Arc::new(StaticProfileStore::new(profiles)),
            Arc::new(StaticRateStore::new(rates)),
            TIMEOUT,
        )
    }

    fn us_rate(price: i64) -> RateTableRow {
        RateTableRow {
            id: RateId::new(1),
            company_code: "JP_POST".to_string(),
            service_code: "EMS".to_string(),
            carrier_code: "JP_POST".to_string(),
            country_code: "US".parse().unwrap(),
            weight_from_g: 1500,
            weight_to_g: 2000,
            price_jpy: Yen::new(price),
            zone_code: None,
            data_source: DataSource::Database,
        }
    }

    #[tokio::test]
    async fn test_validation_rejects_zero_weight() {
        let calculator = calculator_with(Vec::new(), Vec::new());
        let err = calculator
            .calculate(measurement(0.0, "US"), None)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingWeightOrDestination);
        assert_eq!(err.to_string(), "weight and destination required");
    }

    #[tokio::test]
    async fn test_validation_rejects_empty_destination() {
        let calculator = calculator_with(Vec::new(), Vec::new());
        let err = calculator
            .calculate(measurement(1.5, "  "), None)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingWeightOrDestination);
    }

    #[tokio::test]
    async fn test_validation_rejects_negative_dimension() {
        let calculator = calculator_with(Vec::new(), Vec::new());
        let mut m = measurement(1.5, "US");
        m.width_cm = -3.0;
        let err = calculator.calculate(m, None).await.unwrap_err();
        assert_eq!(err, ValidationError::NegativeDimensions);
    }

    #[tokio::test]
    async fn test_validation_rejects_nan_weight() {
        let calculator = calculator_with(Vec::new(), Vec::new());
        let err = calculator
            .calculate(measurement(f64::NAN, "US"), None)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingWeightOrDestination);
    }

    #[tokio::test]
    async fn test_destination_is_normalized() {
        let calculator = calculator_with(Vec::new(), Vec::new());
        let quote = calculator
            .calculate(measurement(1.5, " us "), None)
            .await
            .unwrap();
        assert_eq!(quote.destination.as_str(), "US");
        // The original echoes the request untouched.
        assert_eq!(quote.original.destination, " us ");
    }

    #[tokio::test]
    async fn test_empty_stores_still_quote() {
        let calculator = calculator_with(Vec::new(), Vec::new());
        let quote = calculator
            .calculate(measurement(1.5, "US"), None)
            .await
            .unwrap();

        assert!(!quote.database_used);
        assert_eq!(quote.options.len(), 1);
        assert_eq!(quote.options[0].source, DataSource::Mock);
        assert_eq!(quote.correction.profile_id, None);
        assert_eq!(quote.correction.profile_name, "Standard fallback");
    }

    #[tokio::test]
    async fn test_full_pipeline_with_database_rate() {
        let mut default_profile = CorrectionProfile::fallback();
        default_profile.id = Some(ProfileId::new(1));
        default_profile.name = "Default".to_string();
        default_profile.is_default = true;

        let calculator = calculator_with(vec![default_profile], vec![us_rate(2100)]);
        let quote = calculator
            .calculate(measurement(1.5, "US"), None)
            .await
            .unwrap();

        // 1.5 kg +5% = 1.575; dims +10%: 22 x 16.5 x 11 -> volumetric 0.799
        assert!((quote.corrected.weight_kg - 1.575).abs() < 1e-9);
        assert!((quote.volumetric_weight_kg - 0.799).abs() < 1e-9);
        assert!((quote.chargeable_weight_kg - 1.575).abs() < 1e-9);

        assert!(quote.database_used);
        assert_eq!(quote.options.len(), 2);
        // 2100 beats the 3745 estimate, so the database row ranks first.
        assert_eq!(quote.options[0].source, DataSource::Database);
        assert_eq!(quote.options[0].price_jpy, Yen::new(2100));
        assert_eq!(quote.options[1].price_jpy, Yen::new(3745));

        assert_eq!(quote.correction.profile_id, Some(ProfileId::new(1)));
        assert_eq!(quote.correction.weight_change, "+5.0%");

        let titles: Vec<&str> = quote
            .recommendations
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Correction applied", "Cheapest option", "Live rate"]);
    }

    #[tokio::test]
    async fn test_requested_profile_overrides_default() {
        let mut default_profile = CorrectionProfile::fallback();
        default_profile.id = Some(ProfileId::new(1));
        default_profile.is_default = true;

        let mut heavy = CorrectionProfile::fallback();
        heavy.id = Some(ProfileId::new(2));
        heavy.name = "Heavy items".to_string();
        heavy.weight_rule = crate::models::Correction::Percentage(20.0);

        let calculator = calculator_with(vec![default_profile, heavy], Vec::new());
        let quote = calculator
            .calculate(measurement(1.0, "US"), Some(ProfileId::new(2)))
            .await
            .unwrap();

        assert_eq!(quote.correction.profile_id, Some(ProfileId::new(2)));
        assert!((quote.corrected.weight_kg - 1.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_profile_id_degrades_to_default() {
        let mut default_profile = CorrectionProfile::fallback();
        default_profile.id = Some(ProfileId::new(1));
        default_profile.name = "Default".to_string();
        default_profile.is_default = true;

        let calculator = calculator_with(vec![default_profile], Vec::new());
        let quote = calculator
            .calculate(measurement(1.0, "US"), Some(ProfileId::new(99)))
            .await
            .unwrap();

        assert_eq!(quote.correction.profile_name, "Default");
    }

    #[tokio::test]
    async fn test_volumetric_weight_drives_chargeable_for_bulky_packages() {
        let calculator = calculator_with(Vec::new(), Vec::new());
        let quote = calculator
            .calculate(
                PackageMeasurement {
                    weight_kg: 1.0,
                    length_cm: 55.0,
                    width_cm: 36.0,
                    height_cm: 36.0,
                    destination: "US".to_string(),
                },
                None,
            )
            .await
            .unwrap();

        // Corrected dims +10%: 60.5 x 39.6 x 39.6 = 94,873.68 cm^3 / 5000
        assert!((quote.volumetric_weight_kg - 18.975).abs() < 1e-9);
        assert!((quote.chargeable_weight_kg - 18.975).abs() < 1e-9);
    }
}
