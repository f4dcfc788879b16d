//! Quote input and output types.

use hikyaku_core::{CountryCode, DataSource, ProfileId, ServiceType, Yen};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Declared package measurements, as entered in the listing.
///
/// Dimensions default to zero when omitted; a quote can be produced from
/// weight and destination alone (volumetric weight is then zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageMeasurement {
    pub weight_kg: f64,
    #[serde(default)]
    pub length_cm: f64,
    #[serde(default)]
    pub width_cm: f64,
    #[serde(default)]
    pub height_cm: f64,
    /// Destination country, as entered (normalized during validation).
    pub destination: String,
}

/// Measurements after the correction profile has been applied.
///
/// Weight is rounded to 3 decimal places, dimensions to 2. The `*_change`
/// strings are signed percentages relative to the declared values, e.g.
/// `"+5.0%"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectedPackage {
    pub weight_kg: f64,
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub weight_change: String,
    pub length_change: String,
    pub width_change: String,
    pub height_change: String,
}

/// Which profile corrected the measurements, for display in the quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionSummary {
    /// `None` when the built-in fallback profile was used.
    pub profile_id: Option<ProfileId>,
    pub profile_name: String,
    /// Signed percentage change applied to the weight, e.g. `"+5.0%"`.
    pub weight_change: String,
}

/// A single shipping option offered in a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingOption {
    pub service_name: String,
    pub service_code: String,
    pub company_code: String,
    pub price_jpy: Yen,
    /// Price converted to USD at the fixed display rate, 2 decimal places.
    pub price_usd: Decimal,
    /// Estimated delivery window in days, e.g. `"2-4"`.
    pub delivery_days: String,
    pub tracking: bool,
    pub insurance: bool,
    pub service_type: ServiceType,
    /// Weight band the price was taken from. `None` for estimated options.
    pub weight_range: Option<String>,
    pub source: DataSource,
}

/// A short human-readable note attached to a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub message: String,
}

/// A complete shipping quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingQuote {
    /// Measurements as declared in the request.
    pub original: PackageMeasurement,
    pub corrected: CorrectedPackage,
    pub volumetric_weight_kg: f64,
    /// The weight rates are looked up with: max(corrected, volumetric).
    pub chargeable_weight_kg: f64,
    pub destination: CountryCode,
    /// Whether any option came from the rate table (as opposed to the
    /// built-in estimate).
    pub database_used: bool,
    pub correction: CorrectionSummary,
    /// Options sorted by price ascending.
    pub options: Vec<ShippingOption>,
    pub recommendations: Vec<Recommendation>,
}
