//! Volumetric and chargeable weight.

use super::correction::{WEIGHT_DECIMALS, round_dp};

/// Divisor for the air-freight volumetric formula (cm^3 per kg).
///
/// 5000 is the figure used by Japan Post and the major international
/// couriers for cross-border parcels.
pub const VOLUMETRIC_DIVISOR: f64 = 5000.0;

/// Volumetric weight in kg from corrected dimensions in cm.
///
/// `(L x W x H) / 5000`, rounded to 3 decimal places. Returns `0.0` when any
/// dimension is zero or negative, so weight-only quotes fall back to actual
/// weight.
#[must_use]
pub fn volumetric_weight(length_cm: f64, width_cm: f64, height_cm: f64) -> f64 {
    if length_cm <= 0.0 || width_cm <= 0.0 || height_cm <= 0.0 {
        return 0.0;
    }
    round_dp(length_cm * width_cm * height_cm / VOLUMETRIC_DIVISOR, WEIGHT_DECIMALS)
}

/// Chargeable weight: the greater of corrected actual weight and volumetric
/// weight, rounded to 3 decimal places.
#[must_use]
pub fn chargeable_weight(corrected_kg: f64, volumetric_kg: f64) -> f64 {
    round_dp(corrected_kg.max(volumetric_kg), WEIGHT_DECIMALS)
}
