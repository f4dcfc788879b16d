//! Applying a correction profile to declared measurements.

use crate::models::{CorrectedPackage, CorrectionProfile, PackageMeasurement};

/// Decimal places kept for corrected weights (kg).
pub const WEIGHT_DECIMALS: u32 = 3;

/// Decimal places kept for corrected dimensions (cm).
pub const DIMENSION_DECIMALS: u32 = 2;

/// Floor applied to the original value when computing a percentage change,
/// so a zero original does not divide by zero.
pub const PERCENT_EPSILON: f64 = 0.001;

/// Round half away from zero to `decimals` places.
///
/// This matches how the rate cards and customer-facing figures are rounded
/// elsewhere in the back office, which `f64::round` alone (ties away from
/// zero, but only to whole numbers) does not give us at arbitrary precision.
#[must_use]
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// Signed percentage change from `original` to `corrected`, formatted like
/// `"+5.0%"` or `"-12.3%"`.
#[must_use]
pub fn percent_change(original: f64, corrected: f64) -> String {
    let base = original.max(PERCENT_EPSILON);
    let pct = (corrected - original) / base * 100.0;
    format!("{pct:+.1}%")
}

/// Apply a profile's rules to declared measurements.
///
/// The weight rule always applies on its own. When the profile has a uniform
/// rule, it replaces the three per-dimension rules. Corrected weight is
/// rounded to 3 decimal places, dimensions to 2, and each field carries its
/// percentage change relative to the declared value.
#[must_use]
pub fn apply_profile(
    profile: &CorrectionProfile,
    measurement: &PackageMeasurement,
) -> CorrectedPackage {
    let (length_rule, width_rule, height_rule) = match &profile.uniform_rule {
        Some(uniform) => (uniform, uniform, uniform),
        None => (
            &profile.length_rule,
            &profile.width_rule,
            &profile.height_rule,
        ),
    };

    let weight_kg = round_dp(profile.weight_rule.apply(measurement.weight_kg), WEIGHT_DECIMALS);
    let length_cm = round_dp(length_rule.apply(measurement.length_cm), DIMENSION_DECIMALS);
    let width_cm = round_dp(width_rule.apply(measurement.width_cm), DIMENSION_DECIMALS);
    let height_cm = round_dp(height_rule.apply(measurement.height_cm), DIMENSION_DECIMALS);

    CorrectedPackage {
        weight_kg,
        length_cm,
        width_cm,
        height_cm,
        weight_change: percent_change(measurement.weight_kg, weight_kg),
        length_change: percent_change(measurement.length_cm, length_cm),
        width_change: percent_change(measurement.width_cm, width_cm),
        height_change: percent_change(measurement.height_cm, height_cm),
    }
}
