//! Correction profiles: adjustment rules applied to declared measurements.
//!
//! Sellers routinely under-declare weight and dimensions, so quotes based on
//! raw listing data come in too low. A correction profile bumps the declared
//! figures before volumetric weight and rate lookup. Profiles live in the
//! database; when none is configured (or the database is unreachable) the
//! engine falls back to [`CorrectionProfile::fallback`].

use hikyaku_core::ProfileId;
use serde::{Deserialize, Serialize};

/// A single correction rule for one measurement field.
///
/// Stored in the database as a `(mode, amount)` pair. Unrecognized modes
/// deserialize to [`Correction::Unchanged`] so a bad row degrades to a no-op
/// instead of failing the quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amount", rename_all = "snake_case")]
pub enum Correction {
    /// Adjust by a percentage of the original value (e.g., `5.0` adds 5%).
    Percentage(f64),
    /// Add a fixed amount in the field's own unit (kg or cm).
    Fixed(f64),
    /// Leave the value as declared.
    #[serde(rename = "none")]
    Unchanged,
}

impl Correction {
    /// Parse a stored `(mode, amount)` pair.
    ///
    /// Unknown modes are treated as [`Correction::Unchanged`].
    #[must_use]
    pub fn parse(mode: &str, amount: f64) -> Self {
        match mode {
            "percentage" => Self::Percentage(amount),
            "fixed" => Self::Fixed(amount),
            _ => Self::Unchanged,
        }
    }

    /// Apply the rule to a value.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Percentage(pct) => value * (1.0 + pct / 100.0),
            Self::Fixed(amount) => value + amount,
            Self::Unchanged => value,
        }
    }

    /// Decompose into the stored `(mode, amount)` pair.
    #[must_use]
    pub const fn parts(&self) -> (&'static str, f64) {
        match self {
            Self::Percentage(amount) => ("percentage", *amount),
            Self::Fixed(amount) => ("fixed", *amount),
            Self::Unchanged => ("none", 0.0),
        }
    }
}

/// A named bundle of correction rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionProfile {
    /// Database id. `None` for the built-in fallback profile.
    pub id: Option<ProfileId>,
    pub name: String,
    pub description: String,
    /// Whether this profile is used when a request names no profile.
    pub is_default: bool,
    pub is_active: bool,
    /// Display/selection order for profile listings (lower sorts first).
    pub priority: i32,
    /// Optional item-category scope for future auto-selection.
    pub category_scope: Option<String>,
    /// Optional weight-range scope in kg for future auto-selection.
    pub weight_min_kg: Option<f64>,
    pub weight_max_kg: Option<f64>,
    /// Rule for the declared weight.
    pub weight_rule: Correction,
    pub length_rule: Correction,
    pub width_rule: Correction,
    pub height_rule: Correction,
    /// When set, replaces the three per-dimension rules (weight is
    /// unaffected).
    pub uniform_rule: Option<Correction>,
}

impl CorrectionProfile {
    /// The hard-coded profile used when no stored profile is resolvable.
    ///
    /// Weight +5%, every dimension +10%. These are deliberately conservative
    /// bumps that cover the typical under-declaration seen in listings.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            id: None,
            name: "Standard fallback".to_string(),
            description: "Built-in correction used when no profile is configured".to_string(),
            is_default: false,
            is_active: true,
            priority: 0,
            category_scope: None,
            weight_min_kg: None,
            weight_max_kg: None,
            weight_rule: Correction::Percentage(5.0),
            length_rule: Correction::Percentage(10.0),
            width_rule: Correction::Percentage(10.0),
            height_rule: Correction::Percentage(10.0),
            uniform_rule: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percentage() {
        assert_eq!(Correction::parse("percentage", 5.0), Correction::Percentage(5.0));
    }

    #[test]
    fn test_parse_fixed() {
        assert_eq!(Correction::parse("fixed", 0.2), Correction::Fixed(0.2));
    }

    #[test]
    fn test_parse_none() {
        assert_eq!(Correction::parse("none", 0.0), Correction::Unchanged);
    }

    #[test]
    fn test_parse_unknown_mode_is_unchanged() {
        assert_eq!(Correction::parse("multiply", 2.0), Correction::Unchanged);
    }

    #[test]
    fn test_apply_percentage() {
        let rule = Correction::Percentage(5.0);
        assert!((rule.apply(1.5) - 1.575).abs() < 1e-9);
    }

    #[test]
    fn test_apply_negative_percentage() {
        let rule = Correction::Percentage(-10.0);
        assert!((rule.apply(20.0) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_fixed() {
        let rule = Correction::Fixed(0.25);
        assert!((rule.apply(1.5) - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_apply_unchanged() {
        let rule = Correction::Unchanged;
        assert!((rule.apply(3.2) - 3.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parts_round_trip() {
        for rule in [
            Correction::Percentage(5.0),
            Correction::Fixed(-1.5),
            Correction::Unchanged,
        ] {
            let (mode, amount) = rule.parts();
            assert_eq!(Correction::parse(mode, amount), rule);
        }
    }

    #[test]
    fn test_correction_serde_shape() {
        let json = serde_json::to_string(&Correction::Percentage(5.0)).unwrap();
        assert_eq!(json, r#"{"mode":"percentage","amount":5.0}"#);

        let json = serde_json::to_string(&Correction::Unchanged).unwrap();
        assert_eq!(json, r#"{"mode":"none"}"#);
    }

    #[test]
    fn test_fallback_profile() {
        let profile = CorrectionProfile::fallback();
        assert_eq!(profile.id, None);
        assert!(profile.is_active);
        assert!(!profile.is_default);
        assert_eq!(profile.weight_rule, Correction::Percentage(5.0));
        assert_eq!(profile.length_rule, Correction::Percentage(10.0));
        assert_eq!(profile.width_rule, Correction::Percentage(10.0));
        assert_eq!(profile.height_rule, Correction::Percentage(10.0));
        assert_eq!(profile.uniform_rule, None);
    }
}
