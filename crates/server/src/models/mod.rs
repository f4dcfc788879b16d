//! Domain models for the shipping quote service.

pub mod profile;
pub mod quote;
pub mod rate;

pub use profile::{Correction, CorrectionProfile};
pub use quote::{
    CorrectedPackage, CorrectionSummary, PackageMeasurement, Recommendation, ShippingOption,
    ShippingQuote,
};
pub use rate::RateTableRow;
