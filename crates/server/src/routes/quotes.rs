//! Quote calculation endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;

use hikyaku_core::ProfileId;

use crate::error::Result;
use crate::models::{PackageMeasurement, ShippingQuote};
use crate::state::AppState;

/// Request body for `POST /api/quotes`.
///
/// Every field is defaulted so a missing `weight_kg` or `destination`
/// surfaces as the engine's validation message rather than a
/// deserialization error.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub length_cm: f64,
    #[serde(default)]
    pub width_cm: f64,
    #[serde(default)]
    pub height_cm: f64,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
}

/// Calculate a shipping quote.
///
/// Responds 400 with the validation message when the input is unusable.
/// Store failures never fail the request; the engine degrades to its
/// built-in fallbacks and the quote says so via `database_used`.
pub async fn create_quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<ShippingQuote>> {
    let measurement = PackageMeasurement {
        weight_kg: body.weight_kg,
        length_cm: body.length_cm,
        width_cm: body.width_cm,
        height_cm: body.height_cm,
        destination: body.destination,
    };

    let quote = state
        .calculator()
        .calculate(measurement, body.profile_id)
        .await?;

    Ok(Json(quote))
}
