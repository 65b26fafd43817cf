//! Forecast API endpoint.

use api_types::forecast::ForecastResponse;
use axum::{Extension, Json, extract::State};
use engine::currency;

use crate::{ServerError, auth::SessionUser, server::ServerState};

/// Linear projection of the caller's current-month spending.
pub async fn monthly(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
) -> Result<Json<ForecastResponse>, ServerError> {
    let forecast = state.engine.monthly_forecast(&user.user_id).await?;

    let symbol = match state.identity.country_of(&user.access_token).await {
        Some(country) => currency::currency_symbol(&country).map(str::to_string),
        None => None,
    };

    Ok(Json(ForecastResponse {
        this_month: forecast.this_month,
        next_month: forecast.next_month,
        next_six_month: forecast.next_six_month,
        next_year: forecast.next_year,
        symbol,
    }))
}
