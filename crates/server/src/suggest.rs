//! AI suggestion endpoint.

use api_types::suggest::{SuggestionRequest, SuggestionResponse};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use advisor::LoanTerms;

use crate::{ServerError, auth::SessionUser, server::ServerState};

/// Loan terms are only meaningful as a whole; partial input is ignored.
fn loan_terms(payload: &SuggestionRequest) -> Option<LoanTerms> {
    Some(LoanTerms {
        principal: payload.loan_principal?,
        tenure_months: payload.loan_tenure_months?,
        inception_month: payload.loan_inception_month?,
        inception_year: payload.loan_inception_year?,
        annual_rate: payload.loan_interest_rate?,
    })
}

pub async fn suggest(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    payload: Option<Json<SuggestionRequest>>,
) -> Result<Json<SuggestionResponse>, ServerError> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();

    let totals = state.engine.category_totals(&user.user_id).await?;
    if totals.is_empty() {
        return Err(ServerError::Generic(
            "no expenses found to analyze".to_string(),
        ));
    }

    let location = match payload.location.clone() {
        Some(location) => Some(location),
        None => state.identity.country_of(&user.access_token).await,
    };
    let loan = loan_terms(&payload);

    let suggestion = advisor::suggest(
        state.model.as_ref(),
        location.as_deref(),
        &totals,
        loan.as_ref(),
        Utc::now(),
    )
    .await?;

    Ok(Json(SuggestionResponse { suggestion }))
}
