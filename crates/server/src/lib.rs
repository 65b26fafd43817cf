use axum::{Json, http::StatusCode, response::IntoResponse};

use advisor::AdvisorError;
use engine::EngineError;
use serde::Serialize;

pub use auth::{AuthError, SessionUser, TokenVerifier};
pub use identity::{IdentityClient, IdentityError};
pub use server::{ServerState, router, run_with_listener};

mod auth;
mod expenses;
mod forecast;
mod identity;
mod server;
mod suggest;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{
            CountryUpdate, LoginRequest, MeResponse, MessageResponse, PasswordUpdate,
            UserMetadataResponse,
        };
    }

    pub mod expense {
        pub use api_types::expense::{
            CategoryTotalView, ExpenseListResponse, ExpenseNew, ExpenseUpdate, ExpenseView,
            SummaryResponse,
        };
    }

    pub mod forecast {
        pub use api_types::forecast::ForecastResponse;
    }

    pub mod suggest {
        pub use api_types::suggest::{SuggestionRequest, SuggestionResponse};
    }
}

/// Everything a handler can fail with. The status mapping lives here and
/// nowhere else; handlers only use `?`.
pub enum ServerError {
    Auth(AuthError),
    Engine(EngineError),
    Advisor(AdvisorError),
    Identity(IdentityError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidAmount(_) | EngineError::InvalidItem(_) | EngineError::EmptyUpdate => {
            StatusCode::BAD_REQUEST
        }
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn status_for_identity_error(err: &IdentityError) -> StatusCode {
    match err {
        IdentityError::BadCredentials => StatusCode::UNAUTHORIZED,
        IdentityError::Network(_) | IdentityError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn message_for_identity_error(err: IdentityError) -> String {
    match err {
        IdentityError::BadCredentials => "invalid credentials".to_string(),
        other => {
            tracing::error!("identity provider error: {other}");
            "identity provider unavailable".to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Auth(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Advisor(err) => {
                tracing::error!("model call failed: {err}");
                (StatusCode::BAD_GATEWAY, "suggestion unavailable".to_string())
            }
            ServerError::Identity(err) => (
                status_for_identity_error(&err),
                message_for_identity_error(err),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AdvisorError> for ServerError {
    fn from(value: AdvisorError) -> Self {
        Self::Advisor(value)
    }
}

impl From<IdentityError> for ServerError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}
