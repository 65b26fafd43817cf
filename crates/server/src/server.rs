use std::sync::Arc;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use advisor::TextModel;
use engine::Engine;

use crate::{auth, expenses, forecast, identity::IdentityClient, suggest};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Generative model behind the [`TextModel`] seam; tests plug a stub in.
    pub model: Arc<dyn TextModel>,
    pub identity: IdentityClient,
    pub verifier: auth::TokenVerifier,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: ServerState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/user-metadata", get(auth::user_metadata))
        .route("/auth/update-password", post(auth::update_password))
        .route("/auth/update-country", post(auth::update_country))
        .route("/expenses/", post(expenses::create).get(expenses::list))
        .route("/expenses/summary", get(expenses::summary))
        .route(
            "/expenses/{id}",
            axum::routing::put(expenses::update).delete(expenses::delete),
        )
        .route("/forecast/monthly", get(forecast::monthly))
        .route("/ai/suggest", post(suggest::suggest))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::session));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(cors)
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    allowed_origins: &[String],
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state, allowed_origins))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
