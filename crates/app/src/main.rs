use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spesa={level},server={level},engine={level},advisor={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    tracing::info!("Found server settings...");
    let db = parse_database(&server.database).await?;

    let engine = engine::Engine::builder().database(db.clone()).build().await?;

    let http = reqwest::Client::new();
    let model = advisor::GeminiClient::new(
        http.clone(),
        server.gemini.api_key.clone(),
        server.gemini.model.clone(),
    );
    let identity = server::IdentityClient::new(
        http,
        server.identity.url.clone(),
        server.identity.anon_key.clone(),
        server.identity.service_key.clone(),
    );

    let state = server::ServerState {
        engine: Arc::new(engine),
        model: Arc::new(model),
        identity,
        verifier: server::TokenVerifier::new(&server.jwt_secret),
    };

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(state, &server.allowed_origins, listener).await?;

    // Release the pooled connection once the server has drained.
    db.close().await?;
    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
