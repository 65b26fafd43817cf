//! Handles settings for the application. Configuration is written in
//! `settings.toml`, with `SPESA_*` environment variables taking precedence.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Identity {
    pub url: String,
    pub anon_key: String,
    pub service_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Gemini {
    pub api_key: String,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    /// Shared secret the identity provider signs session tokens with.
    pub jwt_secret: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    pub identity: Identity,
    pub gemini: Gemini,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .add_source(Environment::with_prefix("SPESA").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
