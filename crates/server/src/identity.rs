//! Client for the external identity provider's REST API.
//!
//! The provider owns credentials and profile metadata (including the
//! `country` field the currency annotation relies on); the backend only
//! calls through. User-scoped calls carry the anon key plus the caller's
//! access token, admin calls carry the service key.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid credentials")]
    BadCredentials,
    #[error("identity provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
}

#[derive(Clone, Debug)]
pub struct IdentityClient {
    client: Client,
    base_url: String,
    anon_key: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Profile fields the backend cares about.
#[derive(Debug, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    user_metadata: ProfileMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileMetadata {
    country: Option<String>,
}

impl Profile {
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.user_metadata.country.as_deref()
    }
}

/// Admin-side user mutation body.
#[derive(Debug, Serialize)]
pub struct UpdatePayload(serde_json::Value);

impl UpdatePayload {
    pub fn password(password: String) -> Self {
        Self(json!({ "password": password }))
    }

    pub fn country(country: String) -> Self {
        Self(json!({ "user_metadata": { "country": country } }))
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    #[serde(alias = "error_description", alias = "msg", alias = "message")]
    error: Option<String>,
}

impl IdentityClient {
    pub fn new(client: Client, base_url: String, anon_key: String, service_key: String) -> Self {
        Self {
            client,
            base_url,
            anon_key,
            service_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn upstream_error(resp: reqwest::Response) -> IdentityError {
        let status = resp.status().as_u16();
        let message = match resp.json::<UpstreamError>().await {
            Ok(body) => body.error.unwrap_or_else(|| "provider error".to_string()),
            Err(_) => "provider error".to_string(),
        };
        IdentityError::Upstream { status, message }
    }

    /// Password sign-in; yields the provider-issued session tokens.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, IdentityError> {
        let resp = self
            .client
            .post(self.url("/auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match resp.status() {
            status if status.is_success() => Ok(resp.json::<SessionTokens>().await?),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(IdentityError::BadCredentials)
            }
            _ => Err(Self::upstream_error(resp).await),
        }
    }

    /// Fetch the profile behind an access token.
    pub async fn user(&self, access_token: &str) -> Result<UserProfileView, IdentityError> {
        let resp = self
            .client
            .get(self.url("/auth/v1/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::upstream_error(resp).await);
        }

        let profile = resp.json::<Profile>().await?;
        Ok(UserProfileView {
            user_id: profile.id.clone(),
            email: profile.email.clone(),
            country: profile.country().map(str::to_string),
        })
    }

    /// Country of the caller's profile, as optional enrichment: any
    /// provider failure degrades to `None` instead of failing the request.
    pub async fn country_of(&self, access_token: &str) -> Option<String> {
        match self.user(access_token).await {
            Ok(profile) => profile.country,
            Err(err) => {
                tracing::debug!("profile lookup failed, skipping currency annotation: {err}");
                None
            }
        }
    }

    /// Admin-side profile mutation (password or metadata).
    pub async fn admin_update(
        &self,
        user_id: &str,
        payload: &UpdatePayload,
    ) -> Result<(), IdentityError> {
        let resp = self
            .client
            .put(self.url(&format!("/auth/v1/admin/users/{user_id}")))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::upstream_error(resp).await);
        }
        Ok(())
    }
}

/// Flattened profile handed to handlers.
#[derive(Debug)]
pub struct UserProfileView {
    pub user_id: String,
    pub email: Option<String>,
    pub country: Option<String>,
}
