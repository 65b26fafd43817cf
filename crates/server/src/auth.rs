//! Session validation and the auth endpoints.
//!
//! Credentials are issued by the identity provider; this module only
//! verifies them. The verified user id plus the raw access token travel
//! with the request as a [`SessionUser`] extension.

use axum::{
    Extension, Json,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::{ServerError, ServerState, identity::UpdatePayload};
use api_types::auth::{
    CountryUpdate, LoginRequest, MeResponse, MessageResponse, PasswordUpdate, UserMetadataResponse,
};

pub const ACCESS_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// Audience the identity provider stamps on end-user tokens.
const TOKEN_AUDIENCE: &str = "authenticated";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credentials")]
    Unauthenticated,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("missing user id in token")]
    MissingSubject,
}

/// The authenticated caller, attached to every protected request.
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub user_id: String,
    /// Raw access token, forwarded to the identity provider for profile
    /// lookups.
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
}

/// Verifies HS256 session tokens against the shared provider secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }

    /// Decode and verify a token, yielding the subject claim.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;
        data.claims.sub.ok_or(AuthError::MissingSubject)
    }
}

fn bearer_token(jar: &CookieJar, request: &Request) -> Result<String, AuthError> {
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::Unauthenticated)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = header.trim_start_matches("Bearer").trim();
    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }
    Ok(token.to_string())
}

/// Middleware guarding every protected route: fail closed, or attach the
/// verified [`SessionUser`].
pub async fn session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(&jar, &request)?;
    let user_id = state.verifier.verify(&token)?;

    request.extensions_mut().insert(SessionUser {
        user_id,
        access_token: token,
    });
    Ok(next.run(request).await)
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .build()
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), ServerError> {
    let tokens = state
        .identity
        .sign_in(&payload.email, &payload.password)
        .await?;

    let jar = jar
        .add(session_cookie(ACCESS_COOKIE, tokens.access_token))
        .add(session_cookie(REFRESH_COOKIE, tokens.refresh_token));

    Ok((
        jar,
        Json(MessageResponse {
            message: "login successful".to_string(),
        }),
    ))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar
        .remove(Cookie::build((ACCESS_COOKIE, "")).path("/").build())
        .remove(Cookie::build((REFRESH_COOKIE, "")).path("/").build());

    (
        jar,
        Json(MessageResponse {
            message: "logged out".to_string(),
        }),
    )
}

pub async fn me(Extension(user): Extension<SessionUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
    })
}

pub async fn user_metadata(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
) -> Result<Json<UserMetadataResponse>, ServerError> {
    let profile = state.identity.user(&user.access_token).await?;
    Ok(Json(UserMetadataResponse {
        user_id: user.user_id,
        email: profile.email,
        country: profile.country,
    }))
}

pub async fn update_password(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Json(payload): Json<PasswordUpdate>,
) -> Result<Json<MessageResponse>, ServerError> {
    if payload.password.len() < 6 {
        return Err(ServerError::Generic(
            "password must be at least 6 characters".to_string(),
        ));
    }

    state
        .identity
        .admin_update(&user.user_id, &UpdatePayload::password(payload.password))
        .await?;

    Ok(Json(MessageResponse {
        message: "password updated".to_string(),
    }))
}

pub async fn update_country(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CountryUpdate>,
) -> Result<Json<MessageResponse>, ServerError> {
    state
        .identity
        .admin_update(&user.user_id, &UpdatePayload::country(payload.country))
        .await?;

    Ok(Json(MessageResponse {
        message: "country updated".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: Option<String>,
        aud: String,
        exp: i64,
    }

    fn token(secret: &str, sub: Option<&str>, aud: &str, exp_offset: i64) -> String {
        let claims = TestClaims {
            sub: sub.map(str::to_string),
            aud: aud.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_the_subject() {
        let verifier = TokenVerifier::new("secret");
        let token = token("secret", Some("user-1"), "authenticated", 3600);
        assert_eq!(verifier.verify(&token).unwrap(), "user-1");
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = TokenVerifier::new("secret");
        let token = token("secret", Some("user-1"), "authenticated", -3600);
        assert_eq!(verifier.verify(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = TokenVerifier::new("secret");
        let token = token("other-secret", Some("user-1"), "authenticated", 3600);
        assert_eq!(verifier.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let verifier = TokenVerifier::new("secret");
        let token = token("secret", Some("user-1"), "anon", 3600);
        assert_eq!(verifier.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn missing_subject_is_rejected() {
        let verifier = TokenVerifier::new("secret");
        let token = token("secret", None, "authenticated", 3600);
        assert_eq!(
            verifier.verify(&token).unwrap_err(),
            AuthError::MissingSubject
        );
    }
}
