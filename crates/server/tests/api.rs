use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use sea_orm::Database;
use serde::Serialize;
use serde_json::{Value, json};
use tower::ServiceExt;

use advisor::{AdvisorError, TextModel};
use engine::{Category, Engine};
use migration::MigratorTrait;
use server::{IdentityClient, ServerState, TokenVerifier, router};

const SECRET: &str = "test-secret";

/// Canned model: named category for categorization prompts, fixed advice
/// otherwise.
struct CannedModel(&'static str);

#[async_trait::async_trait]
impl TextModel for CannedModel {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        if prompt.starts_with("Classify the expense item") {
            Ok(self.0.to_string())
        } else {
            Ok("Here are 3 ways to save.".to_string())
        }
    }
}

async fn test_state(model_reply: &'static str) -> (ServerState, Arc<Engine>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Arc::new(Engine::builder().database(db).build().await.unwrap());

    // The identity provider is unreachable in tests; the currency
    // annotation degrades to None.
    let identity = IdentityClient::new(
        reqwest::Client::new(),
        "http://127.0.0.1:1".to_string(),
        "anon".to_string(),
        "service".to_string(),
    );

    let state = ServerState {
        engine: engine.clone(),
        model: Arc::new(CannedModel(model_reply)),
        identity,
        verifier: TokenVerifier::new(SECRET),
    };
    (state, engine)
}

async fn test_router(model_reply: &'static str) -> (Router, Arc<Engine>) {
    let (state, engine) = test_state(model_reply).await;
    (router(state, &[]), engine)
}

#[derive(Serialize)]
struct Claims {
    sub: String,
    aud: String,
    exp: i64,
}

fn bearer(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        aud: "authenticated".to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_ref()),
    )
    .unwrap();
    format!("Bearer {token}")
}

fn authed(method: &str, uri: &str, user_id: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(user_id));
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let (app, _) = test_router("Miscellaneous").await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_fail_closed_without_a_token() {
    let (app, _) = test_router("Miscellaneous").await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/expenses/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let (app, _) = test_router("Miscellaneous").await;
    let claims = Claims {
        sub: "alice".to_string(),
        aud: "authenticated".to_string(),
        exp: chrono::Utc::now().timestamp() - 3600,
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_ref()),
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_the_token_subject() {
    let (app, _) = test_router("Miscellaneous").await;
    let response = app
        .oneshot(authed("GET", "/auth/me", "user-42", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["user_id"], "user-42");
}

#[tokio::test]
async fn created_expense_carries_the_resolved_category() {
    let (app, _) = test_router("Transportation").await;

    let response = app
        .oneshot(authed(
            "POST",
            "/expenses/",
            "alice",
            Some(json!({ "amount": 42.50, "item": "Uber ride" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["amount"], 42.50);
    assert_eq!(body["category"], "Transportation");
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn garbage_model_replies_fall_back_to_miscellaneous() {
    let (app, _) = test_router("definitely not a category").await;

    let response = app
        .oneshot(authed(
            "POST",
            "/expenses/",
            "alice",
            Some(json!({ "amount": 5.0, "item": "mystery box" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["category"], "Miscellaneous");
}

#[tokio::test]
async fn list_only_shows_the_callers_expenses() {
    let (app, engine) = test_router("Miscellaneous").await;

    engine
        .add_expense("alice", 10.0, "Coffee", None, Category::DiningOut)
        .await
        .unwrap();
    engine
        .add_expense("bob", 99.0, "Rent", None, Category::Housing)
        .await
        .unwrap();

    let response = app
        .oneshot(authed("GET", "/expenses/", "alice", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["data"][0]["item"], "Coffee");
}

#[tokio::test]
async fn deleting_someone_elses_expense_is_not_found() {
    let (app, engine) = test_router("Miscellaneous").await;

    let expense = engine
        .add_expense("bob", 50.0, "Groceries", None, Category::Groceries)
        .await
        .unwrap();

    let response = app
        .oneshot(authed(
            "DELETE",
            &format!("/expenses/{}", expense.id),
            "alice",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_without_recognized_fields_is_a_bad_request() {
    let (app, engine) = test_router("Miscellaneous").await;

    let expense = engine
        .add_expense("alice", 10.0, "Coffee", None, Category::DiningOut)
        .await
        .unwrap();

    let response = app
        .oneshot(authed(
            "PUT",
            &format!("/expenses/{}", expense.id),
            "alice",
            Some(json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (expenses, _) = engine.expenses_for_user("alice").await.unwrap();
    assert_eq!(expenses[0].amount, 10.0);
}

#[tokio::test]
async fn forecast_is_a_multiple_of_the_month_total() {
    let (app, engine) = test_router("Miscellaneous").await;

    engine
        .add_expense("alice", 120.5, "Rent share", None, Category::Housing)
        .await
        .unwrap();

    let response = app
        .oneshot(authed("GET", "/forecast/monthly", "alice", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["this_month"], 120.5);
    assert_eq!(body["next_month"], 120.5);
    assert_eq!(body["next_six_month"], 723.0);
    assert_eq!(body["next_year"], 1446.0);
}

#[tokio::test]
async fn suggest_requires_some_spending_history() {
    let (app, _) = test_router("Miscellaneous").await;

    let response = app
        .oneshot(authed("POST", "/ai/suggest", "alice", Some(json!({}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn suggest_returns_the_model_reply_verbatim() {
    let (app, engine) = test_router("Miscellaneous").await;

    engine
        .add_expense("alice", 10.0, "Coffee", None, Category::DiningOut)
        .await
        .unwrap();

    let response = app
        .oneshot(authed(
            "POST",
            "/ai/suggest",
            "alice",
            Some(json!({
                "location": "Ireland",
                "loan_principal": 50000.0,
                "loan_tenure_months": 60,
                "loan_inception_month": 3,
                "loan_inception_year": 2025,
                "loan_interest_rate": 8.5
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["suggestion"],
        "Here are 3 ways to save."
    );
}
