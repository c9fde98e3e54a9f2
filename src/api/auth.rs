//! Login, registration and token verification

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::finance::{AppState, CurrentUser};
use super::{created, ok, ApiJson, ApiResponse, ApiResult};
use crate::error::ServiceError;
use crate::auth::Principal;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email_or_phone: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
}

pub(super) async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult {
    let identifier = req.email_or_phone.trim();
    if identifier.is_empty() || req.password.is_empty() {
        return Err(ServiceError::Validation(
            "Email/telefono e password sono richiesti".to_string(),
        ));
    }

    let principal = state.verifier.verify(identifier, &req.password).await?;
    let token = state.tokens.issue(&principal)?;

    info!(user = %principal.id, "User logged in");
    ok(ApiResponse::success(json!({ "user": principal, "token": token }))
        .with_message("Login effettuato con successo"))
}

/// Issues a token for a fresh admin user; nothing is persisted
pub(super) async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult {
    let principal = Principal {
        id: Uuid::new_v4().to_string(),
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        role: "admin".to_string(),
    };
    let company = json!({
        "id": Uuid::new_v4().to_string(),
        "name": req.company_name,
        "industry": req.industry,
    });
    let token = state.tokens.issue(&principal)?;

    info!(user = %principal.id, "User registered");
    created(
        ApiResponse::success(json!({
            "user": principal,
            "company": company,
            "token": token,
        }))
        .with_message("Registrazione completata con successo"),
    )
}

pub(super) async fn verify(user: Option<Extension<CurrentUser>>) -> ApiResult {
    let claims = user
        .map(|Extension(CurrentUser(claims))| claims)
        .ok_or_else(|| ServiceError::Auth("Token is missing!".to_string()))?;

    ok(ApiResponse::success(json!({ "user": claims })))
}
