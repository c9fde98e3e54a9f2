//! REST API layer
//!
//! Two routers share the response envelope and error mapping defined here:
//! the chat assistant (`chat`) and the finance API (`finance`).

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::ServiceError;

pub mod chat;
pub mod finance;

mod accounts;
mod analytics;
mod audit;
mod auth;
mod clients;
mod preferences;
mod transactions;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            message: None,
            total: None,
        }
    }

    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            total: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            total: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }
}

pub type ApiResult = std::result::Result<(StatusCode, Json<ApiResponse>), ServiceError>;

pub(crate) fn ok(body: ApiResponse) -> ApiResult {
    Ok((StatusCode::OK, Json(body)))
}

pub(crate) fn created(body: ApiResponse) -> ApiResult {
    Ok((StatusCode::CREATED, Json(body)))
}

/// =============================
/// Request Body
/// =============================

/// JSON body whose rejections (bad syntax, wrong shape, missing
/// `Content-Type`) come back as a 400 in the usual envelope
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::Validation(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// =============================
/// Error Mapping
/// =============================

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if self.is_client_error() {
            warn!(status = %status, error = %self, "Request rejected");
            self.to_string()
        } else {
            error!(error = %self, "Request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

/// =============================
/// Shared Handlers
/// =============================

pub(crate) async fn not_found() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Endpoint not found")),
    )
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    error!("Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

/// Layers every service gets: tracing, panic-to-500, CORS
pub(crate) fn with_common_layers(router: Router, cors_permissive: bool) -> Router {
    let router = router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(router: Router, address: &str) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;

    info!("Listening on http://{}", address);

    axum::serve(listener, router).await?;

    Ok(())
}
