//! Finance API: state, auth guard and router assembly

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::{accounts, analytics, audit, auth, clients, preferences, transactions};
use super::with_common_layers;
use crate::audit::{AuditAction, AuditLog};
use crate::auth::{CredentialVerifier, DemoCredentialVerifier, TokenIssuer, DEMO_USER_ID};
use crate::config::Config;
use crate::models::{Account, Client, Transaction, UserPreferences};
use crate::state::{CodeSequence, InMemoryRecordStore, RecordStore};
use crate::Result;

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<dyn RecordStore<Transaction>>,
    pub clients: Arc<dyn RecordStore<Client>>,
    pub accounts: Arc<dyn RecordStore<Account>>,
    pub preferences: Arc<dyn RecordStore<UserPreferences>>,
    pub audit: Arc<AuditLog>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub tokens: Arc<TokenIssuer>,
    pub transaction_codes: Arc<CodeSequence>,
    pub client_codes: Arc<CodeSequence>,
    pub require_auth: bool,
}

impl AppState {
    /// In-memory stores and the demo credential verifier
    pub fn in_memory(config: &Config) -> Self {
        Self {
            transactions: Arc::new(InMemoryRecordStore::new()),
            clients: Arc::new(InMemoryRecordStore::new()),
            accounts: Arc::new(InMemoryRecordStore::new()),
            preferences: Arc::new(InMemoryRecordStore::new()),
            audit: Arc::new(AuditLog::new()),
            verifier: Arc::new(DemoCredentialVerifier),
            tokens: Arc::new(TokenIssuer::new(&config.jwt_secret)),
            transaction_codes: Arc::new(CodeSequence::new("T", 1001)),
            client_codes: Arc::new(CodeSequence::new("CL", 1001)),
            require_auth: config.require_auth,
        }
    }

    /// Record a mutation in the audit trail
    pub(crate) async fn record_audit(
        &self,
        action: AuditAction,
        resource: &str,
        resource_id: &str,
        actor: Option<&str>,
    ) -> Result<()> {
        self.audit
            .record(action, resource, resource_id, actor)
            .await
            .map(|_| ())
    }
}

/// Identity attached to a request by the token guard
#[derive(Debug, Clone)]
pub struct CurrentUser(pub crate::auth::Claims);

/// The acting user id: the token's subject, or the demo user when unguarded
pub(crate) fn actor_id(user: Option<&CurrentUser>) -> String {
    user.map(|u| u.0.user_id.clone())
        .unwrap_or_else(|| DEMO_USER_ID.to_string())
}

/// =============================
/// Token Guard
/// =============================

pub(crate) async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match state.tokens.validate_header(auth_header) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser(claims));
            next.run(req).await
        }
        Err(err) => {
            warn!(path = %req.uri().path(), "Unauthorized request");
            err.into_response()
        }
    }
}

/// =============================
/// Router
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "Do-Flow Backend API"
    }))
}

pub fn create_router(state: AppState, cors_permissive: bool) -> Router {
    let guard = middleware::from_fn_with_state(state.clone(), require_token);

    // The transaction listing is guarded even when the rest is open
    let listing = if state.require_auth {
        get(transactions::list)
    } else {
        get(transactions::list).route_layer(guard.clone())
    };

    let mut resources = Router::new()
        .route("/api/v1/transactions", listing.post(transactions::create))
        .route(
            "/api/v1/transactions/:id",
            get(transactions::get_one)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/api/v1/clients", get(clients::list).post(clients::create))
        .route(
            "/api/v1/clients/:id",
            get(clients::get_one).put(clients::update).delete(clients::delete),
        )
        .route("/api/v1/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/api/v1/accounts/:id",
            get(accounts::get_one).put(accounts::update).delete(accounts::delete),
        )
        .route(
            "/api/v1/preferences",
            get(preferences::get_mine).put(preferences::update_mine),
        )
        .route("/api/v1/analytics/overview", get(analytics::overview))
        .route("/api/v1/analytics/reports", post(analytics::report))
        .route("/api/v1/audit", get(audit::list))
        .route("/api/v1/audit/verify", get(audit::verify));

    if state.require_auth {
        resources = resources.route_layer(guard.clone());
    }

    let public = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .route(
            "/api/v1/auth/verify",
            get(auth::verify).route_layer(guard),
        );

    let router = Router::new()
        .merge(public)
        .merge(resources)
        .with_state(state);

    with_common_layers(router, cors_permissive)
}

/// Build state from config, seeding demo records when enabled
pub async fn build_state(config: &Config) -> Result<AppState> {
    let state = AppState::in_memory(config);

    if config.seed_demo_data {
        crate::demo::seed(&state).await?;
        info!("Demo data loaded");
    }

    Ok(state)
}
