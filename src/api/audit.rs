//! Audit trail endpoints

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::finance::AppState;
use super::{ok, ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub resource: Option<String>,
    pub resource_id: Option<String>,
}

/// The audit trail, optionally narrowed to one record
pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult {
    let entries = match (query.resource.as_deref(), query.resource_id.as_deref()) {
        (Some(resource), Some(id)) => state.audit.list_for(resource, id).await,
        (Some(resource), None) => state
            .audit
            .list()
            .await
            .into_iter()
            .filter(|e| e.resource == resource)
            .collect(),
        _ => state.audit.list().await,
    };

    let total = entries.len();
    ok(ApiResponse::success(entries).with_total(total))
}

/// Recompute the hash chain over every entry
pub(super) async fn verify(State(state): State<AppState>) -> ApiResult {
    let valid = state.audit.verify_integrity().await?;
    if !valid {
        error!("Audit chain verification failed");
    }

    let entries = state.audit.list().await.len();
    ok(ApiResponse::success(json!({ "valid": valid, "entries": entries })))
}
