//! Client endpoints

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Deserialize;
use tracing::info;

use super::finance::{actor_id, AppState, CurrentUser};
use super::{created, ok, ApiJson, ApiResponse, ApiResult};
use crate::audit::AuditAction;
use crate::error::ServiceError;
use crate::models::{Client, ClientUpdate, NewClient};

const RESOURCE: &str = "client";

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    pub active: Option<bool>,
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Client not found".to_string())
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> ApiResult {
    let search = query.search.map(|s| s.to_lowercase());

    let filter = |client: &Client| {
        search
            .as_deref()
            .map_or(true, |s| client.name.to_lowercase().contains(s))
            && query.active.map_or(true, |a| client.is_active == a)
    };
    let items = state.clients.list_where(&filter).await?;

    let total = items.len();
    ok(ApiResponse::success(items).with_total(total))
}

pub(super) async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let client = state.clients.get(&id).await?.ok_or_else(not_found)?;
    ok(ApiResponse::success(client))
}

pub(super) async fn create(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    ApiJson(new): ApiJson<NewClient>,
) -> ApiResult {
    if new.name.trim().is_empty() {
        return Err(ServiceError::Validation("Client name is required".to_string()));
    }

    let client = Client::create(state.client_codes.next_code(), new);
    let client = state.clients.insert(client).await?;

    let actor = actor_id(user.as_deref());
    state
        .record_audit(AuditAction::Create, RESOURCE, &client.id, Some(&actor))
        .await?;

    info!(id = %client.id, code = %client.client_id, "Client created");
    created(ApiResponse::success(client).with_message("Client created"))
}

pub(super) async fn update(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ClientUpdate>,
) -> ApiResult {
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ServiceError::Validation("Client name is required".to_string()));
    }

    let client = state
        .clients
        .update(
            &id,
            Box::new(move |client: &mut Client| {
                client.apply(update);
                Ok(())
            }),
        )
        .await?
        .ok_or_else(not_found)?;

    let actor = actor_id(user.as_deref());
    state
        .record_audit(AuditAction::Update, RESOURCE, &id, Some(&actor))
        .await?;

    ok(ApiResponse::success(client).with_message("Client updated"))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> ApiResult {
    if state.clients.delete(&id).await? {
        let actor = actor_id(user.as_deref());
        state
            .record_audit(AuditAction::Delete, RESOURCE, &id, Some(&actor))
            .await?;
    }

    ok(ApiResponse::ok_message("Client deleted"))
}
