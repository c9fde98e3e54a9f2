//! Account endpoints

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Deserialize;

use super::finance::{actor_id, AppState, CurrentUser};
use super::{created, ok, ApiJson, ApiResponse, ApiResult};
use crate::audit::AuditAction;
use crate::error::ServiceError;
use crate::models::{Account, AccountType, AccountUpdate, NewAccount};

const RESOURCE: &str = "account";

#[derive(Debug, Default, Deserialize)]
pub struct AccountQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub active: Option<bool>,
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Account not found".to_string())
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> ApiResult {
    let kind = match query.kind.as_deref() {
        Some(raw) => Some(AccountType::parse(raw).ok_or_else(|| {
            ServiceError::Validation(format!("Unknown account type '{}'", raw))
        })?),
        None => None,
    };

    let filter = |account: &Account| {
        kind.map_or(true, |k| account.kind == k)
            && query.active.map_or(true, |a| account.is_active == a)
    };
    let items = state.accounts.list_where(&filter).await?;

    let total = items.len();
    ok(ApiResponse::success(items).with_total(total))
}

pub(super) async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let account = state.accounts.get(&id).await?.ok_or_else(not_found)?;
    ok(ApiResponse::success(account))
}

pub(super) async fn create(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    ApiJson(new): ApiJson<NewAccount>,
) -> ApiResult {
    if new.name.trim().is_empty() {
        return Err(ServiceError::Validation("Account name is required".to_string()));
    }
    if !new.balance.is_finite() {
        return Err(ServiceError::Validation("Balance must be a number".to_string()));
    }

    let account = state.accounts.insert(Account::create(new)).await?;

    let actor = actor_id(user.as_deref());
    state
        .record_audit(AuditAction::Create, RESOURCE, &account.id, Some(&actor))
        .await?;

    created(ApiResponse::success(account).with_message("Account created"))
}

pub(super) async fn update(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<AccountUpdate>,
) -> ApiResult {
    let account = state
        .accounts
        .update(
            &id,
            Box::new(move |account: &mut Account| {
                account.apply(update);
                Ok(())
            }),
        )
        .await?
        .ok_or_else(not_found)?;

    let actor = actor_id(user.as_deref());
    state
        .record_audit(AuditAction::Update, RESOURCE, &id, Some(&actor))
        .await?;

    ok(ApiResponse::success(account).with_message("Account updated"))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> ApiResult {
    if state.accounts.delete(&id).await? {
        let actor = actor_id(user.as_deref());
        state
            .record_audit(AuditAction::Delete, RESOURCE, &id, Some(&actor))
            .await?;
    }

    ok(ApiResponse::ok_message("Account deleted"))
}
