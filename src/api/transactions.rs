//! Transaction endpoints

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
use crate::models::{NewTransaction, Transaction, TransactionType, TransactionUpdate};
use crate::Result;

const RESOURCE: &str = "transaction";
const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    /// Unparseable values fall back to the default
    pub limit: Option<String>,
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ServiceError::Validation(
            "Amount must be a non-negative number".to_string(),
        ))
    }
}

fn validate_new(new: &NewTransaction) -> Result<()> {
    if new.name.trim().is_empty() || new.category.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Name and category are required".to_string(),
        ));
    }
    validate_amount(new.amount)
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> ApiResult {
    let kind = match query.kind.as_deref() {
        Some(raw) => Some(TransactionType::parse(raw).ok_or_else(|| {
            ServiceError::Validation(format!("Unknown transaction type '{}'", raw))
        })?),
        None => None,
    };
    let category = query.category.map(|c| c.to_lowercase());
    let limit = query
        .limit
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT);

    let filter = |tx: &Transaction| {
        kind.map_or(true, |k| tx.kind == k)
            && category
                .as_deref()
                .map_or(true, |c| tx.category.to_lowercase() == c)
    };
    let mut items = state.transactions.list_where(&filter).await?;

    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);

    let total = items.len();
    ok(ApiResponse::success(items).with_total(total))
}

pub(super) async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let tx = state
        .transactions
        .get(&id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Transaction not found".to_string()))?;

    ok(ApiResponse::success(tx))
}

pub(super) async fn create(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    ApiJson(new): ApiJson<NewTransaction>,
) -> ApiResult {
    validate_new(&new)?;

    let tx = Transaction::create(state.transaction_codes.next_code(), new);
    let tx = state.transactions.insert(tx).await?;

    let actor = actor_id(user.as_deref());
    state
        .record_audit(AuditAction::Create, RESOURCE, &tx.id, Some(&actor))
        .await?;

    info!(id = %tx.id, code = %tx.transaction_id, kind = %tx.kind, "Transaction created");
    created(ApiResponse::success(tx).with_message("Transaction created"))
}

pub(super) async fn update(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<TransactionUpdate>,
) -> ApiResult {
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
    }

    let tx = state
        .transactions
        .update(
            &id,
            Box::new(move |tx: &mut Transaction| {
                tx.apply(update);
                Ok(())
            }),
        )
        .await?
        .ok_or_else(|| ServiceError::NotFound("Transaction not found".to_string()))?;

    let actor = actor_id(user.as_deref());
    state
        .record_audit(AuditAction::Update, RESOURCE, &id, Some(&actor))
        .await?;

    ok(ApiResponse::success(tx).with_message("Transaction updated"))
}

/// Deleting an unknown id is a no-op that still reports success
pub(super) async fn delete(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> ApiResult {
    let removed = state.transactions.delete(&id).await?;

    if removed {
        let actor = actor_id(user.as_deref());
        state
            .record_audit(AuditAction::Delete, RESOURCE, &id, Some(&actor))
            .await?;
        info!(id = %id, "Transaction deleted");
    }

    ok(ApiResponse::ok_message("Transaction deleted"))
}
