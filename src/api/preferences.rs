//! Preferences of the calling user

use axum::{extract::State, Extension};

use super::finance::{actor_id, AppState, CurrentUser};
use super::{ok, ApiJson, ApiResponse, ApiResult};
use crate::audit::AuditAction;
use crate::models::{PreferencesUpdate, UserPreferences};

const RESOURCE: &str = "preferences";

/// Stored preferences, or the defaults when the user never saved any
pub(super) async fn get_mine(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> ApiResult {
    let user_id = actor_id(user.as_deref());

    let prefs = state
        .preferences
        .get(&user_id)
        .await?
        .unwrap_or_else(|| UserPreferences::defaults_for(user_id));

    ok(ApiResponse::success(prefs))
}

pub(super) async fn update_mine(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    ApiJson(update): ApiJson<PreferencesUpdate>,
) -> ApiResult {
    let user_id = actor_id(user.as_deref());

    let mut prefs = state
        .preferences
        .get(&user_id)
        .await?
        .unwrap_or_else(|| UserPreferences::defaults_for(user_id.clone()));
    prefs.apply(update);

    let prefs = state.preferences.upsert(prefs).await?;
    state
        .record_audit(AuditAction::Update, RESOURCE, &user_id, Some(&user_id))
        .await?;

    ok(ApiResponse::success(prefs).with_message("Preferences updated"))
}
