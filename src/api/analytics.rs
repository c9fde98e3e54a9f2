//! Analytics endpoints

use axum::extract::State;
use serde::Deserialize;

use super::finance::AppState;
use super::{ok, ApiJson, ApiResponse, ApiResult};
use crate::analytics::{self, ReportType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: String,
    pub period: Option<String>,
}

pub(super) async fn overview(State(state): State<AppState>) -> ApiResult {
    let transactions = state.transactions.list().await?;
    let accounts = state.accounts.list().await?;

    ok(ApiResponse::success(analytics::overview(
        &transactions,
        &accounts,
    )))
}

pub(super) async fn report(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ReportRequest>,
) -> ApiResult {
    let report_type = ReportType::parse(&req.report_type)?;

    let transactions = state.transactions.list().await?;
    let accounts = state.accounts.list().await?;
    let report = analytics::build_report(report_type, req.period, &transactions, &accounts);

    ok(ApiResponse::success(report).with_message("Report generated"))
}
