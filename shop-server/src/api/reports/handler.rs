//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use shared::error::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::reports::workbook::CONTENT_TYPE;
use crate::reports::{MonthQuery, MonthWindow, MonthlySummary};

/// Download the month as `baocao-thang-MM-YYYY.xlsx`
///
/// The workbook is fully built before the response starts, so a failure
/// yields a JSON error instead of a truncated file.
pub async fn export_excel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Response> {
    let window = MonthWindow::from_query(&query, state.config.business_timezone)?;
    let report = state.report_service().export(&window).await?;

    tracing::info!(
        actor = %user.id,
        file = %report.file_name,
        "Excel report downloaded"
    );

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        report.file_name
    ))
    .map_err(|e| AppError::internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}

/// Aggregation as JSON
pub async fn monthly_summary(
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthlySummary>> {
    let window = MonthWindow::from_query(&query, state.config.business_timezone)?;
    let summary = state.report_service().summary(&window).await?;
    Ok(Json(summary))
}
