//! GET /api/v1/overview — dashboard key-performance metrics.

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use serpdash_compare::{latest_per_keyword, overview_metrics, OverviewMetrics};
use serpdash_sheets::{DataSource, LoadSummary};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct OverviewData {
    pub source: DataSource,
    pub source_label: &'static str,
    /// Set when the live source was unavailable and sample data is shown.
    pub warning: Option<String>,
    pub load_summary: LoadSummary,
    pub metrics: OverviewMetrics,
}

pub(super) async fn get_overview(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<OverviewData>>, ApiError> {
    let dataset = state.cache.get().await;

    let latest = latest_per_keyword(&dataset.records);
    let metrics = overview_metrics(&latest);

    Ok(Json(ApiResponse {
        data: OverviewData {
            source: dataset.source,
            source_label: dataset.source.label(),
            warning: dataset.warning.clone(),
            load_summary: dataset.summary,
            metrics,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
