//! Keyword table and per-keyword history endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use serpdash_compare::{
    classify_position, has_content, keyword_history as history_series, latest_per_keyword,
    HistoryPoint, PositionStatus,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct KeywordRow {
    pub keyword: String,
    pub market: String,
    pub status: PositionStatus,
    /// Upstream free-text change label, shown as a hint only.
    pub change_hint: Option<String>,
    pub ai_overview_present: bool,
    pub observed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub(super) struct KeywordHistoryData {
    pub keyword: String,
    pub points: Vec<HistoryPoint>,
    /// Records left out of the series for lacking a parseable timestamp.
    pub excluded_rows: usize,
}

pub(super) async fn list_keywords(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<KeywordRow>>>, ApiError> {
    let dataset = state.cache.get().await;

    let data = latest_per_keyword(&dataset.records)
        .into_iter()
        .map(|record| KeywordRow {
            keyword: record.keyword.clone(),
            market: record.market.clone(),
            status: classify_position(&record.position),
            change_hint: record.change_label.clone(),
            ai_overview_present: has_content(record.ai_overview.as_deref()),
            observed_at: record.timestamp,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn keyword_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(keyword): Path<String>,
) -> Result<Json<ApiResponse<KeywordHistoryData>>, ApiError> {
    let dataset = state.cache.get().await;

    if !dataset.records.iter().any(|r| r.keyword == keyword) {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no records for keyword \"{keyword}\""),
        ));
    }

    let (points, excluded_rows) = history_series(&dataset.records, &keyword);

    Ok(Json(ApiResponse {
        data: KeywordHistoryData {
            keyword,
            points,
            excluded_rows,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::tests::{get_json, test_state};
    use super::super::build_app;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn keywords_list_one_row_per_keyword() {
        let app = build_app(test_state());
        let (status, json) = get_json(app, "/api/v1/keywords").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json["data"].as_array().expect("data array");
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().any(|r| {
            r["keyword"].as_str() == Some("recarga digi")
                && r["status"]["label"].as_str() == Some("#1")
        }));
    }

    #[tokio::test]
    async fn keyword_history_is_chronological() {
        let app = build_app(test_state());
        let (status, json) = get_json(app, "/api/v1/keywords/buy%20robux/history").await;
        assert_eq!(status, StatusCode::OK);
        let points = json["data"]["points"].as_array().expect("points");
        assert_eq!(points.len(), 6);
        assert_eq!(json["data"]["excluded_rows"].as_u64(), Some(0));
        // First two sample days are not ranking, last day ranks #7.
        assert_eq!(points[0]["status"]["label"].as_str(), Some("Not Ranking"));
        assert_eq!(points[5]["status"]["label"].as_str(), Some("#7"));
    }

    #[tokio::test]
    async fn unknown_keyword_history_is_404() {
        let app = build_app(test_state());
        let (status, json) = get_json(app, "/api/v1/keywords/nope/history").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"].as_str(), Some("not_found"));
    }
}
