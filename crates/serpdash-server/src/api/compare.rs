//! Snapshot comparison endpoint plus its CSV export.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serpdash_compare::{
    compare_all, write_comparison_csv, CompareError, ComparisonExportRow, KeywordComparison,
    SnapshotPair,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CompareQuery {
    pub keyword: String,
    pub t1: NaiveDate,
    pub t2: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    /// Omitted = export every keyword comparable across the two dates.
    pub keyword: Option<String>,
    pub t1: NaiveDate,
    pub t2: NaiveDate,
}

fn map_compare_error(request_id: String, error: &CompareError) -> ApiError {
    let code = match error {
        CompareError::IdenticalDates(_) => "validation_error",
        CompareError::EmptySide { .. } => "not_found",
    };
    ApiError::new(request_id, code, error.to_string())
}

pub(super) async fn get_comparison(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ApiResponse<KeywordComparison>>, ApiError> {
    let dataset = state.cache.get().await;

    let pair = SnapshotPair::select(&dataset.records, &query.keyword, query.t1, query.t2)
        .map_err(|e| map_compare_error(req_id.0.clone(), &e))?;
    let comparison = pair.compare(&state.config.target_domain);

    Ok(Json(ApiResponse {
        data: comparison,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn export_comparison(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let dataset = state.cache.get().await;
    let target = &state.config.target_domain;

    let comparisons: Vec<KeywordComparison> = match &query.keyword {
        Some(keyword) => {
            let pair = SnapshotPair::select(&dataset.records, keyword, query.t1, query.t2)
                .map_err(|e| map_compare_error(req_id.0.clone(), &e))?;
            vec![pair.compare(target)]
        }
        None => {
            compare_all(&dataset.records, query.t1, query.t2, target)
                .map_err(|e| map_compare_error(req_id.0.clone(), &e))?
                .comparisons
        }
    };

    let rows: Vec<ComparisonExportRow> =
        comparisons.iter().map(ComparisonExportRow::from).collect();
    let mut body = Vec::new();
    write_comparison_csv(
        &rows,
        &query.t1.to_string(),
        &query.t2.to_string(),
        &mut body,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "comparison CSV export failed");
        ApiError::new(req_id.0.clone(), "internal_error", "CSV export failed")
    })?;

    let filename = match &query.keyword {
        Some(keyword) => format!(
            "serp_comparison_{}_{}_vs_{}.csv",
            keyword.replace(' ', "_"),
            query.t1,
            query.t2
        ),
        None => format!("serp_comparison_{}_vs_{}.csv", query.t1, query.t2),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::super::tests::{get_json, test_state};
    use super::super::build_app;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn comparison_returns_change_and_serp_diff() {
        let app = build_app(test_state());
        let (status, json) = get_json(
            app,
            "/api/v1/compare?keyword=recarga%20digi&t1=2025-07-25&t2=2025-07-30",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let data = &json["data"];
        assert_eq!(data["keyword"].as_str(), Some("recarga digi"));
        // Sample moves recarga digi from #3 to #1 across the window.
        assert_eq!(
            data["change"]["description"].as_str(),
            Some("Improved by 2 positions (#3 → #1)")
        );
        let counts = &data["serp_diff"]["counts"];
        let movements = data["serp_diff"]["movements"]
            .as_array()
            .expect("movements");
        let total = counts["new"].as_u64().unwrap()
            + counts["lost"].as_u64().unwrap()
            + counts["improved"].as_u64().unwrap()
            + counts["declined"].as_u64().unwrap()
            + counts["stable"].as_u64().unwrap();
        assert_eq!(total as usize, movements.len());
        assert!(movements.iter().any(|m| m["is_target"].as_bool() == Some(true)));
    }

    #[tokio::test]
    async fn identical_dates_rejected() {
        let app = build_app(test_state());
        let (status, json) = get_json(
            app,
            "/api/v1/compare?keyword=recarga%20digi&t1=2025-07-25&t2=2025-07-25",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));
    }

    #[tokio::test]
    async fn missing_side_is_404() {
        let app = build_app(test_state());
        let (status, json) = get_json(
            app,
            "/api/v1/compare?keyword=recarga%20digi&t1=2025-07-25&t2=2026-01-01",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"].as_str(), Some("not_found"));
    }

    #[tokio::test]
    async fn export_is_csv_attachment() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/compare/export?keyword=recarga%20digi&t1=2025-07-25&t2=2025-07-30")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .map(|v| v.to_str().expect("ascii")),
            Some("text/csv; charset=utf-8")
        );
        let disposition = response
            .headers()
            .get("content-disposition")
            .map(|v| v.to_str().expect("ascii").to_owned())
            .expect("disposition header");
        assert!(disposition.contains("serp_comparison_recarga_digi_2025-07-25_vs_2025-07-30.csv"));

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(text.starts_with("Keyword,Market,Position 2025-07-25,Position 2025-07-30,Change"));
        assert!(text.contains("recarga digi"));
    }

    #[tokio::test]
    async fn export_all_keywords_when_none_given() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/compare/export?t1=2025-07-25&t2=2025-07-30")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        // Header plus one row per sample keyword.
        assert_eq!(text.lines().count(), 7);
    }
}
