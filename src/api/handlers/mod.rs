use std::any::Any;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::Instrument;
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::config::DigestMode;
use crate::digest::{compute_stats, group_by_date};
use crate::models::{DetailedSummary, DigestQuery, DirectSummary, SummarizeRequest, SummaryResult};
use crate::summarizer::summarize_or_degrade;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Summarize
// ============================================================

pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = request.validate(state.config.default_days)?;

    let span = tracing::info_span!(
        "summarize",
        request_id = %Uuid::new_v4(),
        owner = %query.owner,
        repo = %query.repo,
        days = query.days,
    );
    digest(&state, &query).instrument(span).await.map(Json)
}

/// Run one digest pass for `query` in the configured mode.
pub async fn digest(state: &AppState, query: &DigestQuery) -> Result<SummaryResult, ApiError> {
    let window = state
        .github
        .fetch_commits(&query.owner, &query.repo, query.days)
        .await?;

    match state.config.mode {
        DigestMode::Detailed => {
            let details = state.github.fetch_commit_details(&window.commits).await;
            let commits_by_date = group_by_date(&details.commits);
            // Stats cover every listed commit, including ones dropped above.
            let summary_stats = compute_stats(&window.commits, window.since, window.until);

            tracing::info!(
                "Grouped {} of {} commits into {} days",
                commits_by_date.commit_count(),
                summary_stats.total_commits,
                commits_by_date.len()
            );
            Ok(SummaryResult::Detailed(DetailedSummary {
                summary_stats,
                commits_by_date,
                dropped_commits: details.dropped,
            }))
        }
        DigestMode::Direct => {
            let summary =
                summarize_or_degrade(state.summarizer.as_ref(), &window.commits, query.days).await;

            Ok(SummaryResult::Direct(DirectSummary {
                summary,
                commit_count: window.commits.len(),
            }))
        }
    }
}

// ============================================================
// Panic Handling
// ============================================================

/// Turn a handler panic into a 500 response instead of dropping the connection.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unexpected panic".to_string()
    };

    ApiError::Internal(detail).into_response()
}
