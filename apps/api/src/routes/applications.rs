//! Tracked-application endpoints. Every mutation goes through the store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationPatch, ApplicationStatus, TrackedApplication};
use crate::models::job::{is_web_url, JobPosting};
use crate::state::AppState;
use crate::views::{apply_view, status_breakdown, summarize, ApplicationQuery, ApplicationSummary, StatusCount};

#[derive(Debug, Deserialize)]
pub struct TrackJobRequest {
    pub job: JobPosting,
    #[serde(default)]
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    pub by_status: Vec<StatusCount>,
}

/// GET /api/v1/applications?status=Applied&search=acme
///
/// Filtered by status and search term, newest applied date first.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationQuery>,
) -> Result<Json<Vec<TrackedApplication>>, AppError> {
    let store = state.store.lock().await;
    Ok(Json(apply_view(store.applications()?, &query)))
}

/// POST /api/v1/applications
///
/// Starts tracking a job (default status Bookmarked). A job with an already-tracked URL
/// replaces the existing record.
pub async fn handle_track_job(
    State(state): State<AppState>,
    Json(request): Json<TrackJobRequest>,
) -> Result<(StatusCode, Json<TrackedApplication>), AppError> {
    if !is_web_url(&request.job.url) {
        return Err(AppError::Validation(
            "job.url must be an absolute http(s) URL".to_string(),
        ));
    }

    let mut store = state.store.lock().await;
    let record = store
        .add_tracked_application(request.job, request.status)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/applications/summary
pub async fn handle_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let store = state.store.lock().await;
    let apps = store.applications()?;
    Ok(Json(SummaryResponse {
        summary: summarize(apps),
        by_status: status_breakdown(apps),
    }))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackedApplication>, AppError> {
    let store = state.store.lock().await;
    store
        .application(id)?
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// PATCH /api/v1/applications/:id
///
/// 200 with the updated record, or 204 when the id is unknown (nothing changes).
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Response, AppError> {
    let mut store = state.store.lock().await;
    Ok(match store.update_tracked_application(id, patch).await? {
        Some(updated) => Json(updated).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// DELETE /api/v1/applications/:id
///
/// Idempotent: always 204.
pub async fn handle_remove_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store.remove_tracked_application(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
