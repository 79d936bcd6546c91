//! Axum route handlers for the LLM flows.
//!
//! The store lock is only held to read inputs and to write results, never across the LLM call.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::flows::search::{describe_profile, search_jobs, SearchRequest, SearchResponse};
use crate::flows::tailor::{tailor_resume, TailorInput, TailorOutput};
use crate::models::application::{ApplicationPatch, TrackedApplication};
use crate::state::AppState;

/// POST /api/v1/jobs/search
///
/// Uses the caller's profile text, or describes the stored profile when none is given.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let user_profile = match request
        .user_profile
        .filter(|text| !text.trim().is_empty())
    {
        Some(text) => text,
        None => {
            let store = state.store.lock().await;
            describe_profile(store.profile()?).ok_or_else(|| {
                AppError::Validation(
                    "Upload a resume to your profile before searching for jobs".to_string(),
                )
            })?
        }
    };

    let results = search_jobs(
        &state.llm,
        &user_profile,
        request.job_board,
        request.keywords.as_deref(),
    )
    .await?;

    Ok(Json(SearchResponse {
        job_board: request.job_board,
        results,
    }))
}

/// POST /api/v1/tailor-resume
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(input): Json<TailorInput>,
) -> Result<Json<TailorOutput>, AppError> {
    input.validate().map_err(AppError::Validation)?;
    let output = tailor_resume(&state.llm, &input).await?;
    Ok(Json(output))
}

/// POST /api/v1/applications/:id/tailor
///
/// Tailors the profile's resume (and cover letter template, if any) to the tracked job and
/// stores the results on the application.
pub async fn handle_tailor_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackedApplication>, AppError> {
    let input = {
        let store = state.store.lock().await;
        let application = store
            .application(id)?
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
        let profile = store.profile()?;
        let resume = profile.resume_text().ok_or_else(|| {
            AppError::Validation("Upload a resume to your profile before tailoring".to_string())
        })?;

        TailorInput {
            resume: resume.to_string(),
            job_description: application.job.description.clone(),
            cover_letter: profile.cover_letter_template.clone(),
            job_title: Some(application.job.title.clone()),
        }
    };
    input.validate().map_err(AppError::Validation)?;

    let output = tailor_resume(&state.llm, &input).await?;

    let mut store = state.store.lock().await;
    let patch = ApplicationPatch {
        tailored_resume: Some(Some(output.tailored_resume)),
        tailored_cover_letter: Some(output.tailored_cover_letter),
        ..Default::default()
    };
    let updated = store
        .update_tracked_application(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} was removed while tailoring")))?;

    info!("Stored tailored documents on application {id}");
    Ok(Json(updated))
}
