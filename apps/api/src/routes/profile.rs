//! Profile endpoints: read, partial update, resume upload.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{ProfilePatch, UserProfile};
use crate::resume_upload::extract_resume_text;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let store = state.store.lock().await;
    Ok(Json(store.profile()?.clone()))
}

/// PATCH /api/v1/profile
///
/// Shallow merge; fields missing from the body are left untouched.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, AppError> {
    let mut store = state.store.lock().await;
    let profile = store.update_user_profile(patch).await?;
    Ok(Json(profile))
}

/// POST /api/v1/profile/resume
///
/// Multipart upload (field `file`). The extracted text becomes the profile's resume content.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UserProfile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let name = file_name.clone();
        let text = tokio::task::spawn_blocking(move || extract_resume_text(&name, &data))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Resume extraction task failed: {e}")))?
            .map_err(|e| AppError::Validation(e.to_string()))?;

        info!("Extracted {} chars from uploaded resume '{file_name}'", text.len());

        let mut store = state.store.lock().await;
        let profile = store
            .update_user_profile(ProfilePatch {
                resume_file_name: Some(Some(file_name)),
                resume_content: Some(Some(text)),
                ..Default::default()
            })
            .await?;
        return Ok(Json(profile));
    }

    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}
