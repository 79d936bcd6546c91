use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::render::render_resume_pdf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResumeRequest {
    pub tailored_resume: String,
}

/// POST /api/v1/download-resume
///
/// Renders the supplied text to a one-page PDF attachment.
pub async fn handle_download_resume(
    Json(request): Json<DownloadResumeRequest>,
) -> Result<Response, AppError> {
    let pdf = render_resume_pdf(request.tailored_resume).await?;
    Ok(pdf_attachment(pdf, "tailored-resume.pdf"))
}

pub fn pdf_attachment(pdf: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Bytes::from(pdf),
    )
        .into_response()
}
