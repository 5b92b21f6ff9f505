//! Product image upload.
//!
//! Images are written to the configured upload directory and served back
//! under `/static/uploads/`. Product detection is not implemented; the
//! response carries a fixed placeholder.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// URL prefix uploaded files are served under.
pub const UPLOADS_URL_PREFIX: &str = "/static/uploads";

/// Accepted image extensions (compared case-insensitively).
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

const FILE_FIELD: &str = "file";
const DETECTION_PLACEHOLDER: &str = "Product Detection Coming Soon";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: &'static str,
    pub file_path: String,
    pub detected_product: &'static str,
}

/// `POST /api/upload-image`
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A part without a filename attribute is a form value, not a file.
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    if file_name.is_empty() {
        return Err(AppError::BadRequest("No file selected".to_string()));
    }
    if !allowed_file(&file_name) {
        return Err(AppError::BadRequest("Invalid file type".to_string()));
    }

    let now = Utc::now();
    let stored_name = secure_filename(&format!(
        "{}.{:06}_{file_name}",
        now.timestamp(),
        now.timestamp_subsec_micros()
    ));

    let upload_dir = &state.config().upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&stored_name), &bytes).await?;

    tracing::info!(file = %stored_name, size = bytes.len(), "Image uploaded");

    Ok(Json(UploadResponse {
        success: true,
        message: "Image uploaded successfully",
        file_path: format!("{UPLOADS_URL_PREFIX}/{stored_name}"),
        detected_product: DETECTION_PLACEHOLDER,
    }))
}

/// Whether `file_name` has one of the accepted image extensions.
fn allowed_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Path separators become spaces, runs of whitespace become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// trimmed. Non-ASCII characters are dropped.
#[must_use]
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_owned()
}
