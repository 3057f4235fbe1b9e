use axum::{Form, Router, extract::State, http::StatusCode, routing::post};
use serde::Deserialize;
use tracing::{error, info};

use crate::{Ctx, error::Error, storage};

/// Upload form fields
#[derive(Debug, Deserialize)]
pub struct UploadForm {
    #[serde(default)]
    pub image_url: String,
}

/// Fetch the posted URL into the upload directory, named after its last path segment
/// POST /upload
async fn upload_image(
    State(ctx): State<Ctx>,
    Form(form): Form<UploadForm>,
) -> Result<String, (StatusCode, String)> {
    let url = form.image_url.trim();
    if url.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "URL is required".to_string()));
    }

    let file_name = storage::file_name_from_url(url).map_err(reject)?;
    let path = storage::resolve_in(&ctx.config.storage.upload_dir, &file_name).map_err(reject)?;

    ctx.fetcher.download_to(url, &path).await.map_err(|e| {
        error!("Upload of {} failed: {}", url, e);
        let message = match e {
            Error::Write(_) => format!("Failed to save the image: {e}"),
            _ => format!("Failed to fetch the image: {e}"),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message)
    })?;

    info!("Saved {} as {}", url, path.display());
    Ok(format!("Image downloaded successfully as {file_name}"))
}

fn reject(e: Error) -> (StatusCode, String) {
    (e.status_code(), e.to_string())
}

/// Mount upload routes
pub fn mount() -> Router<Ctx> {
    Router::new().route("/upload", post(upload_image))
}
