use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    Ctx,
    error::{Error, Result},
    fetcher::FetchRequest,
    storage,
};

/// Download form fields
#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    #[serde(default, rename = "imageURL")]
    pub image_url: String,
    #[serde(default, rename = "imageName")]
    pub image_name: String,
}

impl DownloadForm {
    /// Strip surrounding whitespace from both fields
    fn trimmed(self) -> Self {
        Self {
            image_url: self.image_url.trim().to_string(),
            image_name: self.image_name.trim().to_string(),
        }
    }
}

/// Download outcome
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// Error text, empty on success
    pub error: String,
    pub message: String,
    /// `Success` or `Failed`
    pub result: String,
    pub url: String,
    pub name: String,
}

impl DownloadResponse {
    fn new(form: &DownloadForm) -> Self {
        Self {
            url: form.image_url.clone(),
            name: form.image_name.clone(),
            ..Self::default()
        }
    }

    fn succeeded(mut self, message: String) -> Self {
        self.result = "Success".to_string();
        self.message = message;
        self
    }

    fn failed(mut self, error: &Error) -> Self {
        self.result = "Failed".to_string();
        self.error = error.to_string();
        self
    }
}

/// Fetch the posted URL and save it under the download directory with the posted name
/// POST /download
async fn download_image(
    State(ctx): State<Ctx>,
    form: std::result::Result<Form<DownloadForm>, FormRejection>,
) -> std::result::Result<Json<DownloadResponse>, (StatusCode, Json<DownloadResponse>)> {
    let form = match form {
        Ok(Form(form)) => form.trimmed(),
        Err(rejection) => {
            let e = Error::Validation(rejection.body_text());
            error!("Rejected download form: {}", e);
            let response = DownloadResponse::default().failed(&e);
            return Err((StatusCode::BAD_REQUEST, Json(response)));
        }
    };
    let response = DownloadResponse::new(&form);

    match save(&ctx, &form).await {
        Ok(message) => {
            info!("{}", message);
            Ok(Json(response.succeeded(message)))
        }
        Err(e) => {
            error!("Download of {:?} as {:?} failed: {}", form.image_url, form.image_name, e);
            Err((status_for(&e), Json(response.failed(&e))))
        }
    }
}

async fn save(ctx: &Ctx, form: &DownloadForm) -> Result<String> {
    let url = form.image_url.as_str();
    if url.is_empty() {
        return Err(Error::Validation("URL is required".into()));
    }

    let dir = &ctx.config.storage.download_dir;
    let path = storage::resolve_in(dir, &form.image_name)?;

    let bytes = ctx
        .fetcher
        .fetch(&FetchRequest::new(url))
        .await
        .into_result()?;

    storage::ensure_dir(dir).await?;
    let written = storage::persist(&bytes, &path).await?;

    Ok(format!("Image saved as {} ({written} bytes)", path.display()))
}

/// Fetch failures answer 400, local write failures 500
const fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Validation(_) | Error::Network(_) | Error::HttpStatus(_) => StatusCode::BAD_REQUEST,
        Error::Write(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Mount download routes
pub fn mount() -> Router<Ctx> {
    Router::new().route("/download", post(download_image))
}
