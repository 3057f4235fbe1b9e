use axum::{Router, extract::State, response::Html, routing::get};

use crate::{Ctx, config::FormVariant};

const UPLOAD_PAGE: &str = include_str!("../../templates/upload.html");
const DOWNLOAD_PAGE: &str = include_str!("../../templates/download.html");

/// Render the form selected by `server.form`
/// GET /
async fn index(State(ctx): State<Ctx>) -> Html<String> {
    match ctx.config.server.form {
        FormVariant::Upload => Html(UPLOAD_PAGE.to_string()),
        FormVariant::Download => {
            let dir = ctx.config.storage.download_dir.display().to_string();
            let dir = html_escape::encode_text(&dir);
            Html(DOWNLOAD_PAGE.replace("{{download_dir}}", &dir))
        }
    }
}

/// Mount form routes
pub fn mount() -> Router<Ctx> {
    Router::new().route("/", get(index))
}

