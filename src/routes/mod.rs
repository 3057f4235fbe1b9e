use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::Ctx;

pub mod download;
pub mod form;
pub mod upload;


/// Mount the form and submit routes
pub fn mount() -> Router<Ctx> {
    Router::new()
        .merge(form::mount())
        .merge(upload::mount())
        .merge(download::mount())
}

/// Build the complete application with static files and request tracing
pub fn app(ctx: Ctx) -> Router {
    let static_files = ServeDir::new(&ctx.config.storage.static_dir);

    mount()
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
