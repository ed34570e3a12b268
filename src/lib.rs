pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod library;
pub mod services;
pub mod session;
pub mod srs;
pub mod state;
pub mod validation;

use axum::{
  routing::{delete, get, post},
  Router,
};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
  Router::new()
    .route("/profile", get(handlers::profile))
    .route("/practice/{mode}", get(handlers::practice_view))
    .route("/practice/{mode}/check", post(handlers::practice_check))
    .route("/practice/{mode}/next", post(handlers::practice_next))
    .route(
      "/vocabulary",
      get(handlers::list_vocabulary).post(handlers::add_vocabulary),
    )
    .route("/vocabulary/{id}", delete(handlers::delete_vocabulary))
    .route(
      "/sentences",
      get(handlers::list_sentences).post(handlers::add_sentence),
    )
    .route("/sentences/{id}", delete(handlers::delete_sentence))
    .route("/settings/export", get(handlers::export_data))
    .route("/settings/import", post(handlers::import_data))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
