pub mod health;
pub mod story;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /generate-story                                  generate a story (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Story synthesis.
        .merge(story::router())
}
