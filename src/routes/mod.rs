pub mod auth;
pub mod home;
pub mod posts;
pub mod rating;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::body_token;
use crate::state::AppState;

/// The full HTTP surface, ready to serve.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .merge(auth::router())
        .merge(posts::router())
        .merge(rating::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            body_token::capture_body_token,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
