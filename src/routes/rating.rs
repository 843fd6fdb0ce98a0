use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::extractors::{ApiJson, CurrentUser};
use crate::rating::{self, Vote};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RatingRequest {
    pub post_id: Option<i64>,
    pub like: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/rating", post(rate_post))
}

/// POST /api/rating: like (`like: 1`) or dislike (`like: 0`) a post.
/// Repeating the vote you already hold clears it.
async fn rate_post(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<RatingRequest>,
) -> AppResult<Json<Value>> {
    let post_id = req
        .post_id
        .ok_or_else(|| AppError::BadRequest("post_id: Can not be blank".into()))?;
    let vote = req
        .like
        .and_then(Vote::from_flag)
        .ok_or_else(|| AppError::BadRequest("like: must be 0 or 1".into()))?;

    // May wait on SQLite's write lock
    let pool = state.db.clone();
    let transition = tokio::task::spawn_blocking(move || -> AppResult<rating::Transition> {
        let conn = pool.get()?;
        rating::apply_vote(&conn, user.id, post_id, vote)
    })
    .await??;

    Ok(Json(json!({ "msg": transition.outcome.to_string() })))
}
