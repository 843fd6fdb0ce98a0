use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::extractors::{required, ApiJson, CurrentUser};
use crate::posts::{self, PostView};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub post_text: Option<String>,
}

#[derive(Serialize)]
pub struct PostList {
    pub posts: Vec<PostView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/posts", get(list_posts).post(create_post))
}

async fn list_posts(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<PostList>> {
    let conn = state.db.get()?;
    let posts = posts::list_for_user(&conn, user.id)?;
    Ok(Json(PostList { posts }))
}

async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> AppResult<Json<Value>> {
    let text = required("post_text", req.post_text)?;

    let conn = state.db.get()?;
    let post_id = posts::create(&conn, user.id, &user.username, &text)?;
    tracing::info!("User {} created post {}", user.username, post_id);

    Ok(Json(json!({ "msg": "Post successfully created" })))
}
