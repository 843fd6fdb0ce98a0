use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /: liveness plus a cheap store round-trip
pub async fn index(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let conn = state.db.get()?;
    let post_count: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;

    Ok(Json(json!({
        "msg": "jwtblog API is up",
        "version": env!("CARGO_PKG_VERSION"),
        "posts": post_count,
    })))
}
