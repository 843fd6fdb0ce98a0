use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::db::DB_TIME_FORMAT;
use crate::rating::VoteState;

/// Layout of `created_time` in API responses.
pub const API_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A post as seen by one particular user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub post_text: String,
    pub likes: i64,
    pub dislikes: i64,
    pub like_it: i64,
    pub created_time: String,
}

pub fn create(conn: &Connection, author_id: i64, author: &str, text: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO posts (user_id, username, text, likes, dislikes, created_time)
         VALUES (?1, ?2, ?3, 0, 0, ?4)",
        params![
            author_id,
            author,
            text,
            Utc::now().naive_utc().format(DB_TIME_FORMAT).to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn exists(conn: &Connection, post_id: i64) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM posts WHERE id = ?1", params![post_id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

/// Every post, oldest first, with `like_it` derived from `viewer_id`'s
/// rating on each.
pub fn list_for_user(conn: &Connection, viewer_id: i64) -> rusqlite::Result<Vec<PostView>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.user_id, p.username, p.text, p.likes, p.dislikes, p.created_time, r.vote
         FROM posts p
         LEFT JOIN ratings r ON r.post_id = p.id AND r.user_id = ?1
         ORDER BY p.id ASC",
    )?;

    let posts = stmt
        .query_map(params![viewer_id], |row| {
            let created_time: String = row.get(6)?;
            let vote: Option<String> = row.get(7)?;
            Ok(PostView {
                post_id: row.get(0)?,
                user_id: row.get(1)?,
                username: row.get(2)?,
                post_text: row.get(3)?,
                likes: row.get(4)?,
                dislikes: row.get(5)?,
                like_it: VoteState::from_db(vote.as_deref()).like_it(),
                created_time: format_created_time(&created_time),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(posts)
}

fn format_created_time(db_time: &str) -> String {
    NaiveDateTime::parse_from_str(db_time, DB_TIME_FORMAT)
        .map(|dt| dt.format(API_TIME_FORMAT).to_string())
        .unwrap_or_else(|_| db_time.to_string())
}
