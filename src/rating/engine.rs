use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::db::DB_TIME_FORMAT;
use crate::error::{AppError, AppResult};
use crate::posts;
use crate::rating::domain::{Transition, Vote, VoteState};

pub const POST_NOT_FOUND: &str = "No such post_id in database";

/// The vote `user_id` currently holds on `post_id`.
pub fn current_vote(conn: &Connection, user_id: i64, post_id: i64) -> rusqlite::Result<VoteState> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT vote FROM ratings WHERE user_id = ?1 AND post_id = ?2",
            params![user_id, post_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(VoteState::from_db(stored.as_deref()))
}

/// Apply a vote and update the post's counters in one write transaction.
///
/// The transaction is `IMMEDIATE`: SQLite's write lock is taken before the
/// current state is read, so two requests for the same (user, post) never
/// act on the same prior state. The second waits on `busy_timeout` and then
/// sees the first one's result. Any early return rolls back on drop.
pub fn apply_vote(
    conn: &Connection,
    user_id: i64,
    post_id: i64,
    vote: Vote,
) -> AppResult<Transition> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    if !posts::exists(&tx, post_id)? {
        return Err(AppError::NotFound(POST_NOT_FOUND.to_string()));
    }

    let transition = current_vote(&tx, user_id, post_id)?.apply(vote);
    store_state(&tx, user_id, post_id, &transition)?;

    // Counters never go below zero
    tx.execute(
        "UPDATE posts
         SET likes = MAX(likes + ?1, 0), dislikes = MAX(dislikes + ?2, 0)
         WHERE id = ?3",
        params![transition.likes_delta, transition.dislikes_delta, post_id],
    )?;

    tx.commit()?;
    tracing::debug!(
        "User {} on post {}: {:?} -> {:?}",
        user_id,
        post_id,
        transition.from,
        transition.to
    );
    Ok(transition)
}

fn store_state(
    conn: &Connection,
    user_id: i64,
    post_id: i64,
    transition: &Transition,
) -> rusqlite::Result<()> {
    match (transition.from, transition.to.as_db()) {
        (_, None) => {
            conn.execute(
                "DELETE FROM ratings WHERE user_id = ?1 AND post_id = ?2",
                params![user_id, post_id],
            )?;
        }
        (VoteState::None, Some(vote)) => {
            conn.execute(
                "INSERT INTO ratings (user_id, post_id, vote, created_time)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    user_id,
                    post_id,
                    vote,
                    Utc::now().naive_utc().format(DB_TIME_FORMAT).to_string()
                ],
            )?;
        }
        (_, Some(vote)) => {
            conn.execute(
                "UPDATE ratings SET vote = ?3 WHERE user_id = ?1 AND post_id = ?2",
                params![user_id, post_id, vote],
            )?;
        }
    }
    Ok(())
}
