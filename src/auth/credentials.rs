use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::db::models::User;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Created(i64),
    AlreadyExists,
}

/// Hash the password and insert the user. A taken username is reported as
/// `AlreadyExists` and leaves the existing record untouched.
pub fn create_user(
    conn: &Connection,
    username: &str,
    password: &str,
    cost: u32,
) -> AppResult<SignupOutcome> {
    let password_hash = bcrypt::hash(password, cost)?;

    let result = conn.execute(
        "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
        params![username, password_hash],
    );

    match result {
        Ok(_) => Ok(SignupOutcome::Created(conn.last_insert_rowid())),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Ok(SignupOutcome::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
        params![username],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()
}

/// Returns the user only if both the username exists and the password
/// matches. Callers cannot tell which of the two failed.
pub fn verify_login(conn: &Connection, username: &str, password: &str) -> AppResult<Option<User>> {
    let Some(user) = find_by_username(conn, username)? else {
        return Ok(None);
    };

    if bcrypt::verify(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
