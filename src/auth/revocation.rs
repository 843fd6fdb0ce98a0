//! Append-only blocklist of revoked token ids.
//!
//! Entries are never removed on the request path, so the table grows with
//! every logout. `purge_expired` exists for operators who opt into startup
//! compaction; dropping an entry is harmless once the token it names has
//! passed its own expiry, because the gate rejects it as expired first.

use rusqlite::{params, Connection, OptionalExtension};

/// Record `jti` as revoked. Returns `false` when it was already present.
pub fn revoke(conn: &Connection, jti: &str, expires_at: i64) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO revoked_tokens (jti, expires_at) VALUES (?1, ?2)",
        params![jti, expires_at],
    )?;
    Ok(inserted == 1)
}

pub fn is_revoked(conn: &Connection, jti: &str) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM revoked_tokens WHERE jti = ?1",
            params![jti],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Delete entries whose token expired strictly before `now` (unix seconds).
pub fn purge_expired(conn: &Connection, now: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM revoked_tokens WHERE expires_at < ?1",
        params![now],
    )
}

pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM revoked_tokens", [], |row| row.get(0))
}
