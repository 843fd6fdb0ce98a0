pub mod models;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;

use crate::state::DbPool;

pub const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../../migrations/001_initial.sql"),
)];

/// Timestamp layout used for every TEXT time column written by the app.
pub const DB_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            ",
        )
    });
    let pool = Pool::builder().max_size(8).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        ",
    )?;

    Ok(pool)
}

/// Round-trip a trivial query so an unreachable store is caught at boot
/// instead of on the first request.
pub fn probe(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;
    let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
    anyhow::ensure!(one == 1, "store probe returned {}", one);
    Ok(())
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    // Create migrations tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_version WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        if !already_applied {
            tracing::info!("Applying migration: {}", name);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_version (name) VALUES (?1)",
                params![name],
            )?;
        }
    }

    tracing::info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pool() -> (tempfile::TempDir, DbPool) {
        let tmp = tempfile::tempdir().unwrap();
        let pool = create_pool(&tmp.path().join("test.db")).unwrap();
        (tmp, pool)
    }

    #[test]
    fn create_pool_creates_db_file() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("sub/dir/test.db");
        let pool = create_pool(&db_path).unwrap();
        assert!(db_path.exists());
        let conn = pool.get().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn every_connection_enforces_foreign_keys() {
        let (_tmp, pool) = test_pool();
        let conns: Vec<_> = (0..3).map(|_| pool.get().unwrap()).collect();
        for conn in &conns {
            let on: i64 = conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                .unwrap();
            assert_eq!(on, 1);
        }
    }

    #[test]
    fn probe_succeeds_on_open_store() {
        let (_tmp, pool) = test_pool();
        probe(&pool).unwrap();
    }

    #[test]
    fn migrations_run_successfully() {
        let (_tmp, pool) = test_pool();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as i64);

        let tables: Vec<String> = {
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .filter_map(|r| r.ok())
                .collect()
        };
        for table in ["users", "posts", "ratings", "revoked_tokens"] {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }
    }

    #[test]
    fn migrations_are_idempotent() {
        let (_tmp, pool) = test_pool();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as i64);
    }

    #[test]
    fn usernames_are_unique() {
        let (_tmp, pool) = test_pool();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params!["alice", "x"],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params!["alice", "y"],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn one_rating_per_user_and_post() {
        let (_tmp, pool) = test_pool();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (id, username, password_hash) VALUES (1, 'alice', 'x')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO posts (id, user_id, username, text, created_time)
             VALUES (1, 1, 'alice', 'hi', '2024-01-01 00:00:00')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO ratings (user_id, post_id, vote, created_time)
             VALUES (1, 1, 'like', '2024-01-01 00:00:00')",
            [],
        )
        .unwrap();
        let second = conn.execute(
            "INSERT INTO ratings (user_id, post_id, vote, created_time)
             VALUES (1, 1, 'dislike', '2024-01-01 00:00:00')",
            [],
        );
        assert!(second.is_err());
    }

    #[test]
    fn foreign_keys_enforced() {
        let (_tmp, pool) = test_pool();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let result = conn.execute(
            "INSERT INTO posts (user_id, username, text, created_time)
             VALUES (?1, ?2, ?3, ?4)",
            params![42, "ghost", "hello", "2024-01-01 00:00:00"],
        );
        assert!(result.is_err());
    }
}
