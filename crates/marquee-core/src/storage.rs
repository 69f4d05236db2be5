use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::MarqueeError;
use crate::models::{Bookmark, ContinueEntry, MediaKind, MediaRef};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");
const SCHEMA_V2: &str = include_str!("../../../migrations/002_resume_position.sql");
const SCHEMA_V3: &str = include_str!("../../../migrations/003_touch_order.sql");

/// SQLite-backed storage for the watchlist and continue-watching lists.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, MarqueeError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, MarqueeError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Watchlist ───────────────────────────────────────────────

    /// Add a title to the user's watchlist. Adding twice keeps the original date.
    pub fn add_bookmark(&self, user_id: &str, media: MediaRef) -> Result<(), MarqueeError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO bookmark (user_id, media_type, media_id, added_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                media.kind.as_str(),
                media.id as i64,
                now_timestamp()
            ],
        )?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub fn remove_bookmark(&self, user_id: &str, media: MediaRef) -> Result<bool, MarqueeError> {
        let removed = self.conn.execute(
            "DELETE FROM bookmark WHERE user_id = ?1 AND media_type = ?2 AND media_id = ?3",
            params![user_id, media.kind.as_str(), media.id as i64],
        )?;
        Ok(removed > 0)
    }

    pub fn is_bookmarked(&self, user_id: &str, media: MediaRef) -> Result<bool, MarqueeError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookmark WHERE user_id = ?1 AND media_type = ?2 AND media_id = ?3",
            params![user_id, media.kind.as_str(), media.id as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Watchlist entries of one kind, newest first.
    pub fn bookmarks(&self, user_id: &str, kind: MediaKind) -> Result<Vec<Bookmark>, MarqueeError> {
        let mut stmt = self.conn.prepare(
            "SELECT media_id, added_at FROM bookmark
             WHERE user_id = ?1 AND media_type = ?2
             ORDER BY added_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id, kind.as_str()], |row| {
                let id: i64 = row.get(0)?;
                let added_at: String = row.get(1)?;
                Ok(Bookmark {
                    media: MediaRef::new(kind, id as u64),
                    added_at: parse_datetime(&added_at),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    // ── Continue watching ───────────────────────────────────────

    /// Record that a title was opened, moving it to the front of the list.
    ///
    /// Entries beyond `limit` for this user and kind are dropped, oldest first.
    pub fn touch_continue_watching(
        &self,
        user_id: &str,
        media: MediaRef,
        season: Option<u32>,
        episode: Option<u32>,
        limit: u32,
    ) -> Result<(), MarqueeError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO continue_watching
               (user_id, media_type, media_id, season, episode, updated_at, touch_seq)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6,
               (SELECT COALESCE(MAX(touch_seq), 0) + 1 FROM continue_watching))
             ON CONFLICT(user_id, media_type, media_id) DO UPDATE SET
               season = excluded.season,
               episode = excluded.episode,
               updated_at = excluded.updated_at,
               touch_seq = excluded.touch_seq",
            params![
                user_id,
                media.kind.as_str(),
                media.id as i64,
                season,
                episode,
                now_timestamp(),
            ],
        )?;
        if limit > 0 {
            tx.execute(
                "DELETE FROM continue_watching
                 WHERE user_id = ?1 AND media_type = ?2 AND media_id NOT IN (
                     SELECT media_id FROM continue_watching
                     WHERE user_id = ?1 AND media_type = ?2
                     ORDER BY updated_at DESC, touch_seq DESC LIMIT ?3
                 )",
                params![user_id, media.kind.as_str(), limit],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Continue-watching entries of one kind, most recently opened first.
    pub fn continue_watching(
        &self,
        user_id: &str,
        kind: MediaKind,
    ) -> Result<Vec<ContinueEntry>, MarqueeError> {
        let mut stmt = self.conn.prepare(
            "SELECT media_id, season, episode, updated_at FROM continue_watching
             WHERE user_id = ?1 AND media_type = ?2
             ORDER BY updated_at DESC, touch_seq DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id, kind.as_str()], |row| {
                row_to_continue_entry(row, kind)
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    pub fn continue_entry(
        &self,
        user_id: &str,
        media: MediaRef,
    ) -> Result<Option<ContinueEntry>, MarqueeError> {
        self.conn
            .query_row(
                "SELECT media_id, season, episode, updated_at FROM continue_watching
                 WHERE user_id = ?1 AND media_type = ?2 AND media_id = ?3",
                params![user_id, media.kind.as_str(), media.id as i64],
                |row| row_to_continue_entry(row, media.kind),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Returns whether a row was removed.
    pub fn remove_continue_watching(
        &self,
        user_id: &str,
        media: MediaRef,
    ) -> Result<bool, MarqueeError> {
        let removed = self.conn.execute(
            "DELETE FROM continue_watching
             WHERE user_id = ?1 AND media_type = ?2 AND media_id = ?3",
            params![user_id, media.kind.as_str(), media.id as i64],
        )?;
        Ok(removed > 0)
    }
}

// ── Migrations ──────────────────────────────────────────────────

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), MarqueeError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    if version < 2 {
        conn.execute_batch(SCHEMA_V2)?;
        conn.pragma_update(None, "user_version", 2)?;
    }
    if version < 3 {
        conn.execute_batch(SCHEMA_V3)?;
        conn.pragma_update(None, "user_version", 3)?;
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

/// Fixed-width UTC timestamp so that text ordering matches time ordering.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a datetime string from SQLite (either RFC 3339 or SQLite's `datetime('now')` format).
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    DateTime::default()
}

fn row_to_continue_entry(
    row: &rusqlite::Row<'_>,
    kind: MediaKind,
) -> rusqlite::Result<ContinueEntry> {
    let id: i64 = row.get(0)?;
    let updated_at: String = row.get(3)?;
    Ok(ContinueEntry {
        media: MediaRef::new(kind, id as u64),
        season: row.get(1)?,
        episode: row.get(2)?,
        updated_at: parse_datetime(&updated_at),
    })
}
