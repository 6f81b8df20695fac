//! Metrics persistence — the injected repository the engine saves
//! dataset metrics through.
//!
//! RULE: only this module talks to SQLite. The engine calls through the
//! `MetricsStore` trait and never executes SQL directly; the core never
//! reaches for a hidden global store.

use crate::{error::EngineResult, metrics::DatasetMetrics};
use rusqlite::{params, Connection, OptionalExtension};

/// Fixed storage key for the versioned metrics blob.
pub const STORAGE_KEY: &str = "analytics_metrics";

pub trait MetricsStore {
    /// Persist the blob, replacing any previous version under the key.
    /// Returns the snapshot id assigned to this save.
    fn save(&mut self, metrics: &DatasetMetrics) -> EngineResult<String>;

    fn load(&self) -> EngineResult<Option<DatasetMetrics>>;

    fn clear(&mut self) -> EngineResult<()>;
}

// ── SQLite implementation ──────────────────────────────────────────

pub struct SqliteMetricsStore {
    conn: Connection,
}

impl SqliteMetricsStore {
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open(":memory:")?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_metrics.sql"))?;
        Ok(())
    }
}

impl MetricsStore for SqliteMetricsStore {
    fn save(&mut self, metrics: &DatasetMetrics) -> EngineResult<String> {
        let snapshot_id = uuid::Uuid::new_v4().to_string();
        let payload = serde_json::to_string(metrics)?;
        let saved_at = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO metrics (storage_key, snapshot_id, data_version, payload, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(storage_key) DO UPDATE SET
                 snapshot_id  = excluded.snapshot_id,
                 data_version = excluded.data_version,
                 payload      = excluded.payload,
                 saved_at     = excluded.saved_at",
            params![STORAGE_KEY, snapshot_id, metrics.data_version, payload, saved_at],
        )?;

        log::debug!("metrics saved under '{STORAGE_KEY}' (snapshot {snapshot_id})");
        Ok(snapshot_id)
    }

    fn load(&self) -> EngineResult<Option<DatasetMetrics>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM metrics WHERE storage_key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> EngineResult<()> {
        self.conn.execute(
            "DELETE FROM metrics WHERE storage_key = ?1",
            params![STORAGE_KEY],
        )?;
        Ok(())
    }
}

// ── In-memory implementation ───────────────────────────────────────

/// Keeps the blob in a field. For tests and what-if runs that should
/// never touch disk.
#[derive(Debug, Default)]
pub struct MemoryMetricsStore {
    slot: Option<DatasetMetrics>,
}

impl MemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsStore for MemoryMetricsStore {
    fn save(&mut self, metrics: &DatasetMetrics) -> EngineResult<String> {
        self.slot = Some(metrics.clone());
        Ok(uuid::Uuid::new_v4().to_string())
    }

    fn load(&self) -> EngineResult<Option<DatasetMetrics>> {
        Ok(self.slot.clone())
    }

    fn clear(&mut self) -> EngineResult<()> {
        self.slot = None;
        Ok(())
    }
}
