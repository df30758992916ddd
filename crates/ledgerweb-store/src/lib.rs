//! SQLite-backed implementation of [`LedgerStore`]
//!
//! Every entry is one row. The parent key is persisted in its textual form so
//! prefix queries become a string comparison on an indexed column. Statements
//! run on tokio's blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ledgerweb_core::key::ENTRY_KIND;
use ledgerweb_core::store::check_parent;
use ledgerweb_core::{
    Entry, EntryId, EntryKind, EntryOrder, EntryQuery, KeyPath, LedgerStore, StoreError, StoredEntry,
};
use rusqlite::{params, Connection};

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file, creating missing parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Backend {
                message: format!("Cannot create {}: {}", dir.display(), e),
            })?;
        }
        let conn = Connection::open(path).map_err(backend)?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(backend)?;
        setup_schema(&conn).map_err(backend)?;
        log::info!("Opened SQLite store at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        setup_schema(&conn).map_err(backend)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        lock(&self.conn)?
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .map_err(backend)
    }

    /// Run `work` against the connection on the blocking pool
    async fn run<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&conn)?;
            work(&mut *guard)
        })
            .await
            .map_err(|e| StoreError::Backend {
                message: format!("Store task failed: {}", e),
            })?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, StoreError> {
    conn.lock().map_err(|_| StoreError::Poisoned)
}

pub fn setup_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_key TEXT NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            day INTEGER NOT NULL,
            day_of_week INTEGER NOT NULL,
            payer INTEGER NOT NULL,
            kind INTEGER NOT NULL,
            price INTEGER NOT NULL,
            detail TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_parent ON entries(parent_key)",
        [],
    )?;

    conn.execute("CREATE INDEX IF NOT EXISTS idx_entries_year ON entries(year)", [])?;

    Ok(())
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend { message: e.to_string() }
}

/// Row as read back, before the kind tag is checked
struct EntryRow {
    id: i64,
    year: i32,
    month: u32,
    day: u32,
    day_of_week: u32,
    payer: i32,
    kind: i64,
    price: i64,
    detail: String,
}

impl EntryRow {
    fn into_stored(self) -> Option<StoredEntry> {
        let kind = EntryKind::from_i64(self.kind)?;
        Some(StoredEntry {
            id: EntryId(self.id),
            entry: Entry {
                day: self.day,
                month: self.month,
                year: self.year,
                day_of_week: self.day_of_week,
                payer: self.payer,
                kind,
                price: self.price,
                detail: self.detail,
            },
        })
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn atomic_put(&self, records: &[(KeyPath, Entry)]) -> Result<Vec<EntryId>, StoreError> {
        for (parent, _) in records {
            check_parent(parent)?;
        }

        let records = records.to_vec();
        self.run(move |conn| {
            let tx = conn.transaction().map_err(backend)?;
            let mut ids = Vec::with_capacity(records.len());
            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO entries (parent_key, year, month, day, day_of_week, payer, kind, price, detail)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    )
                    .map_err(backend)?;
                for (parent, entry) in &records {
                    let id = stmt
                        .insert(params![
                            parent.to_string(),
                            entry.year,
                            entry.month,
                            entry.day,
                            entry.day_of_week,
                            entry.payer,
                            entry.kind.as_i64(),
                            entry.price,
                            entry.detail,
                        ])
                        .map_err(backend)?;
                    ids.push(EntryId(id));
                }
            }
            tx.commit().map_err(backend)?;
            Ok(ids)
        })
        .await
    }

    async fn query(&self, query: &EntryQuery) -> Result<Vec<StoredEntry>, StoreError> {
        let order = match query.order {
            EntryOrder::Insertion => "id ASC",
            EntryOrder::DayDescending => "day DESC, id ASC",
        };
        let sql = format!(
            "SELECT id, year, month, day, day_of_week, payer, kind, price, detail
             FROM entries
             WHERE (parent_key = ?1
                    OR substr(parent_key, 1, length(?1) + 1) = ?1 || '/'
                    OR parent_key || '/{}:' || id = ?1)
               AND (?2 IS NULL OR year = ?2)
             ORDER BY {}",
            ENTRY_KIND, order
        );
        let prefix = query.prefix.to_string();
        let year = query.year;

        let rows = self
            .run(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(backend)?;
                let rows = stmt
                    .query_map(params![prefix, year], |row| {
                        Ok(EntryRow {
                            id: row.get(0)?,
                            year: row.get(1)?,
                            month: row.get(2)?,
                            day: row.get(3)?,
                            day_of_week: row.get(4)?,
                            payer: row.get(5)?,
                            kind: row.get(6)?,
                            price: row.get(7)?,
                            detail: row.get(8)?,
                        })
                    })
                    .map_err(backend)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(backend)?;
                Ok(rows)
            })
            .await?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            let (id, kind) = (row.id, row.kind);
            match row.into_stored() {
                Some(stored) => found.push(stored),
                None => log::warn!("Skipping entry {} with unknown kind tag {}", id, kind),
            }
        }
        Ok(found)
    }

    async fn delete(&self, key: &KeyPath) -> Result<(), StoreError> {
        let invalid = || StoreError::InvalidKey { key: key.to_string() };
        let id = key.entry_id().ok_or_else(invalid)?;
        let parent = key.parent().ok_or_else(invalid)?.to_string();

        let removed = self
            .run(move |conn| {
                conn.execute(
                    "DELETE FROM entries WHERE id = ?1 AND parent_key = ?2",
                    params![id.0, parent],
                )
                .map_err(backend)
            })
            .await?;
        if removed == 0 {
            log::debug!("Delete of {} matched no entry", key);
        }
        Ok(())
    }
}
