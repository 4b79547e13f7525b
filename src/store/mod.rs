//! Durable local store
//!
//! One SQLite table per resource kind plus the `sync_meta` table used by the
//! staleness policy. Every mutation is committed before the call returns.

pub mod records;
pub mod schema;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::error::StorageError;

pub use records::{Collection, IndexField, Record};
pub use schema::SCHEMA_VERSION;

type Result<T> = std::result::Result<T, StorageError>;

/// SQLite-backed local store
pub struct LocalStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// Default store directory (~/.cache/clubsync on Linux)
    pub fn default_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(StorageError::NoHome)?;
        Ok(cache_base.join("clubsync"))
    }

    /// Open or create the store in a specific directory
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| StorageError::Io(format!("Failed to create store dir: {}", e)))?;

        let db_path = dir.join("store.db");
        let conn = Connection::open(&db_path)?;
        Self::init(conn, Some(db_path))
    }

    /// Open a throwaway in-memory store
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        let version = schema::migrate(&mut conn)?;
        log::debug!("Local store ready at schema v{}", version);
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Io("Local store lock poisoned".to_string()))
    }

    /// Upsert one record
    pub fn put<T: Record>(&self, record: &T) -> Result<()> {
        self.put_all(std::slice::from_ref(record))
    }

    /// Upsert many records in a single transaction
    pub fn put_all<T: Record>(&self, records: &[T]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let collection = T::COLLECTION;
        let indexes = collection.indexes();
        let sql = upsert_sql(collection);

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for record in records {
                let mut values: Vec<Option<String>> = Vec::with_capacity(indexes.len() + 2);
                values.push(Some(record.id()));
                values.push(Some(serde_json::to_string(record)?));
                values.extend(indexes.iter().map(|f| record.index_value(*f)));
                stmt.execute(params_from_iter(values.iter()))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Get a record by primary key
    pub fn get<T: Record>(&self, id: &str) -> Result<Option<T>> {
        let conn = self.conn()?;
        let data: Option<String> = conn
            .query_row(
                &format!("SELECT data FROM {} WHERE id = ?1", T::COLLECTION.table()),
                [id],
                |r| r.get(0),
            )
            .optional()?;

        data.map(|d| serde_json::from_str(&d).map_err(StorageError::from))
            .transpose()
    }

    /// Every record of a collection, in no particular order
    pub fn get_all<T: Record>(&self) -> Result<Vec<T>> {
        let sql = format!("SELECT data FROM {}", T::COLLECTION.table());
        self.select(&sql, [])
    }

    /// Records whose index column equals `value`
    pub fn query_by_index<T: Record>(&self, field: IndexField, value: &str) -> Result<Vec<T>> {
        let column = checked_column::<T>(field)?;
        let sql = format!(
            "SELECT data FROM {} WHERE \"{}\" = ?1",
            T::COLLECTION.table(),
            column
        );
        self.select(&sql, [value])
    }

    fn select<T: Record, P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |r| r.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }

    /// Delete a record; returns whether it existed
    pub fn remove<T: Record>(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", T::COLLECTION.table()),
            [id],
        )?;
        Ok(deleted > 0)
    }

    /// Delete every record of a collection
    pub fn clear<T: Record>(&self) -> Result<usize> {
        self.clear_collection(T::COLLECTION)
    }

    fn clear_collection(&self, collection: Collection) -> Result<usize> {
        let conn = self.conn()?;
        Ok(conn.execute(&format!("DELETE FROM {}", collection.table()), [])?)
    }

    /// Number of records in a collection
    pub fn count<T: Record>(&self) -> Result<usize> {
        self.count_collection(T::COLLECTION)
    }

    fn count_collection(&self, collection: Collection) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", collection.table()),
            [],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    /// Delete records in the `field = value` bucket whose id is not in
    /// `keep_ids`. Returns the number of records removed.
    pub fn remove_missing<T: Record>(
        &self,
        field: IndexField,
        value: &str,
        keep_ids: &[String],
    ) -> Result<usize> {
        let column = checked_column::<T>(field)?;
        let select = format!(
            "SELECT id FROM {} WHERE \"{}\" = ?1",
            T::COLLECTION.table(),
            column
        );
        self.prune(T::COLLECTION, &select, [value], keep_ids)
    }

    /// Delete every record of a collection whose id is not in `keep_ids`
    pub fn retain<T: Record>(&self, keep_ids: &[String]) -> Result<usize> {
        let select = format!("SELECT id FROM {}", T::COLLECTION.table());
        self.prune(T::COLLECTION, &select, [], keep_ids)
    }

    /// Delete the ids returned by `select` that aren't in `keep_ids`
    fn prune<P: rusqlite::Params>(
        &self,
        collection: Collection,
        select: &str,
        params: P,
        keep_ids: &[String],
    ) -> Result<usize> {
        let keep: HashSet<&str> = keep_ids.iter().map(String::as_str).collect();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let stale: Vec<String> = {
            let mut stmt = tx.prepare(select)?;
            let ids = stmt.query_map(params, |r| r.get::<_, String>(0))?;
            ids.collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .filter(|id| !keep.contains(id.as_str()))
                .collect()
        };
        for id in &stale {
            tx.execute(
                &format!("DELETE FROM {} WHERE id = ?1", collection.table()),
                [id],
            )?;
        }
        tx.commit()?;

        Ok(stale.len())
    }

    // ------------------------------------------------------------------
    // Sync metadata
    // ------------------------------------------------------------------

    /// Last successful sync of a cache key, in Unix milliseconds
    pub fn last_sync_ms(&self, cache_key: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                "SELECT last_sync_ms FROM sync_meta WHERE cache_key = ?1",
                [cache_key],
                |r| r.get(0),
            )
            .optional()?)
    }

    /// Record a successful sync of a cache key
    pub fn set_last_sync_ms(&self, cache_key: &str, at_ms: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sync_meta (cache_key, last_sync_ms) VALUES (?1, ?2)
             ON CONFLICT(cache_key) DO UPDATE SET last_sync_ms = excluded.last_sync_ms",
            params![cache_key, at_ms],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Store-wide
    // ------------------------------------------------------------------

    /// Clear every collection and all sync metadata
    pub fn clear_all(&self) -> Result<ClearStats> {
        let mut records_removed = 0;
        for collection in Collection::ALL {
            records_removed += self.clear_collection(collection)?;
        }

        let conn = self.conn()?;
        let sync_entries_removed = conn.execute("DELETE FROM sync_meta", [])?;

        Ok(ClearStats {
            records_removed,
            sync_entries_removed,
        })
    }

    /// Store statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let mut collections = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            collections.push((collection, self.count_collection(collection)?));
        }

        let conn = self.conn()?;
        let (sync_entries, oldest_sync_ms, newest_sync_ms): (i64, Option<i64>, Option<i64>) =
            conn.query_row(
                "SELECT COUNT(*), MIN(last_sync_ms), MAX(last_sync_ms) FROM sync_meta",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )?;
        let schema_version = schema::current_version(&conn)?;

        Ok(StoreStats {
            collections,
            sync_entries: sync_entries as usize,
            oldest_sync_ms,
            newest_sync_ms,
            schema_version,
        })
    }
}

/// Column name for `field`, or `UnknownIndex` if `T` doesn't declare it
fn checked_column<T: Record>(field: IndexField) -> Result<&'static str> {
    if T::COLLECTION.has_index(field) {
        Ok(field.column())
    } else {
        Err(StorageError::UnknownIndex {
            collection: T::COLLECTION.table(),
            index: field.column(),
        })
    }
}

fn upsert_sql(collection: Collection) -> String {
    let indexes = collection.indexes();
    let mut columns = vec!["id".to_string(), "data".to_string()];
    columns.extend(indexes.iter().map(|f| format!("\"{}\"", f.column())));

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let updates: Vec<String> = columns[1..]
        .iter()
        .map(|c| format!("{} = excluded.{}", c, c))
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT(id) DO UPDATE SET {}",
        collection.table(),
        columns.join(", "),
        placeholders.join(", "),
        updates.join(", ")
    )
}

/// Statistics about a clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub records_removed: usize,
    pub sync_entries_removed: usize,
}

/// Statistics about store state
#[derive(Debug)]
pub struct StoreStats {
    pub collections: Vec<(Collection, usize)>,
    pub sync_entries: usize,
    pub oldest_sync_ms: Option<i64>,
    pub newest_sync_ms: Option<i64>,
    pub schema_version: i32,
}

impl StoreStats {
    /// Total records across all collections
    pub fn total_records(&self) -> usize {
        self.collections.iter().map(|(_, n)| n).sum()
    }
}
