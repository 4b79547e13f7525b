//! Versioned, additive-only schema migrations
//!
//! The version lives in `PRAGMA user_version`. Each migration runs in its own
//! transaction and bumps the version on commit.

use rusqlite::Connection;

use crate::error::StorageError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 3;

/// Migration `i` upgrades the schema from version `i` to `i + 1`
const MIGRATIONS: [&str; SCHEMA_VERSION as usize] = [
    // v1: base collections and sync metadata
    r#"
    CREATE TABLE IF NOT EXISTS forum_posts (
        id TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL,
        "type" TEXT,
        workout_type TEXT,
        "date" TEXT,
        user_id TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_forum_posts_type ON forum_posts("type");
    CREATE INDEX IF NOT EXISTS idx_forum_posts_workout_type ON forum_posts(workout_type);
    CREATE INDEX IF NOT EXISTS idx_forum_posts_date ON forum_posts("date");
    CREATE INDEX IF NOT EXISTS idx_forum_posts_user_id ON forum_posts(user_id);

    CREATE TABLE IF NOT EXISTS workout_signups (
        id TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL,
        workout_id TEXT,
        user_id TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_workout_signups_workout_id ON workout_signups(workout_id);
    CREATE INDEX IF NOT EXISTS idx_workout_signups_user_id ON workout_signups(user_id);

    CREATE TABLE IF NOT EXISTS workout_waitlists (
        id TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL,
        workout_id TEXT,
        user_id TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_workout_waitlists_workout_id ON workout_waitlists(workout_id);
    CREATE INDEX IF NOT EXISTS idx_workout_waitlists_user_id ON workout_waitlists(user_id);

    CREATE TABLE IF NOT EXISTS races (
        id TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL,
        "date" TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_races_date ON races("date");

    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL,
        role TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

    CREATE TABLE IF NOT EXISTS sync_meta (
        cache_key TEXT PRIMARY KEY NOT NULL,
        last_sync_ms INTEGER NOT NULL
    );
    "#,
    // v2: created_at index, backfilled from the stored JSON where missing
    r#"
    ALTER TABLE forum_posts ADD COLUMN created_at TEXT;
    ALTER TABLE races ADD COLUMN created_at TEXT;
    UPDATE forum_posts SET created_at = json_extract(data, '$.created_at')
        WHERE created_at IS NULL;
    UPDATE races SET created_at = json_extract(data, '$.created_at')
        WHERE created_at IS NULL;
    CREATE INDEX IF NOT EXISTS idx_forum_posts_created_at ON forum_posts(created_at);
    CREATE INDEX IF NOT EXISTS idx_races_created_at ON races(created_at);
    "#,
    // v3: race signup rosters
    r#"
    CREATE TABLE IF NOT EXISTS race_signups (
        id TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL,
        race_id TEXT,
        user_id TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_race_signups_race_id ON race_signups(race_id);
    CREATE INDEX IF NOT EXISTS idx_race_signups_user_id ON race_signups(user_id);
    "#,
];

/// Read the schema version recorded in the database
pub fn current_version(conn: &Connection) -> Result<i32, StorageError> {
    Ok(conn.pragma_query_value(None, "user_version", |r| r.get(0))?)
}

/// Bring the database up to [`SCHEMA_VERSION`]
pub fn migrate(conn: &mut Connection) -> Result<i32, StorageError> {
    migrate_to(conn, SCHEMA_VERSION)
}

/// Apply pending migrations up to `target`
pub(crate) fn migrate_to(conn: &mut Connection, target: i32) -> Result<i32, StorageError> {
    let found = current_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(StorageError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for version in found..target.min(SCHEMA_VERSION) {
        log::debug!("Migrating local store to schema v{}", version + 1);
        let tx = conn.transaction()?;
        tx.execute_batch(MIGRATIONS[version as usize])?;
        tx.pragma_update(None, "user_version", version + 1)?;
        tx.commit()?;
    }

    current_version(conn)
}
