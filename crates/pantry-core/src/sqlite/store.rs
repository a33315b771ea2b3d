use std::fs;
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use crate::models::{CoreError, CoreErrorKind};
use crate::persistence::{MigrationStore, PersistenceResult, SessionStore, StoredSession};
use crate::sqlite::migrations::{SqliteMigration, current_schema_version, migration};

const MIGRATIONS_TABLE: &str = "pantry_schema_migrations";

#[derive(Debug, Error)]
enum SqliteFailure {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("cannot create database directory: {0}")]
    Directory(#[from] std::io::Error),
    #[error("schema is not initialized; run migrations before touching the session")]
    Unmigrated,
    #[error("migration version '{0}' is not defined")]
    UnknownMigration(i64),
    #[error("saved_at is outside the supported range")]
    Timestamp,
}

#[derive(Clone, Copy)]
enum Step {
    Up,
    Down,
}

/// Session persistence backed by a single sqlite file.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn migrate_to_latest(&self) -> PersistenceResult<()> {
        self.apply_migration(current_schema_version())
    }

    fn open<T>(
        &self,
        operation: &'static str,
        work: impl FnOnce(&mut Connection) -> Result<T, SqliteFailure>,
    ) -> PersistenceResult<T> {
        self.connect()
            .and_then(|mut connection| work(&mut connection))
            .map_err(|failure| {
                CoreError::new(
                    CoreErrorKind::StorageFailure,
                    format!("sqlite {operation} failed: {failure}"),
                )
            })
    }

    fn connect(&self) -> Result<Connection, SqliteFailure> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let connection = Connection::open(&self.path)?;
        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at_unix INTEGER NOT NULL
            );"
        ))?;
        Ok(connection)
    }
}

impl MigrationStore for SqliteStore {
    fn current_version(&self) -> PersistenceResult<i64> {
        self.open("current_version", |connection| schema_version(connection))
    }

    fn apply_migration(&self, target_version: i64) -> PersistenceResult<()> {
        self.open("apply_migration", |connection| {
            if target_version < 0 || target_version > current_schema_version() {
                return Err(SqliteFailure::UnknownMigration(target_version));
            }

            let current = schema_version(connection)?;
            if target_version >= current {
                for version in (current + 1)..=target_version {
                    run_step(connection, defined(version)?, Step::Up)?;
                }
            } else {
                for version in ((target_version + 1)..=current).rev() {
                    run_step(connection, defined(version)?, Step::Down)?;
                }
            }
            Ok(())
        })
    }
}

impl SessionStore for SqliteStore {
    fn load_session(&self) -> PersistenceResult<Option<StoredSession>> {
        self.open("load_session", |connection| {
            require_schema(connection)?;
            let row = connection
                .query_row(
                    "SELECT token, user_json, saved_at_unix FROM auth_session WHERE slot = 1",
                    [],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, i64>(2)?,
                        ))
                    },
                )
                .optional()?;

            row.map(|(token, user_json, saved_at)| {
                let seconds = u64::try_from(saved_at).map_err(|_| SqliteFailure::Timestamp)?;
                Ok(StoredSession {
                    token,
                    user_json,
                    saved_at: UNIX_EPOCH + Duration::from_secs(seconds),
                })
            })
            .transpose()
        })
    }

    fn save_session(&self, session: &StoredSession) -> PersistenceResult<()> {
        let saved_at = session
            .saved_at
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|elapsed| i64::try_from(elapsed.as_secs()).ok());

        self.open("save_session", |connection| {
            require_schema(connection)?;
            let saved_at = saved_at.ok_or(SqliteFailure::Timestamp)?;
            connection.execute(
                "INSERT INTO auth_session (slot, token, user_json, saved_at_unix)
                 VALUES (1, ?1, ?2, ?3)
                 ON CONFLICT(slot) DO UPDATE SET
                     token = excluded.token,
                     user_json = excluded.user_json,
                     saved_at_unix = excluded.saved_at_unix",
                params![session.token, session.user_json, saved_at],
            )?;
            Ok(())
        })
    }

    fn clear_session(&self) -> PersistenceResult<()> {
        self.open("clear_session", |connection| {
            require_schema(connection)?;
            connection.execute("DELETE FROM auth_session", [])?;
            Ok(())
        })
    }
}

fn schema_version(connection: &Connection) -> Result<i64, SqliteFailure> {
    let version = connection.query_row(
        &format!("SELECT COALESCE(MAX(version), 0) FROM {MIGRATIONS_TABLE}"),
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn require_schema(connection: &Connection) -> Result<(), SqliteFailure> {
    if schema_version(connection)? == 0 {
        return Err(SqliteFailure::Unmigrated);
    }
    Ok(())
}

fn defined(version: i64) -> Result<&'static SqliteMigration, SqliteFailure> {
    migration(version).ok_or(SqliteFailure::UnknownMigration(version))
}

/// Runs one migration and its bookkeeping row inside a single transaction.
fn run_step(
    connection: &mut Connection,
    entry: &SqliteMigration,
    step: Step,
) -> Result<(), SqliteFailure> {
    let transaction = connection.transaction()?;
    match step {
        Step::Up => {
            transaction.execute_batch(entry.up_sql)?;
            transaction.execute(
                &format!(
                    "INSERT INTO {MIGRATIONS_TABLE} (version, name, applied_at_unix)
                     VALUES (?1, ?2, unixepoch())"
                ),
                params![entry.version, entry.name],
            )?;
        }
        Step::Down => {
            transaction.execute_batch(entry.down_sql)?;
            transaction.execute(
                &format!("DELETE FROM {MIGRATIONS_TABLE} WHERE version = ?1"),
                [entry.version],
            )?;
        }
    }
    transaction.commit()?;
    Ok(())
}
