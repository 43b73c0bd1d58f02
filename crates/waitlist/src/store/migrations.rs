//! Schema versioning for the fallback store.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The schema version this build writes.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Create the tables if missing and stamp the schema version.
///
/// A database stamped by a newer build is refused rather than written to.
///
/// # Errors
///
/// Returns an error if table creation fails, the stored version is not a
/// number, or it is newer than [`CURRENT_VERSION`].
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match stored_version(conn)? {
        Some(version) if version > CURRENT_VERSION => Err(Error::StoreMigration {
            message: format!(
                "store schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        }),
        Some(version) if version == CURRENT_VERSION => Ok(()),
        _ => {
            conn.execute(
                "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
                (VERSION_KEY, CURRENT_VERSION.to_string()),
            )?;
            Ok(())
        }
    }
}

fn stored_version(conn: &Connection) -> Result<Option<i32>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|value| {
        value.parse().map_err(|_| Error::StoreMigration {
            message: format!("invalid schema version: {value}"),
        })
    })
    .transpose()
}
