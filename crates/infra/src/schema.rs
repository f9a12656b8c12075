//! `cars` table layout, versioned through `PRAGMA user_version`.

use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};

pub const TABLE: &str = "cars";

/// Only version ever written; there are no migrations.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_CARS: &str = r#"
    CREATE TABLE IF NOT EXISTS cars (
        _id       INTEGER PRIMARY KEY AUTOINCREMENT,
        name      TEXT    NOT NULL,
        price     INTEGER NOT NULL,
        quantity  INTEGER NOT NULL,
        supplier  TEXT    NOT NULL,
        email     TEXT    NOT NULL,
        image     TEXT    NOT NULL
    )
"#;

/// Create the table on a fresh database, accept a current one, reject newer.
pub async fn ensure_schema(pool: &SqlitePool) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    let version = sqlx::query_scalar::<_, i64>("PRAGMA user_version")
        .fetch_one(&mut *tx)
        .await?;

    match version {
        0 => {
            sqlx::query(CREATE_CARS).execute(&mut *tx).await?;
            // PRAGMA does not accept bound parameters.
            sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
                .execute(&mut *tx)
                .await?;
            tracing::info!(version = SCHEMA_VERSION, "created {TABLE} table");
        }
        SCHEMA_VERSION => {
            tracing::debug!(version, "schema up to date");
        }
        found => {
            return Err(StoreError::SchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            });
        }
    }

    tx.commit().await?;
    Ok(())
}
