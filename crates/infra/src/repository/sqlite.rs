use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use carshop_core::CarId;
use carshop_inventory::{Car, CarPatch, NewCar};

use crate::config::{DatabaseLocation, StoreConfig};
use crate::error::StoreResult;
use crate::query::{CarFilter, SortOrder};
use crate::repository::CarRepository;
use crate::schema;

const SELECT_CARS: &str = "SELECT _id, name, price, quantity, supplier, email, image FROM cars";

/// SQLite-backed car repository.
///
/// Holds a single pooled connection, so statements never interleave and an
/// in-memory database lives exactly as long as the pool.
#[derive(Debug, Clone)]
pub struct SqliteCarRepository {
    pool: SqlitePool,
}

impl SqliteCarRepository {
    /// Open (and if needed create) the database described by `config`.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let options = match &config.database {
            DatabaseLocation::InMemory => SqliteConnectOptions::from_str("sqlite::memory:")?,
            DatabaseLocation::File(path) => {
                if config.create_if_missing {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(config.create_if_missing)
            }
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::info!(database = %config.database, "opened inventory database");
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema when missing.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        schema::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CarRepository for SqliteCarRepository {
    async fn fetch(&self, filter: &CarFilter, order: Option<&SortOrder>) -> StoreResult<Vec<Car>> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_CARS);
        filter.push_where(&mut qb);
        SortOrder::push_order_by(order, &mut qb);

        let rows = qb.build().fetch_all(&self.pool).await?;

        let mut cars = Vec::with_capacity(rows.len());
        for row in rows {
            cars.push(row_to_car(&row)?);
        }
        Ok(cars)
    }

    async fn count(&self, filter: &CarFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM cars");
        filter.push_where(&mut qb);

        let row = qb.build().fetch_one(&self.pool).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, car: &NewCar) -> StoreResult<CarId> {
        let result = sqlx::query(
            r#"
            INSERT INTO cars (name, price, quantity, supplier, email, image)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(car.name())
        .bind(car.price())
        .bind(car.quantity())
        .bind(car.supplier())
        .bind(car.email())
        .bind(car.image())
        .execute(&self.pool)
        .await?;

        Ok(CarId::new(result.last_insert_rowid()))
    }

    async fn update(&self, filter: &CarFilter, patch: &CarPatch) -> StoreResult<u64> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE cars SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(name) = patch.name() {
                set.push("name = ").push_bind_unseparated(name.to_string());
            }
            if let Some(price) = patch.price() {
                set.push("price = ").push_bind_unseparated(price);
            }
            if let Some(quantity) = patch.quantity() {
                set.push("quantity = ").push_bind_unseparated(quantity);
            }
            if let Some(supplier) = patch.supplier() {
                set.push("supplier = ").push_bind_unseparated(supplier.to_string());
            }
            if let Some(email) = patch.email() {
                set.push("email = ").push_bind_unseparated(email.to_string());
            }
            if let Some(image) = patch.image() {
                set.push("image = ").push_bind_unseparated(image.to_string());
            }
        }
        filter.push_where(&mut qb);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, filter: &CarFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM cars");
        filter.push_where(&mut qb);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn row_to_car(row: &SqliteRow) -> Result<Car, sqlx::Error> {
    Ok(Car {
        id: CarId::new(row.try_get("_id")?),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        quantity: row.try_get("quantity")?,
        supplier: row.try_get("supplier")?,
        email: row.try_get("email")?,
        image: row.try_get("image")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteCarRepository {
        SqliteCarRepository::connect(&StoreConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let repo = repo().await;
        let first = repo.insert(&NewCar::demo()).await.unwrap();
        let second = repo.insert(&NewCar::demo()).await.unwrap();
        assert_eq!(first, CarId::new(1));
        assert_eq!(second, CarId::new(2));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = repo().await;
        let first = repo.insert(&NewCar::demo()).await.unwrap();
        repo.delete(&CarFilter::by_id(first)).await.unwrap();
        let next = repo.insert(&NewCar::demo()).await.unwrap();
        assert!(next > first);
    }

    #[tokio::test]
    async fn empty_patch_touches_nothing() {
        let repo = repo().await;
        repo.insert(&NewCar::demo()).await.unwrap();
        let rows = repo
            .update(&CarFilter::all(), &CarPatch::default())
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn name_search_treats_wildcards_literally() {
        let repo = repo().await;
        repo.insert(&NewCar::demo()).await.unwrap();

        let hits = repo
            .fetch(&CarFilter::all().name_contains("%"), None)
            .await
            .unwrap();
        assert!(hits.is_empty());

        let hits = repo
            .fetch(&CarFilter::all().name_contains("mustang"), None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn schema_is_created_once() {
        let repo = repo().await;
        let version = sqlx::query_scalar::<_, i64>("PRAGMA user_version")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(version, schema::SCHEMA_VERSION);

        // Re-running on a current database is a no-op.
        schema::ensure_schema(repo.pool()).await.unwrap();
    }
}
