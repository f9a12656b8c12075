//! Persistence seam behind the inventory store.
//!
//! Repositories only move rows. Validation, routing and change notification
//! happen in [`crate::InventoryStore`], so every implementation receives
//! already-validated [`NewCar`]/[`CarPatch`] values.

use std::sync::Arc;

use async_trait::async_trait;

use carshop_core::CarId;
use carshop_inventory::{Car, CarPatch, NewCar};

use crate::error::StoreResult;
use crate::query::{CarFilter, SortOrder};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryCarRepository;
pub use sqlite::SqliteCarRepository;

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Records matching `filter`, sorted by `order` (id when `None`).
    async fn fetch(&self, filter: &CarFilter, order: Option<&SortOrder>) -> StoreResult<Vec<Car>>;

    async fn count(&self, filter: &CarFilter) -> StoreResult<u64>;

    /// Persist a new record and return its freshly assigned id.
    async fn insert(&self, car: &NewCar) -> StoreResult<CarId>;

    /// Apply `patch` to every matching record; returns rows affected.
    async fn update(&self, filter: &CarFilter, patch: &CarPatch) -> StoreResult<u64>;

    /// Remove every matching record; returns rows affected.
    async fn delete(&self, filter: &CarFilter) -> StoreResult<u64>;
}

#[async_trait]
impl<R> CarRepository for Arc<R>
where
    R: CarRepository + ?Sized,
{
    async fn fetch(&self, filter: &CarFilter, order: Option<&SortOrder>) -> StoreResult<Vec<Car>> {
        (**self).fetch(filter, order).await
    }

    async fn count(&self, filter: &CarFilter) -> StoreResult<u64> {
        (**self).count(filter).await
    }

    async fn insert(&self, car: &NewCar) -> StoreResult<CarId> {
        (**self).insert(car).await
    }

    async fn update(&self, filter: &CarFilter, patch: &CarPatch) -> StoreResult<u64> {
        (**self).update(filter, patch).await
    }

    async fn delete(&self, filter: &CarFilter) -> StoreResult<u64> {
        (**self).delete(filter).await
    }
}
