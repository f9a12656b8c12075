use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use carshop_core::{CarId, Entity};
use carshop_inventory::{Car, CarPatch, NewCar};

use crate::error::{StoreError, StoreResult};
use crate::query::{CarFilter, SortOrder};
use crate::repository::CarRepository;

/// In-memory car repository for tests/dev.
///
/// Mirrors the SQLite table: ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryCarRepository {
    inner: RwLock<Table>,
}

#[derive(Debug)]
struct Table {
    last_id: i64,
    rows: BTreeMap<CarId, Car>,
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                last_id: 0,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryCarRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn fetch(&self, filter: &CarFilter, order: Option<&SortOrder>) -> StoreResult<Vec<Car>> {
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;

        let mut cars: Vec<Car> = table
            .rows
            .values()
            .filter(|car| filter.matches(car))
            .cloned()
            .collect();

        // BTreeMap iteration is already id order.
        if let Some(order) = order {
            cars.sort_by(|a, b| order.compare(a, b));
        }
        Ok(cars)
    }

    async fn count(&self, filter: &CarFilter) -> StoreResult<u64> {
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().filter(|car| filter.matches(car)).count() as u64)
    }

    async fn insert(&self, car: &NewCar) -> StoreResult<CarId> {
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        table.last_id += 1;
        let car = car.clone().into_car(CarId::new(table.last_id));
        let id = car.id();
        table.rows.insert(id, car);
        Ok(id)
    }

    async fn update(&self, filter: &CarFilter, patch: &CarPatch) -> StoreResult<u64> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        let mut rows = 0;
        for car in table.rows.values_mut().filter(|car| filter.matches(car)) {
            patch.apply_to(car);
            rows += 1;
        }
        Ok(rows)
    }

    async fn delete(&self, filter: &CarFilter) -> StoreResult<u64> {
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        let before = table.rows.len();
        table.rows.retain(|_, car| !filter.matches(car));
        Ok((before - table.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn update_applies_patch_to_matches_only() {
        block_on(async {
            let repo = InMemoryCarRepository::new();
            let first = repo.insert(&NewCar::demo()).await.unwrap();
            repo.insert(&NewCar::demo()).await.unwrap();

            let patch = CarPatch::quantity_only(0).unwrap();
            let rows = repo.update(&CarFilter::by_id(first), &patch).await.unwrap();
            assert_eq!(rows, 1);

            let sold_out = repo.count(&CarFilter::all().out_of_stock()).await.unwrap();
            assert_eq!(sold_out, 1);
        });
    }

    proptest! {
        /// Property: whatever gets deleted in between, every new id is larger
        /// than all ids handed out before it.
        #[test]
        fn ids_strictly_increase(deletes in proptest::collection::vec(any::<bool>(), 1..24)) {
            block_on(async {
                let repo = InMemoryCarRepository::new();
                let mut last = CarId::new(0);
                for delete in deletes {
                    let id = repo.insert(&NewCar::demo()).await.unwrap();
                    assert!(id > last);
                    last = id;
                    if delete {
                        repo.delete(&CarFilter::by_id(id)).await.unwrap();
                    }
                }
            });
        }
    }
}
