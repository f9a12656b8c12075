//! The inventory store: validation, routing and change notification over a
//! [`CarRepository`].
//!
//! Every mutating call validates first, writes second and notifies last:
//!
//! ```text
//! CarValues ─validate─▶ NewCar / CarPatch ─▶ repository ─rows > 0─▶ ChangeNotice
//! ```
//!
//! A rejected field set never reaches the repository, and a call that changed
//! no rows publishes nothing.

use std::sync::Arc;

use tokio::sync::Mutex;

use carshop_core::{CarId, DomainError};
use carshop_events::{ChangeBus, InMemoryChangeBus, Observer, ObserverId, Subscription};
use carshop_inventory::{Car, CarPatch, CarValues};

use crate::change::ChangeNotice;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::live::LiveQuery;
use crate::query::{CarFilter, SortOrder};
use crate::repository::{CarRepository, SqliteCarRepository};
use crate::route::{Route, Router};

/// Handle to one inventory.
///
/// Cheap to clone; clones share the repository, the router, the observers and
/// the write lock.
#[derive(Clone)]
pub struct InventoryStore {
    repository: Arc<dyn CarRepository>,
    router: Arc<Router>,
    bus: Arc<InMemoryChangeBus<ChangeNotice>>,
    /// Serializes writers, including read-modify-write stock updates.
    write_lock: Arc<Mutex<()>>,
}

impl core::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("router", &self.router)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl InventoryStore {
    /// Open the SQLite database described by `config`.
    pub async fn open(config: &StoreConfig) -> StoreResult<Self> {
        let repository = SqliteCarRepository::connect(config).await?;
        Ok(Self::with_repository(Arc::new(repository)))
    }

    /// Fresh private in-memory SQLite database.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::open(&StoreConfig::in_memory()).await
    }

    pub fn with_repository(repository: Arc<dyn CarRepository>) -> Self {
        Self {
            repository,
            router: Arc::new(Router::new()),
            bus: Arc::new(InMemoryChangeBus::new()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // ----- addressing -----

    /// Resolve a `cars` / `cars/<id>` path.
    pub fn resolve(&self, path: &str) -> StoreResult<Route> {
        self.router.resolve(path)
    }

    pub fn content_type(&self, route: Route) -> &'static str {
        route.content_type()
    }

    // ----- change notification -----

    /// Channel subscription to every future change notice.
    pub fn subscribe(&self) -> Subscription<ChangeNotice> {
        self.bus.subscribe()
    }

    /// Register a callback run after every effective mutation.
    pub fn observe<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&ChangeNotice) + Send + Sync + 'static,
    {
        let observer: Observer<ChangeNotice> = Arc::new(callback);
        self.bus.observe(observer)
    }

    pub fn unobserve(&self, id: ObserverId) -> bool {
        ChangeBus::<ChangeNotice>::unobserve(self.bus.as_ref(), id)
    }

    /// Read bound to `route` that can be re-run when it goes stale.
    pub fn live_query(&self, route: Route, filter: CarFilter, order: Option<SortOrder>) -> LiveQuery {
        LiveQuery::new(self.clone(), route, filter, order)
    }

    /// Call only after the write lock is released; observers may write again.
    fn notify(&self, scope: Route) {
        if let Err(err) = self.bus.publish(ChangeNotice { scope }) {
            // The write is already committed; observers just miss this one.
            tracing::warn!(%scope, "failed to publish change notice: {err:?}");
        }
    }

    // ----- route-addressed surface -----

    /// Read the records behind `route`.
    ///
    /// On an item route the caller's filter is replaced by the id match.
    pub async fn query(
        &self,
        route: Route,
        filter: &CarFilter,
        order: Option<SortOrder>,
    ) -> StoreResult<Vec<Car>> {
        let filter = scoped_filter(route, filter);
        let cars = self.repository.fetch(&filter, order.as_ref()).await?;
        tracing::debug!(%route, rows = cars.len(), "query");
        Ok(cars)
    }

    /// Create a record. Only the collection route accepts inserts.
    pub async fn insert_at(&self, route: Route, values: CarValues) -> StoreResult<CarId> {
        if route != Route::Collection {
            return Err(StoreError::UnsupportedRoute {
                operation: "insert",
                route,
            });
        }
        self.insert(values).await
    }

    /// Update the records behind `route` (and `filter` on the collection).
    pub async fn update_at(
        &self,
        route: Route,
        values: CarValues,
        filter: &CarFilter,
    ) -> StoreResult<u64> {
        let patch = validated_patch(values)?;
        self.apply_patch(route, &scoped_filter(route, filter), &patch)
            .await
    }

    /// Delete the records behind `route` (and `filter` on the collection).
    pub async fn delete_at(&self, route: Route, filter: &CarFilter) -> StoreResult<u64> {
        let filter = scoped_filter(route, filter);

        let rows = {
            let _guard = self.write_lock.lock().await;
            self.repository.delete(&filter).await?
        };
        tracing::info!(%route, rows, "deleted cars");

        if rows > 0 {
            self.notify(route);
        }
        Ok(rows)
    }

    // ----- typed operations -----

    /// All records matching `filter` (every record when `None`).
    pub async fn list(
        &self,
        filter: Option<&CarFilter>,
        order: Option<SortOrder>,
    ) -> StoreResult<Vec<Car>> {
        let all = CarFilter::all();
        self.query(Route::Collection, filter.unwrap_or(&all), order)
            .await
    }

    pub async fn get(&self, id: CarId) -> StoreResult<Car> {
        self.query(Route::Item(id), &CarFilter::all(), None)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found(format!("car {id}")).into())
    }

    pub async fn count(&self, filter: Option<&CarFilter>) -> StoreResult<u64> {
        let all = CarFilter::all();
        self.repository.count(filter.unwrap_or(&all)).await
    }

    /// Validate and persist a new record; returns its id.
    pub async fn insert(&self, values: CarValues) -> StoreResult<CarId> {
        let car = values.into_new_car().inspect_err(|err| {
            tracing::warn!("rejected car insert: {err}");
        })?;

        let id = {
            let _guard = self.write_lock.lock().await;
            self.repository.insert(&car).await?
        };
        tracing::info!(car_id = %id, name = car.name(), "inserted car");

        self.notify(Route::Collection);
        Ok(id)
    }

    /// Apply the present fields to one record.
    ///
    /// Returns 0 when `values` is empty or the id does not exist.
    pub async fn update(&self, id: CarId, values: CarValues) -> StoreResult<u64> {
        self.update_at(Route::Item(id), values, &CarFilter::all())
            .await
    }

    /// Apply the present fields to every record matching `filter`.
    pub async fn update_where(&self, filter: &CarFilter, values: CarValues) -> StoreResult<u64> {
        self.update_at(Route::Collection, values, filter).await
    }

    pub async fn delete_one(&self, id: CarId) -> StoreResult<u64> {
        self.delete_at(Route::Item(id), &CarFilter::all()).await
    }

    pub async fn delete_where(&self, filter: &CarFilter) -> StoreResult<u64> {
        self.delete_at(Route::Collection, filter).await
    }

    pub async fn delete_all(&self) -> StoreResult<u64> {
        self.delete_at(Route::Collection, &CarFilter::all()).await
    }

    // ----- stock -----

    /// Sell one unit; returns the remaining quantity.
    pub async fn sell_one(&self, id: CarId) -> StoreResult<i64> {
        let quantity = {
            let _guard = self.write_lock.lock().await;
            let car = self.load(id).await?;
            let quantity = car.quantity_after_sale()?;
            self.write_quantity(id, quantity).await?;
            quantity
        };
        self.notify(Route::Item(id));

        tracing::info!(car_id = %id, quantity, "sold one car");
        Ok(quantity)
    }

    /// Receive `amount` more units; returns the new quantity.
    pub async fn restock(&self, id: CarId, amount: i64) -> StoreResult<i64> {
        let quantity = {
            let _guard = self.write_lock.lock().await;
            let car = self.load(id).await?;
            let quantity = car.quantity_after_restock(amount)?;
            self.write_quantity(id, quantity).await?;
            quantity
        };
        self.notify(Route::Item(id));

        tracing::info!(car_id = %id, amount, quantity, "restocked car");
        Ok(quantity)
    }

    // ----- internals -----

    /// `get` without re-taking the write lock.
    async fn load(&self, id: CarId) -> StoreResult<Car> {
        self.repository
            .fetch(&CarFilter::by_id(id), None)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found(format!("car {id}")).into())
    }

    async fn write_quantity(&self, id: CarId, quantity: i64) -> StoreResult<()> {
        let patch = CarPatch::quantity_only(quantity)?;
        let rows = self.repository.update(&CarFilter::by_id(id), &patch).await?;
        if rows == 0 {
            return Err(DomainError::not_found(format!("car {id}")).into());
        }
        Ok(())
    }

    async fn apply_patch(&self, route: Route, filter: &CarFilter, patch: &CarPatch) -> StoreResult<u64> {
        if patch.is_empty() {
            tracing::debug!(%route, "empty update ignored");
            return Ok(0);
        }

        let rows = {
            let _guard = self.write_lock.lock().await;
            self.repository.update(filter, patch).await?
        };
        tracing::info!(%route, rows, "updated cars");

        if rows > 0 {
            self.notify(route);
        }
        Ok(rows)
    }
}

fn scoped_filter(route: Route, filter: &CarFilter) -> CarFilter {
    match route {
        Route::Collection => filter.clone(),
        Route::Item(id) => CarFilter::by_id(id),
    }
}

fn validated_patch(values: CarValues) -> StoreResult<CarPatch> {
    values.into_patch().map_err(|err| {
        tracing::warn!("rejected car update: {err}");
        err.into()
    })
}
