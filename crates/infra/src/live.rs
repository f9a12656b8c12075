//! Re-runnable reads bound to a route.
//!
//! A [`LiveQuery`] subscribes to the store's change notices when it is
//! created. Consumers poll [`LiveQuery::refresh_if_changed`] at their own pace
//! and only pay for a re-read when a relevant notice arrived in between.

use carshop_events::Subscription;
use carshop_inventory::Car;

use crate::change::ChangeNotice;
use crate::error::StoreResult;
use crate::query::{CarFilter, SortOrder};
use crate::route::Route;
use crate::store::InventoryStore;

#[derive(Debug)]
pub struct LiveQuery {
    store: InventoryStore,
    route: Route,
    filter: CarFilter,
    order: Option<SortOrder>,
    subscription: Subscription<ChangeNotice>,
}

impl LiveQuery {
    pub(crate) fn new(
        store: InventoryStore,
        route: Route,
        filter: CarFilter,
        order: Option<SortOrder>,
    ) -> Self {
        let subscription = store.subscribe();
        Self {
            store,
            route,
            filter,
            order,
            subscription,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Run the query now, regardless of pending notices.
    pub async fn fetch(&self) -> StoreResult<Vec<Car>> {
        self.store
            .query(self.route, &self.filter, self.order)
            .await
    }

    /// Whether a notice affecting this route arrived since the last poll.
    ///
    /// Consumes every queued notice.
    pub fn is_stale(&mut self) -> bool {
        let route = self.route;
        self.subscription
            .drain()
            .iter()
            .fold(false, |stale, notice| stale | notice.affects(&route))
    }

    /// Re-read if something relevant changed; `None` means the last result is
    /// still current.
    pub async fn refresh_if_changed(&mut self) -> StoreResult<Option<Vec<Car>>> {
        if !self.is_stale() {
            return Ok(None);
        }
        tracing::debug!(route = %self.route, "live query is stale, re-reading");
        self.fetch().await.map(Some)
    }
}
