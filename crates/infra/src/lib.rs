//! Infrastructure layer: the SQLite-backed inventory store.
//!
//! [`InventoryStore`] validates field sets, routes requests to the
//! repository and publishes one [`ChangeNotice`] per effective mutation.

pub mod change;
pub mod config;
pub mod error;
pub mod live;
pub mod query;
pub mod repository;
pub mod route;
pub mod schema;
pub mod store;

pub use change::ChangeNotice;
pub use config::{DatabaseLocation, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use live::LiveQuery;
pub use query::{CarFilter, Direction, SortOrder};
pub use repository::{CarRepository, InMemoryCarRepository, SqliteCarRepository};
pub use route::{Route, Router};
pub use store::InventoryStore;
