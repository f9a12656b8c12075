//! Change notification mechanics (transport only, no domain types).

pub mod bus;
pub mod in_memory_bus;

pub use bus::{ChangeBus, Observer, ObserverId, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryChangeBus};
