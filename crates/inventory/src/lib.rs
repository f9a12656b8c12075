//! Car inventory domain module.
//!
//! Record shape, field validation and stock rules, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod car;
pub mod order;
pub mod values;

pub use car::{Car, CarField};
pub use order::OrderRequest;
pub use values::{CarPatch, CarValues, NewCar};
