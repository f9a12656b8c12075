//! Subcommand implementations. Each one issues store calls and prints.

pub mod order;
pub mod records;
pub mod stock;
