//! Resources served by the server
//!
//! Two namespaces: a fixed table of static resources under `/static/` and a
//! bounded, mutable store under `/dynamic/`.

pub mod static_table;
pub mod store;

pub use static_table::{StaticResource, StaticTable};
pub use store::{DynamicStore, Lookup, PutOutcome, SharedStore, Slot, StoreError};
