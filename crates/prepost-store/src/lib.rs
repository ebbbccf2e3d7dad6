//! prepost-store — Tabular store backends.
//!
//! Implements the `TabularStore` trait for an HTTP sheet-bridge service, a
//! local JSON file, and an in-memory test store, allowing prepost to persist
//! exam records to multiple backends.

pub mod config;
pub mod file;
pub mod memory;
pub mod sheets;

pub use config::{create_store, load_config, load_config_from, PrepostConfig, StoreConfig};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use sheets::SheetsStore;
