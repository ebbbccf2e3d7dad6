//! The tabular store client trait.
//!
//! Implemented by the `prepost-store` crate for the HTTP sheet bridge, a
//! local JSON file, and an in-memory test store. The core only ever talks to
//! the store through this trait; everything above it is full-read /
//! full-overwrite.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::ExamRecord;

/// A client for an external tabular store of [`ExamRecord`] rows.
///
/// The store has no partial-update primitive. `read_rows` returns the whole
/// collection in order; `overwrite` replaces it verbatim. Callers that need
/// read-modify-write semantics build them on top (see
/// [`crate::repository::RecordRepository`]).
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Human-readable backend name (e.g. "sheets").
    fn name(&self) -> &str;

    /// Read every row of the named worksheet, in stored order.
    ///
    /// A worksheet with no data yet is an empty vec, not an error.
    async fn read_rows(&self, worksheet: &str) -> Result<Vec<ExamRecord>, StoreError>;

    /// Replace the entire worksheet contents with `rows`, verbatim.
    async fn overwrite(&self, worksheet: &str, rows: &[ExamRecord]) -> Result<(), StoreError>;
}
