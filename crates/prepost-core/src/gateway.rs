//! Store gateway: the single seam between the core and a tabular store.

use std::sync::Arc;

use crate::error::StoreError;
use crate::model::ExamRecord;
use crate::traits::TabularStore;

/// Wraps a [`TabularStore`] client with the worksheet the exam data lives in.
///
/// `fetch_all` never panics or leaks transport internals; every failure is a
/// typed [`StoreError`] the caller can classify. Display-only read paths may
/// degrade to an empty dataset on error, but mutation paths must not (see
/// [`crate::repository::RecordRepository`]).
#[derive(Clone)]
pub struct StoreGateway {
    store: Arc<dyn TabularStore>,
    worksheet: String,
}

impl StoreGateway {
    pub fn new(store: Arc<dyn TabularStore>, worksheet: impl Into<String>) -> Self {
        Self {
            store,
            worksheet: worksheet.into(),
        }
    }

    /// The worksheet this gateway reads and writes.
    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    /// Fetch every record, in stored order. An empty worksheet is an empty
    /// vec, not an error.
    pub async fn fetch_all(&self) -> Result<Vec<ExamRecord>, StoreError> {
        let rows = self.store.read_rows(&self.worksheet).await?;
        tracing::debug!(
            store = self.store.name(),
            worksheet = %self.worksheet,
            rows = rows.len(),
            "fetched records"
        );
        Ok(rows)
    }

    /// Overwrite the entire worksheet with `rows`, verbatim (not a merge).
    ///
    /// A failed overwrite is an unrecoverable loss of the pending update, so
    /// errors always propagate to the orchestrating layer.
    pub async fn replace_all(&self, rows: &[ExamRecord]) -> Result<(), StoreError> {
        self.store.overwrite(&self.worksheet, rows).await?;
        tracing::debug!(
            store = self.store.name(),
            worksheet = %self.worksheet,
            rows = rows.len(),
            "replaced records"
        );
        Ok(())
    }
}
