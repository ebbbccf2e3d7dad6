//! In-memory store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use prepost_core::error::StoreError;
use prepost_core::model::ExamRecord;
use prepost_core::traits::TabularStore;

/// An in-memory tabular store for testing repositories and sessions without
/// real I/O.
///
/// Counts reads and writes, and can be told to fail either direction to
/// exercise failure paths.
#[derive(Default)]
pub struct MemoryStore {
    worksheets: Mutex<HashMap<String, Vec<ExamRecord>>>,
    read_count: AtomicU32,
    write_count: AtomicU32,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a worksheet with rows.
    pub fn with_rows(worksheet: &str, rows: Vec<ExamRecord>) -> Self {
        let store = Self::new();
        store
            .worksheets
            .lock()
            .unwrap()
            .insert(worksheet.to_string(), rows);
        store
    }

    /// Current contents of a worksheet (empty if never written).
    pub fn rows(&self, worksheet: &str) -> Vec<ExamRecord> {
        self.worksheets
            .lock()
            .unwrap()
            .get(worksheet)
            .cloned()
            .unwrap_or_default()
    }

    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Make subsequent reads fail with a network error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Make subsequent writes fail with a network error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read_rows(&self, worksheet: &str) -> Result<Vec<ExamRecord>, StoreError> {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::Network("simulated read failure".into()));
        }
        Ok(self.rows(worksheet))
    }

    async fn overwrite(&self, worksheet: &str, rows: &[ExamRecord]) -> Result<(), StoreError> {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Network("simulated write failure".into()));
        }
        self.worksheets
            .lock()
            .unwrap()
            .insert(worksheet.to_string(), rows.to_vec());
        Ok(())
    }
}
