//! Record repository: read-modify-write operations over examinee records.
//!
//! The store has no partial-update primitive, so every mutation here reads
//! the full collection, computes a new one, and overwrites. A process-local
//! write lock serializes those sequences so two tasks in the same process
//! cannot interleave fetch/replace and drop each other's rows. Writers in
//! other processes are still last-writer-wins; that gap is accepted and
//! documented rather than hidden.

use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::gateway::StoreGateway;
use crate::model::{ExamRecord, ScoreField};

/// Identity lookup, append, and score-update operations over [`ExamRecord`]s.
///
/// The sole component permitted to mutate the store-backed collection.
pub struct RecordRepository {
    gateway: StoreGateway,
    write_lock: Mutex<()>,
}

impl RecordRepository {
    pub fn new(gateway: StoreGateway) -> Self {
        Self {
            gateway,
            write_lock: Mutex::new(()),
        }
    }

    /// All stored records, in stored order.
    pub async fn fetch_all(&self) -> Result<Vec<ExamRecord>, StoreError> {
        self.gateway.fetch_all().await
    }

    /// Case-insensitive membership test over the stored names.
    pub async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let rows = self.gateway.fetch_all().await?;
        let needle = name.to_lowercase();
        Ok(rows.iter().any(|r| r.name.to_lowercase() == needle))
    }

    /// Append a record to the collection.
    ///
    /// Performs no uniqueness check; the caller must have already verified
    /// `!exists(record.name)`.
    pub async fn append(&self, record: ExamRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.gateway.fetch_all().await?;
        rows.push(record);
        self.gateway.replace_all(&rows).await
    }

    /// Set `field` to `value` on the first record whose name matches
    /// (case-insensitively) and write the collection back.
    ///
    /// Returns `Ok(false)` without writing anything when no record matches.
    pub async fn update_score(
        &self,
        name: &str,
        field: ScoreField,
        value: u32,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.gateway.fetch_all().await?;
        let needle = name.to_lowercase();
        let Some(row) = rows.iter_mut().find(|r| r.name.to_lowercase() == needle) else {
            return Ok(false);
        };

        match field {
            ScoreField::Pretest => row.pretest_score = value,
            ScoreField::Posttest => row.posttest_score = value,
        }

        self.gateway.replace_all(&rows).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TabularStore;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Plain in-memory store for exercising the repository.
    #[derive(Default)]
    struct VecStore {
        rows: std::sync::Mutex<Vec<ExamRecord>>,
    }

    #[async_trait]
    impl TabularStore for VecStore {
        fn name(&self) -> &str {
            "vec"
        }

        async fn read_rows(&self, _worksheet: &str) -> Result<Vec<ExamRecord>, StoreError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn overwrite(
            &self,
            _worksheet: &str,
            rows: &[ExamRecord],
        ) -> Result<(), StoreError> {
            *self.rows.lock().unwrap() = rows.to_vec();
            Ok(())
        }
    }

    fn repository() -> RecordRepository {
        let gateway = StoreGateway::new(Arc::new(VecStore::default()), "Data");
        RecordRepository::new(gateway)
    }

    fn record(name: &str, pre: u32) -> ExamRecord {
        ExamRecord::new_pretest(name, pre, "2025-01-01 10:00:00".into())
    }

    #[tokio::test]
    async fn exists_after_append() {
        let repo = repository();
        assert!(!repo.exists("Budi").await.unwrap());

        repo.append(record("Budi", 70)).await.unwrap();
        assert!(repo.exists("Budi").await.unwrap());
        // Idempotent without further writes
        assert!(repo.exists("Budi").await.unwrap());
    }

    #[tokio::test]
    async fn exists_is_case_insensitive() {
        let repo = repository();
        repo.append(record("alice", 50)).await.unwrap();

        assert!(repo.exists("Alice").await.unwrap());
        assert!(repo.exists("ALICE").await.unwrap());
        assert!(!repo.exists("Bob").await.unwrap());
    }

    #[tokio::test]
    async fn update_score_round_trip() {
        let repo = repository();
        repo.append(record("Budi", 70)).await.unwrap();
        repo.append(record("Sari", 40)).await.unwrap();

        let updated = repo
            .update_score("Budi", ScoreField::Posttest, 90)
            .await
            .unwrap();
        assert!(updated);

        let rows = repo.fetch_all().await.unwrap();
        let budi = rows.iter().find(|r| r.name == "Budi").unwrap();
        assert_eq!(budi.posttest_score, 90);
        // Other fields and other rows unchanged
        assert_eq!(budi.pretest_score, 70);
        assert_eq!(budi.timestamp, "2025-01-01 10:00:00");
        let sari = rows.iter().find(|r| r.name == "Sari").unwrap();
        assert_eq!(sari.posttest_score, 0);
    }

    #[tokio::test]
    async fn update_score_matches_case_insensitively() {
        let repo = repository();
        repo.append(record("budi", 70)).await.unwrap();

        let updated = repo
            .update_score("BUDI", ScoreField::Posttest, 80)
            .await
            .unwrap();
        assert!(updated);
        assert_eq!(repo.fetch_all().await.unwrap()[0].posttest_score, 80);
    }

    #[tokio::test]
    async fn update_score_noop_on_miss() {
        let repo = repository();
        repo.append(record("Budi", 70)).await.unwrap();
        let before = repo.fetch_all().await.unwrap();

        let updated = repo
            .update_score("Nonexistent", ScoreField::Posttest, 100)
            .await
            .unwrap();
        assert!(!updated);
        assert_eq!(repo.fetch_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_pretest_field() {
        let repo = repository();
        repo.append(record("Budi", 70)).await.unwrap();

        repo.update_score("Budi", ScoreField::Pretest, 30)
            .await
            .unwrap();
        assert_eq!(repo.fetch_all().await.unwrap()[0].pretest_score, 30);
    }
}
