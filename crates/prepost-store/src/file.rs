//! JSON-file store implementation.
//!
//! Keeps each worksheet as a JSON array of row objects in a directory,
//! matching the full-read/full-overwrite contract. Useful for local runs and
//! for exercising the whole pipeline without a network store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use prepost_core::error::StoreError;
use prepost_core::model::ExamRecord;
use prepost_core::traits::TabularStore;

/// Store backend keeping worksheets as `<dir>/<worksheet>.json` files.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn worksheet_path(&self, worksheet: &str) -> PathBuf {
        self.dir.join(format!("{worksheet}.json"))
    }
}

#[async_trait]
impl TabularStore for JsonFileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn read_rows(&self, worksheet: &str) -> Result<Vec<ExamRecord>, StoreError> {
        let path = self.worksheet_path(worksheet);
        // A worksheet that was never written to reads as empty, not as an error
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| {
            StoreError::Malformed(format!("{}: {e}", path.display()))
        })
    }

    async fn overwrite(&self, worksheet: &str, rows: &[ExamRecord]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;

        let content = serde_json::to_string_pretty(rows)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        write_atomically(&self.worksheet_path(worksheet), &content)
            .map_err(|e| StoreError::Io(e.to_string()))
    }
}

/// Write via a temp file and rename so a crash mid-write cannot leave a
/// truncated worksheet behind.
fn write_atomically(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}
