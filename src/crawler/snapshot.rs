//! Incremental match-list persistence
//!
//! The whole accumulator is re-serialized and the snapshot file
//! overwritten after every new match, so an interrupted crawl always
//! leaves the latest known-good match list on disk. Consumers may poll
//! the file to observe crawl progress.

use std::path::{Path, PathBuf};

use super::KeywordMatch;
use super::error::CrawlError;

/// Writes the accumulated match list to a JSON snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    /// Create a writer targeting `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the snapshot with the full match list
    pub async fn write(&self, matches: &[KeywordMatch]) -> Result<(), CrawlError> {
        let json = serde_json::to_vec_pretty(matches)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Load a previously written snapshot
    pub async fn load(path: &Path) -> Result<Vec<KeywordMatch>, CrawlError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_overwrites_with_full_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relevant_links.json");
        let writer = SnapshotWriter::new(&path);

        let mut matches = vec![KeywordMatch {
            url: "https://example.com/one".to_string(),
            matched_keywords: vec!["tutoring".to_string()],
        }];
        writer.write(&matches).await.unwrap();

        matches.push(KeywordMatch {
            url: "https://example.com/two".to_string(),
            matched_keywords: vec!["counseling".to_string()],
        });
        writer.write(&matches).await.unwrap();

        let loaded = SnapshotWriter::load(&path).await.unwrap();
        assert_eq!(loaded, matches);
    }

    #[tokio::test]
    async fn test_snapshot_write_fails_on_missing_directory() {
        let writer = SnapshotWriter::new("/nonexistent/dir/relevant_links.json");
        let result = writer.write(&[]).await;
        assert!(matches!(result, Err(CrawlError::Snapshot(_))));
    }
}
