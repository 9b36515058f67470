//! Sources of pre-formatted merge request lines appended to the digest.
//!
//! Merge requests from the second code-hosting provider are tracked
//! elsewhere and persisted as ready-to-print lines. The digest only reads
//! them; the JSON file store here is the local stand-in for that state.

use std::collections::BTreeMap;
use std::io::ErrorKind as IoErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::github::error::DigestError;

/// Key prefix identifying persisted merge request summaries.
pub const MERGE_REQUEST_KEY_PREFIX: &str = "gitlab_mr";

/// Supplies persisted summary lines for the final message.
#[cfg_attr(test, mockall::automock)]
pub trait PersistedSummarySource: Send + Sync {
    /// Lines to append after the pull request lines, in key order.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::Io` or `DigestError::MalformedRecord` when the
    /// backing state cannot be read.
    fn list_persisted_summary_lines(&self) -> Result<Vec<String>, DigestError>;
}

/// Source that never has anything to add.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistedSummaries;

impl PersistedSummarySource for NoPersistedSummaries {
    fn list_persisted_summary_lines(&self) -> Result<Vec<String>, DigestError> {
        Ok(Vec::new())
    }
}

/// JSON object file mapping keys to summary lines.
///
/// ```json
/// { "gitlab_mr_12": "infra\tcarol\tBump runners https://gitlab.example/mr/12" }
/// ```
///
/// Only keys starting with [`MERGE_REQUEST_KEY_PREFIX`] are returned. A
/// missing file yields no lines.
#[derive(Debug, Clone)]
pub struct JsonSummaryStore {
    path: Utf8PathBuf,
}

impl JsonSummaryStore {
    /// Creates a store reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_contents(&self) -> Result<Option<String>, DigestError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = self.path.file_name().ok_or_else(|| DigestError::Io {
            message: format!("invalid summary store path '{}': no file name", self.path),
        })?;

        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(error) if error.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(DigestError::Io {
                    message: format!("failed to open summary store directory '{parent}': {error}"),
                });
            }
        };

        match dir.read_to_string(file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == IoErrorKind::NotFound => Ok(None),
            Err(error) => Err(DigestError::Io {
                message: format!("failed to read summary store '{}': {error}", self.path),
            }),
        }
    }
}

impl PersistedSummarySource for JsonSummaryStore {
    fn list_persisted_summary_lines(&self) -> Result<Vec<String>, DigestError> {
        let Some(contents) = self.read_contents()? else {
            tracing::debug!(path = %self.path, "no summary store file");
            return Ok(Vec::new());
        };

        let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(&contents)
            .map_err(|error| DigestError::MalformedRecord {
                message: format!("summary store '{}' is not a JSON object: {error}", self.path),
            })?;

        Ok(entries
            .into_iter()
            .filter(|(key, _)| key.starts_with(MERGE_REQUEST_KEY_PREFIX))
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(line) => Some(line),
                other => {
                    tracing::warn!(%key, kind = %json_kind(&other), "skipping non-string summary entry");
                    None
                }
            })
            .collect())
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{JsonSummaryStore, NoPersistedSummaries, PersistedSummarySource};
    use crate::github::error::ErrorKind;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("temp dir should be created")
    }

    fn store_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join("merge_requests.json"))
            .expect("temp path should be UTF-8")
    }

    #[rstest]
    fn returns_merge_request_lines_in_key_order(temp_dir: TempDir) {
        let path = store_path(&temp_dir);
        std::fs::write(
            &path,
            r#"{
                "gitlab_mr_20": "second",
                "alias_alice": "not a merge request",
                "gitlab_mr_10": "first",
                "gitlab_mr_30": 42
            }"#,
        )
        .expect("store file should be written");

        let lines = JsonSummaryStore::new(path)
            .list_persisted_summary_lines()
            .expect("store should be readable");

        assert_eq!(lines, ["first", "second"]);
    }

    #[rstest]
    fn missing_file_yields_no_lines(temp_dir: TempDir) {
        let store = JsonSummaryStore::new(store_path(&temp_dir));
        assert_eq!(
            store.list_persisted_summary_lines().expect("should succeed"),
            Vec::<String>::new()
        );
    }

    #[rstest]
    fn missing_directory_yields_no_lines(temp_dir: TempDir) {
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("absent/store.json"))
            .expect("temp path should be UTF-8");
        let store = JsonSummaryStore::new(path);
        assert!(store.list_persisted_summary_lines().expect("should succeed").is_empty());
    }

    #[rstest]
    fn rejects_non_object_payload(temp_dir: TempDir) {
        let path = store_path(&temp_dir);
        std::fs::write(&path, "[1, 2, 3]").expect("store file should be written");

        let error = JsonSummaryStore::new(path)
            .list_persisted_summary_lines()
            .expect_err("payload should be rejected");

        assert_eq!(error.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn empty_source_has_no_lines() {
        assert!(
            NoPersistedSummaries
                .list_persisted_summary_lines()
                .expect("should succeed")
                .is_empty()
        );
    }
}
