//! The snapshot file: the raw records of the last published catalog, used
//! as a fallback when the server starts before upstream is reachable.

use super::models::RawRecord;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> SnapshotFile {
        SnapshotFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the records back. `Ok(None)` when the file does not exist.
    ///
    /// Items may be stored flat or wrapped as `{"data": {"question": {...}}}`.
    /// Items that are not objects are skipped.
    pub fn load(&self) -> Result<Option<Vec<RawRecord>>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read snapshot file {:?}", self.path))
            }
        };
        let root: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot file {:?}", self.path))?;
        let Value::Array(items) = root else {
            bail!("Snapshot file {:?} does not contain a JSON array", self.path);
        };

        let total = items.len();
        let mut records = Vec::with_capacity(total);
        for item in items {
            let item = unwrap_question(item);
            match serde_json::from_value::<RawRecord>(item) {
                Ok(record) => records.push(record),
                Err(err) => debug!("Skipping unreadable snapshot item: {}", err),
            }
        }
        if records.len() < total {
            warn!(
                "Skipped {} of {} items in snapshot file {:?}",
                total - records.len(),
                total,
                self.path
            );
        }
        Ok(Some(records))
    }

    /// Overwrites the file with `records`. The new content is written to a
    /// sibling temp file, synced, and renamed over the old one.
    pub fn save(&self, records: &[RawRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {:?}", dir))?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
        serde_json::to_writer(&mut tmp, records).context("Failed to serialize records")?;
        tmp.flush().context("Failed to flush snapshot file")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to sync snapshot file")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to persist snapshot file {:?}", self.path))?;
        Ok(())
    }
}

fn unwrap_question(item: Value) -> Value {
    match item {
        Value::Object(mut map) => {
            let is_wrapped = map
                .get("data")
                .and_then(|d| d.get("question"))
                .map(Value::is_object)
                .unwrap_or(false);
            if is_wrapped {
                if let Some(Value::Object(mut data)) = map.remove("data") {
                    if let Some(question) = data.remove("question") {
                        return question;
                    }
                }
                Value::Null
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}
