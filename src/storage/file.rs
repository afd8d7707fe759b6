use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::KeyValueStore;

/// Store backed by a flat JSON object file
///
/// The whole file is read on open and replaced on every `set`. Writes go to a
/// temporary file in the same directory which is then renamed over the store,
/// so the file on disk is always either the old or the new content. A missing
/// or unparsable file opens as an empty store; the next write replaces it.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing values if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = if path.exists() {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store {:?}", path))?;
            match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(err) => {
                    log::warn!("store {:?} is corrupt, starting empty: {}", path, err);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &self.values)
                .context("Failed to serialize store")?;
            writer.flush().context("Failed to write store")?;
        }
        tmp.as_file().sync_all().context("Failed to sync store")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace store {:?}", self.path))?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);

        if let Err(err) = self.flush() {
            log::warn!("could not persist {:?}: {:#}", key, err);
        }
    }
}
