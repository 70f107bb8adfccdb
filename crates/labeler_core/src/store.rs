//! Flat-file persistence for [`LabelMap`]: one `filename,className` row per
//! line, no header and no quoting.

use crate::error::{LabelerError, Result};
use crate::labels::LabelMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Reads and writes the label file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted mapping. A missing file yields an empty map; when a
    /// filename appears twice the first row wins.
    pub fn load(&self) -> Result<LabelMap> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no label file at {}", self.path.display());
                return Ok(LabelMap::new());
            }
            Err(e) => return Err(LabelerError::io(&self.path, e)),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        let mut map = LabelMap::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() != 2 {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(LabelerError::MalformedRow {
                    path: self.path.clone(),
                    line,
                });
            }
            map.insert_if_absent(&record[0], &record[1]);
        }
        tracing::debug!("loaded {} labels from {}", map.len(), self.path.display());
        Ok(map)
    }

    /// Merges `current` over the persisted rows and replaces the file.
    ///
    /// Keys only present on disk are appended after the keys of `current`;
    /// keys of `current` are never overridden. Returns the map as written.
    pub fn save(&self, current: &LabelMap) -> Result<LabelMap> {
        let mut merged = current.clone();
        for (file, class) in self.load()?.iter() {
            merged.insert_if_absent(file, class);
        }
        for (file, class) in merged.iter() {
            ensure_representable(file)?;
            ensure_representable(class)?;
        }

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| LabelerError::io(dir, e))?;
        {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .quote_style(csv::QuoteStyle::Never)
                .from_writer(tmp.as_file_mut());
            for (file, class) in merged.iter() {
                wtr.write_record([file, class])?;
            }
            wtr.flush().map_err(|e| LabelerError::io(&self.path, e))?;
        }
        tmp.as_file_mut()
            .sync_all()
            .map_err(|e| LabelerError::io(&self.path, e))?;
        tmp.persist(&self.path)?;

        tracing::info!("saved {} labels to {}", merged.len(), self.path.display());
        Ok(merged)
    }
}

/// True when `value` can be written as one field of a row.
pub(crate) fn is_representable(value: &str) -> bool {
    !value.contains([',', '\n', '\r'])
}

fn ensure_representable(value: &str) -> Result<()> {
    if !is_representable(value) {
        return Err(LabelerError::Unrepresentable {
            value: value.to_string(),
        });
    }
    Ok(())
}
