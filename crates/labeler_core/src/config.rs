use crate::error::{LabelerError, Result};
use crate::labels::ClassList;
use crate::scan::ScanOptions;
use crate::session::SessionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the label file when none is configured; it lives in the folder.
pub const DEFAULT_LABELS_FILE: &str = "Classification.csv";

/// Everything a labeling run needs, usually read from `labeler.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    pub folder: PathBuf,
    /// Defaults to `<folder>/Classification.csv`.
    pub labels_file: Option<PathBuf>,
    pub classes: Vec<String>,
    pub grayscale: bool,
    pub poll_interval_ms: u64,
    pub images_only: bool,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("test_folder"),
            labels_file: None,
            classes: vec!["Class1".into(), "Class2".into(), "Class3".into()],
            grayscale: false,
            poll_interval_ms: 20,
            images_only: false,
        }
    }
}

impl LabelerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| LabelerError::io(path, e))?;
        let cfg = Self::from_toml_str(&raw)?;
        tracing::debug!("configuration loaded from {}", path.display());
        Ok(cfg)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.labels_file
            .clone()
            .unwrap_or_else(|| self.folder.join(DEFAULT_LABELS_FILE))
    }

    pub fn class_list(&self) -> Result<ClassList> {
        ClassList::new(self.classes.iter().cloned())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            grayscale: self.grayscale,
            // A zero wait would spin the loop.
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            images_only: self.images_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn defaults_match_the_test_folder_layout() {
        let cfg = LabelerConfig::default();
        assert_eq!(
            cfg.labels_path(),
            PathBuf::from("test_folder").join("Classification.csv")
        );
        assert_eq!(cfg.class_list().unwrap().len(), 3);
        assert_eq!(cfg.session_options(), SessionOptions::default());
        assert_eq!(cfg.scan_options(), ScanOptions::default());
        assert!(!cfg.scan_options().images_only);
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<()> {
        let cfg = LabelerConfig::from_toml_str(
            r#"
            folder = "photos"
            classes = ["Cat", "Dog"]
            grayscale = true
            "#,
        )?;
        assert_eq!(cfg.folder, PathBuf::from("photos"));
        assert_eq!(cfg.classes, vec!["Cat", "Dog"]);
        assert!(cfg.grayscale);
        assert_eq!(cfg.poll_interval_ms, 20);
        assert_eq!(cfg.labels_path(), PathBuf::from("photos/Classification.csv"));
        Ok(())
    }

    #[test]
    fn explicit_labels_file_wins() -> Result<()> {
        let cfg = LabelerConfig::from_toml_str(r#"labels_file = "/tmp/out.csv""#)?;
        assert_eq!(cfg.labels_path(), PathBuf::from("/tmp/out.csv"));
        Ok(())
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = LabelerConfig::from_toml_str("poll_interval_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, LabelerError::Config(_)));
    }

    #[test]
    fn empty_class_list_surfaces_error() {
        let cfg = LabelerConfig {
            classes: vec![],
            ..Default::default()
        };
        assert!(cfg.class_list().is_err());
    }
}
