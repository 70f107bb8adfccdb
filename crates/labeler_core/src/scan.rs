use crate::error::{LabelerError, Result};
use crate::labels::LabelMap;
use crate::store::is_representable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options controlling which folder entries are offered for labeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// When true, only files with a known image extension are listed.
    pub images_only: bool,
}

/// Lists the regular files directly inside `path`, in enumeration order.
pub fn list_files(path: impl AsRef<Path>, opts: ScanOptions) -> Result<Vec<String>> {
    let root = path.as_ref();
    if !root.exists() {
        return Err(LabelerError::FolderMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(LabelerError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            LabelerError::io(root, io)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if opts.images_only && !is_supported_image(path) {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if is_representable(name) => files.push(name.to_string()),
            Some(name) => tracing::warn!(
                "skipping {name:?}: commas and line breaks cannot be stored in the label file"
            ),
            None => tracing::warn!("skipping non UTF-8 file name: {}", path.display()),
        }
    }
    Ok(files)
}

fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            matches!(
                ext.as_str(),
                "jpg" | "jpeg" | "png" | "bmp" | "gif" | "webp" | "tif" | "tiff"
            )
        }
        None => false,
    }
}

/// Filenames still waiting for a label in the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkQueue {
    folder: PathBuf,
    files: Vec<String>,
}

impl WorkQueue {
    /// Keeps the files of `files` that have no entry in `prior`.
    pub fn new(folder: impl Into<PathBuf>, files: Vec<String>, prior: &LabelMap) -> Self {
        let files = files.into_iter().filter(|f| !prior.contains(f)).collect();
        Self {
            folder: folder.into(),
            files,
        }
    }

    /// Lists `folder` and drops files already labeled in `prior`.
    ///
    /// `exclude` names a file that must never be queued even if it lives in
    /// the folder, typically the label file itself.
    pub fn from_folder(
        folder: impl AsRef<Path>,
        opts: ScanOptions,
        prior: &LabelMap,
        exclude: Option<&Path>,
    ) -> Result<Self> {
        let folder = folder.as_ref();
        let mut files = list_files(folder, opts)?;
        if let Some(exclude) = exclude.and_then(|p| p.canonicalize().ok()) {
            files.retain(|f| folder.join(f).canonicalize().ok().as_deref() != Some(&*exclude));
        }
        let queue = Self::new(folder, files, prior);
        tracing::info!(
            "{} files pending in {}, {} already labeled",
            queue.len(),
            folder.display(),
            prior.len()
        );
        Ok(queue)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.files.get(idx).map(String::as_str)
    }

    pub fn path_of(&self, idx: usize) -> Option<PathBuf> {
        self.get(idx).map(|f| self.folder.join(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn list_files_missing_folder_is_fatal() {
        let err = list_files("definitely/not/here", ScanOptions::default()).unwrap_err();
        assert!(matches!(err, LabelerError::FolderMissing(_)));
    }

    #[test]
    fn list_files_rejects_plain_file() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("a.jpg");
        File::create(&file)?;
        let err = list_files(&file, ScanOptions::default()).unwrap_err();
        assert!(matches!(err, LabelerError::NotADirectory(_)));
        Ok(())
    }

    #[test]
    fn list_files_filters_images_and_skips_nested() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.JPG"))?;
        File::create(dir.path().join("b.png"))?;
        File::create(dir.path().join("notes.txt"))?;
        let nested = dir.path().join("nested");
        fs::create_dir(&nested)?;
        File::create(nested.join("c.jpg"))?;

        let mut images = list_files(dir.path(), ScanOptions { images_only: true })?;
        images.sort();
        assert_eq!(images, vec!["a.JPG", "b.png"]);

        let mut all = list_files(dir.path(), ScanOptions::default())?;
        all.sort();
        assert_eq!(all, vec!["a.JPG", "b.png", "notes.txt"]);
        Ok(())
    }

    #[test]
    fn list_files_skips_names_the_label_file_cannot_hold() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.jpg"))?;
        File::create(dir.path().join("x,y.jpg"))?;

        let files = list_files(dir.path(), ScanOptions::default())?;
        assert_eq!(files, vec!["a.jpg"]);
        Ok(())
    }

    #[test]
    fn work_queue_skips_labeled_files() {
        let prior: LabelMap = [("b.jpg", "Cat")].into_iter().collect();
        let files = vec!["a.jpg".to_string(), "b.jpg".to_string(), "c.jpg".to_string()];
        let queue = WorkQueue::new("imgs", files, &prior);
        assert_eq!(queue.files(), ["a.jpg", "c.jpg"]);
        assert_eq!(queue.path_of(1), Some(PathBuf::from("imgs").join("c.jpg")));
        assert_eq!(queue.get(2), None);
    }

    #[test]
    fn from_folder_never_queues_the_label_file() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.jpg"))?;
        let labels = dir.path().join("Classification.csv");
        fs::write(&labels, "")?;

        let queue = WorkQueue::from_folder(
            dir.path(),
            ScanOptions::default(),
            &LabelMap::new(),
            Some(&labels),
        )?;
        assert_eq!(queue.files(), ["a.jpg"]);
        Ok(())
    }
}
