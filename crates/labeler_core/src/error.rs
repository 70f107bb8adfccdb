use std::path::PathBuf;

/// Errors surfaced by the labeling core.
#[derive(Debug, thiserror::Error)]
pub enum LabelerError {
    #[error("Path does not exist: {}", .0.display())]
    FolderMissing(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("label file could not be parsed: {0}")]
    Csv(#[from] csv::Error),

    /// A row in the label file did not hold exactly `filename,className`.
    #[error("malformed row {line} in {}", path.display())]
    MalformedRow { path: PathBuf, line: u64 },

    /// The flat file format has no escaping, so these values cannot be written.
    #[error("cannot store {value:?}: commas and line breaks are not representable")]
    Unrepresentable { value: String },

    #[error("class list is empty")]
    EmptyClassList,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("could not replace label file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl LabelerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LabelerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LabelerError> = std::result::Result<T, E>;
