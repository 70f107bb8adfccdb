//! Core of the manual image labeler: the classification loop, the label
//! file and the folder scan it works from.

pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod labels;
pub mod scan;
pub mod session;
pub mod store;

pub use config::{DEFAULT_LABELS_FILE, LabelerConfig};
pub use display::{DisplayError, ImageDisplay};
pub use error::{LabelerError, Result};
pub use input::InputEvent;
pub use labels::{ClassList, LabelMap, MAX_SELECTABLE_CLASSES};
pub use scan::{ScanOptions, WorkQueue, list_files};
pub use session::{
    Session, SessionExit, SessionOptions, SessionOutcome, Step, classify, classify_folder,
};
pub use store::LabelStore;
