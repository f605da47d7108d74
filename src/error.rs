use crate::workflow::WorkflowState;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("index {index} is out of range for a selection of {len} file(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Could not determine the user ID. Open the uploader from the host application.")]
    MissingIdentity,
    #[error("Files can only be added or removed before an upload starts (current state: {0:?})")]
    NotSelecting(WorkflowState),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("failed to read metadata for {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
