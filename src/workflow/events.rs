//! What the workflow tells its presenter.

use crate::upload::UploadSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Selecting,
    Uploading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    SelectionChanged { count: usize },
    StateChanged(WorkflowState),
    ErrorRaised(String),
    ErrorCleared,
    UploadStarted { files: usize },
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptySelection,
    Busy(WorkflowState),
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The caller must run the upload and report back through `on_upload_finished`.
    Started(UploadSession),
    Ignored(IgnoreReason),
}

