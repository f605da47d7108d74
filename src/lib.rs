//! Document upload core: validates picked files, tracks the selection and
//! drives a single multipart upload to the configured endpoint.

pub mod config;
pub mod error;
pub mod identity;
pub mod upload;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use config::Settings;
pub use error::{ScanError, SelectionError, WorkflowError};
pub use workflow::{UploadWorkflow, WorkflowEvent, WorkflowState};
