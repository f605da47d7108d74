mod client;
mod file_processor;
mod selection;
mod types;
pub mod validator;

pub use client::{interpret_response, UploadClient, Uploader, FILES_FIELD, IDENTITY_HEADER};
pub use file_processor::{candidates_from_paths, FileProcessor, PathScan};
pub use selection::{SelectionChange, SelectionStore};
pub use types::{
    extension_of, CandidateFile, FileSource, RejectReason, Rejection, SelectionEntry,
    UploadResult, UploadSession, ValidationOutcome,
};
pub use validator::FileValidator;
