use crate::utils::file_size::FileSizeUtils;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the bytes of a file come from when the request body is built.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub size_bytes: u64,
    pub extension: String,
    pub source: FileSource,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, source: FileSource) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            size_bytes,
            extension,
            source,
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Ok(Self::new(
            name,
            metadata.len(),
            FileSource::Path(path.to_path_buf()),
        ))
    }

    pub fn in_memory(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        let bytes: Arc<[u8]> = bytes.into();
        Self::new(name, bytes.len() as u64, FileSource::Memory(bytes))
    }

    /// Two files are the same selection if both name and size match.
    pub fn same_file_as(&self, other: &CandidateFile) -> bool {
        self.name == other.name && self.size_bytes == other.size_bytes
    }
}

/// Lowercased text after the last `.`; a name without a dot yields the whole name.
pub fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

/// A file admitted into the selection.
#[derive(Debug, Clone)]
pub struct SelectionEntry(CandidateFile);

impl SelectionEntry {
    pub(crate) fn admit(file: CandidateFile) -> Self {
        Self(file)
    }

    pub fn file(&self) -> &CandidateFile {
        &self.0
    }

    pub fn into_file(self) -> CandidateFile {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedFormat,
    TooLarge { limit: u64 },
    Duplicate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnsupportedFormat => write!(f, "unsupported format"),
            RejectReason::TooLarge { limit } => {
                write!(f, "exceeds {}", FileSizeUtils::format_size(*limit))
            }
            RejectReason::Duplicate => write!(f, "already added"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rejection {
    pub file: CandidateFile,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub accepted: Vec<CandidateFile>,
    pub rejected: Vec<Rejection>,
}

impl ValidationOutcome {
    /// One line per rejected file, or `None` when the whole batch was accepted.
    pub fn error_message(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .rejected
            .iter()
            .map(|r| format!("\"{}\" - {}", r.file.name, r.reason))
            .collect();
        Some(format!("Some files were not added:\n{}", lines.join("\n")))
    }
}

/// Snapshot of the selection taken when an upload starts.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub id: u64,
    pub identity: String,
    pub files: Arc<[SelectionEntry]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Created,
    Forbidden,
    BadRequest,
    ServerError(String),
    NetworkError(String),
    ReadFailed { name: String, message: String },
}

impl UploadResult {
    pub fn is_created(&self) -> bool {
        matches!(self, UploadResult::Created)
    }

    /// Message shown to the user after a failed upload.
    pub fn user_message(&self) -> Option<String> {
        match self {
            UploadResult::Created => None,
            UploadResult::Forbidden => {
                Some("Access denied. Administrator privileges are required.".to_string())
            }
            UploadResult::BadRequest => Some("Missing X-User-ID header".to_string()),
            UploadResult::ServerError(message) => Some(message.clone()),
            UploadResult::NetworkError(_) => {
                Some("Upload failed. Check your internet connection.".to_string())
            }
            UploadResult::ReadFailed { name, message } => {
                Some(format!("Could not read \"{}\": {}", name, message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_suffix() {
        assert_eq!(extension_of("Report.Final.PDF"), "pdf");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("README"), "readme");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn rejection_message_lists_each_file() {
        let outcome = ValidationOutcome {
            accepted: Vec::new(),
            rejected: vec![
                Rejection {
                    file: CandidateFile::in_memory("b.exe", vec![0u8; 50]),
                    reason: RejectReason::UnsupportedFormat,
                },
                Rejection {
                    file: CandidateFile::in_memory("a.pdf", vec![0u8; 100]),
                    reason: RejectReason::Duplicate,
                },
            ],
        };
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("Some files were not added:\n\"b.exe\" - unsupported format\n\"a.pdf\" - already added")
        );
        assert!(ValidationOutcome::default().error_message().is_none());
    }

    #[test]
    fn too_large_mentions_the_limit() {
        let reason = RejectReason::TooLarge {
            limit: 2 * 1024 * 1024 * 1024,
        };
        assert_eq!(reason.to_string(), "exceeds 2 GB");
    }

    #[test]
    fn every_failure_has_a_user_message() {
        let cases = [
            (UploadResult::Created, None),
            (
                UploadResult::Forbidden,
                Some("Access denied. Administrator privileges are required."),
            ),
            (UploadResult::BadRequest, Some("Missing X-User-ID header")),
            (
                UploadResult::ServerError("Document store unavailable".into()),
                Some("Document store unavailable"),
            ),
            (
                UploadResult::NetworkError("connection refused".into()),
                Some("Upload failed. Check your internet connection."),
            ),
            (
                UploadResult::ReadFailed {
                    name: "a.pdf".into(),
                    message: "permission denied".into(),
                },
                Some("Could not read \"a.pdf\": permission denied"),
            ),
        ];
        for (result, expected) in cases {
            assert_eq!(result.user_message().as_deref(), expected, "{result:?}");
            assert_eq!(result.is_created(), expected.is_none());
        }
    }
}
