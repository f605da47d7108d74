use crate::upload::types::{CandidateFile, RejectReason, Rejection, SelectionEntry, ValidationOutcome};
use std::collections::BTreeSet;
use tracing::debug;

pub const DEFAULT_EXTENSIONS: [&str; 4] = ["pdf", "docx", "xlsx", "pptx"];
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Decides which candidates may join the selection. Holds no state besides its rules.
#[derive(Debug, Clone)]
pub struct FileValidator {
    allowed_extensions: BTreeSet<String>,
    max_size_bytes: u64,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS, DEFAULT_MAX_SIZE_BYTES)
    }
}

impl FileValidator {
    pub fn new<I, S>(allowed_extensions: I, max_size_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| !ext.is_empty())
                .collect(),
            max_size_bytes,
        }
    }

    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Checks a single file in isolation: format first, then size.
    pub fn check(&self, file: &CandidateFile) -> Option<RejectReason> {
        if !self
            .allowed_extensions
            .contains(&file.extension.to_lowercase())
        {
            return Some(RejectReason::UnsupportedFormat);
        }
        if file.size_bytes > self.max_size_bytes {
            return Some(RejectReason::TooLarge {
                limit: self.max_size_bytes,
            });
        }
        None
    }

    /// Partitions `batch` into accepted and rejected files, keeping batch order in both.
    /// Duplicates are detected against `existing` and against files accepted earlier
    /// in the same batch.
    pub fn validate(
        &self,
        batch: impl IntoIterator<Item = CandidateFile>,
        existing: &[SelectionEntry],
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();

        for file in batch {
            let reason = self.check(&file).or_else(|| {
                let duplicate = existing.iter().any(|e| e.file().same_file_as(&file))
                    || outcome.accepted.iter().any(|a| a.same_file_as(&file));
                duplicate.then_some(RejectReason::Duplicate)
            });

            match reason {
                Some(reason) => outcome.rejected.push(Rejection { file, reason }),
                None => outcome.accepted.push(file),
            }
        }

        debug!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            "validated file batch"
        );
        outcome
    }
}

pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
