use crate::error::ScanError;
use crate::upload::types::CandidateFile;
use ignore::{Walk, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Turns a folder into candidate files. Entries matched by `.gitignore` and
/// hidden files are skipped; everything else goes through validation as usual.
#[derive(Clone)]
pub struct FileProcessor {
    folder_path: PathBuf,
}

impl FileProcessor {
    pub fn new(folder_path: impl Into<PathBuf>) -> Self {
        Self {
            folder_path: folder_path.into(),
        }
    }

    fn walk(&self) -> Walk {
        WalkBuilder::new(&self.folder_path)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
    }

    pub fn collect_candidates(&self) -> Result<Vec<CandidateFile>, ScanError> {
        if !self.folder_path.is_dir() {
            return Err(ScanError::NotADirectory {
                path: self.folder_path.clone(),
            });
        }

        let mut candidates = Vec::new();
        for result in self.walk() {
            match result {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() {
                        candidates.push(candidate_from_file(path)?);
                    }
                }
                Err(e) => warn!("skipping entry in {}: {}", self.folder_path.display(), e),
            }
        }
        Ok(candidates)
    }
}

fn candidate_from_file(path: &Path) -> Result<CandidateFile, ScanError> {
    CandidateFile::from_path(path).map_err(|source| ScanError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

/// Candidates gathered from picked or dropped paths, plus the paths that could not be read.
#[derive(Debug, Default)]
pub struct PathScan {
    pub candidates: Vec<CandidateFile>,
    pub errors: Vec<ScanError>,
}

impl PathScan {
    /// One line per unreadable path, or `None` when every path was read.
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let lines: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        Some(format!("Some files could not be read:\n{}", lines.join("\n")))
    }
}

/// Builds one batch from picked or dropped paths, expanding directories in place.
/// A path that cannot be read is reported without dropping the rest of the batch.
pub fn candidates_from_paths<I, P>(paths: I) -> PathScan
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut scan = PathScan::default();
    for path in paths {
        let path = path.as_ref();
        let result = if path.is_dir() {
            FileProcessor::new(path).collect_candidates()
        } else {
            candidate_from_file(path).map(|c| vec![c])
        };
        match result {
            Ok(found) => scan.candidates.extend(found),
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                scan.errors.push(e);
            }
        }
    }
    scan
}
