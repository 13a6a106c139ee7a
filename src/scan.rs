//! Directory walk that builds the ordered file list handed to the paginator.

use crate::config::ScanConfig;
use crate::model::SourceFile;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Debug)]
pub enum ScanError {
    Io { path: PathBuf, source: std::io::Error },
    NotADirectory(PathBuf),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            ScanError::NotADirectory(path) => write!(f, "not a directory: {}", path.display()),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io { source, .. } => Some(source),
            ScanError::NotADirectory(_) => None,
        }
    }
}

/// Files kept by a scan plus what was dropped along the way.
#[derive(Debug, Default, Serialize)]
pub struct ScanOutcome {
    /// Sorted by name (then by path, for files sharing a name).
    pub files: Vec<SourceFile>,
    pub excluded: Vec<String>,
    pub skipped_empty: Vec<String>,
    /// Matching files that could not be read; logged and left out of the listing.
    pub unreadable: Vec<String>,
}

pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Walk `root`, keeping files with a configured extension that `is_excluded` does not reject.
    pub fn scan<F>(&self, root: &Path, is_excluded: F) -> Result<ScanOutcome, ScanError>
    where
        F: Fn(&str) -> bool,
    {
        info!(root = %root.display(), extensions = ?self.config.extensions, "Scanning source directory");
        if !root.is_dir() {
            error!(root = %root.display(), "Scan root is not a directory");
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut found: Vec<(PathBuf, SourceFile)> = Vec::new();
        let mut outcome = ScanOutcome::default();
        self.visit_dir(root, &is_excluded, &mut found, &mut outcome)?;

        found.sort_by(|(pa, a), (pb, b)| a.name.cmp(&b.name).then_with(|| pa.cmp(pb)));
        outcome.files = found.into_iter().map(|(_, f)| f).collect();

        info!(
            included = outcome.files.len(),
            excluded = outcome.excluded.len(),
            skipped_empty = outcome.skipped_empty.len(),
            unreadable = outcome.unreadable.len(),
            "Scan complete"
        );
        Ok(outcome)
    }

    fn visit_dir(
        &self,
        dir: &Path,
        is_excluded: &dyn Fn(&str) -> bool,
        found: &mut Vec<(PathBuf, SourceFile)>,
        outcome: &mut ScanOutcome,
    ) -> Result<(), ScanError> {
        let io_err = |source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        };
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let file_type = entry.file_type().map_err(io_err)?;
            let path = entry.path();
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            // Symlinked directories are never followed; symlinked files are read through.
            if file_type.is_dir() {
                if self.config.skip_dirs.iter().any(|d| *d == file_name) {
                    debug!(path = %path.display(), "Skipping directory");
                    continue;
                }
                self.visit_dir(&path, is_excluded, found, outcome)?;
                continue;
            }
            if file_type.is_symlink() && path.is_dir() {
                debug!(path = %path.display(), "Not following directory symlink");
                continue;
            }
            if !file_type.is_file() && !file_type.is_symlink() {
                continue;
            }

            let Some(extension) = self.matching_extension(&path) else {
                continue;
            };
            if is_excluded(&file_name) {
                info!(file = %file_name, "Excluded (sensitive file)");
                outcome.excluded.push(file_name);
                continue;
            }

            let lines = match read_lines(&path) {
                Ok(lines) => lines,
                Err(e) => {
                    error!(file = %file_name, error = %e, "Skipping unreadable source file");
                    outcome.unreadable.push(file_name);
                    continue;
                }
            };
            if lines.is_empty() {
                info!(file = %file_name, "Skipped empty file");
                outcome.skipped_empty.push(file_name);
                continue;
            }
            debug!(file = %file_name, lines = lines.len(), "Added source file");
            found.push((path, SourceFile::new(file_name, extension, lines)));
        }
        Ok(())
    }

    fn matching_extension(&self, path: &Path) -> Option<String> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        self.config
            .extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&extension))
            .then_some(extension)
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, ScanError> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_owned)
        .collect())
}
