use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// Top-level run configuration: how to paginate, what to scan, where to write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pagination: PageBudget,
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            lines_per_page = self.pagination.lines_per_page,
            target_pages = self.pagination.target_pages,
            min_lines_for_page_break = self.pagination.min_lines_for_page_break,
            extensions = ?self.scan.extensions,
            output_dir = %self.output.dir.display(),
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pagination.validate()?;
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        Ok(())
    }
}

/// Page budget: fixed line counts that drive every pagination decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageBudget {
    pub lines_per_page: usize,
    pub target_pages: usize,
    /// Reserved; not consulted by the paginator.
    pub section_pages: usize,
    pub min_lines_for_page_break: usize,
    pub header_lines: usize,
    pub separator_lines: usize,
}

impl Default for PageBudget {
    fn default() -> Self {
        Self {
            lines_per_page: 70,
            target_pages: 75,
            section_pages: 26,
            min_lines_for_page_break: 45,
            header_lines: 2,
            separator_lines: 1,
        }
    }
}

impl PageBudget {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines_per_page == 0 {
            return Err(ConfigError::ZeroLinesPerPage);
        }
        if self.target_pages == 0 {
            return Err(ConfigError::ZeroTargetPages);
        }
        if self.min_lines_for_page_break > self.lines_per_page {
            return Err(ConfigError::BreakThresholdTooLarge {
                min_lines_for_page_break: self.min_lines_for_page_break,
                lines_per_page: self.lines_per_page,
            });
        }
        Ok(())
    }
}

/// Which files the scanner picks up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    pub skip_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            extensions: owned(&["cs", "dart"]),
            skip_dirs: owned(&[
                "node_modules",
                ".git",
                "vendor",
                "target",
                "__pycache__",
                ".next",
                "build",
                "dist",
                "bin",
                "obj",
                ".dart_tool",
                ".packages",
            ]),
            exclude_files: owned(&[
                "program.cs",
                "appsettings.json",
                "appsettings.local.json",
                "web.config",
                "app.config",
                "database.cs",
                "connectionstrings.cs",
                "secrets.cs",
                "apikeys.cs",
                "main.dart",
            ]),
            exclude_patterns: owned(&[
                "secret",
                "password",
                "apikey",
                "credential",
                "token",
                "passcode",
            ]),
        }
    }
}

/// Where and how documents are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Above this estimated page count an abbreviated document is produced as well.
    pub max_full_pages: usize,
    pub max_line_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("copyright_documents"),
            max_full_pages: 100,
            max_line_chars: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroLinesPerPage,
    ZeroTargetPages,
    BreakThresholdTooLarge {
        min_lines_for_page_break: usize,
        lines_per_page: usize,
    },
    NoExtensions,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroLinesPerPage => write!(f, "pagination.lines_per_page must be > 0"),
            ConfigError::ZeroTargetPages => write!(f, "pagination.target_pages must be > 0"),
            ConfigError::BreakThresholdTooLarge {
                min_lines_for_page_break,
                lines_per_page,
            } => write!(
                f,
                "pagination.min_lines_for_page_break ({min_lines_for_page_break}) must not exceed lines_per_page ({lines_per_page})"
            ),
            ConfigError::NoExtensions => write!(f, "scan.extensions must list at least one extension"),
        }
    }
}

impl std::error::Error for ConfigError {}
