//! File-name exclusion policy applied by the scanner before a file is read.
//!
//! Matching is case-insensitive and purely name based: exact names, substrings, and the suffixes of
//! generated Dart sources.

use crate::config::ScanConfig;
use std::collections::BTreeSet;

const GENERATED_SUFFIXES: &[&str] = &[
    ".g.dart",
    ".freezed.dart",
    ".gr.dart",
    ".config.dart",
    ".part.dart",
];

#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    exact: BTreeSet<String>,
    patterns: Vec<String>,
}

impl ExclusionFilter {
    pub fn from_config(config: &ScanConfig) -> Self {
        let mut filter = Self::default();
        for name in &config.exclude_files {
            filter.add_file(name);
        }
        for pattern in &config.exclude_patterns {
            filter.add_pattern(pattern);
        }
        filter
    }

    pub fn add_file(&mut self, name: &str) {
        self.exact.insert(name.to_lowercase());
    }

    pub fn add_pattern(&mut self, pattern: &str) {
        let pattern = pattern.to_lowercase();
        if !pattern.is_empty() && !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        self.exact.contains(&name)
            || self.patterns.iter().any(|p| name.contains(p.as_str()))
            || GENERATED_SUFFIXES.iter().any(|s| name.ends_with(s))
    }

    pub fn exact_count(&self) -> usize {
        self.exact.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Human-readable listing of every rule, one per line.
    pub fn describe(&self) -> Vec<String> {
        let exact = self.exact.iter().map(|n| format!("file: {n}"));
        let patterns = self.patterns.iter().map(|p| format!("pattern: *{p}*"));
        let generated = GENERATED_SUFFIXES
            .iter()
            .map(|s| format!("generated: *{s}"));
        exact.chain(patterns).chain(generated).collect()
    }
}
