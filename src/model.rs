//! Plain data records shared by the scanner, the paginator and the document assembler.
//!
//! Everything here is immutable once built: the scanner creates each [`SourceFile`] exactly once and
//! the rest of the pipeline only borrows the resulting file list.

use serde::Serialize;
use std::ops::Range;

/// One scanned source file: its base name, lowercase extension (without the dot) and text lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub name: String,
    pub extension: String,
    pub lines: Vec<String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, extension: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            lines,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Title row shown above the file's content, e.g. `Parser.cs (CS, 120 lines)`.
    pub fn header_title(&self) -> String {
        format!(
            "{} ({}, {} lines)",
            self.name,
            self.extension.to_uppercase(),
            self.lines.len()
        )
    }
}

/// A contiguous, inclusive span of content lines local to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub file_index: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl PageRange {
    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }
}

/// The three sampling windows of the abbreviated document, as offsets into the global line stream.
///
/// first = `[0, first_end)`, middle = `[middle_start, middle_end)`, last = `[last_start, total_lines)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentSections {
    pub first_end: usize,
    pub middle_start: usize,
    pub middle_end: usize,
    pub last_start: usize,
    pub total_lines: usize,
}

impl ContentSections {
    pub fn windows(&self) -> [Range<usize>; 3] {
        [
            0..self.first_end,
            self.middle_start..self.middle_end,
            self.last_start..self.total_lines,
        ]
    }

    /// The windows sorted and merged so that no global line is covered twice.
    /// Empty windows are dropped; touching windows are joined.
    pub fn merged(&self) -> Vec<Range<usize>> {
        let mut windows: Vec<Range<usize>> = self
            .windows()
            .into_iter()
            .filter(|w| w.start < w.end)
            .collect();
        windows.sort_by_key(|w| w.start);

        windows.into_iter().fold(Vec::new(), |mut merged, window| {
            match merged.last_mut() {
                Some(last) if window.start <= last.end => {
                    last.end = last.end.max(window.end);
                }
                _ => merged.push(window),
            }
            merged
        })
    }

    /// Number of global lines the merged windows cover.
    pub fn covered_lines(&self) -> usize {
        self.merged().iter().map(|w| w.end - w.start).sum()
    }
}
