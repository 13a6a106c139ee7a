//! # render: the seam between the assembler and a concrete document format
//!
//! The assembler only ever asks for four things: a file header, a range of a file's content lines,
//! a file separator and a hard page break. Implement [`DocumentSink`] to target a new format; the
//! PDF implementation lives in [`crate::code_to_pdf`].
//!
//! The trait is annotated for `mockall` so tests can assert the exact call sequence a plan produces.

use crate::model::SourceFile;
use std::fmt;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    /// Nothing was rendered, so there is no document to write.
    EmptyInput,
    Font(&'static str),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "I/O error while writing document: {e}"),
            RenderError::EmptyInput => write!(f, "document has no content"),
            RenderError::Font(desc) => write!(f, "font error: {desc}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Row-by-row page accounting shared by renderers and page-count estimates.
///
/// A page is opened lazily by the first row written to it, so a trailing page break never produces
/// a blank page.
#[derive(Debug, Clone, Copy)]
pub struct PageFlow {
    per_page: usize,
    lines_on_page: usize,
    pages: usize,
    break_pending: bool,
}

impl PageFlow {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            lines_on_page: 0,
            pages: 0,
            break_pending: false,
        }
    }

    /// Account for one row. Returns `true` when the row opens a new page.
    pub fn advance_row(&mut self) -> bool {
        let opens_page =
            self.pages == 0 || self.break_pending || self.lines_on_page == self.per_page;
        if opens_page {
            self.pages += 1;
            self.lines_on_page = 0;
            self.break_pending = false;
        }
        self.lines_on_page += 1;
        opens_page
    }

    pub fn page_break(&mut self) {
        if self.lines_on_page > 0 {
            self.break_pending = true;
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Row index (0-based) of the most recently written row on its page.
    pub fn row_on_page(&self) -> usize {
        self.lines_on_page.saturating_sub(1)
    }
}

/// Receiver of assembled document blocks, in order.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait DocumentSink {
    /// Title row for `file` followed by blank rows up to the configured header height.
    /// `number` is the 1-based position of the file in the file list.
    fn file_header(&mut self, file: &SourceFile, number: usize) -> Result<(), RenderError>;

    /// Content lines `start..=end` of `file` (0-based, inclusive).
    fn content_lines(
        &mut self,
        file: &SourceFile,
        start: usize,
        end: usize,
    ) -> Result<(), RenderError>;

    fn separator(&mut self) -> Result<(), RenderError>;

    /// Start a new page unless the current one is still empty.
    fn page_break(&mut self) -> Result<(), RenderError>;
}
