//! Pagination math over an ordered file list.
//!
//! Every function here is pure: it reads the file list and the [`PageBudget`] and returns numbers or
//! ranges. The "global line stream" is never materialised; each file accounts for
//! `header_lines + content lines + separator_lines` (no separator after the last file) and offsets
//! are derived from those counts.

use crate::config::{ConfigError, PageBudget};
use crate::model::{ContentSections, PageRange, SourceFile};
use tracing::debug;

/// Pagination queries for one [`PageBudget`]. The default budget is always valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    budget: PageBudget,
}

impl Paginator {
    pub fn new(budget: PageBudget) -> Result<Self, ConfigError> {
        budget.validate()?;
        Ok(Self { budget })
    }

    pub fn budget(&self) -> &PageBudget {
        &self.budget
    }

    /// Separator rows following file `index` of `file_count`; zero after the last file.
    pub fn separator_lines_after(&self, index: usize, file_count: usize) -> usize {
        if index + 1 < file_count {
            self.budget.separator_lines
        } else {
            0
        }
    }

    /// Header + content + separator rows that file `index` occupies in the global stream.
    pub fn accounted_lines(&self, index: usize, file: &SourceFile, file_count: usize) -> usize {
        self.budget.header_lines + file.line_count() + self.separator_lines_after(index, file_count)
    }

    /// Length of the global line stream.
    pub fn total_lines(&self, files: &[SourceFile]) -> usize {
        files
            .iter()
            .enumerate()
            .map(|(i, f)| self.accounted_lines(i, f, files.len()))
            .sum()
    }

    /// `ceil(total_lines / lines_per_page)`, never less than one page.
    pub fn total_pages(&self, files: &[SourceFile]) -> usize {
        self.total_lines(files)
            .div_ceil(self.budget.lines_per_page)
            .max(1)
    }

    /// Partition every file's content lines into page-sized chunks.
    ///
    /// A chunk normally fills the rest of the current page. When that would leave a piece shorter
    /// than `min_lines_for_page_break` that does not finish the file, the piece is pushed to a fresh
    /// page instead, so only a file's final chunk can be shorter than the threshold.
    pub fn page_ranges(&self, files: &[SourceFile]) -> Vec<PageRange> {
        let mut cursor = PageCursor::default();
        let mut ranges = Vec::new();

        for (file_index, file) in files.iter().enumerate() {
            let total = file.line_count();
            let mut start_line = 0;
            while start_line < total {
                let chunk = cursor.place(total - start_line, &self.budget);
                ranges.push(PageRange {
                    file_index,
                    start_line,
                    end_line: start_line + chunk - 1,
                });
                start_line += chunk;
            }
        }

        debug!(ranges = ranges.len(), files = files.len(), "Computed page ranges");
        ranges
    }

    /// First / middle / last sampling windows over the global line stream.
    ///
    /// Each window is `target_pages * lines_per_page / 3` lines long, clamped into
    /// `[0, total_lines]`. Windows overlap when the stream is short.
    pub fn content_sections(&self, files: &[SourceFile]) -> ContentSections {
        let total_lines = self.total_lines(files);
        let section = self.section_size();

        let middle_start = (total_lines / 2).saturating_sub(section / 2);
        ContentSections {
            first_end: section.min(total_lines),
            middle_start,
            middle_end: total_lines.min(middle_start + section),
            last_start: total_lines.saturating_sub(section),
            total_lines,
        }
    }

    pub fn section_size(&self) -> usize {
        self.budget.target_pages * self.budget.lines_per_page / 3
    }

    /// Whether the full document should start a new page before a file that needs
    /// `incoming_lines` rows, given `current_page_lines` rows already used on the page.
    ///
    /// Only pages that are already more than `min_lines_for_page_break` full get broken.
    pub fn breaks_before_file(&self, current_page_lines: usize, incoming_lines: usize) -> bool {
        current_page_lines > self.budget.min_lines_for_page_break
            && current_page_lines + incoming_lines > self.budget.lines_per_page
    }
}

/// Rows consumed on the current page while chunking file content.
#[derive(Debug, Clone, Copy, Default)]
struct PageCursor {
    lines_on_page: usize,
}

impl PageCursor {
    /// Size of the next chunk for a file with `remaining` lines left; advances the cursor.
    fn place(&mut self, remaining: usize, budget: &PageBudget) -> usize {
        let per_page = budget.lines_per_page;
        let mut chunk = (per_page - self.lines_on_page).min(remaining);

        if self.lines_on_page > 0 && chunk < budget.min_lines_for_page_break && chunk < remaining {
            self.lines_on_page = 0;
            chunk = per_page.min(remaining);
        }

        self.lines_on_page = (self.lines_on_page + chunk) % per_page;
        chunk
    }
}
