//! Document assembly: turns paginator answers into an ordered list of [`Block`]s and replays them
//! into a [`DocumentSink`].
//!
//! Two plans are built here:
//! - [`full_document_plan`]: every file in order, with a page break before a file that would not
//!   fit on an already well-filled page (see [`Paginator::breaks_before_file`]).
//! - [`abbreviated_plan`]: the first / middle / last content windows, merged so no line is
//!   rendered twice, with a page break between disjoint windows.
//!
//! Both are plain data, so the same plan feeds page-count statistics and the renderer.

use crate::model::{PageRange, SourceFile};
use crate::paginator::Paginator;
use crate::render::{DocumentSink, PageFlow, RenderError};
use serde::Serialize;
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, info};

/// One rendering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Block {
    PageBreak,
    Header { file_index: usize },
    Content(PageRange),
    Separator { file_index: usize },
}

/// Running offset into the global line stream while walking the file list.
#[derive(Debug, Clone, Copy, Default)]
struct GlobalCursor {
    next_line: usize,
}

impl GlobalCursor {
    /// Claim `span` lines for the next file; returns the file's first global line.
    fn claim(&mut self, span: usize) -> usize {
        let start = self.next_line;
        self.next_line += span;
        start
    }
}

/// Map the global interval `window` (half-open) back onto per-file header, content and separator
/// blocks, in file order.
///
/// A header is emitted when the window starts no later than the file's first content line; a
/// separator when the window reaches the separator rows and the file is not the last one. An
/// empty or inverted window yields no blocks.
pub fn map_global_range(
    paginator: &Paginator,
    files: &[SourceFile],
    window: Range<usize>,
) -> Vec<Block> {
    let mut blocks = Vec::new();
    if window.start >= window.end {
        return blocks;
    }
    let (global_start, global_end) = (window.start, window.end - 1);
    let header_lines = paginator.budget().header_lines;
    let mut cursor = GlobalCursor::default();

    for (file_index, file) in files.iter().enumerate() {
        let span = paginator.accounted_lines(file_index, file, files.len());
        let file_start = cursor.claim(span);
        if span == 0 {
            continue;
        }
        let file_end = file_start + span - 1;
        if file_end < global_start || file_start > global_end {
            continue;
        }

        let content_base = file_start + header_lines;
        if global_start <= content_base {
            blocks.push(Block::Header { file_index });
        }

        if file.line_count() > 0 && global_end >= content_base {
            let start_line = global_start.saturating_sub(content_base);
            let end_line = (global_end - content_base).min(file.line_count() - 1);
            if start_line <= end_line {
                blocks.push(Block::Content(PageRange {
                    file_index,
                    start_line,
                    end_line,
                }));
            }
        }

        let separator_lines = paginator.separator_lines_after(file_index, files.len());
        if separator_lines > 0 && global_end + separator_lines > file_end {
            blocks.push(Block::Separator { file_index });
        }
    }

    debug!(
        global_start,
        global_end,
        blocks = blocks.len(),
        "Mapped global range onto files"
    );
    blocks
}

/// Every file, in order, with greedy page breaks between files.
pub fn full_document_plan(paginator: &Paginator, files: &[SourceFile]) -> Vec<Block> {
    let per_page = paginator.budget().lines_per_page;
    let mut blocks = Vec::new();
    let mut lines_on_page = 0;

    for (file_index, file) in files.iter().enumerate() {
        let needed = paginator.accounted_lines(file_index, file, files.len());

        if paginator.breaks_before_file(lines_on_page, needed) {
            debug!(file = %file.name, lines_on_page, "Smart page break before file");
            blocks.push(Block::PageBreak);
            lines_on_page = 0;
        }

        blocks.push(Block::Header { file_index });
        if file.line_count() > 0 {
            blocks.push(Block::Content(PageRange {
                file_index,
                start_line: 0,
                end_line: file.line_count() - 1,
            }));
        }
        if paginator.separator_lines_after(file_index, files.len()) > 0 {
            blocks.push(Block::Separator { file_index });
        }

        lines_on_page = (lines_on_page + needed) % per_page;
    }

    blocks
}

/// First, middle and last windows of the global stream, merged and separated by page breaks.
pub fn abbreviated_plan(paginator: &Paginator, files: &[SourceFile]) -> Vec<Block> {
    let sections = paginator.content_sections(files);
    let windows = sections.merged();
    info!(
        total_lines = sections.total_lines,
        first_end = sections.first_end,
        middle_start = sections.middle_start,
        middle_end = sections.middle_end,
        last_start = sections.last_start,
        merged_windows = windows.len(),
        "Abbreviated document sections"
    );

    let mut blocks = Vec::new();
    let mut headers_seen = HashSet::new();
    let mut separators_seen = HashSet::new();

    for (n, window) in windows.into_iter().enumerate() {
        if n > 0 {
            blocks.push(Block::PageBreak);
        }
        for block in map_global_range(paginator, files, window) {
            let fresh = match block {
                Block::Header { file_index } => headers_seen.insert(file_index),
                Block::Separator { file_index } => separators_seen.insert(file_index),
                _ => true,
            };
            if fresh {
                blocks.push(block);
            }
        }
    }

    blocks
}

/// Rows a block occupies on the page.
pub fn block_rows(paginator: &Paginator, files: &[SourceFile], block: &Block) -> usize {
    match block {
        Block::PageBreak => 0,
        Block::Header { .. } => paginator.budget().header_lines,
        Block::Content(range) => range.line_count(),
        Block::Separator { file_index } => {
            paginator.separator_lines_after(*file_index, files.len())
        }
    }
}

/// Pages a plan fills when rendered with `lines_per_page` rows per page.
pub fn rendered_pages(paginator: &Paginator, files: &[SourceFile], blocks: &[Block]) -> usize {
    let mut flow = PageFlow::new(paginator.budget().lines_per_page);
    for block in blocks {
        if let Block::PageBreak = block {
            flow.page_break();
            continue;
        }
        for _ in 0..block_rows(paginator, files, block) {
            flow.advance_row();
        }
    }
    flow.pages()
}

/// Feed a plan into a sink, in order.
pub fn replay<S: DocumentSink + ?Sized>(
    files: &[SourceFile],
    blocks: &[Block],
    sink: &mut S,
) -> Result<(), RenderError> {
    for block in blocks {
        match *block {
            Block::PageBreak => sink.page_break()?,
            Block::Header { file_index } => {
                sink.file_header(&files[file_index], file_index + 1)?
            }
            Block::Content(range) => {
                sink.content_lines(&files[range.file_index], range.start_line, range.end_line)?
            }
            Block::Separator { .. } => sink.separator()?,
        }
    }
    Ok(())
}
