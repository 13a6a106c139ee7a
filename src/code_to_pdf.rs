//! PDF rendering of assembled source listings (A4, monospaced builtin fonts).
//!
//! [`PdfSink`] implements [`DocumentSink`]: every header, content, separator and blank row takes
//! exactly one text row, and each page holds exactly `lines_per_page` rows, so the page count of
//! the produced PDF matches [`crate::assemble::rendered_pages`] for the same plan.

use crate::assemble::{full_document_plan, replay};
use crate::config::PageBudget;
use crate::model::SourceFile;
use crate::paginator::Paginator;
use crate::render::{DocumentSink, PageFlow, RenderError};
use printpdf::{
    BuiltinFont, Color, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, Rgb, TextItem,
};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info, warn};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_X_MM: f32 = 15.0;
const MARGIN_Y_MM: f32 = 12.0;
const MAX_FONT_PT: f32 = 9.0;
const MIN_FONT_PT: f32 = 3.0;
const SEPARATOR_WIDTH: usize = 60;
const TAB: &str = "    ";

#[derive(Debug, Clone, Copy)]
enum Tone {
    Text,
    Gutter,
    Title,
    Rule,
}

impl Tone {
    fn color(self) -> Color {
        let (r, g, b) = match self {
            Tone::Text => (0.0, 0.0, 0.0),
            Tone::Gutter => (0.5, 0.5, 0.5),
            Tone::Title => (0.0, 0.2, 0.8),
            Tone::Rule => (0.75, 0.75, 0.75),
        };
        Color::Rgb(Rgb {
            r,
            g,
            b,
            icc_profile: None,
        })
    }

    fn font(self) -> BuiltinFont {
        match self {
            Tone::Title => BuiltinFont::CourierBold,
            _ => BuiltinFont::Courier,
        }
    }
}

/// Accumulates rows into fixed-height A4 pages and writes the PDF on [`PdfSink::save`].
pub struct PdfSink {
    title: String,
    budget: PageBudget,
    max_line_chars: usize,
    font_size: Pt,
    line_height: Pt,
    flow: PageFlow,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
}

impl PdfSink {
    pub fn new(
        title: impl Into<String>,
        budget: PageBudget,
        max_line_chars: usize,
    ) -> Result<Self, RenderError> {
        let usable_mm = PAGE_HEIGHT_MM - 2.0 * MARGIN_Y_MM;
        let line_height: Pt = Mm(usable_mm / budget.lines_per_page.max(1) as f32).into();
        let font_size = (line_height.0 * 0.82).min(MAX_FONT_PT);
        if font_size < MIN_FONT_PT {
            error!(
                lines_per_page = budget.lines_per_page,
                font_size, "Too many lines per page for a readable A4 listing"
            );
            return Err(RenderError::Font("lines_per_page too large for an A4 page"));
        }

        Ok(Self {
            title: title.into(),
            budget,
            max_line_chars,
            font_size: Pt(font_size),
            line_height,
            flow: PageFlow::new(budget.lines_per_page),
            pages: Vec::new(),
            ops: Vec::new(),
        })
    }

    /// Pages started so far.
    pub fn page_count(&self) -> usize {
        self.flow.pages()
    }

    /// Serialise the document into PDF bytes.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, RenderError> {
        self.close_page();
        if self.pages.is_empty() {
            return Err(RenderError::EmptyInput);
        }

        let page_count = self.pages.len();
        let mut warnings = Vec::new();
        let mut doc = PdfDocument::new(&self.title);
        let bytes = doc
            .with_pages(self.pages)
            .save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF serialisation produced warnings");
        }
        debug!(pages = page_count, size = bytes.len(), "Serialised PDF");
        Ok(bytes)
    }

    /// Write the document to `path`, returning the number of pages.
    ///
    /// Bytes go to a temporary file next to `path` which is only renamed into place once fully
    /// written.
    pub fn save(self, path: &Path) -> Result<usize, RenderError> {
        let pages = self.page_count();
        let bytes = self.into_bytes()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            error!(error = ?e, dir = %dir.display(), "Failed to create temp file for PDF output");
            RenderError::Io(e)
        })?;
        tmp.write_all(&bytes)?;
        tmp.persist(path).map_err(|e| {
            error!(error = ?e.error, path = %path.display(), "Failed to move PDF into place");
            RenderError::Io(e.error)
        })?;

        info!(path = %path.display(), pages, size = bytes.len(), "Wrote PDF document");
        Ok(pages)
    }

    fn open_page(&mut self) {
        self.close_page();
        let top: Pt = Mm(PAGE_HEIGHT_MM - MARGIN_Y_MM).into();
        self.ops = vec![
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: Mm(MARGIN_X_MM).into(),
                    y: Pt(top.0 - self.line_height.0),
                },
            },
            Op::SetLineHeight {
                lh: self.line_height,
            },
        ];
    }

    fn close_page(&mut self) {
        if self.ops.is_empty() {
            return;
        }
        let mut ops = std::mem::take(&mut self.ops);
        ops.push(Op::EndTextSection);
        self.pages
            .push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
    }

    fn row(&mut self, spans: &[(Tone, String)]) {
        if self.flow.advance_row() {
            self.open_page();
        }
        for (tone, text) in spans {
            let font = tone.font();
            self.ops.push(Op::SetFillColor { col: tone.color() });
            self.ops.push(Op::SetFontSizeBuiltinFont {
                size: self.font_size,
                font,
            });
            self.ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(text.clone())],
                font,
            });
        }
        self.ops.push(Op::AddLineBreak);
    }

    fn blank_rows(&mut self, count: usize) {
        for _ in 0..count {
            self.row(&[]);
        }
    }
}

impl DocumentSink for PdfSink {
    fn file_header(&mut self, file: &SourceFile, number: usize) -> Result<(), RenderError> {
        if self.budget.header_lines == 0 {
            return Ok(());
        }
        debug!(file = %file.name, number, "Rendering file header");
        self.row(&[(Tone::Title, printable(&file.header_title(), usize::MAX))]);
        self.blank_rows(self.budget.header_lines - 1);
        Ok(())
    }

    fn content_lines(
        &mut self,
        file: &SourceFile,
        start: usize,
        end: usize,
    ) -> Result<(), RenderError> {
        let Some(last) = file.line_count().checked_sub(1) else {
            return Ok(());
        };
        for line_number in start..=end.min(last) {
            let gutter = format!("{:>4} | ", line_number + 1);
            let text = printable(&file.lines[line_number], self.max_line_chars);
            self.row(&[(Tone::Gutter, gutter), (Tone::Text, text)]);
        }
        Ok(())
    }

    fn separator(&mut self) -> Result<(), RenderError> {
        if self.budget.separator_lines == 0 {
            return Ok(());
        }
        self.row(&[(Tone::Rule, "-".repeat(SEPARATOR_WIDTH))]);
        self.blank_rows(self.budget.separator_lines - 1);
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), RenderError> {
        self.flow.page_break();
        Ok(())
    }
}

/// Make a source line safe for a builtin PDF font: expand tabs, drop control characters, replace
/// anything outside Latin-1, and truncate past `max_chars` with `...`.
pub fn printable(line: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut count = 0;
    for c in line.chars() {
        if count >= max_chars {
            out.push_str("...");
            return out;
        }
        match c {
            '\t' => out.push_str(TAB),
            c if c.is_control() => out.push(' '),
            c if (c as u32) > 0xFF => out.push('?'),
            c => out.push(c),
        }
        count += 1;
    }
    out
}

/// Render a single source file to a PDF at `output_path` using the default page budget.
pub fn code_file_to_pdf(input_path: &Path, output_path: &Path) -> Result<usize, RenderError> {
    let content = std::fs::read(input_path)?;
    let text = String::from_utf8_lossy(&content);
    let lines: Vec<String> = text.lines().map(str::to_owned).collect();
    if lines.is_empty() {
        return Err(RenderError::EmptyInput);
    }

    let name = input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input_path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let files = vec![SourceFile::new(name.clone(), extension, lines)];

    let paginator = Paginator::default();
    let budget = *paginator.budget();
    let plan = full_document_plan(&paginator, &files);

    let mut sink = PdfSink::new(name, budget, crate::config::OutputConfig::default().max_line_chars)?;
    replay(&files, &plan, &mut sink)?;
    sink.save(output_path)
}
