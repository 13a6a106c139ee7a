//! Document generation pipeline: statistics → full document → (optionally) abbreviated document.
//!
//! # Responsibilities
//! - Refuse an empty file list with [`GenerateError::NoFiles`]
//! - Estimate total pages and log per-file statistics
//! - Always write the full document; also write the abbreviated (first/middle/last) document when
//!   the estimate exceeds `output.max_full_pages`
//! - Return a [`GenerationReport`] describing what was written
//!
//! Rendering goes through [`DocumentSink`], so a different output format only needs a new sink
//! factory passed to [`generate_with`].

use crate::assemble::{abbreviated_plan, full_document_plan, rendered_pages, replay, Block};
use crate::code_to_pdf::PdfSink;
use crate::config::Config;
use crate::model::{ContentSections, SourceFile};
use crate::paginator::Paginator;
use crate::render::{DocumentSink, RenderError};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug)]
pub enum GenerateError {
    NoFiles,
    InvalidConfig(crate::config::ConfigError),
    Io(std::io::Error),
    Render {
        kind: DocumentKind,
        source: RenderError,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NoFiles => write!(f, "no matching source files found"),
            GenerateError::InvalidConfig(e) => write!(f, "invalid configuration: {e}"),
            GenerateError::Io(e) => write!(f, "I/O error: {e}"),
            GenerateError::Render { kind, source } => {
                write!(f, "failed to render {kind} document: {source}")
            }
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<std::io::Error> for GenerateError {
    fn from(e: std::io::Error) -> Self {
        GenerateError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Full,
    Shortened,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Full => write!(f, "full"),
            DocumentKind::Shortened => write!(f, "shortened"),
        }
    }
}

/// Page statistics for one file: how many page-sized chunks its content is split into.
#[derive(Debug, Clone, Serialize)]
pub struct FileStatistics {
    pub name: String,
    pub lines: usize,
    pub page_span: usize,
}

/// Numbers computed before anything is rendered.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub files: usize,
    pub total_lines: usize,
    pub estimated_pages: usize,
    pub full_document_pages: usize,
    pub lines_per_page: usize,
    pub per_file: Vec<FileStatistics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub statistics: Statistics,
    /// Present when an abbreviated document was produced.
    pub sections: Option<ContentSections>,
    pub documents: Vec<DocumentReport>,
}

/// Compute page statistics without rendering.
pub fn statistics(paginator: &Paginator, files: &[SourceFile]) -> Statistics {
    let ranges = paginator.page_ranges(files);
    let per_file = files
        .iter()
        .enumerate()
        .map(|(index, file)| FileStatistics {
            name: file.name.clone(),
            lines: file.line_count(),
            page_span: ranges.iter().filter(|r| r.file_index == index).count(),
        })
        .collect();

    let full_plan = full_document_plan(paginator, files);
    let stats = Statistics {
        files: files.len(),
        total_lines: paginator.total_lines(files),
        estimated_pages: paginator.total_pages(files),
        full_document_pages: rendered_pages(paginator, files, &full_plan),
        lines_per_page: paginator.budget().lines_per_page,
        per_file,
    };
    info!(
        files = stats.files,
        total_lines = stats.total_lines,
        estimated_pages = stats.estimated_pages,
        full_document_pages = stats.full_document_pages,
        lines_per_page = stats.lines_per_page,
        "Pagination statistics"
    );
    stats
}

/// Generate PDF documents into `config.output.dir`.
pub fn generate(config: &Config, files: &[SourceFile]) -> Result<GenerationReport, GenerateError> {
    let budget = config.pagination;
    let max_line_chars = config.output.max_line_chars;
    generate_with(config, files, |kind| {
        PdfSink::new(format!("Source code ({kind})"), budget, max_line_chars)
    })
}

/// Same as [`generate`] with a caller-supplied sink factory. The sink is saved to the returned
/// path through [`SaveDocument`].
pub fn generate_with<S, F>(
    config: &Config,
    files: &[SourceFile],
    mut make_sink: F,
) -> Result<GenerationReport, GenerateError>
where
    S: DocumentSink + SaveDocument,
    F: FnMut(DocumentKind) -> Result<S, RenderError>,
{
    if files.is_empty() {
        error!("No source files to paginate");
        return Err(GenerateError::NoFiles);
    }
    let paginator = Paginator::new(config.pagination).map_err(GenerateError::InvalidConfig)?;
    let statistics = statistics(&paginator, files);

    std::fs::create_dir_all(&config.output.dir).map_err(|e| {
        error!(error = ?e, dir = %config.output.dir.display(), "Failed to create output directory");
        GenerateError::Io(e)
    })?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

    let mut documents = Vec::new();
    let full_plan = full_document_plan(&paginator, files);
    documents.push(write_document(
        DocumentKind::Full,
        &full_plan,
        files,
        &config.output.dir,
        &stamp,
        &mut make_sink,
    )?);

    let mut sections = None;
    if statistics.estimated_pages > config.output.max_full_pages {
        info!(
            estimated_pages = statistics.estimated_pages,
            max_full_pages = config.output.max_full_pages,
            target_pages = config.pagination.target_pages,
            "Over page threshold, creating shortened document as well"
        );
        let plan = abbreviated_plan(&paginator, files);
        sections = Some(paginator.content_sections(files));
        documents.push(write_document(
            DocumentKind::Shortened,
            &plan,
            files,
            &config.output.dir,
            &stamp,
            &mut make_sink,
        )?);
    } else {
        info!(
            estimated_pages = statistics.estimated_pages,
            "Within page threshold, full document only"
        );
    }

    Ok(GenerationReport {
        statistics,
        sections,
        documents,
    })
}

/// Persisting a finished sink; returns the number of pages written.
pub trait SaveDocument {
    fn save_to(self, path: &Path) -> Result<usize, RenderError>;
}

impl SaveDocument for PdfSink {
    fn save_to(self, path: &Path) -> Result<usize, RenderError> {
        self.save(path)
    }
}

pub fn document_file_name(kind: DocumentKind, stamp: &str) -> String {
    format!("source_code_{kind}_{stamp}.pdf")
}

fn write_document<S, F>(
    kind: DocumentKind,
    plan: &[Block],
    files: &[SourceFile],
    dir: &Path,
    stamp: &str,
    make_sink: &mut F,
) -> Result<DocumentReport, GenerateError>
where
    S: DocumentSink + SaveDocument,
    F: FnMut(DocumentKind) -> Result<S, RenderError>,
{
    let render_err = |source: RenderError| {
        error!(%kind, error = %source, "Document rendering failed");
        GenerateError::Render { kind, source }
    };

    let mut sink = make_sink(kind).map_err(render_err)?;
    replay(files, plan, &mut sink).map_err(render_err)?;
    let path = dir.join(document_file_name(kind, stamp));
    let pages = sink.save_to(&path).map_err(render_err)?;

    info!(%kind, path = %path.display(), pages, "Created document");
    Ok(DocumentReport { kind, path, pages })
}
