use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

use copyright_pages::assemble::{abbreviated_plan, full_document_plan, rendered_pages, replay};
use copyright_pages::code_to_pdf::{code_file_to_pdf, printable, PdfSink};
use copyright_pages::config::PageBudget;
use copyright_pages::model::SourceFile;
use copyright_pages::paginator::Paginator;
use copyright_pages::render::{DocumentSink, RenderError};

fn files(line_counts: &[usize]) -> Vec<SourceFile> {
    line_counts
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            SourceFile::new(
                format!("file{i}.dart"),
                "dart",
                (0..n).map(|l| format!("  var x{l} = {l};")).collect(),
            )
        })
        .collect()
}

#[test]
fn test_code_file_to_pdf_creates_valid_pdf() {
    // Prepare temp directory for input and output
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("test_code.rs");
    let output_path = dir.path().join("test_code.pdf");

    let mut input_file = File::create(&input_path).unwrap();
    writeln!(input_file, "fn main() {{ println!(\"hi world\"); }}").unwrap();

    let pages = code_file_to_pdf(&input_path, &output_path).expect("PDF conversion failed");
    assert_eq!(pages, 1);

    let metadata = fs::metadata(&output_path).unwrap();
    assert!(
        metadata.len() > 100,
        "Output PDF is too small and may not exist"
    );

    let pdf_bytes = fs::read(&output_path).unwrap();
    assert_eq!(&pdf_bytes[0..4], b"%PDF", "PDF file missing magic header");
}

#[test]
fn test_code_file_to_pdf_rejects_empty_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("empty.cs");
    File::create(&input_path).unwrap();

    let err = code_file_to_pdf(&input_path, &dir.path().join("empty.pdf")).unwrap_err();
    assert!(matches!(err, RenderError::EmptyInput));
    assert!(!dir.path().join("empty.pdf").exists());
}

#[test]
fn test_pdf_sink_page_count_matches_plan() {
    let paginator = Paginator::default();
    let list = files(&[50, 20, 100]);
    let plan = full_document_plan(&paginator, &list);

    let mut sink = PdfSink::new("full", *paginator.budget(), 120).unwrap();
    replay(&list, &plan, &mut sink).unwrap();
    assert_eq!(sink.page_count(), rendered_pages(&paginator, &list, &plan));
    assert_eq!(sink.page_count(), 3);

    let bytes = sink.into_bytes().unwrap();
    assert_eq!(&bytes[0..4], b"%PDF");
}

#[test]
fn test_pdf_sink_abbreviated_plan_page_count() {
    let paginator = Paginator::new(PageBudget {
        lines_per_page: 10,
        target_pages: 3,
        section_pages: 1,
        min_lines_for_page_break: 5,
        header_lines: 2,
        separator_lines: 1,
    })
    .unwrap();
    let list = files(&[20, 30]);
    let plan = abbreviated_plan(&paginator, &list);

    let mut sink = PdfSink::new("shortened", *paginator.budget(), 120).unwrap();
    replay(&list, &plan, &mut sink).unwrap();
    assert_eq!(sink.page_count(), 3);
}

#[test]
fn test_pdf_sink_leading_and_trailing_breaks_add_no_pages() {
    let list = files(&[5]);
    let mut sink = PdfSink::new("breaks", PageBudget::default(), 120).unwrap();

    sink.page_break().unwrap();
    sink.file_header(&list[0], 1).unwrap();
    sink.content_lines(&list[0], 0, 4).unwrap();
    sink.page_break().unwrap();
    sink.page_break().unwrap();

    assert_eq!(sink.page_count(), 1);
}

#[test]
fn test_pdf_sink_without_rows_is_empty_input() {
    let sink = PdfSink::new("nothing", PageBudget::default(), 120).unwrap();
    assert!(matches!(sink.into_bytes(), Err(RenderError::EmptyInput)));
}

#[test]
fn test_pdf_sink_rejects_unreadable_line_density() {
    let budget = PageBudget {
        lines_per_page: 1000,
        ..PageBudget::default()
    };
    assert!(matches!(
        PdfSink::new("dense", budget, 120),
        Err(RenderError::Font(_))
    ));
}

#[test]
fn test_printable_sanitises_and_truncates() {
    assert_eq!(printable("\tlet x = 1;", 120), "    let x = 1;");
    assert_eq!(printable("abcdef", 3), "abc...");
    assert_eq!(printable("abc", 3), "abc");
    assert_eq!(printable("a→b", 10), "a?b");
    assert_eq!(printable("café", 10), "café");
}
