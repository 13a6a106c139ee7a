use tempfile::tempdir;

use copyright_pages::config::{Config, PageBudget};
use copyright_pages::generate::{document_file_name, generate, statistics, DocumentKind, GenerateError};
use copyright_pages::model::SourceFile;
use copyright_pages::paginator::Paginator;

fn files(line_counts: &[usize]) -> Vec<SourceFile> {
    line_counts
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            SourceFile::new(
                format!("Module{i}.cs"),
                "cs",
                (0..n).map(|l| format!("    int value{l} = {l};")).collect(),
            )
        })
        .collect()
}

#[test]
fn test_generate_small_tree_writes_full_document_only() {
    let out = tempdir().unwrap();
    let mut config = Config::default();
    config.output.dir = out.path().join("docs");

    let report = generate(&config, &files(&[50, 20, 100])).expect("generation should succeed");

    assert_eq!(report.documents.len(), 1);
    assert!(report.sections.is_none());
    let doc = &report.documents[0];
    assert_eq!(doc.kind, DocumentKind::Full);
    assert_eq!(doc.pages, 3);
    assert!(doc.path.starts_with(out.path().join("docs")));
    let file_name = doc.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("source_code_full_"), "{file_name}");
    assert!(file_name.ends_with(".pdf"));

    let bytes = std::fs::read(&doc.path).unwrap();
    assert_eq!(&bytes[0..4], b"%PDF");
}

#[test]
fn test_generate_over_threshold_adds_shortened_document() {
    let out = tempdir().unwrap();
    let mut config = Config::default();
    config.output.dir = out.path().to_path_buf();
    config.output.max_full_pages = 2;
    config.pagination = PageBudget {
        lines_per_page: 10,
        target_pages: 3,
        section_pages: 1,
        min_lines_for_page_break: 5,
        header_lines: 2,
        separator_lines: 1,
    };

    let report = generate(&config, &files(&[20, 30])).expect("generation should succeed");

    assert_eq!(report.statistics.estimated_pages, 6);
    assert_eq!(report.documents.len(), 2);
    let full = &report.documents[0];
    let shortened = &report.documents[1];
    assert_eq!(full.kind, DocumentKind::Full);
    assert_eq!(full.pages, 6);
    assert_eq!(shortened.kind, DocumentKind::Shortened);
    assert_eq!(shortened.pages, 3);
    assert!(shortened.path.exists());

    let sections = report.sections.expect("sections reported");
    assert_eq!(sections.total_lines, 55);
    assert_eq!(sections.merged(), vec![0..10, 22..32, 45..55]);
}

#[test]
fn test_generate_rejects_empty_file_list() {
    let out = tempdir().unwrap();
    let mut config = Config::default();
    config.output.dir = out.path().join("never-created");

    let err = generate(&config, &[]).unwrap_err();
    assert!(matches!(err, GenerateError::NoFiles));
    assert!(!out.path().join("never-created").exists());
}

#[test]
fn test_generate_rejects_invalid_budget() {
    let out = tempdir().unwrap();
    let mut config = Config::default();
    config.output.dir = out.path().to_path_buf();
    config.pagination.min_lines_for_page_break = 500;

    let err = generate(&config, &files(&[5])).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidConfig(_)));
}

#[test]
fn test_statistics_per_file_page_span() {
    let paginator = Paginator::default();
    let stats = statistics(&paginator, &files(&[50, 20, 100]));

    assert_eq!(stats.files, 3);
    assert_eq!(stats.total_lines, 178);
    assert_eq!(stats.estimated_pages, 3);
    assert_eq!(stats.full_document_pages, 3);
    let spans: Vec<usize> = stats.per_file.iter().map(|f| f.page_span).collect();
    assert_eq!(spans, vec![1, 1, 2]);
}

#[test]
fn test_document_file_name_format() {
    assert_eq!(
        document_file_name(DocumentKind::Shortened, "20260101_120000"),
        "source_code_shortened_20260101_120000.pdf"
    );
}
