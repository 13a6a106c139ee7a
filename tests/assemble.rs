use copyright_pages::assemble::{
    abbreviated_plan, full_document_plan, map_global_range, rendered_pages, replay, Block,
};
use copyright_pages::config::PageBudget;
use copyright_pages::model::{PageRange, SourceFile};
use copyright_pages::paginator::Paginator;
use copyright_pages::render::{MockDocumentSink, RenderError};
use mockall::Sequence;

fn files(line_counts: &[usize]) -> Vec<SourceFile> {
    line_counts
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            SourceFile::new(
                format!("file{i}.cs"),
                "cs",
                (0..n).map(|l| format!("line {l}")).collect(),
            )
        })
        .collect()
}

fn small_paginator() -> Paginator {
    Paginator::new(PageBudget {
        lines_per_page: 10,
        target_pages: 3,
        section_pages: 1,
        min_lines_for_page_break: 5,
        header_lines: 2,
        separator_lines: 1,
    })
    .unwrap()
}

fn content(file_index: usize, start_line: usize, end_line: usize) -> Block {
    Block::Content(PageRange {
        file_index,
        start_line,
        end_line,
    })
}

#[test]
fn test_full_range_mapping_reproduces_every_file_once() {
    let paginator = Paginator::default();
    let list = files(&[50, 20, 100]);
    let total = paginator.total_lines(&list);

    let blocks = map_global_range(&paginator, &list, 0..total);
    assert_eq!(
        blocks,
        vec![
            Block::Header { file_index: 0 },
            content(0, 0, 49),
            Block::Separator { file_index: 0 },
            Block::Header { file_index: 1 },
            content(1, 0, 19),
            Block::Separator { file_index: 1 },
            Block::Header { file_index: 2 },
            content(2, 0, 99),
        ]
    );

    let without_breaks: Vec<Block> = full_document_plan(&paginator, &list)
        .into_iter()
        .filter(|b| *b != Block::PageBreak)
        .collect();
    assert_eq!(blocks, without_breaks);
}

#[test]
fn test_mapping_partial_windows_straddling_files() {
    let paginator = small_paginator();
    // file0: global 0..=22 (header 0-1, content 2-21, separator 22)
    // file1: global 23..=54 (header 23-24, content 25-54)
    let list = files(&[20, 30]);

    assert_eq!(
        map_global_range(&paginator, &list, 0..10),
        vec![Block::Header { file_index: 0 }, content(0, 0, 7)]
    );
    assert_eq!(
        map_global_range(&paginator, &list, 22..32),
        vec![
            Block::Separator { file_index: 0 },
            Block::Header { file_index: 1 },
            content(1, 0, 6),
        ]
    );
    assert_eq!(
        map_global_range(&paginator, &list, 45..55),
        vec![content(1, 20, 29)]
    );
}

#[test]
fn test_mapping_window_inside_header_renders_header_only() {
    let paginator = small_paginator();
    let list = files(&[20, 30]);

    assert_eq!(
        map_global_range(&paginator, &list, 23..24),
        vec![Block::Header { file_index: 1 }]
    );
}

#[test]
fn test_mapping_window_starting_at_first_content_line_includes_header() {
    let paginator = small_paginator();
    let list = files(&[20, 30]);

    assert_eq!(
        map_global_range(&paginator, &list, 2..5),
        vec![Block::Header { file_index: 0 }, content(0, 0, 2)]
    );
    assert_eq!(
        map_global_range(&paginator, &list, 3..5),
        vec![content(0, 1, 2)]
    );
}

#[test]
fn test_mapping_empty_or_inverted_window_yields_nothing() {
    let paginator = Paginator::default();
    let list = files(&[50, 20]);

    assert!(map_global_range(&paginator, &list, 10..10).is_empty());
    #[allow(clippy::reversed_empty_ranges)]
    let inverted = 30..10;
    assert!(map_global_range(&paginator, &list, inverted).is_empty());
    assert!(map_global_range(&paginator, &[], 0..100).is_empty());
}

#[test]
fn test_full_document_plan_breaks_before_file_that_does_not_fit() {
    let paginator = Paginator::default();
    let list = files(&[50, 20, 100]);

    let plan = full_document_plan(&paginator, &list);
    assert_eq!(
        plan,
        vec![
            Block::Header { file_index: 0 },
            content(0, 0, 49),
            Block::Separator { file_index: 0 },
            Block::PageBreak,
            Block::Header { file_index: 1 },
            content(1, 0, 19),
            Block::Separator { file_index: 1 },
            Block::Header { file_index: 2 },
            content(2, 0, 99),
        ]
    );
    assert_eq!(rendered_pages(&paginator, &list, &plan), 3);
}

#[test]
fn test_full_document_plan_without_breaks_matches_estimate() {
    let paginator = Paginator::default();
    let list = files(&[10, 10, 10]);

    let plan = full_document_plan(&paginator, &list);
    assert!(!plan.contains(&Block::PageBreak));
    assert_eq!(rendered_pages(&paginator, &list, &plan), paginator.total_pages(&list));
}

#[test]
fn test_abbreviated_plan_samples_three_windows() {
    let paginator = small_paginator();
    let list = files(&[20, 30]);

    let plan = abbreviated_plan(&paginator, &list);
    assert_eq!(
        plan,
        vec![
            Block::Header { file_index: 0 },
            content(0, 0, 7),
            Block::PageBreak,
            Block::Separator { file_index: 0 },
            Block::Header { file_index: 1 },
            content(1, 0, 6),
            Block::PageBreak,
            content(1, 20, 29),
        ]
    );
    assert_eq!(rendered_pages(&paginator, &list, &plan), 3);
}

#[test]
fn test_abbreviated_plan_never_exceeds_full_document_for_small_input() {
    let paginator = Paginator::default();
    let list = files(&[50, 20, 100]);

    let plan = abbreviated_plan(&paginator, &list);
    let content_lines: usize = plan
        .iter()
        .map(|b| match b {
            Block::Content(r) => r.line_count(),
            _ => 0,
        })
        .sum();
    assert_eq!(content_lines, 170);

    let headers = plan
        .iter()
        .filter(|b| matches!(b, Block::Header { .. }))
        .count();
    assert_eq!(headers, 3);
    assert!(!plan.contains(&Block::PageBreak));
}

#[test]
fn test_abbreviated_plan_renders_each_content_line_at_most_once() {
    let paginator = small_paginator();
    let list = files(&[7, 33, 12, 41, 5]);

    let plan = abbreviated_plan(&paginator, &list);
    let mut seen = std::collections::HashSet::new();
    for block in &plan {
        if let Block::Content(r) = block {
            for line in r.start_line..=r.end_line {
                assert!(seen.insert((r.file_index, line)), "duplicate line {line} of file {}", r.file_index);
            }
        }
    }
}

#[test]
fn test_replay_calls_sink_in_plan_order() {
    let list = files(&[3, 2]);
    let plan = full_document_plan(&Paginator::default(), &list);

    let mut sink = MockDocumentSink::new();
    let mut seq = Sequence::new();
    sink.expect_file_header()
        .withf(|f: &SourceFile, n: &usize| f.name == "file0.cs" && *n == 1)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    sink.expect_content_lines()
        .withf(|f: &SourceFile, s: &usize, e: &usize| f.name == "file0.cs" && *s == 0 && *e == 2)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    sink.expect_separator()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    sink.expect_file_header()
        .withf(|f: &SourceFile, n: &usize| f.name == "file1.cs" && *n == 2)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    sink.expect_content_lines()
        .withf(|f: &SourceFile, s: &usize, e: &usize| f.name == "file1.cs" && *s == 0 && *e == 1)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    sink.expect_page_break().never();

    replay(&list, &plan, &mut sink).expect("replay should succeed");
}

#[test]
fn test_replay_stops_at_first_sink_error() {
    let list = files(&[3]);
    let plan = full_document_plan(&Paginator::default(), &list);

    let mut sink = MockDocumentSink::new();
    sink.expect_file_header()
        .times(1)
        .returning(|_, _| Err(RenderError::Font("missing glyphs")));
    sink.expect_content_lines().never();

    let err = replay(&list, &plan, &mut sink).unwrap_err();
    assert!(matches!(err, RenderError::Font(_)));
}
