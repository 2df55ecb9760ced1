use tracing::Span;

use super::locate::{locate_page_headings, locate_sections};
use super::stitch::{ContinuationState, TableClaim, search_key, table_belongs_to_open_section};
use super::*;
use crate::model::TableGrid;

fn extractor() -> Extractor {
    Extractor::new(ExtractOptions::default(), Span::none()).expect("patterns compile")
}

fn observed_only() -> Extractor {
    let options = ExtractOptions {
        photo_fields: PhotoFieldPolicy::Observed,
    };
    Extractor::new(options, Span::none()).expect("patterns compile")
}

fn table(rows: &[&[&str]]) -> TableGrid {
    rows.iter()
        .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
        .collect()
}

fn page(text: &str, tables: Vec<TableGrid>) -> PageContent {
    PageContent {
        text: text.to_string(),
        tables,
    }
}

fn triples(observations: &[Observation]) -> Vec<(&str, &str, &str)> {
    observations
        .iter()
        .map(|observation| {
            (
                observation.name.as_str(),
                observation.subdetail.as_str(),
                observation.value.as_str(),
            )
        })
        .collect()
}

const REPORT: &str = "Project Information
Address: 123 Main St
Inspector: Jane Doe

F_Roof (1)
Condition: Good
Notes: No visible damage

Review Status and Acknowledgment
Review Status
Approved
";

#[test]
fn text_mode_extracts_report_in_document_order() {
    let extraction = extractor().extract_text(REPORT);

    let json = serde_json::to_string(&extraction.observations).expect("serialize");
    assert_eq!(
        json,
        concat!(
            r#"[{"Observation Name":"Project Information","Observation Subdetail":"Address","Value":"123 Main St"},"#,
            r#"{"Observation Name":"Project Information","Observation Subdetail":"Inspector","Value":"Jane Doe"},"#,
            r#"{"Observation Name":"F_Roof (1)","Observation Subdetail":"Condition","Value":"Good"},"#,
            r#"{"Observation Name":"F_Roof (1)","Observation Subdetail":"Notes","Value":"No visible damage"},"#,
            r#"{"Observation Name":"Review Status and Acknowledgment","Observation Subdetail":"Review Status","Value":"Approved"}]"#,
        )
    );
    assert_eq!(extraction.section_count, 1);
}

#[test]
fn text_mode_is_deterministic() {
    let first = extractor().extract_text(REPORT);
    let second = extractor().extract_text(REPORT);
    assert_eq!(first, second);
}

#[test]
fn project_information_yields_one_triple_per_colon_line() {
    let text = "Project Information\nAddress: 1 Elm\nnot a field\nPermit: 42\nLot: 7: east\n\nF_Roof\nCondition: Good\n";
    let observations = extractor().extract_text(text).observations;

    let project = observations
        .iter()
        .filter(|observation| observation.name == PROJECT_INFORMATION)
        .map(|observation| (observation.subdetail.as_str(), observation.value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        project,
        vec![("Address", "1 Elm"), ("Permit", "42"), ("Lot", "7: east")]
    );
}

#[test]
fn dash_list_wins_over_colon_lines() {
    let text = "G_Windows (2)\n- Flashing missing at sill\n  continues here\nNote: see photo\n- Sealant gap\ntrailing words\n";
    let observations = extractor().extract_text(text).observations;

    assert_eq!(
        triples(&observations),
        vec![
            (
                "G_Windows (2)",
                "-",
                "Flashing missing at sill continues here Note: see photo"
            ),
            ("G_Windows (2)", "-", "Sealant gap trailing words"),
        ]
    );
}

#[test]
fn dash_list_drops_text_before_first_dash() {
    let text = "G_Windows\nintro text\n--  Cracked pane\n";
    let observations = extractor().extract_text(text).observations;
    assert_eq!(
        triples(&observations),
        vec![("G_Windows", "-", "Cracked pane")]
    );
}

#[test]
fn generic_fields_accumulate_values_and_keep_standalone_lines() {
    let text = "H_Doors:\nGeneral remarks\nStatus: Open\npending review\nOwner: Bob\n";
    let observations = extractor().extract_text(text).observations;

    assert_eq!(
        triples(&observations),
        vec![
            ("H_Doors", "", "General remarks"),
            ("H_Doors", "Status", "Open, pending review"),
            ("H_Doors", "Owner", "Bob"),
        ]
    );
}

#[test]
fn site_photo_synthesizes_missing_fields_by_default() {
    let text = "F_Site Photo (3)\nPhoto Description\nNorth elevation\nCondition\nFair\n";
    let observations = extractor().extract_text(text).observations;

    assert_eq!(
        triples(&observations),
        vec![
            ("F_Site Photo (3)", "Site Photo", "image"),
            ("F_Site Photo (3)", "Photo Description", "North elevation"),
            ("F_Site Photo (3)", "Condition", "Fair"),
            ("F_Site Photo (3)", "General Observation", ""),
            ("F_Site Photo (3)", "Action Item", ""),
        ]
    );
}

#[test]
fn site_photo_observed_policy_keeps_only_matched_fields() {
    let text = "F_Site Photo (3)\nPhoto Description\nNorth elevation\nAction Item\n";
    let observations = observed_only().extract_text(text).observations;

    assert_eq!(
        triples(&observations),
        vec![
            ("F_Site Photo (3)", "Site Photo", "image"),
            ("F_Site Photo (3)", "Photo Description", "North elevation"),
        ]
    );
}

#[test]
fn site_photo_label_line_stays_inside_lettered_section() {
    let text = "F_Site Photo (1)\nSite Photo\nPhoto Description\nNorth wall\nCondition\nFair\n";
    let extraction = observed_only().extract_text(text);

    assert_eq!(
        triples(&extraction.observations),
        vec![
            ("F_Site Photo (1)", "Site Photo", "image"),
            ("F_Site Photo (1)", "Photo Description", "North wall"),
            ("F_Site Photo (1)", "Condition", "Fair"),
        ]
    );
    assert_eq!(extraction.section_count, 1);
}

#[test]
fn trailing_header_without_content_contributes_nothing() {
    let text = "F_Roof (1)\nCondition: Good\n\nG_Gutters (1):\n";
    let extraction = extractor().extract_text(text);

    assert_eq!(
        triples(&extraction.observations),
        vec![("F_Roof (1)", "Condition", "Good")]
    );
    assert_eq!(extraction.section_count, 1);
}

#[test]
fn page_furniture_is_not_section_content() {
    let text = "F_Roof (1)\nCondition: Good\nPage 2 of 4\nDate Submitted: 04/17/2025\nShingles intact\n";
    let observations = extractor().extract_text(text).observations;

    assert_eq!(
        triples(&observations),
        vec![("F_Roof (1)", "Condition", "Good, Shingles intact")]
    );
}

#[test]
fn review_labels_consume_next_line_and_drop_dangling_labels() {
    let text = "Review Status and Acknowledgment\nReview Status\nAcknowledgment\nI agree\nInspector\nJane Doe\nInspector Phone Number\nDate Submitted: 04/17/2025\nInspector\nIgnored\n";
    let observations = extractor().extract_text(text).observations;

    assert_eq!(
        triples(&observations),
        vec![
            (REVIEW_SECTION, "Acknowledgment", "I agree"),
            (REVIEW_SECTION, "Inspector", "Jane Doe"),
        ]
    );
}

#[test]
fn no_headers_leaves_only_end_sentinel() {
    let patterns = Patterns::new().expect("patterns compile");
    let headers = locate_sections("plain text\nwithout sections\n", &patterns);

    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].kind, HeaderKind::End);
    assert_eq!(headers[0].name, END_SENTINEL);
    assert!(extractor().extract_text("plain text\n").observations.is_empty());
}

#[test]
fn section_names_keep_prefix_and_numbering() {
    let patterns = Patterns::new().expect("patterns compile");
    let text = "F_Exterior Walls (2):\nbody\nSite Photo (4)\nProject Information\nReview Status and Acknowledgment\n";
    let headers = locate_sections(text, &patterns);

    let names = headers
        .iter()
        .map(|header| (header.name.as_str(), header.kind))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            ("F_Exterior Walls (2)", HeaderKind::Lettered),
            (PROJECT_INFORMATION, HeaderKind::ProjectInformation),
            (REVIEW_SECTION, HeaderKind::ReviewStatus),
            (END_SENTINEL, HeaderKind::End),
        ]
    );
    assert!(
        headers
            .windows(2)
            .all(|pair| pair[0].position < pair[1].position)
    );
}

#[test]
fn classify_prefers_name_then_content() {
    let dash = vec!["Key: value".to_string(), "- item".to_string()];
    let plain = vec!["Key: value".to_string()];

    assert_eq!(shape::classify(PROJECT_INFORMATION, &dash), Shape::ProjectInfo);
    assert_eq!(shape::classify("F_Site Photo (1)", &dash), Shape::SitePhoto);
    assert_eq!(shape::classify("F_Roof", &dash), Shape::DashList);
    assert_eq!(shape::classify("F_Roof", &plain), Shape::GenericKv);
}

#[test]
fn search_key_falls_back_to_second_cell_words() {
    assert_eq!(
        search_key(&table(&[&["-", "Loose fasteners observed along ridge"]])),
        Some("Loose fasteners observed".to_string())
    );
    assert_eq!(search_key(&table(&[&["", "Gap"]])), Some("Gap".to_string()));
    assert_eq!(search_key(&table(&[&["ab", ""]])), Some("ab".to_string()));
    assert_eq!(
        search_key(&table(&[&["Condition", "Good"]])),
        Some("Condition".to_string())
    );
    assert_eq!(search_key(&vec![vec![None, None]]), None);
    assert_eq!(search_key(&Vec::new()), None);
}

#[test]
fn continuation_predicate_checks_text_above_heading() {
    let continued = table(&[&["-", "Loose fasteners observed along ridge"]]);
    assert!(table_belongs_to_open_section(
        &continued,
        &["Page 3 of 4", "- Loose fasteners observed along ridge cap"]
    ));
    assert!(!table_belongs_to_open_section(&continued, &["Unrelated"]));
}

#[test]
fn headings_claim_tables_in_page_order() {
    let patterns = Patterns::new().expect("patterns compile");
    let lines = vec!["A_One", "row", "B_Two"];
    let headings = locate_page_headings(&lines, &patterns);
    let first = table(&[&["First", "1"]]);
    let second = table(&[&["Second", "2"]]);
    let third = table(&[&["Third", "3"]]);

    let (assignment, state) = ContinuationState::Idle.assign_page(
        &lines,
        &headings,
        vec![first.clone(), second.clone(), third.clone()],
    );

    assert_eq!(
        assignment.claims,
        vec![
            TableClaim {
                section: "A_One".to_string(),
                tables: vec![first],
            },
            TableClaim {
                section: "B_Two".to_string(),
                tables: vec![second, third],
            },
        ]
    );
    assert_eq!(
        state,
        ContinuationState::AwaitingContinuation("B_Two".to_string())
    );
}

#[test]
fn page_without_headings_continues_open_section() {
    let open = ContinuationState::AwaitingContinuation("F_Roof (1)".to_string());
    let tables = vec![table(&[&["Zzz", "1"]]), table(&[&["Yyy", "2"]])];

    let (assignment, state) = open.clone().assign_page(&["Unrelated"], &[], tables.clone());

    assert_eq!(
        assignment.claims,
        vec![TableClaim {
            section: "F_Roof (1)".to_string(),
            tables,
        }]
    );
    assert_eq!(assignment.continued_tables, 2);
    assert_eq!(state, open);
}

#[test]
fn unconfirmed_leading_table_stops_continuation() {
    let patterns = Patterns::new().expect("patterns compile");
    let lines = vec!["Beta 2", "Gamma 3", "G_Next"];
    let headings = locate_page_headings(&lines, &patterns);
    let open = ContinuationState::AwaitingContinuation("F_Roof (1)".to_string());
    let tables = vec![
        table(&[&["Zzzz", "1"]]),
        table(&[&["Beta", "2"]]),
        table(&[&["Gamma", "3"]]),
    ];

    let (assignment, state) = open.assign_page(&lines, &headings, tables.clone());

    assert_eq!(
        assignment.claims,
        vec![TableClaim {
            section: "G_Next".to_string(),
            tables,
        }]
    );
    assert_eq!(assignment.continued_tables, 0);
    assert_eq!(
        state,
        ContinuationState::AwaitingContinuation("G_Next".to_string())
    );
}

#[test]
fn heading_first_page_continues_nothing() {
    let patterns = Patterns::new().expect("patterns compile");
    let lines = vec!["Page 2 of 3", "G_Next", "Beta 2"];
    let headings = locate_page_headings(&lines, &patterns);
    let open = ContinuationState::AwaitingContinuation("F_Roof (1)".to_string());
    let tables = vec![table(&[&["Beta", "2"]])];

    let (assignment, _) = open.assign_page(&lines, &headings, tables.clone());

    assert_eq!(
        assignment.claims,
        vec![TableClaim {
            section: "G_Next".to_string(),
            tables,
        }]
    );
    assert_eq!(assignment.continued_tables, 0);
}

#[test]
fn review_heading_closes_continuation() {
    let patterns = Patterns::new().expect("patterns compile");
    let lines = vec!["Review Status and Acknowledgment", "Review Status Approved"];
    let headings = locate_page_headings(&lines, &patterns);
    let open = ContinuationState::AwaitingContinuation("G_Walls".to_string());

    let (assignment, state) =
        open.assign_page(&lines, &headings, vec![table(&[&["Review Status", "Approved"]])]);

    assert!(assignment.claims.is_empty());
    assert_eq!(assignment.dropped_tables, 1);
    assert_eq!(state, ContinuationState::Idle);
}

#[test]
fn noise_lines_are_never_page_headings() {
    let patterns = Patterns::new().expect("patterns compile");
    let lines = vec![
        "Envelope Construction Progress Inspection",
        "Page 2 of 5",
        "  F_Roof & Gutters (2):  ",
        "Condition Good",
    ];
    let headings = locate_page_headings(&lines, &patterns);

    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].name, "F_Roof & Gutters (2)");
    assert_eq!(headings[0].position, 2);
}

fn three_page_report() -> Vec<PageContent> {
    vec![
        page(
            "Envelope Construction Progress Inspection\nProject Information\nAddress 123 Main St\nF_Roof (1)\nCondition Good\n",
            vec![
                table(&[&["Address", "123 Main St"]]),
                table(&[&["Condition", "Good"]]),
            ],
        ),
        page(
            "Page 2 of 3\nNotes Flashing at parapet\nneeds repair\nG_Walls (2)\nCladding Intact\n",
            vec![
                table(&[&["Notes", "Flashing at parapet\nneeds repair"]]),
                table(&[&["Cladding", "Intact"]]),
            ],
        ),
        page(
            "Review Status and Acknowledgment\nReview Status: Approved\nAcknowledgment I have reviewed\n",
            Vec::new(),
        ),
    ]
}

#[test]
fn table_mode_stitches_sections_across_pages() {
    let pages = three_page_report();
    let extraction = extractor().extract_pages(&pages);

    assert_eq!(
        triples(&extraction.observations),
        vec![
            (PROJECT_INFORMATION, "Address", "123 Main St"),
            ("F_Roof (1)", "Condition", "Good"),
            ("F_Roof (1)", "Notes", "Flashing at parapet needs repair"),
            ("G_Walls (2)", "Cladding", "Intact"),
            (REVIEW_SECTION, "Review Status", "Approved"),
        ]
    );
    assert_eq!(extraction.section_count, 4);
}

#[test]
fn table_mode_is_deterministic() {
    let pages = three_page_report();
    let first = extractor().extract_pages(&pages);
    let second = extractor().extract_pages(&pages);
    assert_eq!(first, second);
}

#[test]
fn table_mode_site_photo_always_has_four_fields() {
    let pages = vec![page(
        "F_Site Photo (1)\nPhoto Description North wall\nAction Item Seal\njoint\n",
        vec![table(&[
            &["Photo Description", "North wall"],
            &["Action Item", "Seal\njoint"],
        ])],
    )];

    let observations = extractor().extract_pages(&pages).observations;

    assert_eq!(
        triples(&observations),
        vec![
            ("F_Site Photo (1)", "Photo Description", "North wall"),
            ("F_Site Photo (1)", "Action Item", "Seal joint"),
            ("F_Site Photo (1)", "Condition", ""),
            ("F_Site Photo (1)", "General Observation", ""),
        ]
    );
}

#[test]
fn repeated_heading_appends_to_first_occurrence() {
    let pages = vec![
        page("A_Roof\n", vec![table(&[&["One", "1"]])]),
        page("B_Wall\n", vec![table(&[&["Two", "2"]])]),
        page("A_Roof\n", vec![table(&[&["Three", "3"]])]),
    ];

    let observations = extractor().extract_pages(&pages).observations;

    assert_eq!(
        triples(&observations),
        vec![
            ("A_Roof", "One", "1"),
            ("A_Roof", "Three", "3"),
            ("B_Wall", "Two", "2"),
        ]
    );
}

#[test]
fn table_rows_tolerate_missing_cells() {
    let pages = vec![page(
        "C_Notes\n",
        vec![vec![
            vec![Some("-".to_string()), Some(" Loose trim ".to_string())],
            Vec::new(),
            vec![None, Some("Unlabeled".to_string())],
            vec![Some("Only label".to_string())],
        ]],
    )];

    let observations = extractor().extract_pages(&pages).observations;

    assert_eq!(
        triples(&observations),
        vec![
            ("C_Notes", "-", "Loose trim"),
            ("C_Notes", "", "Unlabeled"),
            ("C_Notes", "Only label", ""),
        ]
    );
}
