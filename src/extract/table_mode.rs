use tracing::{debug, warn};

use super::normalize::cell_text;
use super::review::review_status_from_pages;
use super::shape::complete_photo_fields;
use super::stitch::ContinuationState;
use super::{Extraction, Patterns, REVIEW_LABELS, REVIEW_SECTION, locate, merge_multiline_value};
use crate::model::{Observation, PageContent, TableGrid};

type Row = Vec<Option<String>>;

#[derive(Debug, Default)]
struct SectionRows {
    sections: Vec<(String, Vec<Row>)>,
}

impl SectionRows {
    fn rows_mut(&mut self, section: &str) -> &mut Vec<Row> {
        let index = match self.sections.iter().position(|(name, _)| name == section) {
            Some(index) => index,
            None => {
                self.sections.push((section.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }

    fn extend(&mut self, section: &str, tables: Vec<TableGrid>) {
        let rows = self.rows_mut(section);
        for table in tables {
            rows.extend(table);
        }
    }
}

pub fn extract_pages(pages: &[PageContent], patterns: &Patterns) -> Extraction {
    let mut content = SectionRows::default();
    let mut state = ContinuationState::Idle;

    for (page_index, page) in pages.iter().enumerate() {
        let lines = page.text.lines().collect::<Vec<&str>>();
        let headings = locate::locate_page_headings(&lines, patterns);

        let (assignment, next_state) = state.assign_page(&lines, &headings, page.tables.clone());
        debug!(
            page = page_index + 1,
            headings = headings.len(),
            tables = page.tables.len(),
            continued = assignment.continued_tables,
            "assigned page tables"
        );
        if assignment.dropped_tables > 0 {
            warn!(
                page = page_index + 1,
                dropped = assignment.dropped_tables,
                "tables after the review heading were not assigned to a section"
            );
        }

        for claim in assignment.claims {
            content.extend(&claim.section, claim.tables);
        }
        state = next_state;
    }

    if let Some(status) = review_status_from_pages(pages) {
        content
            .rows_mut(REVIEW_SECTION)
            .push(vec![Some(REVIEW_LABELS[0].to_string()), Some(status)]);
    }

    let mut observations = Vec::new();
    let mut section_count = 0usize;
    for (section, rows) in &content.sections {
        if rows.is_empty() {
            continue;
        }

        let section_observations = rows_to_observations(section, rows);
        let section_observations = if patterns.table_site_photo.is_match(section) {
            complete_photo_fields(section, section_observations)
        } else {
            section_observations
        };

        debug!(
            section = %section,
            rows = rows.len(),
            observations = section_observations.len(),
            "normalized section rows"
        );
        section_count += 1;
        observations.extend(section_observations);
    }

    Extraction {
        observations,
        section_count,
    }
}

fn rows_to_observations(section: &str, rows: &[Row]) -> Vec<Observation> {
    rows.iter()
        .filter(|row| !row.is_empty())
        .map(|row| {
            let subdetail = cell_text(row.first());
            let value = cell_text(row.get(1));
            let value = if value.contains('\n') {
                merge_multiline_value(&value)
            } else {
                value
            };
            Observation::new(section, subdetail, value)
        })
        .collect()
}
