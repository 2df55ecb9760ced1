use std::collections::VecDeque;

use super::locate::{HeaderKind, SectionHeader};
use super::normalize::{cell_text, first_content_line_index};
use crate::model::TableGrid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContinuationState {
    #[default]
    Idle,
    AwaitingContinuation(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableClaim {
    pub section: String,
    pub tables: Vec<TableGrid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageAssignment {
    pub claims: Vec<TableClaim>,
    pub continued_tables: usize,
    pub dropped_tables: usize,
}

pub fn search_key(table: &TableGrid) -> Option<String> {
    let first_row = table.first()?;
    let first_cell = cell_text(first_row.first());

    if first_cell.is_empty() || first_cell == "-" || first_cell.chars().count() < 3 {
        let second_cell = cell_text(first_row.get(1));
        if !second_cell.is_empty() {
            return Some(
                second_cell
                    .split_whitespace()
                    .take(3)
                    .collect::<Vec<&str>>()
                    .join(" "),
            );
        }
    }

    if first_cell.is_empty() {
        None
    } else {
        Some(first_cell)
    }
}

pub fn table_belongs_to_open_section(table: &TableGrid, lines_before_heading: &[&str]) -> bool {
    let Some(key) = search_key(table) else {
        return false;
    };
    lines_before_heading.iter().any(|line| line.contains(key.as_str()))
}

impl ContinuationState {
    pub fn assign_page(
        self,
        lines: &[&str],
        headings: &[SectionHeader],
        tables: Vec<TableGrid>,
    ) -> (PageAssignment, ContinuationState) {
        let mut tables = VecDeque::from(tables);
        let mut assignment = PageAssignment::default();

        if let ContinuationState::AwaitingContinuation(open) = &self {
            let continued = take_continued_tables(lines, headings, &mut tables);
            if !continued.is_empty() {
                assignment.continued_tables = continued.len();
                assignment.claims.push(TableClaim {
                    section: open.clone(),
                    tables: continued,
                });
            }
        }

        let mut state = self;

        if headings.is_empty() {
            if let ContinuationState::AwaitingContinuation(open) = &state {
                if !tables.is_empty() {
                    assignment.continued_tables += tables.len();
                    assignment.claims.push(TableClaim {
                        section: open.clone(),
                        tables: tables.drain(..).collect(),
                    });
                }
            }
        }

        let last_index = headings.len().saturating_sub(1);
        for (index, heading) in headings.iter().enumerate() {
            if heading.kind == HeaderKind::ReviewStatus {
                state = ContinuationState::Idle;
                continue;
            }

            let claimed = if index == last_index {
                tables.drain(..).collect()
            } else {
                tables.pop_front().into_iter().collect()
            };

            assignment.claims.push(TableClaim {
                section: heading.name.clone(),
                tables: claimed,
            });
            state = ContinuationState::AwaitingContinuation(heading.name.clone());
        }

        assignment.dropped_tables = tables.len();
        (assignment, state)
    }
}

fn take_continued_tables(
    lines: &[&str],
    headings: &[SectionHeader],
    tables: &mut VecDeque<TableGrid>,
) -> Vec<TableGrid> {
    let first_content = first_content_line_index(lines);
    let boundary = match (headings.first(), first_content) {
        (None, _) => lines.len(),
        (Some(heading), Some(first)) if first < heading.position => heading.position,
        _ => return Vec::new(),
    };

    let window = &lines[..boundary.min(lines.len())];
    let mut continued = Vec::new();
    while let Some(table) = tables.front() {
        if !table_belongs_to_open_section(table, window) {
            break;
        }
        if let Some(table) = tables.pop_front() {
            continued.push(table);
        }
    }

    continued
}
