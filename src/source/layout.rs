use std::path::Path;
use std::process::Command;

use regex::Regex;
use tracing::debug;

use super::LineRole;
use crate::error::{ExtractError, ExtractResult};
use crate::model::TableGrid;

const COLUMN_SLACK: usize = 2;

pub fn extract_layout_pages(pdf_path: &Path) -> ExtractResult<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .map_err(|error| {
            ExtractError::DocumentDecode(format!(
                "failed to execute pdftotext for {}: {error}",
                pdf_path.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::DocumentDecode(format!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    debug!(path = %pdf_path.display(), pages = pages.len(), "extracted layout pages");
    Ok(pages)
}

#[derive(Debug, Default)]
struct OpenTable {
    rows: TableGrid,
    value_column: usize,
}

pub struct LayoutTableReader {
    segment: Regex,
}

impl LayoutTableReader {
    pub fn new() -> ExtractResult<Self> {
        Ok(Self {
            segment: Regex::new(r"\S+(?: \S+)*")?,
        })
    }

    pub fn tables(&self, page: &str, role: impl Fn(&str) -> LineRole) -> Vec<TableGrid> {
        let mut tables = Vec::new();
        let mut open: Option<OpenTable> = None;
        let mut suppressed = false;

        for line in page.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match role(trimmed) {
                LineRole::Boundary => {
                    close_table(&mut open, &mut tables);
                    suppressed = false;
                    continue;
                }
                LineRole::TextOnlyHeading => {
                    close_table(&mut open, &mut tables);
                    suppressed = true;
                    continue;
                }
                LineRole::Content if suppressed => continue,
                LineRole::Content => {}
            }

            let segments = self.segments(line);
            if segments.len() >= 2 {
                let value = segments[1..]
                    .iter()
                    .map(|(_, text)| *text)
                    .collect::<Vec<&str>>()
                    .join(" ");
                let table = open.get_or_insert_with(OpenTable::default);
                table.value_column = segments[1].0;
                table
                    .rows
                    .push(vec![Some(segments[0].1.to_string()), Some(value)]);
                continue;
            }

            let (Some(&(column, text)), Some(table)) = (segments.first(), open.as_mut()) else {
                continue;
            };

            if column + COLUMN_SLACK >= table.value_column {
                if let Some(row) = table.rows.last_mut() {
                    append_wrapped(row, text);
                }
            } else {
                table.rows.push(vec![Some(text.to_string()), None]);
            }
        }

        close_table(&mut open, &mut tables);
        tables
    }

    fn segments<'a>(&self, line: &'a str) -> Vec<(usize, &'a str)> {
        self.segment
            .find_iter(line)
            .map(|found| (line[..found.start()].chars().count(), found.as_str()))
            .collect()
    }
}

fn append_wrapped(row: &mut Vec<Option<String>>, text: &str) {
    if row.len() < 2 {
        row.resize(2, None);
    }
    let value = row[1].get_or_insert_with(String::new);
    if !value.is_empty() {
        value.push('\n');
    }
    value.push_str(text);
}

fn close_table(open: &mut Option<OpenTable>, tables: &mut Vec<TableGrid>) {
    if let Some(table) = open.take() {
        if !table.rows.is_empty() {
            tables.push(table.rows);
        }
    }
}
