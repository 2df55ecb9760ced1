use super::normalize::is_noise_line;
use super::{END_SENTINEL, PROJECT_INFORMATION, Patterns, REVIEW_SECTION};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HeaderKind {
    Lettered,
    ProjectInformation,
    ReviewStatus,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub position: usize,
    pub name: String,
    pub kind: HeaderKind,
}

#[derive(Debug)]
pub struct SectionBlock<'a> {
    pub name: &'a str,
    pub kind: HeaderKind,
    pub body: &'a str,
}

pub fn locate_sections(text: &str, patterns: &Patterns) -> Vec<SectionHeader> {
    let mut headers = Vec::new();
    let mut offset = 0usize;

    for raw_line in text.split_inclusive('\n') {
        let line = raw_line.strip_suffix('\n').unwrap_or(raw_line);
        if let Some((name, kind)) = classify_text_header(line, patterns) {
            headers.push(SectionHeader {
                position: offset,
                name,
                kind,
            });
        }
        offset += raw_line.len();
    }

    headers.push(SectionHeader {
        position: text.len(),
        name: END_SENTINEL.to_string(),
        kind: HeaderKind::End,
    });

    headers
}

fn classify_text_header(line: &str, patterns: &Patterns) -> Option<(String, HeaderKind)> {
    if let Some(captures) = patterns.text_header.captures(line) {
        let name = captures.get(1)?.as_str().trim().to_string();
        return Some((name, HeaderKind::Lettered));
    }

    let trimmed = line.trim();
    if trimmed == PROJECT_INFORMATION {
        return Some((PROJECT_INFORMATION.to_string(), HeaderKind::ProjectInformation));
    }
    if trimmed.starts_with(REVIEW_SECTION) {
        return Some((REVIEW_SECTION.to_string(), HeaderKind::ReviewStatus));
    }

    None
}

pub fn section_blocks<'a>(
    text: &'a str,
    headers: &'a [SectionHeader],
) -> impl Iterator<Item = SectionBlock<'a>> + 'a {
    headers.windows(2).map(move |pair| SectionBlock {
        name: pair[0].name.as_str(),
        kind: pair[0].kind,
        body: &text[pair[0].position..pair[1].position],
    })
}

pub fn locate_page_headings(lines: &[&str], patterns: &Patterns) -> Vec<SectionHeader> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            page_heading(line, patterns).map(|(name, kind)| SectionHeader {
                position: index,
                name,
                kind,
            })
        })
        .collect()
}

pub fn page_heading(line: &str, patterns: &Patterns) -> Option<(String, HeaderKind)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_noise_line(trimmed) {
        return None;
    }

    if trimmed == PROJECT_INFORMATION {
        Some((PROJECT_INFORMATION.to_string(), HeaderKind::ProjectInformation))
    } else if patterns.table_heading.is_match(trimmed) {
        Some((trimmed.trim_end_matches(':').to_string(), HeaderKind::Lettered))
    } else if trimmed.starts_with(REVIEW_SECTION) {
        Some((REVIEW_SECTION.to_string(), HeaderKind::ReviewStatus))
    } else {
        None
    }
}
