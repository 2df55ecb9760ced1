use super::normalize::is_noise_line;
use super::{REVIEW_LABELS, REVIEW_SECTION};
use crate::model::{Observation, PageContent};

pub fn extract_review_block(body: &str) -> Vec<Observation> {
    let mut observations = Vec::new();
    let mut pending: Option<&str> = None;

    for line in body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_noise_line(line))
    {
        if REVIEW_LABELS.contains(&line) {
            pending = Some(line);
            continue;
        }

        if let Some(label) = pending.take() {
            observations.push(Observation::new(REVIEW_SECTION, label, line));
        }
    }

    observations
}

pub fn review_status_from_pages(pages: &[PageContent]) -> Option<String> {
    let page = pages.iter().find(|page| page.text.contains(REVIEW_SECTION))?;

    let line = page.text.lines().find(|line| {
        line.trim().starts_with(REVIEW_LABELS[0]) && !line.contains("Acknowledgment")
    })?;

    let (_, rest) = line.split_once(REVIEW_LABELS[0])?;
    let value = rest.trim().trim_start_matches(':').trim();
    if value.is_empty() {
        return None;
    }

    Some(value.to_string())
}
