use regex::Regex;
use tracing::{Span, debug, info};

use crate::error::ExtractResult;
use crate::model::{Observation, PageContent};

mod locate;
mod merge;
mod normalize;
mod review;
mod shape;
mod stitch;
mod table_mode;
#[cfg(test)]
mod tests;

pub use locate::HeaderKind;
pub use merge::merge_multiline_value;
pub use normalize::{is_noise_line, normalize_text};
pub use shape::Shape;

pub const PROJECT_INFORMATION: &str = "Project Information";
pub const REVIEW_SECTION: &str = "Review Status and Acknowledgment";
pub const SITE_PHOTO: &str = "Site Photo";
pub const END_SENTINEL: &str = "__END__";

pub const REQUIRED_PHOTO_FIELDS: [&str; 4] = [
    "Photo Description",
    "Condition",
    "General Observation",
    "Action Item",
];

pub const REVIEW_LABELS: [&str; 4] = [
    "Review Status",
    "Acknowledgment",
    "Inspector",
    "Inspector Phone Number",
];

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PhotoFieldPolicy {
    #[default]
    Synthesize,
    Observed,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtractOptions {
    pub photo_fields: PhotoFieldPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub observations: Vec<Observation>,
    pub section_count: usize,
}

pub(crate) struct Patterns {
    text_header: Regex,
    table_heading: Regex,
    table_site_photo: Regex,
    project_block: Regex,
    review_block: Regex,
}

impl Patterns {
    fn new() -> ExtractResult<Self> {
        Ok(Self {
            text_header: Regex::new(r"^([A-Z]_[^\n:]+?(?: \(\d+\))?):?$")?,
            table_heading: Regex::new(r"^[A-Z]_[\w\s\(\)&]+:?$")?,
            table_site_photo: Regex::new(r"^[A-Z]_Site Photo \(\d+\)$")?,
            project_block: Regex::new(r"(?s)Project Information\s*(.*?)\n\n")?,
            review_block: Regex::new(
                r"(?s)Review Status and Acknowledgment\s*(.*?)(?:Date Submitted:|$)",
            )?,
        })
    }
}

pub struct Extractor {
    patterns: Patterns,
    options: ExtractOptions,
    span: Span,
}

impl Extractor {
    pub fn new(options: ExtractOptions, span: Span) -> ExtractResult<Self> {
        Ok(Self {
            patterns: Patterns::new()?,
            options,
            span,
        })
    }

    pub fn extract_text(&self, raw_text: &str) -> Extraction {
        let _entered = self.span.enter();
        let text = normalize_text(raw_text);

        let mut observations = self.project_information(&text);

        let headers = locate::locate_sections(&text, &self.patterns);
        debug!(headers = headers.len(), "located section headers");

        let mut section_count = 0usize;
        for block in locate::section_blocks(&text, &headers) {
            if block.kind != HeaderKind::Lettered {
                continue;
            }

            let lines = normalize::block_lines(block.body, block.name);
            if lines.is_empty() {
                debug!(section = %block.name, "empty section block dropped");
                continue;
            }

            let shape = shape::classify(block.name, &lines);
            let extracted = shape::extract_block(shape, block.name, &lines, self.options);
            debug!(
                section = %block.name,
                shape = shape.as_str(),
                observations = extracted.len(),
                "extracted section"
            );
            section_count += 1;
            observations.extend(extracted);
        }

        if let Some(captures) = self.patterns.review_block.captures(&text) {
            let body = captures.get(1).map(|value| value.as_str()).unwrap_or_default();
            let extracted = review::extract_review_block(body);
            debug!(observations = extracted.len(), "extracted review block");
            observations.extend(extracted);
        }

        info!(
            sections = section_count,
            observations = observations.len(),
            "text extraction complete"
        );

        Extraction {
            observations,
            section_count,
        }
    }

    pub fn extract_pages(&self, pages: &[PageContent]) -> Extraction {
        let _entered = self.span.enter();
        let extraction = table_mode::extract_pages(pages, &self.patterns);
        info!(
            pages = pages.len(),
            sections = extraction.section_count,
            observations = extraction.observations.len(),
            "table extraction complete"
        );
        extraction
    }

    pub fn page_heading_kind(&self, line: &str) -> Option<HeaderKind> {
        locate::page_heading(line, &self.patterns).map(|(_, kind)| kind)
    }

    fn project_information(&self, text: &str) -> Vec<Observation> {
        let Some(captures) = self.patterns.project_block.captures(text) else {
            debug!("no project information block");
            return Vec::new();
        };

        let body = captures.get(1).map(|value| value.as_str()).unwrap_or_default();
        let lines = body.lines().map(str::to_string).collect::<Vec<String>>();
        shape::extract_block(Shape::ProjectInfo, PROJECT_INFORMATION, &lines, self.options)
    }
}
