use std::collections::HashSet;

use super::{
    ExtractOptions, PROJECT_INFORMATION, PhotoFieldPolicy, REQUIRED_PHOTO_FIELDS, SITE_PHOTO,
};
use crate::model::Observation;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Shape {
    ProjectInfo,
    SitePhoto,
    DashList,
    GenericKv,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::ProjectInfo => "project_info",
            Shape::SitePhoto => "site_photo",
            Shape::DashList => "dash_list",
            Shape::GenericKv => "generic_kv",
        }
    }
}

pub fn classify(name: &str, lines: &[String]) -> Shape {
    if name == PROJECT_INFORMATION {
        return Shape::ProjectInfo;
    }
    if name.contains(SITE_PHOTO) {
        return Shape::SitePhoto;
    }
    if lines.iter().any(|line| line.starts_with('-')) {
        return Shape::DashList;
    }
    Shape::GenericKv
}

pub fn extract_block(
    shape: Shape,
    name: &str,
    lines: &[String],
    options: ExtractOptions,
) -> Vec<Observation> {
    match shape {
        Shape::ProjectInfo => extract_project_info(lines),
        Shape::SitePhoto => extract_site_photo(name, lines, options.photo_fields),
        Shape::DashList => extract_dash_list(name, lines),
        Shape::GenericKv => extract_generic_kv(name, lines),
    }
}

fn extract_project_info(lines: &[String]) -> Vec<Observation> {
    lines
        .iter()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| Observation::new(PROJECT_INFORMATION, key.trim(), value.trim()))
        .collect()
}

fn extract_site_photo(name: &str, lines: &[String], policy: PhotoFieldPolicy) -> Vec<Observation> {
    let mut observations = vec![Observation::new(name, SITE_PHOTO, "image")];

    let mut index = 0usize;
    while index < lines.len() {
        let label = lines[index].as_str();
        if REQUIRED_PHOTO_FIELDS.contains(&label) {
            if let Some(value) = lines.get(index + 1) {
                observations.push(Observation::new(name, label, value.as_str()));
                index += 2;
                continue;
            }
        }
        index += 1;
    }

    match policy {
        PhotoFieldPolicy::Synthesize => complete_photo_fields(name, observations),
        PhotoFieldPolicy::Observed => observations,
    }
}

pub fn complete_photo_fields(name: &str, observations: Vec<Observation>) -> Vec<Observation> {
    let present = observations
        .iter()
        .map(|observation| observation.subdetail.clone())
        .collect::<HashSet<String>>();

    let missing = REQUIRED_PHOTO_FIELDS
        .into_iter()
        .filter(|field| !present.contains(*field))
        .map(|field| Observation::new(name, field, ""))
        .collect::<Vec<Observation>>();

    observations.into_iter().chain(missing).collect()
}

#[derive(Debug)]
struct DashItem {
    text: String,
    continuation: Vec<String>,
}

impl DashItem {
    fn value(&self) -> String {
        if self.continuation.is_empty() {
            return self.text.clone();
        }
        format!("{} {}", self.text, self.continuation.join(" "))
    }
}

fn extract_dash_list(name: &str, lines: &[String]) -> Vec<Observation> {
    let items = lines.iter().fold(Vec::<DashItem>::new(), |mut items, line| {
        if line.starts_with('-') {
            items.push(DashItem {
                text: line
                    .trim_start_matches(|character: char| character == '-' || character == ' ')
                    .trim()
                    .to_string(),
                continuation: Vec::new(),
            });
        } else if let Some(last) = items.last_mut() {
            last.continuation.push(line.clone());
        }
        items
    });

    items
        .iter()
        .map(|item| Observation::new(name, "-", item.value()))
        .collect()
}

#[derive(Debug)]
enum KvLine<'a> {
    Field { label: &'a str, value: &'a str },
    Text(&'a str),
}

fn extract_generic_kv(name: &str, lines: &[String]) -> Vec<Observation> {
    let mut observations = Vec::new();
    let mut open: Option<(&str, Vec<&str>)> = None;

    for line in lines {
        let parsed = match line.split_once(':') {
            Some((label, value)) => KvLine::Field {
                label: label.trim(),
                value: value.trim(),
            },
            None => KvLine::Text(line.as_str()),
        };

        match parsed {
            KvLine::Field { label, value } => {
                if let Some((previous, values)) = open.replace((label, vec![value])) {
                    observations.push(Observation::new(name, previous, values.join(", ")));
                }
            }
            KvLine::Text(text) => match open.as_mut() {
                Some((_, values)) => values.push(text),
                None => observations.push(Observation::new(name, "", text)),
            },
        }
    }

    if let Some((label, values)) = open {
        observations.push(Observation::new(name, label, values.join(", ")));
    }

    observations
}
