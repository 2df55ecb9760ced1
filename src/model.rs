use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "Observation Name")]
    pub name: String,
    #[serde(rename = "Observation Subdetail")]
    pub subdetail: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl Observation {
    pub fn new(
        name: impl Into<String>,
        subdetail: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subdetail: subdetail.into(),
            value: value.into(),
        }
    }
}

pub type TableGrid = Vec<Vec<Option<String>>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tables: Vec<TableGrid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub mode: String,
    pub source_path: String,
    pub source_sha256: String,
    pub page_count: usize,
    pub section_count: usize,
    pub observation_count: usize,
    pub output_path: Option<String>,
    pub warnings: Vec<String>,
}
