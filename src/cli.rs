use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::extract::PhotoFieldPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "inspection-extract",
    version,
    about = "Extract observation triples from inspection report PDFs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Text-layer extraction; writes a JSON array of observations.
    Text(TextArgs),
    /// Table-layout extraction; writes `<input-stem>_extracted.csv`.
    Tables(TablesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// PDF payload to read, or `-` for stdin.
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Treat the input as already-extracted page text instead of a PDF.
    #[arg(long, default_value_t = false)]
    pub plain_text: bool,

    #[arg(long, value_enum, default_value_t = PhotoFields::Synthesize)]
    pub photo_fields: PhotoFields,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TablesArgs {
    /// PDF file, or a JSON page dump from an external table extractor.
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = PageSource::Auto)]
    pub source: PageSource,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PhotoFields {
    Synthesize,
    Observed,
}

impl From<PhotoFields> for PhotoFieldPolicy {
    fn from(value: PhotoFields) -> Self {
        match value {
            PhotoFields::Synthesize => PhotoFieldPolicy::Synthesize,
            PhotoFields::Observed => PhotoFieldPolicy::Observed,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PageSource {
    /// `.json` inputs are page dumps, everything else is a PDF.
    Auto,
    Pdf,
    PageDump,
}

impl PageSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pdf => "pdf",
            Self::PageDump => "page_dump",
        }
    }
}
