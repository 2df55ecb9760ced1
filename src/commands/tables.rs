use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use crate::cli::{PageSource, TablesArgs};
use crate::extract::{ExtractOptions, Extractor, HeaderKind, is_noise_line};
use crate::model::{ExtractionManifest, PageContent};
use crate::source::{LayoutTableReader, LineRole, extract_layout_pages, parse_page_dump};
use crate::util::{
    default_csv_path, now_utc_string, sha256_file, write_json_pretty, write_observations_csv,
};

pub fn run(args: TablesArgs) -> Result<()> {
    let span = info_span!("table_extract", input = %args.input.display());
    let extractor = Extractor::new(ExtractOptions::default(), span)?;

    let source = resolve_source(&args.input, args.source);
    info!(input = %args.input.display(), source = source.as_str(), "starting table extraction");

    let pages = match source {
        PageSource::PageDump => load_page_dump(&args.input)?,
        _ => load_pdf_pages(&args.input, &extractor)?,
    };

    let mut warnings = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        if page.text.trim().is_empty() && !page.tables.is_empty() {
            warn!(page = index + 1, "page has tables but no text; headings cannot be placed");
            warnings.push(format!("page {} has tables but no text", index + 1));
        }
    }

    let extraction = extractor.extract_pages(&pages);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_csv_path(&args.input));
    write_observations_csv(&output_path, &extraction.observations)?;

    info!(path = %output_path.display(), "wrote extracted observations");
    info!(rows = extraction.observations.len(), "extracted data points");

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ExtractionManifest {
            manifest_version: 1,
            generated_at: now_utc_string(),
            mode: "tables".to_string(),
            source_path: args.input.display().to_string(),
            source_sha256: sha256_file(&args.input)?,
            page_count: pages.len(),
            section_count: extraction.section_count,
            observation_count: extraction.observations.len(),
            output_path: Some(output_path.display().to_string()),
            warnings,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote extraction manifest");
    }

    Ok(())
}

fn resolve_source(input: &Path, requested: PageSource) -> PageSource {
    if requested != PageSource::Auto {
        return requested;
    }

    let is_json = input
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        PageSource::PageDump
    } else {
        PageSource::Pdf
    }
}

fn load_page_dump(input: &Path) -> Result<Vec<PageContent>> {
    let raw = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let pages = parse_page_dump(&raw)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    Ok(pages)
}

fn load_pdf_pages(input: &Path, extractor: &Extractor) -> Result<Vec<PageContent>> {
    let layout_pages = extract_layout_pages(input)
        .with_context(|| format!("failed to extract pages from {}", input.display()))?;
    let reader = LayoutTableReader::new()?;

    let role = |line: &str| {
        if is_noise_line(line) {
            return LineRole::Boundary;
        }
        match extractor.page_heading_kind(line) {
            Some(HeaderKind::ReviewStatus) => LineRole::TextOnlyHeading,
            Some(_) => LineRole::Boundary,
            None => LineRole::Content,
        }
    };

    Ok(layout_pages
        .into_iter()
        .map(|text| {
            let tables = reader.tables(&text, role);
            PageContent { text, tables }
        })
        .collect())
}
