use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, info_span};

use crate::cli::TextArgs;
use crate::extract::{ExtractOptions, Extraction, Extractor};
use crate::model::{ExtractionManifest, Observation};
use crate::source::decode_page_texts;
use crate::util::{now_utc_string, sha256_bytes, write_json_pretty};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn run(args: TextArgs) -> Result<()> {
    let extraction = match extract_observations(&args) {
        Ok(extraction) => extraction,
        Err(err) => {
            let response = ErrorResponse {
                error: format!("{err:#}"),
            };
            if let Err(write_err) = write_response(&args, &response) {
                error!(error = %write_err, "failed to write error response");
            }
            return Err(err);
        }
    };

    write_response(&args, &extraction.observations)?;
    info!(
        observations = extraction.observations.len(),
        sections = extraction.section_count,
        "text extraction completed"
    );
    Ok(())
}

fn extract_observations(args: &TextArgs) -> Result<Extraction> {
    let span = info_span!("text_extract", input = %args.input.display());

    let payload = read_payload(&args.input)?;
    let (text, page_count) = if args.plain_text {
        let text = String::from_utf8(payload.clone())
            .with_context(|| format!("input is not UTF-8 text: {}", args.input.display()))?;
        (text, 1)
    } else {
        let pages = decode_page_texts(&payload)
            .with_context(|| format!("failed to decode {}", args.input.display()))?;
        (pages.join("\n"), pages.len())
    };

    let options = ExtractOptions {
        photo_fields: args.photo_fields.into(),
    };
    let extractor = Extractor::new(options, span)?;
    let extraction = extractor.extract_text(&text);

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = build_manifest(args, &payload, page_count, &extraction);
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote extraction manifest");
    }

    Ok(extraction)
}

fn read_payload(input: &Path) -> Result<Vec<u8>> {
    if input == Path::new("-") {
        let mut payload = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut payload)
            .context("failed to read payload from stdin")?;
        return Ok(payload);
    }

    fs::read(input).with_context(|| format!("failed to read {}", input.display()))
}

fn write_response<T: Serialize + ?Sized>(args: &TextArgs, value: &T) -> Result<()> {
    let mut output: BufWriter<Box<dyn Write>> = match &args.output {
        Some(path) => BufWriter::new(Box::new(
            File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => BufWriter::new(Box::new(io::stdout().lock())),
    };

    let serialized = if args.pretty {
        serde_json::to_writer_pretty(&mut output, value)
    } else {
        serde_json::to_writer(&mut output, value)
    };
    serialized.context("failed to serialize json response")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn build_manifest(
    args: &TextArgs,
    payload: &[u8],
    page_count: usize,
    extraction: &Extraction,
) -> ExtractionManifest {
    ExtractionManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        mode: "text".to_string(),
        source_path: args.input.display().to_string(),
        source_sha256: sha256_bytes(payload),
        page_count,
        section_count: extraction.section_count,
        observation_count: extraction.observations.len(),
        output_path: args.output.as_ref().map(|path| path.display().to_string()),
        warnings: empty_value_warnings(&extraction.observations),
    }
}

fn empty_value_warnings(observations: &[Observation]) -> Vec<String> {
    let empty = observations
        .iter()
        .filter(|observation| observation.value.is_empty())
        .count();
    if empty == 0 {
        return Vec::new();
    }
    vec![format!("{empty} observations have an empty value")]
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::PhotoFields;

    fn text_args(input: PathBuf, output: PathBuf, manifest_path: Option<PathBuf>) -> TextArgs {
        TextArgs {
            input,
            output: Some(output),
            pretty: false,
            plain_text: true,
            photo_fields: PhotoFields::Synthesize,
            manifest_path,
        }
    }

    #[test]
    fn writes_observations_and_manifest() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("report.txt");
        let output = dir.path().join("observations.json");
        let manifest = dir.path().join("manifest.json");
        fs::write(&input, "F_Roof (1)\nCondition: Good\n").expect("input written");

        run(text_args(input, output.clone(), Some(manifest.clone()))).expect("extraction runs");

        let written = fs::read_to_string(&output).expect("output readable");
        assert_eq!(
            written,
            concat!(
                r#"[{"Observation Name":"F_Roof (1)","Observation Subdetail":"Condition","Value":"Good"}]"#,
                "\n"
            )
        );
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&manifest).expect("manifest readable"))
                .expect("manifest is json");
        assert_eq!(manifest["mode"], "text");
        assert_eq!(manifest["observation_count"], 1);
    }

    #[test]
    fn manifest_failure_yields_only_error_payload() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("report.txt");
        let output = dir.path().join("observations.json");
        let blocker = dir.path().join("blocker");
        fs::write(&input, "F_Roof (1)\nCondition: Good\n").expect("input written");
        fs::write(&blocker, "not a directory").expect("blocker written");

        let result = run(text_args(
            input,
            output.clone(),
            Some(blocker.join("manifest.json")),
        ));

        assert!(result.is_err());
        let written = fs::read_to_string(&output).expect("output readable");
        let response: serde_json::Value =
            serde_json::from_str(&written).expect("single json document");
        assert!(response["error"].is_string());
        assert!(!written.contains("Observation Name"));
    }
}
