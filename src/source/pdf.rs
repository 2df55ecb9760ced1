use lopdf::Document;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};

struct PdfDocument {
    document: Document,
}

impl PdfDocument {
    fn from_bytes(bytes: &[u8]) -> ExtractResult<Self> {
        if bytes.is_empty() {
            return Err(ExtractError::DocumentDecode("empty payload".to_string()));
        }
        let document = Document::load_mem(bytes)?;
        Ok(Self { document })
    }

    fn page_texts(&self) -> ExtractResult<Vec<String>> {
        self.document
            .get_pages()
            .keys()
            .map(|page_number| {
                self.document
                    .extract_text(&[*page_number])
                    .map_err(|error| {
                        ExtractError::DocumentDecode(format!(
                            "failed to extract text from page {page_number}: {error}"
                        ))
                    })
            })
            .collect()
    }
}

pub fn decode_page_texts(bytes: &[u8]) -> ExtractResult<Vec<String>> {
    let document = PdfDocument::from_bytes(bytes)?;
    let pages = document.page_texts();
    drop(document);

    let pages = pages?;
    debug!(pages = pages.len(), "decoded pdf text layer");
    Ok(pages)
}
