use crate::error::{ExtractError, ExtractResult};
use crate::model::PageContent;

pub fn parse_page_dump(raw: &[u8]) -> ExtractResult<Vec<PageContent>> {
    serde_json::from_slice::<Vec<PageContent>>(raw)
        .map_err(|error| ExtractError::DocumentDecode(format!("invalid page dump: {error}")))
}
