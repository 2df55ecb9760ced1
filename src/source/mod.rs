mod dump;
mod layout;
mod pdf;

pub use dump::parse_page_dump;
pub use layout::{LayoutTableReader, extract_layout_pages};
pub use pdf::decode_page_texts;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineRole {
    Content,
    Boundary,
    TextOnlyHeading,
}
