//! Pure HTML extraction over repositum (DSpace-CRIS) pages.
//!
//! Nothing in here performs I/O: every function takes an already parsed
//! document or element and returns owned data, so callers can drop the
//! `Html` tree before awaiting the next request.

pub mod fields;
pub mod item;
pub mod metrics;
pub mod pdf_link;
pub mod search;

use scraper::{ElementRef, Selector};

use crate::error::{HarvestError, Result};

pub use fields::FieldExtractor;
pub use metrics::{Metrics, extract_metrics};
pub use pdf_link::locate_pdf_link;

pub(crate) fn parse_selector(input: &str) -> Result<Selector> {
    Selector::parse(input).map_err(|e| HarvestError::Selector(format!("{input}: {e}")))
}

/// All text below `el`, concatenated and trimmed.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
