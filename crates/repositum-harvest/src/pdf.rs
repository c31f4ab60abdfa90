use lopdf::Document;

use crate::error::{HarvestError, Result};

/// Text of the first page of a PDF. Empty input gives an empty string.
pub fn first_page_text(pdf: &[u8]) -> Result<String> {
    if pdf.is_empty() {
        return Ok(String::new());
    }

    let document = Document::load_mem(pdf)
        .map_err(|err| HarvestError::PdfExtraction(format!("lopdf failed to open PDF: {err}")))?;
    let Some(first_page) = document.get_pages().keys().next().copied() else {
        return Ok(String::new());
    };

    document.extract_text(&[first_page]).map_err(|err| {
        HarvestError::PdfExtraction(format!(
            "lopdf failed to extract text from page {first_page}: {err}"
        ))
    })
}
