use scraper::{ElementRef, Selector};

use crate::error::Result;
use crate::extract::{element_text, parse_selector};
use crate::types::MetadataRecord;

const LABEL_SELECTOR: &str = "div.metadataFieldLabel";
const VALUE_SELECTOR: &str = "div.metadataFieldValue";

/// Reads label/value pairs out of `div.row.metadata-row` style rows.
pub struct FieldExtractor {
    label: Selector,
    value: Selector,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            label: parse_selector(LABEL_SELECTOR)?,
            value: parse_selector(VALUE_SELECTOR)?,
        })
    }

    /// Builds a record from `rows`, keeping only labels accepted by `keep`.
    ///
    /// Rows lacking a label or a value element are skipped. A label seen
    /// again has its value appended, never replaced.
    pub fn extract<'a, I, F>(&self, rows: I, keep: F) -> MetadataRecord
    where
        I: IntoIterator<Item = ElementRef<'a>>,
        F: Fn(&str) -> bool,
    {
        let mut record = MetadataRecord::new();
        for row in rows {
            let (Some(label), Some(value)) = (
                row.select(&self.label).next(),
                row.select(&self.value).next(),
            ) else {
                continue;
            };

            let label = element_text(&label);
            if !keep(&label) {
                continue;
            }
            record.append(&label, &element_text(&value));
        }
        record
    }

    pub fn extract_all<'a, I>(&self, rows: I) -> MetadataRecord
    where
        I: IntoIterator<Item = ElementRef<'a>>,
    {
        self.extract(rows, |_| true)
    }
}
