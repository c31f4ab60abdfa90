use scraper::ElementRef;

use crate::error::{HarvestError, Result};
use crate::extract::parse_selector;

pub const NO_BITSTREAM_GRID: &str = "No bitstream grid found";

/// Href of the first link in the `div.item-bitstream-grid-bitstream-type` grid.
///
/// `Ok(None)` when the grid is absent. A grid without a link is unexpected
/// and reported as [`HarvestError::MissingElement`].
pub fn locate_pdf_link(region: ElementRef<'_>) -> Result<Option<String>> {
    let grid_selector = parse_selector("div.item-bitstream-grid-bitstream-type")?;
    let link_selector = parse_selector("a")?;

    let Some(grid) = region.select(&grid_selector).next() else {
        return Ok(None);
    };
    grid.select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| Some(href.to_string()))
        .ok_or_else(|| HarvestError::MissingElement("link in bitstream grid".to_string()))
}
