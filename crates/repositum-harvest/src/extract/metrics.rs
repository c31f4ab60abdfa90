use scraper::ElementRef;

use crate::error::Result;
use crate::extract::{element_text, parse_selector};

pub const PANEL_NOT_FOUND: &str = "Panel not found";
pub const VIEWS_NOT_FOUND: &str = "Views not found";
pub const DOWNLOADS_NOT_FOUND: &str = "Downloads not found";

/// View and download counters exactly as rendered (e.g. `"1,234"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub views: String,
    pub downloads: String,
}

/// Reads the counters from the `div.panel-list-right` side panel.
///
/// Without a panel both values are [`PANEL_NOT_FOUND`]; with a panel each
/// missing counter falls back to its own message.
pub fn extract_metrics(region: ElementRef<'_>) -> Result<Metrics> {
    let panel_selector = parse_selector("div.panel-list-right")?;
    let Some(panel) = region.select(&panel_selector).next() else {
        return Ok(Metrics {
            views: PANEL_NOT_FOUND.to_string(),
            downloads: PANEL_NOT_FOUND.to_string(),
        });
    };

    let views = counter(panel, "span#metric-counter-view")?
        .unwrap_or_else(|| VIEWS_NOT_FOUND.to_string());
    let downloads = counter(panel, "span#metric-counter-download")?
        .unwrap_or_else(|| DOWNLOADS_NOT_FOUND.to_string());
    Ok(Metrics { views, downloads })
}

fn counter(panel: ElementRef<'_>, selector: &str) -> Result<Option<String>> {
    let selector = parse_selector(selector)?;
    Ok(panel.select(&selector).next().map(|el| element_text(&el)))
}
