//! Plain-file output: a link list and one JSON document per item.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{PageOutcome, ResourceId};

/// Writes one link per line.
pub fn save_links(path: &Path, links: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut contents = String::new();
    for link in links {
        contents.push_str(link);
        contents.push('\n');
    }
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn load_links(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Writes `{dir}/{id}.json`, pretty-printed. Sentinel outcomes are stored as
/// a bare JSON string.
pub fn write_outcome(dir: &Path, id: ResourceId, outcome: &PageOutcome) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{id}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(outcome)?)?;
    Ok(path)
}
