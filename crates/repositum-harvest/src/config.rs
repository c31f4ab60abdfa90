use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DOMAIN: &str = "https://repositum.tuwien.at";
const SEARCH_URL: &str = "https://repositum.tuwien.at/simple-search?location=theses&query=&crisID=&relationName=&filter_field_1=dateIssued&filter_type_1=equals&filter_value_1=%5B2020+TO+2024%5D&rpp=50&sort_by=bi_sort_2_sort&order=desc&submit_search=Update";

/// Crawl-delay requested by https://repositum.tuwien.at/robots.txt
const CRAWL_DELAY_SECS: u64 = 5;

/// Full-item-record labels kept by the thesis path.
pub const INTERESTING_FIELDS: &[&str] = &[
    "dc.contributor.advisor",
    "dc.contributor.author",
    "dc.date.accessioned",
    "dc.date.issued",
    "dc.date.submitted",
    "dc.identifier.uri",
    "dc.language.iso",
    "dc.subject",
    "cd.title",
    "dc.type",
    "cd.contributor.assistant",
    "tux.publication.orgunit",
    "cd.type.qualificationlevel",
    "dc.identifier.libraryid",
    "dc.description.numberOfPages",
    "dc.thesistype",
    "item.openairetype",
    "item.openaccessfulltext",
    "crisitem.author.dept",
    "crisitem.author.parentorg",
];

/// Harvester configuration, loaded from `~/.config/repositum/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub domain: String,
    pub search_url: String,
    pub handle_path: String,
    pub doi_prefix: String,
    /// Result-table links must start with this path.
    pub link_prefix: String,
    pub crawl_delay_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub interesting_fields: Vec<String>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub links_file: String,
    pub metadata_dir: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            domain: DOMAIN.to_string(),
            search_url: SEARCH_URL.to_string(),
            handle_path: "/handle".to_string(),
            doi_prefix: "/20.500.12708/".to_string(),
            link_prefix: "/handle/".to_string(),
            crawl_delay_secs: CRAWL_DELAY_SECS,
            max_pages: None,
            user_agent: "repositum-harvest/0.1".to_string(),
            timeout_secs: 30,
            interesting_fields: INTERESTING_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            links_file: "thesis_links.txt".to_string(),
            metadata_dir: "metadata".to_string(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl HarvestConfig {
    /// Standard config file path: `~/.config/repositum/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("REPOSITUM_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("repositum")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn crawl_delay(&self) -> Duration {
        Duration::from_secs(self.crawl_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_interesting(&self, label: &str) -> bool {
        self.interesting_fields.iter().any(|f| f == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_targets_repositum() {
        let cfg = HarvestConfig::default();
        assert_eq!(cfg.domain, "https://repositum.tuwien.at");
        assert_eq!(cfg.crawl_delay(), Duration::from_secs(5));
        assert_eq!(cfg.max_pages, None);
        assert_eq!(cfg.interesting_fields.len(), 20);
    }

    #[test]
    fn config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = HarvestConfig::default();
        cfg.crawl_delay_secs = 1;
        cfg.max_pages = Some(3);
        cfg.save_to(&path).unwrap();

        let loaded = HarvestConfig::load_from(&path).unwrap();
        assert_eq!(loaded.crawl_delay_secs, 1);
        assert_eq!(loaded.max_pages, Some(3));
        assert_eq!(loaded.doi_prefix, cfg.doi_prefix);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "crawl_delay_secs = 10\n[output]\nmetadata_dir = \"out\"\n").unwrap();

        let cfg = HarvestConfig::load_from(&path).unwrap();
        assert_eq!(cfg.crawl_delay_secs, 10);
        assert_eq!(cfg.output.metadata_dir, "out");
        assert_eq!(cfg.output.links_file, "thesis_links.txt");
        assert_eq!(cfg.link_prefix, "/handle/");
    }

    #[test]
    fn load_nonexistent_returns_default() {
        let cfg = HarvestConfig::load_from(Path::new("/tmp/nonexistent_repositum_config.toml")).unwrap();
        assert_eq!(cfg.handle_path, "/handle");
    }

    #[test]
    fn interesting_fields_membership() {
        let cfg = HarvestConfig::default();
        assert!(cfg.is_interesting("dc.contributor.advisor"));
        assert!(!cfg.is_interesting("dc.description.abstract"));
    }
}
