//! Repositum harvest: thesis metadata, metrics, PDF links and degree names
//! scraped from the TU Wien repository.

pub mod config;
pub mod degree;
pub mod error;
pub mod extract;
pub mod harvester;
pub mod http;
pub mod pdf;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::HarvestConfig;
pub use degree::{AnchorPair, DEFAULT_ANCHORS, extract_degree};
pub use error::{HarvestError, Result};
pub use harvester::{BatchSummary, Harvester};
pub use types::{Absence, MetadataRecord, PageOutcome, Rejection, ResourceId};
