use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::{HarvestError, Result};

/// Upper bound (exclusive) of the repository's numeric id space.
pub const ID_SPACE_CAP: i64 = 300_000;

pub const VIEWS_KEY: &str = "Views";
pub const DOWNLOADS_KEY: &str = "Downloads";
pub const PDF_LINK_KEY: &str = "PDF link";

const FIELD_SEPARATOR: &str = ", ";

// ─── MetadataRecord ───────────────────────────────────────────────────────────

/// Label → value pairs in document order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    fields: Vec<(String, String)>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value`, or appends it to an existing value as `", value"`.
    pub fn append(&mut self, label: &str, value: &str) {
        match self.fields.iter_mut().find(|(l, _)| l == label) {
            Some((_, existing)) => {
                existing.push_str(FIELD_SEPARATOR);
                existing.push_str(value);
            }
            None => self.fields.push((label.to_string(), value.to_string())),
        }
    }

    /// Sets a fixed key, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(l, _)| l == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for MetadataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, value) in &self.fields {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

// ─── ResourceId ───────────────────────────────────────────────────────────────

/// Numeric item id, the last path segment of a repositum handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(u32);

impl ResourceId {
    pub fn new(id: i64) -> Result<Self> {
        if id < 0 {
            return Err(HarvestError::InvalidArgument(format!(
                "id must be a non-negative integer, got {id}"
            )));
        }
        if id >= ID_SPACE_CAP {
            return Err(HarvestError::InvalidArgument(format!(
                "id must be less than {ID_SPACE_CAP}, got {id}"
            )));
        }
        Ok(Self(id as u32))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// `{domain}{handle_path}{doi_prefix}{id}?mode=full`
    pub fn full_mode_url(self, domain: &str, handle_path: &str, doi_prefix: &str) -> String {
        format!("{domain}{handle_path}{doi_prefix}{}?mode=full", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── PageOutcome ──────────────────────────────────────────────────────────────

/// Anticipated structural gaps on an item page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    WrapperMissing,
    RowContainerMissing,
    NoMetadataRows,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrapperMissing => f.write_str("No wrapperDisplayItem found"),
            Self::RowContainerMissing => f.write_str("No row class found"),
            Self::NoMetadataRows => f.write_str("No metadata rows found"),
        }
    }
}

/// The repository refused to serve the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Status(u16),
    InvalidIdentifier,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "Negative response: {code}"),
            Self::InvalidIdentifier => f.write_str("Invalid Identifier"),
        }
    }
}

/// Result of scraping one item page. Only `Record` carries fields; the other
/// variants render (and serialize) as their sentinel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Record(MetadataRecord),
    NotFound(Absence),
    Invalid(Rejection),
}

impl PageOutcome {
    pub fn record(&self) -> Option<&MetadataRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<MetadataRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn sentinel(&self) -> Option<String> {
        match self {
            Self::Record(_) => None,
            Self::NotFound(absence) => Some(absence.to_string()),
            Self::Invalid(rejection) => Some(rejection.to_string()),
        }
    }
}

impl Serialize for PageOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::NotFound(absence) => serializer.collect_str(absence),
            Self::Invalid(rejection) => serializer.collect_str(rejection),
        }
    }
}
