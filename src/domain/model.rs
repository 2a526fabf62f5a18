use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One raw record as read from a source export: an open mapping with no fixed
/// schema. Field names differ between the two exports and the values can be
/// strings, numbers, null or nested structures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

/// The unified output shape. Every field is serialized even when absent, so a
/// consumer always sees the same seven keys (with `null` where a source had
/// nothing usable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub nom_francais: Option<serde_json::Value>,
    pub hauteur: Option<serde_json::Value>,
    pub circonference: Option<serde_json::Value>,
    pub geo_point_2d: Option<serde_json::Value>,
    pub commune: Option<String>,
    pub code_insee: Option<String>,
    pub nom_latin: Option<String>,
}

/// Unit the source export uses for `hauteur` and `circonference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Meters,
    Centimeters,
}

/// How a source encodes its geography, which decides how `code_insee` is
/// obtained: derived from a free-text arrondissement label (Paris export) or
/// picked verbatim from a `code_insee` field (commune-based exports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geography {
    ParisArrondissement,
    Commune,
}

/// Retain only records whose `field` equals `equals` (string comparison).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub equals: String,
}

impl FieldFilter {
    pub fn matches(&self, record: &Record) -> bool {
        record
            .data
            .get(&self.field)
            .and_then(|v| v.as_str())
            .map(|s| s == self.equals)
            .unwrap_or(false)
    }
}

/// Everything the normalizer needs to know about one source export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub name: String,
    pub path: String,
    pub unit: Unit,
    pub geography: Geography,
    pub filter: Option<FieldFilter>,
}

/// One extracted source: its profile plus the records that survived its
/// filter, in source order.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub profile: DatasetProfile,
    pub records: Vec<Record>,
}
