use crate::task::RecordKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const SOURCE_FIELDS: [&str; 3] = ["source", "predecessor", "from"];
const TARGET_FIELDS: [&str; 3] = ["target", "successor", "to"];

/// A dependency as it arrives from a loader: `source` must finish before `target`.
///
/// Endpoints may be spelled `source`/`target`, `predecessor`/`successor` or
/// `from`/`to`. The spelling the input used is kept and written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct DependencyRecord {
    pub source: Option<RecordKey>,
    pub target: Option<RecordKey>,
    pub label: Option<String>,
    pub extra: Map<String, Value>,
    #[serde(skip)]
    source_field: &'static str,
    #[serde(skip)]
    target_field: &'static str,
}

impl Default for DependencyRecord {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            label: None,
            extra: Map::new(),
            source_field: SOURCE_FIELDS[0],
            target_field: TARGET_FIELDS[0],
        }
    }
}

impl DependencyRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(RecordKey::from(source.into())),
            target: Some(RecordKey::from(target.into())),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Takes the first present spelling out of `object`; later spellings stay in `extra`.
fn take_endpoint(
    object: &mut Map<String, Value>,
    fields: [&'static str; 3],
) -> Result<(Option<RecordKey>, &'static str), serde_json::Error> {
    for field in fields {
        match object.remove(field) {
            None => continue,
            Some(Value::Null) => return Ok((None, field)),
            Some(value) => return Ok((Some(serde_json::from_value(value)?), field)),
        }
    }
    Ok((None, fields[0]))
}

impl TryFrom<Map<String, Value>> for DependencyRecord {
    type Error = serde_json::Error;

    fn try_from(mut object: Map<String, Value>) -> Result<Self, Self::Error> {
        let (source, source_field) = take_endpoint(&mut object, SOURCE_FIELDS)?;
        let (target, target_field) = take_endpoint(&mut object, TARGET_FIELDS)?;
        // Non-string labels are not ours to interpret; they ride along in `extra`.
        let label = match object.remove("label") {
            Some(Value::String(label)) => Some(label),
            Some(Value::Null) | None => None,
            Some(other) => {
                object.insert("label".into(), other);
                None
            }
        };
        Ok(Self {
            source,
            target,
            label,
            extra: object,
            source_field,
            target_field,
        })
    }
}

impl From<DependencyRecord> for Map<String, Value> {
    fn from(record: DependencyRecord) -> Self {
        let mut object = record.extra;
        if let Some(source) = record.source {
            object.insert(record.source_field.into(), source.raw().clone());
        }
        if let Some(target) = record.target {
            object.insert(record.target_field.into(), target.raw().clone());
        }
        if let Some(label) = record.label {
            object.insert("label".into(), Value::String(label));
        }
        object
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub predecessor: String,
    pub successor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_critical: Option<bool>,
}

impl Dependency {
    pub fn new(predecessor: impl Into<String>, successor: impl Into<String>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
            label: None,
            is_critical: None,
        }
    }

    pub fn path_type(&self) -> PathType {
        if self.is_critical == Some(true) {
            PathType::Critical
        } else {
            PathType::Parallel
        }
    }
}

/// How a renderer should draw an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Critical,
    Parallel,
}

impl PathType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathType::Critical => "critical",
            PathType::Parallel => "parallel",
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
