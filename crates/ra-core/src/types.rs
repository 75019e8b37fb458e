//! Typed view of an analysis report.
//!
//! Only the fields the adjuster reads are typed; everything else rides along
//! in `extra` maps and is written back verbatim.

use crate::error::{ReportError, Result};
use indexmap::IndexMap;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const REST_API: &str = "rest_api";
pub const FUNCTIONS: &str = "functions";

/// category -> rule type -> flows, in report order
pub type FlowsArtifacts = IndexMap<String, IndexMap<String, Vec<Flow>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub file_path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self { file_path: file_path.into(), extra: Map::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestApiArtifact {
    pub location: Location,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArtifact {
    pub code_ref: Location,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A discovered code element, keyed on `artifact_type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    RestApi(RestApiArtifact),
    Functions(FunctionArtifact),
    /// Any other artifact type, kept untouched (including its `artifact_type`).
    Other(Map<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind<'a> {
    RestApi,
    Functions,
    Other(&'a str),
}

impl Artifact {
    pub fn rest_api(file_path: impl Into<String>) -> Self {
        Self::RestApi(RestApiArtifact { location: Location::new(file_path), extra: Map::new() })
    }

    pub fn function(file_path: impl Into<String>) -> Self {
        Self::Functions(FunctionArtifact { code_ref: Location::new(file_path), extra: Map::new() })
    }

    pub fn kind(&self) -> ArtifactKind<'_> {
        match self {
            Self::RestApi(_) => ArtifactKind::RestApi,
            Self::Functions(_) => ArtifactKind::Functions,
            Self::Other(map) => {
                ArtifactKind::Other(map.get("artifact_type").and_then(Value::as_str).unwrap_or(""))
            }
        }
    }

    /// `location.file_path` of a REST endpoint.
    pub fn endpoint_path(&self) -> Option<&str> {
        match self {
            Self::RestApi(a) => Some(a.location.file_path.as_str()),
            _ => None,
        }
    }

    /// `code_ref.file_path` of a function.
    pub fn code_ref_path(&self) -> Option<&str> {
        match self {
            Self::Functions(a) => Some(a.code_ref.file_path.as_str()),
            _ => None,
        }
    }

    pub fn from_value(value: Value, at: &str) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ReportError::schema(at, "artifact is not an object"));
        };
        let artifact_type = match map.get("artifact_type") {
            Some(Value::String(t)) => t.clone(),
            Some(_) => return Err(ReportError::schema(at, "artifact_type is not a string")),
            None => return Err(ReportError::schema(at, "missing field `artifact_type`")),
        };
        let typed = |map: Map<String, Value>| {
            let mut map = map;
            map.remove("artifact_type");
            Value::Object(map)
        };
        match artifact_type.as_str() {
            REST_API => serde_json::from_value(typed(map))
                .map(Self::RestApi)
                .map_err(|e| ReportError::schema(at, e.to_string())),
            FUNCTIONS => serde_json::from_value(typed(map))
                .map(Self::Functions)
                .map_err(|e| ReportError::schema(at, e.to_string())),
            _ => Ok(Self::Other(map)),
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        let (tag, inner) = match self {
            Self::RestApi(a) => (REST_API, serde_json::to_value(a)?),
            Self::Functions(a) => (FUNCTIONS, serde_json::to_value(a)?),
            Self::Other(map) => return Ok(Value::Object(map.clone())),
        };
        let mut map = Map::new();
        map.insert("artifact_type".into(), Value::String(tag.into()));
        if let Value::Object(fields) = inner {
            map.extend(fields);
        }
        Ok(Value::Object(map))
    }
}

impl Serialize for Artifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().map_err(S::Error::custom)?.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub location: Location,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PathStep {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self { location: Location::new(file_path), extra: Map::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSource {
    pub location: Location,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetadata {
    pub source: FlowSource,
    /// Alternative step sequences from source to sink.
    pub paths: Vec<Vec<PathStep>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recorded taint path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub metadata: FlowMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Flow {
    pub fn new(source_path: impl Into<String>, paths: Vec<Vec<PathStep>>) -> Self {
        Self {
            metadata: FlowMetadata {
                source: FlowSource { location: Location::new(source_path), extra: Map::new() },
                paths,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn source_path(&self) -> &str {
        &self.metadata.source.location.file_path
    }

    /// Source path first, then every step of every path-variant in order.
    pub fn file_paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source_path()).chain(
            self.metadata
                .paths
                .iter()
                .flatten()
                .map(|step| step.location.file_path.as_str()),
        )
    }

    pub fn longest_variant(&self) -> usize {
        self.metadata.paths.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A JSON field that may be absent, explicitly `null`, or set.
///
/// Absent fields stay absent and `null` stays `null` when written back.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a raw slot, leaving absence and `null` untouched.
    fn from_slot(slot: Option<Value>, convert: impl FnOnce(Value) -> Result<T>) -> Result<Self> {
        match slot {
            None => Ok(Self::Absent),
            Some(Value::Null) => Ok(Self::Null),
            Some(v) => convert(v).map(Self::Present),
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Present(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Present(v) => v.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct FlowsResult {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub flows_artifacts: Field<FlowsArtifacts>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Results {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub artifacts: Field<Vec<Artifact>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub flows_result: Field<FlowsResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Results {
    /// Artifacts in report order; empty when the field is absent or `null`.
    pub fn artifacts(&self) -> &[Artifact] {
        self.artifacts.as_ref().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A fully decoded report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub status: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub failure_reason: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub engines: Field<Vec<String>>,
    /// Always `false` or absent once decoded.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub compressed: Field<bool>,
    pub results: Results,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_metadata: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Report {
    /// Build the typed report from decoded JSON, naming the first structural mismatch.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(ReportError::schema("$", "report is not an object"));
        };

        let compressed = Field::from_slot(root.remove("compressed"), |v| match v {
            Value::Bool(false) => Ok(false),
            Value::Bool(true) => Err(ReportError::schema("compressed", "report must be decoded first")),
            _ => Err(ReportError::schema("compressed", "expected a boolean")),
        })?;
        let status = Field::from_slot(root.remove("status"), |v| string_value(v, "status"))?;
        let failure_reason =
            Field::from_slot(root.remove("failure_reason"), |v| string_value(v, "failure_reason"))?;
        let engines = Field::from_slot(root.remove("engines"), |v| {
            serde_json::from_value(v).map_err(|e| ReportError::schema("engines", e.to_string()))
        })?;
        let results = match root.remove("results") {
            Some(v) => Results::from_value(v)?,
            None => return Err(ReportError::schema("results", "missing field `results`")),
        };
        let project_metadata = root.remove("project_metadata");

        Ok(Self {
            status,
            failure_reason,
            engines,
            compressed,
            results,
            project_metadata,
            extra: root,
        })
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(String::as_str)
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_ref().map(String::as_str)
    }

    pub fn engines(&self) -> &[String] {
        self.engines.as_ref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn flows_artifacts(&self) -> Option<&FlowsArtifacts> {
        self.results.flows_result.as_ref().and_then(|r| r.flows_artifacts.as_ref())
    }
}

impl Results {
    fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(ReportError::schema("results", "expected an object"));
        };

        let artifacts = Field::from_slot(map.remove("artifacts"), |v| match v {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| Artifact::from_value(v, &format!("results.artifacts[{i}]")))
                .collect::<Result<Vec<_>>>(),
            _ => Err(ReportError::schema("results.artifacts", "expected an array")),
        })?;
        let flows_result = Field::from_slot(map.remove("flows_result"), FlowsResult::from_value)?;

        Ok(Self { artifacts, flows_result, extra: map })
    }
}

impl FlowsResult {
    fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(ReportError::schema("results.flows_result", "expected an object"));
        };
        let flows_artifacts =
            Field::from_slot(map.remove("flows_artifacts"), flows_artifacts_from_value)?;
        Ok(Self { flows_artifacts, extra: map })
    }
}

fn flows_artifacts_from_value(value: Value) -> Result<FlowsArtifacts> {
    let Value::Object(categories) = value else {
        return Err(ReportError::schema("results.flows_result.flows_artifacts", "expected an object"));
    };

    let mut flows_artifacts = FlowsArtifacts::new();
    for (category, rules) in categories {
        let at = format!("results.flows_result.flows_artifacts.{category}");
        let Value::Object(rules) = rules else {
            return Err(ReportError::schema(at, "expected an object"));
        };
        let mut by_rule = IndexMap::new();
        for (rule_type, flows) in rules {
            let at = format!("{at}.{rule_type}");
            let Value::Array(flows) = flows else {
                return Err(ReportError::schema(at, "expected an array"));
            };
            let flows = flows
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    serde_json::from_value::<Flow>(v)
                        .map_err(|e| ReportError::schema(format!("{at}[{i}]"), e.to_string()))
                })
                .collect::<Result<Vec<_>>>()?;
            by_rule.insert(rule_type, flows);
        }
        flows_artifacts.insert(category, by_rule);
    }
    Ok(flows_artifacts)
}

fn string_value(value: Value, key: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ReportError::schema(key, "expected a string")),
    }
}
