//! Domain types shared by the OneVizion client, the uploader and the sync module.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModuleError;

/// Field name → value mapping sent to / received from the record service.
pub type FieldMap = Map<String, Value>;

/// Equality filters for a trackor read. Ordered so query strings are stable.
pub type Filters = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier of a single trackor (record) in OneVizion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackorId(pub i64);

impl fmt::Display for TrackorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for TrackorId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Name of the trackor type (record namespace) a client is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackorType(pub String);

impl fmt::Display for TrackorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TrackorType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TrackorType {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Access parameters
// ---------------------------------------------------------------------------

/// Connection parameters for the OneVizion instance.
///
/// `host` never carries a protocol prefix nor leading/trailing slashes.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessParameters {
    pub host: String,
    pub access_key: String,
    pub secret_key: String,
}

impl AccessParameters {
    /// Strip an anchored `http://` / `https://` prefix and surrounding `/`
    /// from `url`; credentials pass through unchanged.
    pub fn normalize(
        url: &str,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        let without_protocol = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        Self {
            host: without_protocol.trim_matches('/').to_owned(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Value of the `Authorization` header for token authentication.
    pub fn bearer_token(&self) -> String {
        format!("Bearer {}:{}", self.access_key, self.secret_key)
    }
}

impl fmt::Debug for AccessParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessParameters")
            .field("host", &self.host)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Trackor rows
// ---------------------------------------------------------------------------

/// Content of an EFile field: the file body and its optional name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileField {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// One row returned by a trackor read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trackor {
    #[serde(rename = "TRACKOR_ID")]
    pub id: TrackorId,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl Trackor {
    /// Extract the file stored in `field`.
    ///
    /// Absent, `null` and empty values yield `Ok(None)`. The error detail
    /// names the field only; file content is never copied into it.
    pub fn file(&self, field: &str) -> Result<Option<FileField>, ModuleError> {
        let map = match self.fields.get(field) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
            Some(Value::String(s)) if s.is_empty() => return Ok(None),
            Some(Value::Array(items)) if items.is_empty() => return Ok(None),
            Some(Value::Object(map)) if map.is_empty() => return Ok(None),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ModuleError::new(
                    "Failed to read file field",
                    format!(
                        "trackor_id={}, field={field}, unexpected {} value",
                        self.id,
                        value_kind(other)
                    ),
                ))
            }
        };

        let data = map.get("data").and_then(Value::as_str).ok_or_else(|| {
            ModuleError::new(
                "Failed to read file field",
                format!("trackor_id={}, field={field}, missing string `data`", self.id),
            )
        })?;
        let file_name = map
            .get("file_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        Ok(Some(FileField {
            data: data.to_owned(),
            file_name,
        }))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Update payload
// ---------------------------------------------------------------------------

/// Fields written back after a successful upload: flag cleared, file id set.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePayload {
    fields: FieldMap,
}

impl UpdatePayload {
    pub const CLEARED_FLAG: &'static str = "0";

    pub fn new(load_flag_field: &str, file_id_field: &str, file_id: impl Into<String>) -> Self {
        let mut fields = FieldMap::new();
        fields.insert(
            load_flag_field.to_owned(),
            Value::String(Self::CLEARED_FLAG.to_owned()),
        );
        fields.insert(file_id_field.to_owned(), Value::String(file_id.into()));
        Self { fields }
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn into_fields(self) -> FieldMap {
        self.fields
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
