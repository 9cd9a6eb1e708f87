//! Document identity and the on-disk JSON encoding.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Reserved field carrying the document id inside every stored body.
pub const ID_FIELD: &str = "_id";

/// File extension of document files.
pub const DOCUMENT_EXTENSION: &str = "json";

/// A document body: an ordered mapping from field name to JSON value.
pub type Fields = Map<String, Value>;

/// Unique identifier assigned to a document at write time (UUID v4).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the document this id names, e.g. `<id>.json`.
    pub fn file_name(&self) -> String {
        format!("{}.{DOCUMENT_EXTENSION}", self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert a caller value into a document body.
///
/// Returns `Ok(None)` when the value encodes to JSON `null`, which callers
/// treat as "no value supplied".
pub(crate) fn to_fields<T: Serialize + ?Sized>(value: &T) -> StoreResult<Option<Fields>> {
    match serde_json::to_value(value) {
        Ok(Value::Null) => Ok(None),
        Ok(Value::Object(fields)) => Ok(Some(fields)),
        Ok(other) => Err(StoreError::Serialization(format!(
            "document must be a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

/// Encode a document body as tab-indented JSON with a trailing newline.
pub(crate) fn encode(fields: &Fields) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    fields
        .serialize(&mut ser)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    buf.write_all(b"\n")?;
    Ok(buf)
}

/// Decode a stored document body. `what` names the source in errors.
pub(crate) fn decode(bytes: &[u8], what: &str) -> StoreResult<Fields> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::decode(what, e))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
