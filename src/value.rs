use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

/// A parsed JSON document.
///
/// Maps keep the order their keys appeared in the source text. Keys are
/// unique: when the source repeats a key, the entry stays at its first
/// position and holds the last value, which is how the parser resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<JsonValue>),
    Map(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn kind(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::List(_) => "list",
            JsonValue::Map(_) => "map",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, JsonValue::List(_) | JsonValue::Map(_))
    }

    /// Number of direct children, `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            JsonValue::List(items) => Some(items.len()),
            JsonValue::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Looks up a direct child. List elements are addressed by their
    /// stringified zero-based index.
    pub fn child(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::List(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            JsonValue::Map(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => JsonValue::Number(n),
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(items) => {
                JsonValue::List(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(map) => JsonValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, JsonValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(n) => n.serialize(serializer),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
