use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Option key forcing a non-blocking index build.
pub const OPTION_BACKGROUND: &str = "background";
/// Option key for unique indices.
pub const OPTION_UNIQUE: &str = "unique";
/// Option key for sparse indices (entries only for documents that have the field).
pub const OPTION_SPARSE: &str = "sparse";
/// Option key carrying the physical index name.
pub const OPTION_NAME: &str = "name";
/// Option key for TTL indices.
pub const OPTION_EXPIRE_AFTER_SECONDS: &str = "expire_after_seconds";

/// A declarative secondary index for one model type.
///
/// Built once from configuration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub model_type: String,
    pub name: String,
    pub keys: Vec<IndexKey>,
    #[serde(default)]
    pub options: IndexOptions,
}

impl IndexSpec {
    /// Creates a spec whose name is derived from its key pattern.
    pub fn new(model_type: &str, keys: Vec<IndexKey>) -> Self {
        Self {
            model_type: model_type.into(),
            name: derive_index_name(&keys),
            keys,
            options: IndexOptions::default(),
        }
    }

    /// Overrides the derived name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: IndexOptions) -> Self {
        self.options = options;
        self
    }
}

/// One component of an index key pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
    pub field: String,
    pub direction: IndexDirection,
}

impl IndexKey {
    /// Shorthand for an ascending key.
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.into(),
            direction: IndexDirection::Ascending,
        }
    }

    /// Shorthand for a descending key.
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.into(),
            direction: IndexDirection::Descending,
        }
    }
}

/// Sort direction of an index key, written as `1` / `-1` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum IndexDirection {
    Ascending,
    Descending,
}

impl IndexDirection {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl TryFrom<i64> for IndexDirection {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascending),
            -1 => Ok(Self::Descending),
            other => Err(format!("index direction must be 1 or -1, got {other}")),
        }
    }
}

impl From<IndexDirection> for i64 {
    fn from(direction: IndexDirection) -> Self {
        direction.as_i64()
    }
}

impl fmt::Display for IndexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Derives the conventional index name from a key pattern: `email_1_created_-1`.
pub fn derive_index_name(keys: &[IndexKey]) -> String {
    keys.iter()
        .map(|k| format!("{}_{}", k.field, k.direction))
        .collect::<Vec<_>>()
        .join("_")
}

/// Engine-specific index flags, kept in configuration order.
///
/// Values stay as raw JSON so backends can interpret options this crate
/// knows nothing about; the typed accessors cover the common flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexOptions(Map<String, Value>);

impl IndexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Sets an option, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads a boolean flag. Absent is `false`; `1` and `0` stand for `true`
    /// and `false`. Any other value is an error rather than a silent `false`.
    pub fn flag(&self, key: &str) -> Result<bool, InvalidFlag> {
        match self.0.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Number(n)) if n.as_i64() == Some(1) => Ok(true),
            Some(Value::Number(n)) if n.as_i64() == Some(0) => Ok(false),
            Some(other) => Err(InvalidFlag {
                option: key.to_string(),
                value: other.clone(),
            }),
        }
    }

    pub fn unique(&self) -> Result<bool, InvalidFlag> {
        self.flag(OPTION_UNIQUE)
    }

    pub fn sparse(&self) -> Result<bool, InvalidFlag> {
        self.flag(OPTION_SPARSE)
    }

    pub fn background(&self) -> Result<bool, InvalidFlag> {
        self.flag(OPTION_BACKGROUND)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(OPTION_NAME).and_then(Value::as_str)
    }

    pub fn expire_after_seconds(&self) -> Option<u64> {
        self.0.get(OPTION_EXPIRE_AFTER_SECONDS).and_then(Value::as_u64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A flag option holding something other than a boolean, `1` or `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidFlag {
    pub option: String,
    pub value: Value,
}

impl fmt::Display for InvalidFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "option '{}' must be true, false, 1 or 0, got {}",
            self.option, self.value
        )
    }
}

impl std::error::Error for InvalidFlag {}
