use serde::{Deserialize, Serialize};

/// Name of the persister models use when none is configured.
pub const DEFAULT_PERSISTER: &str = "default";

/// Persistence metadata for a model type: where it lives and which fields it maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    /// Backing collection/table name.
    pub collection: String,
    /// Name of the persister that stores this model.
    pub persister: String,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

impl ModelMetadata {
    /// Metadata stored in a collection named after the type, on the default persister.
    pub fn new(model_type: &str) -> Self {
        Self {
            model_type: model_type.into(),
            collection: model_type.into(),
            persister: DEFAULT_PERSISTER.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_persister(mut self, persister: &str) -> Self {
        self.persister = persister.into();
        self
    }

    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A model field mapped to a storage column/attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: String,
    #[serde(rename = "type", alias = "field_type")]
    pub field_type: FieldType,
}

impl FieldMapping {
    fn simple(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::simple(name, FieldType::Text)
    }

    pub fn integer(name: &str) -> Self {
        Self::simple(name, FieldType::Integer)
    }

    pub fn real(name: &str) -> Self {
        Self::simple(name, FieldType::Real)
    }

    pub fn bool(name: &str) -> Self {
        Self::simple(name, FieldType::Bool)
    }

    pub fn datetime(name: &str) -> Self {
        Self::simple(name, FieldType::DateTime)
    }

    pub fn json(name: &str) -> Self {
        Self::simple(name, FieldType::Json)
    }
}

/// The storage type of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
    Real,
    Bool,
    /// Stored as an RFC 3339 string.
    DateTime,
    /// Stored as serialized JSON text.
    Json,
}

impl FieldType {
    /// SQL column affinity for this type.
    pub fn sql_affinity(self) -> &'static str {
        match self {
            Self::Text | Self::DateTime | Self::Json => "TEXT",
            Self::Integer | Self::Bool => "INTEGER",
            Self::Real => "REAL",
        }
    }
}
