//! Core schema model for Modlr.
//!
//! Defines the plain data contracts shared by the schema tooling:
//! - [`IndexSpec`]: a declarative secondary index (model type, ordered keys, options)
//! - [`IndexOptions`]: engine-specific flags such as `unique`, `sparse`, `background`
//! - [`ModelMetadata`]: where a model type is persisted and which fields it maps
//!
//! These types carry no behavior beyond construction and lookup. Reconciliation
//! lives in `modlr-schema`, concrete storage engines in `modlr-storage`.

mod index;
mod metadata;

pub use index::{
    derive_index_name, IndexDirection, IndexKey, IndexOptions, IndexSpec, InvalidFlag,
    OPTION_BACKGROUND,
    OPTION_EXPIRE_AFTER_SECONDS, OPTION_NAME, OPTION_SPARSE, OPTION_UNIQUE,
};
pub use metadata::{FieldMapping, FieldType, ModelMetadata, DEFAULT_PERSISTER};
