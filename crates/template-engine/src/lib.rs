//! Document template rendering and validation engine
//!
//! This crate turns a catalog of parameterized compliance document templates
//! into rendered drafts:
//! - Catalog construction with global id uniqueness (fails fast at startup)
//! - Per-template variable validation with complete violation lists
//! - Deterministic `{{placeholder}}` substitution with fallback markers
//! - Optional table of contents and generation metadata
//! - Structural validation of candidate templates on the authoring path
//! - Filtering and stable sorting over the catalog
//!
//! Nothing here performs I/O after the catalog is built, so a single
//! [`DocumentEngine`] can be shared across threads freely.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod engine;
pub mod errors;
pub mod patterns;
pub mod query;
pub mod render;
pub mod schema;
pub mod structural;

pub use catalog::{builtin_catalog, CatalogBuilder, CatalogHandle, TemplateCatalog};
pub use config::EngineConfig;
pub use engine::DocumentEngine;
pub use errors::{CatalogError, EngineError};
pub use query::QueryResult;
pub use render::RenderOutput;
pub use schema::{NormalizedVariables, VariableSchema, VariableValue};
