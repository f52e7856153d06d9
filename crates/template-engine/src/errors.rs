//! Error types for catalog construction and engine operations

use thiserror::Error;

/// Integrity problems found while building a catalog
///
/// These indicate corrupted source data and are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate template id '{id}' (frameworks '{first_framework}' and '{second_framework}')")]
    DuplicateId {
        id: String,
        first_framework: String,
        second_framework: String,
    },

    #[error("Template '{template_id}' variable '{variable}' is a select with no options")]
    EmptySelectOptions { template_id: String, variable: String },

    #[error("Template '{template_id}' references undeclared placeholders: {}", .placeholders.join(", "))]
    UndeclaredPlaceholders {
        template_id: String,
        placeholders: Vec<String>,
    },
}

/// Errors surfaced directly to callers of the engine
///
/// Per-request validation problems are returned as data, never as this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
}
