pub mod generation;
pub mod query;
pub mod types;

pub use generation::{
    DocumentMetadata, FieldViolation, GenerationRequest, GenerationResult, OutputFormat,
    StructuralReport, StructuralViolation, ViolationCode,
};
pub use query::{QuerySpec, SortBy, SortOrder};
pub use types::{DocumentType, TemplateDefinition, VariableKind, VariableSpec};
