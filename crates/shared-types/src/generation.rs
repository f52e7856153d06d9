//! Generation requests, results, and the violations that cross the boundary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::DocumentType;

/// Output format for generated documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
    Text,
}

impl OutputFormat {
    /// Get the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Html => "text/html",
            OutputFormat::Text => "text/plain",
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::Text => "txt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Request to generate a document from a catalog template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub template_id: String,
    /// Untrusted caller values, validated against the template's schema
    #[serde(default)]
    pub variables: HashMap<String, serde_json::Value>,
    /// Falls back to the engine's configured default when absent
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
    #[serde(default)]
    pub include_toc: bool,
    #[serde(default)]
    pub include_metadata: bool,
    /// Opaque label echoed back in metadata
    #[serde(default)]
    pub version: Option<String>,
}

impl GenerationRequest {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            ..Self::default()
        }
    }

    pub fn with_variable(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_toc(mut self) -> Self {
        self.include_toc = true;
        self
    }

    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Machine-readable violation code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    Required,
    InvalidType,
    InvalidOption,
    InvalidQuery,
}

/// A user-correctable problem with one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path, e.g. `variables.company_name`
    pub field: String,
    pub message: String,
    pub code: ViolationCode,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: ViolationCode) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

/// Generation metadata attached when requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub framework: String,
    pub document_type: DocumentType,
    pub word_count: usize,
    pub section_count: usize,
}

/// Result of a generation request
///
/// `success` discriminates the shape: failures carry `errors` only, successes
/// carry `content` plus optional metadata and warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl GenerationResult {
    pub fn success(content: String, format: OutputFormat) -> Self {
        Self {
            success: true,
            content: Some(content),
            format: Some(format),
            mime_type: Some(format.mime_type().to_string()),
            metadata: None,
            errors: vec![],
            warnings: vec![],
        }
    }

    pub fn failure(errors: Vec<FieldViolation>) -> Self {
        Self {
            success: false,
            content: None,
            format: None,
            mime_type: None,
            metadata: None,
            errors,
            warnings: vec![],
        }
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Problem found in a candidate template definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralViolation {
    /// Dotted path into the candidate, e.g. `variableSpecs.scope.options`
    pub path: String,
    pub message: String,
}

impl StructuralViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating a candidate template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    pub valid: bool,
    pub violations: Vec<StructuralViolation>,
    /// Non-fatal findings, e.g. undeclared placeholders
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
