//! Document engine: the functional surface consumed by route handlers and tools
//!
//! Every operation is a pure function over an immutable catalog snapshot plus
//! request-scoped input, so one engine can serve concurrent callers without
//! locking.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use shared_types::{
    GenerationRequest, GenerationResult, QuerySpec, StructuralReport, TemplateDefinition,
    VariableSpec,
};

use crate::catalog::{CatalogHandle, TemplateCatalog};
use crate::compose;
use crate::config::GenerationConfig;
use crate::errors::EngineError;
use crate::query::{self, QueryResult};
use crate::render;
use crate::schema::{self, VariableSchema};
use crate::structural;

#[derive(Debug, Clone)]
pub struct DocumentEngine {
    catalog: Arc<TemplateCatalog>,
    settings: GenerationConfig,
}

impl DocumentEngine {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self::with_settings(catalog, GenerationConfig::default())
    }

    pub fn with_settings(catalog: Arc<TemplateCatalog>, settings: GenerationConfig) -> Self {
        Self { catalog, settings }
    }

    /// Engine over the catalog a handle is serving right now
    ///
    /// The engine keeps that snapshot even if the handle is replaced later.
    pub fn from_handle(handle: &CatalogHandle, settings: GenerationConfig) -> Self {
        Self::with_settings(handle.snapshot(), settings)
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// List templates, filtered and sorted by `query` when given
    pub fn list_templates(&self, query: Option<&QuerySpec>) -> Vec<&TemplateDefinition> {
        match query {
            Some(spec) => query::query(&self.catalog, spec),
            None => query::query(&self.catalog, &QuerySpec::default()),
        }
    }

    /// List templates from an untyped query, reporting malformed input
    pub fn list_templates_value(&self, raw: &Value) -> QueryResult<'_> {
        query::query_value(&self.catalog, raw)
    }

    pub fn get_template(&self, id: &str) -> Result<&TemplateDefinition, EngineError> {
        self.catalog.get(id)
    }

    pub fn get_variable_schema(
        &self,
        id: &str,
    ) -> Result<&BTreeMap<String, VariableSpec>, EngineError> {
        Ok(&self.catalog.get(id)?.variable_specs)
    }

    /// JSON-Schema-style form description for a template's variables
    pub fn get_variable_schema_json(&self, id: &str) -> Result<Value, EngineError> {
        Ok(schema::schema_json(self.get_variable_schema(id)?))
    }

    /// Validate, render, and compose a document
    ///
    /// Only an unknown template id is an `Err`. Variable violations come back
    /// as a failed [`GenerationResult`].
    pub fn generate_document(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, EngineError> {
        let template = self.catalog.get(&request.template_id)?;
        tracing::debug!(
            "Generating '{}' ({} variables supplied)",
            template.id,
            request.variables.len()
        );

        let variables = match VariableSchema::compile(&template.variable_specs)
            .validate(&request.variables)
        {
            Ok(variables) => variables,
            Err(violations) => {
                tracing::warn!(
                    "Rejected generation of '{}': {} variable violations",
                    template.id,
                    violations.len()
                );
                return Ok(GenerationResult::failure(violations));
            }
        };

        let rendered = render::render(&template.body_text, &template.variable_specs, &variables);
        for warning in &rendered.warnings {
            tracing::warn!("{}: {}", template.id, warning);
        }

        let metadata = request.include_metadata.then(|| {
            let version = request
                .version
                .as_deref()
                .unwrap_or(&self.settings.default_version);
            compose::metadata(template, &rendered.content, version)
        });

        let document = if request.include_toc {
            compose::with_table_of_contents(&rendered.content)
        } else {
            rendered.content
        };

        let format = request.output_format.unwrap_or(self.settings.default_format);
        let mut result = GenerationResult::success(render::convert(&document, format), format)
            .with_warnings(rendered.warnings);
        if let Some(metadata) = metadata {
            result = result.with_metadata(metadata);
        }
        Ok(result)
    }

    /// Check a candidate template's shape before it may join a catalog
    pub fn validate_candidate_template(&self, candidate: &Value) -> StructuralReport {
        structural::validate_candidate(&self.catalog, candidate)
    }

    /// Validate and parse a candidate template
    pub fn admit_candidate_template(
        &self,
        candidate: &Value,
    ) -> Result<TemplateDefinition, StructuralReport> {
        structural::admit_candidate(&self.catalog, candidate)
    }
}
