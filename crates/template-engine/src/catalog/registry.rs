//! Immutable template catalog grouped by framework

use std::collections::HashMap;

use shared_types::{TemplateDefinition, VariableKind};

use crate::errors::{CatalogError, EngineError};
use crate::patterns;

/// Templates registered under one framework key, in registration order
#[derive(Debug, Clone)]
struct FrameworkGroup {
    key: String,
    templates: Vec<TemplateDefinition>,
}

/// Read-only collection of template definitions
///
/// Built once by [`CatalogBuilder::build`], which enforces global id
/// uniqueness. Never mutated afterwards, so shared references can be read
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    frameworks: Vec<FrameworkGroup>,
    /// id -> (framework index, position within framework)
    index: HashMap<String, (usize, usize)>,
}

impl TemplateCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Build a catalog from definitions, grouping by each definition's framework
    pub fn from_definitions<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = TemplateDefinition>,
    {
        CatalogBuilder::default().register_all(definitions).build()
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<&TemplateDefinition> {
        self.index
            .get(id)
            .map(|&(group, position)| &self.frameworks[group].templates[position])
    }

    /// Like [`lookup_by_id`](Self::lookup_by_id) but surfaces `TemplateNotFound`
    pub fn get(&self, id: &str) -> Result<&TemplateDefinition, EngineError> {
        self.lookup_by_id(id)
            .ok_or_else(|| EngineError::TemplateNotFound(id.to_string()))
    }

    /// Templates of one framework in definition order; empty for unknown keys
    pub fn by_framework(&self, key: &str) -> &[TemplateDefinition] {
        self.frameworks
            .iter()
            .find(|group| group.key == key)
            .map(|group| group.templates.as_slice())
            .unwrap_or(&[])
    }

    /// All templates: framework registration order, then definition order
    pub fn all(&self) -> impl Iterator<Item = &TemplateDefinition> + '_ {
        self.frameworks.iter().flat_map(|group| group.templates.iter())
    }

    /// Framework keys in registration order
    pub fn frameworks(&self) -> impl Iterator<Item = &str> + '_ {
        self.frameworks.iter().map(|group| group.key.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Collects definitions and validates them into a [`TemplateCatalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    definitions: Vec<TemplateDefinition>,
    strict_placeholders: bool,
}

impl CatalogBuilder {
    pub fn register(mut self, definition: TemplateDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn register_all<I>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = TemplateDefinition>,
    {
        self.definitions.extend(definitions);
        self
    }

    /// Reject bodies that reference placeholders with no declared variable
    pub fn strict_placeholders(mut self, strict: bool) -> Self {
        self.strict_placeholders = strict;
        self
    }

    /// Validate and freeze the catalog, failing on the first integrity violation
    pub fn build(self) -> Result<TemplateCatalog, CatalogError> {
        let mut frameworks: Vec<FrameworkGroup> = Vec::new();
        let mut index: HashMap<String, (usize, usize)> = HashMap::new();

        for definition in self.definitions {
            check_definition(&definition, self.strict_placeholders)?;

            if let Some(&(group, _)) = index.get(&definition.id) {
                return Err(CatalogError::DuplicateId {
                    id: definition.id,
                    first_framework: frameworks[group].key.clone(),
                    second_framework: definition.framework,
                });
            }

            let group = match frameworks.iter().position(|g| g.key == definition.framework) {
                Some(group) => group,
                None => {
                    frameworks.push(FrameworkGroup {
                        key: definition.framework.clone(),
                        templates: Vec::new(),
                    });
                    frameworks.len() - 1
                }
            };

            let position = frameworks[group].templates.len();
            index.insert(definition.id.clone(), (group, position));
            frameworks[group].templates.push(definition);
        }

        tracing::info!(
            "Template catalog initialized with {} templates across {} frameworks",
            index.len(),
            frameworks.len()
        );

        Ok(TemplateCatalog { frameworks, index })
    }
}

fn check_definition(definition: &TemplateDefinition, strict: bool) -> Result<(), CatalogError> {
    for (name, spec) in &definition.variable_specs {
        if let VariableKind::Select { options } = &spec.kind {
            if options.is_empty() {
                return Err(CatalogError::EmptySelectOptions {
                    template_id: definition.id.clone(),
                    variable: name.clone(),
                });
            }
        }
    }

    if strict {
        let undeclared: Vec<String> = patterns::placeholders(&definition.body_text)
            .into_iter()
            .filter(|name| !definition.variable_specs.contains_key(name))
            .collect();
        if !undeclared.is_empty() {
            return Err(CatalogError::UndeclaredPlaceholders {
                template_id: definition.id.clone(),
                placeholders: undeclared,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared_types::{DocumentType, VariableSpec};
    use std::collections::BTreeMap;

    pub(crate) fn template(id: &str, framework: &str, priority: i64) -> TemplateDefinition {
        TemplateDefinition {
            id: id.to_string(),
            title: format!("{} title", id),
            description: String::new(),
            framework: framework.to_string(),
            category: "governance".to_string(),
            priority,
            document_type: DocumentType::Policy,
            required: false,
            body_text: format!("# {}", id),
            variable_specs: BTreeMap::new(),
        }
    }

    #[test]
    fn test_all_preserves_registration_order() {
        let catalog = TemplateCatalog::from_definitions(vec![
            template("a1", "alpha", 1),
            template("b1", "beta", 1),
            template("a2", "alpha", 2),
        ])
        .unwrap();

        let ids: Vec<_> = catalog.all().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(catalog.frameworks().collect::<Vec<_>>(), vec!["alpha", "beta"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_duplicate_id_across_frameworks_fails_at_construction() {
        let result = TemplateCatalog::from_definitions(vec![
            template("shared", "alpha", 1),
            template("shared", "beta", 1),
        ]);

        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateId {
                id: "shared".to_string(),
                first_framework: "alpha".to_string(),
                second_framework: "beta".to_string(),
            }
        );
    }

    #[test]
    fn test_lookup_and_by_framework() {
        let catalog = TemplateCatalog::from_definitions(vec![
            template("a1", "alpha", 1),
            template("b1", "beta", 1),
        ])
        .unwrap();

        assert_eq!(catalog.lookup_by_id("b1").map(|t| t.framework.as_str()), Some("beta"));
        assert!(catalog.lookup_by_id("missing").is_none());
        assert!(matches!(
            catalog.get("missing"),
            Err(EngineError::TemplateNotFound(id)) if id == "missing"
        ));
        assert_eq!(catalog.by_framework("alpha").len(), 1);
        assert!(catalog.by_framework("gamma").is_empty());
    }

    #[test]
    fn test_select_without_options_is_integrity_violation() {
        let mut bad = template("bad", "alpha", 1);
        bad.variable_specs.insert(
            "cycle".to_string(),
            VariableSpec::select("Cycle", Vec::<String>::new()),
        );

        assert_eq!(
            TemplateCatalog::from_definitions(vec![bad]).unwrap_err(),
            CatalogError::EmptySelectOptions {
                template_id: "bad".to_string(),
                variable: "cycle".to_string(),
            }
        );
    }

    #[test]
    fn test_strict_placeholders_only_when_enabled() {
        let mut loose = template("loose", "alpha", 1);
        loose.body_text = "Owner: {{owner}}".to_string();

        assert!(TemplateCatalog::builder()
            .register(loose.clone())
            .build()
            .is_ok());

        let err = TemplateCatalog::builder()
            .register(loose)
            .strict_placeholders(true)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UndeclaredPlaceholders { placeholders, .. }
                if placeholders == vec!["owner".to_string()]
        ));
    }
}
