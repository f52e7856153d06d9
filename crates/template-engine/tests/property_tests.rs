//! Property-based tests for the template engine
//!
//! Covers rendering determinism, exhaustive substitution, tolerance of
//! undeclared input, and query filtering/sort stability using proptest.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use shared_types::{
    DocumentType, GenerationRequest, QuerySpec, SortBy, SortOrder, TemplateDefinition,
    VariableSpec,
};
use template_engine::render::render;
use template_engine::{DocumentEngine, TemplateCatalog, VariableSchema};

// ============================================================
// Strategies
// ============================================================

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

/// Plain text that cannot form a placeholder token
fn filler() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,\n#-]{0,20}"
}

/// Non-blank replacement values free of braces
fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,15}"
}

fn definition(id: String, priority: i64, required: bool, category: &str) -> TemplateDefinition {
    TemplateDefinition {
        id,
        title: format!("Title {}", priority),
        description: String::new(),
        framework: "prop".to_string(),
        category: category.to_string(),
        priority,
        document_type: DocumentType::Policy,
        required,
        body_text: "# Body".to_string(),
        variable_specs: BTreeMap::new(),
    }
}

fn catalog_strategy() -> impl Strategy<Value = TemplateCatalog> {
    prop::collection::vec((0i64..4, any::<bool>(), prop::sample::select(vec!["a", "b"])), 1..12)
        .prop_map(|entries| {
            let definitions = entries
                .into_iter()
                .enumerate()
                .map(|(i, (priority, required, category))| {
                    definition(format!("t{}", i), priority, required, category)
                });
            TemplateCatalog::from_definitions(definitions).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================================
    // Rendering
    // ============================================================

    #[test]
    fn rendering_is_idempotent(
        name in identifier(),
        val in value(),
        parts in prop::collection::vec(filler(), 1..5),
    ) {
        let body = parts.join(&format!("{{{{{}}}}}", name));
        let mut specs = BTreeMap::new();
        specs.insert(name.clone(), VariableSpec::text("Field").required());
        let raw: HashMap<_, _> = [(name.clone(), json!(val))].into_iter().collect();
        let variables = VariableSchema::compile(&specs).validate(&raw).unwrap();

        let first = render(&body, &specs, &variables);
        let second = render(&body, &specs, &variables);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn substitution_is_exhaustive(
        name in identifier(),
        val in value(),
        parts in prop::collection::vec(filler(), 2..6),
    ) {
        let token = format!("{{{{{}}}}}", name);
        let body = parts.join(&token);

        let mut specs = BTreeMap::new();
        specs.insert(name.clone(), VariableSpec::text("Field"));
        let raw: HashMap<_, _> = [(name.clone(), json!(val))].into_iter().collect();
        let variables = VariableSchema::compile(&specs).validate(&raw).unwrap();

        let output = render(&body, &specs, &variables);
        prop_assert!(!output.content.contains(&token));
        prop_assert_eq!(output.content, parts.join(&val));
    }

    #[test]
    fn undeclared_placeholders_never_fail(
        name in identifier(),
        parts in prop::collection::vec(filler(), 2..4),
    ) {
        let body = parts.join(&format!("{{{{{}}}}}", name));
        let output = render(&body, &BTreeMap::new(), &BTreeMap::new());
        prop_assert_eq!(output.content, parts.join("[TO BE COMPLETED]"));
    }

    #[test]
    fn extra_fields_are_ignored(extra_key in "zz_[a-z]{1,8}", extra_value in "[A-Z]{12}") {
        let template = TemplateDefinition {
            body_text: "Owner: {{owner}}".to_string(),
            variable_specs: [("owner".to_string(), VariableSpec::text("Owner").required())]
                .into_iter()
                .collect(),
            ..definition("owned".to_string(), 1, true, "a")
        };
        let engine = DocumentEngine::new(Arc::new(
            TemplateCatalog::from_definitions(vec![template]).unwrap(),
        ));

        let result = engine
            .generate_document(
                &GenerationRequest::new("owned")
                    .with_variable("owner", "Security")
                    .with_variable(extra_key, extra_value.clone()),
            )
            .unwrap();

        prop_assert!(result.success);
        let content = result.content.unwrap();
        prop_assert!(!content.contains(&extra_value));
        prop_assert_eq!(content, "Owner: Security");
    }

    // ============================================================
    // Querying
    // ============================================================

    #[test]
    fn required_only_returns_only_required(catalog in catalog_strategy()) {
        let engine = DocumentEngine::new(Arc::new(catalog));
        let results = engine.list_templates(Some(&QuerySpec::default().required_only()));
        prop_assert!(results.iter().all(|t| t.required));
        let expected = engine.catalog().all().filter(|t| t.required).count();
        prop_assert_eq!(results.len(), expected);
    }

    #[test]
    fn priority_sort_is_stable(catalog in catalog_strategy(), descending in any::<bool>()) {
        let order = if descending { SortOrder::Desc } else { SortOrder::Asc };
        let engine = DocumentEngine::new(Arc::new(catalog));
        let spec = QuerySpec::default().sort(SortBy::Priority, order);
        let results = engine.list_templates(Some(&spec));

        let position: HashMap<&str, usize> = engine
            .catalog()
            .all()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        for pair in results.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if descending {
                prop_assert!(a.priority >= b.priority);
            } else {
                prop_assert!(a.priority <= b.priority);
            }
            if a.priority == b.priority {
                prop_assert!(position[a.id.as_str()] < position[b.id.as_str()]);
            }
        }
    }

    #[test]
    fn filters_are_conjunctive(
        catalog in catalog_strategy(),
        category in prop::sample::select(vec!["a", "b"]),
    ) {
        let engine = DocumentEngine::new(Arc::new(catalog));
        let spec = QuerySpec::default().category(category).required_only();
        let results = engine.list_templates(Some(&spec));
        prop_assert!(results.iter().all(|t| t.required && t.category == category));
    }
}
