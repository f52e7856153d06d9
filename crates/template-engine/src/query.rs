//! Read-only filtering and sorting over the catalog

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};

use shared_types::{
    DocumentType, FieldViolation, QuerySpec, SortBy, SortOrder, TemplateDefinition, ViolationCode,
};

use crate::catalog::TemplateCatalog;

const QUERY_KEYS: [&str; 6] = [
    "framework",
    "category",
    "documentType",
    "requiredOnly",
    "sortBy",
    "sortOrder",
];

/// Query outcome at the untyped boundary
///
/// `templates` is empty whenever `violations` is not.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a> {
    pub templates: Vec<&'a TemplateDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

/// Filter and sort catalog templates
///
/// Filters are conjunctive. The sort is stable and `Desc` reverses the
/// comparison, so equal entries keep their catalog order either way.
pub fn query<'a>(catalog: &'a TemplateCatalog, spec: &QuerySpec) -> Vec<&'a TemplateDefinition> {
    let source: Box<dyn Iterator<Item = &'a TemplateDefinition> + 'a> = match &spec.framework {
        Some(framework) => Box::new(catalog.by_framework(framework).iter()),
        None => Box::new(catalog.all()),
    };

    let mut results: Vec<&TemplateDefinition> = source
        .filter(|t| spec.category.as_ref().map_or(true, |c| &t.category == c))
        .filter(|t| spec.document_type.map_or(true, |d| t.document_type == d))
        .filter(|t| !spec.required_only || t.required)
        .collect();

    results.sort_by(|a, b| {
        let ordering = compare(a, b, spec.sort_by);
        match spec.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    results
}

fn compare(a: &TemplateDefinition, b: &TemplateDefinition, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Priority => a.priority.cmp(&b.priority),
        SortBy::Title => a.title.cmp(&b.title),
        SortBy::Category => a.category.cmp(&b.category),
    }
}

/// Run an untyped query, reporting malformed input instead of failing
pub fn query_value<'a>(catalog: &'a TemplateCatalog, raw: &Value) -> QueryResult<'a> {
    match parse_query(raw) {
        Ok(spec) => QueryResult {
            templates: query(catalog, &spec),
            violations: vec![],
        },
        Err(violations) => {
            tracing::warn!("Rejected template query with {} violations", violations.len());
            QueryResult {
                templates: vec![],
                violations,
            }
        }
    }
}

/// Validate an untyped query object into a [`QuerySpec`]
///
/// `null` is treated as an empty query. All problems are collected.
pub fn parse_query(raw: &Value) -> Result<QuerySpec, Vec<FieldViolation>> {
    let empty = Map::new();
    let object = match raw {
        Value::Null => &empty,
        Value::Object(object) => object,
        _ => {
            return Err(vec![invalid("query", "Query must be an object")]);
        }
    };

    let mut spec = QuerySpec::default();
    let mut violations = Vec::new();

    for key in object.keys() {
        if !QUERY_KEYS.contains(&key.as_str()) {
            violations.push(invalid(
                &format!("query.{}", key),
                &format!("Unknown query key '{}'", key),
            ));
        }
    }

    spec.framework = optional_string(object, "framework", &mut violations);
    spec.category = optional_string(object, "category", &mut violations);

    if let Some(kind) = optional_string(object, "documentType", &mut violations) {
        match kind.parse::<DocumentType>() {
            Ok(kind) => spec.document_type = Some(kind),
            Err(message) => violations.push(invalid("query.documentType", &message)),
        }
    }

    match object.get("requiredOnly") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(flag)) => spec.required_only = *flag,
        Some(_) => violations.push(invalid("query.requiredOnly", "requiredOnly must be a boolean")),
    }

    if let Some(sort_by) = optional_string(object, "sortBy", &mut violations) {
        match sort_by.as_str() {
            "priority" => spec.sort_by = SortBy::Priority,
            "title" => spec.sort_by = SortBy::Title,
            "category" => spec.sort_by = SortBy::Category,
            other => violations.push(invalid(
                "query.sortBy",
                &format!("Unknown sort key '{}' (expected priority, title, or category)", other),
            )),
        }
    }

    if let Some(order) = optional_string(object, "sortOrder", &mut violations) {
        match order.as_str() {
            "asc" => spec.sort_order = SortOrder::Asc,
            "desc" => spec.sort_order = SortOrder::Desc,
            other => violations.push(invalid(
                "query.sortOrder",
                &format!("Unknown sort order '{}' (expected asc or desc)", other),
            )),
        }
    }

    if violations.is_empty() {
        Ok(spec)
    } else {
        Err(violations)
    }
}

fn invalid(field: &str, message: &str) -> FieldViolation {
    FieldViolation::new(field, message, ViolationCode::InvalidQuery)
}

fn optional_string(
    object: &Map<String, Value>,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(invalid(
                &format!("query.{}", key),
                &format!("{} must be a string", key),
            ));
            None
        }
    }
}
