//! Structural validation of candidate template definitions
//!
//! Runs on the authoring path, before a new or edited template may be
//! admitted to a catalog. Every problem is collected so an author sees the
//! complete list at once.

use serde_json::{Map, Value};

use shared_types::{
    DocumentType, StructuralReport, StructuralViolation, TemplateDefinition, VariableKind,
};

use crate::catalog::TemplateCatalog;
use crate::patterns;
use crate::schema;

/// Validate an untyped candidate against the catalog it would join
pub fn validate_candidate(catalog: &TemplateCatalog, candidate: &Value) -> StructuralReport {
    let mut checker = Checker::default();

    match candidate.as_object() {
        Some(object) => checker.check_template(catalog, object),
        None => checker.violation("", "Template must be a JSON object"),
    }

    StructuralReport {
        valid: checker.violations.is_empty(),
        violations: checker.violations,
        warnings: checker.warnings,
    }
}

/// Validate a candidate and, if it passes, parse it into a definition
pub fn admit_candidate(
    catalog: &TemplateCatalog,
    candidate: &Value,
) -> Result<TemplateDefinition, StructuralReport> {
    let report = validate_candidate(catalog, candidate);
    if !report.valid {
        return Err(report);
    }
    serde_json::from_value(candidate.clone()).map_err(|e| StructuralReport {
        valid: false,
        violations: vec![StructuralViolation::new("", e.to_string())],
        warnings: report.warnings,
    })
}

#[derive(Default)]
struct Checker {
    violations: Vec<StructuralViolation>,
    warnings: Vec<String>,
}

impl Checker {
    fn violation(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(StructuralViolation::new(path, message));
    }

    fn check_template(&mut self, catalog: &TemplateCatalog, object: &Map<String, Value>) {
        if let Some(id) = self.non_empty_string(object, "id", "id") {
            if catalog.contains(id) {
                self.violation("id", format!("Template id '{}' already exists in the catalog", id));
            }
        }
        self.non_empty_string(object, "title", "title");
        self.non_empty_string(object, "framework", "framework");
        self.optional_type(object, "category", "category", "a string", Value::is_string);
        self.optional_type(object, "description", "description", "a string", Value::is_string);
        self.optional_type(object, "priority", "priority", "an integer", |v| {
            v.is_i64() || v.is_u64()
        });
        self.optional_type(object, "required", "required", "a boolean", Value::is_boolean);

        match object.get("documentType") {
            Some(Value::String(kind)) if kind.parse::<DocumentType>().is_ok() => {}
            _ => self.violation(
                "documentType",
                format!(
                    "documentType must be one of: {}",
                    DocumentType::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ),
        }

        let declared: Vec<String> = match object.get("variableSpecs") {
            None => Vec::new(),
            Some(Value::Object(specs)) => {
                for (name, spec) in specs {
                    self.check_variable(name, spec);
                }
                specs.keys().cloned().collect()
            }
            Some(_) => {
                self.violation("variableSpecs", "variableSpecs must be an object");
                Vec::new()
            }
        };

        if let Some(body) = self.non_empty_string(object, "bodyText", "bodyText") {
            for name in patterns::placeholders(body) {
                if !declared.contains(&name) {
                    self.warnings.push(format!(
                        "Placeholder '{{{{{}}}}}' has no declared variable and will render as {}",
                        name,
                        patterns::TO_BE_COMPLETED_MARKER
                    ));
                }
            }
        }
    }

    fn check_variable(&mut self, name: &str, spec: &Value) {
        let base = format!("variableSpecs.{}", name);

        if !patterns::is_identifier(name) {
            self.violation(
                base.clone(),
                "Variable names may only contain letters, digits, and underscores",
            );
        }

        let Some(spec) = spec.as_object() else {
            self.violation(base, "Variable spec must be an object");
            return;
        };

        let label = self
            .non_empty_string(spec, "label", &format!("{}.label", base))
            .unwrap_or(name)
            .to_string();
        self.optional_type(
            spec,
            "required",
            &format!("{}.required", base),
            "a boolean",
            Value::is_boolean,
        );

        let kind = match spec.get("type").and_then(Value::as_str) {
            Some("text") => Some(VariableKind::Text),
            Some("number") => Some(VariableKind::Number),
            Some("date") => Some(VariableKind::Date),
            Some("select") => self
                .check_options(spec, &base)
                .map(|options| VariableKind::Select { options }),
            _ => {
                self.violation(
                    format!("{}.type", base),
                    format!("type must be one of: {}", VariableKind::TYPE_NAMES.join(", ")),
                );
                None
            }
        };

        if let (Some(kind), Some(default)) = (kind, spec.get("defaultValue")) {
            if let Err(message) = schema::check_value(&kind, &label, default) {
                self.violation(
                    format!("{}.defaultValue", base),
                    format!("Invalid default value: {}", message),
                );
            }
        }
    }

    /// Options of a select spec, `None` after recording a violation
    fn check_options(&mut self, spec: &Map<String, Value>, base: &str) -> Option<Vec<String>> {
        let path = format!("{}.options", base);
        let Some(Value::Array(items)) = spec.get("options") else {
            self.violation(path, "select variables require a non-empty options list");
            return None;
        };
        if items.is_empty() {
            self.violation(path, "select variables require a non-empty options list");
            return None;
        }

        let mut options = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(option) => options.push(option.to_string()),
                None => self.violation(format!("{}[{}]", path, i), "Options must be strings"),
            }
        }
        (options.len() == items.len()).then_some(options)
    }

    fn non_empty_string<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'a str> {
        match object.get(key).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => Some(s),
            _ => {
                self.violation(path, format!("{} must be a non-empty string", key));
                None
            }
        }
    }

    fn optional_type(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        path: &str,
        expected: &str,
        check: impl Fn(&Value) -> bool,
    ) {
        if let Some(value) = object.get(key) {
            if !check(value) {
                self.violation(path, format!("{} must be {}", key, expected));
            }
        }
    }
}
