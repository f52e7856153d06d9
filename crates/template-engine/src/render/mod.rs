//! Placeholder substitution
//!
//! Rendering is total and runs in two passes:
//! 1. every `{{identifier}}` with a normalized value is replaced (every occurrence)
//! 2. the substituted text is re-scanned and each remaining token becomes a marker:
//!    `[Not Specified]` plus a warning for a declared variable, `[TO BE COMPLETED]`
//!    for an identifier with no declared variable
//!
//! The output never contains a placeholder token, including tokens that
//! arrived inside caller values.

pub mod output;

use std::collections::BTreeMap;

use regex::Captures;
use serde::Serialize;

use shared_types::VariableSpec;

use crate::patterns::{NOT_SPECIFIED_MARKER, PLACEHOLDER_PATTERN, TO_BE_COMPLETED_MARKER};
use crate::schema::NormalizedVariables;

pub use output::convert;

/// Substituted body plus what could not be filled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub content: String,
    /// One entry per declared variable left unset, in first-occurrence order
    pub warnings: Vec<String>,
    /// Identifiers with no declared variable, in first-occurrence order
    pub unresolved: Vec<String>,
}

/// Substitute normalized variables into a template body
pub fn render(
    body: &str,
    specs: &BTreeMap<String, VariableSpec>,
    variables: &NormalizedVariables,
) -> RenderOutput {
    let substituted = PLACEHOLDER_PATTERN.replace_all(body, |caps: &Captures| {
        match variables.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        }
    });

    let mut missing: Vec<(String, bool)> = Vec::new();
    let mut unresolved: Vec<String> = Vec::new();

    let content = PLACEHOLDER_PATTERN
        .replace_all(&substituted, |caps: &Captures| {
            let name = &caps[1];
            match specs.get(name) {
                Some(spec) => {
                    if !variables.contains_key(name) && !missing.iter().any(|(n, _)| n == name) {
                        missing.push((name.to_string(), spec.required));
                    }
                    NOT_SPECIFIED_MARKER.to_string()
                }
                None => {
                    if !unresolved.iter().any(|n| n == name) {
                        unresolved.push(name.to_string());
                    }
                    TO_BE_COMPLETED_MARKER.to_string()
                }
            }
        })
        .into_owned();

    let warnings = missing
        .into_iter()
        .map(|(name, required)| {
            if required {
                format!("Required variable '{}' was not provided", name)
            } else {
                format!("Optional variable '{}' was not provided", name)
            }
        })
        .collect();

    if !unresolved.is_empty() {
        tracing::warn!(
            "Template body references undeclared placeholders: {}",
            unresolved.join(", ")
        );
    }

    RenderOutput {
        content,
        warnings,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::VariableValue;
    use pretty_assertions::assert_eq;

    fn specs() -> BTreeMap<String, VariableSpec> {
        let mut specs = BTreeMap::new();
        specs.insert("name".to_string(), VariableSpec::text("Name").required());
        specs.insert("date".to_string(), VariableSpec::date("Date"));
        specs
    }

    fn vars(pairs: &[(&str, &str)]) -> NormalizedVariables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), VariableValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn test_optional_variable_falls_back_to_marker() {
        let output = render(
            "Hello {{name}}, date: {{date}}.",
            &specs(),
            &vars(&[("name", "Acme")]),
        );

        assert_eq!(output.content, "Hello Acme, date: [Not Specified].");
        assert_eq!(output.warnings, vec!["Optional variable 'date' was not provided"]);
        assert!(output.unresolved.is_empty());
    }

    #[test]
    fn test_substitution_is_exhaustive() {
        let output = render(
            "{{name}} / {{name}} / {{name}}",
            &specs(),
            &vars(&[("name", "Acme")]),
        );
        assert_eq!(output.content, "Acme / Acme / Acme");
    }

    #[test]
    fn test_undeclared_placeholder_marked_to_be_completed() {
        let output = render(
            "Owner: {{undeclared}} and {{undeclared}}",
            &specs(),
            &vars(&[("name", "Acme")]),
        );

        assert_eq!(output.content, "Owner: [TO BE COMPLETED] and [TO BE COMPLETED]");
        assert_eq!(output.unresolved, vec!["undeclared"]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_one_warning_per_missing_variable() {
        let output = render("{{date}} {{date}}", &specs(), &vars(&[]));
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_tokens_inside_inserted_values_get_markers() {
        let output = render(
            "Hello {{name}}",
            &specs(),
            &vars(&[("name", "{{date}} and {{ghost}}")]),
        );
        assert_eq!(output.content, "Hello [Not Specified] and [TO BE COMPLETED]");
        assert_eq!(output.warnings, vec!["Optional variable 'date' was not provided"]);
        assert_eq!(output.unresolved, vec!["ghost"]);
    }

    #[test]
    fn test_inserted_token_of_provided_variable_is_not_expanded() {
        let output = render(
            "{{date}} / {{name}}",
            &specs(),
            &vars(&[("name", "{{name}}"), ("date", "2024-01-01")]),
        );
        assert_eq!(output.content, "2024-01-01 / [Not Specified]");
        assert!(output.warnings.is_empty());
        assert!(!output.content.contains("{{"));
    }

    #[test]
    fn test_malformed_tokens_left_untouched() {
        let body = "{{ name }} {name} {{name";
        let output = render(body, &specs(), &vars(&[("name", "Acme")]));
        assert_eq!(output.content, body);
    }

    #[test]
    fn test_render_is_idempotent() {
        let variables = vars(&[("name", "Acme")]);
        let first = render("{{name}} {{date}} {{x}}", &specs(), &variables);
        let second = render("{{name}} {{date}} {{x}}", &specs(), &variables);
        assert_eq!(first, second);
    }
}
