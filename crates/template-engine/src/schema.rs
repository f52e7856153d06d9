//! Variable schema compiler
//!
//! Turns a template's declared variable specs into a validator that checks
//! untrusted caller input and produces typed, normalized values. Every
//! violation in a call is collected so a user sees one complete correction
//! list. Keys the schema does not declare are ignored.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{json, Value};

use shared_types::{FieldViolation, VariableKind, VariableSpec, ViolationCode};

/// Validated variables keyed by name, ready for substitution
pub type NormalizedVariables = BTreeMap<String, VariableValue>;

/// A value that passed its variable's rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VariableValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Select(String),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Text(s) | VariableValue::Select(s) => f.write_str(s),
            VariableValue::Number(n) => write!(f, "{}", n),
            VariableValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Validation rule selected from a variable's declared kind
#[derive(Debug, Clone)]
enum Rule {
    Text,
    Number,
    Date,
    Select(Vec<String>),
}

impl From<&VariableKind> for Rule {
    fn from(kind: &VariableKind) -> Self {
        match kind {
            VariableKind::Text => Rule::Text,
            VariableKind::Number => Rule::Number,
            VariableKind::Date => Rule::Date,
            VariableKind::Select { options } => Rule::Select(options.clone()),
        }
    }
}

impl Rule {
    fn apply(&self, label: &str, value: &Value) -> Result<VariableValue, (ViolationCode, String)> {
        match self {
            Rule::Text => Ok(VariableValue::Text(string_form(value))),
            Rule::Number => parse_number(value)
                .map(VariableValue::Number)
                .ok_or_else(|| {
                    (
                        ViolationCode::InvalidType,
                        format!("{} must be a valid number", label),
                    )
                }),
            Rule::Date => value
                .as_str()
                .and_then(parse_date)
                .map(VariableValue::Date)
                .ok_or_else(|| {
                    (
                        ViolationCode::InvalidType,
                        format!("{} must be a valid date (YYYY-MM-DD)", label),
                    )
                }),
            Rule::Select(options) => {
                let candidate = match value {
                    Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                        Some(string_form(value))
                    }
                    _ => None,
                };
                match candidate {
                    Some(s) if options.iter().any(|o| *o == s) => Ok(VariableValue::Select(s)),
                    _ => Err((
                        ViolationCode::InvalidOption,
                        format!("{} must be one of: {}", label, options.join(", ")),
                    )),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct FieldRule {
    name: String,
    label: String,
    required: bool,
    default_value: Option<Value>,
    rule: Rule,
}

/// Compiled validator for one template's variables
#[derive(Debug, Clone)]
pub struct VariableSchema {
    fields: Vec<FieldRule>,
}

impl VariableSchema {
    /// Compile a validator from declared specs
    pub fn compile(specs: &BTreeMap<String, VariableSpec>) -> Self {
        let fields = specs
            .iter()
            .map(|(name, spec)| FieldRule {
                name: name.clone(),
                label: display_label(name, spec),
                required: spec.required,
                default_value: spec.default_value.clone(),
                rule: Rule::from(&spec.kind),
            })
            .collect();
        Self { fields }
    }

    /// Validate raw caller input, returning normalized values or every violation
    pub fn validate(
        &self,
        raw: &HashMap<String, Value>,
    ) -> Result<NormalizedVariables, Vec<FieldViolation>> {
        let mut normalized = NormalizedVariables::new();
        let mut violations = Vec::new();

        for field in &self.fields {
            let value = match raw.get(&field.name).filter(|v| !is_blank(v)) {
                Some(value) => value,
                None => match self.default_for(field) {
                    Some(default) => {
                        normalized.insert(field.name.clone(), default);
                        continue;
                    }
                    None if field.required => {
                        violations.push(FieldViolation::new(
                            format!("variables.{}", field.name),
                            format!("{} is required", field.label),
                            ViolationCode::Required,
                        ));
                        continue;
                    }
                    None => continue,
                },
            };

            match field.rule.apply(&field.label, value) {
                Ok(v) => {
                    normalized.insert(field.name.clone(), v);
                }
                Err((code, message)) => {
                    violations.push(FieldViolation::new(
                        format!("variables.{}", field.name),
                        message,
                        code,
                    ));
                }
            }
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(violations)
        }
    }

    fn default_for(&self, field: &FieldRule) -> Option<VariableValue> {
        let default = field.default_value.as_ref().filter(|v| !is_blank(v))?;
        match field.rule.apply(&field.label, default) {
            Ok(value) => Some(value),
            Err((_, message)) => {
                tracing::warn!(
                    "Ignoring invalid default for variable '{}': {}",
                    field.name,
                    message
                );
                None
            }
        }
    }
}

/// Check one value against a variable kind without a full schema
///
/// Used to vet declared defaults on candidate templates.
pub fn check_value(kind: &VariableKind, label: &str, value: &Value) -> Result<(), String> {
    Rule::from(kind)
        .apply(label, value)
        .map(|_| ())
        .map_err(|(_, message)| message)
}

/// JSON-Schema-style description of the variables, for driving dynamic forms
pub fn schema_json(specs: &BTreeMap<String, VariableSpec>) -> Value {
    let properties: serde_json::Map<String, Value> = specs
        .iter()
        .map(|(name, spec)| {
            let mut property = match &spec.kind {
                VariableKind::Text => json!({ "type": "string" }),
                VariableKind::Number => json!({ "type": "number" }),
                VariableKind::Date => json!({ "type": "string", "format": "date" }),
                VariableKind::Select { options } => json!({ "type": "string", "enum": options }),
            };
            property["title"] = json!(spec.label);
            if let Some(default) = &spec.default_value {
                property["default"] = default.clone();
            }
            (name.clone(), property)
        })
        .collect();

    let required: Vec<&String> = specs
        .iter()
        .filter(|(_, spec)| spec.required)
        .map(|(name, _)| name)
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": true
    })
}

fn display_label(name: &str, spec: &VariableSpec) -> String {
    if spec.label.trim().is_empty() {
        name.to_string()
    } else {
        spec.label.clone()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Parse ISO-8601 dates and the common equivalents callers send
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(s, "%Y/%m/%d").ok())
        .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
}
