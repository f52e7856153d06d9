//! Template definitions and their variable schemas

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of document kinds a template can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Policy,
    Procedure,
    Plan,
    Standard,
    Guideline,
    Checklist,
    Form,
    Register,
    Report,
    Assessment,
}

impl DocumentType {
    pub const ALL: [DocumentType; 10] = [
        DocumentType::Policy,
        DocumentType::Procedure,
        DocumentType::Plan,
        DocumentType::Standard,
        DocumentType::Guideline,
        DocumentType::Checklist,
        DocumentType::Form,
        DocumentType::Register,
        DocumentType::Report,
        DocumentType::Assessment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Policy => "policy",
            DocumentType::Procedure => "procedure",
            DocumentType::Plan => "plan",
            DocumentType::Standard => "standard",
            DocumentType::Guideline => "guideline",
            DocumentType::Checklist => "checklist",
            DocumentType::Form => "form",
            DocumentType::Register => "register",
            DocumentType::Report => "report",
            DocumentType::Assessment => "assessment",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    /// Exact, case-sensitive match against the serialized tag
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown document type: {}", s))
    }
}

/// The type of a template variable, together with the data its rule needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariableKind {
    Text,
    Number,
    Date,
    Select { options: Vec<String> },
}

impl VariableKind {
    /// Accepted values of the `type` tag
    pub const TYPE_NAMES: [&'static str; 4] = ["text", "number", "date", "select"];

    pub fn type_name(&self) -> &'static str {
        match self {
            VariableKind::Text => "text",
            VariableKind::Number => "number",
            VariableKind::Date => "date",
            VariableKind::Select { .. } => "select",
        }
    }
}

/// Declared contract for one template variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSpec {
    #[serde(flatten)]
    pub kind: VariableKind,
    /// Display name, used in violation messages
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl VariableSpec {
    pub fn new(kind: VariableKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            required: false,
            default_value: None,
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        Self::new(VariableKind::Text, label)
    }

    pub fn number(label: impl Into<String>) -> Self {
        Self::new(VariableKind::Number, label)
    }

    pub fn date(label: impl Into<String>) -> Self {
        Self::new(VariableKind::Date, label)
    }

    pub fn select<I, S>(label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            VariableKind::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
            label,
        )
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the value used when the caller omits this variable
    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Options for select variables, `None` for every other kind
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            VariableKind::Select { options } => Some(options),
            _ => None,
        }
    }
}

/// A parameterized document body plus its variable schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Grouping key, e.g. a named compliance standard
    pub framework: String,
    #[serde(default)]
    pub category: String,
    /// Lower sorts first
    #[serde(default)]
    pub priority: i64,
    pub document_type: DocumentType,
    /// Mandatory for its framework
    #[serde(default)]
    pub required: bool,
    /// Text containing `{{name}}` placeholder tokens
    pub body_text: String,
    #[serde(default)]
    pub variable_specs: BTreeMap<String, VariableSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_document_type_round_trips_through_str() {
        for kind in DocumentType::ALL {
            assert_eq!(kind.as_str().parse::<DocumentType>(), Ok(kind));
        }
        assert!("Policy".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_variable_spec_flattens_type_tag() {
        let spec = VariableSpec::select("Review cycle", ["annual", "quarterly"]).required();
        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "select",
                "options": ["annual", "quarterly"],
                "label": "Review cycle",
                "required": true
            })
        );
    }

    #[test]
    fn test_variable_spec_parses_from_camel_case_json() {
        let spec: VariableSpec = serde_json::from_value(json!({
            "type": "number",
            "label": "Retention days",
            "defaultValue": 90
        }))
        .unwrap();

        assert_eq!(spec.kind, VariableKind::Number);
        assert!(!spec.required);
        assert_eq!(spec.default_value, Some(json!(90)));
        assert_eq!(spec.options(), None);
    }

    #[test]
    fn test_template_definition_defaults_optional_fields() {
        let template: TemplateDefinition = serde_json::from_value(json!({
            "id": "access-control",
            "title": "Access Control Policy",
            "framework": "iso27001",
            "documentType": "policy",
            "bodyText": "# Access Control"
        }))
        .unwrap();

        assert_eq!(template.priority, 0);
        assert!(!template.required);
        assert!(template.variable_specs.is_empty());
        assert_eq!(template.category, "");
    }
}
