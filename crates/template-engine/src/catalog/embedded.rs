//! Built-in templates embedded in the binary
//!
//! Bodies are markdown with `{{name}}` placeholders. Frameworks register in
//! the order they appear in [`builtin_templates`].

use std::collections::BTreeMap;

use shared_types::{DocumentType, TemplateDefinition, VariableSpec};

use super::registry::TemplateCatalog;
use crate::errors::CatalogError;

pub const ISO27001: &str = "iso27001";
pub const SOC2: &str = "soc2";
pub const GDPR: &str = "gdpr";

const REVIEW_CYCLES: [&str; 3] = ["Annually", "Semi-annually", "Quarterly"];

/// Build a catalog holding only the built-in templates
pub fn builtin_catalog() -> Result<TemplateCatalog, CatalogError> {
    TemplateCatalog::from_definitions(builtin_templates())
}

/// All built-in template definitions
pub fn builtin_templates() -> Vec<TemplateDefinition> {
    let mut templates = iso27001_templates();
    templates.extend(soc2_templates());
    templates.extend(gdpr_templates());
    templates
}

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    framework: &'static str,
    category: &'static str,
    priority: i64,
    document_type: DocumentType,
    required: bool,
    body: &'static str,
    variables: Vec<(&'static str, VariableSpec)>,
}

impl From<Entry> for TemplateDefinition {
    fn from(entry: Entry) -> Self {
        TemplateDefinition {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            description: entry.description.to_string(),
            framework: entry.framework.to_string(),
            category: entry.category.to_string(),
            priority: entry.priority,
            document_type: entry.document_type,
            required: entry.required,
            body_text: entry.body.to_string(),
            variable_specs: entry
                .variables
                .into_iter()
                .map(|(name, spec)| (name.to_string(), spec))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}

fn organization() -> (&'static str, VariableSpec) {
    (
        "organization_name",
        VariableSpec::text("Organization name").required(),
    )
}

fn effective_date() -> (&'static str, VariableSpec) {
    ("effective_date", VariableSpec::date("Effective date").required())
}

fn review_cycle() -> (&'static str, VariableSpec) {
    (
        "review_cycle",
        VariableSpec::select("Review cycle", REVIEW_CYCLES).with_default("Annually"),
    )
}

// ============================================================
// ISO/IEC 27001
// ============================================================

fn iso27001_templates() -> Vec<TemplateDefinition> {
    vec![
        Entry {
            id: "iso27001-information-security-policy",
            title: "Information Security Policy",
            description: "Top-level policy establishing the ISMS and management commitment",
            framework: ISO27001,
            category: "governance",
            priority: 1,
            document_type: DocumentType::Policy,
            required: true,
            body: ISO_INFOSEC_POLICY,
            variables: vec![
                organization(),
                effective_date(),
                ("policy_owner", VariableSpec::text("Policy owner").required()),
                ("scope_statement", VariableSpec::text("ISMS scope statement")),
                review_cycle(),
            ],
        }
        .into(),
        Entry {
            id: "iso27001-risk-assessment-procedure",
            title: "Risk Assessment and Treatment Procedure",
            description: "Method for identifying, analysing, and treating information security risks",
            framework: ISO27001,
            category: "risk",
            priority: 2,
            document_type: DocumentType::Procedure,
            required: true,
            body: ISO_RISK_PROCEDURE,
            variables: vec![
                organization(),
                ("risk_owner", VariableSpec::text("Risk process owner").required()),
                (
                    "risk_appetite",
                    VariableSpec::select("Risk appetite", ["Low", "Moderate", "High"]).required(),
                ),
                (
                    "assessment_interval_months",
                    VariableSpec::number("Assessment interval (months)").with_default(12),
                ),
            ],
        }
        .into(),
        Entry {
            id: "iso27001-statement-of-applicability",
            title: "Statement of Applicability",
            description: "Register of Annex A controls with inclusion justification",
            framework: ISO27001,
            category: "governance",
            priority: 3,
            document_type: DocumentType::Register,
            required: true,
            body: ISO_SOA,
            variables: vec![
                organization(),
                ("soa_version", VariableSpec::text("SoA version")),
                ("approved_on", VariableSpec::date("Approval date")),
            ],
        }
        .into(),
        Entry {
            id: "iso27001-access-control-policy",
            title: "Access Control Policy",
            description: "Rules for granting, reviewing, and revoking access",
            framework: ISO27001,
            category: "access",
            priority: 4,
            document_type: DocumentType::Policy,
            required: false,
            body: ISO_ACCESS_CONTROL,
            variables: vec![
                organization(),
                effective_date(),
                (
                    "access_review_days",
                    VariableSpec::number("Access review interval (days)").required(),
                ),
                (
                    "mfa_scope",
                    VariableSpec::select(
                        "MFA scope",
                        ["All users", "Privileged users", "Remote access only"],
                    ),
                ),
            ],
        }
        .into(),
    ]
}

const ISO_INFOSEC_POLICY: &str = r#"# Information Security Policy

**Organization:** {{organization_name}}
**Effective date:** {{effective_date}}
**Policy owner:** {{policy_owner}}

## 1. Purpose

This policy sets out how {{organization_name}} protects the confidentiality, integrity, and availability of the information it processes.

## 2. Scope

{{scope_statement}}

## 3. Management Commitment

Top management of {{organization_name}} commits to establishing, implementing, maintaining, and continually improving the information security management system.

### 3.1 Roles and Responsibilities

The policy owner, {{policy_owner}}, is accountable for this policy and its supporting controls.

## 4. Review

This policy is reviewed {{review_cycle}} and after any significant change to the organization or its risk environment.
"#;

const ISO_RISK_PROCEDURE: &str = r#"# Risk Assessment and Treatment Procedure

## 1. Ownership

{{risk_owner}} owns the risk assessment process for {{organization_name}}.

## 2. Risk Criteria

The organization operates with a {{risk_appetite}} risk appetite. Risks scored above the acceptance threshold must be treated.

## 3. Assessment Cycle

Risk assessments are performed every {{assessment_interval_months}} months and whenever significant changes are proposed.

## 4. Treatment

Each risk is assigned one of: modify, retain, avoid, or share. Treatment plans are approved by {{risk_owner}}.
"#;

const ISO_SOA: &str = r#"# Statement of Applicability

**Organization:** {{organization_name}}
**Version:** {{soa_version}}
**Approved on:** {{approved_on}}

## Control Register

| Control | Applicable | Justification | Status |
|---------|------------|---------------|--------|
| A.5.1 Policies for information security | Yes | {{policy_justification}} | Implemented |
| A.8.2 Privileged access rights | Yes | {{privileged_access_justification}} | Implemented |
"#;

const ISO_ACCESS_CONTROL: &str = r#"# Access Control Policy

**Organization:** {{organization_name}}
**Effective date:** {{effective_date}}

## 1. Principles

Access is granted on a least-privilege and need-to-know basis.

## 2. Authentication

Multi-factor authentication is required for: {{mfa_scope}}.

## 3. Access Reviews

User access rights are reviewed every {{access_review_days}} days by system owners.
"#;

// ============================================================
// SOC 2
// ============================================================

fn soc2_templates() -> Vec<TemplateDefinition> {
    vec![
        Entry {
            id: "soc2-incident-response-plan",
            title: "Incident Response Plan",
            description: "Detection, containment, and notification procedures for security incidents",
            framework: SOC2,
            category: "operations",
            priority: 1,
            document_type: DocumentType::Plan,
            required: true,
            body: SOC2_INCIDENT_RESPONSE,
            variables: vec![
                organization(),
                (
                    "incident_commander",
                    VariableSpec::text("Incident commander").required(),
                ),
                (
                    "notification_hours",
                    VariableSpec::number("Customer notification window (hours)").required(),
                ),
                ("escalation_contact", VariableSpec::text("Escalation contact")),
                ("last_tested", VariableSpec::date("Last tabletop exercise")),
            ],
        }
        .into(),
        Entry {
            id: "soc2-vendor-management-policy",
            title: "Vendor Management Policy",
            description: "Due diligence and monitoring of third-party service providers",
            framework: SOC2,
            category: "third-party",
            priority: 2,
            document_type: DocumentType::Policy,
            required: true,
            body: SOC2_VENDOR_MANAGEMENT,
            variables: vec![
                organization(),
                effective_date(),
                (
                    "vendor_tiering",
                    VariableSpec::select("Vendor tiering model", ["Two-tier", "Three-tier"])
                        .with_default("Three-tier"),
                ),
                review_cycle(),
            ],
        }
        .into(),
        Entry {
            id: "soc2-change-management-procedure",
            title: "Change Management Procedure",
            description: "Approval and deployment controls for production changes",
            framework: SOC2,
            category: "operations",
            priority: 3,
            document_type: DocumentType::Procedure,
            required: false,
            body: SOC2_CHANGE_MANAGEMENT,
            variables: vec![
                organization(),
                ("change_approver", VariableSpec::text("Change approver role").required()),
                ("emergency_window_hours", VariableSpec::number("Emergency review window (hours)")),
            ],
        }
        .into(),
    ]
}

const SOC2_INCIDENT_RESPONSE: &str = r#"# Incident Response Plan

## 1. Purpose

This plan defines how {{organization_name}} detects, responds to, and recovers from security incidents.

## 2. Roles

- Incident commander: {{incident_commander}}
- Escalation contact: {{escalation_contact}}

## 3. Response Phases

### 3.1 Detection and Analysis

Alerts are triaged and classified by severity within one hour of detection.

### 3.2 Containment, Eradication, and Recovery

The incident commander coordinates containment and authorizes recovery.

### 3.3 Notification

Affected customers are notified within {{notification_hours}} hours of a confirmed incident.

## 4. Testing

The plan was last exercised on {{last_tested}}.
"#;

const SOC2_VENDOR_MANAGEMENT: &str = r#"# Vendor Management Policy

**Organization:** {{organization_name}}
**Effective date:** {{effective_date}}

## 1. Vendor Classification

Vendors are classified using a {{vendor_tiering}} model based on data access and service criticality.

## 2. Due Diligence

Critical vendors provide an independent assurance report before onboarding.

## 3. Monitoring

Vendor risk ratings are reassessed {{review_cycle}}.
"#;

const SOC2_CHANGE_MANAGEMENT: &str = r#"# Change Management Procedure

## 1. Approval

All production changes at {{organization_name}} require approval from the {{change_approver}}.

## 2. Emergency Changes

Emergency changes are reviewed retrospectively within {{emergency_window_hours}} hours.
"#;

// ============================================================
// GDPR
// ============================================================

fn gdpr_templates() -> Vec<TemplateDefinition> {
    vec![
        Entry {
            id: "gdpr-privacy-notice",
            title: "Privacy Notice",
            description: "Article 13 and 14 information provided to data subjects",
            framework: GDPR,
            category: "transparency",
            priority: 1,
            document_type: DocumentType::Policy,
            required: true,
            body: GDPR_PRIVACY_NOTICE,
            variables: vec![
                ("controller_name", VariableSpec::text("Controller name").required()),
                ("dpo_email", VariableSpec::text("Data protection officer email")),
                (
                    "lawful_basis",
                    VariableSpec::select(
                        "Lawful basis",
                        [
                            "Consent",
                            "Contract",
                            "Legal obligation",
                            "Vital interests",
                            "Public task",
                            "Legitimate interests",
                        ],
                    )
                    .required(),
                ),
                (
                    "retention_months",
                    VariableSpec::number("Retention period (months)").required(),
                ),
                effective_date(),
            ],
        }
        .into(),
        Entry {
            id: "gdpr-breach-register",
            title: "Personal Data Breach Register",
            description: "Article 33(5) record of personal data breaches",
            framework: GDPR,
            category: "incident",
            priority: 2,
            document_type: DocumentType::Register,
            required: true,
            body: GDPR_BREACH_REGISTER,
            variables: vec![
                ("controller_name", VariableSpec::text("Controller name").required()),
                ("register_owner", VariableSpec::text("Register owner")),
            ],
        }
        .into(),
        Entry {
            id: "gdpr-dpia",
            title: "Data Protection Impact Assessment",
            description: "Article 35 assessment for high-risk processing",
            framework: GDPR,
            category: "risk",
            priority: 3,
            document_type: DocumentType::Assessment,
            required: false,
            body: GDPR_DPIA,
            variables: vec![
                ("controller_name", VariableSpec::text("Controller name").required()),
                ("processing_activity", VariableSpec::text("Processing activity").required()),
                ("assessment_date", VariableSpec::date("Assessment date").required()),
                (
                    "residual_risk",
                    VariableSpec::select("Residual risk", ["Low", "Medium", "High"]),
                ),
            ],
        }
        .into(),
    ]
}

const GDPR_PRIVACY_NOTICE: &str = r#"# Privacy Notice

**Controller:** {{controller_name}}
**Effective date:** {{effective_date}}

## 1. Who We Are

{{controller_name}} is the controller of your personal data. You can contact our data protection officer at {{dpo_email}}.

## 2. Why We Process Your Data

We rely on the following lawful basis: {{lawful_basis}}.

## 3. How Long We Keep It

Personal data is retained for {{retention_months}} months unless a longer period is required by law.

## 4. Your Rights

You may request access, rectification, erasure, restriction, portability, or object to processing.
"#;

const GDPR_BREACH_REGISTER: &str = r#"# Personal Data Breach Register

**Controller:** {{controller_name}}
**Register owner:** {{register_owner}}

## Recording Requirements

Every breach is recorded with its facts, effects, and remedial action, whether or not it was notified to the supervisory authority.

| Date | Description | Data subjects affected | Notified | Remedial action |
|------|-------------|------------------------|----------|-----------------|
"#;

const GDPR_DPIA: &str = r#"# Data Protection Impact Assessment

**Controller:** {{controller_name}}
**Processing activity:** {{processing_activity}}
**Assessment date:** {{assessment_date}}

## 1. Description of Processing

{{processing_description}}

## 2. Necessity and Proportionality

## 3. Risks to Data Subjects

## 4. Measures and Residual Risk

Residual risk after mitigation: {{residual_risk}}.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;
    use shared_types::VariableKind;

    #[test]
    fn test_builtin_catalog_builds() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.len(), builtin_templates().len());
        assert_eq!(
            catalog.frameworks().collect::<Vec<_>>(),
            vec![ISO27001, SOC2, GDPR]
        );
    }

    #[test]
    fn test_every_framework_has_required_documents() {
        let catalog = builtin_catalog().unwrap();
        for framework in [ISO27001, SOC2, GDPR] {
            assert!(
                catalog.by_framework(framework).iter().any(|t| t.required),
                "{} should have at least one required document",
                framework
            );
        }
    }

    #[test]
    fn test_declared_variables_appear_in_body() {
        for template in builtin_templates() {
            let referenced = patterns::placeholders(&template.body_text);
            for name in template.variable_specs.keys() {
                assert!(
                    referenced.contains(name),
                    "{} declares '{}' but never references it",
                    template.id,
                    name
                );
            }
        }
    }

    #[test]
    fn test_select_defaults_are_valid_options() {
        for template in builtin_templates() {
            for (name, spec) in &template.variable_specs {
                if let (VariableKind::Select { options }, Some(default)) =
                    (&spec.kind, &spec.default_value)
                {
                    let default = default.as_str().unwrap_or_default();
                    assert!(
                        options.iter().any(|o| o == default),
                        "{}.{} default '{}' is not an option",
                        template.id,
                        name,
                        default
                    );
                }
            }
        }
    }
}
