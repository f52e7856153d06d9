//! Engine configuration
//!
//! TOML-based configuration for catalog sources and generation defaults.
//! Every field has a default, so an empty file is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use shared_types::{OutputFormat, TemplateDefinition};

use crate::catalog::{builtin_templates, TemplateCatalog};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Where templates come from
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Defaults applied to generation requests
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Directory relative template paths resolve against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// Relative `template_files` entries resolve against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use template_engine::config::EngineConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = EngineConfig::from_str(r#"
    ///     [generation]
    ///     default_version = "2.0"
    /// "#)?;
    /// assert!(config.catalog.include_builtin);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Build the catalog described by this configuration
    ///
    /// Built-in templates register first, then each file in listed order.
    pub fn build_catalog(&self) -> anyhow::Result<TemplateCatalog> {
        let mut definitions = Vec::new();
        if self.catalog.include_builtin {
            definitions.extend(builtin_templates());
        }
        for file in &self.catalog.template_files {
            let path = self.resolve(file);
            let loaded = load_template_file(&path)?;
            tracing::info!("Loaded {} templates from {}", loaded.len(), path.display());
            definitions.extend(loaded);
        }

        TemplateCatalog::builder()
            .register_all(definitions)
            .strict_placeholders(self.catalog.strict_placeholders)
            .build()
            .context("Template catalog failed integrity checks")
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if file.is_relative() => base.join(file),
            _ => file.to_path_buf(),
        }
    }
}

/// Catalog source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Register the embedded templates (default: true)
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,
    /// JSON or TOML files of template definitions
    #[serde(default)]
    pub template_files: Vec<PathBuf>,
    /// Reject bodies with undeclared placeholders (default: false)
    #[serde(default)]
    pub strict_placeholders: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_builtin: default_include_builtin(),
            template_files: Vec::new(),
            strict_placeholders: false,
        }
    }
}

fn default_include_builtin() -> bool {
    true
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Version label used when a request carries none (default: "1.0")
    #[serde(default = "default_version")]
    pub default_version: String,
    /// Output format used when a request carries none (default: markdown)
    #[serde(default)]
    pub default_format: OutputFormat,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_version: default_version(),
            default_format: OutputFormat::default(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Deserialize)]
struct TemplateFile {
    templates: Vec<TemplateDefinition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTemplateFile {
    List(Vec<TemplateDefinition>),
    Wrapped(TemplateFile),
}

/// Load template definitions from a `.json` or `.toml` file
///
/// JSON files hold an array of definitions or `{"templates": [...]}`; TOML
/// files hold a `[[templates]]` array.
pub fn load_template_file(path: &Path) -> anyhow::Result<Vec<TemplateDefinition>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            let file: TemplateFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML templates: {}", path.display()))?;
            Ok(file.templates)
        }
        Some("json") => {
            let file: JsonTemplateFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON templates: {}", path.display()))?;
            Ok(match file {
                JsonTemplateFile::List(templates) => templates,
                JsonTemplateFile::Wrapped(file) => file.templates,
            })
        }
        _ => anyhow::bail!(
            "Unsupported template file extension (expected .json or .toml): {}",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::VariableKind;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_str("").unwrap();
        assert!(config.catalog.include_builtin);
        assert!(config.catalog.template_files.is_empty());
        assert!(!config.catalog.strict_placeholders);
        assert_eq!(config.generation.default_version, "1.0");
        assert_eq!(config.generation.default_format, OutputFormat::Markdown);
    }

    #[test]
    fn test_parses_all_sections() {
        let config = EngineConfig::from_str(
            r#"
            [catalog]
            include_builtin = false
            template_files = ["extra.toml"]
            strict_placeholders = true

            [generation]
            default_version = "2024.1"
            default_format = "html"
            "#,
        )
        .unwrap();

        assert!(!config.catalog.include_builtin);
        assert_eq!(config.catalog.template_files, vec![PathBuf::from("extra.toml")]);
        assert!(config.catalog.strict_placeholders);
        assert_eq!(config.generation.default_version, "2024.1");
        assert_eq!(config.generation.default_format, OutputFormat::Html);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(EngineConfig::from_str("[catalog\ninclude_builtin = ").is_err());
    }

    #[test]
    fn test_builtin_catalog_from_default_config() {
        let catalog = EngineConfig::default().build_catalog().unwrap();
        assert_eq!(catalog.len(), builtin_templates().len());
    }

    #[test]
    fn test_loads_toml_and_json_template_files() {
        let dir =
            std::env::temp_dir().join(format!("template-engine-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("extra.toml"),
            r##"
            [[templates]]
            id = "custom-policy"
            title = "Custom Policy"
            framework = "custom"
            documentType = "policy"
            bodyText = "# {{owner}}"

            [templates.variableSpecs.owner]
            type = "select"
            label = "Owner"
            options = ["IT", "HR"]
            "##,
        )
        .unwrap();
        fs::write(
            dir.join("extra.json"),
            r#"[{"id": "custom-plan", "title": "Plan", "framework": "custom",
                 "documentType": "plan", "bodyText": "Plan body"}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("engine.toml"),
            "[catalog]\ninclude_builtin = false\ntemplate_files = [\"extra.toml\", \"extra.json\"]\n",
        )
        .unwrap();

        let catalog = EngineConfig::from_file(dir.join("engine.toml"))
            .unwrap()
            .build_catalog()
            .unwrap();

        let ids: Vec<_> = catalog.all().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["custom-policy", "custom-plan"]);
        let policy = catalog.lookup_by_id("custom-policy").unwrap();
        assert_eq!(policy.body_text, "# {{owner}}");
        let owner = &policy.variable_specs["owner"];
        assert_eq!(
            owner.kind,
            VariableKind::Select {
                options: vec!["IT".to_string(), "HR".to_string()]
            }
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_duplicate_ids_across_files_fail_build() {
        let dir =
            std::env::temp_dir().join(format!("template-engine-dup-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("dup.json"),
            r#"{"templates": [{"id": "soc2-incident-response-plan", "title": "Copy",
                 "framework": "custom", "documentType": "plan", "bodyText": "x"}]}"#,
        )
        .unwrap();

        let mut config = EngineConfig::default();
        config.catalog.template_files = vec![dir.join("dup.json")];
        let err = config.build_catalog().unwrap_err();
        assert!(format!("{:#}", err).contains("Duplicate template id"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(load_template_file(Path::new("templates.yaml")).is_err());
    }
}
