//! Subcommand definitions and handlers

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use serde_json::{json, Map, Value};

use shared_types::GenerationRequest;
use template_engine::DocumentEngine;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List templates, optionally filtered and sorted
    List(ListArgs),

    /// Show one template definition
    Show {
        /// Template id
        id: String,
    },

    /// Show the variable schema of a template
    Schema {
        /// Template id
        id: String,

        /// Emit a JSON-Schema-style form description instead of raw specs
        #[arg(long)]
        json_schema: bool,
    },

    /// Generate a document from a request JSON file (stdin when omitted)
    Generate {
        input: Option<PathBuf>,
    },

    /// Validate a candidate template JSON file (stdin when omitted)
    Validate {
        input: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub framework: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// policy, procedure, plan, standard, guideline, checklist, form, register, report, assessment
    #[arg(long)]
    pub document_type: Option<String>,

    #[arg(long)]
    pub required_only: bool,

    /// priority, title, or category
    #[arg(long)]
    pub sort_by: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub sort_order: Option<String>,
}

impl ListArgs {
    /// Untyped query object, validated by the engine at the boundary
    fn to_query(&self) -> Value {
        let mut query = Map::new();
        let strings = [
            ("framework", &self.framework),
            ("category", &self.category),
            ("documentType", &self.document_type),
            ("sortBy", &self.sort_by),
            ("sortOrder", &self.sort_order),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                query.insert(key.to_string(), json!(value));
            }
        }
        if self.required_only {
            query.insert("requiredOnly".to_string(), json!(true));
        }
        Value::Object(query)
    }
}

/// JSON to print and whether the command succeeded
#[derive(Debug)]
pub struct Outcome {
    pub output: Value,
    pub ok: bool,
}

pub fn run(engine: &DocumentEngine, command: Command) -> anyhow::Result<Outcome> {
    match command {
        Command::List(args) => list(engine, &args),
        Command::Show { id } => show(engine, &id),
        Command::Schema { id, json_schema } => schema(engine, &id, json_schema),
        Command::Generate { input } => generate(engine, read_json(input.as_deref())?),
        Command::Validate { input } => Ok(validate(engine, &read_json(input.as_deref())?)),
    }
}

pub fn list(engine: &DocumentEngine, args: &ListArgs) -> anyhow::Result<Outcome> {
    let result = engine.list_templates_value(&args.to_query());
    Ok(Outcome {
        ok: result.violations.is_empty(),
        output: json!({
            "count": result.templates.len(),
            "templates": result.templates,
            "violations": result.violations,
        }),
    })
}

pub fn show(engine: &DocumentEngine, id: &str) -> anyhow::Result<Outcome> {
    let template = engine.get_template(id)?;
    Ok(Outcome {
        output: serde_json::to_value(template)?,
        ok: true,
    })
}

pub fn schema(engine: &DocumentEngine, id: &str, json_schema: bool) -> anyhow::Result<Outcome> {
    let output = if json_schema {
        engine.get_variable_schema_json(id)?
    } else {
        serde_json::to_value(engine.get_variable_schema(id)?)?
    };
    Ok(Outcome { output, ok: true })
}

pub fn generate(engine: &DocumentEngine, input: Value) -> anyhow::Result<Outcome> {
    let request: GenerationRequest =
        serde_json::from_value(input).context("Invalid generation request")?;
    let result = engine.generate_document(&request)?;
    Ok(Outcome {
        ok: result.success,
        output: serde_json::to_value(&result)?,
    })
}

pub fn validate(engine: &DocumentEngine, candidate: &Value) -> Outcome {
    let report = engine.validate_candidate_template(candidate);
    Outcome {
        ok: report.valid,
        output: json!(report),
    }
}

fn read_json(path: Option<&Path>) -> anyhow::Result<Value> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&content).context("Input is not valid JSON")
}
