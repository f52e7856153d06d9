//! Metadata and table-of-contents composition
//!
//! Pure functions over an already-rendered body. Nothing here touches
//! variables or re-runs substitution.

use chrono::Utc;

use shared_types::{DocumentMetadata, TemplateDefinition};

use crate::patterns::{HEADING_PATTERN, SLUG_SEPARATOR_PATTERN};

pub const TOC_HEADING: &str = "## Table of Contents";
pub const TOC_SEPARATOR: &str = "---";

/// A level 1-3 heading line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
    pub slug: String,
}

/// Lower-case and collapse every run of non-alphanumerics to one hyphen
pub fn slugify(text: &str) -> String {
    SLUG_SEPARATOR_PATTERN
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

/// Headings of level 1-3 in document order
pub fn headings(body: &str) -> Vec<Heading> {
    body.lines()
        .filter_map(|line| HEADING_PATTERN.captures(line))
        .map(|caps| {
            let text = caps[2].trim().to_string();
            Heading {
                level: caps[1].len(),
                slug: slugify(&text),
                text,
            }
        })
        .collect()
}

/// Whitespace-delimited non-empty tokens
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

pub fn section_count(body: &str) -> usize {
    body.lines()
        .filter(|line| HEADING_PATTERN.is_match(line))
        .count()
}

/// TOC block: heading, indented entries, separator
pub fn table_of_contents(body: &str) -> String {
    let mut toc = String::new();
    toc.push_str(TOC_HEADING);
    toc.push_str("\n\n");
    for heading in headings(body) {
        toc.push_str(&" ".repeat(2 * (heading.level - 1)));
        toc.push_str(&format!("- [{}](#{})\n", heading.text, heading.slug));
    }
    toc.push('\n');
    toc.push_str(TOC_SEPARATOR);
    toc.push_str("\n\n");
    toc
}

/// Prepend the table of contents to a rendered body
pub fn with_table_of_contents(body: &str) -> String {
    let mut out = table_of_contents(body);
    out.push_str(body);
    out
}

/// Generation metadata for a rendered body
pub fn metadata(template: &TemplateDefinition, body: &str, version: &str) -> DocumentMetadata {
    DocumentMetadata {
        generated_at: Utc::now(),
        version: version.to_string(),
        framework: template.framework.clone(),
        document_type: template.document_type,
        word_count: word_count(body),
        section_count: section_count(body),
    }
}
