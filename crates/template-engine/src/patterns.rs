//! Regex patterns shared by the renderer, composer, and validators

use lazy_static::lazy_static;
use regex::Regex;

/// Literal inserted for declared optional variables the caller left unset
pub const NOT_SPECIFIED_MARKER: &str = "[Not Specified]";

/// Literal inserted for placeholders with no declared variable
pub const TO_BE_COMPLETED_MARKER: &str = "[TO BE COMPLETED]";

lazy_static! {
    /// `{{identifier}}` placeholder token, no internal whitespace
    pub static ref PLACEHOLDER_PATTERN: Regex = Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap();

    /// Whole-string identifier check for variable keys
    pub static ref IDENTIFIER_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();

    /// Level 1-3 heading line: marker run, horizontal whitespace, text
    pub static ref HEADING_PATTERN: Regex = Regex::new(r"^(#{1,3})[ \t]+(.*)$").unwrap();

    /// Runs of characters that collapse to one hyphen in an anchor slug
    pub static ref SLUG_SEPARATOR_PATTERN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();

    /// Inline markdown link, `[text](target)`
    pub static ref LINK_PATTERN: Regex = Regex::new(r"\[([^\]]*)\]\(([^)\s]*)\)").unwrap();
}

/// Distinct placeholder identifiers in first-occurrence order
pub fn placeholders(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_PATTERN.captures_iter(body) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Check whether a variable key can be referenced as `{{key}}`
pub fn is_identifier(key: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(key)
}
