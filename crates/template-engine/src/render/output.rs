//! Output format conversion (markdown, HTML, plain text)
//!
//! Template bodies are authored in a small markdown subset: ATX headings,
//! paragraphs, `-` bullet lists, `---` rules, `**bold**`, and inline links.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use shared_types::OutputFormat;

use crate::compose::slugify;
use crate::patterns::LINK_PATTERN;

lazy_static! {
    static ref BOLD_PATTERN: Regex = Regex::new(r"\*\*([^*]+)\*\*").unwrap();
}

/// Convert a rendered markdown document into the requested format
pub fn convert(markdown: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Markdown => markdown.to_string(),
        OutputFormat::Html => to_html(markdown),
        OutputFormat::Text => to_text(markdown),
    }
}

/// Heading level (1-6) and text, if the line is an ATX heading
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if rest.starts_with(' ') || rest.starts_with('\t') {
        Some((level, rest.trim()))
    } else {
        None
    }
}

fn is_rule(line: &str) -> bool {
    matches!(line.trim(), "---" | "***" | "___")
}

fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Only in-document anchors, web, and mail targets become links
fn is_safe_target(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    target.starts_with('#')
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
}

fn inline_html(text: &str) -> String {
    let escaped = escape_html(text);
    let linked = LINK_PATTERN.replace_all(&escaped, |caps: &Captures| {
        if is_safe_target(&caps[2]) {
            format!("<a href=\"{}\">{}</a>", &caps[2], &caps[1])
        } else {
            caps[0].to_string()
        }
    });
    BOLD_PATTERN
        .replace_all(&linked, "<strong>$1</strong>")
        .into_owned()
}

fn to_html(markdown: &str) -> String {
    let mut html: Vec<String> = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut in_list = false;

    fn flush(html: &mut Vec<String>, paragraph: &mut Vec<String>) {
        if !paragraph.is_empty() {
            html.push(format!("<p>{}</p>", paragraph.join("\n")));
            paragraph.clear();
        }
    }

    fn close_list(html: &mut Vec<String>, in_list: &mut bool) {
        if *in_list {
            html.push("</ul>".to_string());
            *in_list = false;
        }
    }

    for line in markdown.lines() {
        if line.trim().is_empty() {
            flush(&mut html, &mut paragraph);
            close_list(&mut html, &mut in_list);
        } else if let Some((level, text)) = heading(line) {
            flush(&mut html, &mut paragraph);
            close_list(&mut html, &mut in_list);
            html.push(format!(
                "<h{level} id=\"{}\">{}</h{level}>",
                slugify(text),
                inline_html(text),
                level = level
            ));
        } else if is_rule(line) {
            flush(&mut html, &mut paragraph);
            close_list(&mut html, &mut in_list);
            html.push("<hr />".to_string());
        } else if let Some(item) = list_item(line) {
            flush(&mut html, &mut paragraph);
            if !in_list {
                html.push("<ul>".to_string());
                in_list = true;
            }
            html.push(format!("<li>{}</li>", inline_html(item)));
        } else {
            close_list(&mut html, &mut in_list);
            paragraph.push(inline_html(line.trim()));
        }
    }
    flush(&mut html, &mut paragraph);
    close_list(&mut html, &mut in_list);

    let mut out = html.join("\n");
    out.push('\n');
    out
}

fn to_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for line in markdown.lines() {
        let line = match heading(line) {
            Some((_, text)) => text,
            None => line,
        };
        let unlinked = LINK_PATTERN.replace_all(line, "$1");
        out.push_str(&BOLD_PATTERN.replace_all(&unlinked, "$1"));
        out.push('\n');
    }
    out
}
