//! Line-based Markdown heading outline (ATX `#` and Setext `===`/`---`).

use crate::types::Definition;
use regex::Regex;
use std::sync::OnceLock;

fn atx_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})(?:[ \t]+(.*))?$").expect("valid ATX regex"))
}

fn closing_sequence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|[ \t]+)#+$").expect("valid closing-sequence regex"))
}

fn setext_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:={2,}|-{2,})$").expect("valid setext regex"))
}

fn atx_heading(line: &str) -> Option<(usize, String)> {
    let caps = atx_regex().captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let raw = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    let text = closing_sequence_regex().replace(raw, "");
    Some((level, text.trim().to_string()))
}

/// Headings of a Markdown document in source order.
pub fn map_markdown(content: &[u8]) -> Vec<Definition> {
    let text = String::from_utf8_lossy(content);
    let mut defs = Vec::new();

    // Last paragraph line that could still become a Setext heading.
    let mut candidate: Option<&str> = None;

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            candidate = None;
            continue;
        }

        if let Some((level, heading)) = atx_heading(trimmed) {
            if !heading.is_empty() {
                defs.push(Definition::new(format!("h{level}"), heading, idx + 1));
            }
            candidate = None;
            continue;
        }

        if setext_regex().is_match(trimmed) {
            if let Some(prev) = candidate.take() {
                let kind = if trimmed.starts_with('=') { "h1" } else { "h2" };
                defs.push(Definition::new(kind, prev, idx + 1));
            }
            continue;
        }

        candidate = Some(trimmed);
    }

    defs
}
