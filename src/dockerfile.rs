use crate::classify::tables;
use crate::language::Language;
use crate::types::Definition;
use regex::Regex;
use std::sync::OnceLock;

fn instruction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]+)(?:\s+|$)").expect("valid instruction regex"))
}

/// Dockerfile outline: the instructions the definition table lists for Dockerfiles
/// (`FROM`, `ENTRYPOINT`, `CMD`, `EXPOSE`, `COPY`, `ENV`).
///
/// Continuation lines (`\`) belong to the instruction that started them; only the first
/// physical line is kept as signature.
pub fn map_dockerfile(content: &[u8]) -> Vec<Definition> {
    let text = String::from_utf8_lossy(content);
    let definitions = &tables().definition;
    let mut defs = Vec::new();
    let mut continued = false;

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if continued {
            continued = trimmed.ends_with('\\');
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        continued = trimmed.ends_with('\\');

        let Some(caps) = instruction_regex().captures(trimmed) else {
            continue;
        };
        let kind = format!("{}_instruction", caps[1].to_ascii_lowercase());
        if !definitions.accepts(&kind, Language::Dockerfile) {
            continue;
        }

        let signature = trimmed.trim_end_matches('\\').trim_end().to_string();
        defs.push(Definition::new(kind, signature, idx + 1));
    }

    defs
}
