//! Canonical text form of file maps.
//!
//! The output is consumed line by line downstream, so every byte here is part of the
//! contract: two spaces per depth level, `- ` bullets below the top level, tags rendered
//! as `[Nx]name#id.class`, everything else as its trimmed signature.

use crate::types::{Definition, FileMap, FileMapBodies, KIND_SVELTE_SCRIPT, KIND_SVELTE_STYLE, NO_MAP};
use std::fmt;

fn write_definition(out: &mut String, def: &Definition, depth: usize) {
    if def.kind == KIND_SVELTE_STYLE {
        out.push('\n');
    }

    if depth > 0 {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
    }

    if def.is_tag() {
        if def.tag_reps > 1 {
            out.push_str(&format!("[{}x]", def.tag_reps));
        }
        out.push_str(def.signature.split_whitespace().next().unwrap_or_default());
        for attr in &def.tag_attrs {
            out.push_str(attr);
        }
    } else {
        out.push_str(def.signature.trim());
    }
    out.push('\n');

    for child in &def.children {
        write_definition(out, child, depth + 1);
    }

    if def.kind == KIND_SVELTE_SCRIPT {
        out.push('\n');
    }
}

/// Render a file map to its outline text.
pub fn render(map: &FileMap) -> String {
    let mut out = String::new();
    for def in &map.definitions {
        write_definition(&mut out, def, 0);
    }
    out
}

impl fmt::Display for FileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

/// Join per-path bodies into one document, paths sorted, each under a `### <path>`
/// heading. Empty bodies become `[NO MAP]`.
pub fn combined(bodies: &FileMapBodies) -> String {
    let mut paths: Vec<&String> = bodies.keys().collect();
    paths.sort();

    let mut out = String::new();
    for path in paths {
        let body = bodies[path].trim();
        out.push_str(&format!("\n### {path}\n"));
        if body.is_empty() {
            out.push_str(NO_MAP);
            out.push('\n');
        } else {
            out.push_str(body);
        }
        out.push('\n');
    }
    out
}
