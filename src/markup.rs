//! HTML outline: significant tags only, with condensed `#id` / `.class` attributes and
//! runs of identical childless siblings collapsed into one `[Nx]` entry.

use crate::types::{Definition, KIND_TAG};
use tree_sitter::Node;

const SIGNIFICANT_TAGS: &[&str] = &[
    "html", "head", "body", "main", "nav", "header", "footer", "article", "section", "form",
    "dialog", "template", "table", "div", "ul", "aside",
];

const MAX_CLASSES: usize = 3;

pub fn is_significant_tag(tag: &str) -> bool {
    SIGNIFICANT_TAGS.contains(&tag)
}

/// Outline of an HTML (or Svelte template) tree rooted at `root`.
///
/// The result is always a single `html` record holding `head` and `body`, as a
/// browser would build the document. Missing ones are synthesized and stray
/// top-level content lands in `body`.
pub fn map_markup(root: Node, source: &[u8]) -> Vec<Definition> {
    consolidate(vec![document(walk(root, source))])
}

fn take_first(defs: &mut Vec<Definition>, tag: &str) -> Option<Definition> {
    let idx = defs.iter().position(|d| d.signature == tag)?;
    Some(defs.remove(idx))
}

fn document(mut top: Vec<Definition>) -> Definition {
    let mut html = take_first(&mut top, "html")
        .unwrap_or_else(|| Definition::new(KIND_TAG, "html", top.first().map_or(1, |d| d.line)));

    let mut inner = std::mem::take(&mut html.children);
    inner.extend(top);

    let head = take_first(&mut inner, "head").unwrap_or_else(|| Definition::new(KIND_TAG, "head", html.line));
    let mut body = match take_first(&mut inner, "body") {
        Some(body) => body,
        None => Definition::new(KIND_TAG, "body", inner.first().map_or(html.line, |d| d.line)),
    };
    body.children.extend(inner);
    body.children.sort_by_key(|d| d.line);

    html.children = vec![head, body];
    html
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

fn walk(node: Node, source: &[u8]) -> Vec<Definition> {
    match node.kind() {
        // Embedded code is never markup.
        "script_element" | "style_element" => Vec::new(),
        "element" => walk_element(node, source),
        _ => walk_children(node, source),
    }
}

fn walk_children(node: Node, source: &[u8]) -> Vec<Definition> {
    let mut defs = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        defs.extend(walk(child, source));
    }
    defs
}

fn walk_element(node: Node, source: &[u8]) -> Vec<Definition> {
    let Some(tag) = opening_tag(node) else {
        return walk_children(node, source);
    };
    let name = tag_name(tag, source);
    let children = walk_children(node, source);

    if !is_significant_tag(&name) {
        // transparent: significant descendants surface at this level
        return children;
    }

    let mut def = Definition::new(KIND_TAG, name, node.start_position().row + 1);
    def.tag_attrs = tag_attrs(tag, source);
    def.children = children;
    vec![def]
}

fn opening_tag(element: Node) -> Option<Node> {
    let mut cursor = element.walk();
    let tag = element
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "start_tag" | "self_closing_tag"));
    tag
}

fn tag_name(tag: Node, source: &[u8]) -> String {
    let mut cursor = tag.walk();
    let name = tag
        .children(&mut cursor)
        .find(|c| c.kind() == "tag_name")
        .map(|n| text(n, source).to_ascii_lowercase())
        .unwrap_or_default();
    name
}

/// `(name, value)` pairs of a start tag, in source order. Names are lowercased.
pub fn attributes(tag: Node, source: &[u8]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut cursor = tag.walk();
    for attr in tag.children(&mut cursor).filter(|c| c.kind() == "attribute") {
        let mut name = String::new();
        let mut value = String::new();
        let mut attr_cursor = attr.walk();
        for part in attr.children(&mut attr_cursor) {
            match part.kind() {
                "attribute_name" => name = text(part, source).to_ascii_lowercase(),
                "attribute_value" => value = text(part, source).to_string(),
                "quoted_attribute_value" => {
                    let mut q = part.walk();
                    let found = part.children(&mut q).find(|v| v.kind() == "attribute_value");
                    if let Some(v) = found {
                        value = text(v, source).to_string();
                    }
                }
                _ => {}
            }
        }
        out.push((name, value));
    }
    out
}

fn tag_attrs(tag: Node, source: &[u8]) -> Vec<String> {
    let mut attrs = Vec::new();
    for (name, value) in attributes(tag, source) {
        match name.as_str() {
            "id" if !value.trim().is_empty() => attrs.push(format!("#{}", value.trim())),
            "class" => {
                let classes: Vec<&str> = value.split_whitespace().take(MAX_CLASSES).collect();
                if !classes.is_empty() {
                    attrs.push(format!(".{}", classes.join(".")));
                }
            }
            _ => {}
        }
    }
    attrs
}

/// Collapse runs of equal childless siblings, level by level.
///
/// A level where any sibling has children is left as is; its children are still
/// consolidated.
pub fn consolidate(defs: Vec<Definition>) -> Vec<Definition> {
    let has_children = defs.iter().any(|d| !d.children.is_empty());

    let mut out = if has_children {
        defs
    } else {
        let mut runs: Vec<Definition> = Vec::with_capacity(defs.len());
        for def in defs {
            match runs.last_mut() {
                Some(last) if last.same_markup(&def) => last.tag_reps += def.tag_reps,
                _ => runs.push(def),
            }
        }
        runs
    };

    for def in &mut out {
        if !def.children.is_empty() {
            def.children = consolidate(std::mem::take(&mut def.children));
        }
    }
    out
}
