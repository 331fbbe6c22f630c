use crate::language::Language;
use crate::markup;
use crate::types::{Definition, KIND_SVELTE_SCRIPT, KIND_SVELTE_STYLE};
use crate::walker::Walker;
use tree_sitter::Node;

/// Script or style block of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Embedded {
    content: String,
    lang: Option<String>,
    line: usize,
}

fn find_first<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(|child| find_first(child, kind))
}

fn embedded(root: Node, kind: &str, source: &[u8]) -> Option<Embedded> {
    let element = find_first(root, kind)?;

    let mut cursor = element.walk();
    let mut content = String::new();
    let mut lang = None;
    for child in element.children(&mut cursor) {
        match child.kind() {
            "raw_text" => content = child.utf8_text(source).unwrap_or_default().trim().to_string(),
            "start_tag" => {
                lang = markup::attributes(child, source)
                    .into_iter()
                    .find(|(name, _)| name == "lang")
                    .map(|(_, value)| value);
            }
            _ => {}
        }
    }

    if content.is_empty() {
        return None;
    }
    Some(Embedded {
        content,
        lang,
        line: element.start_position().row + 1,
    })
}

fn script_language(lang: Option<&str>) -> Language {
    match lang {
        Some("ts" | "typescript") => Language::TypeScript,
        _ => Language::JavaScript,
    }
}

/// Map embedded source with its own grammar; `None` when it cannot be parsed.
fn map_embedded(lang: Language, content: &str) -> Option<Vec<Definition>> {
    let mut parser = lang.parser()?;
    let Some(tree) = parser.parse(content, None) else {
        tracing::info!(language = lang.as_str(), "failed to parse svelte block");
        return None;
    };
    Some(Walker::new(lang, content.as_bytes()).map_traditional(tree.root_node(), None))
}

/// Compose a component outline: script header, template tags, then style.
///
/// `root` is the component parsed with the HTML grammar.
pub fn map_svelte(root: Node, source: &[u8]) -> Vec<Definition> {
    let mut defs = Vec::new();

    if let Some(script) = embedded(root, "script_element", source) {
        let lang = script_language(script.lang.as_deref());
        if let Some(children) = map_embedded(lang, &script.content) {
            let signature = match &script.lang {
                Some(l) => format!("<script lang=\"{l}\">"),
                None => "<script>".to_string(),
            };
            defs.push(Definition::new(KIND_SVELTE_SCRIPT, signature, script.line).with_children(children));
        }
    }

    defs.extend(markup::map_markup(root, source));

    if let Some(style) = embedded(root, "style_element", source) {
        if let Some(children) = map_embedded(Language::Css, &style.content) {
            defs.push(Definition::new(KIND_SVELTE_STYLE, "<style>", style.line).with_children(children));
        }
    }

    defs
}
