//! Signature reconstruction: slice a definition's header out of the source bytes by
//! locating the node where its body (or assigned value) begins.

use crate::classify::Classifier;
use tree_sitter::Node;

/// What the walker should do with a node classified as a definition.
#[derive(Debug)]
pub enum Outline<'t> {
    /// Nothing is emitted (a pass-through parent with no definition inside).
    Skip,
    Emit {
        signature: String,
        /// Subtree to walk for nested definitions, with the parent context to use.
        descend: Option<Descend<'t>>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Descend<'t> {
    pub base: Node<'t>,
    pub parent: Option<Node<'t>>,
}

/// Preorder walk over `node` (inclusive), steered by the callback's [`Visit`].
fn preorder<'t>(node: Node<'t>, mut visit: impl FnMut(Node<'t>) -> Visit) {
    let mut cursor = node.walk();
    loop {
        let descend = match visit(cursor.node()) {
            Visit::Stop => return,
            Visit::Skip => false,
            Visit::Continue => true,
        };
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

enum Visit {
    Continue,
    Skip,
    Stop,
}

fn find_first<'t>(node: Node<'t>, pred: impl Fn(Node<'t>) -> bool) -> Option<Node<'t>> {
    let mut found = None;
    preorder(node, |n| {
        if pred(n) {
            found = Some(n);
            Visit::Stop
        } else {
            Visit::Continue
        }
    });
    found
}

/// Nearest node (the node itself included) where a definition's body begins.
pub fn find_implementation_boundary<'t>(c: &Classifier, node: Node<'t>) -> Option<Node<'t>> {
    find_first(node, |n| c.is_impl_boundary(n))
}

/// Nearest node (the node itself included) where a binding's value begins.
pub fn find_assignment_boundary<'t>(c: &Classifier, node: Node<'t>) -> Option<Node<'t>> {
    find_first(node, |n| c.is_assignment_boundary(n))
}

/// Every identifier-like node under `node`, in source order.
pub fn find_identifiers<'t>(c: &Classifier, node: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    preorder(node, |n| {
        if c.is_identifier(n) {
            out.push(n);
            Visit::Skip
        } else {
            Visit::Continue
        }
    });
    out
}

/// First direct child of `node` that is itself a definition under `node`.
pub fn first_definition_child<'t>(c: &Classifier, node: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| c.is_definition(*child, Some(node)) && !c.is_include_and_continue(*child));
    found
}

fn slice(source: &[u8], start: usize, end: usize) -> String {
    let end = end.min(source.len());
    let start = start.min(end);
    String::from_utf8_lossy(&source[start..end]).into_owned()
}

/// Reconstruct the outline entry for `node`, a node the classifier accepted as a
/// definition. `start` is where the signature begins; it precedes `node` when the node
/// was reached through an unwrap wrapper such as `export`.
pub fn reconstruct<'t>(c: &Classifier, node: Node<'t>, start: usize) -> Outline<'t> {
    let source = c.source();

    if c.is_assignment(node) {
        let signature = if let Some(boundary) = find_assignment_boundary(c, node) {
            let sig = slice(source, start, boundary.start_byte());
            let sig = sig.trim();
            sig.strip_suffix('=').unwrap_or(sig).trim_end().to_string()
        } else if let Some(last) = find_identifiers(c, node).last() {
            slice(source, start, last.end_byte())
        } else {
            tracing::trace!(kind = node.kind(), "assignment without identifier");
            let mut sig = slice(source, start, node.end_byte());
            sig.push(' ');
            sig
        };
        return Outline::Emit {
            signature,
            descend: None,
        };
    }

    if c.is_pass_through_parent(node) {
        let Some(first) = first_definition_child(c, node) else {
            tracing::trace!(kind = node.kind(), "pass-through parent without definitions");
            return Outline::Skip;
        };
        return Outline::Emit {
            signature: slice(source, start, first.start_byte()),
            descend: Some(Descend {
                base: node,
                parent: None,
            }),
        };
    }

    let Some(body) = find_implementation_boundary(c, node) else {
        tracing::trace!(kind = node.kind(), "no implementation boundary");
        return Outline::Emit {
            signature: slice(source, start, node.end_byte()),
            descend: None,
        };
    };

    let end = if body.id() == node.id() {
        first_definition_child(c, body)
            .map(|first| first.start_byte())
            .unwrap_or_else(|| body.end_byte())
    } else {
        body.start_byte()
    };

    let descend = c.is_parent(node).then_some(Descend {
        base: body,
        parent: Some(node),
    });

    Outline::Emit {
        signature: slice(source, start, end),
        descend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn first_top_level<'t>(tree: &'t tree_sitter::Tree) -> Node<'t> {
        tree.root_node().child(0).unwrap()
    }

    fn signature_of(lang: Language, src: &str) -> String {
        let mut parser = lang.parser().unwrap();
        let tree = parser.parse(src, None).unwrap();
        let node = first_top_level(&tree);
        let c = Classifier::new(lang, src.as_bytes());
        match reconstruct(&c, node, node.start_byte()) {
            Outline::Emit { signature, .. } => signature,
            Outline::Skip => String::new(),
        }
    }

    #[test]
    fn assignment_stops_before_equals() {
        assert_eq!(signature_of(Language::TypeScript, "const answer = 42;"), "const answer");
        assert_eq!(signature_of(Language::Rust, "const N: u32 = 3;"), "const N: u32");
    }

    #[test]
    fn regular_definition_stops_before_body() {
        let sig = signature_of(Language::Python, "def add(a, b):\n    return a + b\n");
        assert_eq!(sig.trim(), "def add(a, b):");

        let sig = signature_of(Language::Rust, "pub fn run(x: i32) -> i32 { x }");
        assert_eq!(sig.trim(), "pub fn run(x: i32) -> i32");
    }

    #[test]
    fn parent_descends_into_body() {
        let src = "class A {\n  m(): void {}\n}\n";
        let mut parser = Language::TypeScript.parser().unwrap();
        let tree = parser.parse(src, None).unwrap();
        let node = first_top_level(&tree);
        let c = Classifier::new(Language::TypeScript, src.as_bytes());
        match reconstruct(&c, node, node.start_byte()) {
            Outline::Emit { signature, descend } => {
                assert_eq!(signature.trim(), "class A");
                let d = descend.expect("class should descend");
                assert_eq!(d.base.kind(), "class_body");
                assert_eq!(d.parent.map(|p| p.kind()), Some("class_declaration"));
            }
            Outline::Skip => panic!("class skipped"),
        }
    }

    #[test]
    fn identifiers_in_source_order() {
        let src = "let a = b;";
        let mut parser = Language::JavaScript.parser().unwrap();
        let tree = parser.parse(src, None).unwrap();
        let c = Classifier::new(Language::JavaScript, src.as_bytes());
        let ids: Vec<&str> = find_identifiers(&c, tree.root_node())
            .into_iter()
            .map(|n| n.utf8_text(src.as_bytes()).unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
