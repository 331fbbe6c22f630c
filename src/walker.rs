use crate::classify::Classifier;
use crate::language::Language;
use crate::signature::{self, Outline};
use crate::types::Definition;
use tree_sitter::Node;

/// Walks the direct children of a node, emitting definitions and recursing only into
/// the bodies of parent definitions.
pub struct Walker<'s> {
    classifier: Classifier<'s>,
}

impl<'s> Walker<'s> {
    pub fn new(lang: Language, source: &'s [u8]) -> Self {
        Self {
            classifier: Classifier::new(lang, source),
        }
    }

    /// Definitions found among the children of `base`. `parent` is the definition that
    /// owns `base`, if any; it only matters for `only_children` restrictions.
    pub fn map_traditional(&self, base: Node, parent: Option<Node>) -> Vec<Definition> {
        let c = &self.classifier;
        let mut defs = Vec::new();

        let mut cursor = base.walk();
        for child in base.children(&mut cursor) {
            let start = child.start_byte();
            let line = child.start_position().row + 1;

            let node = match c.unwrap_fields(child) {
                Some(fields) => {
                    let inner = fields.iter().find_map(|f| child.child_by_field_name(*f));
                    match inner {
                        Some(inner) => {
                            tracing::trace!(wrapper = child.kind(), inner = inner.kind(), "unwrap");
                            inner
                        }
                        None => continue,
                    }
                }
                None => child,
            };

            if c.is_include_and_continue(node) {
                tracing::trace!(kind = node.kind(), "include and continue");
                continue;
            }

            if !c.is_definition(node, parent) {
                tracing::trace!(kind = node.kind(), "not a definition");
                continue;
            }

            match signature::reconstruct(c, node, start) {
                Outline::Skip => {}
                Outline::Emit { signature, descend } => {
                    tracing::trace!(kind = node.kind(), line, %signature, "definition");
                    let children = descend
                        .map(|d| self.map_traditional(d.base, d.parent))
                        .unwrap_or_default();
                    defs.push(Definition::new(node.kind(), signature, line).with_children(children));
                }
            }
        }

        defs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(lang: Language, src: &str) -> Vec<Definition> {
        let mut parser = lang.parser().unwrap();
        let tree = parser.parse(src, None).unwrap();
        Walker::new(lang, src.as_bytes()).map_traditional(tree.root_node(), None)
    }

    #[test]
    fn skips_imports_and_statements() {
        let defs = walk(
            Language::Python,
            "import os\nprint('hi')\n\ndef main():\n    pass\n",
        );
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].kind, "function_definition");
        assert_eq!(defs[0].line, 4);
    }

    #[test]
    fn nests_methods_under_impl() {
        let src = "struct S;\n\nimpl S {\n    fn a(&self) {}\n    fn b(&self) {}\n}\n";
        let defs = walk(Language::Rust, src);
        let kinds: Vec<&str> = defs.iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(kinds, vec!["struct_item", "impl_item"]);
        let impl_def = &defs[1];
        assert_eq!(impl_def.signature.trim(), "impl S");
        assert_eq!(impl_def.children.len(), 2);
        assert_eq!(impl_def.children[1].line, 5);
    }

    #[test]
    fn export_keeps_wrapper_prefix() {
        let defs = walk(Language::TypeScript, "export interface Props { a: string }\n");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].kind, "interface_declaration");
        assert!(defs[0].signature.starts_with("export interface Props"));
    }

    #[test]
    fn does_not_descend_into_functions() {
        let defs = walk(Language::JavaScript, "function f() { const inner = 1; }\n");
        assert_eq!(defs.len(), 1);
        assert!(defs[0].children.is_empty());
    }
}
