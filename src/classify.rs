//! Node classification: rule types, compiled table lookup and the composition of
//! tables into "is this node a definition?".

use crate::language::Language;
use crate::node_tables;
use std::collections::HashMap;
use std::sync::OnceLock;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Equal,
    Prefix,
    Suffix,
}

/// Languages a rule applies to.
#[derive(Debug, Clone, Copy)]
pub enum Scope {
    All,
    AllExcept(&'static [Language]),
    Only(&'static [Language]),
}

impl Scope {
    pub fn includes(self, lang: Language) -> bool {
        match self {
            Scope::All => true,
            Scope::AllExcept(except) => !except.contains(&lang),
            Scope::Only(langs) => langs.contains(&lang),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NodeRule {
    pub pattern: &'static str,
    pub match_kind: MatchKind,
    pub scope: Scope,
    /// An ignore rule vetoes every other candidate for the same kind.
    pub ignore: bool,
    /// Parent rules only: children are classified only if their kind is listed.
    pub only_children: Option<&'static [&'static str]>,
}

impl NodeRule {
    pub const fn equal(pattern: &'static str, scope: Scope) -> Self {
        Self::new(pattern, MatchKind::Equal, scope)
    }

    pub const fn prefix(pattern: &'static str, scope: Scope) -> Self {
        Self::new(pattern, MatchKind::Prefix, scope)
    }

    pub const fn suffix(pattern: &'static str, scope: Scope) -> Self {
        Self::new(pattern, MatchKind::Suffix, scope)
    }

    const fn new(pattern: &'static str, match_kind: MatchKind, scope: Scope) -> Self {
        Self {
            pattern,
            match_kind,
            scope,
            ignore: false,
            only_children: None,
        }
    }

    pub const fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub const fn only_children(mut self, kinds: &'static [&'static str]) -> Self {
        self.only_children = Some(kinds);
        self
    }

    fn matches(&self, kind: &str) -> bool {
        match self.match_kind {
            MatchKind::Equal => kind == self.pattern,
            MatchKind::Prefix => kind.starts_with(self.pattern),
            MatchKind::Suffix => kind.ends_with(self.pattern),
        }
    }
}

/// A wrapper node whose classification is re-applied to one of its fields.
#[derive(Debug, Clone, Copy)]
pub struct UnwrapRule {
    pub rule: NodeRule,
    /// Candidate grammar fields, tried in order.
    pub fields: &'static [&'static str],
}

/// One rule list, indexed for lookup.
pub struct NodeTable {
    rules: &'static [NodeRule],
    exact: HashMap<&'static str, usize>,
    patterns: Vec<usize>,
}

impl NodeTable {
    pub fn new(rules: &'static [NodeRule]) -> Self {
        let mut exact = HashMap::new();
        let mut patterns = Vec::new();
        for (idx, rule) in rules.iter().enumerate() {
            match rule.match_kind {
                MatchKind::Equal => {
                    exact.entry(rule.pattern).or_insert(idx);
                }
                MatchKind::Prefix | MatchKind::Suffix => patterns.push(idx),
            }
        }
        Self {
            rules,
            exact,
            patterns,
        }
    }

    /// Rule that classifies `kind` for `lang`, if any.
    ///
    /// An exact rule wins when its scope includes the language. Otherwise every
    /// prefix/suffix rule is scanned: an ignore candidate takes precedence, else the first
    /// candidate in declaration order.
    pub fn lookup(&self, kind: &str, lang: Language) -> Option<&'static NodeRule> {
        let rules: &'static [NodeRule] = self.rules;

        if let Some(&idx) = self.exact.get(kind) {
            let rule = &rules[idx];
            if rule.scope.includes(lang) {
                return Some(rule);
            }
        }

        let mut found: Option<&'static NodeRule> = None;
        for &idx in &self.patterns {
            let rule = &rules[idx];
            if !rule.matches(kind) || !rule.scope.includes(lang) {
                continue;
            }
            match found {
                None => found = Some(rule),
                Some(_) if rule.ignore => found = Some(rule),
                Some(_) => {}
            }
        }
        found
    }

    /// True when a non-ignore rule classifies the kind.
    pub fn accepts(&self, kind: &str, lang: Language) -> bool {
        self.lookup(kind, lang).is_some_and(|rule| !rule.ignore)
    }
}

pub struct Tables {
    pub assignment: NodeTable,
    pub definition: NodeTable,
    pub parent: NodeTable,
    pub impl_boundary: NodeTable,
    pub assignment_boundary: NodeTable,
    pub identifier: NodeTable,
    pub pass_through_parent: NodeTable,
    pub include_and_continue: NodeTable,
    pub unwrap: &'static [UnwrapRule],
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            assignment: NodeTable::new(node_tables::ASSIGNMENT),
            definition: NodeTable::new(node_tables::DEFINITION),
            parent: NodeTable::new(node_tables::PARENT),
            impl_boundary: NodeTable::new(node_tables::IMPL_BOUNDARY),
            assignment_boundary: NodeTable::new(node_tables::ASSIGNMENT_BOUNDARY),
            identifier: NodeTable::new(node_tables::IDENTIFIER),
            pass_through_parent: NodeTable::new(node_tables::PASS_THROUGH_PARENT),
            include_and_continue: NodeTable::new(node_tables::INCLUDE_AND_CONTINUE),
            unwrap: node_tables::UNWRAP,
        }
    }
}

pub fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(Tables::default)
}

/// Elixir parses every `def*` macro as a generic `call`; the leading identifier decides
/// what it really is.
fn refine_elixir_call(node: Node, source: &[u8]) -> Option<&'static str> {
    let target = node
        .child_by_field_name("target")
        .or_else(|| node.child(0))?;
    let token = source.get(target.start_byte()..target.end_byte())?;

    let kind = match token {
        b"defmodule" => "module_definition",
        b"defprotocol" => "protocol_definition",
        b"defimpl" => "protocol_implementation",
        b"defstruct" => "struct_definition",
        b"defexception" => "exception_definition",
        b"defdelegate" => "delegate_definition",
        b"defoverridable" => "overridable_definition",
        b"defcallback" => "callback_definition",
        b"defmacrocallback" => "macro_callback_definition",
        b"defmacrop" => "private_macro_definition",
        b"defmacro" => "macro_definition",
        b"defguardp" => "private_guard_definition",
        b"defguard" => "guard_definition",
        b"defp" => "private_function_definition",
        b"def" => "function_definition",
        _ => return None,
    };
    Some(kind)
}

/// Classifies nodes of one parsed source in one language.
#[derive(Clone, Copy)]
pub struct Classifier<'s> {
    lang: Language,
    source: &'s [u8],
    tables: &'static Tables,
}

impl<'s> Classifier<'s> {
    pub fn new(lang: Language, source: &'s [u8]) -> Self {
        Self {
            lang,
            source,
            tables: tables(),
        }
    }

    pub fn source(&self) -> &'s [u8] {
        self.source
    }

    /// The kind used for table lookups, after language-specific refinement.
    pub fn kind(&self, node: Node) -> &'static str {
        let kind = node.kind();
        if self.lang == Language::Elixir && kind == "call" {
            if let Some(refined) = refine_elixir_call(node, self.source) {
                return refined;
            }
        }
        kind
    }

    pub fn is_assignment(&self, node: Node) -> bool {
        self.tables.assignment.accepts(self.kind(node), self.lang)
    }

    pub fn is_parent(&self, node: Node) -> bool {
        self.tables.parent.accepts(self.kind(node), self.lang)
    }

    pub fn is_impl_boundary(&self, node: Node) -> bool {
        self.tables.impl_boundary.accepts(self.kind(node), self.lang)
    }

    pub fn is_assignment_boundary(&self, node: Node) -> bool {
        self.tables.assignment_boundary.accepts(self.kind(node), self.lang)
    }

    pub fn is_identifier(&self, node: Node) -> bool {
        self.tables.identifier.accepts(self.kind(node), self.lang)
    }

    pub fn is_pass_through_parent(&self, node: Node) -> bool {
        self.tables.pass_through_parent.accepts(self.kind(node), self.lang)
    }

    pub fn is_include_and_continue(&self, node: Node) -> bool {
        self.tables.include_and_continue.accepts(self.kind(node), self.lang)
    }

    /// Fields to look through when `node` is an unwrap wrapper.
    pub fn unwrap_fields(&self, node: Node) -> Option<&'static [&'static str]> {
        let kind = self.kind(node);
        self.tables
            .unwrap
            .iter()
            .find(|u| u.rule.matches(kind) && u.rule.scope.includes(self.lang) && !u.rule.ignore)
            .map(|u| u.fields)
    }

    /// Whether `node` should be emitted as a definition when found under `parent`.
    ///
    /// A Definition-table rule decides on its own; without one, assignments and parents
    /// count as definitions. Either way a parent's `only_children` restriction applies.
    pub fn is_definition(&self, node: Node, parent: Option<Node>) -> bool {
        let kind = self.kind(node);

        let res = match self.tables.definition.lookup(kind, self.lang) {
            Some(rule) => !rule.ignore,
            None => self.is_assignment(node) || self.is_parent(node),
        };
        if !res {
            return false;
        }

        let restriction = parent
            .and_then(|p| self.tables.parent.lookup(self.kind(p), self.lang))
            .and_then(|rule| rule.only_children);

        match restriction {
            Some(allowed) => allowed.contains(&kind),
            None => true,
        }
    }
}
