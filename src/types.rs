use serde::Serialize;
use std::collections::HashMap;

/// Sentinel rendered for files the engine does not map.
pub const NO_MAP: &str = "[NO MAP]";

/// Sentinel rendered by queue workers for inputs over the size cap.
pub const NO_MAP_TOO_LARGE: &str = "[NO MAP - TOO LARGE]";

pub const KIND_NO_MAP: &str = "no_map";
pub const KIND_TAG: &str = "tag";
pub const KIND_SVELTE_SCRIPT: &str = "svelte-script";
pub const KIND_SVELTE_STYLE: &str = "svelte-style";

/// Rendered outline per input path, as returned for a batch.
pub type FileMapBodies = HashMap<String, String>;

/// S-expression parse tree per input path.
pub type MapTrees = HashMap<String, String>;

/// One outlined construct of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Definition {
    /// Node kind, carried verbatim from the syntax tree (`function_declaration`) or
    /// synthesized (`tag`, `h1`..`h6`, `svelte-script`, `svelte-style`, `no_map`).
    pub kind: String,

    /// Header text up to (not including) the body or assigned value.
    pub signature: String,

    /// Leading comments. Never populated; kept so the record shape is stable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,

    /// Condensed `#id` / `.c1.c2.c3` attributes of markup tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_attrs: Vec<String>,

    /// Run length after consolidation; 1 means not collapsed.
    pub tag_reps: usize,

    /// 1-based start line
    pub line: usize,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Definition>,
}

impl Definition {
    pub fn new(kind: impl Into<String>, signature: impl Into<String>, line: usize) -> Self {
        Self {
            kind: kind.into(),
            signature: signature.into(),
            tag_reps: 1,
            line,
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<Definition>) -> Self {
        self.children = children;
        self
    }

    pub fn is_tag(&self) -> bool {
        self.kind == KIND_TAG
    }

    /// Markup equivalence used by consolidation: kind, signature and attributes only.
    /// Line numbers and repetition counts deliberately do not participate.
    pub fn same_markup(&self, other: &Definition) -> bool {
        self.kind == other.kind && self.signature == other.signature && self.tag_attrs == other.tag_attrs
    }
}

/// Ordered top-level definitions of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileMap {
    pub definitions: Vec<Definition>,
}

impl FileMap {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The map of an unsupported file: a single `[NO MAP]` record.
    pub fn no_map() -> Self {
        Self {
            definitions: vec![Definition::new(KIND_NO_MAP, NO_MAP, 0)],
        }
    }

    pub fn is_no_map(&self) -> bool {
        matches!(self.definitions.as_slice(), [only] if only.kind == KIND_NO_MAP)
    }
}
