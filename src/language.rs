//! Grammar registry: file path → language tag, primary grammar, fallback grammar.

use serde::Serialize;
use std::path::Path;
use tree_sitter::Parser;

/// Every language the engine recognises.
///
/// Recognising a language does not imply mapping it: configuration and data formats
/// resolve to a tag but report `has_map_support() == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bash,
    C,
    Cpp,
    CSharp,
    Css,
    Cue,
    Dockerfile,
    Elixir,
    Elm,
    Go,
    Groovy,
    Hcl,
    Html,
    Java,
    JavaScript,
    Json,
    Kotlin,
    Lua,
    Markdown,
    OCaml,
    Php,
    Protobuf,
    Python,
    Ruby,
    Rust,
    Scala,
    Svelte,
    Swift,
    Toml,
    TypeScript,
    Tsx,
    Yaml,
}

impl Language {
    /// Detect language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext.to_ascii_lowercase().as_str() {
            "sh" | "bash" => Self::Bash,
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Self::Cpp,
            "cs" => Self::CSharp,
            "css" => Self::Css,
            "cue" => Self::Cue,
            "ex" | "exs" => Self::Elixir,
            "elm" => Self::Elm,
            "go" => Self::Go,
            "groovy" => Self::Groovy,
            "hcl" => Self::Hcl,
            "html" | "htm" => Self::Html,
            "java" => Self::Java,
            "js" | "mjs" | "cjs" => Self::JavaScript,
            "json" => Self::Json,
            "jsx" | "tsx" => Self::Tsx,
            "kt" | "kts" => Self::Kotlin,
            "lua" => Self::Lua,
            "md" | "markdown" => Self::Markdown,
            "ml" => Self::OCaml,
            "php" => Self::Php,
            "proto" => Self::Protobuf,
            "py" => Self::Python,
            "rb" => Self::Ruby,
            "rs" => Self::Rust,
            "scala" => Self::Scala,
            "svelte" => Self::Svelte,
            "swift" => Self::Swift,
            "toml" => Self::Toml,
            "ts" | "mts" | "cts" => Self::TypeScript,
            "yaml" | "yml" => Self::Yaml,
            _ => return None,
        };
        Some(lang)
    }

    /// Detect language from a path. A base name containing `dockerfile` wins over the
    /// extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if is_dockerfile_name(path) {
            return Some(Self::Dockerfile);
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Css => "css",
            Self::Cue => "cue",
            Self::Dockerfile => "dockerfile",
            Self::Elixir => "elixir",
            Self::Elm => "elm",
            Self::Go => "go",
            Self::Groovy => "groovy",
            Self::Hcl => "hcl",
            Self::Html => "html",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::Json => "json",
            Self::Kotlin => "kotlin",
            Self::Lua => "lua",
            Self::Markdown => "markdown",
            Self::OCaml => "ocaml",
            Self::Php => "php",
            Self::Protobuf => "protobuf",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::Scala => "scala",
            Self::Svelte => "svelte",
            Self::Swift => "swift",
            Self::Toml => "toml",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Yaml => "yaml",
        }
    }

    /// Config languages aren't mapped (the reader decides from the file name whether to
    /// load them); the rest simply have no outline rules.
    pub fn has_map_support(self) -> bool {
        !matches!(
            self,
            Self::Hcl
                | Self::Yaml
                | Self::Toml
                | Self::Cue
                | Self::Json
                | Self::Protobuf
                | Self::Groovy
                | Self::OCaml
        )
    }

    /// Languages mapped from a tree-sitter tree. Markdown and Dockerfile use line-based
    /// mappers instead.
    pub fn is_tree_sitter(self) -> bool {
        self.has_map_support() && !matches!(self, Self::Markdown | Self::Dockerfile)
    }

    /// Grammar used to parse this language. `None` when no grammar is compiled in.
    pub fn grammar(self) -> Option<tree_sitter::Language> {
        let lang: tree_sitter::Language = match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Css => tree_sitter_css::LANGUAGE.into(),
            // Svelte templates parse as permissive HTML; script/style are re-parsed later.
            Self::Html | Self::Svelte => tree_sitter_html::LANGUAGE.into(),

            #[cfg(feature = "lang-go")]
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            #[cfg(feature = "lang-java")]
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            #[cfg(feature = "lang-csharp")]
            Self::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            #[cfg(feature = "lang-php")]
            Self::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            #[cfg(feature = "lang-c")]
            Self::C => tree_sitter_c::LANGUAGE.into(),
            #[cfg(feature = "lang-cpp")]
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            #[cfg(feature = "lang-ruby")]
            Self::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            #[cfg(feature = "lang-bash")]
            Self::Bash => tree_sitter_bash::LANGUAGE.into(),
            #[cfg(feature = "lang-lua")]
            Self::Lua => tree_sitter_lua::LANGUAGE.into(),
            #[cfg(feature = "lang-elixir")]
            Self::Elixir => tree_sitter_elixir::LANGUAGE.into(),
            #[cfg(feature = "lang-scala")]
            Self::Scala => tree_sitter_scala::LANGUAGE.into(),
            #[cfg(feature = "lang-swift")]
            Self::Swift => tree_sitter_swift::LANGUAGE.into(),
            #[cfg(feature = "lang-kotlin")]
            Self::Kotlin => tree_sitter_kotlin_ng::LANGUAGE.into(),
            #[cfg(feature = "lang-elm")]
            Self::Elm => tree_sitter_elm::LANGUAGE.into(),

            _ => return None,
        };
        Some(lang)
    }

    /// Second grammar tried when the primary parse yields an error root.
    /// Plain `.ts`/`.js` files frequently contain JSX.
    pub fn fallback(self) -> Option<Language> {
        match self {
            Self::TypeScript | Self::JavaScript => Some(Self::Tsx),
            _ => None,
        }
    }

    /// A fresh parser for this language. Parsers are never shared between tasks.
    pub fn parser(self) -> Option<Parser> {
        let grammar = self.grammar()?;
        let mut parser = Parser::new();
        match parser.set_language(&grammar) {
            Ok(()) => Some(parser),
            Err(e) => {
                tracing::info!(language = self.as_str(), "failed to set parser language: {e}");
                None
            }
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a path against the registry.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub language: Option<Language>,
    pub grammar: Option<tree_sitter::Language>,
    pub fallback: Option<Language>,
}

impl Resolved {
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
    }
}

/// Resolve `(primary grammar, fallback grammar, language tag)` for a path.
///
/// Line-based languages resolve to `(None, None, tag)`; unknown paths resolve to
/// `(None, None, None)`.
pub fn resolve(path: &str) -> Resolved {
    let Some(language) = Language::from_path(path) else {
        return Resolved {
            language: None,
            grammar: None,
            fallback: None,
        };
    };

    if !language.is_tree_sitter() {
        return Resolved {
            language: Some(language),
            grammar: None,
            fallback: None,
        };
    }

    Resolved {
        language: Some(language),
        grammar: language.grammar(),
        fallback: language.fallback().filter(|fb| fb.grammar().is_some()),
    }
}

/// Whether `map_file` would produce an outline (anything other than `[NO MAP]`).
pub fn has_map_support(path: &str) -> bool {
    Language::from_path(path).is_some_and(|lang| lang.has_map_support())
}

fn is_dockerfile_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_ascii_lowercase().contains("dockerfile"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("TS"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("jsx"), Some(Language::Tsx));
        assert_eq!(Language::from_extension("md"), Some(Language::Markdown));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn test_dockerfile_heuristic() {
        assert_eq!(Language::from_path("Dockerfile"), Some(Language::Dockerfile));
        assert_eq!(Language::from_path("deploy/api.dockerfile"), Some(Language::Dockerfile));
        assert_eq!(Language::from_path("Dockerfile.prod"), Some(Language::Dockerfile));
        // Only the base name counts.
        assert_eq!(Language::from_path("dockerfiles/main.go"), Some(Language::Go));
    }

    #[test]
    fn test_resolve_tree_sitter() {
        let r = resolve("src/app.ts");
        assert_eq!(r.language, Some(Language::TypeScript));
        assert!(r.grammar.is_some());
        assert_eq!(r.fallback, Some(Language::Tsx));

        let r = resolve("lib.rs");
        assert!(r.grammar.is_some());
        assert_eq!(r.fallback, None);
    }

    #[test]
    fn test_resolve_line_based_and_unknown() {
        let r = resolve("README.md");
        assert_eq!(r.language, Some(Language::Markdown));
        assert!(r.grammar.is_none());

        let r = resolve("Dockerfile");
        assert_eq!(r.language, Some(Language::Dockerfile));
        assert!(r.grammar.is_none());

        assert!(resolve("note.xyz").is_empty());
        assert!(resolve("Makefile").is_empty());
    }

    #[test]
    fn test_map_support() {
        assert!(has_map_support("a.py"));
        assert!(has_map_support("a.svelte"));
        assert!(has_map_support("Dockerfile"));
        assert!(has_map_support("src/Main.elm"));
        assert!(!has_map_support("config.yaml"));
        assert!(!has_map_support("package.json"));
        assert!(!has_map_support("note.xyz"));
    }

    #[test]
    fn test_parsers_construct() {
        for lang in [Language::Rust, Language::TypeScript, Language::Tsx, Language::Css, Language::Html] {
            assert!(lang.parser().is_some(), "no parser for {lang}");
        }
        assert!(Language::Markdown.parser().is_none());
    }

    #[cfg(feature = "lang-elm")]
    #[test]
    fn test_elm_resolves_grammar() {
        let r = resolve("src/Main.elm");
        assert_eq!(r.language, Some(Language::Elm));
        assert!(r.grammar.is_some());
        assert!(Language::Elm.is_tree_sitter());
    }
}
