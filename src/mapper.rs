use tokio_util::sync::CancellationToken;
use tree_sitter::Tree;

use crate::dockerfile::map_dockerfile;
use crate::error::{MapError, Result};
use crate::language::{self, Language};
use crate::markdown::map_markdown;
use crate::markup::map_markup;
use crate::svelte::map_svelte;
use crate::types::FileMap;
use crate::walker::Walker;

fn parse(lang: Language, content: &[u8]) -> Option<Tree> {
    let mut parser = lang.parser()?;
    parser.parse(content, None)
}

fn root_is_usable(tree: &Tree) -> bool {
    !tree.root_node().is_error()
}

/// Parse with the primary grammar, retrying with the fallback grammar when `usable`
/// rejects the primary tree. Returns the tree and the language it was parsed as.
fn parse_with_fallback(
    path: &str,
    lang: Language,
    fallback: Option<Language>,
    content: &[u8],
    usable: impl Fn(&Tree) -> bool,
) -> Option<(Tree, Language)> {
    let primary = parse(lang, content);
    match primary {
        Some(tree) if usable(&tree) => return Some((tree, lang)),
        Some(_) => tracing::info!(path, language = lang.as_str(), "parse error at root"),
        None => tracing::info!(path, language = lang.as_str(), "no tree from primary parser"),
    }

    let Some(fallback) = fallback else {
        return None;
    };
    match parse(fallback, content) {
        Some(tree) if usable(&tree) => {
            tracing::info!(path, language = fallback.as_str(), "mapped with fallback grammar");
            Some((tree, fallback))
        }
        _ => {
            tracing::info!(path, language = fallback.as_str(), "fallback parse failed");
            None
        }
    }
}

/// Outline one file.
///
/// Unsupported paths map to the `[NO MAP]` sentinel. A file no grammar can parse maps
/// to an empty outline. The token is checked on entry and again between parsing and
/// walking; a cancelled token yields [`MapError::Cancelled`].
pub fn map_file(cancel: &CancellationToken, path: &str, content: &[u8]) -> Result<FileMap> {
    map_file_with(cancel, path, content, root_is_usable)
}

fn map_file_with(
    cancel: &CancellationToken,
    path: &str,
    content: &[u8],
    usable: impl Fn(&Tree) -> bool,
) -> Result<FileMap> {
    if cancel.is_cancelled() {
        return Err(MapError::Cancelled);
    }

    let resolved = language::resolve(path);
    let Some(lang) = resolved.language.filter(|l| l.has_map_support()) else {
        tracing::info!(path, "unsupported file type");
        return Ok(FileMap::no_map());
    };

    match lang {
        Language::Markdown => return Ok(FileMap::new(map_markdown(content))),
        Language::Dockerfile => return Ok(FileMap::new(map_dockerfile(content))),
        _ => {}
    }

    if resolved.grammar.is_none() {
        tracing::info!(path, language = lang.as_str(), "no grammar compiled in");
        return Ok(FileMap::empty());
    }

    let Some((tree, parsed_as)) = parse_with_fallback(path, lang, resolved.fallback, content, usable) else {
        return Ok(FileMap::empty());
    };

    if cancel.is_cancelled() {
        return Err(MapError::Cancelled);
    }

    let root = tree.root_node();
    let definitions = match lang {
        Language::Html => map_markup(root, content),
        Language::Svelte => map_svelte(root, content),
        _ => Walker::new(parsed_as, content).map_traditional(root, None),
    };

    if definitions.is_empty() {
        tracing::debug!(path, language = parsed_as.as_str(), "no definitions mapped");
    }

    Ok(FileMap::new(definitions))
}

/// S-expression of a file's parse tree (diagnostics).
pub fn parse_tree(path: &str, content: &[u8]) -> Result<String> {
    let resolved = language::resolve(path);
    let Some(lang) = resolved.language.filter(|_| resolved.grammar.is_some()) else {
        return Err(MapError::unsupported(path));
    };
    let tree = parse(lang, content).ok_or_else(|| MapError::parse(path))?;
    Ok(tree.root_node().to_sexp())
}
