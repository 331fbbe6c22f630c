use anyhow::{Context, Result};
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Files above this size are not even read. Smaller inputs over the mapper's own cap
/// still reach the queue and come back as `[NO MAP - TOO LARGE]`.
pub const SCAN_MAX_FILE_BYTES: u64 = 8 * 1024 * 1024;

/// Dependency, build and editor directories never worth mapping.
const JUNK_DIRS: &[&str] = &[
    ".git",
    ".next",
    ".nuxt",
    ".svelte-kit",
    ".vscode",
    "build",
    "coverage",
    "dist",
    "node_modules",
    "out",
    "target",
];

const LOCKFILES: &[&str] = &["*.lock", "package-lock.json", "pnpm-lock.yaml"];

/// Sourcemaps, images and fonts.
const ASSET_EXTENSIONS: &[&str] = &["map", "svg", "png", "ico", "jpg", "jpeg", "gif", "woff", "woff2"];

/// Exclude a directory by name at any depth. The bare entry and its contents both need a
/// glob or the walker still descends.
fn exclude_dir(ob: &mut OverrideBuilder, name: &str) -> Result<()> {
    ob.add(&format!("!**/{name}"))?;
    ob.add(&format!("!**/{name}/**"))?;
    Ok(())
}

fn scan_overrides(repo_root: &Path, extra_dirs: &[String]) -> Result<Override> {
    let mut ob = OverrideBuilder::new(repo_root);
    for glob in LOCKFILES {
        ob.add(&format!("!**/{glob}"))?;
    }
    for ext in ASSET_EXTENSIONS {
        ob.add(&format!("!**/*.{ext}"))?;
    }

    let configured = extra_dirs.iter().map(|d| d.trim().trim_matches('/'));
    for name in JUNK_DIRS.iter().copied().chain(configured) {
        if !name.is_empty() {
            exclude_dir(&mut ob, name)?;
        }
    }
    Ok(ob.build()?)
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub abs_path: PathBuf,
    pub rel_path: PathBuf,
    pub bytes: u64,
}

impl FileEntry {
    /// Entry for a file of `bytes` bytes, keyed relative to the first base it sits under.
    /// Empty files, files over `max_bytes` and files under no base are dropped.
    fn sized(abs_path: PathBuf, bytes: u64, max_bytes: u64, bases: &[&Path]) -> Option<Self> {
        if bytes == 0 || bytes > max_bytes {
            return None;
        }
        let rel_path = bases.iter().find_map(|base| abs_path.strip_prefix(base).ok())?.to_path_buf();
        Some(Self {
            abs_path,
            rel_path,
            bytes,
        })
    }

    /// Path key used in map results: relative, `/`-separated.
    pub fn key(&self) -> String {
        self.rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub repo_root: PathBuf,
    pub target: PathBuf,
    pub max_file_bytes: u64,
    pub exclude_dir_names: Vec<String>,
}

impl ScanOptions {
    pub fn target_root(&self) -> PathBuf {
        if self.target.is_absolute() {
            self.target.clone()
        } else {
            self.repo_root.join(&self.target)
        }
    }
}

/// Files under the target, sorted by relative path. Honors `.gitignore` and friends on
/// top of the built-in and configured exclusions. A file target yields at most itself.
pub fn scan_workspace(opts: &ScanOptions) -> Result<Vec<FileEntry>> {
    let target_root = opts.target_root();
    let meta = std::fs::metadata(&target_root)
        .with_context(|| format!("Target does not exist: {}", target_root.display()))?;

    if meta.is_file() {
        // outside the repo the key is just the file name
        let dir = target_root.parent().unwrap_or(Path::new(""));
        let bases = [opts.repo_root.as_path(), dir];
        let entry = FileEntry::sized(target_root.clone(), meta.len(), opts.max_file_bytes, &bases);
        return Ok(entry.into_iter().collect());
    }

    let walker = WalkBuilder::new(&target_root)
        .standard_filters(true)
        .overrides(scan_overrides(&opts.repo_root, &opts.exclude_dir_names)?)
        .build();
    let bases = [opts.repo_root.as_path(), target_root.as_path()];

    let mut entries: Vec<FileEntry> = walker
        .filter_map(|item| item.ok())
        .filter(|dent| dent.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|dent| {
            let bytes = dent.metadata().ok()?.len();
            FileEntry::sized(dent.into_path(), bytes, opts.max_file_bytes, &bases)
        })
        .collect();

    entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    tracing::trace!(root = %target_root.display(), files = entries.len(), "walked");
    Ok(entries)
}

/// Read scanned files into `{path → content}` batch inputs. Files that are not valid
/// UTF-8 are treated as binary and left out.
pub fn read_inputs(entries: &[FileEntry]) -> Result<HashMap<String, String>> {
    let mut inputs = HashMap::with_capacity(entries.len());
    for entry in entries {
        let bytes = std::fs::read(&entry.abs_path)
            .with_context(|| format!("Failed to read {}", entry.abs_path.display()))?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                inputs.insert(entry.key(), text);
            }
            Err(_) => tracing::debug!(path = %entry.abs_path.display(), "skipping binary file"),
        }
    }
    Ok(inputs)
}
