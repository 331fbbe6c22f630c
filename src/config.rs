use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file looked up at the root of the mapped tree.
pub const CONFIG_FILE_NAME: &str = ".filemap.json";

/// Hard safety ceiling: inputs larger than this are **never** parsed, regardless of config.
/// This protects low-RAM machines from trying to Tree-sitter-parse a 10 MB minified bundle.
pub const ABSOLUTE_MAX_FILE_BYTES: usize = 1_000_000; // 1 MB

/// Controls the mapping queue: admission, per-job deadline and intra-job fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Pending jobs accepted before submissions fail with "queue full".
    pub capacity: usize,

    /// Deadline for one job, from dispatch to result.
    pub job_timeout_secs: u64,

    /// Files of one job mapped at the same time. `None` uses half the CPUs (at least 1).
    pub max_concurrency: Option<usize>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            job_timeout_secs: 60,
            max_concurrency: None,
        }
    }
}

impl QueueConfig {
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    pub fn effective_concurrency(&self) -> usize {
        match self.max_concurrency {
            Some(n) => n.max(1),
            None => default_concurrency(),
        }
    }
}

/// `max(1, cpus / 2)`.
pub fn default_concurrency() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus / 2).max(1)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Inputs above this size map to `[NO MAP - TOO LARGE]`.
    pub max_file_bytes: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: ABSOLUTE_MAX_FILE_BYTES,
        }
    }
}

impl MapperConfig {
    pub fn effective_max_file_bytes(&self) -> usize {
        self.max_file_bytes.min(ABSOLUTE_MAX_FILE_BYTES)
    }
}

/// Controls workspace scanning behavior (what to skip).
///
/// Note: `.gitignore` is always respected by the scanner; these are additional
/// hard skips for noisy monorepo directories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory *names* to skip anywhere in the tree (e.g. "generated", "tmp").
    ///
    /// These are compared against path components, not full paths.
    pub exclude_dir_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub queue: QueueConfig,
    pub mapper: MapperConfig,
    /// Settings that govern file discovery and exclusion.
    pub scan: ScanConfig,
}

pub fn load_config(repo_root: &Path) -> Config {
    let primary = repo_root.join(CONFIG_FILE_NAME);

    let text = std::fs::read_to_string(&primary);
    let Ok(text) = text else { return Config::default() };

    serde_json::from_str::<Config>(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %primary.display(), "ignoring malformed config: {e}");
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(dir.path());
        assert_eq!(cfg.queue.capacity, 20);
        assert_eq!(cfg.queue.job_timeout_secs, 60);
        assert_eq!(cfg.mapper.max_file_bytes, ABSOLUTE_MAX_FILE_BYTES);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "queue": { "max_concurrency": 3 }, "mapper": { "max_file_bytes": 5000000 } }"#,
        )
        .unwrap();
        let cfg = load_config(dir.path());
        assert_eq!(cfg.queue.effective_concurrency(), 3);
        assert_eq!(cfg.queue.capacity, 20);
        assert_eq!(cfg.mapper.effective_max_file_bytes(), ABSOLUTE_MAX_FILE_BYTES);
    }

    #[test]
    fn malformed_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert_eq!(load_config(dir.path()).queue.capacity, 20);
    }

    #[test]
    fn default_concurrency_is_at_least_one() {
        assert!(default_concurrency() >= 1);
        let cfg = QueueConfig {
            max_concurrency: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.effective_concurrency(), 1);
    }
}
