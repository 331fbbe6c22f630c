use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filemap::config::{load_config, Config};
use filemap::language;
use filemap::scanner::{read_inputs, scan_workspace, ScanOptions, SCAN_MAX_FILE_BYTES};
use filemap::{combined_map, combined_trees, map_file, map_trees, CancellationToken, MapQueue};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "filemap")]
#[command(version)]
#[command(about = "Language-aware file maps: definition outlines of source files for LLM context")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Map a file or directory (gitignore-aware) and print the combined outline
    Map {
        /// File or directory, relative to the current directory
        #[arg(value_name = "TARGET", default_value = ".")]
        target: PathBuf,
    },

    /// Print the combined parse trees of a file or directory (diagnostics)
    Trees {
        #[arg(value_name = "TARGET", default_value = ".")]
        target: PathBuf,
    },

    /// Print the outline of a single file
    Inspect {
        #[arg(value_name = "FILE_PATH")]
        file: PathBuf,

        /// Output the file map as JSON instead of outline text
        #[arg(long)]
        json: bool,
    },
}

/// `RUST_LOG` wins; otherwise warnings only, or everything from this crate when
/// `VERBOSE_LOGGING=true`.
fn init_tracing() {
    let verbose = std::env::var("VERBOSE_LOGGING").is_ok_and(|v| v == "true");
    let filter = match std::env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) if verbose => EnvFilter::new("warn,filemap=trace"),
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn scan_inputs(repo_root: &Path, target: &Path, cfg: &Config) -> Result<HashMap<String, String>> {
    let opts = ScanOptions {
        repo_root: repo_root.to_path_buf(),
        target: target.to_path_buf(),
        max_file_bytes: SCAN_MAX_FILE_BYTES,
        exclude_dir_names: cfg.scan.exclude_dir_names.clone(),
    };
    let entries = scan_workspace(&opts)?;
    tracing::debug!(files = entries.len(), "scanned");
    read_inputs(&entries)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let repo_root = std::env::current_dir().context("Failed to get current dir")?;
    let cfg = load_config(&repo_root);

    match cli.cmd {
        Command::Map { target } => {
            let inputs = scan_inputs(&repo_root, &target, &cfg)?;
            let rt = tokio::runtime::Runtime::new()?;
            let bodies = rt.block_on(async {
                let queue = MapQueue::from_config(&cfg);
                queue.map(inputs, CancellationToken::new()).await
            })?;
            print!("{}", combined_map(&bodies));
        }
        Command::Trees { target } => {
            let mut inputs = scan_inputs(&repo_root, &target, &cfg)?;
            // the batch fails on any path without a grammar
            inputs.retain(|path, _| language::resolve(path).grammar.is_some());
            let rt = tokio::runtime::Runtime::new()?;
            let trees = rt.block_on(map_trees(&CancellationToken::new(), inputs))?;
            print!("{}", combined_trees(&trees));
        }
        Command::Inspect { file, json } => {
            let abs = if file.is_absolute() { file.clone() } else { repo_root.join(&file) };
            let content = std::fs::read(&abs).with_context(|| format!("Failed to read {}", abs.display()))?;
            // Prefer repo-relative file path in output.
            let key = abs
                .strip_prefix(&repo_root)
                .unwrap_or(&abs)
                .to_string_lossy()
                .replace('\\', "/");

            let map = map_file(&CancellationToken::new(), &key, &content)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                print!("{map}");
            }
        }
    }

    Ok(())
}
