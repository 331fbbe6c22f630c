//! Batch mapping: one task per input path, first error wins.

use std::collections::HashMap;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{MapError, Result};
use crate::mapper::{map_file, parse_tree};
use crate::render;
use crate::types::{FileMapBodies, MapTrees};

async fn run_all<F>(inputs: HashMap<String, String>, job: F) -> Result<HashMap<String, String>>
where
    F: Fn(&str, &[u8]) -> Result<String> + Clone + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for (path, content) in inputs {
        let job = job.clone();
        tasks.spawn_blocking(move || {
            let out = job(&path, content.as_bytes());
            (path, out)
        });
    }

    let mut results = HashMap::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (path, out) = joined.map_err(|e| MapError::task("<batch>", e.to_string()))?;
        // dropping the set on early return aborts whatever has not started yet
        results.insert(path, out?);
    }
    Ok(results)
}

/// Map every input and render it. The first failing file fails the batch.
pub async fn map_batch(cancel: &CancellationToken, inputs: HashMap<String, String>) -> Result<FileMapBodies> {
    let cancel = cancel.clone();
    run_all(inputs, move |path, content| {
        map_file(&cancel, path, content).map(|map| render::render(&map))
    })
    .await
}

/// Parse-tree dump of every input. Paths without a grammar fail the batch.
pub async fn map_trees(cancel: &CancellationToken, inputs: HashMap<String, String>) -> Result<MapTrees> {
    let cancel = cancel.clone();
    run_all(inputs, move |path, content| {
        if cancel.is_cancelled() {
            return Err(MapError::Cancelled);
        }
        parse_tree(path, content)
    })
    .await
}

/// Parse trees joined under `### <path>` headings, paths sorted.
pub fn combined_trees(trees: &MapTrees) -> String {
    render::combined(trees)
}
