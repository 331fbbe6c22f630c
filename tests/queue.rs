use std::collections::HashMap;
use std::time::Duration;

use filemap::config::{MapperConfig, QueueConfig};
use filemap::{CancellationToken, MapError, MapJob, MapQueue};

fn queue(capacity: usize, max_concurrency: usize) -> MapQueue {
    let cfg = QueueConfig {
        capacity,
        job_timeout_secs: 60,
        max_concurrency: Some(max_concurrency),
    };
    MapQueue::new(&cfg, &MapperConfig::default())
}

/// Roughly `target_bytes` of TypeScript made of small exported functions.
fn typescript_source(target_bytes: usize) -> String {
    let mut src = String::with_capacity(target_bytes + 128);
    let mut i = 0;
    while src.len() < target_bytes {
        src.push_str(&format!(
            "export function handler{i}(input: number, label: string): string {{\n    const doubled = input * 2;\n    return `${{label}}: ${{doubled}}`;\n}}\n\n"
        ));
        i += 1;
    }
    src
}

fn heavy_batch(files: usize, bytes_each: usize) -> HashMap<String, String> {
    let src = typescript_source(bytes_each);
    (0..files).map(|i| (format!("src/mod{i}.ts"), src.clone())).collect()
}

fn small_batch(tag: usize) -> HashMap<String, String> {
    HashMap::from([(format!("job{tag}.py"), format!("def job_{tag}():\n    pass\n"))])
}

async fn wait_until_started(q: &MapQueue, jobs: u64) {
    while q.stats().started < jobs {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_cancelled_midway_returns_nothing() {
    let q = queue(20, 1);
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        })
    };

    let started = std::time::Instant::now();
    let result = q.map(heavy_batch(50, 400_000), token).await;
    canceller.await.unwrap();

    assert!(matches!(result, Err(MapError::Cancelled)), "{result:?}");
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(flavor = "multi_thread")]
async fn job_cancelled_while_waiting_gets_none() {
    let q = queue(4, 1);

    let busy = CancellationToken::new();
    let (first, _first_rx) = MapJob::new(heavy_batch(20, 200_000), busy.clone());
    q.enqueue(first).unwrap();
    wait_until_started(&q, 1).await;

    let waiting = CancellationToken::new();
    let (second, second_rx) = MapJob::new(small_batch(2), waiting.clone());
    q.enqueue(second).unwrap();
    waiting.cancel();
    busy.cancel();

    assert_eq!(second_rx.await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn jobs_finish_in_submission_order() {
    let q = queue(10, 2);
    let mut receivers = Vec::new();
    for tag in 0..5 {
        let (job, rx) = MapJob::new(small_batch(tag), CancellationToken::new());
        q.enqueue(job).unwrap();
        receivers.push(rx);
    }

    let last = receivers.pop().unwrap().await.unwrap().unwrap();
    assert_eq!(last["job4.py"], "def job_4():\n");

    // one job at a time: every earlier result was already posted
    for (tag, mut rx) in receivers.into_iter().enumerate() {
        let bodies = rx.try_recv().unwrap().unwrap();
        assert!(bodies.contains_key(&format!("job{tag}.py")));
    }
    assert_eq!(q.stats().completed, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn full_queue_rejects_submission() {
    let q = queue(1, 1);

    let busy = CancellationToken::new();
    let (running, _running_rx) = MapJob::new(heavy_batch(20, 200_000), busy.clone());
    q.enqueue(running).unwrap();
    wait_until_started(&q, 1).await;

    let (queued, _queued_rx) = MapJob::new(small_batch(1), CancellationToken::new());
    q.enqueue(queued).unwrap();

    let (rejected, _rejected_rx) = MapJob::new(small_batch(2), CancellationToken::new());
    let err = q.enqueue(rejected).unwrap_err();
    assert!(matches!(err, MapError::QueueFull));
    assert_eq!(err.to_string(), "queue is full");

    busy.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrency_stays_under_cap() {
    let q = queue(4, 2);
    let bodies = q.map(heavy_batch(12, 20_000), CancellationToken::new()).await.unwrap();

    assert_eq!(bodies.len(), 12);
    assert!(bodies.values().all(|b| b.starts_with("export function handler0(")));
    let peak = q.stats().peak_active;
    assert!((1..=2).contains(&peak), "peak {peak}");
}

#[tokio::test(flavor = "multi_thread")]
async fn deadline_turns_into_error() {
    let cfg = QueueConfig {
        capacity: 2,
        job_timeout_secs: 0,
        max_concurrency: Some(1),
    };
    let q = MapQueue::new(&cfg, &MapperConfig::default());
    let err = q.map(heavy_batch(10, 200_000), CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, MapError::DeadlineExceeded(0)), "{err:?}");
}
