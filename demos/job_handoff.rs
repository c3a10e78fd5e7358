//! Job hand-off example for fairq
//!
//! A pool of workers blocks on one shared queue while a dispatcher hands out
//! jobs. Workers are started one after another, and because parked workers are
//! served in arrival order the first round of jobs goes to workers 0, 1, 2, ...
//! in turn.
//!
//! Run with `RUST_LOG=fairq=trace` to see every park, hand-off and resume.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fairq::{FairQueue, MetricsCollector, QueueConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum Job {
    Work { id: usize, cost: Duration },
    Shutdown,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let num_workers = 4;
    let num_jobs = 40;
    let queue: Arc<FairQueue<Job>> =
        Arc::new(FairQueue::with_config(QueueConfig::default().with_label("jobs")));

    let workers: Vec<_> = (0..num_workers)
        .map(|worker_id| {
            let worker_queue = Arc::clone(&queue);
            let handle = thread::spawn(move || {
                let mut completed = Vec::new();
                loop {
                    match worker_queue.dequeue() {
                        Job::Work { id, cost } => {
                            thread::sleep(cost);
                            completed.push(id);
                        }
                        Job::Shutdown => break,
                    }
                }
                info!(worker_id, jobs = completed.len(), first = ?completed.first(), "worker finished");
                completed
            });
            // Let each worker park before starting the next one.
            while queue.waiting() <= worker_id {
                thread::sleep(Duration::from_millis(1));
            }
            handle
        })
        .collect();

    info!(parked = queue.waiting(), "all workers waiting");

    for id in 0..num_jobs {
        let cost = Duration::from_micros(200 + (id as u64 % 5) * 100);
        queue.enqueue(Job::Work { id, cost });
    }
    for _ in 0..num_workers {
        queue.enqueue(Job::Shutdown);
    }

    let mut total = 0;
    for (worker_id, worker) in workers.into_iter().enumerate() {
        let completed = worker.join().map_err(|_| "worker panicked")?;
        // The first round of jobs went out in worker arrival order.
        assert_eq!(completed.first(), Some(&worker_id));
        total += completed.len();
    }

    let metrics = queue.metrics();
    info!(
        total,
        handoffs = metrics.handoffs,
        contention_rate = metrics.contention_rate(),
        avg_wait = ?metrics.avg_wait_time(),
        peak_len = metrics.peak_len,
        "dispatch complete"
    );

    let leftover = FairQueue::try_destroy(queue)?;
    assert!(leftover.is_empty());
    Ok(())
}
