//! Quick benchmark to verify coercion and EDN rendering performance

use onyx_job::{Job, JobBuilder, Task, TaskScheduler};
use std::time::Instant;

/// Linear job with `n` tasks and `n - 1` edges
fn linear_job(n: usize) -> Job {
    let names: Vec<String> = (0..n).map(|i| format!("task-{}", i)).collect();
    let mut builder = JobBuilder::new().chain(names.iter().cloned());
    for (i, name) in names.iter().enumerate() {
        let task = match i {
            0 => Task::input(name.as_str()),
            i if i == n - 1 => Task::output(name.as_str()),
            _ => Task::function(name.as_str()).with_fn("my.app/step"),
        };
        builder = builder.task(task.with_batch_size(20));
    }
    builder.build()
}

fn main() {
    println!("Coercion Performance Test");
    println!("=========================\n");

    for size in [3, 30, 300] {
        let job = linear_job(size);
        let iterations = 10_000 / size as u32 + 100;

        // Warm up the registry
        let _ = job.to_canonical_document();

        let start = Instant::now();
        for _ in 0..iterations {
            let _ = job.to_canonical_document();
        }
        let elapsed = start.elapsed();

        let doc = job.to_canonical_document().unwrap();
        let start = Instant::now();
        for _ in 0..iterations {
            let _ = doc.to_edn();
        }
        let render_elapsed = start.elapsed();

        println!("Job: {} tasks", size);
        println!("  Coerce per operation: {:?}", elapsed / iterations);
        println!("  EDN per operation:    {:?}\n", render_elapsed / iterations);
    }

    // Percentage scheduler over a wide catalog
    let mut job = linear_job(300);
    job.set_task_scheduler(TaskScheduler::from_catalog(job.catalog()));
    let iterations = 1_000;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = job.to_canonical_document();
    }
    println!(
        "Percentage scheduler, 300 tasks: {:?} per operation",
        start.elapsed() / iterations
    );
}
