//! Aggregated logging example
//!
//! Starts a listener around the main logger, re-runs this binary as worker
//! processes that log through their stdout, then shuts the listener down
//! after the workers exit.
//!
//! Run with: cargo run --example aggregated_workers

use rust_queue_logger::prelude::*;
use std::env;
use std::process::Command;
use std::sync::Arc;

const WORKERS: usize = 4;
const WORKER_ID_ENV: &str = "AGGREGATED_WORKERS_ID";

fn run_worker() -> Result<()> {
    let id = env::var(WORKER_ID_ENV).unwrap_or_default();
    let worker = configure(
        LoggerConfig::new(format!("worker-{}", id))
            .level(LogLevel::Info)
            .console(ConsoleTarget::Disabled)
            .queue(AggregationQueue::stdout())
            .prefix(format!("Worker {} pid {}:", id, std::process::id())),
    )?;

    worker.debug("Filtered at the worker");
    worker.info("Info message");
    worker.warning("Warning message");
    worker.error("Error message");
    worker.critical("Critical message");
    Ok(())
}

fn main() -> Result<()> {
    if is_producer_process() {
        return run_worker();
    }

    println!("=== Rust Queue Logger - Aggregated Workers Example ===\n");

    let main_logger = configure(
        LoggerConfig::new("main")
            .level(LogLevel::Debug)
            .console(ConsoleTarget::Stdout)
            .colors(true),
    )?;
    main_logger.info("Starting listener");

    let listener = LogListener::start(Arc::clone(main_logger.logger()))?;
    let exe = env::current_exe()?;

    let workers = (0..WORKERS)
        .map(|id| {
            let mut command = Command::new(&exe);
            command.env(WORKER_ID_ENV, id.to_string());
            ProducerProcess::spawn(command, &listener.queue())
        })
        .collect::<Result<Vec<_>>>()?;

    for worker in workers {
        let exit = worker.wait()?;
        if !exit.status.success() {
            eprintln!("Worker exited with {}", exit.status);
        }
    }

    request_shutdown(&listener.queue())?;
    let report = listener.join()?;

    println!(
        "\nListener forwarded {} records ({} failed)",
        report.forwarded, report.failed
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
