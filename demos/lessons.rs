//! Walks through every lesson and prints what it produces.
//!
//! Run with:
//!   cargo run --example lessons
//!   RUST_LOG=weir=debug cargo run --example lessons   # task timings

use std::time::{Duration, Instant};

use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;
use weir::lessons::tasks::{self, CancelSignal};
use weir::lessons::{basics, errors, flow, queries, vehicles};

fn section(title: &str, lines: Vec<String>) {
    println!("=== {title} ===");
    for line in lines {
        println!("{line}");
    }
    println!();
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    section("Basics", basics::lines());
    section("Control flow", flow::lines());
    section("Errors", errors::lines());
    section("Traits and generics", vehicles::lines());
    section("Collection queries", queries::lines());

    println!("=== Async tasks ===");

    let started = Instant::now();
    let results = tasks::sequential(&[Duration::from_secs(1), Duration::from_secs(1)]).await;
    println!("Sequential: {} fetches in {:?}", results.len(), started.elapsed());

    let started = Instant::now();
    let delays = [Duration::from_secs(2), Duration::from_millis(1500), Duration::from_secs(1)];
    match tasks::when_all(&delays).await {
        Ok(results) => println!("Parallel: {} fetches in {:?}", results.len(), started.elapsed()),
        Err(e) => println!("Parallel failed: {e}"),
    }

    let signal = CancelSignal::after(Duration::from_secs(3));
    match tasks::process_items(10, Duration::from_secs(1), &signal).await {
        Ok(items) => println!("Processed {} items", items.len()),
        Err(e) => println!("Cancelled: {e}"),
    }

    if let Err(e) = tasks::failing_task().await {
        println!("Caught: {e}");
    }

    let delays = [Duration::from_secs(3), Duration::from_secs(1), Duration::from_secs(2)];
    match tasks::when_any(&delays).await {
        Ok(first) => println!("First to finish took {:?}: {}", first.delay, first.message),
        Err(e) => println!("No task finished: {e}"),
    }

    println!("Sum: {}", tasks::calculate(10, 20).await);
    println!("Fast path: {}", tasks::fast_operation(true).await);

    let stream = tasks::numbers(5, Duration::from_millis(500));
    tokio::pin!(stream);
    while let Some(n) = stream.next().await {
        println!("Streamed {n}");
    }

    tasks::fire_and_forget(async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        println!("Background work finished");
    });
    tokio::time::sleep(Duration::from_secs(3)).await;
}
