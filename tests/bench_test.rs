//! Benchmark tests for critical operations
//!
//! Run with: cargo test bench --release -- --ignored --nocapture

use std::time::Instant;
use tempfile::NamedTempFile;

use microservices::database::{init_db, AppState};
use microservices::model::LogQuery;

/// Benchmark helper to measure execution time
fn benchmark<F>(name: &str, iterations: usize, mut f: F)
where
    F: FnMut(usize),
{
    let start = Instant::now();

    for i in 0..iterations {
        f(i);
    }

    let duration = start.elapsed();
    let avg_ms = duration.as_millis() as f64 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

fn setup_state() -> (AppState, NamedTempFile) {
    let temp_db = NamedTempFile::new().unwrap();
    let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
    (AppState::new(db), temp_db)
}

#[test]
#[ignore]
fn bench_create_and_resolve_links() {
    println!("\n=== Benchmark: Short links ===\n");

    let (state, _temp_db) = setup_state();
    let iterations = 1000;

    let mut tokens = Vec::with_capacity(iterations);
    benchmark("Create link", iterations, |i| {
        let mapping = state
            .links
            .create(&format!("https://example.com/bench/{i}"))
            .unwrap();
        tokens.push(mapping.token);
    });

    benchmark("Resolve link", iterations, |i| {
        state.links.resolve(&tokens[i]).unwrap();
    });
}

#[test]
#[ignore]
fn bench_append_and_query_logs() {
    println!("\n=== Benchmark: Exercise logs ===\n");

    let (state, _temp_db) = setup_state();
    let subject = state.logs.create_subject("bench_user").unwrap();
    let iterations = 1000;

    benchmark("Append log entry", iterations, |i| {
        state
            .logs
            .append_log(&subject.id, "bench", i as i64, None)
            .unwrap();
    });

    let limited = LogQuery {
        limit: Some("10".to_string()),
        ..LogQuery::default()
    };
    benchmark("Query log (limit 10)", 100, |_| {
        state.logs.query_logs(&subject.id, &limited).unwrap();
    });

    benchmark("Query full log", 100, |_| {
        let report = state
            .logs
            .query_logs(&subject.id, &LogQuery::default())
            .unwrap();
        assert_eq!(report.count, iterations);
    });
}
