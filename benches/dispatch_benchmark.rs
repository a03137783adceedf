/// Benchmark runner for method dispatch.
///
/// Compares leaf methods (installed as-is) against overriding methods
/// (super-bound trampolines) over chains of increasing depth.

extern crate lineage;

use lineage::{ClassId, MethodTable, Realm, Value};
use std::time::{Duration, Instant};

/// Build a chain of `depth` classes below a base that implements `label`.
/// Every class in the chain overrides `label` when `overriding` is set, and
/// only inherits it otherwise.
fn build_chain(realm: &Realm, depth: usize, overriding: bool) -> ClassId {
    let base = realm.declare(None);
    base.provides(MethodTable::new().leaf("label", |_ctx, _args| Ok(Value::from(1))));
    let mut current = base.class();
    for _ in 0..depth {
        let next = realm.declare(None);
        next.inherits(current);
        if overriding {
            next.provides(MethodTable::new().overriding("label", |ctx, args| {
                let upper = ctx.call_super(args)?;
                Ok(Value::from(upper.as_number().unwrap_or(0.0) + 1.0))
            }));
        }
        current = next.class();
    }
    current
}

/// Run a benchmark and return the execution time.
fn run_benchmark(depth: usize, overriding: bool, iterations: u32) -> (Duration, Value) {
    let realm = Realm::new();
    let class = build_chain(&realm, depth, overriding);
    let instance = match realm.construct(class, vec![]) {
        Ok(instance) => Value::Instance(instance),
        Err(err) => panic!("failed to construct benchmark instance: {}", err),
    };

    let mut last = Value::Undefined;
    let start = Instant::now();
    for _ in 0..iterations {
        last = realm
            .call_method(&instance, "label", vec![])
            .unwrap_or_default();
    }
    (start.elapsed(), last)
}

fn main() {
    println!("=======================================================");
    println!("  lineage - Dispatch Benchmarks");
    println!("  Leaf Methods vs Super-Dispatch");
    println!("=======================================================\n");

    let benchmarks: Vec<(&str, usize, u32)> = vec![
        ("Depth 1", 1, 100_000),
        ("Depth 4", 4, 50_000),
        ("Depth 16", 16, 10_000),
        ("Depth 64", 64, 2_000),
    ];

    println!("{:<20} {:>14} {:>14} {:>10}", "Benchmark", "Leaf", "Overriding", "Overhead");
    println!("{}", "-".repeat(60));

    let mut total_leaf = Duration::ZERO;
    let mut total_overriding = Duration::ZERO;

    for (name, depth, iterations) in &benchmarks {
        let (leaf_dur, leaf_value) = run_benchmark(*depth, false, *iterations);
        let (overriding_dur, overriding_value) = run_benchmark(*depth, true, *iterations);
        total_leaf += leaf_dur;
        total_overriding += overriding_dur;

        let overhead = overriding_dur.as_secs_f64() / leaf_dur.as_secs_f64();

        println!(
            "{:<20} {:>12.2?} {:>12.2?} {:>9.2}x",
            name, leaf_dur, overriding_dur, overhead
        );

        // Verify correctness
        assert_eq!(leaf_value, Value::from(1));
        assert_eq!(overriding_value, Value::from(*depth as f64 + 1.0));
    }

    println!("{}", "-".repeat(60));
    let total_overhead = total_overriding.as_secs_f64() / total_leaf.as_secs_f64();
    println!(
        "{:<20} {:>12.2?} {:>12.2?} {:>9.2}x",
        "TOTAL", total_leaf, total_overriding, total_overhead
    );
}
