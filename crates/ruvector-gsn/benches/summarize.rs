//! Benchmarks for hierarchical summarization.
//!
//! Compares the dense and sparse paths on batches of DAGs with mostly-zero
//! node features, across batch sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ruvector_gsn::{CsrMatrix, GraphSummarizer, GsnConfig, SeededGlorot};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const INPUT_DIM: usize = 5;
const NODES_PER_DAG: usize = 20;

/// Node features where roughly `density` of the entries are non-zero.
fn random_features(nodes: usize, density: f64, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((nodes, INPUT_DIM), |_| {
        if rng.gen::<f64>() < density {
            rng.gen_range(-1.0..1.0)
        } else {
            0.0
        }
    })
}

/// Averaging level-0 matrix for `dags` DAGs of equal size.
fn mean_dag_level(dags: usize) -> CsrMatrix {
    let weight = 1.0 / NODES_PER_DAG as f32;
    let entries = (0..dags * NODES_PER_DAG).map(|node| (node / NODES_PER_DAG, node, weight));
    CsrMatrix::from_coo(dags, dags * NODES_PER_DAG, entries).expect("indices in bounds")
}

fn global_sum(dags: usize) -> CsrMatrix {
    CsrMatrix::from_coo(1, dags, (0..dags).map(|d| (0, d, 1.0))).expect("indices in bounds")
}

// ---------------------------------------------------------------------------
// Benchmark: dense vs sparse path
// ---------------------------------------------------------------------------

fn summarize_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("gsn_summarize");
    group.warm_up_time(Duration::from_secs(2));

    let gsn = GraphSummarizer::with_initializer(GsnConfig::default(), &mut SeededGlorot::new(42))
        .expect("valid configuration");

    for &dags in &[4usize, 32, 256] {
        let nodes = dags * NODES_PER_DAG;
        let features = random_features(nodes, 0.2, 43);
        let sparse_features = CsrMatrix::from_dense(features.view());
        let dag_level_sparse = mean_dag_level(dags);
        let dag_level_dense = dag_level_sparse.to_dense();
        let global_level = global_sum(dags);

        group.throughput(Throughput::Elements(nodes as u64));

        group.bench_with_input(BenchmarkId::new("dense", nodes), &nodes, |b, _| {
            b.iter(|| {
                gsn.summarize(
                    criterion::black_box(&features),
                    criterion::black_box(&dag_level_dense),
                    &global_level,
                )
            });
        });

        group.bench_with_input(BenchmarkId::new("sparse", nodes), &nodes, |b, _| {
            b.iter(|| {
                gsn.summarize_sparse(
                    criterion::black_box(&sparse_features),
                    criterion::black_box(&dag_level_sparse),
                    &global_level,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, summarize_paths);
criterion_main!(benches);
