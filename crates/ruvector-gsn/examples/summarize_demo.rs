//! Manual demo for graph summarization
//!
//! Run with: cargo run -p ruvector-gsn --example summarize_demo

use ndarray::array;
use ruvector_gsn::{CsrMatrix, GraphSummarizer, GsnConfig, SeededGlorot};

fn main() {
    println!("=== RuVector GSN Summarization Demo ===\n");

    let config = GsnConfig::new(4, vec![8], 2);
    let gsn = GraphSummarizer::with_initializer(config, &mut SeededGlorot::new(42)).unwrap();

    println!("1. Parameters");
    println!("   ----------");
    for (name, shape) in gsn.parameters().named_parameters() {
        println!("   {:<16} {:?}", name, shape);
    }
    println!("   total: {}\n", gsn.parameters().num_parameters());

    // DAG A: nodes 0 and 1, DAG B: node 2
    let inputs = array![
        [1.0, 0.0, 0.5, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.2, 0.0, 0.0, 1.0]
    ];
    let dag_level = array![[1.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    let global_level = CsrMatrix::from_coo(1, 2, vec![(0, 0, 1.0), (0, 1, 1.0)]).unwrap();

    println!("2. Dense path");
    println!("   ----------");
    let dense = gsn.summarize(&inputs, &dag_level, &global_level).unwrap();
    println!("   DAG summaries:\n{:.5}", dense.dag);
    println!("   Global summary:\n{:.5}\n", dense.global);

    println!("3. Sparse path");
    println!("   -----------");
    let sparse = gsn
        .summarize_sparse(
            &CsrMatrix::from_dense(inputs.view()),
            &CsrMatrix::from_dense(dag_level.view()),
            &global_level,
        )
        .unwrap();
    println!("   DAG summaries:\n{:.5}", sparse.dag);
    println!("   Global summary:\n{:.5}\n", sparse.global);

    let max_diff = dense
        .global
        .iter()
        .zip(sparse.global.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    println!("   max |dense - sparse| (global): {:.2e}", max_diff);
}
