//! # RuVector GSN
//!
//! Graph Summarization Network: compresses per-node feature vectors of a
//! batch of DAGs into one summary vector per DAG and one global summary over
//! all DAGs.
//!
//! ## Pipeline
//!
//! - **Node level**: a feed-forward stack (`input_dim -> hid_dims -> output_dim`)
//!   transforms every node's features, then a caller-supplied level-0 matrix
//!   `[num_dags, num_nodes]` aggregates nodes into DAG summaries.
//! - **Global level**: a second stack (`output_dim -> hid_dims -> output_dim`)
//!   transforms the DAG summaries, then a level-1 CSR matrix
//!   `[1, num_dags]` aggregates them into the global summary.
//!
//! Node features and the level-0 matrix may be dense or sparse. Both paths
//! share all parameters and produce numerically equivalent summaries. The
//! summarization matrices are call-time arguments; this crate never inspects
//! graph topology.
//!
//! ### Usage Example
//!
//! ```rust
//! use ndarray::array;
//! use ruvector_gsn::{Activation, CsrMatrix, GraphSummarizer, GsnConfig};
//!
//! let config = GsnConfig::new(4, vec![8], 2).with_activation(Activation::Relu);
//! let gsn = GraphSummarizer::new(config).unwrap();
//!
//! let inputs = CsrMatrix::from_coo(3, 4, vec![(0, 0, 1.0), (1, 1, 1.0), (2, 3, 1.0)]).unwrap();
//! let dag_level = CsrMatrix::from_coo(2, 3, vec![(0, 0, 1.0), (0, 1, 1.0), (1, 2, 1.0)]).unwrap();
//! let global_level = CsrMatrix::from_coo(1, 2, vec![(0, 0, 1.0), (0, 1, 1.0)]).unwrap();
//!
//! let summaries = gsn.summarize_sparse(&inputs, &dag_level, &global_level).unwrap();
//! assert_eq!(summaries.dag.dim(), (2, 2));
//! assert_eq!(summaries.global.dim(), (1, 2));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod activation;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod init;
pub mod matrix;
pub mod params;
pub mod sparse;
pub mod summarizer;
pub mod transform;

// Re-export commonly used types
pub use activation::Activation;
pub use aggregate::aggregate;
pub use config::GsnConfig;
pub use error::{GsnError, Result};
pub use init::{Glorot, SeededGlorot, WeightInitializer};
pub use matrix::{LeftMultiply, Matrix};
pub use params::{Layer, ParameterStore, WeightStack};
pub use sparse::CsrMatrix;
pub use summarizer::{summarize_levels, GraphSummarizer, Summaries};
pub use transform::transform;
