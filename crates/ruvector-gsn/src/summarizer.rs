//! Two-level hierarchical summarization.
//!
//! ```text
//! node features --(node stack)--> S0 --(level 0)--> DAG summary
//! DAG summary  --(global stack)--> S1 --(level 1)--> global summary
//! ```
//!
//! The dense and sparse paths differ only in how the node features and the
//! level-0 matrix are stored. Both run the same weight stacks, and the
//! global level is identical for both: DAG summaries are dense after the
//! first aggregation, and the level-1 matrix is always CSR.

use ndarray::{Array2, ArrayView2};
use tracing::{debug, instrument};

use crate::activation::Activation;
use crate::aggregate::aggregate;
use crate::config::GsnConfig;
use crate::error::{GsnError, Result};
use crate::init::{Glorot, WeightInitializer};
use crate::matrix::LeftMultiply;
use crate::params::ParameterStore;
use crate::sparse::CsrMatrix;
use crate::transform::transform;

/// Output of one summarization call, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Summaries {
    /// `[num_dags, output_dim]`
    pub dag: Array2<f32>,
    /// `[level-1 rows, output_dim]`
    pub global: Array2<f32>,
}

impl Summaries {
    /// `[dag, global]`
    pub fn into_pair(self) -> [Array2<f32>; 2] {
        [self.dag, self.global]
    }
}

/// Run both summarization levels against an explicit parameter store.
///
/// `inputs` and `dag_level` may be any dense or sparse representation;
/// `global_level` is always CSR.
///
/// # Errors
/// Returns `GsnError::ShapeMismatch` if `inputs` does not have
/// `params.input_dim()` columns, or if either summarization matrix has a
/// column count different from the number of rows it aggregates.
pub fn summarize_levels<X, L>(
    params: &ParameterStore,
    activation: Activation,
    inputs: &X,
    dag_level: &L,
    global_level: &CsrMatrix,
) -> Result<Summaries>
where
    X: LeftMultiply + ?Sized,
    L: LeftMultiply + ?Sized,
{
    let s0 = transform(inputs, params.dag(), activation)?;
    let dag = aggregate(dag_level, s0.view())?;
    debug!(dags = dag.nrows(), dim = dag.ncols(), "computed DAG-level summary");

    let global = summarize_global(params, activation, dag.view(), global_level)?;

    Ok(Summaries { dag, global })
}

fn summarize_global(
    params: &ParameterStore,
    activation: Activation,
    dag: ArrayView2<'_, f32>,
    global_level: &CsrMatrix,
) -> Result<Array2<f32>> {
    let s1 = transform(&dag, params.global(), activation)?;
    let global = aggregate(global_level, s1.view())?;
    debug!(
        rows = global.nrows(),
        dim = global.ncols(),
        "computed global-level summary"
    );
    Ok(global)
}

/// Graph Summarization Network.
///
/// Owns one [`ParameterStore`] and the activation. Summarization never
/// mutates parameters, so any number of calls on either path can share one
/// instance.
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use ruvector_gsn::{CsrMatrix, GraphSummarizer, GsnConfig};
///
/// let gsn = GraphSummarizer::new(GsnConfig::new(4, vec![8], 2)).unwrap();
///
/// // Three nodes: DAG A owns nodes 0 and 1, DAG B owns node 2
/// let inputs = array![
///     [1.0, 0.0, 0.5, 0.0],
///     [0.0, 1.0, 0.0, 0.0],
///     [0.2, 0.0, 0.0, 1.0]
/// ];
/// let dag_level = array![[1.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let global_level = CsrMatrix::from_coo(1, 2, vec![(0, 0, 1.0), (0, 1, 1.0)]).unwrap();
///
/// let summaries = gsn.summarize(&inputs, &dag_level, &global_level).unwrap();
/// assert_eq!(summaries.dag.dim(), (2, 2));
/// assert_eq!(summaries.global.dim(), (1, 2));
/// ```
#[derive(Debug, Clone)]
pub struct GraphSummarizer {
    params: ParameterStore,
    activation: Activation,
}

impl GraphSummarizer {
    /// Create a summarizer with Glorot-initialized weights.
    ///
    /// # Errors
    /// Returns `GsnError::Configuration` if the configuration is invalid.
    pub fn new(config: GsnConfig) -> Result<Self> {
        Self::with_initializer(config, &mut Glorot)
    }

    /// Create a summarizer drawing its weights from `init`.
    ///
    /// # Errors
    /// Returns `GsnError::Configuration` if the configuration is invalid.
    pub fn with_initializer(config: GsnConfig, init: &mut dyn WeightInitializer) -> Result<Self> {
        let params = ParameterStore::new(&config, init)?;
        Ok(Self {
            params,
            activation: config.activation,
        })
    }

    /// Wrap an existing parameter store, e.g. one restored from a snapshot.
    ///
    /// # Errors
    /// Returns an error if either stack fails [`WeightStack::validate`], and
    /// `GsnError::Configuration` if the global stack does not map the node
    /// stack's output dimension back to itself.
    ///
    /// [`WeightStack::validate`]: crate::params::WeightStack::validate
    pub fn from_parameters(params: ParameterStore, activation: Activation) -> Result<Self> {
        params.dag().validate()?;
        params.global().validate()?;

        let out = params.output_dim();
        if params.global().input_dim() != out || params.global().output_dim() != out {
            return Err(GsnError::configuration(format!(
                "global stack maps {} -> {}, expected {} -> {}",
                params.global().input_dim(),
                params.global().output_dim(),
                out,
                out
            )));
        }
        Ok(Self { params, activation })
    }

    /// Learned parameters
    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    /// Learned parameters, for external training updates
    pub fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }

    /// Activation applied after every layer
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Dense path: dense node features with a dense level-0 matrix.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` on incompatible dimensions. No
    /// partial result is produced.
    #[instrument(
        skip_all,
        fields(nodes = inputs.nrows(), dags = dag_level.nrows())
    )]
    pub fn summarize(
        &self,
        inputs: &Array2<f32>,
        dag_level: &Array2<f32>,
        global_level: &CsrMatrix,
    ) -> Result<Summaries> {
        summarize_levels(
            &self.params,
            self.activation,
            inputs,
            dag_level,
            global_level,
        )
    }

    /// Sparse path: CSR node features with a CSR level-0 matrix.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` on incompatible dimensions. No
    /// partial result is produced.
    #[instrument(
        skip_all,
        fields(nodes = inputs.rows(), nnz = inputs.nnz(), dags = dag_level.rows())
    )]
    pub fn summarize_sparse(
        &self,
        inputs: &CsrMatrix,
        dag_level: &CsrMatrix,
        global_level: &CsrMatrix,
    ) -> Result<Summaries> {
        summarize_levels(
            &self.params,
            self.activation,
            inputs,
            dag_level,
            global_level,
        )
    }
}
