//! Learned parameters: the node-level and global-level weight stacks.
//!
//! Both stacks are built by the same routine. The node stack maps
//! `input_dim -> hid_dims -> output_dim`; the global stack maps
//! `output_dim -> hid_dims -> output_dim`, consuming DAG summaries.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GsnConfig;
use crate::error::{GsnError, Result};
use crate::init::WeightInitializer;

/// Affine layer: `y = x W + b` with `W` of shape `[in, out]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl Layer {
    /// Weight matrix `[in, out]`
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Bias vector `[out]`
    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    /// Input dimension
    pub fn input_dim(&self) -> usize {
        self.weights.nrows()
    }

    /// Output dimension
    pub fn output_dim(&self) -> usize {
        self.weights.ncols()
    }
}

/// Ordered sequence of affine layers, one per hidden width plus the output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StackParts")]
pub struct WeightStack {
    name: String,
    layers: Vec<Layer>,
}

/// Unvalidated wire form; deserialization goes through [`WeightStack::validate`].
#[derive(Deserialize)]
struct StackParts {
    name: String,
    layers: Vec<Layer>,
}

impl TryFrom<StackParts> for WeightStack {
    type Error = GsnError;

    fn try_from(p: StackParts) -> Result<Self> {
        let stack = Self {
            name: p.name,
            layers: p.layers,
        };
        stack.validate()?;
        Ok(stack)
    }
}

impl WeightStack {
    /// Build a stack mapping `input_dim` through each of `hid_dims` to `output_dim`.
    ///
    /// # Errors
    /// Returns `GsnError::Configuration` if any dimension is zero.
    pub fn build(
        name: impl Into<String>,
        input_dim: usize,
        hid_dims: &[usize],
        output_dim: usize,
        init: &mut dyn WeightInitializer,
    ) -> Result<Self> {
        let name = name.into();
        if input_dim == 0 {
            return Err(GsnError::configuration(format!(
                "{}: input dimension must be positive",
                name
            )));
        }
        if output_dim == 0 {
            return Err(GsnError::configuration(format!(
                "{}: output dimension must be positive",
                name
            )));
        }
        if let Some(i) = hid_dims.iter().position(|&d| d == 0) {
            return Err(GsnError::configuration(format!(
                "{}: hidden width at index {} must be positive",
                name, i
            )));
        }

        let mut layers = Vec::with_capacity(hid_dims.len() + 1);
        let mut curr_in_dim = input_dim;

        for &hid_dim in hid_dims {
            layers.push(Self::make_layer(init, curr_in_dim, hid_dim)?);
            curr_in_dim = hid_dim;
        }
        layers.push(Self::make_layer(init, curr_in_dim, output_dim)?);

        Ok(Self { name, layers })
    }

    fn make_layer(init: &mut dyn WeightInitializer, fan_in: usize, fan_out: usize) -> Result<Layer> {
        let weights = init.init(fan_in, fan_out);
        if weights.dim() != (fan_in, fan_out) {
            return Err(GsnError::shape_mismatch(
                "weight_init",
                format!("{}x{}", fan_in, fan_out),
                format!("{}x{}", weights.nrows(), weights.ncols()),
            ));
        }
        Ok(Layer {
            weights,
            bias: Array1::zeros(fan_out),
        })
    }

    /// Stack name used as the namespace component under the store scope
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layers in application order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers (hidden layers + 1)
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false for a built or deserialized stack
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Input dimension of the first layer
    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_dim)
    }

    /// Output dimension of the last layer
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, Layer::output_dim)
    }

    /// Total number of scalar parameters
    pub fn num_parameters(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.bias.len())
            .sum()
    }

    /// Replace the values of one layer. Shapes are fixed at construction.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` if the index is out of range or either
    /// tensor's shape differs from the existing one.
    pub fn assign(&mut self, index: usize, weights: Array2<f32>, bias: Array1<f32>) -> Result<()> {
        let len = self.layers.len();
        let layer = self.layers.get_mut(index).ok_or_else(|| {
            GsnError::shape_mismatch(
                "assign",
                format!("layer index < {}", len),
                format!("index {}", index),
            )
        })?;

        if weights.dim() != layer.weights.dim() {
            return Err(GsnError::shape_mismatch(
                "assign",
                format!("weights {:?}", layer.weights.dim()),
                format!("weights {:?}", weights.dim()),
            ));
        }
        if bias.len() != layer.bias.len() {
            return Err(GsnError::shape_mismatch(
                "assign",
                format!("bias of length {}", layer.bias.len()),
                format!("length {}", bias.len()),
            ));
        }

        layer.weights = weights;
        layer.bias = bias;
        Ok(())
    }

    /// Check that the stack is non-empty, every dimension is positive, each
    /// bias matches its weight's column count, and consecutive layers chain.
    ///
    /// Always passes for a stack produced by [`WeightStack::build`].
    ///
    /// # Errors
    /// Returns `GsnError::Configuration` for an empty stack or a zero
    /// dimension, and `GsnError::ShapeMismatch` for the first layer whose
    /// shapes disagree.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(GsnError::configuration(format!(
                "weight stack '{}' has no layers",
                self.name
            )));
        }

        let mut prev_out: Option<usize> = None;
        for (i, layer) in self.layers.iter().enumerate() {
            let (fan_in, fan_out) = layer.weights.dim();
            if fan_in == 0 || fan_out == 0 {
                return Err(GsnError::configuration(format!(
                    "{}: layer {} has an empty weight matrix {}x{}",
                    self.name, i, fan_in, fan_out
                )));
            }
            if layer.bias.len() != fan_out {
                return Err(GsnError::shape_mismatch(
                    "stack_validate",
                    format!("{}/b{} of length {}", self.name, i, fan_out),
                    format!("length {}", layer.bias.len()),
                ));
            }
            if let Some(prev) = prev_out {
                if fan_in != prev {
                    return Err(GsnError::shape_mismatch(
                        "stack_validate",
                        format!("{}/w{} with {} rows", self.name, i, prev),
                        format!("{}x{}", fan_in, fan_out),
                    ));
                }
            }
            prev_out = Some(fan_out);
        }
        Ok(())
    }
}

/// Owner of both weight stacks, shared by the dense and sparse summarization paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStore {
    scope: String,
    dag: WeightStack,
    global: WeightStack,
}

impl ParameterStore {
    /// Build both stacks from a configuration.
    ///
    /// # Errors
    /// Returns `GsnError::Configuration` if the configuration is invalid.
    pub fn new(config: &GsnConfig, init: &mut dyn WeightInitializer) -> Result<Self> {
        config.validate()?;

        let dag = WeightStack::build(
            "dag",
            config.input_dim,
            &config.hid_dims,
            config.output_dim,
            init,
        )?;
        let global = WeightStack::build(
            "global",
            config.output_dim,
            &config.hid_dims,
            config.output_dim,
            init,
        )?;

        let store = Self {
            scope: config.scope.clone(),
            dag,
            global,
        };

        debug!(
            scope = %store.scope,
            layers = store.dag.len(),
            num_parameters = store.num_parameters(),
            "built graph summarization parameters"
        );

        Ok(store)
    }

    /// Namespace under which every tensor is registered
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Stack applied to raw node features
    pub fn dag(&self) -> &WeightStack {
        &self.dag
    }

    /// Stack applied to DAG summaries
    pub fn global(&self) -> &WeightStack {
        &self.global
    }

    /// Mutable access for external training updates
    pub fn dag_mut(&mut self) -> &mut WeightStack {
        &mut self.dag
    }

    /// Mutable access for external training updates
    pub fn global_mut(&mut self) -> &mut WeightStack {
        &mut self.global
    }

    /// Input feature dimension expected by the node stack
    pub fn input_dim(&self) -> usize {
        self.dag.input_dim()
    }

    /// Summary dimension produced by both stacks
    pub fn output_dim(&self) -> usize {
        self.dag.output_dim()
    }

    /// Total number of scalar parameters across both stacks
    pub fn num_parameters(&self) -> usize {
        self.dag.num_parameters() + self.global.num_parameters()
    }

    /// Every registered tensor as `(name, shape)`, e.g. `("gsn/dag/w0", [5, 16])`.
    pub fn named_parameters(&self) -> Vec<(String, Vec<usize>)> {
        let mut out = Vec::with_capacity(2 * (self.dag.len() + self.global.len()));
        for stack in [&self.dag, &self.global] {
            for (i, layer) in stack.layers.iter().enumerate() {
                out.push((
                    format!("{}/{}/w{}", self.scope, stack.name, i),
                    layer.weights.shape().to_vec(),
                ));
                out.push((
                    format!("{}/{}/b{}", self.scope, stack.name, i),
                    layer.bias.shape().to_vec(),
                ));
            }
        }
        out
    }
}
