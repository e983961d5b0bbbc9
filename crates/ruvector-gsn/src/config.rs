//! Configuration for the graph summarization network.

use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::{GsnError, Result};

/// Layer layout and nonlinearity of a graph summarization network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GsnConfig {
    /// Raw node feature dimension.
    pub input_dim: usize,
    /// Hidden layer widths, shared by the node and global stacks. May be empty.
    pub hid_dims: Vec<usize>,
    /// Summary dimension.
    pub output_dim: usize,
    /// Nonlinearity applied after every layer, including the last.
    pub activation: Activation,
    /// Namespace for parameter names. Has no effect on computation.
    pub scope: String,
}

impl Default for GsnConfig {
    fn default() -> Self {
        Self {
            input_dim: 5,
            hid_dims: vec![16, 8],
            output_dim: 8,
            activation: Activation::default(),
            scope: "gsn".to_string(),
        }
    }
}

impl GsnConfig {
    /// Create a configuration with the default activation and scope
    pub fn new(input_dim: usize, hid_dims: Vec<usize>, output_dim: usize) -> Self {
        Self {
            input_dim,
            hid_dims,
            output_dim,
            ..Self::default()
        }
    }

    /// Set the activation
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Set the parameter scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Check that every dimension is positive.
    ///
    /// # Errors
    /// Returns `GsnError::Configuration` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.input_dim == 0 {
            return Err(GsnError::configuration("input_dim must be positive"));
        }
        if self.output_dim == 0 {
            return Err(GsnError::configuration("output_dim must be positive"));
        }
        if let Some(i) = self.hid_dims.iter().position(|&d| d == 0) {
            return Err(GsnError::configuration(format!(
                "hid_dims[{}] must be positive",
                i
            )));
        }
        Ok(())
    }
}
