//! Elementwise nonlinearities applied after every affine layer.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Elementwise activation shared by every layer of a weight stack.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    /// max(0, x)
    Relu,
    /// x for x > 0, alpha * x otherwise
    LeakyRelu {
        /// Slope for negative inputs
        alpha: f32,
    },
    /// 1 / (1 + e^(-x)) with numerical stability
    Sigmoid,
    /// tanh(x)
    Tanh,
    /// x
    Identity,
    /// Caller-supplied function. Not serializable.
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl Default for Activation {
    fn default() -> Self {
        Activation::LeakyRelu { alpha: 0.2 }
    }
}

impl Activation {
    /// Apply the activation to a single value
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        match *self {
            Activation::Relu => x.max(0.0),
            Activation::LeakyRelu { alpha } => {
                if x > 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
            Activation::Sigmoid => {
                if x > 0.0 {
                    1.0 / (1.0 + (-x).exp())
                } else {
                    let ex = x.exp();
                    ex / (1.0 + ex)
                }
            }
            Activation::Tanh => x.tanh(),
            Activation::Identity => x,
            Activation::Custom(f) => f(x),
        }
    }

    /// Apply the activation to every element in place
    pub fn apply_inplace(&self, x: &mut Array2<f32>) {
        if matches!(self, Activation::Identity) {
            return;
        }
        x.mapv_inplace(|v| self.apply(v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_relu() {
        let act = Activation::Relu;
        assert_eq!(act.apply(-1.0), 0.0);
        assert_eq!(act.apply(0.0), 0.0);
        assert_eq!(act.apply(2.0), 2.0);
    }

    #[test]
    fn test_leaky_relu() {
        let act = Activation::LeakyRelu { alpha: 0.2 };
        assert!((act.apply(-1.0) - (-0.2)).abs() < EPSILON);
        assert_eq!(act.apply(3.0), 3.0);
    }

    #[test]
    fn test_sigmoid() {
        let act = Activation::Sigmoid;
        assert!((act.apply(0.0) - 0.5).abs() < EPSILON);
        assert!((act.apply(1.0) - 0.7310586).abs() < EPSILON);
        assert!((act.apply(-1.0) - 0.26894143).abs() < EPSILON);

        // No overflow at the extremes
        assert!(act.apply(-100.0).is_finite());
        assert!(act.apply(100.0) <= 1.0);
    }

    #[test]
    fn test_tanh() {
        let act = Activation::Tanh;
        assert!((act.apply(1.0) - 0.7615942).abs() < EPSILON);
        assert!((act.apply(-1.0) + 0.7615942).abs() < EPSILON);
    }

    #[test]
    fn test_custom() {
        fn square(x: f32) -> f32 {
            x * x
        }
        let act = Activation::Custom(square);
        assert_eq!(act.apply(-3.0), 9.0);
    }

    #[test]
    fn test_apply_inplace() {
        let mut x = array![[-1.0, 2.0], [0.5, -0.5]];
        Activation::Relu.apply_inplace(&mut x);
        assert_eq!(x, array![[0.0, 2.0], [0.5, 0.0]]);

        let mut y = array![[-1.0, 2.0]];
        Activation::Identity.apply_inplace(&mut y);
        assert_eq!(y, array![[-1.0, 2.0]]);
    }

    #[test]
    fn test_default_is_leaky_relu() {
        match Activation::default() {
            Activation::LeakyRelu { alpha } => assert!((alpha - 0.2).abs() < EPSILON),
            other => panic!("unexpected default activation {:?}", other),
        }
    }
}
