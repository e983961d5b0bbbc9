//! Per-row feature transform through a weight stack.
//!
//! Every layer computes `X = act(X W_i + b_i)`, the last one included. The
//! first layer accepts dense or sparse input; everything after it is dense.

use ndarray::{Array2, ArrayView2};
use tracing::trace;

use crate::activation::Activation;
use crate::error::{GsnError, Result};
use crate::matrix::{dense_dot, LeftMultiply};
use crate::params::{Layer, WeightStack};

/// Apply `stack` to every row of `x`.
///
/// # Errors
/// Returns `GsnError::ShapeMismatch` if `x` has a column count different from
/// the stack's input dimension.
pub fn transform<M>(x: &M, stack: &WeightStack, activation: Activation) -> Result<Array2<f32>>
where
    M: LeftMultiply + ?Sized,
{
    let mut layers = stack.layers().iter().enumerate();

    let Some((_, first)) = layers.next() else {
        return Err(GsnError::configuration(format!(
            "weight stack '{}' has no layers",
            stack.name()
        )));
    };
    let mut s = x.left_mul(first.weights().view())?;
    finish_layer(&mut s, first, activation);
    trace!(stack = stack.name(), layer = 0, dim = ?s.dim(), "applied layer");

    for (i, layer) in layers {
        s = apply_layer(s.view(), layer, activation)?;
        trace!(stack = stack.name(), layer = i, dim = ?s.dim(), "applied layer");
    }
    Ok(s)
}

fn apply_layer(x: ArrayView2<'_, f32>, layer: &Layer, activation: Activation) -> Result<Array2<f32>> {
    let mut s = dense_dot(x, layer.weights().view())?;
    finish_layer(&mut s, layer, activation);
    Ok(s)
}

#[inline]
fn finish_layer(s: &mut Array2<f32>, layer: &Layer, activation: Activation) {
    *s += layer.bias();
    activation.apply_inplace(s);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{Glorot, WeightInitializer};
    use crate::matrix::Matrix;
    use crate::sparse::CsrMatrix;
    use ndarray::{array, Array1};

    /// Initializer filling every weight with a constant
    struct Constant(f32);

    impl WeightInitializer for Constant {
        fn init(&mut self, fan_in: usize, fan_out: usize) -> Array2<f32> {
            Array2::from_elem((fan_in, fan_out), self.0)
        }
    }

    #[test]
    fn test_single_layer() {
        let mut stack = WeightStack::build("dag", 2, &[], 2, &mut Glorot).unwrap();
        stack
            .assign(
                0,
                array![[1.0, -1.0], [2.0, 0.0]],
                Array1::from_vec(vec![0.5, 0.0]),
            )
            .unwrap();

        let x = Matrix::Dense(array![[1.0, 1.0], [0.0, 1.0]]);
        let out = transform(&x, &stack, Activation::Relu).unwrap();

        // [1,1]W = [3,-1] + b = [3.5,-1] -> relu [3.5, 0]
        // [0,1]W = [2, 0] + b = [2.5, 0]
        assert_eq!(out, array![[3.5, 0.0], [2.5, 0.0]]);
    }

    #[test]
    fn test_activation_on_every_layer() {
        let stack = WeightStack::build("dag", 1, &[1], 1, &mut Constant(-1.0)).unwrap();
        let x = Matrix::Dense(array![[1.0]]);

        // relu after the hidden layer clamps -1 to 0, so the output is 0
        let out = transform(&x, &stack, Activation::Relu).unwrap();
        assert_eq!(out, array![[0.0]]);

        // identity passes the sign through both layers
        let out = transform(&x, &stack, Activation::Identity).unwrap();
        assert_eq!(out, array![[1.0]]);
    }

    #[test]
    fn test_sparse_matches_dense() {
        let stack = WeightStack::build("dag", 4, &[6, 3], 2, &mut Glorot).unwrap();
        let dense = array![
            [1.0, 0.0, 0.0, 2.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 3.0, -1.0, 0.0]
        ];
        let sparse = CsrMatrix::from_dense(dense.view());
        let act = Activation::LeakyRelu { alpha: 0.2 };

        let a = transform(&Matrix::Dense(dense.clone()), &stack, act).unwrap();
        let b = transform(&Matrix::Sparse(sparse), &stack, act).unwrap();
        let c = transform(&dense.view(), &stack, act).unwrap();

        assert_eq!(a.dim(), (3, 2));
        for ((x, y), z) in a.iter().zip(b.iter()).zip(c.iter()) {
            assert!((x - y).abs() < 1e-5);
            assert!((x - z).abs() < 1e-6);
        }
    }

    #[test]
    fn test_input_dim_mismatch() {
        let stack = WeightStack::build("dag", 4, &[8], 2, &mut Glorot).unwrap();
        let x = Matrix::Dense(Array2::zeros((3, 5)));
        assert!(matches!(
            transform(&x, &stack, Activation::Relu),
            Err(GsnError::ShapeMismatch { .. })
        ));

        let x = Matrix::Sparse(CsrMatrix::identity(3));
        assert!(transform(&x, &stack, Activation::Relu).is_err());
    }

    #[test]
    fn test_zero_rows() {
        let stack = WeightStack::build("dag", 4, &[8], 2, &mut Glorot).unwrap();
        let x = Matrix::Dense(Array2::zeros((0, 4)));
        let out = transform(&x, &stack, Activation::Relu).unwrap();
        assert_eq!(out.dim(), (0, 2));
    }
}
