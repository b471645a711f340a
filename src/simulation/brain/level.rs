//! Single hard-threshold perceptron layer.

use ndarray::{Array1, Array2, ArrayView1, Zip};
use rand::Rng;

use super::super::error::SimError;
use super::super::geometric_utils::lerp;

/// One weight/bias layer of a controller.
///
/// Output unit `j` fires when `Σ_i inputs[i] * weights[[i, j]]` exceeds
/// `biases[j]`. Equality compares parameters only, not the activation
/// buffers left over from the last forward pass.
#[derive(Debug, Clone)]
pub struct Level {
    inputs: Array1<f32>,
    outputs: Array1<f32>,
    biases: Array1<f32>,
    /// Weight matrix (`input_count` × `output_count`).
    weights: Array2<f32>,
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.biases == other.biases && self.weights == other.weights
    }
}

impl Level {
    /// Creates a level with weights and biases uniform in `[-1, 1]`.
    pub fn new_random<R: Rng + ?Sized>(input_count: usize, output_count: usize, rng: &mut R) -> Self {
        let biases = Array1::from_shape_fn(output_count, |_| rng.random_range(-1.0..=1.0));
        let weights =
            Array2::from_shape_fn((input_count, output_count), |_| rng.random_range(-1.0..=1.0));
        Self::from_parts(biases, weights)
    }

    /// Wraps already-shaped parameters. The activation buffers start zeroed.
    pub(crate) fn from_parts(biases: Array1<f32>, weights: Array2<f32>) -> Self {
        Self {
            inputs: Array1::zeros(weights.nrows()),
            outputs: Array1::zeros(weights.ncols()),
            biases,
            weights,
        }
    }

    /// Number of inputs consumed.
    pub fn input_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of outputs produced.
    pub fn output_count(&self) -> usize {
        self.weights.ncols()
    }

    /// Inputs seen by the last forward pass.
    pub fn inputs(&self) -> &Array1<f32> {
        &self.inputs
    }

    /// Outputs of the last forward pass, each `0.0` or `1.0`.
    pub fn outputs(&self) -> &Array1<f32> {
        &self.outputs
    }

    /// Firing thresholds.
    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    /// Weight matrix, rows indexed by input.
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Runs the level on `inputs`; `index` only labels errors.
    pub fn feed_forward(&mut self, inputs: &[f32], index: usize) -> Result<&Array1<f32>, SimError> {
        if inputs.len() != self.input_count() {
            return Err(SimError::ControllerShapeMismatch {
                level: index,
                field: "inputs",
                expected: self.input_count(),
                actual: inputs.len(),
            });
        }

        self.inputs.assign(&ArrayView1::from(inputs));
        let sums = self.inputs.dot(&self.weights);

        Zip::from(&mut self.outputs)
            .and(&sums)
            .and(&self.biases)
            .for_each(|out, &sum, &bias| *out = if sum > bias { 1.0 } else { 0.0 });

        Ok(&self.outputs)
    }

    /// Pulls every bias, then every weight, towards its own fresh random
    /// value in `[-1, 1]` by `amount`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        self.biases
            .mapv_inplace(|b| lerp(b, rng.random::<f32>() * 2.0 - 1.0, amount));
        self.weights
            .mapv_inplace(|w| lerp(w, rng.random::<f32>() * 2.0 - 1.0, amount));
    }
}
