//! Feed-forward controller that turns sensor activations into driving controls.
//!
//! A controller is a chain of hard-threshold [`Level`]s. It has no training
//! step: it only changes through [`Controller::mutate`], applied by the
//! evolution engine to copies of the best controller of a generation.
//!
//! The persisted form is [`ControllerRecord`], a plain nested-list layout
//! (`levels[].inputs`, `outputs`, `biases`, `weights`). Deserializing goes
//! through that record and rejects any shape mismatch.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::vehicle::Controls;

pub mod level;
mod pretrained;

pub use level::Level;
pub use pretrained::pretrained;

/// Outputs of the last level, in order: forward, reverse, left, right.
pub const CONTROL_OUTPUTS: usize = 4;

/// A chain of levels mapping sensor activations to [`Controls`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ControllerRecord", into = "ControllerRecord")]
pub struct Controller {
    levels: Vec<Level>,
}

impl Controller {
    /// Creates a controller with random parameters.
    ///
    /// `layer_sizes` lists every layer width from sensor inputs to the four
    /// control outputs, e.g. `[5, 6, 4]`.
    pub fn random<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Self, SimError> {
        if layer_sizes.len() < 2 || layer_sizes.contains(&0) {
            return Err(SimError::EmptyController);
        }
        let levels = layer_sizes
            .windows(2)
            .map(|pair| Level::new_random(pair[0], pair[1], rng))
            .collect();
        Self::from_levels(levels)
    }

    /// Assembles levels, checking that neighbours agree on their widths.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, SimError> {
        if levels.is_empty()
            || levels
                .iter()
                .any(|l| l.input_count() == 0 || l.output_count() == 0)
        {
            return Err(SimError::EmptyController);
        }

        for (i, pair) in levels.windows(2).enumerate() {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(SimError::ControllerShapeMismatch {
                    level: i + 1,
                    field: "inputs",
                    expected: pair[0].output_count(),
                    actual: pair[1].input_count(),
                });
            }
        }

        let last = levels.len() - 1;
        if levels[last].output_count() != CONTROL_OUTPUTS {
            return Err(SimError::ControllerShapeMismatch {
                level: last,
                field: "outputs",
                expected: CONTROL_OUTPUTS,
                actual: levels[last].output_count(),
            });
        }

        Ok(Self { levels })
    }

    /// Levels from input to output.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of sensor activations expected.
    pub fn input_count(&self) -> usize {
        self.levels[0].input_count()
    }

    /// Layer widths from input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_count())
            .chain(self.levels.iter().map(Level::output_count))
            .collect()
    }

    /// Runs every level in turn and reads the final outputs as controls.
    pub fn feed_forward(&mut self, inputs: &[f32]) -> Result<Controls, SimError> {
        let mut signal = inputs.to_vec();
        for (i, level) in self.levels.iter_mut().enumerate() {
            signal = level.feed_forward(&signal, i)?.to_vec();
        }
        Ok(Controls::from_outputs(&signal))
    }

    /// Mutates every parameter in place. `amount = 0` leaves the controller
    /// unchanged, `amount = 1` replaces it with fresh noise.
    pub fn mutate<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        for level in &mut self.levels {
            level.mutate(amount, rng);
        }
    }

    /// A mutated deep copy; `self` is left untouched.
    pub fn mutated<R: Rng + ?Sized>(&self, amount: f32, rng: &mut R) -> Self {
        let mut copy = self.clone();
        copy.mutate(amount, rng);
        copy
    }

    /// Parses the JSON record form.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let record: ControllerRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }

    /// Encodes the JSON record form.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Persisted shape of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Placeholder activations, one per input.
    pub inputs: Vec<f32>,
    /// Placeholder activations, one per output.
    pub outputs: Vec<f32>,
    /// One threshold per output.
    pub biases: Vec<f32>,
    /// One row per input, each holding one weight per output.
    pub weights: Vec<Vec<f32>>,
}

/// Persisted shape of a controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerRecord {
    /// Levels from input to output.
    pub levels: Vec<LevelRecord>,
}

impl LevelRecord {
    fn into_level(self, index: usize) -> Result<Level, SimError> {
        let input_count = self.inputs.len();
        let output_count = self.biases.len();
        if input_count == 0 || output_count == 0 {
            return Err(SimError::EmptyController);
        }

        let mismatch = |field, expected, actual| SimError::ControllerShapeMismatch {
            level: index,
            field,
            expected,
            actual,
        };

        if self.outputs.len() != output_count {
            return Err(mismatch("outputs", output_count, self.outputs.len()));
        }
        if self.weights.len() != input_count {
            return Err(mismatch("weight rows", input_count, self.weights.len()));
        }
        if let Some(row) = self.weights.iter().find(|row| row.len() != output_count) {
            return Err(mismatch("weight columns", output_count, row.len()));
        }

        let flat: Vec<f32> = self.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((input_count, output_count), flat)
            .map_err(|_| mismatch("weights", input_count * output_count, 0))?;
        Ok(Level::from_parts(Array1::from_vec(self.biases), weights))
    }
}

impl TryFrom<ControllerRecord> for Controller {
    type Error = SimError;

    fn try_from(record: ControllerRecord) -> Result<Self, Self::Error> {
        let levels = record
            .levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| level.into_level(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_levels(levels)
    }
}

impl From<Controller> for ControllerRecord {
    fn from(controller: Controller) -> Self {
        let levels = controller
            .levels
            .iter()
            .map(|level| LevelRecord {
                inputs: vec![0.0; level.input_count()],
                outputs: vec![0.0; level.output_count()],
                biases: level.biases().to_vec(),
                weights: level.weights().rows().into_iter().map(|row| row.to_vec()).collect(),
            })
            .collect();
        Self { levels }
    }
}
