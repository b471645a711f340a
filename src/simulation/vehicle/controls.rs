use serde::{Deserialize, Serialize};

use super::super::brain::Controller;

/// Control inputs applied to a vehicle for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Accelerate.
    pub forward: bool,
    /// Brake / accelerate backwards.
    pub reverse: bool,
    /// Turn left.
    pub left: bool,
    /// Turn right.
    pub right: bool,
}

impl Controls {
    /// Forward only, no steering. What traffic cars do every tick.
    pub fn cruise() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Reads controller outputs positionally: forward, reverse, left, right.
    /// Missing outputs count as inactive.
    pub fn from_outputs(outputs: &[f32]) -> Self {
        let active = |i: usize| outputs.get(i).is_some_and(|&v| v > 0.5);
        Self {
            forward: active(0),
            reverse: active(1),
            left: active(2),
            right: active(3),
        }
    }
}

/// Where a vehicle's controls come from each tick.
#[derive(Debug, Clone)]
pub enum ControlSource {
    /// Decided by the vehicle's own controller from its sensor readings.
    Ai(Controller),
    /// The same inputs every tick.
    Fixed(Controls),
}
