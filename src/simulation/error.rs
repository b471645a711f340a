//! Error type shared by every simulation component.

use thiserror::Error;

/// Errors raised while configuring or running the simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A controller level does not fit its neighbours or its own buffers.
    #[error("controller level {level}: {field} is {actual}, expected {expected}")]
    ControllerShapeMismatch {
        /// Index of the offending level.
        level: usize,
        /// Which dimension disagreed.
        field: &'static str,
        /// Size required by the surrounding network.
        expected: usize,
        /// Size actually found.
        actual: usize,
    },
    /// A controller needs at least one level with non-zero dimensions.
    #[error("controller must contain at least one non-empty level")]
    EmptyController,
    /// Sensors need at least one ray.
    #[error("sensor needs at least one ray, got {ray_count}")]
    InvalidSensorConfiguration {
        /// Configured number of rays.
        ray_count: usize,
    },
    /// Road geometry cannot be built.
    #[error("road needs a positive width and at least one lane, got {lane_count} lanes")]
    InvalidRoad {
        /// Configured number of lanes.
        lane_count: usize,
    },
    /// Any other inconsistent configuration value.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// The obstacle index rejected a coordinate.
    #[error("spatial index error: {0}")]
    SpatialIndex(String),
    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
