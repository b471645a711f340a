//! Vehicles: kinematics, collision, sensing and control sources.

mod controls;
mod kinematics;
mod sensor;

pub use controls::{ControlSource, Controls};
pub use kinematics::{Handling, Vehicle, body_polygon};
pub use sensor::{Sensor, Touch, read_ray};
