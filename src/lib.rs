//! # Evo Drive - Neuro-evolved Self-Driving Cars
//!
//! A population of cars learns to drive through traffic on a multi-lane road.
//! Each car is steered by a small feed-forward network fed by a fan of ray
//! sensors. There is no gradient descent: after every generation the car that
//! got furthest is cloned into the next population, once verbatim and many
//! times with mutations.
//!
//! ## Features
//!
//! - Segment and polygon intersection on `geo` coordinates
//! - Ray-fan sensors against road borders and traffic
//! - Simple car kinematics with friction, reverse and steering
//! - Hard-threshold perceptron controllers on `ndarray`
//! - Elitist selection with per-parameter mutation
//! - Parallel per-car updates against a frozen obstacle snapshot
//! - JSON persistence of controllers and parameters
//!
//! ## Core Modules
//!
//! - [`simulation::geometric_utils`] - Geometry kernel
//! - [`simulation::road`] - Road model
//! - [`simulation::vehicle`] - Kinematics, collision and sensors
//! - [`simulation::brain`] - Controller networks
//! - [`simulation::evolution`] - Selection and breeding
//! - [`simulation::driver`] - Generation control surface

/// Core simulation logic and data structures.
pub mod simulation {
    /// Feed-forward controller networks.
    pub mod brain;
    /// Simulation driver with generation controls.
    pub mod driver;
    /// Crate error type.
    pub mod error;
    /// Recent event log for display.
    pub mod event_log;
    /// Elitist selection and breeding.
    pub mod evolution;
    /// One generation of cars and its tick.
    pub mod generation;
    /// Segment and polygon intersection.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// Multi-lane road geometry.
    pub mod road;
    /// Spatial index over obstacle outlines.
    pub mod spatial;
    /// Controller persistence.
    pub mod storage;
    /// Vehicles, sensors and control sources.
    pub mod vehicle;
}

pub use simulation::brain::Controller;
pub use simulation::driver::Simulation;
pub use simulation::error::SimError;
pub use simulation::params::Params;
