use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brain::CONTROL_OUTPUTS;
use super::error::SimError;

/// A traffic car's starting slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSlot {
    /// Lane index (clamped to the road).
    pub lane: usize,
    /// Starting y coordinate. Smaller is further down the road.
    pub y: f32,
}

/// Simulation parameters that control road, cars, sensors and evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Road centre x coordinate.
    pub road_center_x: f32,
    /// Total road width.
    pub road_width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Car body width.
    pub car_width: f32,
    /// Car body length.
    pub car_height: f32,
    /// Forward speed cap for AI cars.
    pub ai_max_speed: f32,
    /// Forward speed cap for traffic cars.
    pub traffic_max_speed: f32,
    /// Speed gained per tick while accelerating.
    pub acceleration: f32,
    /// Speed lost per tick to friction.
    pub friction: f32,
    /// Heading change per tick while steering, in radians.
    pub steering_rate: f32,
    /// Number of sensor rays per AI car.
    pub ray_count: usize,
    /// Length of each sensor ray.
    pub ray_length: f32,
    /// Total angle covered by the ray fan, in radians.
    pub ray_spread: f32,
    /// Hidden layer sizes between the sensors and the four control outputs.
    pub hidden_layers: Vec<usize>,
    /// AI cars per generation.
    pub population: usize,
    /// Blend factor applied when mutating cloned controllers.
    pub mutation_rate: f32,
    /// Lane the AI cars start in.
    pub start_lane: usize,
    /// Starting y coordinate of the AI cars.
    pub start_y: f32,
    /// Traffic layout, regenerated identically every generation.
    pub traffic: Vec<TrafficSlot>,
    /// End the generation as soon as no AI car is left undamaged.
    pub auto_reset: bool,
    /// Tick budget per generation for headless runs.
    pub tick_limit: u64,
    /// Seed for the random source. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            road_center_x: 150.0,
            road_width: 270.0,
            lane_count: 3,
            car_width: 30.0,
            car_height: 50.0,
            ai_max_speed: 4.0,
            traffic_max_speed: 2.0,
            acceleration: 0.2,
            friction: 0.05,
            steering_rate: 0.03,
            ray_count: 5,
            ray_length: 150.0,
            ray_spread: std::f32::consts::FRAC_PI_2,
            hidden_layers: vec![6],
            population: 120,
            mutation_rate: 0.1,
            start_lane: 1,
            start_y: 100.0,
            traffic: default_traffic(),
            auto_reset: true,
            tick_limit: 5000,
            seed: None,
        }
    }
}

fn default_traffic() -> Vec<TrafficSlot> {
    [
        (1, -100.0),
        (0, -300.0),
        (2, -300.0),
        (0, -500.0),
        (1, -500.0),
        (1, -700.0),
        (2, -700.0),
    ]
    .into_iter()
    .map(|(lane, y)| TrafficSlot { lane, y })
    .collect()
}

impl Params {
    /// Full controller shape: sensor rays, hidden layers, control outputs.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.ray_count);
        sizes.extend(&self.hidden_layers);
        sizes.push(CONTROL_OUTPUTS);
        sizes
    }

    /// Checks values that would otherwise only fail deep inside a tick.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.ray_count == 0 {
            return Err(SimError::InvalidSensorConfiguration { ray_count: 0 });
        }
        if self.lane_count == 0 || !(self.road_width.is_finite() && self.road_width > 0.0) {
            return Err(SimError::InvalidRoad {
                lane_count: self.lane_count,
            });
        }
        if self.population == 0 {
            return Err(SimError::InvalidParams("population must be at least 1".into()));
        }
        let positive = [
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("ai_max_speed", self.ai_max_speed),
            ("traffic_max_speed", self.traffic_max_speed),
            ("ray_length", self.ray_length),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(SimError::InvalidParams(format!(
                "{} must be positive and finite, got {}",
                name, value
            )));
        }
        let non_negative = [
            ("acceleration", self.acceleration),
            ("friction", self.friction),
            ("steering_rate", self.steering_rate),
            ("ray_spread", self.ray_spread),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            return Err(SimError::InvalidParams(format!(
                "{} must be non-negative and finite, got {}",
                name, value
            )));
        }
        if !self.start_y.is_finite() || !self.road_center_x.is_finite() {
            return Err(SimError::InvalidParams("start position must be finite".into()));
        }
        if let Some(slot) = self.traffic.iter().find(|slot| !slot.y.is_finite()) {
            return Err(SimError::InvalidParams(format!(
                "traffic y must be finite, got {}",
                slot.y
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SimError::InvalidParams(format!(
                "mutation rate {} outside [0, 1]",
                self.mutation_rate
            )));
        }
        if self.hidden_layers.contains(&0) {
            return Err(SimError::EmptyController);
        }
        Ok(())
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Writes the parameters as pretty JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
