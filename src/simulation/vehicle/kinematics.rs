//! Vehicle state, motion integration and damage detection.
//!
//! Each tick a vehicle senses, decides its controls, moves, and then checks
//! its new outline against the road borders and nearby obstacles. A damaged
//! vehicle is a wreck: it never moves, senses or decides again.

use geo::{Coord, Line};
use serde::{Deserialize, Serialize};

use super::super::brain::Controller;
use super::super::error::SimError;
use super::super::geometric_utils::{Polygon, polygon_touches_segment, polygons_intersect};
use super::super::params::{Params, TrafficSlot};
use super::super::road::Road;
use super::super::spatial::ObstacleField;
use super::controls::{ControlSource, Controls};
use super::sensor::{Sensor, Touch};

/// Acceleration, speed and steering limits of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handling {
    /// Speed gained per tick while accelerating.
    pub acceleration: f32,
    /// Forward speed cap.
    pub max_speed: f32,
    /// Reverse speed cap (positive number).
    pub max_reverse_speed: f32,
    /// Speed lost per tick to friction.
    pub friction: f32,
    /// Heading change per tick while steering.
    pub steering_rate: f32,
}

impl Handling {
    /// Handling with the given forward cap; reverse is capped at half of it.
    pub fn from_params(params: &Params, max_speed: f32) -> Self {
        Self {
            acceleration: params.acceleration,
            max_speed,
            max_reverse_speed: max_speed / 2.0,
            friction: params.friction,
            steering_rate: params.steering_rate,
        }
    }
}

/// A car on the road, either AI-driven or plain traffic.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Identifier, unique within a generation.
    pub id: usize,
    /// Centre x coordinate.
    pub x: f32,
    /// Centre y coordinate. Decreases as the car drives forward.
    pub y: f32,
    /// Heading in radians; 0 faces decreasing y.
    pub angle: f32,
    /// Signed speed; negative while reversing.
    pub speed: f32,
    width: f32,
    height: f32,
    handling: Handling,
    controls: Controls,
    damaged: bool,
    polygon: Polygon,
    sensor: Option<Sensor>,
    source: ControlSource,
}

impl Vehicle {
    /// Creates an undamaged vehicle at rest facing up the road.
    pub fn new(
        id: usize,
        position: Coord<f32>,
        size: (f32, f32),
        handling: Handling,
        source: ControlSource,
        sensor: Option<Sensor>,
    ) -> Self {
        let (width, height) = size;
        Self {
            id,
            x: position.x,
            y: position.y,
            angle: 0.0,
            speed: 0.0,
            width,
            height,
            handling,
            controls: Controls::default(),
            damaged: false,
            polygon: body_polygon(position, 0.0, width, height),
            sensor,
            source,
        }
    }

    /// An AI car at the configured start lane, driven by `controller`.
    pub fn ai(id: usize, params: &Params, road: &Road, controller: Controller) -> Result<Self, SimError> {
        let sensor = Sensor::new(params.ray_count, params.ray_length, params.ray_spread)?;
        Ok(Self::new(
            id,
            Coord {
                x: road.lane_center(params.start_lane),
                y: params.start_y,
            },
            (params.car_width, params.car_height),
            Handling::from_params(params, params.ai_max_speed),
            ControlSource::Ai(controller),
            Some(sensor),
        ))
    }

    /// A sensorless traffic car that always cruises forward.
    pub fn traffic(id: usize, params: &Params, road: &Road, slot: TrafficSlot) -> Self {
        Self::new(
            id,
            Coord {
                x: road.lane_center(slot.lane),
                y: slot.y,
            },
            (params.car_width, params.car_height),
            Handling::from_params(params, params.traffic_max_speed),
            ControlSource::Fixed(Controls::cruise()),
            None,
        )
    }

    /// Centre point.
    pub fn position(&self) -> Coord<f32> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Body width and length.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Speed and steering limits.
    pub fn handling(&self) -> &Handling {
        &self.handling
    }

    /// Distance from the centre to any corner.
    pub fn body_radius(&self) -> f32 {
        self.width.hypot(self.height) / 2.0
    }

    /// True once the vehicle has hit something. Never resets.
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    /// Outline at the current position and heading.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Controls applied on the last tick.
    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// The ray sensor, if this vehicle has one.
    pub fn sensor(&self) -> Option<&Sensor> {
        self.sensor.as_ref()
    }

    /// Sensor readings from the last tick; empty for traffic.
    pub fn sensor_readings(&self) -> &[Option<Touch>] {
        self.sensor.as_ref().map_or(&[][..], Sensor::readings)
    }

    /// Where this vehicle's controls come from.
    pub fn control_source(&self) -> &ControlSource {
        &self.source
    }

    /// The driving controller of an AI car.
    pub fn controller(&self) -> Option<&Controller> {
        match &self.source {
            ControlSource::Ai(controller) => Some(controller),
            ControlSource::Fixed(_) => None,
        }
    }

    /// Advances the vehicle by one tick: sense, decide, move, check damage.
    ///
    /// # Arguments
    ///
    /// * `road` - Road whose borders are solid
    /// * `obstacles` - Start-of-tick snapshot of the outlines this vehicle can see and hit
    ///
    /// # Returns
    ///
    /// `Ok(())` once the tick is applied, including for wrecks, which do
    /// nothing. If the controller rejects its inputs the error is returned
    /// and the vehicle does not move.
    pub fn step(&mut self, road: &Road, obstacles: &ObstacleField) -> Result<(), SimError> {
        if self.damaged {
            return Ok(());
        }

        let borders = road.borders();
        let reach = self.body_radius()
            + self.handling.max_speed
            + self.sensor.as_ref().map_or(0.0, Sensor::ray_length);
        let nearby = obstacles.near(self.position(), reach, self.id)?;

        let controls = self.decide(&borders, &nearby)?;
        self.controls = controls;
        self.apply(controls);

        self.polygon = body_polygon(self.position(), self.angle, self.width, self.height);
        self.damaged = self.assess_damage(&borders, &nearby);
        Ok(())
    }

    fn decide(&mut self, borders: &[Line<f32>], nearby: &[&Polygon]) -> Result<Controls, SimError> {
        let origin = self.position();
        if let Some(sensor) = self.sensor.as_mut() {
            sensor.update(origin, self.angle, borders, nearby);
        }

        match &mut self.source {
            ControlSource::Fixed(controls) => Ok(*controls),
            ControlSource::Ai(controller) => {
                let inputs = self
                    .sensor
                    .as_ref()
                    .map(Sensor::activations)
                    .unwrap_or_default();
                controller.feed_forward(&inputs)
            }
        }
    }

    /// Integrates speed, heading and position for one tick.
    pub fn apply(&mut self, controls: Controls) {
        let h = self.handling;

        if controls.forward {
            self.speed += h.acceleration;
        }
        if controls.reverse {
            self.speed -= h.acceleration;
        }
        self.speed = self.speed.clamp(-h.max_reverse_speed, h.max_speed);

        if self.speed > 0.0 {
            self.speed -= h.friction;
        } else if self.speed < 0.0 {
            self.speed += h.friction;
        }
        if self.speed.abs() < h.friction {
            self.speed = 0.0;
        }

        if self.speed != 0.0 {
            // reversing turns the other way
            let flip = self.speed.signum();
            if controls.left {
                self.angle += h.steering_rate * flip;
            }
            if controls.right {
                self.angle -= h.steering_rate * flip;
            }
        }

        self.x -= self.angle.sin() * self.speed;
        self.y -= self.angle.cos() * self.speed;
    }

    fn assess_damage(&self, borders: &[Line<f32>], nearby: &[&Polygon]) -> bool {
        borders
            .iter()
            .any(|&border| polygon_touches_segment(&self.polygon, border))
            || nearby
                .iter()
                .any(|other| polygons_intersect(&self.polygon, other.as_slice()))
    }
}

/// Corners of a `width` × `height` body centred on `center` and rotated by
/// `angle`.
pub fn body_polygon(center: Coord<f32>, angle: f32, width: f32, height: f32) -> Polygon {
    let radius = width.hypot(height) / 2.0;
    let alpha = width.atan2(height);
    let corner = |theta: f32| Coord {
        x: center.x - theta.sin() * radius,
        y: center.y - theta.cos() * radius,
    };
    let pi = std::f32::consts::PI;
    [
        corner(angle - alpha),
        corner(angle + alpha),
        corner(pi + angle - alpha),
        corner(pi + angle + alpha),
    ]
}
