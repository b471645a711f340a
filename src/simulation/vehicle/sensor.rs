//! Ray-fan sensor - lets a car see road borders and traffic ahead of it.
//!
//! Each ray reports the closest thing it touches as a fraction of the ray
//! length. Readings depend only on the geometry passed to [`Sensor::update`].

use geo::{Coord, Line};

use super::super::error::SimError;
use super::super::geometric_utils::{Polygon, edges, lerp, segment_intersect};

/// The closest hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Where the ray hit.
    pub point: Coord<f32>,
    /// Distance to the hit as a fraction of the ray length; 0 means touching.
    pub offset: f32,
}

/// A fan of rays cast from a car's centre.
#[derive(Debug, Clone)]
pub struct Sensor {
    ray_count: usize,
    ray_length: f32,
    ray_spread: f32,
    rays: Vec<Line<f32>>,
    readings: Vec<Option<Touch>>,
}

impl Sensor {
    /// Creates a sensor with `ray_count` rays spread over `ray_spread` radians.
    pub fn new(ray_count: usize, ray_length: f32, ray_spread: f32) -> Result<Self, SimError> {
        if ray_count == 0 {
            return Err(SimError::InvalidSensorConfiguration { ray_count });
        }
        Ok(Self {
            ray_count,
            ray_length,
            ray_spread,
            rays: Vec::with_capacity(ray_count),
            readings: vec![None; ray_count],
        })
    }

    /// Number of rays.
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Length of every ray.
    pub fn ray_length(&self) -> f32 {
        self.ray_length
    }

    /// Ray headings for a car facing `heading`, leftmost first. A single
    /// ray points straight ahead.
    pub fn ray_angles(&self, heading: f32) -> Vec<f32> {
        let half = self.ray_spread / 2.0;
        (0..self.ray_count)
            .map(|i| {
                let t = if self.ray_count == 1 {
                    0.5
                } else {
                    i as f32 / (self.ray_count - 1) as f32
                };
                heading + lerp(half, -half, t)
            })
            .collect()
    }

    /// Ray segments for a car at `origin` facing `heading`.
    ///
    /// Rays use the same direction convention as motion: heading 0 points
    /// towards decreasing y.
    pub fn cast(&self, origin: Coord<f32>, heading: f32) -> Vec<Line<f32>> {
        self.ray_angles(heading)
            .into_iter()
            .map(|angle| {
                let end = Coord {
                    x: origin.x - angle.sin() * self.ray_length,
                    y: origin.y - angle.cos() * self.ray_length,
                };
                Line::new(origin, end)
            })
            .collect()
    }

    /// Recasts every ray and stores the closest hit of each.
    ///
    /// # Arguments
    ///
    /// * `origin` - Centre of the car
    /// * `heading` - Car heading in radians
    /// * `borders` - Solid road edges
    /// * `obstacles` - Outlines of nearby traffic
    pub fn update(
        &mut self,
        origin: Coord<f32>,
        heading: f32,
        borders: &[Line<f32>],
        obstacles: &[&Polygon],
    ) {
        self.rays = self.cast(origin, heading);
        self.readings = self
            .rays
            .iter()
            .map(|&ray| read_ray(ray, borders, obstacles))
            .collect();
    }

    /// Rays from the last update.
    pub fn rays(&self) -> &[Line<f32>] {
        &self.rays
    }

    /// Closest hit per ray from the last update.
    pub fn readings(&self) -> &[Option<Touch>] {
        &self.readings
    }

    /// Normalized distance per ray: the hit offset, or `1.0` for open road.
    pub fn distances(&self) -> Vec<f32> {
        self.readings
            .iter()
            .map(|r| r.map_or(1.0, |touch| touch.offset))
            .collect()
    }

    /// Controller inputs per ray: `1 - offset`, so nearer obstacles excite
    /// more; `0.0` for open road.
    pub fn activations(&self) -> Vec<f32> {
        self.readings
            .iter()
            .map(|r| r.map_or(0.0, |touch| 1.0 - touch.offset))
            .collect()
    }
}

/// Closest intersection of `ray` with the borders and obstacle outlines.
pub fn read_ray(ray: Line<f32>, borders: &[Line<f32>], obstacles: &[&Polygon]) -> Option<Touch> {
    let obstacle_edges = obstacles.iter().flat_map(|poly| edges(poly.as_slice()));

    borders
        .iter()
        .copied()
        .chain(obstacle_edges)
        .filter_map(|segment| segment_intersect(ray, segment))
        .min_by(|a, b| a.t.total_cmp(&b.t))
        .map(|hit| Touch {
            point: hit.point,
            offset: hit.t,
        })
}
