//! Straight multi-lane road.

use geo::{Coord, Line};

use super::error::SimError;
use super::geometric_utils::lerp;

/// How far the road extends up and down from y = 0.
pub const ROAD_EXTENT: f32 = 1_000_000.0;

/// A straight road running along the y axis.
///
/// The two outer lines are solid borders; the inner lines only mark lanes.
#[derive(Debug, Clone)]
pub struct Road {
    center_x: f32,
    width: f32,
    lane_count: usize,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl Road {
    /// Builds a road centred on `center_x`.
    pub fn new(center_x: f32, width: f32, lane_count: usize) -> Result<Self, SimError> {
        if lane_count == 0 || width <= 0.0 || !width.is_finite() {
            return Err(SimError::InvalidRoad { lane_count });
        }
        Ok(Self {
            center_x,
            width,
            lane_count,
            left: center_x - width / 2.0,
            right: center_x + width / 2.0,
            top: -ROAD_EXTENT,
            bottom: ROAD_EXTENT,
        })
    }

    /// Number of lanes.
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Total width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Centre x coordinate.
    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    /// Width of a single lane.
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// X coordinate of a lane's centreline. Out-of-range indices are clamped.
    pub fn lane_center(&self, index: usize) -> f32 {
        let index = index.min(self.lane_count - 1);
        self.left + self.lane_width() / 2.0 + index as f32 * self.lane_width()
    }

    fn vertical(&self, x: f32) -> Line<f32> {
        Line::new(
            Coord { x, y: self.top },
            Coord { x, y: self.bottom },
        )
    }

    /// All `lane_count + 1` lane lines, left to right.
    pub fn lane_lines(&self) -> Vec<Line<f32>> {
        (0..=self.lane_count)
            .map(|i| {
                let x = lerp(self.left, self.right, i as f32 / self.lane_count as f32);
                self.vertical(x)
            })
            .collect()
    }

    /// Left and right edges; the only lines cars can hit or see.
    pub fn borders(&self) -> [Line<f32>; 2] {
        [self.vertical(self.left), self.vertical(self.right)]
    }
}
