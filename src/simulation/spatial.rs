//! Spatial indexing of obstacle vehicles for sensing and collision queries.
//!
//! An [`ObstacleField`] is a frozen snapshot of vehicle outlines taken at the
//! start of a tick, so every car senses the same world regardless of update
//! order.

use geo::Coord;
use kdtree::KdTree;
use kdtree::distance::squared_euclidean;

use super::error::SimError;
use super::geometric_utils::Polygon;
use super::vehicle::Vehicle;

/// Type alias for 2D spatial KD-tree keyed by obstacle index.
pub type Tree2D = KdTree<f32, usize, [f32; 2]>;

/// A vehicle outline frozen at snapshot time.
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Id of the vehicle this outline belongs to.
    pub id: usize,
    /// Outline corners.
    pub polygon: Polygon,
}

/// Snapshot of obstacle outlines with a k-d tree over their centres.
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    tree: Tree2D,
    /// Largest centre-to-corner distance of any obstacle.
    max_extent: f32,
}

impl ObstacleField {
    /// A field with nothing in it.
    pub fn empty() -> Self {
        Self {
            obstacles: Vec::new(),
            tree: KdTree::new(2),
            max_extent: 0.0,
        }
    }

    /// Snapshots the current outlines of `vehicles`.
    pub fn build(vehicles: &[Vehicle]) -> Result<Self, SimError> {
        let mut tree = KdTree::with_capacity(2, vehicles.len());
        let mut obstacles = Vec::with_capacity(vehicles.len());
        let mut max_extent = 0.0_f32;

        for (i, vehicle) in vehicles.iter().enumerate() {
            let center = vehicle.position();
            tree.add([center.x, center.y], i)
                .map_err(|e| SimError::SpatialIndex(format!("{e:?}")))?;
            max_extent = max_extent.max(vehicle.body_radius());
            obstacles.push(Obstacle {
                id: vehicle.id,
                polygon: *vehicle.polygon(),
            });
        }

        Ok(Self {
            obstacles,
            tree,
            max_extent,
        })
    }

    /// Number of obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True if the field holds no obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// All obstacles in snapshot order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Outlines of every obstacle whose body may reach within `radius` of
    /// `center`.
    ///
    /// # Arguments
    ///
    /// * `center` - Query position
    /// * `radius` - Reach of the querying vehicle; obstacle extents are added internally
    /// * `exclude` - Id of the querying vehicle, never returned
    ///
    /// # Returns
    ///
    /// Candidate polygons in snapshot order, or an error if the index
    /// rejects the query.
    pub fn near(
        &self,
        center: Coord<f32>,
        radius: f32,
        exclude: usize,
    ) -> Result<Vec<&Polygon>, SimError> {
        if self.obstacles.is_empty() {
            return Ok(Vec::new());
        }

        let reach = radius + self.max_extent;
        let hits = self
            .tree
            .within(&[center.x, center.y], reach * reach, &squared_euclidean)
            .map_err(|e| SimError::SpatialIndex(format!("{e:?}")))?;

        let mut indices: Vec<usize> = hits.into_iter().map(|(_, &idx)| idx).collect();
        // keep snapshot order so results do not depend on tree layout
        indices.sort_unstable();

        Ok(indices
            .into_iter()
            .map(|idx| &self.obstacles[idx])
            .filter(|obstacle| obstacle.id != exclude)
            .map(|obstacle| &obstacle.polygon)
            .collect())
    }
}
