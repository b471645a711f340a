//! Geometric primitives shared by sensing and collision detection.
//!
//! Points are [`geo::Coord`] values and segments are [`geo::Line`] values, so
//! callers can hand the same geometry to any other `geo` algorithm.

use geo::{Coord, Line};

/// Corner points of a car body, in drawing order.
pub type Polygon = [Coord<f32>; 4];

/// Where two segments cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The crossing point.
    pub point: Coord<f32>,
    /// Fraction of the way along the first segment, in `[0, 1]`.
    pub t: f32,
    /// Fraction of the way along the second segment, in `[0, 1]`.
    pub u: f32,
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn cross(a: Coord<f32>, b: Coord<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Intersects segment `a` with segment `b`.
///
/// # Arguments
///
/// * `a` - First segment; `t` is measured along it
/// * `b` - Second segment; `u` is measured along it
///
/// # Returns
///
/// The crossing point with both segment parameters, or `None` for parallel
/// (including collinear) segments and for lines that cross outside either
/// segment.
pub fn segment_intersect(a: Line<f32>, b: Line<f32>) -> Option<Intersection> {
    let r = a.end - a.start;
    let s = b.end - b.start;
    let denom = cross(r, s);
    if denom == 0.0 {
        return None;
    }

    let qp = b.start - a.start;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Intersection {
            point: a.start + r * t,
            t,
            u,
        })
    } else {
        None
    }
}

/// Closed edges of a polygon, the last one joining back to the first corner.
pub fn edges(poly: &[Coord<f32>]) -> impl Iterator<Item = Line<f32>> + '_ {
    let n = poly.len();
    (0..n).map(move |i| Line::new(poly[i], poly[(i + 1) % n]))
}

/// True if any edge of `a` crosses any edge of `b`.
///
/// A polygon lying strictly inside the other is not reported.
pub fn polygons_intersect(a: &[Coord<f32>], b: &[Coord<f32>]) -> bool {
    edges(a).any(|ea| edges(b).any(|eb| segment_intersect(ea, eb).is_some()))
}

/// True if any edge of `poly` crosses `segment`.
pub fn polygon_touches_segment(poly: &[Coord<f32>], segment: Line<f32>) -> bool {
    edges(poly).any(|edge| segment_intersect(edge, segment).is_some())
}
