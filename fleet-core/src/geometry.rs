//! Plane geometry used by the world queries and the navigation planner.
//!
//! Bearings are radians internally and whole degrees in `[0, 360)` at the
//! command boundary.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing from `self` towards `other`, in radians normalized to `[0, 2π)`.
    pub fn bearing_to(self, other: Position) -> f64 {
        let angle = (other.y - self.y).atan2(other.x - self.x);
        if angle < 0.0 {
            angle + 2.0 * PI
        } else {
            angle
        }
    }

    /// Point reached by travelling `distance` along `bearing` (radians).
    pub fn offset(self, bearing: f64, distance: f64) -> Position {
        Position {
            x: self.x + bearing.cos() * distance,
            y: self.y + bearing.sin() * distance,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Anything with a position and a collision radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Position,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Position, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The point on this circle's boundary, padded outward by `margin`,
    /// that is closest to `from`. A negative margin moves the point inside.
    pub fn closest_point(&self, from: Position, margin: f64) -> Position {
        let bearing = self.center.bearing_to(from);
        self.center.offset(bearing, self.radius + margin)
    }
}

/// Centroid of a set of positions, `None` when the set is empty.
pub fn centroid<I>(points: I) -> Option<Position>
where
    I: IntoIterator<Item = Position>,
{
    let mut count = 0usize;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for point in points {
        sum_x += point.x;
        sum_y += point.y;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Position::new(sum_x / count as f64, sum_y / count as f64))
}

/// True when the segment `start..end` passes within `circle.radius + fudge`
/// of the circle's center.
pub fn segment_circle_intersect(start: Position, end: Position, circle: &Circle, fudge: f64) -> bool {
    let reach = circle.radius + fudge;
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq == 0.0 {
        return start.distance_to(circle.center) <= reach;
    }

    // Parameter of the closest point along the segment, clamped to the ends.
    let t = (((circle.center.x - start.x) * dx + (circle.center.y - start.y) * dy) / length_sq)
        .clamp(0.0, 1.0);
    let closest = Position::new(start.x + dx * t, start.y + dy * t);
    closest.distance_to(circle.center) <= reach
}

pub fn rad_to_deg(angle: f64) -> f64 {
    angle * 180.0 / PI
}

pub fn deg_to_rad(angle: f64) -> f64 {
    angle * PI / 180.0
}

/// Rounds a bearing in radians to whole degrees clipped to `[0, 360)`.
pub fn rad_to_deg_clipped(angle: f64) -> u32 {
    normalize_deg(rad_to_deg(angle).round() as i64)
}

pub fn normalize_deg(angle: i64) -> u32 {
    angle.rem_euclid(360) as u32
}
