//! Vector type alias for 2D positions and directions.

use nalgebra::Vector2;

use super::units::Degrees;

/// 2D vector in the local metric frame (x = east, y = north).
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used for ignition
/// points, perimeter vertices, structure zones and wind vectors.
pub type Vec2 = Vector2<f32>;

/// Unit vector pointing along a compass bearing.
#[inline]
#[must_use]
pub fn bearing_unit(bearing: Degrees) -> Vec2 {
    let rad = bearing.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}

/// Compass bearing of the vector from `from` to `to`.
#[must_use]
pub fn bearing_between(from: Vec2, to: Vec2) -> Degrees {
    let d = to - from;
    Degrees::new(d.x.atan2(d.y).to_degrees()).normalized()
}

/// Shortest distance from `point` to the segment `a`-`b`
#[must_use]
pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::EPSILON {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).norm()
}

/// Even-odd point-in-polygon test. The polygon is implicitly closed.
#[must_use]
pub fn polygon_contains(polygon: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    let n = polygon.len();
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + n - 1) % n];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Distance from `point` to a closed polygon's boundary, zero when inside
#[must_use]
pub fn distance_to_polygon(polygon: &[Vec2], point: Vec2) -> f32 {
    if polygon_contains(polygon, point) {
        return 0.0;
    }
    edges(polygon)
        .map(|(a, b)| distance_to_segment(point, a, b))
        .fold(f32::INFINITY, f32::min)
}

/// Closest approach between two closed polygons, zero when they overlap.
///
/// Symmetric in its arguments up to floating-point rounding; callers that
/// need exact symmetry should order the arguments canonically.
#[must_use]
pub fn polygon_distance(a: &[Vec2], b: &[Vec2]) -> f32 {
    if a.iter().any(|&p| polygon_contains(b, p)) || b.iter().any(|&p| polygon_contains(a, p)) {
        return 0.0;
    }
    let mut best = f32::INFINITY;
    for (a0, a1) in edges(a) {
        for (b0, b1) in edges(b) {
            if segments_intersect(a0, a1, b0, b1) {
                return 0.0;
            }
            best = best
                .min(distance_to_segment(a0, b0, b1))
                .min(distance_to_segment(a1, b0, b1))
                .min(distance_to_segment(b0, a0, a1))
                .min(distance_to_segment(b1, a0, a1));
        }
    }
    best
}

fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn east_is_ninety_degrees() {
        let e = bearing_unit(Degrees::new(90.0));
        assert_relative_eq!(e.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(e.y, 0.0, epsilon = 1e-6);

        let b = bearing_between(Vec2::zeros(), Vec2::new(0.0, -5.0));
        assert_relative_eq!(*b, 180.0, epsilon = 1e-4);
    }

    fn square(min: f32, max: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ]
    }

    #[test]
    fn point_polygon_distance() {
        let sq = square(0.0, 10.0);
        assert!(polygon_contains(&sq, Vec2::new(5.0, 5.0)));
        assert_eq!(distance_to_polygon(&sq, Vec2::new(5.0, 5.0)), 0.0);
        assert_relative_eq!(distance_to_polygon(&sq, Vec2::new(13.0, 14.0)), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn polygon_gap_and_overlap() {
        let a = square(0.0, 10.0);
        let b = square(15.0, 25.0);
        let gap = (5.0f32 * 5.0 * 2.0).sqrt();
        assert_relative_eq!(polygon_distance(&a, &b), gap, epsilon = 1e-4);
        assert_eq!(polygon_distance(&a, &b), polygon_distance(&b, &a));
        assert_eq!(polygon_distance(&a, &square(5.0, 20.0)), 0.0);
    }
}
