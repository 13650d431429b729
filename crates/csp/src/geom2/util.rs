use nalgebra::Vector2;

use super::types::Point;

/// Distance below which a point counts as lying on a polygon edge.
const ON_EDGE_EPS: f64 = 1e-14;

/// Vertices of a ring without the repeated closing vertex.
fn open_ring(ring: &[Point]) -> &[Point] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Unsigned polygon area (shoelace). Accepts open or closed rings.
pub fn polygon_area(ring: &[Point]) -> f64 {
    let verts = open_ring(ring);
    if verts.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in verts.iter().enumerate() {
        let q = verts[(i + 1) % verts.len()];
        twice += cross(p.vec(), q.vec());
    }
    (twice * 0.5).abs()
}

/// Area centroid; falls back to the vertex mean for degenerate rings.
pub fn polygon_centroid(ring: &[Point]) -> Option<Point> {
    let verts = open_ring(ring);
    if verts.is_empty() {
        return None;
    }
    let mut a = 0.0;
    let mut c = Vector2::<f64>::zeros();
    for (i, p) in verts.iter().enumerate() {
        let q = verts[(i + 1) % verts.len()];
        let w = cross(p.vec(), q.vec());
        a += w;
        c += (p.vec() + q.vec()) * w;
    }
    a *= 0.5;
    if a.abs() < 1e-18 {
        let mean = verts
            .iter()
            .fold(Vector2::<f64>::zeros(), |acc, p| acc + p.vec()) / verts.len() as f64;
        return Some(Point::from_vec(mean));
    }
    Some(Point::from_vec(c / (6.0 * a)))
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let ab = b.vec() - a.vec();
    let ap = p.vec() - a.vec();
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return ap.norm() <= ON_EDGE_EPS;
    }
    let t = ap.dot(&ab) / len2;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }
    cross(ab, ap).abs() / len2.sqrt() <= ON_EDGE_EPS
}

/// Strict containment: points on the boundary are not contained.
pub fn contains_strict(ring: &[Point], p: Point) -> bool {
    let verts = open_ring(ring);
    if verts.len() < 3 {
        return false;
    }
    let mut inside = false;
    for (i, &a) in verts.iter().enumerate() {
        let b = verts[(i + 1) % verts.len()];
        if on_segment(a, b, p) {
            return false;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}
