//! Narrow-phase intersection tests
//!
//! Pure pairwise tests between the two collider shapes. Every test returns
//! `Some(Contact)` when the shapes overlap, with the contact normal pointing
//! from the second argument towards the first.
//!
//! Axis choice is deterministic: the axis with the strictly smaller
//! penetration wins and equal depths resolve to whichever axis is evaluated
//! first (x before y).

use super::primitives::{Contact, LineSegment};
use super::shape::{BoxShape, CircleShape, ColliderShape};
use crate::foundation::math::{safe_normalize, utils::clamp, Vec2};

/// Dispatch on the shape pair and run the matching test
pub fn intersect(a: &ColliderShape, b: &ColliderShape) -> Option<Contact> {
    match (a, b) {
        (ColliderShape::Box(a), ColliderShape::Box(b)) => box_box(a, b),
        (ColliderShape::Circle(a), ColliderShape::Circle(b)) => circle_circle(a, b),
        (ColliderShape::Circle(a), ColliderShape::Box(b)) => circle_box(a, b),
        (ColliderShape::Box(a), ColliderShape::Circle(b)) => box_circle(a, b),
    }
}

/// Box versus box using the minimum translation axis
pub fn box_box(a: &BoxShape, b: &BoxShape) -> Option<Contact> {
    // Boxes that only share an edge do not collide, matching circle_circle
    if a.max.x <= b.min.x || a.min.x >= b.max.x || a.max.y <= b.min.y || a.min.y >= b.max.y {
        return None;
    }

    let delta = a.center - b.center;
    if delta == Vec2::zeros() {
        // Coincident centers: separate vertically by half the height
        return Some(Contact::new(Vec2::y(), a.center, a.half_extents().y));
    }

    let intersection_point = Vec2::new(
        clamp(a.center.x, b.min.x, b.max.x),
        clamp(a.center.y, b.min.y, b.max.y),
    );
    let overlap = Vec2::new(
        a.max.x.min(b.max.x) - a.min.x.max(b.min.x),
        a.max.y.min(b.max.y) - a.min.y.max(b.min.y),
    );

    let contact = if overlap.x <= overlap.y {
        (delta.x != 0.0).then(|| Contact::new(Vec2::new(delta.x.signum(), 0.0), intersection_point, overlap.x))
    } else {
        (delta.y != 0.0).then(|| Contact::new(Vec2::new(0.0, delta.y.signum()), intersection_point, overlap.y))
    };

    Some(contact.unwrap_or_else(|| box_edge_contact(a, b, delta, intersection_point)))
}

/// Fallback for a box whose center offset is zero along the chosen axis
///
/// Classifies which edge of `b` the intersection point sits on by exact
/// comparison and pushes `a` out through it by its own half-extent. A point on
/// no edge falls back to the axis where `delta` is non-zero.
fn box_edge_contact(a: &BoxShape, b: &BoxShape, delta: Vec2, point: Vec2) -> Contact {
    let half = a.half_extents();
    if point.x == b.min.x {
        Contact::new(Vec2::new(-1.0, 0.0), point, half.x)
    } else if point.x == b.max.x {
        Contact::new(Vec2::new(1.0, 0.0), point, half.x)
    } else if point.y == b.max.y {
        Contact::new(Vec2::new(0.0, 1.0), point, half.y)
    } else if point.y == b.min.y {
        Contact::new(Vec2::new(0.0, -1.0), point, half.y)
    } else if delta.x == 0.0 {
        Contact::new(Vec2::new(0.0, delta.y.signum()), point, half.y)
    } else {
        Contact::new(Vec2::new(delta.x.signum(), 0.0), point, half.x)
    }
}

/// Circle versus circle
pub fn circle_circle(a: &CircleShape, b: &CircleShape) -> Option<Contact> {
    let delta = a.center - b.center;
    let radii = a.radius + b.radius;
    let distance_squared = delta.magnitude_squared();
    if distance_squared >= radii * radii {
        return None;
    }

    match safe_normalize(delta) {
        Some(normal) => {
            let distance = distance_squared.sqrt();
            Some(Contact::new(normal, b.center + normal * b.radius, radii - distance))
        }
        // Identical centers: separate vertically by the first radius
        None => Some(Contact::new(Vec2::y(), a.center, a.radius)),
    }
}

/// Box versus circle; the circle-versus-box test with the arguments swapped
pub fn box_circle(aabb: &BoxShape, circle: &CircleShape) -> Option<Contact> {
    circle_box(circle, aabb).map(|contact| contact.flipped())
}

/// Circle versus box
///
/// A circle whose center lies outside the box on an axis is tested against
/// the nearest box edge on that axis. Both axes must report touching, which
/// rejects circles that sit diagonally off a corner.
pub fn circle_box(circle: &CircleShape, aabb: &BoxShape) -> Option<Contact> {
    let center = circle.center;
    let inside_x = center.x >= aabb.min.x && center.x <= aabb.max.x;
    let inside_y = center.y >= aabb.min.y && center.y <= aabb.max.y;

    if inside_x && inside_y {
        return Some(contained_circle_contact(circle, aabb));
    }

    let mut touching = 0;
    let mut best: Option<Contact> = None;

    if inside_x {
        touching += 1;
    } else {
        let edge_x = if center.x < aabb.min.x { aabb.min.x } else { aabb.max.x };
        let edge = LineSegment::new(Vec2::new(edge_x, aabb.min.y), Vec2::new(edge_x, aabb.max.y));
        if let Some(contact) = circle_segment(circle, &edge) {
            touching += 1;
            best = Some(shallower(best, contact));
        }
    }

    if inside_y {
        touching += 1;
    } else {
        let edge_y = if center.y < aabb.min.y { aabb.min.y } else { aabb.max.y };
        let edge = LineSegment::new(Vec2::new(aabb.min.x, edge_y), Vec2::new(aabb.max.x, edge_y));
        if let Some(contact) = circle_segment(circle, &edge) {
            touching += 1;
            best = Some(shallower(best, contact));
        }
    }

    if touching < 2 {
        return None;
    }
    best
}

/// Keep the current contact unless the candidate is strictly shallower
fn shallower(current: Option<Contact>, candidate: Contact) -> Contact {
    match current {
        Some(current) if current.penetration_depth <= candidate.penetration_depth => current,
        _ => candidate,
    }
}

/// Circle whose center is inside the box: push out through the nearest face
fn contained_circle_contact(circle: &CircleShape, aabb: &BoxShape) -> Contact {
    let center = circle.center;
    let faces = [
        (center.x - aabb.min.x, Vec2::new(-1.0, 0.0), Vec2::new(aabb.min.x, center.y)),
        (aabb.max.x - center.x, Vec2::new(1.0, 0.0), Vec2::new(aabb.max.x, center.y)),
        (center.y - aabb.min.y, Vec2::new(0.0, -1.0), Vec2::new(center.x, aabb.min.y)),
        (aabb.max.y - center.y, Vec2::new(0.0, 1.0), Vec2::new(center.x, aabb.max.y)),
    ];

    let mut nearest = faces[0];
    for face in &faces[1..] {
        if face.0 < nearest.0 {
            nearest = *face;
        }
    }

    let (distance, normal, point) = nearest;
    Contact::new(normal, point, distance + circle.radius)
}

/// Circle versus line segment; the normal points from the segment to the circle
fn circle_segment(circle: &CircleShape, segment: &LineSegment) -> Option<Contact> {
    let center = circle.center;
    let distance = segment.signed_distance(center);
    if distance.abs() > circle.radius {
        return None;
    }

    match segment.projection(center) {
        Some(t) if (0.0..=1.0).contains(&t) => {
            let normal = if distance < 0.0 { -segment.normal } else { segment.normal };
            Some(Contact::new(
                normal,
                center - normal * distance.abs(),
                circle.radius - distance.abs(),
            ))
        }
        _ => {
            let fallback = if distance < 0.0 { -segment.normal } else { segment.normal };
            [segment.point0, segment.point1]
                .into_iter()
                .filter_map(|point| circle_point(circle, point, fallback))
                .reduce(|deepest, contact| {
                    if contact.penetration_depth > deepest.penetration_depth { contact } else { deepest }
                })
        }
    }
}

/// Circle versus a single point
fn circle_point(circle: &CircleShape, point: Vec2, fallback_normal: Vec2) -> Option<Contact> {
    let delta = circle.center - point;
    let distance_squared = delta.magnitude_squared();
    if distance_squared > circle.radius * circle.radius {
        return None;
    }

    let normal = safe_normalize(delta).unwrap_or(fallback_normal);
    Some(Contact::new(normal, point, circle.radius - distance_squared.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn aabb(x: f32, y: f32, w: f32, h: f32) -> BoxShape {
        BoxShape::from_center_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    fn circle(x: f32, y: f32, r: f32) -> CircleShape {
        CircleShape::from_center_radius(Vec2::new(x, y), r)
    }

    #[test]
    fn test_box_box_separated() {
        assert!(box_box(&aabb(0.0, 0.0, 2.0, 2.0), &aabb(3.0, 0.0, 2.0, 2.0)).is_none());
        assert!(box_box(&aabb(0.0, 0.0, 2.0, 2.0), &aabb(0.0, -2.5, 2.0, 2.0)).is_none());
    }

    #[test]
    fn test_box_box_picks_smaller_penetration_axis() {
        let a = aabb(0.0, 0.0, 2.0, 2.0);
        let b = aabb(1.0, 0.1, 2.0, 2.0);

        let contact = box_box(&a, &b).unwrap();

        // x overlap 1.0 is smaller than y overlap 1.9
        assert_relative_eq!(contact.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 1.0, epsilon = EPSILON);
        assert_relative_eq!(contact.intersection_point, Vec2::new(0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_box_box_vertical_axis() {
        let a = aabb(0.2, 1.5, 2.0, 2.0);
        let b = aabb(0.0, 0.0, 2.0, 2.0);

        let contact = box_box(&a, &b).unwrap();

        assert_relative_eq!(contact.normal, Vec2::new(0.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_box_box_equal_depths_prefer_x() {
        let a = aabb(1.0, 1.0, 2.0, 2.0);
        let b = aabb(0.0, 0.0, 2.0, 2.0);

        let contact = box_box(&a, &b).unwrap();

        assert_relative_eq!(contact.normal, Vec2::new(1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_box_box_coincident_centers() {
        let contact = box_box(&aabb(0.0, 0.0, 2.0, 4.0), &aabb(0.0, 0.0, 6.0, 6.0)).unwrap();

        assert_eq!(contact.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(contact.penetration_depth, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_box_box_edge_fallback() {
        // Same x center and x overlap (1) below y overlap (2): x is chosen but has no sign
        let a = aabb(0.0, 3.0, 1.0, 6.0);
        let b = aabb(0.0, 0.0, 4.0, 4.0);

        let contact = box_box(&a, &b).unwrap();

        // A's center clamps onto B's top edge, depth is A's half-height
        assert_eq!(contact.intersection_point, Vec2::new(0.0, 2.0));
        assert_eq!(contact.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(contact.penetration_depth, 3.0, epsilon = EPSILON);
    }

    #[test]
    fn test_box_box_edge_fallback_inside_keeps_opposite_normals() {
        // A's center clamps to a point strictly inside B in both orders
        let a = aabb(0.0, 0.5, 1.0, 10.0);
        let b = aabb(0.0, 0.0, 4.0, 4.0);

        let ab = box_box(&a, &b).unwrap();
        let ba = box_box(&b, &a).unwrap();

        assert_eq!(ab.normal, Vec2::new(0.0, 1.0));
        assert_eq!(ba.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(ab.penetration_depth, 5.0, epsilon = EPSILON);
        assert_relative_eq!(ba.penetration_depth, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_box_box_edge_fallback_on_horizontal_axis() {
        // Same y center with y chosen: the fallback pushes along x instead
        let a = aabb(0.1, 0.0, 10.0, 1.0);
        let b = aabb(0.0, 0.0, 12.0, 1.5);

        let ab = box_box(&a, &b).unwrap();
        let ba = box_box(&b, &a).unwrap();

        assert_eq!(ab.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(ab.normal, -ba.normal, epsilon = EPSILON);
    }

    #[test]
    fn test_box_box_touching_edges_is_not_collision() {
        let a = aabb(0.0, 0.0, 2.0, 2.0);

        assert!(box_box(&a, &aabb(2.0, 0.0, 2.0, 2.0)).is_none());
        assert!(box_box(&a, &aabb(0.5, -2.0, 2.0, 2.0)).is_none());
        assert!(box_box(&aabb(2.0, 2.0, 2.0, 2.0), &a).is_none());
    }

    #[test]
    fn test_box_box_symmetry() {
        let a = aabb(0.3, -0.4, 2.0, 3.0);
        let b = aabb(1.2, 0.5, 1.5, 2.5);

        let ab = box_box(&a, &b).unwrap();
        let ba = box_box(&b, &a).unwrap();

        assert_relative_eq!(ab.normal, -ba.normal, epsilon = EPSILON);
        assert_relative_eq!(ab.penetration_depth, ba.penetration_depth, epsilon = EPSILON);
    }

    #[test]
    fn test_circle_circle_overlap() {
        let contact = circle_circle(&circle(1.5, 0.0, 1.0), &circle(0.0, 0.0, 1.0)).unwrap();

        assert_relative_eq!(contact.normal, Vec2::new(1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = EPSILON);
        assert_relative_eq!(contact.intersection_point, Vec2::new(1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_circle_circle_touching_is_not_collision() {
        assert!(circle_circle(&circle(2.0, 0.0, 1.0), &circle(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_circle_circle_identical_centers() {
        let contact = circle_circle(&circle(0.0, 0.0, 1.0), &circle(0.0, 0.0, 1.0)).unwrap();

        assert_eq!(contact.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(contact.penetration_depth, 1.0);
    }

    #[test]
    fn test_circle_circle_symmetry() {
        let a = circle(0.4, 0.3, 1.0);
        let b = circle(-0.5, 0.9, 0.75);

        let ab = circle_circle(&a, &b).unwrap();
        let ba = circle_circle(&b, &a).unwrap();

        assert_relative_eq!(ab.normal, -ba.normal, epsilon = EPSILON);
        assert_relative_eq!(ab.penetration_depth, ba.penetration_depth, epsilon = EPSILON);
    }

    #[test]
    fn test_circle_box_side_contact() {
        let contact = circle_box(&circle(-1.5, 0.0, 1.0), &aabb(0.0, 0.0, 2.0, 2.0)).unwrap();

        assert_relative_eq!(contact.normal, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = EPSILON);
        assert_relative_eq!(contact.intersection_point, Vec2::new(-1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_circle_box_top_contact() {
        let contact = circle_box(&circle(0.5, 1.75, 1.0), &aabb(0.0, 0.0, 2.0, 2.0)).unwrap();

        assert_relative_eq!(contact.normal, Vec2::new(0.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 0.25, epsilon = EPSILON);
    }

    #[test]
    fn test_circle_box_corner_miss() {
        // Inside both slab extents grown by the radius, but beyond the corner
        let c = circle(1.8, 1.8, 1.0);

        assert!(circle_box(&c, &aabb(0.0, 0.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn test_circle_box_corner_hit() {
        let contact = circle_box(&circle(1.5, 1.5, 1.0), &aabb(0.0, 0.0, 2.0, 2.0)).unwrap();

        let diagonal = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(contact.normal, Vec2::new(diagonal, diagonal), epsilon = EPSILON);
        assert_relative_eq!(contact.intersection_point, Vec2::new(1.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 1.0 - 0.5_f32.sqrt(), epsilon = EPSILON);
    }

    #[test]
    fn test_circle_inside_box() {
        let contact = circle_box(&circle(0.8, 0.0, 0.5), &aabb(0.0, 0.0, 2.0, 2.0)).unwrap();

        assert_relative_eq!(contact.normal, Vec2::new(1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(contact.penetration_depth, 0.7, epsilon = EPSILON);
        assert_relative_eq!(contact.intersection_point, Vec2::new(1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_circle_box_far_away() {
        assert!(circle_box(&circle(10.0, 0.0, 1.0), &aabb(0.0, 0.0, 2.0, 2.0)).is_none());
        assert!(circle_box(&circle(0.0, -3.5, 1.0), &aabb(0.0, 0.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn test_box_circle_is_flipped_circle_box() {
        let c = circle(-1.5, 0.3, 1.0);
        let b = aabb(0.0, 0.0, 2.0, 2.0);

        let circle_first = circle_box(&c, &b).unwrap();
        let box_first = box_circle(&b, &c).unwrap();

        assert_relative_eq!(circle_first.normal, -box_first.normal, epsilon = EPSILON);
        assert_relative_eq!(circle_first.penetration_depth, box_first.penetration_depth, epsilon = EPSILON);
    }

    #[test]
    fn test_intersect_dispatch_agrees_in_both_orders() {
        let shapes = [
            ColliderShape::Box(aabb(0.0, 0.0, 2.0, 2.0)),
            ColliderShape::Box(aabb(1.4, 0.6, 1.0, 3.0)),
            ColliderShape::Circle(circle(-1.2, 0.4, 0.5)),
            ColliderShape::Circle(circle(0.9, 1.7, 0.6)),
            ColliderShape::Circle(circle(8.0, 8.0, 1.0)),
        ];

        for (i, a) in shapes.iter().enumerate() {
            for b in shapes.iter().skip(i + 1) {
                let ab = intersect(a, b);
                let ba = intersect(b, a);
                assert_eq!(ab.is_some(), ba.is_some());
                if let (Some(ab), Some(ba)) = (ab, ba) {
                    assert_relative_eq!(ab.normal, -ba.normal, epsilon = EPSILON);
                }
            }
        }
    }
}
