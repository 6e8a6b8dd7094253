use glam::{Vec2, Vec3};

/// Apply a per-axis dead zone to a scalar input.
/// Values inside the zone collapse to zero; values outside are shifted toward
/// zero by the zone width so the response starts at 0 on the zone edge.
pub fn apply_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if value.abs() <= dead_zone {
        0.0
    } else {
        value - dead_zone.copysign(value)
    }
}

/// Per-axis dead zone for a 2D offset.
pub fn apply_dead_zone_2d(offset: Vec2, dead_zone: f32) -> Vec2 {
    Vec2::new(
        apply_dead_zone(offset.x, dead_zone),
        apply_dead_zone(offset.y, dead_zone),
    )
}

/// Exponential easing step: move `current` toward `target` by `factor` of the gap.
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Horizontal forward direction for a yaw angle (yaw 0 looks down -Z).
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Forward and right unit vectors of `forward` projected onto the XZ plane.
///
/// Falls back to `yaw_forward(fallback_yaw)` when the projection degenerates
/// (camera looking straight up or down).
pub fn horizontal_basis(forward: Vec3, fallback_yaw: f32) -> (Vec3, Vec3) {
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    let flat = if flat.length_squared() > 1e-8 {
        flat.normalize()
    } else {
        yaw_forward(fallback_yaw)
    };
    let right = flat.cross(Vec3::Y).normalize();
    (flat, right)
}

/// Project `point` back onto the sphere of `radius` around `center` when it lies outside.
/// Returns `None` when the point is already inside (or on) the sphere.
pub fn clamp_to_sphere(point: Vec3, center: Vec3, radius: f32) -> Option<Vec3> {
    let offset = point - center;
    let dist_sq = offset.length_squared();
    if dist_sq <= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    Some(center + offset * (radius / dist))
}
