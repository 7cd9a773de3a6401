use glam::Vec2;

use crate::aim::target::TargetHit;

/// Distance along the aim line from the cue ball centre to where the cue
/// ball first touches the target.
///
/// With `a` the distance from the cue ball to the target's projection on the
/// line, and `c` the distance from first contact to that projection:
/// `a = sqrt(cue_dist² - perp²)`, `c = sqrt((2r)² - perp²)`, result `a - c`.
///
/// Returns `None` when the target cannot be touched from this line
/// (`perp >= 2r`). A target already touching the cue ball gives 0.
pub fn contact_distance(hit: &TargetHit, radius: f32) -> Option<f32> {
    let strike = radius * 2.0;
    let chord_sq = strike * strike - hit.perp_dist * hit.perp_dist;
    if !(chord_sq >= 0.0) {
        log::warn!(
            "No contact for {:?}: perpendicular offset {} exceeds {}",
            hit.ball,
            hit.perp_dist,
            strike
        );
        return None;
    }
    // perp_dist is a leg of the triangle with hypotenuse cue_dist; any
    // negative here is rounding.
    let along = (hit.cue_dist * hit.cue_dist - hit.perp_dist * hit.perp_dist)
        .max(0.0)
        .sqrt();
    let chord = chord_sq.sqrt();
    Some((along - chord).max(0.0))
}

/// Ghost-ball position: where the cue ball centre sits at first contact.
pub fn solve_contact(hit: &TargetHit, angle: f32, cue_center: Vec2, radius: f32) -> Option<Vec2> {
    let dist = contact_distance(hit, radius)?;
    Some(cue_center + Vec2::from_angle(angle) * dist)
}
