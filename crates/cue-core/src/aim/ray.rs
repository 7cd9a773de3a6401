use glam::Vec2;

use crate::core::geometry::{angle_of, Segment};

/// Aim ray anchored at the cue ball, pointing at `pointer`, `reach` long.
///
/// When the pointer sits exactly on the cue ball centre the direction falls
/// back to angle 0 (+X).
pub fn build_aim_ray(cue_center: Vec2, pointer: Vec2, reach: f32) -> Segment {
    let angle = angle_of(&Segment::new(cue_center, pointer));
    Segment::new(cue_center, cue_center + Vec2::from_angle(angle) * reach)
}
