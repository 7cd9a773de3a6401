//! Drag gesture to cue ball launch.

use glam::Vec2;

use crate::api::types::ShotIntent;
use crate::core::geometry::Segment;

/// Resolve a drag into a shot.
///
/// The direction is the aim angle frozen when the drag began, not the drag
/// direction: the player pulls the cue back and the ball travels forward along
/// the aim line. Speed is the drag length times `speed_scale`.
/// A zero-length drag gives a zero-speed shot.
pub fn resolve_shot(press: Vec2, release: Vec2, aim_angle: f32, speed_scale: f32) -> ShotIntent {
    let drag = Segment::new(press, release);
    ShotIntent {
        angle: aim_angle,
        speed: drag.length() * speed_scale,
    }
}
