//! Aim prediction: ray, target, contact point.

pub mod contact;
pub mod ray;
pub mod target;

use glam::Vec2;

use crate::api::types::AimState;
use crate::core::geometry::{angle_of, Segment};
use crate::table::Table;

use self::contact::solve_contact;
use self::ray::build_aim_ray;
use self::target::acquire_target;

/// Full aim prediction for a pointer position: ray, first target, ghost ball.
///
/// A pointer sitting on the cue ball centre gives a zero-angle ray with no
/// target.
pub fn compute_aim(table: &Table, pointer: Vec2, reach: f32) -> AimState {
    let cue = table.cue_ball();
    let aim_line = Segment::new(cue.center, pointer);
    let angle = angle_of(&aim_line);
    let ray = build_aim_ray(cue.center, pointer, reach);

    if aim_line.is_degenerate() {
        return AimState { ray, angle, target: None, contact_point: None };
    }

    let radius = table.radius();
    let (target, contact_point) = match acquire_target(&ray, cue, table.object_balls(), radius) {
        Some(hit) => match solve_contact(&hit, angle, cue.center, radius) {
            Some(point) => (Some(hit.ball), Some(point)),
            None => (None, None),
        },
        None => (None, None),
    };

    AimState { ray, angle, target, contact_point }
}
