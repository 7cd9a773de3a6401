use std::cmp::Ordering;

use crate::api::types::BallId;
use crate::core::geometry::{distance, is_point_on_segment, nearest_point_on_segment, Segment};
use crate::table::Ball;

/// The ball the aim ray would strike first, with the two distances the
/// contact solver needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetHit {
    pub ball: BallId,
    /// Distance from the target centre to the aim line.
    pub perp_dist: f32,
    /// Distance between the cue ball and target centres.
    pub cue_dist: f32,
}

/// Pick the ball the cue ball would strike travelling along `ray`.
///
/// A candidate is eligible when its centre is strictly closer than `2r` to
/// the aim line and its projection falls inside the ray. The eligible ball
/// nearest the cue ball wins; equal distances go to the lowest id.
/// The cue ball itself is skipped if present in `candidates`.
pub fn acquire_target<'a>(
    ray: &Segment,
    cue_ball: &Ball,
    candidates: impl IntoIterator<Item = &'a Ball>,
    radius: f32,
) -> Option<TargetHit> {
    let strike_dist = radius * 2.0;

    candidates
        .into_iter()
        .filter(|ball| !ball.is_cue_ball && ball.id != cue_ball.id)
        .filter_map(|ball| {
            let nearest = nearest_point_on_segment(ray, ball.center);
            let perp_dist = distance(nearest, ball.center);
            if perp_dist < strike_dist && is_point_on_segment(nearest, ray) {
                Some(TargetHit {
                    ball: ball.id,
                    perp_dist,
                    cue_dist: distance(ball.center, cue_ball.center),
                })
            } else {
                None
            }
        })
        .min_by(|a, b| match a.cue_dist.total_cmp(&b.cue_dist) {
            Ordering::Equal => a.ball.cmp(&b.ball),
            other => other,
        })
}
