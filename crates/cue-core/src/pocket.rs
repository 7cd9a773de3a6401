//! What happens to a ball that drops into a pocket.

use glam::Vec2;

use crate::api::types::BallId;
use crate::table::Ball;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PocketAction {
    /// Put the cue ball back on its rack-start spot with zero velocity.
    ResetCueBall { position: Vec2 },
    /// Take an object ball off the table.
    Remove { id: BallId },
}

/// Decide the response to a pocket touch. Pure: depends only on the ball.
pub fn decide_pocket_action(ball: &Ball, cue_start: Vec2) -> PocketAction {
    if ball.is_cue_ball {
        PocketAction::ResetCueBall { position: cue_start }
    } else {
        PocketAction::Remove { id: ball.id }
    }
}
