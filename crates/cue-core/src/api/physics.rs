use glam::Vec2;

use crate::api::types::{BallId, PocketContact};

/// What the aim core needs from the rigid-body integrator.
///
/// The core only queries positions and speeds and issues commands; it never
/// integrates motion itself. Speeds and velocities are in units per tick.
pub trait BallPhysics {
    /// Current centre of a ball, or `None` if the body no longer exists.
    fn ball_position(&self, id: BallId) -> Option<Vec2>;

    /// Current speed of a ball. 0 for unknown ids.
    fn ball_speed(&self, id: BallId) -> f32;

    fn set_ball_velocity(&mut self, id: BallId, velocity: Vec2);

    /// Move a ball without sweeping it through the world.
    fn teleport_ball(&mut self, id: BallId, position: Vec2);

    fn remove_ball(&mut self, id: BallId);

    /// Pocket touches reported by the last step. Draining clears them.
    fn drain_pocket_contacts(&mut self) -> Vec<PocketContact>;
}
