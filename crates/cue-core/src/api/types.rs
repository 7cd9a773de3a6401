use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::geometry::Segment;

/// Unique identifier for a ball on the table. The cue ball is `BallId::CUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl BallId {
    pub const CUE: BallId = BallId(0);
}

/// Index of a pocket in the table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PocketId(pub u32);

/// A shot derived from one drag release: direction in radians and
/// speed in world units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotIntent {
    pub angle: f32,
    pub speed: f32,
}

impl ShotIntent {
    /// Velocity to hand to the physics collaborator, in units per tick.
    pub fn velocity(&self) -> Vec2 {
        Vec2::from_angle(self.angle) * self.speed
    }
}

/// Aim prediction for one pointer position.
/// Recomputed on every pointer move and discarded after the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimState {
    /// Aim ray from the cue ball centre out to the fixed reach.
    pub ray: Segment,
    /// Aim direction in radians.
    pub angle: f32,
    pub target: Option<BallId>,
    /// Where the cue ball would sit when it first touches `target`.
    pub contact_point: Option<Vec2>,
}

impl AimState {
    /// Where the aim line should visually stop: the ghost ball position if a
    /// target was found, otherwise the end of the ray.
    pub fn line_end(&self) -> Vec2 {
        self.contact_point.unwrap_or(self.ray.p2)
    }
}

/// A ball touched a pocket during the last physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PocketContact {
    pub ball: BallId,
    pub pocket: PocketId,
}
