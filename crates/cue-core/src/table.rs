//! Balls and the table that owns them.

use glam::Vec2;

use crate::api::config::TableConfig;
use crate::api::physics::BallPhysics;
use crate::api::types::BallId;
use crate::pocket::PocketAction;

/// A ball as the aim core sees it. `speed` is copied from the physics
/// collaborator each tick, never computed here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub id: BallId,
    pub center: Vec2,
    pub radius: f32,
    pub is_cue_ball: bool,
    pub speed: f32,
}

impl Ball {
    pub fn new(id: BallId, center: Vec2, radius: f32) -> Self {
        Self {
            id,
            center,
            radius,
            is_cue_ball: false,
            speed: 0.0,
        }
    }

    pub fn cue(center: Vec2, radius: f32) -> Self {
        Self {
            id: BallId::CUE,
            center,
            radius,
            is_cue_ball: true,
            speed: 0.0,
        }
    }
}

/// Triangle rack positions: row `i` sits `2r` further right than row `i-1`,
/// and its `i + 1` balls are stacked `2r` apart, centred on the apex.
pub fn rack_positions(apex: Vec2, radius: f32, rows: u32) -> Vec<Vec2> {
    let rows_us = rows as usize;
    let mut positions = Vec::with_capacity(rows_us * (rows_us + 1) / 2);
    for i in 0..rows {
        let x = apex.x + i as f32 * radius * 2.0;
        let mut y = apex.y - i as f32 * radius;
        for _ in 0..=i {
            positions.push(Vec2::new(x, y));
            y += radius * 2.0;
        }
    }
    positions
}

/// One rack: exactly one cue ball plus the object balls still in play.
///
/// The cue ball is never removed, only repositioned. Object balls leave
/// the table only through a pocket.
#[derive(Debug, Clone)]
pub struct Table {
    balls: Vec<Ball>,
    radius: f32,
}

impl Table {
    /// A table holding only the cue ball.
    pub fn new(cue_center: Vec2, radius: f32) -> Self {
        Self {
            balls: vec![Ball::cue(cue_center, radius)],
            radius,
        }
    }

    /// Cue ball at `cue_start` and the triangle rack at `rack_apex`,
    /// numbered from 1 in row order.
    pub fn rack(config: &TableConfig) -> Self {
        let mut table = Self::new(config.cue_start, config.ball_radius);
        for (i, pos) in rack_positions(config.rack_apex, config.ball_radius, config.rack_rows)
            .into_iter()
            .enumerate()
        {
            table.add_ball(BallId(i as u32 + 1), pos);
        }
        log::info!("Rack built: {} object balls", table.balls.len() - 1);
        table
    }

    /// Add an object ball. Returns `false` if the id is already taken.
    pub fn add_ball(&mut self, id: BallId, center: Vec2) -> bool {
        if self.ball(id).is_some() {
            log::warn!("Ball {:?} already on the table", id);
            return false;
        }
        self.balls.push(Ball::new(id, center, self.radius));
        true
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn cue_ball_id(&self) -> BallId {
        BallId::CUE
    }

    pub fn cue_ball(&self) -> &Ball {
        // Index 0 is the cue ball: it is inserted first and never removed.
        &self.balls[0]
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    /// Every ball except the cue ball.
    pub fn object_balls(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| !b.is_cue_ball)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn speeds(&self) -> impl Iterator<Item = f32> + '_ {
        self.balls.iter().map(|b| b.speed)
    }

    /// Remove an object ball. The cue ball is refused.
    pub fn remove_ball(&mut self, id: BallId) -> Option<Ball> {
        if id == BallId::CUE {
            log::warn!("Refusing to remove the cue ball");
            return None;
        }
        let idx = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.remove(idx))
    }

    /// Put the cue ball back at `position`, stopped.
    pub fn reset_cue_ball(&mut self, position: Vec2) {
        if let Some(cue) = self.ball_mut(BallId::CUE) {
            cue.center = position;
            cue.speed = 0.0;
        }
    }

    pub fn set_ball_center(&mut self, id: BallId, center: Vec2) {
        if let Some(ball) = self.ball_mut(id) {
            ball.center = center;
        }
    }

    pub fn apply_pocket_action(&mut self, action: PocketAction) {
        match action {
            PocketAction::ResetCueBall { position } => self.reset_cue_ball(position),
            PocketAction::Remove { id } => {
                self.remove_ball(id);
            }
        }
    }

    /// Copy positions and speeds from the physics collaborator.
    /// Balls whose bodies vanished keep their last known state.
    pub fn sync_from(&mut self, physics: &impl BallPhysics) {
        for ball in &mut self.balls {
            if let Some(pos) = physics.ball_position(ball.id) {
                ball.center = pos;
            }
            ball.speed = physics.ball_speed(ball.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rack_has_fifteen_balls_and_a_cue() {
        let table = Table::rack(&TableConfig::default());
        assert_eq!(table.len(), 16);
        assert_eq!(table.object_balls().count(), 15);
        assert!(table.cue_ball().is_cue_ball);
        assert_eq!(table.cue_ball().center, Vec2::new(240.0, 190.0));
        assert_eq!(table.balls().filter(|b| b.is_cue_ball).count(), 1);
    }

    #[test]
    fn rack_layout_matches_triangle() {
        let positions = rack_positions(Vec2::new(450.0, 190.0), 9.0, 5);
        assert_eq!(positions.len(), 15);
        assert_eq!(positions[0], Vec2::new(450.0, 190.0));
        // Row 1
        assert_eq!(positions[1], Vec2::new(468.0, 181.0));
        assert_eq!(positions[2], Vec2::new(468.0, 199.0));
        // Last row spans apex.y - 4r .. apex.y + 4r
        assert_eq!(positions[10], Vec2::new(522.0, 154.0));
        assert_eq!(positions[14], Vec2::new(522.0, 226.0));
    }

    #[test]
    fn rack_ids_are_unique() {
        let table = Table::rack(&TableConfig::default());
        let mut ids: Vec<u32> = table.balls().map(|b| b.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(ids[0], 0);
        assert_eq!(ids[15], 15);
    }

    #[test]
    fn duplicate_id_is_refused() {
        let mut table = Table::new(Vec2::ZERO, 9.0);
        assert!(table.add_ball(BallId(1), Vec2::new(50.0, 0.0)));
        assert!(!table.add_ball(BallId(1), Vec2::new(80.0, 0.0)));
        assert!(!table.add_ball(BallId::CUE, Vec2::new(80.0, 0.0)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn cue_ball_is_never_removed() {
        let mut table = Table::rack(&TableConfig::default());
        assert!(table.remove_ball(BallId::CUE).is_none());
        assert_eq!(table.len(), 16);

        let removed = table.remove_ball(BallId(7)).expect("ball 7 is racked");
        assert_eq!(removed.id, BallId(7));
        assert!(table.ball(BallId(7)).is_none());
        assert!(table.remove_ball(BallId(7)).is_none());
        assert!(table.cue_ball().is_cue_ball);
    }

    #[test]
    fn pocket_actions_apply() {
        let mut table = Table::rack(&TableConfig::default());
        table.set_ball_center(BallId::CUE, Vec2::new(10.0, 10.0));
        table.apply_pocket_action(PocketAction::ResetCueBall {
            position: Vec2::new(240.0, 190.0),
        });
        assert_eq!(table.cue_ball().center, Vec2::new(240.0, 190.0));
        assert_eq!(table.cue_ball().speed, 0.0);

        table.apply_pocket_action(PocketAction::Remove { id: BallId(3) });
        assert!(table.ball(BallId(3)).is_none());
        assert_eq!(table.len(), 15);
    }
}
