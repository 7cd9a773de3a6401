//! Aiming state machine.
//!
//! ```text
//! AtRest --down--> Aiming --up--> ShotFired --tick(moving)--> Moving --tick(rest)--> AtRest
//!                                     \--tick(rest)--> AtRest
//! ```
//! Pointer input outside `AtRest`/`Aiming` is ignored.

use glam::Vec2;

use crate::aim::compute_aim;
use crate::api::config::TableConfig;
use crate::api::types::{AimState, BallId, ShotIntent};
use crate::rest::RestDetector;
use crate::shot::resolve_shot;
use crate::table::Table;

/// One press-drag-release gesture. Owned by the `Aiming` phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSession {
    press: Vec2,
    current: Vec2,
    aim: AimState,
}

impl AimSession {
    fn begin(press: Vec2, aim: AimState) -> Self {
        Self { press, current: press, aim }
    }

    pub fn press(&self) -> Vec2 {
        self.press
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Aim frozen at pointer-down.
    pub fn aim(&self) -> &AimState {
        &self.aim
    }

    /// How far the cue has been drawn back.
    pub fn pull(&self) -> f32 {
        self.press.distance(self.current)
    }

    /// Cue tip position: behind the cue ball, opposite the aim direction.
    pub fn cue_tip(&self, cue_center: Vec2, offset: f32) -> Vec2 {
        cue_tip(cue_center, self.aim.angle, offset + self.pull())
    }
}

fn forget_target(aim: &mut AimState, id: BallId) {
    if aim.target == Some(id) {
        log::debug!("Aim target {:?} left the table", id);
        aim.target = None;
        aim.contact_point = None;
    }
}

fn cue_tip(cue_center: Vec2, angle: f32, back: f32) -> Vec2 {
    cue_center - Vec2::from_angle(angle) * back
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotPhase {
    AtRest,
    Aiming(AimSession),
    /// Velocity applied, waiting for the first tick to observe motion.
    ShotFired,
    Moving,
}

/// Owns the phase, the hover aim and the rest detector.
pub struct ShotController {
    phase: ShotPhase,
    hover: Option<AimState>,
    rest: RestDetector,
    aim_reach: f32,
    speed_scale: f32,
    cue_stick_offset: f32,
}

impl ShotController {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            phase: ShotPhase::AtRest,
            hover: None,
            rest: RestDetector::new(config.rest_threshold, config.settle_ticks),
            aim_reach: config.aim_reach,
            speed_scale: config.speed_scale,
            cue_stick_offset: config.cue_stick_offset,
        }
    }

    pub fn phase(&self) -> &ShotPhase {
        &self.phase
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.phase, ShotPhase::ShotFired | ShotPhase::Moving)
    }

    /// Current aim for the renderer: the frozen aim while dragging, the
    /// hover aim while at rest, nothing while balls move.
    pub fn aim_state(&self) -> Option<&AimState> {
        match &self.phase {
            ShotPhase::Aiming(session) => Some(session.aim()),
            ShotPhase::AtRest => self.hover.as_ref(),
            ShotPhase::ShotFired | ShotPhase::Moving => None,
        }
    }

    pub fn session(&self) -> Option<&AimSession> {
        match &self.phase {
            ShotPhase::Aiming(session) => Some(session),
            _ => None,
        }
    }

    /// Cue tip position for the renderer, if the cue is shown.
    pub fn cue_tip(&self, table: &Table) -> Option<Vec2> {
        let center = table.cue_ball().center;
        match &self.phase {
            ShotPhase::Aiming(session) => Some(session.cue_tip(center, self.cue_stick_offset)),
            ShotPhase::AtRest => self
                .hover
                .as_ref()
                .map(|aim| cue_tip(center, aim.angle, self.cue_stick_offset)),
            ShotPhase::ShotFired | ShotPhase::Moving => None,
        }
    }

    /// Start a drag. Ignored unless the table is at rest.
    /// Returns whether the press was accepted.
    pub fn pointer_down(&mut self, table: &Table, pos: Vec2) -> bool {
        if self.phase != ShotPhase::AtRest {
            log::debug!("Pointer down ignored while {:?}", self.phase);
            return false;
        }
        let aim = match self.hover.take() {
            Some(aim) if aim.target.map_or(true, |id| table.ball(id).is_some()) => aim,
            _ => compute_aim(table, pos, self.aim_reach),
        };
        self.phase = ShotPhase::Aiming(AimSession::begin(pos, aim));
        true
    }

    /// Hovering recomputes the aim; dragging only updates the pull.
    pub fn pointer_move(&mut self, table: &Table, pos: Vec2) -> Option<&AimState> {
        match &mut self.phase {
            ShotPhase::AtRest => {
                let aim = compute_aim(table, pos, self.aim_reach);
                let previous = self.hover.and_then(|h| h.target);
                if previous != aim.target {
                    log::debug!("Aim target {:?} -> {:?}", previous, aim.target);
                }
                self.hover = Some(aim);
                self.hover.as_ref()
            }
            ShotPhase::Aiming(session) => {
                session.current = pos;
                Some(session.aim())
            }
            ShotPhase::ShotFired | ShotPhase::Moving => None,
        }
    }

    /// Release the drag at `pos`. Without a preceding accepted press this is a no-op.
    pub fn pointer_up(&mut self, pos: Vec2) -> Option<ShotIntent> {
        let session = match self.phase {
            ShotPhase::Aiming(session) => session,
            _ => return None,
        };
        let shot = resolve_shot(session.press, pos, session.aim.angle, self.speed_scale);
        log::info!("Shot fired: angle={:.3} speed={:.3}", shot.angle, shot.speed);
        self.phase = ShotPhase::ShotFired;
        self.hover = None;
        self.rest.mark_moving();
        Some(shot)
    }

    /// Drop `id` from the hover and frozen aims after it left the table.
    pub fn forget_ball(&mut self, id: BallId) {
        if let Some(hover) = self.hover.as_mut() {
            forget_target(hover, id);
        }
        if let ShotPhase::Aiming(session) = &mut self.phase {
            forget_target(&mut session.aim, id);
        }
    }

    /// Feed one tick of ball speeds. Returns the "in motion" flag.
    pub fn tick(&mut self, speeds: impl IntoIterator<Item = f32>) -> bool {
        let moving = self.rest.update(speeds);
        self.phase = match self.phase {
            ShotPhase::ShotFired | ShotPhase::Moving if moving => ShotPhase::Moving,
            ShotPhase::ShotFired | ShotPhase::Moving => {
                log::info!("Table at rest");
                ShotPhase::AtRest
            }
            ShotPhase::AtRest if moving => {
                self.hover = None;
                ShotPhase::Moving
            }
            other => other,
        };
        moving
    }

    /// Drop any gesture and return to rest, e.g. on rack restart.
    pub fn reset(&mut self) {
        self.phase = ShotPhase::AtRest;
        self.hover = None;
        self.rest = RestDetector::new(self.rest.threshold(), self.rest.settle_ticks());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ShotController, Table) {
        let config = TableConfig::default();
        (ShotController::new(&config), Table::rack(&config))
    }

    #[test]
    fn hover_computes_aim_at_rest() {
        let (mut ctl, table) = setup();
        let aim = ctl.pointer_move(&table, Vec2::new(300.0, 190.0)).copied().expect("aim");
        assert_eq!(aim.target, Some(BallId(1)));
        assert_eq!(ctl.aim_state(), Some(&aim));
        let tip = ctl.cue_tip(&table).expect("cue shown");
        assert!((tip - Vec2::new(220.0, 190.0)).length() < 1e-3);
    }

    #[test]
    fn drag_freezes_aim_and_pulls_cue() {
        let (mut ctl, table) = setup();
        ctl.pointer_move(&table, Vec2::new(300.0, 190.0));
        assert!(ctl.pointer_down(&table, Vec2::new(300.0, 190.0)));

        // Dragging elsewhere does not change the aim.
        let aim = ctl.pointer_move(&table, Vec2::new(260.0, 250.0)).copied().expect("aim");
        assert_eq!(aim.target, Some(BallId(1)));
        assert!(aim.angle.abs() < 1e-6);

        let session = ctl.session().expect("aiming");
        assert!((session.pull() - (40.0f32 * 40.0 + 60.0 * 60.0).sqrt()).abs() < 1e-3);
        let tip = ctl.cue_tip(&table).expect("cue shown");
        assert!((tip.x - (240.0 - 20.0 - session.pull())).abs() < 1e-3);
    }

    #[test]
    fn release_fires_along_frozen_aim() {
        let (mut ctl, table) = setup();
        ctl.pointer_move(&table, Vec2::new(300.0, 190.0));
        ctl.pointer_down(&table, Vec2::new(300.0, 190.0));
        let shot = ctl.pointer_up(Vec2::new(250.0, 190.0)).expect("shot");
        assert!(shot.angle.abs() < 1e-6);
        assert!((shot.speed - 5.0).abs() < 1e-4);
        assert_eq!(ctl.phase(), &ShotPhase::ShotFired);
        assert!(ctl.is_moving());
        assert!(ctl.aim_state().is_none());
    }

    #[test]
    fn pointer_up_without_press_is_noop() {
        let (mut ctl, _table) = setup();
        assert!(ctl.pointer_up(Vec2::new(10.0, 10.0)).is_none());
        assert_eq!(ctl.phase(), &ShotPhase::AtRest);
    }

    #[test]
    fn input_is_ignored_while_moving() {
        let (mut ctl, table) = setup();
        ctl.pointer_down(&table, Vec2::new(240.0, 190.0));
        ctl.pointer_up(Vec2::new(200.0, 190.0));
        assert!(ctl.tick([4.0, 0.0]));
        assert_eq!(ctl.phase(), &ShotPhase::Moving);

        assert!(!ctl.pointer_down(&table, Vec2::new(300.0, 190.0)));
        assert!(ctl.pointer_move(&table, Vec2::new(300.0, 190.0)).is_none());
        assert!(ctl.pointer_up(Vec2::new(100.0, 190.0)).is_none());
        assert_eq!(ctl.phase(), &ShotPhase::Moving);
        assert!(ctl.aim_state().is_none());
    }

    #[test]
    fn settles_back_to_rest() {
        let (mut ctl, table) = setup();
        ctl.pointer_down(&table, Vec2::new(240.0, 190.0));
        ctl.pointer_up(Vec2::new(200.0, 190.0));
        ctl.tick([4.0]);
        assert!(ctl.tick([0.5, 0.2]));
        assert!(!ctl.tick([0.05, 0.0]));
        assert_eq!(ctl.phase(), &ShotPhase::AtRest);
        assert!(ctl.pointer_down(&table, Vec2::new(300.0, 190.0)));
    }

    #[test]
    fn zero_speed_shot_returns_to_rest_next_tick() {
        let (mut ctl, table) = setup();
        ctl.pointer_down(&table, Vec2::new(300.0, 190.0));
        let shot = ctl.pointer_up(Vec2::new(300.0, 190.0)).expect("shot");
        assert_eq!(shot.speed, 0.0);
        assert!(!ctl.tick([0.0; 16]));
        assert_eq!(ctl.phase(), &ShotPhase::AtRest);
    }

    #[test]
    fn press_without_hover_aims_at_press_point() {
        let (mut ctl, table) = setup();
        ctl.pointer_down(&table, Vec2::new(240.0, 250.0));
        let aim = ctl.aim_state().expect("aiming");
        assert!((aim.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!(aim.target.is_none());
    }

    #[test]
    fn reset_returns_to_rest() {
        let (mut ctl, table) = setup();
        ctl.pointer_down(&table, Vec2::new(240.0, 190.0));
        ctl.pointer_up(Vec2::new(200.0, 190.0));
        ctl.reset();
        assert_eq!(ctl.phase(), &ShotPhase::AtRest);
        assert!(!ctl.is_moving());
    }

    #[test]
    fn press_after_target_removed_recomputes_aim() {
        let (mut ctl, mut table) = setup();
        ctl.pointer_move(&table, Vec2::new(300.0, 190.0));
        assert_eq!(ctl.aim_state().and_then(|a| a.target), Some(BallId(1)));

        table.remove_ball(BallId(1));
        assert!(!ctl.tick([0.05; 15]));
        assert!(ctl.pointer_down(&table, Vec2::new(300.0, 190.0)));

        let aim = ctl.aim_state().expect("aiming");
        let target = aim.target.expect("next ball in line");
        assert_ne!(target, BallId(1));
        assert!(table.ball(target).is_some());
    }

    #[test]
    fn forget_ball_clears_hover_and_frozen_aims() {
        let (mut ctl, table) = setup();
        ctl.pointer_move(&table, Vec2::new(300.0, 190.0));
        ctl.forget_ball(BallId(1));
        let hover = ctl.aim_state().expect("hover");
        assert!(hover.target.is_none());
        assert!(hover.contact_point.is_none());

        ctl.pointer_move(&table, Vec2::new(300.0, 190.0));
        ctl.pointer_down(&table, Vec2::new(300.0, 190.0));
        ctl.forget_ball(BallId(5));
        assert_eq!(ctl.aim_state().and_then(|a| a.target), Some(BallId(1)));
        ctl.forget_ball(BallId(1));
        let frozen = ctl.aim_state().expect("aiming");
        assert!(frozen.target.is_none());
        assert_eq!(frozen.line_end(), frozen.ray.p2);
    }

    #[test]
    fn motion_without_a_shot_drops_the_hover() {
        let (mut ctl, table) = setup();
        ctl.pointer_move(&table, Vec2::new(300.0, 190.0));
        assert!(ctl.tick([0.5]));
        assert_eq!(ctl.phase(), &ShotPhase::Moving);
        assert!(!ctl.tick([0.0]));
        assert_eq!(ctl.phase(), &ShotPhase::AtRest);
        assert!(ctl.aim_state().is_none());

        ctl.pointer_down(&table, Vec2::new(240.0, 250.0));
        let aim = ctl.aim_state().expect("aiming");
        assert!((aim.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!(aim.target.is_none());
    }
}
