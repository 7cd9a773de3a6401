use glam::Vec2;

use crate::api::config::TableConfig;
use crate::api::physics::BallPhysics;
use crate::api::types::{AimState, BallId, ShotIntent};
use crate::core::physics::PhysicsWorld;
use crate::core::time::FixedTimestep;
use crate::input::queue::{InputEvent, InputQueue};
use crate::pocket::{decide_pocket_action, PocketAction};
use crate::session::ShotController;
use crate::table::Table;

/// What the renderer draws while the player aims.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimOverlay {
    pub aim: AimState,
    pub cue_tip: Vec2,
    /// Cue draw-back distance, 0 while hovering.
    pub pull: f32,
}

/// Drives one rack: input, shot controller, physics, pockets, rest detection.
///
/// Everything runs on the caller's thread, one fixed tick at a time.
pub struct TableRunner {
    config: TableConfig,
    table: Table,
    physics: PhysicsWorld,
    controller: ShotController,
    input: InputQueue,
    timestep: FixedTimestep,
    last_shot: Option<ShotIntent>,
    pocketed: Vec<BallId>,
}

impl TableRunner {
    pub fn new(config: TableConfig) -> Self {
        let table = Table::rack(&config);
        let physics = PhysicsWorld::from_table(&config, &table);
        let controller = ShotController::new(&config);
        let timestep = FixedTimestep::new(config.fixed_dt);
        Self {
            config,
            table,
            physics,
            controller,
            input: InputQueue::new(),
            timestep,
            last_shot: None,
            pocketed: Vec::new(),
        }
    }

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance by a frame's worth of time. Returns the number of fixed ticks run.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// Run exactly one fixed tick.
    pub fn step(&mut self) {
        if !self.handle_input() {
            return;
        }
        self.physics.step();
        self.handle_pockets();
        self.table.sync_from(&self.physics);
        self.controller.tick(self.table.speeds());
    }

    /// Rebuild the rack and the physics world.
    pub fn restart(&mut self) {
        self.table = Table::rack(&self.config);
        self.physics = PhysicsWorld::from_table(&self.config, &self.table);
        self.controller.reset();
        self.timestep.reset();
        self.last_shot = None;
        self.pocketed.clear();
        log::info!("Rack restarted");
    }

    /// Returns `false` if a restart consumed the tick.
    fn handle_input(&mut self) -> bool {
        for event in self.input.drain() {
            let pos = event.pos();
            match (event, pos) {
                (InputEvent::PointerDown { .. }, Some(pos)) => {
                    self.controller.pointer_down(&self.table, pos);
                }
                (InputEvent::PointerMove { .. }, Some(pos)) => {
                    self.controller.pointer_move(&self.table, pos);
                }
                (InputEvent::PointerUp { .. }, Some(pos)) => {
                    if let Some(shot) = self.controller.pointer_up(pos) {
                        self.physics
                            .set_ball_velocity(self.table.cue_ball_id(), shot.velocity());
                        self.last_shot = Some(shot);
                    }
                }
                (InputEvent::Restart, _) => {
                    self.restart();
                    return false;
                }
                _ => {}
            }
        }
        true
    }

    fn handle_pockets(&mut self) {
        for contact in self.physics.drain_pocket_contacts() {
            let ball = match self.table.ball(contact.ball) {
                Some(ball) => *ball,
                None => continue,
            };
            let action = decide_pocket_action(&ball, self.config.cue_start);
            match action {
                PocketAction::ResetCueBall { position } => {
                    log::info!("Cue ball pocketed in {:?}, resetting", contact.pocket);
                    self.physics.set_ball_velocity(ball.id, Vec2::ZERO);
                    self.physics.teleport_ball(ball.id, position);
                }
                PocketAction::Remove { id } => {
                    log::info!("Ball {} pocketed in {:?}", id.0, contact.pocket);
                    self.physics.remove_ball(id);
                    self.controller.forget_ball(id);
                    self.pocketed.push(id);
                }
            }
            self.table.apply_pocket_action(action);
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn controller(&self) -> &ShotController {
        &self.controller
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn is_moving(&self) -> bool {
        self.controller.is_moving()
    }

    /// The most recent shot, for debug display.
    pub fn last_shot(&self) -> Option<&ShotIntent> {
        self.last_shot.as_ref()
    }

    /// Object balls pocketed since the rack was built, in order.
    pub fn pocketed(&self) -> &[BallId] {
        &self.pocketed
    }

    /// Aim line, ghost ball and cue pose, if the player is aiming.
    pub fn overlay(&self) -> Option<AimOverlay> {
        let aim = *self.controller.aim_state()?;
        let cue_tip = self.controller.cue_tip(&self.table)?;
        let pull = self.controller.session().map_or(0.0, |s| s.pull());
        Some(AimOverlay { aim, cue_tip, pull })
    }
}
