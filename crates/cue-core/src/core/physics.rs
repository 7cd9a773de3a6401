use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::config::{RectDesc, TableConfig};
use crate::api::physics::BallPhysics;
use crate::api::types::{BallId, PocketContact, PocketId};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl ColliderMaterial {
    /// Ball material from the table config.
    pub fn ball(config: &TableConfig) -> Self {
        Self {
            restitution: config.restitution,
            friction: config.friction,
            density: 1.0,
        }
    }
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 1.0,
            friction: 0.0,
            density: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Top-down table simulation on Rapier2D: dynamic balls, fixed cushions
/// and sensor pockets.
///
/// Velocities cross the [`BallPhysics`] boundary in units per tick and are
/// converted to Rapier's units per second with the fixed `dt`.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    balls: HashMap<BallId, RigidBodyHandle>,
    pockets: HashMap<ColliderHandle, PocketId>,
    pocket_contacts: Vec<PocketContact>,
}

impl PhysicsWorld {
    /// Empty world with no gravity, stepping by `dt` seconds.
    pub fn new(dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        Self {
            gravity: vec2_to_na(Vec2::ZERO),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            balls: HashMap::new(),
            pockets: HashMap::new(),
            pocket_contacts: Vec::new(),
        }
    }

    /// Build the world for a rack: layout cushions and pockets plus every
    /// ball currently on `table`.
    pub fn from_table(config: &TableConfig, table: &Table) -> Self {
        let mut world = Self::new(config.fixed_dt);
        for rect in &config.layout.cushions {
            world.add_cushion(rect, config);
        }
        for (i, rect) in config.layout.pockets.iter().enumerate() {
            world.add_pocket(PocketId(i as u32), rect);
        }
        let material = ColliderMaterial::ball(config);
        let damping = config.linear_damping();
        for ball in table.balls() {
            world.add_ball(ball.id, ball.center, ball.radius, material, damping);
        }
        log::info!(
            "Physics world: {} balls, {} cushions, {} pockets",
            world.balls.len(),
            config.layout.cushions.len(),
            config.layout.pockets.len()
        );
        world
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Add a dynamic ball body. The ball id is stored in `user_data`.
    pub fn add_ball(
        &mut self,
        id: BallId,
        pos: Vec2,
        radius: f32,
        material: ColliderMaterial,
        linear_damping: f32,
    ) {
        if let Some(old) = self.balls.remove(&id) {
            log::warn!("Replacing existing body for {:?}", id);
            self.remove_handle(old);
        }
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(pos))
            .locked_axes(LockedAxes::ROTATION_LOCKED)
            .ccd_enabled(true)
            .linear_damping(linear_damping)
            .user_data(id.0 as u128)
            .build();
        let body_handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::ball(radius)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        self.balls.insert(id, body_handle);
    }

    /// Add a fixed cushion block.
    pub fn add_cushion(&mut self, rect: &RectDesc, config: &TableConfig) {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(rect.center))
            .build();
        let body_handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(rect.half_extents.x, rect.half_extents.y)
            .restitution(config.restitution)
            .friction(config.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
    }

    /// Add a pocket sensor. Balls touching it are reported, not blocked.
    pub fn add_pocket(&mut self, id: PocketId, rect: &RectDesc) {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(rect.center))
            .build();
        let body_handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(rect.half_extents.x, rect.half_extents.y)
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        self.pockets.insert(handle, id);
    }

    /// Advance one tick and collect pocket touches.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2),
                CollisionEvent::Stopped(..) => continue,
            };
            let contact = match (self.pockets.get(&h1), self.pockets.get(&h2)) {
                (Some(&pocket), None) => self.collider_to_ball(h2).map(|ball| PocketContact { ball, pocket }),
                (None, Some(&pocket)) => self.collider_to_ball(h1).map(|ball| PocketContact { ball, pocket }),
                _ => None,
            };
            if let Some(contact) = contact {
                // One pocket per ball per step.
                if !self.pocket_contacts.iter().any(|c| c.ball == contact.ball) {
                    self.pocket_contacts.push(contact);
                }
            }
        }
    }

    /// Number of ball bodies in the simulation.
    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    // -- private helpers --

    fn ball_body(&self, id: BallId) -> Option<&RigidBody> {
        self.balls.get(&id).and_then(|h| self.bodies.get(*h))
    }

    fn ball_body_mut(&mut self, id: BallId) -> Option<&mut RigidBody> {
        let handle = *self.balls.get(&id)?;
        self.bodies.get_mut(handle)
    }

    fn collider_to_ball(&self, collider_handle: ColliderHandle) -> Option<BallId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        let id = BallId(body.user_data as u32);
        (self.balls.get(&id) == Some(&body_handle)).then_some(id)
    }

    fn remove_handle(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }
}

impl BallPhysics for PhysicsWorld {
    fn ball_position(&self, id: BallId) -> Option<Vec2> {
        self.ball_body(id).map(|rb| na_to_vec2(rb.translation()))
    }

    fn ball_speed(&self, id: BallId) -> f32 {
        self.ball_body(id)
            .map(|rb| rb.linvel().norm() * self.integration_parameters.dt)
            .unwrap_or(0.0)
    }

    fn set_ball_velocity(&mut self, id: BallId, velocity: Vec2) {
        let per_second = velocity / self.integration_parameters.dt;
        if let Some(rb) = self.ball_body_mut(id) {
            rb.set_linvel(vec2_to_na(per_second), true);
        }
    }

    fn teleport_ball(&mut self, id: BallId, position: Vec2) {
        if let Some(rb) = self.ball_body_mut(id) {
            rb.set_translation(vec2_to_na(position), true);
        }
    }

    fn remove_ball(&mut self, id: BallId) {
        if let Some(handle) = self.balls.remove(&id) {
            self.remove_handle(handle);
        }
        self.pocket_contacts.retain(|c| c.ball != id);
    }

    fn drain_pocket_contacts(&mut self) -> Vec<PocketContact> {
        std::mem::take(&mut self.pocket_contacts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
