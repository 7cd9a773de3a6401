pub mod api;
pub mod core;
pub mod aim;
pub mod input;
pub mod pocket;
pub mod rest;
pub mod session;
pub mod shot;
pub mod table;
#[cfg(feature = "physics")]
pub mod runner;

// Re-export key types at crate root for convenience
pub use api::config::{RectDesc, TableConfig, TableLayout};
pub use api::error::ConfigError;
pub use api::physics::BallPhysics;
pub use api::types::{AimState, BallId, PocketContact, PocketId, ShotIntent};
pub use aim::compute_aim;
pub use aim::contact::{contact_distance, solve_contact};
pub use aim::ray::build_aim_ray;
pub use aim::target::{acquire_target, TargetHit};
pub use core::geometry::Segment;
pub use core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue};
pub use pocket::{decide_pocket_action, PocketAction};
pub use rest::RestDetector;
pub use session::{AimSession, ShotController, ShotPhase};
pub use shot::resolve_shot;
pub use table::{rack_positions, Ball, Table};

#[cfg(feature = "physics")]
pub use core::physics::{ColliderMaterial, PhysicsWorld};
#[cfg(feature = "physics")]
pub use runner::{AimOverlay, TableRunner};
