pub mod geometry;
pub mod time;
#[cfg(feature = "physics")]
pub mod physics;
