use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;

/// Axis-aligned rectangle supplied by the table-geometry collaborator
/// (cushion blocks and pocket mouths).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDesc {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl RectDesc {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self { center, half_extents }
    }

    /// Build from a top-left corner and a size, the way map editors export objects.
    pub fn from_corner(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(x + width / 2.0, y + height / 2.0),
            half_extents: Vec2::new(width / 2.0, height / 2.0),
        }
    }
}

/// Static table geometry. Never derived here, only consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub cushions: Vec<RectDesc>,
    pub pockets: Vec<RectDesc>,
}

/// Largest triangle accepted for a rack.
pub const MAX_RACK_ROWS: u32 = 32;

/// Configuration for one rack, fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Radius shared by every ball.
    pub ball_radius: f32,
    /// Length of the aim ray. Must cover the table diagonal.
    pub aim_reach: f32,
    /// Drag length to shot speed (units per tick).
    pub speed_scale: f32,
    /// A ball faster than this (units per tick) keeps the table in motion.
    pub rest_threshold: f32,
    /// Consecutive quiet ticks before the table reports at rest.
    pub settle_ticks: u32,
    /// Distance from the cue ball centre to the cue tip with no pull.
    pub cue_stick_offset: f32,
    pub cue_start: Vec2,
    pub rack_apex: Vec2,
    pub rack_rows: u32,
    /// Fixed simulation tick in seconds.
    pub fixed_dt: f32,
    /// Fraction of velocity lost per tick to the felt.
    pub air_friction: f32,
    pub restitution: f32,
    pub friction: f32,
    pub layout: TableLayout,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            ball_radius: 9.0,
            aim_reach: 1000.0,
            speed_scale: 0.1,
            rest_threshold: 0.1,
            settle_ticks: 1,
            cue_stick_offset: 20.0,
            cue_start: Vec2::new(240.0, 190.0),
            rack_apex: Vec2::new(450.0, 190.0),
            rack_rows: 5,
            fixed_dt: 1.0 / 60.0,
            air_friction: 0.02,
            restitution: 1.0,
            friction: 0.0,
            layout: TableLayout::default(),
        }
    }
}

impl TableConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(field, "must be finite and > 0"));
            }
            Ok(())
        }

        positive(self.ball_radius, "ball_radius")?;
        positive(self.aim_reach, "aim_reach")?;
        positive(self.rest_threshold, "rest_threshold")?;
        positive(self.fixed_dt, "fixed_dt")?;
        if self.aim_reach < self.ball_radius * 4.0 {
            return Err(ConfigError::invalid("aim_reach", "must be at least 4 ball radii"));
        }
        if !self.speed_scale.is_finite() || self.speed_scale < 0.0 {
            return Err(ConfigError::invalid("speed_scale", "must be finite and >= 0"));
        }
        if !self.cue_stick_offset.is_finite() || self.cue_stick_offset < 0.0 {
            return Err(ConfigError::invalid("cue_stick_offset", "must be finite and >= 0"));
        }
        if !(0.0..1.0).contains(&self.air_friction) {
            return Err(ConfigError::invalid("air_friction", "must be in [0, 1)"));
        }
        if !self.restitution.is_finite() || self.restitution < 0.0 {
            return Err(ConfigError::invalid("restitution", "must be finite and >= 0"));
        }
        if !self.friction.is_finite() || self.friction < 0.0 {
            return Err(ConfigError::invalid("friction", "must be finite and >= 0"));
        }
        if self.settle_ticks == 0 {
            return Err(ConfigError::invalid("settle_ticks", "must be >= 1"));
        }
        if self.rack_rows == 0 || self.rack_rows > MAX_RACK_ROWS {
            return Err(ConfigError::invalid("rack_rows", "must be in 1..=32"));
        }
        if !self.cue_start.is_finite() || !self.rack_apex.is_finite() {
            return Err(ConfigError::invalid("cue_start/rack_apex", "must be finite"));
        }
        Ok(())
    }

    /// Rapier linear damping equivalent to losing `air_friction` of the
    /// velocity every `fixed_dt`.
    pub fn linear_damping(&self) -> f32 {
        self.air_friction / ((1.0 - self.air_friction) * self.fixed_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TableConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ball_radius, 9.0);
        assert_eq!(config.settle_ticks, 1);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = TableConfig::from_json(r#"{ "ball_radius": 12.0, "speed_scale": 0.2 }"#)
            .expect("config should parse");
        assert_eq!(config.ball_radius, 12.0);
        assert_eq!(config.speed_scale, 0.2);
        assert_eq!(config.aim_reach, 1000.0);
        assert_eq!(config.cue_start, Vec2::new(240.0, 190.0));
    }

    #[test]
    fn layout_from_json() {
        let json = r#"{
            "layout": {
                "pockets": [ { "center": [20.0, 20.0], "half_extents": [8.0, 8.0] } ]
            }
        }"#;
        let config = TableConfig::from_json(json).expect("config should parse");
        assert_eq!(config.layout.pockets.len(), 1);
        assert!(config.layout.cushions.is_empty());
        assert_eq!(config.layout.pockets[0].center, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = TableConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_bad_values() {
        let err = TableConfig::from_json(r#"{ "ball_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ball_radius", .. }));

        let err = TableConfig::from_json(r#"{ "air_friction": 1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "air_friction", .. }));

        let err = TableConfig::from_json(r#"{ "settle_ticks": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "settle_ticks", .. }));

        let err = TableConfig::from_json(r#"{ "rack_rows": 70000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "rack_rows", .. }));

        let err = TableConfig::from_json(r#"{ "aim_reach": 20.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "aim_reach", .. }));
    }

    #[test]
    fn corner_rect_conversion() {
        let r = RectDesc::from_corner(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.center, Vec2::new(25.0, 40.0));
        assert_eq!(r.half_extents, Vec2::new(15.0, 20.0));
    }

    #[test]
    fn damping_matches_per_tick_loss() {
        let config = TableConfig::default();
        let dt = config.fixed_dt;
        // Rapier scales velocity by 1 / (1 + dt * damping) each step.
        let retained = 1.0 / (1.0 + dt * config.linear_damping());
        assert!((retained - 0.98).abs() < 1e-5, "retained {}", retained);
    }
}
