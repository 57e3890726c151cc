//! Physics and movement configuration

use crate::error::{PhysicsError, Result};
use crate::gravity::GravityModel;
use gameplay_math::{Interval, Vec3};
use serde::{Deserialize, Serialize};

/// Contact classification and gravity settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// World gravity (default: -9.81 in Y)
    pub gravity: Vec3,

    /// Contact angles (normal vs. gravity, degrees) accepted as floor
    pub floor_interval: Interval,

    /// How the effective gravity is derived
    pub gravity_model: GravityModel,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            floor_interval: Interval::outer(-120.0, 120.0),
            gravity_model: GravityModel::World,
        }
    }
}

impl PhysicsSettings {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_floor_interval(mut self, interval: Interval) -> Self {
        self.floor_interval = interval;
        self
    }

    pub fn with_gravity_model(mut self, model: GravityModel) -> Self {
        self.gravity_model = model;
        self
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| PhysicsError::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let g = self.gravity;
        if !(g.x.is_finite() && g.y.is_finite() && g.z.is_finite()) {
            return Err(PhysicsError::InvalidConfig(format!("gravity {:?} is not finite", g)));
        }
        if g.length_squared() == 0.0 {
            return Err(PhysicsError::InvalidConfig("gravity is zero".into()));
        }
        Ok(())
    }
}

/// Pedestrian movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedestrianConfig {
    /// Accepted input speed range (m/s); also scales the speed slider
    pub speed_restraint: Interval,

    /// Contact angles accepted as floor for a pedestrian
    pub floor_interval: Interval,

    /// Maximum turn rate (degrees per second)
    pub rotation_speed: f32,

    /// Maximum change of walking speed (m/s²)
    pub movement_acceleration: f32,

    /// Airborne timer cap (seconds); the timer restarts once exceeded
    pub max_airborne_time: f32,

    /// Speeds at or below this count as idle
    pub idle_threshold: f32,

    /// Share of the walking speed pushed into the floor
    pub floor_bias: f32,
}

impl Default for PedestrianConfig {
    fn default() -> Self {
        Self {
            speed_restraint: Interval::new(0.0, 5.0),
            floor_interval: Interval::outer(-100.0, 100.0),
            rotation_speed: 360.0,
            movement_acceleration: 10.0,
            max_airborne_time: 3.0,
            idle_threshold: 0.005,
            floor_bias: 0.1,
        }
    }
}

impl PedestrianConfig {
    pub fn with_speed_restraint(mut self, interval: Interval) -> Self {
        self.speed_restraint = interval;
        self
    }

    pub fn with_floor_interval(mut self, interval: Interval) -> Self {
        self.floor_interval = interval;
        self
    }

    pub fn with_rotation_speed(mut self, degrees_per_second: f32) -> Self {
        self.rotation_speed = degrees_per_second;
        self
    }

    pub fn with_movement_acceleration(mut self, acceleration: f32) -> Self {
        self.movement_acceleration = acceleration;
        self
    }

    pub fn with_max_airborne_time(mut self, seconds: f32) -> Self {
        self.max_airborne_time = seconds;
        self
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PhysicsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("rotation_speed", self.rotation_speed),
            ("movement_acceleration", self.movement_acceleration),
            ("max_airborne_time", self.max_airborne_time),
            ("idle_threshold", self.idle_threshold),
            ("floor_bias", self.floor_bias),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.speed_restraint.is_inner() {
            return Err(PhysicsError::InvalidConfig(format!(
                "speed restraint {} must be an inner interval",
                self.speed_restraint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PhysicsSettings::default();
        assert_eq!(settings.gravity_model, GravityModel::World);
        assert!(settings.floor_interval.check_value(180.0));
        assert!(!settings.floor_interval.check_value(90.0));
        assert!(settings.validate().is_ok());

        let config = PedestrianConfig::default();
        assert_eq!(config.speed_restraint.end(), 5.0);
        assert!(config.floor_interval.check_value(100.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PedestrianConfig::from_json(r#"{ "rotation_speed": 90.0 }"#).unwrap();
        assert_eq!(config.rotation_speed, 90.0);
        assert_eq!(config.movement_acceleration, 10.0);

        let settings = PhysicsSettings::from_json(
            r#"{ "gravity": { "x": 0.0, "y": -3.7, "z": 0.0 }, "gravity_model": "SurfaceRelative" }"#,
        )
        .unwrap();
        assert_eq!(settings.gravity.y, -3.7);
        assert_eq!(settings.gravity_model, GravityModel::SurfaceRelative);
    }

    #[test]
    fn test_validation() {
        let bad = PedestrianConfig::default().with_movement_acceleration(-1.0);
        assert!(matches!(bad.validate(), Err(PhysicsError::InvalidConfig(_))));

        let outer = PedestrianConfig::default().with_speed_restraint(Interval::outer(0.0, 5.0));
        assert!(outer.validate().is_err());

        assert!(PhysicsSettings::default().with_gravity(Vec3::ZERO).validate().is_err());
        assert!(PedestrianConfig::from_json("{ not json").is_err());
    }
}
