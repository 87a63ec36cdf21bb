//! Configuration surface (§6 table).
//!
//! Plain, `serde`-deserialisable structs with defaults matching the worked
//! examples of §8. `Config::validate` rejects the one true contract
//! violation in this surface (empty/non-positive zoom steps, §4.1 "Errors")
//! and clamps everything else rather than failing, matching §4.1's
//! "indices clamped" rule.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mode::Quality;

/// Mouse-look configuration (§6 "look").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Radians per input-delta unit.
    pub sensitivity: f32,
    /// Max absolute pitch, radians.
    pub pitch_limit: f32,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            pitch_limit: std::f32::consts::PI * 0.49,
            invert_x: false,
            invert_y: false,
        }
    }
}

/// Zoom controller configuration (§6 "zoom", §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Ordered distance sequence. Must be non-empty; rejected otherwise.
    pub steps: Vec<f32>,
    pub index: usize,
    pub smooth: f32,
    pub cooldown: f32,
    pub invert_wheel: bool,
    pub min: f32,
    pub max: f32,
    pub step_stride: usize,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            steps: vec![2.0, 4.0, 8.0, 16.0, 32.0],
            index: 2,
            smooth: 18.0,
            cooldown: 0.08,
            invert_wheel: false,
            min: 0.5,
            max: 100.0,
            step_stride: 1,
        }
    }
}

impl ZoomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::config("zoom.steps must be a non-empty array"));
        }
        if self.steps.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::config("zoom.steps must contain only finite, positive distances"));
        }
        Ok(())
    }
}

/// Wall-slide sub-configuration (§6 "collision.slide").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    pub enabled: bool,
    pub strength: f32,
    pub min_normal_dot: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 0.6,
            min_normal_dot: 0.1,
        }
    }
}

/// Ground-clamp sub-configuration (§6 "collision.ground").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub enabled: bool,
    pub clearance: f32,
    pub probe_up: f32,
    pub probe_down: f32,
    pub smooth: f32,
    pub max_rise_per_sec: f32,
    pub min_normal_y: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            clearance: 0.22,
            probe_up: 0.5,
            probe_down: 10.0,
            smooth: 20.0,
            max_rise_per_sec: 30.0,
            min_normal_y: 0.5,
        }
    }
}

/// Collision solver configuration (§6 "collision", §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub enabled: bool,
    pub radius: f32,
    pub pad: f32,
    pub min_target_dist: f32,
    pub min_y: f32,

    /// Overrides the quality bucket that would otherwise be derived from
    /// the active mode's `ModeMeta::num_rays` (§3). `None` uses the
    /// mode-derived bucket, which is the common case.
    pub quality_override: Option<Quality>,
    pub ring_scale: f32,
    pub vertical_samples: bool,
    pub predictive: bool,

    pub wall_smooth: f32,
    pub free_smooth: f32,
    pub max_pull_per_sec: f32,
    /// `[0, 1]`; `1.0` means outward growth is fully capped per §8.
    pub pop_suppression: f32,

    pub slide: SlideConfig,
    pub ground: GroundConfig,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 0.22,
            pad: 0.18,
            min_target_dist: 0.6,
            min_y: -1000.0,
            quality_override: None,
            ring_scale: 1.0,
            vertical_samples: true,
            predictive: true,
            wall_smooth: 32.0,
            free_smooth: 14.0,
            max_pull_per_sec: 40.0,
            pop_suppression: 0.35,
            slide: SlideConfig::default(),
            ground: GroundConfig::default(),
        }
    }
}

impl CollisionConfig {
    pub fn pop_suppression_clamped(&self) -> f32 {
        self.pop_suppression.clamp(0.0, 1.0)
    }
}

/// Head-bob sub-configuration (§6 "dynamics.bob", §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BobConfig {
    pub walk_freq: f32,
    pub run_freq: f32,
    pub walk_amp_x: f32,
    pub walk_amp_y: f32,
    pub run_amp_x: f32,
    pub run_amp_y: f32,
    pub smooth: f32,
}

impl Default for BobConfig {
    fn default() -> Self {
        Self {
            walk_freq: 9.0,
            run_freq: 13.0,
            walk_amp_x: 0.02,
            walk_amp_y: 0.035,
            run_amp_x: 0.03,
            run_amp_y: 0.05,
            smooth: 16.0,
        }
    }
}

/// Sway sub-configuration (§6 "dynamics.sway", §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwayConfig {
    pub yaw_mul: f32,
    pub pitch_mul: f32,
    pub smooth: f32,
}

impl Default for SwayConfig {
    fn default() -> Self {
        Self {
            yaw_mul: 0.015,
            pitch_mul: 0.015,
            smooth: 10.0,
        }
    }
}

/// Handheld drift sub-configuration (§4.3 "two decorrelated sinusoids").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandheldConfig {
    pub enabled: bool,
    pub amp_x: f32,
    pub amp_y: f32,
    pub freq: f32,
    pub smooth: f32,
}

impl Default for HandheldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            amp_x: 0.004,
            amp_y: 0.003,
            freq: 0.6,
            smooth: 6.0,
        }
    }
}

/// Jump/land spring sub-configuration (§6 "dynamics.spring", §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub jump_impulse: f32,
    pub land_impulse_scale: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 260.0,
            damping: 22.0,
            jump_impulse: -0.08,
            land_impulse_scale: 0.02,
        }
    }
}

/// Accel/brake "kick" sub-configuration (§6 "dynamics.kick", §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub accel_scale: f32,
}

impl Default for KickConfig {
    fn default() -> Self {
        Self {
            stiffness: 200.0,
            damping: 18.0,
            accel_scale: 0.01,
        }
    }
}

/// FOV envelope sub-configuration (§6 "dynamics.fov", §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FovConfig {
    pub enabled: bool,
    pub base: f32,
    pub run_add: f32,
    pub smooth: f32,
}

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base: 75.0,
            run_add: 8.0,
            smooth: 8.0,
        }
    }
}

/// Cinematic post-pass configuration (§6 "dynamics").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    pub bob: BobConfig,
    pub sway: SwayConfig,
    pub handheld: HandheldConfig,
    pub spring: SpringConfig,
    pub kick: KickConfig,
    pub fov: FovConfig,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            bob: BobConfig::default(),
            sway: SwayConfig::default(),
            handheld: HandheldConfig::default(),
            spring: SpringConfig::default(),
            kick: KickConfig::default(),
            fov: FovConfig::default(),
        }
    }
}

/// Mode cross-fade configuration (§6 "transition", §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub enabled: bool,
    pub duration: f32,
    /// Debounce for the mode-cycle key edge (§4.5).
    pub switch_cooldown: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: 0.22,
            switch_cooldown: 0.18,
        }
    }
}

/// Top-level configuration, aggregating every section of §6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub look: LookConfig,
    pub zoom: ZoomConfig,
    pub collision: CollisionConfig,
    pub dynamics: DynamicsConfig,
    pub transition: TransitionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            look: LookConfig::default(),
            zoom: ZoomConfig::default(),
            collision: CollisionConfig::default(),
            dynamics: DynamicsConfig::default(),
            transition: TransitionConfig::default(),
        }
    }
}

impl Config {
    /// Validate the fatal cases (§4.1 "Errors"). Everything else is
    /// clamped lazily by the subsystem that owns it.
    pub fn validate(&self) -> Result<()> {
        self.zoom.validate()
    }

    /// Convenience loader matching the teacher's `serde_json`-based
    /// config plumbing (see `physics_integration.rs`'s `Serialize`/
    /// `Deserialize` state). Hosts may just as well deserialize `Config`
    /// through any other `serde` format.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s).map_err(|e| Error::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_zoom_steps_rejected() {
        let mut cfg = Config::default();
        cfg.zoom.steps.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_positive_zoom_step_rejected() {
        let mut cfg = Config::default();
        cfg.zoom.steps = vec![2.0, -1.0, 8.0];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = Config::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = Config::from_json(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn json_with_empty_steps_is_rejected_at_load() {
        let json = r#"{"zoom": {"steps": []}}"#;
        assert!(Config::from_json(json).is_err());
    }
}
