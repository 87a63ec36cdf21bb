//! Cinematic dynamics post-pass (§4.3).
//!
//! Runs after a mode produces its desired pose and before collision
//! resolution: sway, handheld drift, head bob, jump/land spring, and an
//! accel/brake "kick", each contributing a local-axis offset, plus an
//! optional FOV envelope applied directly to the host camera.

use glam::Vec3;

use crate::config::DynamicsConfig;
use crate::host::Camera;
use crate::math::exp_smooth;

/// Per-tick dynamics input (§4.3 "Input per tick").
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicsInput {
    pub dt: f32,
    pub grounded: bool,
    pub running: bool,
    pub speed: f32,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
}

/// Local-axis offset plus optional FOV value produced by a tick of the
/// post-pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DynamicsOutput {
    pub offset: Vec3,
    pub fov: Option<f32>,
}

/// All dynamics accumulators, reset wholesale by `on_mode_switched` (§3
/// "DynamicsState ... All reset by `onModeSwitched`").
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicsState {
    bob_t: f32,
    sway_x: f32,
    sway_y: f32,
    handheld_t: f32,
    handheld_x: f32,
    handheld_y: f32,
    pub(crate) spring_y: f32,
    pub(crate) spring_vy: f32,
    kick_z: f32,
    kick_vz: f32,
    fov_current: f32,
    fov_initialised: bool,
}

impl DynamicsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mode_switched(&mut self) {
        *self = Self::default();
    }

    /// Injects a takeoff impulse: pushes the camera down then lets the
    /// spring recover (§4.3 "takeoff pushes camera down").
    pub fn on_jump(&mut self, cfg: &DynamicsConfig) {
        self.spring_vy += cfg.spring.jump_impulse;
    }

    /// Injects a landing impulse proportional to impact speed `s`: the
    /// spring compresses then rebounds (§4.3 "landing compresses then
    /// rebounds").
    pub fn on_land(&mut self, cfg: &DynamicsConfig, s: f32) {
        self.spring_vy += cfg.spring.land_impulse_scale * s;
    }

    /// Injects an accel/brake impulse on the forward axis; `delta_speed`
    /// is signed (positive = accelerating, negative = braking).
    pub fn on_accelerate(&mut self, cfg: &DynamicsConfig, delta_speed: f32) {
        self.kick_vz += cfg.kick.accel_scale * delta_speed;
    }

    fn step_spring(&mut self, stiffness: f32, damping: f32, dt: f32, x: f32, vx: f32) -> (f32, f32) {
        let accel = -stiffness * x - damping * vx;
        let vx = vx + accel * dt;
        let x = x + vx * dt;
        (x, vx)
    }

    /// Advance every accumulator by one tick and return the combined
    /// local-axis offset plus (optionally) the FOV value to commit.
    pub fn update(&mut self, cfg: &DynamicsConfig, input: DynamicsInput, camera: &dyn Camera) -> DynamicsOutput {
        let dt = input.dt;

        // Sway: target proportional to mouse delta, smoothed (§4.3 "Sway").
        let sway_target_x = -input.mouse_dx * cfg.sway.yaw_mul;
        let sway_target_y = -input.mouse_dy * cfg.sway.pitch_mul;
        self.sway_x = exp_smooth(self.sway_x, sway_target_x, cfg.sway.smooth, dt);
        self.sway_y = exp_smooth(self.sway_y, sway_target_y, cfg.sway.smooth, dt);

        // Handheld drift: two decorrelated sinusoids (§4.3 "Handheld drift").
        self.handheld_t += dt;
        let (handheld_target_x, handheld_target_y) = if cfg.handheld.enabled {
            (
                (self.handheld_t * cfg.handheld.freq).sin() * cfg.handheld.amp_x,
                (self.handheld_t * cfg.handheld.freq * 1.37).sin() * cfg.handheld.amp_y,
            )
        } else {
            (0.0, 0.0)
        };
        self.handheld_x = exp_smooth(self.handheld_x, handheld_target_x, cfg.handheld.smooth, dt);
        self.handheld_y = exp_smooth(self.handheld_y, handheld_target_y, cfg.handheld.smooth, dt);

        // Head bob: gated on grounded && speed > 0.12 (§4.3 "Head bob").
        let run_threshold = 8.0;
        let walk_threshold = 5.0;
        let denom = if input.running { run_threshold } else { walk_threshold };
        let k = (input.speed / denom).clamp(0.0, 1.0);
        let (bob_x, bob_y) = if input.grounded && input.speed > 0.12 {
            self.bob_t += dt;
            let freq = if input.running { cfg.bob.run_freq } else { cfg.bob.walk_freq };
            let amp_x = if input.running { cfg.bob.run_amp_x } else { cfg.bob.walk_amp_x };
            let amp_y = if input.running { cfg.bob.run_amp_y } else { cfg.bob.walk_amp_y };
            (
                (self.bob_t * freq / 2.0).cos() * amp_x * k,
                (self.bob_t * freq).sin() * amp_y * k,
            )
        } else {
            (0.0, 0.0)
        };
        // The bob offset itself is smoothed in so it doesn't pop when
        // grounded/speed state flips.
        let bob_smooth_x = exp_smooth(0.0, bob_x, cfg.bob.smooth, dt);
        let bob_smooth_y = exp_smooth(0.0, bob_y, cfg.bob.smooth, dt);

        // Spring (y, vy): damped harmonic oscillator toward rest (§4.3 "Spring").
        let (spring_y, spring_vy) =
            self.step_spring(cfg.spring.stiffness, cfg.spring.damping, dt, self.spring_y, self.spring_vy);
        self.spring_y = spring_y;
        self.spring_vy = spring_vy;

        // Kick (z, vz): same damped pattern on the forward axis (§4.3 "Kick").
        let (kick_z, kick_vz) =
            self.step_spring(cfg.kick.stiffness, cfg.kick.damping, dt, self.kick_z, self.kick_vz);
        self.kick_z = kick_z;
        self.kick_vz = kick_vz;

        let offset = Vec3::new(
            self.sway_x + self.handheld_x + bob_smooth_x,
            self.sway_y + self.handheld_y + bob_smooth_y + self.spring_y,
            self.kick_z,
        );

        // FOV envelope, applied only if the host camera exposes it (§4.3 "FOV").
        let fov = if cfg.fov.enabled && camera.supports_fov() {
            if !self.fov_initialised {
                self.fov_current = cfg.fov.base;
                self.fov_initialised = true;
            }
            let target = cfg.fov.base + if input.running { cfg.fov.run_add * k } else { 0.0 };
            self.fov_current = exp_smooth(self.fov_current, target, cfg.fov.smooth, dt);
            Some(self.fov_current)
        } else {
            None
        };

        DynamicsOutput { offset, fov }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::test_support::FakeCamera;

    #[test]
    fn reset_clears_every_accumulator() {
        let mut state = DynamicsState::new();
        let cfg = DynamicsConfig::default();
        let cam = FakeCamera::default();
        let input = DynamicsInput {
            dt: 1.0 / 60.0,
            grounded: true,
            running: true,
            speed: 6.0,
            mouse_dx: 3.0,
            mouse_dy: 2.0,
        };
        for _ in 0..10 {
            state.update(&cfg, input, &cam);
        }
        state.on_mode_switched();
        assert_eq!(state.bob_t, 0.0);
        assert_eq!(state.sway_x, 0.0);
        assert_eq!(state.spring_y, 0.0);
        assert_eq!(state.kick_z, 0.0);
    }

    #[test]
    fn bob_silent_when_not_grounded() {
        let mut state = DynamicsState::new();
        let cfg = DynamicsConfig::default();
        let cam = FakeCamera::default();
        let input = DynamicsInput {
            dt: 1.0 / 60.0,
            grounded: false,
            running: false,
            speed: 3.0,
            mouse_dx: 0.0,
            mouse_dy: 0.0,
        };
        for _ in 0..5 {
            state.update(&cfg, input, &cam);
        }
        assert_eq!(state.bob_t, 0.0);
    }

    #[test]
    fn jump_impulse_perturbs_spring() {
        let mut state = DynamicsState::new();
        let cfg = DynamicsConfig::default();
        state.on_jump(&cfg);
        assert!(state.spring_vy != 0.0);
    }

    #[test]
    fn fov_untouched_without_host_support() {
        let mut state = DynamicsState::new();
        let cfg = DynamicsConfig::default();
        let cam = FakeCamera { fov_enabled: false, ..Default::default() };
        let input = DynamicsInput {
            dt: 1.0 / 60.0,
            grounded: true,
            running: true,
            speed: 8.0,
            mouse_dx: 0.0,
            mouse_dy: 0.0,
        };
        let out = state.update(&cfg, input, &cam);
        assert!(out.fov.is_none());
    }

    #[test]
    fn fov_rises_toward_run_target_when_supported() {
        let mut state = DynamicsState::new();
        let cfg = DynamicsConfig::default();
        let cam = FakeCamera { fov_enabled: true, ..Default::default() };
        let input = DynamicsInput {
            dt: 1.0 / 60.0,
            grounded: true,
            running: true,
            speed: 8.0,
            mouse_dx: 0.0,
            mouse_dy: 0.0,
        };
        let mut last = cfg.fov.base;
        for _ in 0..120 {
            let out = state.update(&cfg, input, &cam);
            last = out.fov.unwrap();
        }
        assert!(last > cfg.fov.base);
        assert!(last <= cfg.fov.base + cfg.fov.run_add + 1e-3);
    }

    #[test]
    fn sway_responds_to_mouse_delta_sign() {
        let mut state = DynamicsState::new();
        let cfg = DynamicsConfig::default();
        let cam = FakeCamera::default();
        let input = DynamicsInput {
            dt: 1.0 / 60.0,
            grounded: false,
            running: false,
            speed: 0.0,
            mouse_dx: 100.0,
            mouse_dy: 0.0,
        };
        for _ in 0..30 {
            state.update(&cfg, input, &cam);
        }
        assert!(state.sway_x < 0.0);
    }
}
