//! Free-fly mode (§4.2 "Free", optional).
//!
//! Decoupled from the player body: location is integrated locally from
//! WASD-style movement keys, independent of `ctx.body_pos`. No zoom, no
//! collision — a free camera is expected to fly through geometry.

use glam::Vec3;

use super::{Context, Mode, ModeMeta};
use crate::input::KeyCode;
use crate::math::forward_from_yaw_pitch;

/// WASD-equivalent key bindings consumed by `FreeMode`.
#[derive(Debug, Clone, Copy)]
pub struct FreeModeKeys {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
}

/// Free camera. Holds only static metadata (key bindings, fly speed);
/// the fly position itself lives in `ctx.free_pos`, the shared scratch
/// buffer the orchestrator owns and reuses across ticks (§3 Ownership).
pub struct FreeMode {
    keys: FreeModeKeys,
    speed: f32,
}

impl FreeMode {
    pub fn new(keys: FreeModeKeys, speed: f32) -> Self {
        Self { keys, speed }
    }
}

impl Mode for FreeMode {
    fn id(&self) -> &str {
        "free"
    }

    fn meta(&self) -> ModeMeta {
        ModeMeta {
            supports_zoom: false,
            has_collision: false,
            num_rays: 0,
            player_model_visible: false,
        }
    }

    fn update(&self, ctx: &mut Context) {
        let forward = forward_from_yaw_pitch(ctx.look_yaw, ctx.look_pitch);
        let right = forward.cross(Vec3::Y).normalize_or_zero();

        let mut move_dir = Vec3::ZERO;
        if ctx.snap.is_down(self.keys.forward) {
            move_dir += forward;
        }
        if ctx.snap.is_down(self.keys.back) {
            move_dir -= forward;
        }
        if ctx.snap.is_down(self.keys.right) {
            move_dir += right;
        }
        if ctx.snap.is_down(self.keys.left) {
            move_dir -= right;
        }
        if ctx.snap.is_down(self.keys.up) {
            move_dir += Vec3::Y;
        }
        if ctx.snap.is_down(self.keys.down) {
            move_dir -= Vec3::Y;
        }

        let mut pos = ctx.free_pos;
        if move_dir.length_squared() > 1e-8 {
            pos += move_dir.normalize() * self.speed * ctx.dt;
            ctx.free_pos = pos;
        }

        ctx.out_pos = pos;
        ctx.target = pos + forward;
    }
}
