//! Third-person orbit mode (§4.2 "Third").

use glam::Vec3;

use super::{Context, Mode, ModeMeta};
use crate::math::forward_from_yaw_pitch;

/// Camera orbits a shoulder pivot at `zoom.current` distance behind the
/// look direction. Supports zoom and requests collision resolution.
pub struct ThirdPersonMode {
    shoulder_offset: Vec3,
}

impl ThirdPersonMode {
    pub fn new(shoulder_offset: Vec3) -> Self {
        Self { shoulder_offset }
    }
}

impl Default for ThirdPersonMode {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 0.0))
    }
}

impl Mode for ThirdPersonMode {
    fn id(&self) -> &str {
        "third"
    }

    fn meta(&self) -> ModeMeta {
        ModeMeta {
            supports_zoom: true,
            has_collision: true,
            num_rays: 6,
            player_model_visible: true,
        }
    }

    fn update(&self, ctx: &mut Context) {
        let pivot = ctx.body_pos + self.shoulder_offset;
        let forward = forward_from_yaw_pitch(ctx.look_yaw, ctx.look_pitch);
        let back = -forward;
        ctx.out_pos = pivot - back * ctx.zoom_current;
        ctx.target = pivot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_collision_push_out_setup() {
        // §8 scenario 4: pivot=(0,1,0), desired=(0,1,-3) at zoom=3, yaw/pitch=0.
        let mode = ThirdPersonMode::default();
        let mut ctx = Context::new();
        ctx.body_pos = Vec3::ZERO;
        ctx.zoom_current = 3.0;
        mode.update(&mut ctx);
        assert!((ctx.target - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
        assert!((ctx.out_pos - Vec3::new(0.0, 1.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn yaw_rotates_orbit_position() {
        let mode = ThirdPersonMode::default();
        let mut ctx = Context::new();
        ctx.zoom_current = 5.0;
        ctx.look_yaw = std::f32::consts::FRAC_PI_2;
        mode.update(&mut ctx);
        // Facing +X direction (yaw = 90deg), camera sits behind along -X.
        assert!(ctx.out_pos.x < -4.0);
        assert!(ctx.out_pos.z.abs() < 1e-4);
    }
}
