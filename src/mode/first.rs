//! First-person mode (§4.2 "First").

use glam::Vec3;

use super::{Context, Mode, ModeMeta};

/// Camera rigidly attached to the player's head, no zoom, no collision
/// (the body itself occludes geometry close enough to matter).
pub struct FirstPersonMode {
    head_offset: Vec3,
}

impl FirstPersonMode {
    pub fn new(head_offset: Vec3) -> Self {
        Self { head_offset }
    }
}

impl Default for FirstPersonMode {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.65, 0.0))
    }
}

impl Mode for FirstPersonMode {
    fn id(&self) -> &str {
        "first"
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
        ctx.out_pos = ctx.body_pos + self.head_offset;
        ctx.target = ctx.body_pos + Vec3::new(0.0, self.head_offset.y, 0.0);
    }
}
