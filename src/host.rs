//! Host capability contracts (§6 "Host capabilities consumed").
//!
//! These are the interfaces the orchestrator requires from its embedding
//! engine. Mandatory methods have no default; optional host capabilities
//! (`fov`/`roll`) are modeled as `Option`-returning accessors so a camera
//! that doesn't support them is still a valid `Camera`.

use glam::Vec3;

use crate::physics::BodyId;

/// Host camera handle. All coordinates are world space (§6).
pub trait Camera {
    fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32);
    fn set_location(&mut self, pos: Vec3);
    fn location(&self) -> Vec3;

    /// Optional field-of-view accessor. `None` means the host camera
    /// doesn't expose FOV; dynamics' FOV envelope (§4.3) is then skipped.
    fn set_fov(&mut self, _fov: f32) {}
    fn fov(&self) -> Option<f32> {
        None
    }
    fn supports_fov(&self) -> bool {
        false
    }

    /// Optional roll accessor, used by the open-ended micro-roll/sway
    /// coupling in §9 design note (b).
    fn set_roll(&mut self, _roll: f32) {}
    fn roll(&self) -> Option<f32> {
        None
    }
    fn supports_roll(&self) -> bool {
        false
    }
}

/// Player-model handle: the visible mesh representing the controlled body,
/// toggled on mode switch (§4.5 "Capability negotiation on switch").
pub trait PlayerModel {
    /// Required capability — a player model lacking this is a fatal
    /// integration violation the first time a mode switch needs it (§7).
    fn set_visible(&mut self, visible: bool);
}

/// Player glue: body id for physics queries, and the visible model handle.
pub trait Player {
    type Model: PlayerModel;

    fn body_id(&self) -> BodyId;
    fn body_position(&self) -> Vec3;
    fn model(&mut self) -> &mut Self::Model;

    /// Movement state consumed by the dynamics post-pass (§4.3 "Input per
    /// tick"). All optional — a host with no locomotion state simply keeps
    /// the defaults, which silently disables bob/FOV-run without affecting
    /// the rest of the pipeline.
    fn is_grounded(&self) -> bool {
        true
    }
    fn is_running(&self) -> bool {
        false
    }
    fn speed(&self) -> f32 {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    #[derive(Debug, Default, Clone, Copy)]
    pub struct FakeCamera {
        pub yaw: f32,
        pub pitch: f32,
        pub pos: Vec3,
        pub fov: f32,
        pub roll: f32,
        pub fov_enabled: bool,
    }

    impl Camera for FakeCamera {
        fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
            self.yaw = yaw;
            self.pitch = pitch;
        }
        fn set_location(&mut self, pos: Vec3) {
            self.pos = pos;
        }
        fn location(&self) -> Vec3 {
            self.pos
        }
        fn set_fov(&mut self, fov: f32) {
            self.fov = fov;
        }
        fn fov(&self) -> Option<f32> {
            self.fov_enabled.then_some(self.fov)
        }
        fn supports_fov(&self) -> bool {
            self.fov_enabled
        }
    }

    #[derive(Debug, Default, Clone, Copy)]
    pub struct FakeModel {
        pub visible: bool,
        pub set_visible_calls: u32,
    }

    impl PlayerModel for FakeModel {
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
            self.set_visible_calls += 1;
        }
    }

    #[derive(Default)]
    pub struct FakePlayer {
        pub body_id: BodyId,
        pub pos: Vec3,
        pub model: FakeModel,
        pub grounded: bool,
        pub running: bool,
        pub speed: f32,
    }

    impl Player for FakePlayer {
        type Model = FakeModel;
        fn body_id(&self) -> BodyId {
            self.body_id
        }
        fn body_position(&self) -> Vec3 {
            self.pos
        }
        fn model(&mut self) -> &mut FakeModel {
            &mut self.model
        }
        fn is_grounded(&self) -> bool {
            self.grounded
        }
        fn is_running(&self) -> bool {
            self.running
        }
        fn speed(&self) -> f32 {
            self.speed
        }
    }
}
