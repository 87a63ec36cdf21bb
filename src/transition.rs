//! Mode-switch cross-fade (§3 "TransitionState", §4.5).

use glam::Vec3;

use crate::math::smoothstep;

/// A camera pose, as captured at the start/end of a cross-fade.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub location: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Smoothstep-interpolated blend between the pose the previous mode held
/// and the pose the new mode computes on its first tick (§GLOSSARY
/// "Cross-fade transition").
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionState {
    active: bool,
    t: f32,
    duration: f32,
    from: Pose,
    to: Pose,
}

impl TransitionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin a cross-fade from `from` to `to` over `duration` seconds.
    pub fn start(&mut self, from: Pose, to: Pose, duration: f32) {
        self.active = true;
        self.t = 0.0;
        self.duration = duration.max(1e-4);
        self.from = from;
        self.to = to;
    }

    /// Advance by `dt`. Returns the interpolated pose while active; the
    /// transition clears itself (returns `None` thereafter) once `t`
    /// reaches `duration` (§4.5 "if done, snap & clear").
    pub fn advance(&mut self, dt: f32) -> Option<Pose> {
        if !self.active {
            return None;
        }
        self.t += dt;
        if self.t >= self.duration {
            self.active = false;
            return Some(self.to);
        }
        let a = smoothstep(self.t / self.duration);
        Some(Pose {
            location: self.from.location + (self.to.location - self.from.location) * a,
            yaw: self.from.yaw + (self.to.yaw - self.from.yaw) * a,
            pitch: self.from.pitch + (self.to.pitch - self.from.pitch) * a,
        })
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }
}
