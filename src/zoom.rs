//! Zoom controller (§4.1).
//!
//! Discrete step index driven by wheel/key intent, smoothly interpolated
//! toward the resulting target distance with a cooldown between steps.

use crate::config::ZoomConfig;
use crate::error::{Error, Result};
use crate::math::exp_smooth;

/// Per-tick zoom intent, assembled by the orchestrator from the raw
/// snapshot (§4.1 "Intent derives from three sources each tick").
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoomIntent {
    /// Accumulated wheel delta for this tick (not yet sign-corrected).
    pub wheel: f32,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

impl ZoomIntent {
    /// Net intent: `sign(wheel) + zoomIn - zoomOut`, after applying
    /// `invert_wheel`.
    fn net(&self, invert_wheel: bool) -> i32 {
        let mut wheel = self.wheel;
        if invert_wheel {
            wheel = -wheel;
        }
        let wheel_sign = if wheel > 1e-6 {
            1
        } else if wheel < -1e-6 {
            -1
        } else {
            0
        };
        wheel_sign + self.zoom_in as i32 - self.zoom_out as i32
    }
}

/// Discrete-step, exponentially-smoothed zoom controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    steps: Vec<f32>,
    index: usize,
    current: f32,
    target: f32,
    cooldown_remaining: f32,
    step_stride: usize,
    invert_wheel: bool,
    smooth: f32,
    min: f32,
    max: f32,
    cooldown: f32,
}

impl ZoomState {
    /// Build a new controller from validated configuration. Returns
    /// `Error::Config` for a non-array or empty `steps` (§4.1 "Errors").
    pub fn new(cfg: &ZoomConfig) -> Result<Self> {
        if cfg.steps.is_empty() {
            return Err(Error::config("zoom.steps must be a non-empty array"));
        }
        let mut state = Self {
            steps: cfg.steps.clone(),
            index: 0,
            current: 0.0,
            target: 0.0,
            cooldown_remaining: 0.0,
            step_stride: cfg.step_stride.max(1),
            invert_wheel: cfg.invert_wheel,
            smooth: cfg.smooth,
            min: cfg.min,
            max: cfg.max,
            cooldown: cfg.cooldown,
        };
        state.set_index(cfg.index, true);
        Ok(state)
    }

    pub fn configure(&mut self, cfg: &ZoomConfig) -> Result<()> {
        if cfg.steps.is_empty() {
            return Err(Error::config("zoom.steps must be a non-empty array"));
        }
        self.steps = cfg.steps.clone();
        self.step_stride = cfg.step_stride.max(1);
        self.invert_wheel = cfg.invert_wheel;
        self.smooth = cfg.smooth;
        self.min = cfg.min;
        self.max = cfg.max;
        self.cooldown = cfg.cooldown;
        self.set_index(self.index, false);
        Ok(())
    }

    fn clamp_to_bounds(&self, raw: f32) -> f32 {
        raw.clamp(self.min, self.max)
    }

    fn max_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Reset the smoothed value. Non-finite `value` is a no-op on
    /// `current` but still clears the cooldown (§4.1 "Errors").
    pub fn reset(&mut self, value: Option<f32>) {
        self.cooldown_remaining = 0.0;
        if let Some(v) = value {
            if v.is_finite() {
                self.current = self.clamp_to_bounds(v);
            }
        } else {
            self.current = self.target;
        }
    }

    /// Select a step index directly, clamped to the valid range.
    /// `snap` immediately sets `current` to the resulting target instead
    /// of leaving it to converge over subsequent ticks.
    pub fn set_index(&mut self, index: usize, snap: bool) {
        self.index = index.min(self.max_index());
        self.target = self.clamp_to_bounds(self.steps[self.index]);
        if snap {
            self.current = self.target;
        }
    }

    /// Advance one tick: consume `intent`, possibly step the index, then
    /// exponentially smooth `current` toward `target`.
    pub fn update(&mut self, dt: f32, intent: ZoomIntent) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);

        let net = intent.net(self.invert_wheel);
        if net != 0 && self.cooldown_remaining == 0.0 {
            // intent > 0 means "zoom in" -> smaller distance -> lower index.
            let step = self.step_stride as i64 * net.signum() as i64 * -1;
            let new_index = (self.index as i64 + step).clamp(0, self.max_index() as i64) as usize;
            self.set_index(new_index, false);
            self.cooldown_remaining = self.cooldown;
        }

        self.current = exp_smooth(self.current, self.target, self.smooth, dt);
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target_value(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn step_index(&self) -> usize {
        self.index
    }

    /// Snapshot suitable for saving/restoring per-mode zoom state on
    /// mode switch (§3 "Per-mode zoom state is preserved across
    /// switches").
    pub fn snapshot(&self) -> ZoomSnapshot {
        ZoomSnapshot {
            index: self.index,
            current: self.current,
        }
    }

    pub fn restore(&mut self, snap: ZoomSnapshot) {
        self.set_index(snap.index, false);
        self.current = self.clamp_to_bounds(snap.current);
    }
}

/// Saved per-mode zoom snapshot (§3, §4.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSnapshot {
    pub index: usize,
    pub current: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ZoomConfig {
        ZoomConfig {
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

    #[test]
    fn empty_steps_rejected() {
        let mut c = cfg();
        c.steps.clear();
        assert!(ZoomState::new(&c).is_err());
    }

    #[test]
    fn invariant_min_le_current_le_max() {
        let mut z = ZoomState::new(&cfg()).unwrap();
        for _ in 0..200 {
            z.update(1.0 / 60.0, ZoomIntent { wheel: 1.0, ..Default::default() });
            assert!(z.value() >= 0.5 - 1e-4 && z.value() <= 100.0 + 1e-4);
            assert!(z.target_value() >= 0.5 - 1e-4 && z.target_value() <= 100.0 + 1e-4);
        }
    }

    #[test]
    fn scenario_zoom_cycle() {
        // §8 scenario 3.
        let mut z = ZoomState::new(&cfg()).unwrap();
        assert!((z.value() - 8.0).abs() < 1e-5); // steps[2] = 8
        z.update(1.0 / 60.0, ZoomIntent { wheel: 1.0, ..Default::default() });
        assert_eq!(z.step_index(), 1); // index decremented: 8 -> 4
        assert!((z.target_value() - 4.0).abs() < 1e-5);
        let expected = 8.0 + (4.0 - 8.0) * (1.0 - (-18.0_f32 * (1.0 / 60.0)).exp());
        assert!((z.value() - expected).abs() < 1e-4);

        for _ in 0..60 {
            z.update(1.0 / 60.0, ZoomIntent::default());
        }
        assert!(z.value() < 4.05 && z.value() > 3.95);
    }

    #[test]
    fn monotonic_approach_preserves_sign() {
        let mut z = ZoomState::new(&cfg()).unwrap();
        z.update(1.0 / 60.0, ZoomIntent { zoom_out: true, ..Default::default() }); // bigger distance
        let mut prev_diff = z.target_value() - z.value();
        for _ in 0..120 {
            z.update(1.0 / 60.0, ZoomIntent::default());
            let diff = z.target_value() - z.value();
            assert!(diff.signum() == prev_diff.signum() || diff.abs() < 1e-6);
            prev_diff = diff;
        }
    }

    #[test]
    fn cooldown_blocks_repeat_steps() {
        let mut z = ZoomState::new(&cfg()).unwrap();
        z.update(1.0 / 60.0, ZoomIntent { wheel: 1.0, ..Default::default() });
        let idx_after_first = z.step_index();
        z.update(1.0 / 60.0, ZoomIntent { wheel: 1.0, ..Default::default() });
        assert_eq!(z.step_index(), idx_after_first, "cooldown should block a second step");
    }

    #[test]
    fn snapshot_round_trips() {
        let mut z = ZoomState::new(&cfg()).unwrap();
        z.update(1.0 / 60.0, ZoomIntent { wheel: 1.0, ..Default::default() });
        let snap = z.snapshot();
        let mut z2 = ZoomState::new(&cfg()).unwrap();
        z2.restore(snap);
        assert_eq!(z2.step_index(), z.step_index());
        assert!((z2.value() - z.value()).abs() < 1e-6);
    }

    #[test]
    fn non_finite_reset_is_noop_on_current() {
        let mut z = ZoomState::new(&cfg()).unwrap();
        let before = z.value();
        z.reset(Some(f32::NAN));
        assert_eq!(z.value(), before);
    }
}
