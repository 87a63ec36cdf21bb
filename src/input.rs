//! Raw input snapshot consumed by the orchestrator (§3, §6).
//!
//! The host owns real input plumbing (native windowing, gamepad, touch);
//! this crate only consumes the per-tick snapshot shape. Snapshot-derived
//! inputs (`dx`, `dy`, `wheel`) are consumed exactly once per tick (§5).

use std::collections::HashSet;

/// Opaque key code, as handed out by the host's `keyCode(name)` lookup (§6).
pub type KeyCode = u32;

/// Immutable per-tick input snapshot supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Mouse delta X since the last snapshot.
    pub dx: f32,
    /// Mouse delta Y since the last snapshot.
    pub dy: f32,
    /// Accumulated scroll wheel delta since the last snapshot.
    pub wheel: f32,
    /// Keys currently held down.
    pub keys_down: HashSet<KeyCode>,
    /// Keys that transitioned down this tick.
    pub just_pressed: HashSet<KeyCode>,
    /// Keys that transitioned up this tick.
    pub just_released: HashSet<KeyCode>,
    /// Bitmask of mouse buttons currently held.
    pub mouse_buttons: u32,
    /// Whether the cursor is currently grabbed/locked by the host.
    pub grabbed: bool,
}

impl InputSnapshot {
    #[inline]
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn was_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }
}

/// Tracks rising-edge detection for a single key across ticks, with a
/// debounce cooldown (§4.5 "Edge detection for mode switch").
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    was_down: bool,
    cooldown_remaining: f32,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` and report whether `key` just transitioned from up to
    /// down this tick, gated by a cooldown of `debounce` seconds that is
    /// (re)armed every time an edge fires.
    pub fn poll(&mut self, snap: &InputSnapshot, key: KeyCode, dt: f32, debounce: f32) -> bool {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        let is_down = snap.is_down(key);
        let rising = is_down && !self.was_down;
        self.was_down = is_down;
        if rising && self.cooldown_remaining == 0.0 {
            self.cooldown_remaining = debounce;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap_with(keys: &[KeyCode]) -> InputSnapshot {
        InputSnapshot {
            keys_down: keys.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn fires_only_on_rising_edge() {
        let mut edge = EdgeDetector::new();
        let v_key = 86;

        assert!(!edge.poll(&snap_with(&[]), v_key, 1.0 / 60.0, 0.18));
        assert!(edge.poll(&snap_with(&[v_key]), v_key, 1.0 / 60.0, 0.18));
        // held down: no repeat fire even after cooldown would allow it, since
        // there is no new rising edge.
        for _ in 0..30 {
            assert!(!edge.poll(&snap_with(&[v_key]), v_key, 1.0 / 60.0, 0.18));
        }
    }

    #[test]
    fn debounces_rapid_edges() {
        let mut edge = EdgeDetector::new();
        let v_key = 86;
        assert!(edge.poll(&snap_with(&[v_key]), v_key, 1.0 / 60.0, 0.18));
        assert!(!edge.poll(&snap_with(&[]), v_key, 1.0 / 60.0, 0.18));
        // Second press arrives within the debounce window; must not fire.
        assert!(!edge.poll(&snap_with(&[v_key]), v_key, 1.0 / 60.0, 0.18));
    }

    #[test]
    fn fires_again_after_cooldown_elapses() {
        let mut edge = EdgeDetector::new();
        let v_key = 86;
        assert!(edge.poll(&snap_with(&[v_key]), v_key, 1.0 / 60.0, 0.1));
        assert!(!edge.poll(&snap_with(&[]), v_key, 1.0 / 60.0, 0.1));
        // Wait out the cooldown with the key up.
        for _ in 0..10 {
            edge.poll(&snap_with(&[]), v_key, 1.0 / 60.0, 0.1);
        }
        assert!(edge.poll(&snap_with(&[v_key]), v_key, 1.0 / 60.0, 0.1));
    }
}
