//! Mode registry and the `Mode` contract (§3 "Mode", §4.2).
//!
//! A mode is a polymorphic per-tick pose producer: given the shared
//! scratch `Context`, it writes `ctx.out_pos` and `ctx.target`. Registry
//! registration is strict (§4.2 "fails fast") so a misconfigured host
//! finds out at startup, not mid-game.

pub mod first;
pub mod free;
pub mod third;

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::input::InputSnapshot;

/// Collision sampling quality bucket, derived from `ModeMeta::num_rays`
/// (§3 "numRays maps to collision quality bucket").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    High,
    Ultra,
}

impl Quality {
    pub fn from_num_rays(num_rays: u8) -> Self {
        if num_rays <= 4 {
            Quality::Low
        } else if num_rays <= 6 {
            Quality::High
        } else {
            Quality::Ultra
        }
    }

    /// Ring sample count for this bucket (§4.4 step 4: "N = 4/6/8").
    pub fn ring_samples(&self) -> usize {
        match self {
            Quality::Low => 4,
            Quality::High => 6,
            Quality::Ultra => 8,
        }
    }
}

/// Declarative, immutable-after-registration mode capability record (§3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeMeta {
    pub supports_zoom: bool,
    pub has_collision: bool,
    /// `0..=16`.
    pub num_rays: u8,
    pub player_model_visible: bool,
}

impl ModeMeta {
    pub fn quality(&self) -> Quality {
        Quality::from_num_rays(self.num_rays)
    }
}

/// Shared, reusable per-tick scratch buffer (§3 "Ownership": "per-tick
/// scratch lives in the shared `ctx` buffer ... no per-frame allocation").
pub struct Context {
    pub body_pos: Vec3,
    pub look_yaw: f32,
    pub look_pitch: f32,
    pub zoom_current: f32,
    pub dt: f32,
    pub snap: InputSnapshot,
    pub out_pos: Vec3,
    pub target: Vec3,
    /// Persistent fly position for `mode::free::FreeMode`. Lives here
    /// rather than on the mode itself: modes own only static metadata,
    /// per-tick/persistent scratch lives in this shared buffer (§3
    /// Ownership).
    pub free_pos: Vec3,
}

impl Context {
    pub fn new() -> Self {
        Self {
            body_pos: Vec3::ZERO,
            look_yaw: 0.0,
            look_pitch: 0.0,
            zoom_current: 0.0,
            dt: 1.0 / 60.0,
            snap: InputSnapshot::default(),
            out_pos: Vec3::ZERO,
            target: Vec3::ZERO,
            free_pos: Vec3::ZERO,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick pose producer (§4.2). `update` must be pure with respect to
/// orchestrator-owned state: it reads `ctx` and writes only `out_pos`/
/// `target`.
pub trait Mode {
    /// Unique, non-empty, lowercase identifier.
    fn id(&self) -> &str;
    fn meta(&self) -> ModeMeta;
    fn update(&self, ctx: &mut Context);
}

/// Strict-registration mode table, keyed by lowercase id (§4.2, §9
/// "registry stores one instance per id; lookup uses a hash map keyed by
/// lowercase id").
pub struct ModeRegistry {
    order: Vec<String>,
    modes: HashMap<String, Box<dyn Mode>>,
    active: usize,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            modes: HashMap::new(),
            active: 0,
        }
    }

    /// Register a mode. Fails fast on an empty/non-lowercase id or a
    /// duplicate id (§4.2 "Registration is strict").
    pub fn register(&mut self, mode: Box<dyn Mode>) -> Result<()> {
        let id = mode.id().to_string();
        if id.is_empty() || id != id.to_lowercase() {
            return Err(Error::contract(format!(
                "mode id '{id}' must be a non-empty lowercase string"
            )));
        }
        if self.modes.contains_key(&id) {
            return Err(Error::contract(format!("duplicate mode id '{id}'")));
        }
        self.order.push(id.clone());
        self.modes.insert(id, mode);
        Ok(())
    }

    pub fn active_id(&self) -> Option<&str> {
        self.order.get(self.active).map(String::as_str)
    }

    pub fn active(&self) -> Option<&dyn Mode> {
        let id = self.order.get(self.active)?;
        self.modes.get(id).map(|m| m.as_ref())
    }

    /// Cycle to the next mode in registration order, wrapping around
    /// (§4.2 "`next()` cycles deterministically in registration order").
    pub fn next(&mut self) -> Result<&str> {
        if self.order.is_empty() {
            return Err(Error::contract("mode registry is empty"));
        }
        self.active = (self.active + 1) % self.order.len();
        Ok(self.order[self.active].as_str())
    }

    /// Select a mode directly by id (§4.2 "`setType(id)` selects by id").
    pub fn set_type(&mut self, id: &str) -> Result<&str> {
        let id = id.to_lowercase();
        let pos = self
            .order
            .iter()
            .position(|existing| existing == &id)
            .ok_or_else(|| Error::contract(format!("unknown mode id '{id}'")))?;
        self.active = pos;
        Ok(self.order[self.active].as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        id: &'static str,
    }

    impl Mode for Stub {
        fn id(&self) -> &str {
            self.id
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
            ctx.out_pos = ctx.body_pos;
        }
    }

    #[test]
    fn quality_buckets_match_thresholds() {
        assert_eq!(Quality::from_num_rays(0), Quality::Low);
        assert_eq!(Quality::from_num_rays(4), Quality::Low);
        assert_eq!(Quality::from_num_rays(5), Quality::High);
        assert_eq!(Quality::from_num_rays(6), Quality::High);
        assert_eq!(Quality::from_num_rays(7), Quality::Ultra);
        assert_eq!(Quality::from_num_rays(16), Quality::Ultra);
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut reg = ModeRegistry::new();
        reg.register(Box::new(Stub { id: "first" })).unwrap();
        assert!(reg.register(Box::new(Stub { id: "first" })).is_err());
    }

    #[test]
    fn rejects_non_lowercase_id() {
        let mut reg = ModeRegistry::new();
        assert!(reg.register(Box::new(Stub { id: "First" })).is_err());
    }

    #[test]
    fn next_cycles_in_registration_order() {
        let mut reg = ModeRegistry::new();
        reg.register(Box::new(Stub { id: "first" })).unwrap();
        reg.register(Box::new(Stub { id: "third" })).unwrap();
        reg.register(Box::new(Stub { id: "free" })).unwrap();
        assert_eq!(reg.active_id(), Some("first"));
        assert_eq!(reg.next().unwrap(), "third");
        assert_eq!(reg.next().unwrap(), "free");
        assert_eq!(reg.next().unwrap(), "first");
    }

    #[test]
    fn set_type_selects_by_id() {
        let mut reg = ModeRegistry::new();
        reg.register(Box::new(Stub { id: "first" })).unwrap();
        reg.register(Box::new(Stub { id: "third" })).unwrap();
        assert_eq!(reg.set_type("third").unwrap(), "third");
        assert!(reg.set_type("nope").is_err());
    }
}
