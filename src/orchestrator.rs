//! Top-level state machine tying the whole pipeline together (§4.5).
//!
//! Owns every piece of mutable state — zoom, collision, dynamics,
//! transition, the mode registry, and the reusable per-tick `Context` —
//! so a host only ever talks to one type.

use std::collections::HashMap;

use glam::Vec3;
use log::debug;

use crate::collision::CollisionState;
use crate::config::Config;
use crate::dynamics::{DynamicsInput, DynamicsState};
use crate::error::{Error, Result};
use crate::host::{Camera, Player, PlayerModel};
use crate::input::{EdgeDetector, InputSnapshot, KeyCode};
use crate::math::{clamp_dt, clamp_pitch, forward_from_yaw_pitch};
use crate::mode::{Context, ModeRegistry};
use crate::physics::PhysicsWorld;
use crate::transition::{Pose, TransitionState};
use crate::zoom::{ZoomIntent, ZoomSnapshot, ZoomState};

/// Key codes the orchestrator itself needs to resolve from the host's
/// `keyCode(name)` lookup (§6 "Input"): the mode-cycle key and the two
/// digital zoom keys.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorKeys {
    pub cycle: KeyCode,
    pub zoom_in: KeyCode,
    pub zoom_out: KeyCode,
}

/// The camera control core. One instance per player/camera pair.
pub struct Orchestrator {
    config: Config,
    modes: ModeRegistry,
    zoom: ZoomState,
    collision: CollisionState,
    dynamics: DynamicsState,
    transition: TransitionState,
    ctx: Context,
    cycle_edge: EdgeDetector,
    keys: OrchestratorKeys,
    zoom_snapshots: HashMap<String, ZoomSnapshot>,
}

impl Orchestrator {
    pub fn new(config: Config, modes: ModeRegistry, keys: OrchestratorKeys) -> Result<Self> {
        config.validate()?;
        if modes.is_empty() {
            return Err(Error::contract("at least one mode must be registered"));
        }
        let zoom = ZoomState::new(&config.zoom)?;
        Ok(Self {
            config,
            modes,
            zoom,
            collision: CollisionState::new(),
            dynamics: DynamicsState::new(),
            transition: TransitionState::new(),
            ctx: Context::new(),
            cycle_edge: EdgeDetector::new(),
            keys,
            zoom_snapshots: HashMap::new(),
        })
    }

    pub fn active_mode_id(&self) -> Option<&str> {
        self.modes.active_id()
    }

    /// Forwarded impulse hooks for the dynamics layer (§4.3 "Spring").
    pub fn on_jump(&mut self) {
        self.dynamics.on_jump(&self.config.dynamics);
    }

    pub fn on_land(&mut self, impact_speed: f32) {
        self.dynamics.on_land(&self.config.dynamics, impact_speed);
    }

    pub fn on_accelerate(&mut self, delta_speed: f32) {
        self.dynamics.on_accelerate(&self.config.dynamics, delta_speed);
    }

    fn apply_look(&mut self, snap: &InputSnapshot) {
        let dx = if self.config.look.invert_x { -snap.dx } else { snap.dx };
        let dy = if self.config.look.invert_y { -snap.dy } else { snap.dy };
        self.ctx.look_yaw -= dx * self.config.look.sensitivity;
        self.ctx.look_pitch = clamp_pitch(
            self.ctx.look_pitch - dy * self.config.look.sensitivity,
            self.config.look.pitch_limit,
        );
    }

    fn current_pose<C: Camera>(&self, camera: &C) -> Pose {
        Pose {
            location: camera.location(),
            yaw: self.ctx.look_yaw,
            pitch: self.ctx.look_pitch,
        }
    }

    fn commit_pose<C: Camera>(&self, camera: &mut C, pose: Pose) {
        camera.set_location(pose.location);
        camera.set_yaw_pitch(pose.yaw, pose.pitch);
    }

    fn world_offset_basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = forward_from_yaw_pitch(self.ctx.look_yaw, self.ctx.look_pitch);
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        (right, up, forward)
    }

    /// Advance the whole pipeline by one tick (§4.5 state machine).
    pub fn update<C, P>(&mut self, dt: f32, snap: InputSnapshot, camera: &mut C, player: &mut P, physics: &dyn PhysicsWorld) -> Result<()>
    where
        C: Camera,
        P: Player,
    {
        let dt = clamp_dt(dt);
        self.ctx.dt = dt;
        self.ctx.snap = snap;

        self.apply_look(&self.ctx.snap.clone());
        let body_pos = player.body_position();
        if crate::math::is_finite_vec3(body_pos) {
            self.ctx.body_pos = body_pos;
        }
        // else: keep the last-known body position (§7 "Invalid numeric
        // input ... sample discarded").

        let switch_cooldown = self.config.transition.switch_cooldown;
        let edge = self
            .cycle_edge
            .poll(&self.ctx.snap, self.keys.cycle, dt, switch_cooldown);

        if edge && self.config.transition.enabled {
            self.begin_switch(camera, player)?;
            return Ok(());
        } else if edge {
            // Transitions disabled: switch instantly.
            self.switch_mode_instant(player)?;
        }

        if self.transition.is_active() {
            if let Some(pose) = self.transition.advance(dt) {
                self.commit_pose(camera, pose);
            }
            return Ok(());
        }

        self.run_normal_tick(camera, player, physics)
    }

    fn begin_switch<C: Camera, P: Player>(&mut self, camera: &mut C, player: &mut P) -> Result<()> {
        self.begin_switch_via(camera, player, |modes| modes.next())
    }

    fn switch_mode_instant<P: Player>(&mut self, player: &mut P) -> Result<()> {
        self.switch_mode_instant_via(player, |modes| modes.next())
    }

    /// Select a mode directly by id (§4.2 "setType(id) selects by id"),
    /// going through the same reset/snapshot/visibility bookkeeping as
    /// an edge-triggered cycle, and honoring `config.transition.enabled`
    /// exactly as `update`'s own switch handling does.
    pub fn select_mode<C: Camera, P: Player>(&mut self, id: &str, camera: &mut C, player: &mut P) -> Result<()> {
        if self.config.transition.enabled {
            self.begin_switch_via(camera, player, |modes| modes.set_type(id))
        } else {
            self.switch_mode_instant_via(player, |modes| modes.set_type(id))
        }
    }

    /// Shared body of `begin_switch`/`select_mode`'s transition path.
    /// `select` performs the actual registry switch (`next` or
    /// `set_type`) at the point where the outgoing mode's zoom snapshot
    /// has already been saved, so it is keyed under the right id.
    fn begin_switch_via<C, P>(
        &mut self,
        camera: &mut C,
        player: &mut P,
        select: impl FnOnce(&mut ModeRegistry) -> Result<&str>,
    ) -> Result<()>
    where
        C: Camera,
        P: Player,
    {
        let from_pose = self.current_pose(camera);

        self.save_zoom_snapshot();
        self.collision.reset();
        self.dynamics.on_mode_switched();
        let new_id = select(&mut self.modes)?.to_string();
        debug!("camera mode switch -> {new_id}");
        self.restore_zoom_snapshot(&new_id);
        self.apply_visibility(player)?;

        self.ctx.zoom_current = self.zoom.value();
        self.ctx.body_pos = player.body_position();
        let mode = self
            .modes
            .active()
            .ok_or_else(|| Error::contract("no active mode"))?;
        mode.update(&mut self.ctx);
        let to_pose = Pose {
            location: self.ctx.out_pos,
            yaw: self.ctx.look_yaw,
            pitch: self.ctx.look_pitch,
        };

        self.transition.start(from_pose, to_pose, self.config.transition.duration);
        self.commit_pose(camera, from_pose);
        Ok(())
    }

    /// Shared body of `switch_mode_instant`/`select_mode`'s no-transition
    /// path. See `begin_switch_via` for the `select` contract.
    fn switch_mode_instant_via<P: Player>(
        &mut self,
        player: &mut P,
        select: impl FnOnce(&mut ModeRegistry) -> Result<&str>,
    ) -> Result<()> {
        self.save_zoom_snapshot();
        self.collision.reset();
        self.dynamics.on_mode_switched();
        let new_id = select(&mut self.modes)?.to_string();
        debug!("camera mode switch (no transition) -> {new_id}");
        self.restore_zoom_snapshot(&new_id);
        self.apply_visibility(player)?;
        Ok(())
    }

    fn save_zoom_snapshot(&mut self) {
        if let Some(id) = self.modes.active_id() {
            self.zoom_snapshots.insert(id.to_string(), self.zoom.snapshot());
        }
    }

    fn restore_zoom_snapshot(&mut self, id: &str) {
        if let Some(snap) = self.zoom_snapshots.get(id) {
            self.zoom.restore(*snap);
        }
    }

    fn apply_visibility<P: Player>(&mut self, player: &mut P) -> Result<()> {
        let Some(mode) = self.modes.active() else {
            return Err(Error::contract("no active mode"));
        };
        let visible = mode.meta().player_model_visible;
        player.model().set_visible(visible);
        Ok(())
    }

    fn run_normal_tick<C: Camera, P: Player>(
        &mut self,
        camera: &mut C,
        player: &mut P,
        physics: &dyn PhysicsWorld,
    ) -> Result<()> {
        let mode = self
            .modes
            .active()
            .ok_or_else(|| Error::contract("no active mode"))?;
        let meta = mode.meta();

        if meta.supports_zoom {
            let intent = ZoomIntent {
                wheel: self.ctx.snap.wheel,
                zoom_in: self.ctx.snap.is_down(self.keys.zoom_in),
                zoom_out: self.ctx.snap.is_down(self.keys.zoom_out),
            };
            self.zoom.update(self.ctx.dt, intent);
        }
        self.ctx.zoom_current = self.zoom.value();

        mode.update(&mut self.ctx);

        let dyn_input = DynamicsInput {
            dt: self.ctx.dt,
            grounded: player.is_grounded(),
            running: player.is_running(),
            speed: player.speed(),
            mouse_dx: self.ctx.snap.dx,
            mouse_dy: self.ctx.snap.dy,
        };
        let dyn_out = self.dynamics.update(&self.config.dynamics, dyn_input, camera);
        let (right, up, forward) = self.world_offset_basis();
        self.ctx.out_pos += right * dyn_out.offset.x + up * dyn_out.offset.y + forward * dyn_out.offset.z;
        if let Some(fov) = dyn_out.fov {
            camera.set_fov(fov);
        }

        let final_pos = if meta.has_collision && self.config.collision.enabled {
            let quality = self.config.collision.quality_override.unwrap_or_else(|| meta.quality());
            self.collision.solve(
                &self.config.collision,
                quality,
                self.ctx.out_pos,
                self.ctx.target,
                player.body_id(),
                physics,
                self.ctx.dt,
            )
        } else {
            self.ctx.out_pos
        };

        camera.set_location(final_pos);
        camera.set_yaw_pitch(self.ctx.look_yaw, self.ctx.look_pitch);
        Ok(())
    }
}
