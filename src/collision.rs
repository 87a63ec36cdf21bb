//! Collision solver — the hardest piece (§4.4).
//!
//! Multi-sample spherecast against the physics world, wall-slide,
//! pop suppression, temporal smoothing, and ground clamp, composed into
//! one `CollisionState::solve` call per tick.

use glam::Vec3;
use log::debug;

use crate::config::CollisionConfig;
use crate::hit::Hit;
use crate::math::{clamp_step, exp_smooth, exp_smooth_vec3, orthonormal_basis};
use crate::mode::Quality;
use crate::physics::{BodyId, PhysicsWorld};

/// `{lastCommitted, lastVelocity, groundY}` (§3 "CollisionState").
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionState {
    last_committed: Option<Vec3>,
    last_velocity: Option<Vec3>,
    ground_y: Option<f32>,
    blocked_frames: u32,
}

struct Sample {
    pos: Vec3,
    weight: f32,
}

impl CollisionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset on mode switch to avoid spurious pop between radically
    /// different pivots (§3 "Collision state is reset on every mode
    /// switch").
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn build_samples(
        &self,
        desired: Vec3,
        right: Vec3,
        up: Vec3,
        cfg: &CollisionConfig,
        quality: Quality,
    ) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(12);
        samples.push(Sample { pos: desired, weight: 1.00 });

        let ring_n = quality.ring_samples();
        let ring_radius = cfg.radius * cfg.ring_scale;
        for i in 0..ring_n {
            let theta = (i as f32 / ring_n as f32) * std::f32::consts::TAU;
            let offset = right * theta.cos() * ring_radius + up * theta.sin() * ring_radius;
            samples.push(Sample { pos: desired + offset, weight: 0.88 });
        }

        if cfg.vertical_samples && !matches!(quality, Quality::Low) {
            samples.push(Sample { pos: desired + up * cfg.radius, weight: 0.82 });
            samples.push(Sample { pos: desired - up * cfg.radius, weight: 0.82 });
        }

        if cfg.predictive {
            if let Some(v) = self.last_velocity {
                if v.length() > 0.2 {
                    let lead = (v.length() * 0.045).clamp(0.02, 0.28);
                    samples.push(Sample {
                        pos: desired + v.normalize_or_zero() * lead,
                        weight: 0.90,
                    });
                }
            }
        }

        samples
    }

    /// Run the full pipeline for one tick, returning the new committed
    /// camera location.
    pub fn solve(
        &mut self,
        cfg: &CollisionConfig,
        quality: Quality,
        desired: Vec3,
        target: Vec3,
        body_id: BodyId,
        physics: &dyn PhysicsWorld,
        dt: f32,
    ) -> Vec3 {
        // Step 1: clamp minY, enforce minTargetDist.
        let mut desired = desired;
        desired.y = desired.y.max(cfg.min_y);

        let raw_dir = desired - target;
        let raw_len = raw_dir.length();
        if raw_len <= 1e-6 {
            self.commit(desired, dt);
            return desired;
        }
        let dir_norm = raw_dir / raw_len;
        if raw_len < cfg.min_target_dist {
            desired = target + dir_norm * cfg.min_target_dist;
        }

        // Step 2: predictive velocity estimate.
        let velocity = self
            .last_committed
            .map(|lc| (desired - lc) / dt.max(1e-4));
        self.last_velocity = velocity;

        // Step 3: orthonormal basis around the base ray.
        let (right, up) = orthonormal_basis(dir_norm, Vec3::Y, Vec3::Z);

        // Step 4: sample set construction.
        let samples = self.build_samples(desired, right, up, cfg, quality);

        // Step 5: cast each sample, scoring unblocked vs. blocked.
        let mut best_unblocked: Option<(f32, Vec3)> = None;
        let mut best_blocked: Option<(f32, Hit, Vec3)> = None;

        for s in &samples {
            let hit = if physics.supports_shapecast() {
                physics.raycast_ex(target, s.pos, cfg.radius, Some(body_id))
            } else {
                physics.raycast(target, s.pos, Some(body_id))
            };

            match hit {
                None => {
                    let score = s.weight * 1000.0 - (s.pos - desired).length() * 10.0;
                    if best_unblocked.map(|(b, _)| score > b).unwrap_or(true) {
                        best_unblocked = Some((score, s.pos));
                    }
                }
                Some(h) => {
                    let f = h.fraction_or_derive(target, s.pos);
                    let score = s.weight * 1000.0 + f * 500.0;
                    if best_blocked.as_ref().map(|(b, _, _)| score > *b).unwrap_or(true) {
                        best_blocked = Some((score, h, s.pos));
                    }
                }
            }
        }

        // Step 6: decide.
        let had_hit;
        let mut candidate = if let Some((_, pos)) = best_unblocked {
            had_hit = false;
            pos
        } else if let Some((_, hit, sample_pos)) = best_blocked {
            had_hit = true;
            let normal = hit.normal_or(dir_norm);
            let pushed = hit.point_or(sample_pos) + normal * cfg.pad;

            let mut out = pushed;
            if cfg.slide.enabled && hit.normal.is_some() && normal.dot(dir_norm).abs() >= cfg.slide.min_normal_dot {
                // Keep only the component of the residual move tangential to
                // the wall; the into-wall component is already resolved by
                // the push-out above (§4.4 step 6 "wall-slide").
                let residual = desired - pushed;
                let into = residual.dot(normal);
                let tangential = residual - normal * into;
                let slid = pushed + tangential * cfg.slide.strength;
                let clear = physics.raycast(target, slid, Some(body_id)).is_none();
                if clear {
                    out = slid;
                }
            }

            // Re-enforce minTargetDist after adjustment.
            let d = out - target;
            let len = d.length();
            if len > 1e-6 && len < cfg.min_target_dist {
                out = target + (d / len) * cfg.min_target_dist;
            }
            out
        } else {
            // Every sample blocked and every sample also failed to report a
            // usable hit shape; fall back to the desired position rather
            // than freeze the camera (§7 "a frame must never throw").
            had_hit = false;
            desired
        };

        if had_hit {
            self.blocked_frames += 1;
            if self.blocked_frames % 120 == 1 {
                debug!("camera collision blocked for {} consecutive frames", self.blocked_frames);
            }
        } else {
            self.blocked_frames = 0;
        }

        // Step 7: pop suppression.
        if let Some(lc) = self.last_committed {
            let prev_dist = (lc - target).length();
            let new_dist = (candidate - target).length();
            let growth = new_dist - prev_dist;
            let cap = (prev_dist * (1.0 - cfg.pop_suppression_clamped()) + 0.12).max(0.06);
            if growth > cap {
                let capped_dist = prev_dist + cap;
                let d = candidate - target;
                if d.length() > 1e-6 {
                    candidate = target + d.normalize() * capped_dist;
                }
            }
        }

        // Step 8: temporal smoothing, then per-tick step clamp.
        let final_pos = match self.last_committed {
            None => candidate,
            Some(lc) => {
                let smooth_rate = if had_hit { cfg.wall_smooth } else { cfg.free_smooth };
                let smoothed = exp_smooth_vec3(lc, candidate, smooth_rate, dt);
                let delta = smoothed - lc;
                let max_len = (cfg.max_pull_per_sec * dt).max(0.01);
                lc + clamp_step(delta, max_len)
            }
        };

        // Step 9: ground clamp.
        let final_pos = self.ground_clamp(cfg, final_pos, body_id, physics, dt);

        self.commit(final_pos, dt);
        final_pos
    }

    fn ground_clamp(
        &mut self,
        cfg: &CollisionConfig,
        pos: Vec3,
        body_id: BodyId,
        physics: &dyn PhysicsWorld,
        dt: f32,
    ) -> Vec3 {
        if !cfg.ground.enabled {
            return pos;
        }
        let from = Vec3::new(pos.x, pos.y + cfg.ground.probe_up, pos.z);
        let to = Vec3::new(pos.x, pos.y - cfg.ground.probe_down, pos.z);
        let Some(hit) = physics.raycast(from, to, Some(body_id)) else {
            return pos;
        };
        let normal_ok = hit.normal.map(|n| n.y >= cfg.ground.min_normal_y).unwrap_or(true);
        if !normal_ok {
            return pos;
        }
        let hit_y = hit.point_or(Vec3::new(pos.x, pos.y, pos.z)).y;
        self.ground_y = Some(hit_y);
        let required_y = hit_y + cfg.ground.clearance;
        if pos.y >= required_y {
            return pos;
        }
        let smoothed_y = exp_smooth(pos.y, required_y, cfg.ground.smooth, dt);
        let rise = (smoothed_y - pos.y).min(cfg.ground.max_rise_per_sec * dt).max(0.0);
        Vec3::new(pos.x, pos.y + rise, pos.z)
    }

    fn commit(&mut self, pos: Vec3, dt: f32) {
        if let Some(lc) = self.last_committed {
            self.last_velocity = Some((pos - lc) / dt.max(1e-4));
        }
        self.last_committed = Some(pos);
    }

    pub fn last_committed(&self) -> Option<Vec3> {
        self.last_committed
    }
}
