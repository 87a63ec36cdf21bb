//! Small math helpers shared across the pipeline.
//!
//! Every smoother here uses `1 - e^(-s*dt)` rather than the `s*dt`
//! linearisation, so behaviour stays frame-rate independent (§9).

use glam::Vec3;

/// Exponential smoothing toward `target` at rate `speed` (1/seconds).
/// Frame-rate independent: halving `dt` and doubling the step count
/// converges to the same result.
#[inline]
pub fn exp_smooth(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    if speed <= 0.0 {
        return current;
    }
    current + (target - current) * (1.0 - (-speed * dt).exp())
}

/// Component-wise `exp_smooth` for `Vec3`.
#[inline]
pub fn exp_smooth_vec3(current: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    Vec3::new(
        exp_smooth(current.x, target.x, speed, dt),
        exp_smooth(current.y, target.y, speed, dt),
        exp_smooth(current.z, target.z, speed, dt),
    )
}

/// Clamp a step's length to `max_len`, preserving direction.
#[inline]
pub fn clamp_step(delta: Vec3, max_len: f32) -> Vec3 {
    let len = delta.length();
    if len <= max_len || len <= 1e-9 {
        delta
    } else {
        delta * (max_len / len)
    }
}

/// `smoothstep(t)` on `[0, 1]`; `t` outside the range is clamped first.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp pitch to `[-limit, +limit]`.
#[inline]
pub fn clamp_pitch(pitch: f32, limit: f32) -> f32 {
    pitch.clamp(-limit, limit)
}

/// Clamp `dt` to the discipline in §5: `[1/240, 0.05]`.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(1.0 / 240.0, 0.05)
}

/// True if every component is finite (rejects NaN/inf at ingress, §3).
#[inline]
pub fn is_finite_vec3(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// World-space forward vector for a yaw/pitch pair: yaw rotates around
/// `+Y` starting from `-Z`, pitch tilts toward `+Y`. Used to derive the
/// third-person "back" direction (§4.2 "Third") and the dynamics sway
/// basis.
#[inline]
pub fn forward_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    Vec3::new(-sy * cp, sp, -cy * cp)
}

/// Build an orthonormal basis (`right`, `up`) around `forward`, using
/// `world_up` as the reference axis. Falls back to `fallback_forward` when
/// `forward` is (near-)parallel to `world_up` (§4.4 step 3).
pub fn orthonormal_basis(forward: Vec3, world_up: Vec3, fallback_forward: Vec3) -> (Vec3, Vec3) {
    let f = forward.normalize_or_zero();
    let mut right = world_up.cross(f);
    if right.length_squared() < 1e-8 {
        let f2 = fallback_forward.normalize_or_zero();
        right = world_up.cross(f2);
    }
    let right = right.normalize_or_zero();
    let up = f.cross(right).normalize_or_zero();
    (right, up)
}
