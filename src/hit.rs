//! Normalised ray/spherecast hit result.
//!
//! §4.4 and §9 require that heterogeneous hit shapes (point may be named
//! `point|position|hitPos|pos|contact|hitPoint`; normal `normal|n|hitNormal`;
//! fraction `fraction|t|alpha|hitFraction`; any field may be a stored number
//! or a zero-argument accessor) be parsed into one normalised shape at the
//! host boundary, never re-probed afterwards. In Rust that boundary is a
//! `PhysicsWorld` implementation: whatever shape the underlying engine hands
//! back, it is translated into `Hit` exactly once, here.

use glam::Vec3;

/// Normalised hit result. All fields are optional because not every backend
/// (or every query mode) reports all three.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hit {
    pub point: Option<Vec3>,
    pub normal: Option<Vec3>,
    pub fraction: Option<f32>,
}

impl Hit {
    pub fn new(point: Option<Vec3>, normal: Option<Vec3>, fraction: Option<f32>) -> Self {
        Self {
            point,
            normal,
            fraction,
        }
    }

    /// Hit fraction in `[0, 1]`, preferring the native value and otherwise
    /// deriving it from the hit point and the segment `from -> to` (§4.4
    /// step 5: "prefer native fraction|t|alpha|hitFraction; else derive from
    /// hit point and segment length").
    pub fn fraction_or_derive(&self, from: Vec3, to: Vec3) -> f32 {
        if let Some(f) = self.fraction {
            return f.clamp(0.0, 1.0);
        }
        let Some(point) = self.point else {
            return 1.0;
        };
        let seg = to - from;
        let seg_len_sq = seg.length_squared();
        if seg_len_sq <= 1e-12 {
            return 0.0;
        }
        let t = (point - from).dot(seg) / seg_len_sq;
        t.clamp(0.0, 1.0)
    }

    /// Normal, falling back to `fallback` (typically the base cast
    /// direction) when the backend did not report one (§4.4 step 6).
    pub fn normal_or(&self, fallback: Vec3) -> Vec3 {
        self.normal
            .filter(|n| n.is_finite_axes())
            .unwrap_or(fallback)
    }

    /// Point, falling back to `fallback` when unreported.
    pub fn point_or(&self, fallback: Vec3) -> Vec3 {
        self.point.filter(|p| p.is_finite_axes()).unwrap_or(fallback)
    }
}

/// Helper trait local to this module: a `Vec3` is usable only if every
/// component is finite (§7 "Invalid numeric input ... sample discarded").
trait FiniteAxes {
    fn is_finite_axes(&self) -> bool;
}

impl FiniteAxes for Vec3 {
    fn is_finite_axes(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_native_fraction() {
        let hit = Hit::new(None, None, Some(0.3));
        let f = hit.fraction_or_derive(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert!((f - 0.3).abs() < 1e-6);
    }

    #[test]
    fn derives_fraction_from_point() {
        let hit = Hit::new(Some(Vec3::new(0.0, 0.0, -4.0)), None, None);
        let f = hit.fraction_or_derive(Vec3::ZERO, Vec3::new(0.0, 0.0, -8.0));
        assert!((f - 0.5).abs() < 1e-5);
    }

    #[test]
    fn derived_fraction_clamped_to_unit_range() {
        let hit = Hit::new(Some(Vec3::new(0.0, 0.0, -20.0)), None, None);
        let f = hit.fraction_or_derive(Vec3::ZERO, Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(f, 1.0);
    }

    #[test]
    fn normal_falls_back_when_missing() {
        let hit = Hit::new(Some(Vec3::ZERO), None, None);
        let n = hit.normal_or(Vec3::Z);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn nan_point_is_discarded_in_favor_of_fallback() {
        let hit = Hit::new(Some(Vec3::new(f32::NAN, 0.0, 0.0)), None, None);
        assert_eq!(hit.point_or(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }
}
