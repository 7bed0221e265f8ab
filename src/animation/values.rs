use glam::{Quat, Vec3, Vec4};

/// Values a channel can drive: translation/scale vectors, rotations and
/// individual morph weights.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Cubic Hermite evaluation. Tangents are the raw stored values; they are
    /// scaled by `dt` (the bracket duration) here.
    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self;
}

/// Hermite basis `(h00, h10, h01, h11)` at parameter `t`.
#[inline]
#[must_use]
pub fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    (h00, h10, h01, h11)
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);

        let m0 = out_tangent0 * dt;
        let m1 = in_tangent1 * dt;

        h00 * v0 + h10 * m0 + h01 * v1 + h11 * m1
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);

        let m0 = out_tangent0 * dt;
        let m1 = in_tangent1 * dt;

        v0 * h00 + m0 * h10 + v1 * h01 + m1 * h11
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t).normalize()
    }

    /// Component-wise Hermite over `(x, y, z, w)`.
    ///
    /// This is not a true rotation spline and the result is not guaranteed to
    /// be unit length. Existing content is authored against this curve shape,
    /// so it is kept as-is and the result is returned unnormalized.
    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (h00, h10, h01, h11) = hermite_basis(t);

        let p0 = Vec4::from(v0);
        let p1 = Vec4::from(v1);
        let m0 = Vec4::from(out_tangent0) * dt;
        let m1 = Vec4::from(in_tangent1) * dt;

        Quat::from_vec4(p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hermite_basis_partitions_unity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let (h00, _, h01, _) = hermite_basis(t);
            assert!((h00 + h01 - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn quat_cubic_endpoints_match_values() {
        let q0 = Quat::from_rotation_x(0.3);
        let q1 = Quat::from_rotation_x(1.2);
        let zero = Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);

        let start = Quat::interpolate_cubic(q0, zero, zero, q1, 0.0, 1.0);
        let end = Quat::interpolate_cubic(q0, zero, zero, q1, 1.0, 1.0);
        assert!(Vec4::from(start).abs_diff_eq(Vec4::from(q0), 1e-6));
        assert!(Vec4::from(end).abs_diff_eq(Vec4::from(q1), 1e-6));
    }
}
