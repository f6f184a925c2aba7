use std::ops::Mul;

use super::vec3::Vec3;

/// A 3x3 matrix stored as three column vectors.
///
/// Column-major convention: `A * B * v` applies `B` first, then `A`. The
/// modelview transform of a draw call is one of these, so the transform
/// model carries rotation and scale but no translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        cols: [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
    };

    pub const fn new(cols: [Vec3; 3]) -> Self {
        Self { cols }
    }

    /// Rotation around the X axis. The angle is in degrees.
    pub fn rotation_x(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new([
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, cos, sin),
            Vec3::new(0.0, -sin, cos),
        ])
    }

    /// Rotation around the Y axis. The angle is in degrees.
    pub fn rotation_y(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new([
            Vec3::new(cos, 0.0, -sin),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(sin, 0.0, cos),
        ])
    }

    /// Rotation around the Z axis. The angle is in degrees.
    pub fn rotation_z(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new([
            Vec3::new(cos, sin, 0.0),
            Vec3::new(-sin, cos, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ])
    }

    /// Per-axis scale.
    pub fn scaling(factors: Vec3) -> Self {
        Self::new([
            Vec3::new(factors.x, 0.0, 0.0),
            Vec3::new(0.0, factors.y, 0.0),
            Vec3::new(0.0, 0.0, factors.z),
        ])
    }

    /// Uniform scale.
    pub fn scaling_uniform(factor: f32) -> Self {
        Self::scaling(Vec3::new(factor, factor, factor))
    }
}

/// Transform a vector: Mat3 * Vec3 (column vector).
impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let [a, b, c] = self.cols;
        Vec3 {
            x: a.x * v.x + b.x * v.y + c.x * v.z,
            y: a.y * v.x + b.y * v.y + c.y * v.z,
            z: a.z * v.x + b.z * v.y + c.z * v.z,
        }
    }
}

/// Matrix multiplication: Mat3 * Mat3.
///
/// Each column of the result is the left matrix applied to the
/// corresponding column of the right matrix.
impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Self::Output {
        Mat3::new([self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-6);
    }

    #[test]
    fn test_identity_is_neutral() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(Mat3::IDENTITY * v, v);
        assert_eq!(Mat3::IDENTITY * Mat3::rotation_y(30.0), Mat3::rotation_y(30.0));
    }

    #[test]
    fn test_rotation_takes_degrees() {
        // A quarter turn around Z maps +X onto +Y.
        let v = Mat3::rotation_z(90.0) * Vec3::new(1.0, 0.0, 0.0);
        assert_vec_eq(v, Vec3::new(0.0, 1.0, 0.0));
        // And around Y, +X goes to -Z.
        let v = Mat3::rotation_y(90.0) * Vec3::new(1.0, 0.0, 0.0);
        assert_vec_eq(v, Vec3::new(0.0, 0.0, -1.0));
        let v = Mat3::rotation_x(90.0) * Vec3::new(0.0, 1.0, 0.0);
        assert_vec_eq(v, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_composition_applies_right_to_left() {
        let m = Mat3::scaling_uniform(2.0) * Mat3::rotation_z(90.0);
        // Rotate first, then scale.
        let v = m * Vec3::new(1.0, 0.0, 0.0);
        assert_vec_eq(v, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_non_uniform_scale() {
        let m = Mat3::scaling(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(m * Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
    }
}
