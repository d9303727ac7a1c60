use crate::vector::Vector3;

use bytemuck::{Pod, Zeroable};
use std::ops::Mul;

/// Norms below this are treated as degenerate by [`Quaternion::normalize`].
const NORM_EPSILON: f32 = 1e-12;

/// A rotation quaternion with real part `w` and imaginary part `imag`.
///
/// Only unit quaternions represent pure rotations. Composition through
/// [`Mul`] does not renormalize, call [`Quaternion::normalize`] after
/// chaining several products.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quaternion {
    pub w: f32,
    pub imag: Vector3,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The rotation that leaves every vector in place.
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self {
            w,
            imag: Vector3::new(x, y, z),
        }
    }

    /// Builds the rotation of `angle` radians around `axis`.
    ///
    /// The axis does not have to be normalized. A zero axis yields a
    /// quaternion with a zero imaginary part.
    pub fn from_axis_angle(angle: f32, axis: Vector3) -> Self {
        let half_angle = angle * 0.5;
        Self {
            w: half_angle.cos(),
            imag: axis.normalize() * half_angle.sin(),
        }
    }

    /// Same as [`Quaternion::from_axis_angle`] with the axis given component-wise.
    pub fn from_axis_angle_xyz(angle: f32, x: f32, y: f32, z: f32) -> Self {
        Self::from_axis_angle(angle, Vector3::new(x, y, z))
    }

    pub fn is_finite(&self) -> bool {
        self.w.is_finite() && self.imag.is_finite()
    }

    pub fn norm(&self) -> f32 {
        (self.w * self.w + self.imag.dot(&self.imag)).sqrt()
    }

    /// Rescales the quaternion to unit norm.
    ///
    /// A (near) zero quaternion has no direction to keep and falls back to
    /// the identity.
    pub fn normalize(&self) -> Self {
        let norm = self.norm();
        if !norm.is_finite() || norm < NORM_EPSILON {
            return Self::IDENTITY;
        }
        let inv_norm = 1.0 / norm;
        Self {
            w: self.w * inv_norm,
            imag: self.imag * inv_norm,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn to_rotation_matrix(&self) -> RotationMatrix {
        let Vector3 { x, y, z } = self.imag;
        let w = self.w;

        let xx = x * x;
        let yy = y * y;
        let zz = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        RotationMatrix([
            // column 0
            1.0 - 2.0 * (yy + zz),
            2.0 * (xy + wz),
            2.0 * (xz - wy),
            0.0,
            // column 1
            2.0 * (xy - wz),
            1.0 - 2.0 * (xx + zz),
            2.0 * (yz + wx),
            0.0,
            // column 2
            2.0 * (xz + wy),
            2.0 * (yz - wx),
            1.0 - 2.0 * (xx + yy),
            0.0,
            // column 3
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }
}

/// Hamilton product. In `a * b` the rotation `b` is applied first.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Self::Output {
        let imag = rhs.imag * self.w + self.imag * rhs.w + self.imag.cross(&rhs.imag);
        Quaternion {
            w: self.w * rhs.w - self.imag.dot(&rhs.imag),
            imag,
        }
    }
}

/// A 4x4 rotation matrix in column-major order, ready for a model transform.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct RotationMatrix(pub [f32; 16]);

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationMatrix {
    pub const IDENTITY: RotationMatrix = RotationMatrix([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    /// Raw bytes of the column-major matrix, e.g. for a uniform buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Element at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[col * 4 + row]
    }

    /// Applies the upper 3x3 block to `v`.
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.get(0, 0) * v.x + self.get(0, 1) * v.y + self.get(0, 2) * v.z,
            self.get(1, 0) * v.x + self.get(1, 1) * v.y + self.get(1, 2) * v.z,
            self.get(2, 0) * v.x + self.get(2, 1) * v.y + self.get(2, 2) * v.z,
        )
    }
}
