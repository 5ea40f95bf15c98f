//! 3D Vector type
//!
//! `Vec3` is the workhorse of the hierarchy: positions, directions, scale
//! factors and rotation axes are all expressed with it.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::{DegenerateTransform, NORMALIZE_EPSILON};

/// 3D Vector with x, y, z components
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    /// Create a new Vec3
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vector pointing from `from` to `to`
    #[inline]
    pub fn from_to(from: Self, to: Self) -> Self {
        to - from
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed)
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - other.y * self.z,
            self.z * other.x - other.z * self.x,
            self.x * other.y - other.x * self.y,
        )
    }

    /// Component-wise multiplication
    #[inline]
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Length squared (faster than length)
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length (magnitude)
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    /// Normalize to unit length
    ///
    /// Vectors whose squared length is below [`NORMALIZE_EPSILON`] are
    /// returned unchanged.
    #[inline]
    pub fn normalized(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > NORMALIZE_EPSILON {
            self * (1.0 / len_sq.sqrt())
        } else {
            self
        }
    }

    /// Normalize in place, with the same guard as [`Vec3::normalized`]
    #[inline]
    pub fn normalize(&mut self) -> &mut Self {
        *self = self.normalized();
        self
    }

    /// Divide by the length with no guard.
    ///
    /// A zero vector yields NaN components.
    #[inline]
    pub fn normalized_unchecked(self) -> Self {
        self / self.length()
    }

    /// Normalize, reporting vectors too short to carry a direction
    pub fn try_normalized(self) -> Result<Self, DegenerateTransform> {
        let len_sq = self.length_squared();
        if len_sq > NORMALIZE_EPSILON {
            Ok(self * (1.0 / len_sq.sqrt()))
        } else {
            Err(DegenerateTransform::ZeroLengthVector)
        }
    }

    /// Rotate about the X axis given the cosine and sine of the angle
    #[inline]
    pub fn rotate_x(self, cos: f32, sin: f32) -> Self {
        Self::new(self.x, cos * self.y - sin * self.z, sin * self.y + cos * self.z)
    }

    /// Rotate about the Y axis given the cosine and sine of the angle
    #[inline]
    pub fn rotate_y(self, cos: f32, sin: f32) -> Self {
        Self::new(cos * self.x + sin * self.z, self.y, cos * self.z - sin * self.x)
    }

    /// Rotate about the Z axis given the cosine and sine of the angle
    #[inline]
    pub fn rotate_z(self, cos: f32, sin: f32) -> Self {
        Self::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y, self.z)
    }

    /// Rotate about a unit `axis` (Rodrigues' formula)
    #[inline]
    pub fn rotate(self, axis: Self, cos: f32, sin: f32) -> Self {
        self * cos + axis * ((1.0 - cos) * self.dot(axis)) + axis.cross(self) * sin
    }

    /// Two unit vectors that, together with `self`, span 3D space.
    ///
    /// `self` must be a unit vector. The returned `(u, v)` satisfy
    /// `v = self × u`.
    pub fn complement_basis(self) -> (Self, Self) {
        let u = if self.x.abs() >= self.y.abs() {
            let inv_len = 1.0 / (self.x * self.x + self.z * self.z).sqrt();
            Self::new(-self.z * inv_len, 0.0, self.x * inv_len)
        } else {
            let inv_len = 1.0 / (self.y * self.y + self.z * self.z).sqrt();
            Self::new(0.0, self.z * inv_len, -self.y * inv_len)
        };
        (u, self.cross(u))
    }

    /// True if any component is +/- infinity
    #[inline]
    pub fn is_infinite(self) -> bool {
        self.x.is_infinite() || self.y.is_infinite() || self.z.is_infinite()
    }

    /// True if any component is NaN
    #[inline]
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

// Operator overloads

impl std::ops::Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::MulAssign<f32> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
        self.z *= scalar;
    }
}

impl std::ops::Div<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn div(self, scalar: f32) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl std::ops::DivAssign<f32> for Vec3 {
    #[inline]
    fn div_assign(&mut self, scalar: f32) {
        self.x /= scalar;
        self.y /= scalar;
        self.z /= scalar;
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
