//! 2D Vector type

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::NORMALIZE_EPSILON;

/// 2D Vector with x, y components
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0 };
    pub const Y: Self = Self { x: 0.0, y: 1.0 };

    /// Create a new Vec2
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector pointing from `from` to `to`
    #[inline]
    pub fn from_to(from: Self, to: Self) -> Self {
        to - from
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product of two vectors in the XY plane
    #[inline]
    pub fn cross(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

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

    /// Normalize to unit length, leaving near-zero vectors unchanged
    #[inline]
    pub fn normalized(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > NORMALIZE_EPSILON {
            self * (1.0 / len_sq.sqrt())
        } else {
            self
        }
    }

    /// Divide by the length without any guard
    #[inline]
    pub fn normalized_unchecked(self) -> Self {
        self / self.length()
    }

    /// Scale by a scalar
    #[inline]
    pub fn mult(self, scalar: f32) -> Self {
        self * scalar
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn div(self, scalar: f32) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_and_perp() {
        let a = Vec2::X;
        let b = Vec2::Y;
        assert_eq!(a.cross(b), 1.0);
        assert_eq!(b.cross(a), -1.0);
        assert_eq!(a.perp(), Vec2::Y);
        assert_eq!(a.perp().dot(a), 0.0);
    }

    #[test]
    fn test_length_and_distance() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.length_squared(), 25.0);
        assert_eq!(Vec2::ZERO.distance(v), 5.0);
        assert_eq!(Vec2::from_to(Vec2::new(1.0, 1.0), v), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_normalized_guard() {
        let n = Vec2::new(0.0, 2.0).normalized();
        assert!((n.y - 1.0).abs() < 0.0001);

        let tiny = Vec2::new(0.001, 0.0);
        assert_eq!(tiny.normalized(), tiny);
    }

    #[test]
    fn test_normalized_unchecked_zero() {
        let n = Vec2::ZERO.normalized_unchecked();
        assert!(n.x.is_nan());
        assert!(n.y.is_nan());
    }
}
