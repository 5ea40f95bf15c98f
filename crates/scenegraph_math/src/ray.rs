//! 3D Ray (origin + direction)

use serde::{Serialize, Deserialize};

use crate::Vec3;

/// A half-line starting at `origin` and extending along `direction`.
///
/// The direction is not required to be unit length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ray3 {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray3 {
    #[inline]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Copy of this ray with a unit direction
    #[inline]
    pub fn unit(self) -> Self {
        Self::new(self.origin, self.direction.normalized())
    }

    /// Normalize the direction in place
    #[inline]
    pub fn normalize(&mut self) -> &mut Self {
        self.direction.normalize();
        self
    }

    /// Point at parameter `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Orthogonal projection of `point` onto the ray's supporting line
    pub fn project(&self, point: Vec3) -> Vec3 {
        let unit = self.direction.normalized();
        let along = Vec3::from_to(self.origin, point).dot(unit);
        self.origin + unit * along
    }

    /// Squared distance from `point` to the supporting line
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        let offset = Vec3::from_to(self.origin, point);
        let unit = self.direction.normalized();
        (offset - unit * offset.dot(unit)).length_squared()
    }

    /// Distance from `point` to the supporting line
    #[inline]
    pub fn distance(&self, point: Vec3) -> f32 {
        self.distance_squared(point).sqrt()
    }
}
