//! 4x4 homogeneous matrix
//!
//! Storage is column-major: element `(row, col)` lives at `data[row + col * 4]`,
//! so the sixteen floats can be handed to a graphics API as-is. Vectors are
//! treated as columns (`m * v`); builders take their vectors as columns.
//!
//! Rotation builders take degrees. A positive angle about X maps +Y towards
//! -Z (and likewise for the other axes), which is the sign layout the rest of
//! the scene code is written against.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::{Affine3, DegenerateTransform, Vec3, Vec4};

/// Degrees to radians, matching the constant the rotation builders were tuned with
#[allow(clippy::approx_constant)]
const DEG_TO_RAD: f32 = 3.141592 / 180.0;
/// Radians to degrees for [`Mat4::euler_degrees`]
#[allow(clippy::approx_constant)]
const RAD_TO_DEG: f32 = 180.0 / 3.141593;
/// Half-angle factor for the perspective field of view
const HALF_FOV_TO_RAD: f32 = 3.142 / 360.0;

/// 4x4 matrix (column-major)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const ZERO: Self = Self { data: [0.0; 16] };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build from sixteen column-major floats
    #[inline]
    pub const fn from_cols_array(data: [f32; 16]) -> Self {
        Self { data }
    }

    /// Build from four column vectors
    pub fn from_columns(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        let mut m = Self::ZERO;
        m.set_column(0, c0);
        m.set_column(1, c1);
        m.set_column(2, c2);
        m.set_column(3, c3);
        m
    }

    /// The raw column-major floats
    #[inline]
    pub fn as_array(&self) -> &[f32; 16] {
        &self.data
    }

    #[inline]
    pub fn to_cols_array(self) -> [f32; 16] {
        self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row + col * 4]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row + col * 4] = value;
    }

    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::new(self.get(row, 0), self.get(row, 1), self.get(row, 2), self.get(row, 3))
    }

    pub fn column(&self, col: usize) -> Vec4 {
        Vec4::new(self.get(0, col), self.get(1, col), self.get(2, col), self.get(3, col))
    }

    pub fn set_row(&mut self, row: usize, v: Vec4) {
        self.set(row, 0, v.x);
        self.set(row, 1, v.y);
        self.set(row, 2, v.z);
        self.set(row, 3, v.w);
    }

    pub fn set_column(&mut self, col: usize, v: Vec4) {
        self.set(0, col, v.x);
        self.set(1, col, v.y);
        self.set(2, col, v.z);
        self.set(3, col, v.w);
    }

    pub fn negate_row(&mut self, row: usize) {
        for col in 0..4 {
            self.set(row, col, -self.get(row, col));
        }
    }

    pub fn negate_column(&mut self, col: usize) {
        for row in 0..4 {
            self.set(row, col, -self.get(row, col));
        }
    }

    // --- Builders ---

    /// Rotation about X by `degrees`
    pub fn rotation_x(degrees: f32) -> Self {
        let (s, c) = (degrees * DEG_TO_RAD).sin_cos();
        Self::from_columns(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, c, -s, 0.0),
            Vec4::new(0.0, s, c, 0.0),
            Vec4::W,
        )
    }

    /// Rotation about Y by `degrees`
    pub fn rotation_y(degrees: f32) -> Self {
        let (s, c) = (degrees * DEG_TO_RAD).sin_cos();
        Self::from_columns(
            Vec4::new(c, 0.0, s, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(-s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Rotation about Z by `degrees`
    pub fn rotation_z(degrees: f32) -> Self {
        let (s, c) = (degrees * DEG_TO_RAD).sin_cos();
        Self::from_columns(
            Vec4::new(c, -s, 0.0, 0.0),
            Vec4::new(s, c, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::W,
        )
    }

    /// Rotation about a unit `axis` by `degrees`.
    ///
    /// Agrees with the single-axis builders: `rotation(a, Vec3::X) == rotation_x(a)`.
    pub fn rotation(degrees: f32, axis: Vec3) -> Self {
        let (s, c) = (degrees * DEG_TO_RAD).sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;
        Self::from_columns(
            Vec4::new(t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0),
            Vec4::new(t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0),
            Vec4::new(t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0),
            Vec4::W,
        )
    }

    /// Rotation from Euler angles in degrees, `rotation_x * rotation_y * rotation_z`.
    ///
    /// Inverse of [`Mat4::euler_degrees`] away from gimbal lock.
    pub fn from_euler_degrees(angles: Vec3) -> Self {
        Self::rotation_x(angles.x) * Self::rotation_y(angles.y) * Self::rotation_z(angles.z)
    }

    /// Non-uniform scale
    pub fn scale(v: Vec3) -> Self {
        Self::from_columns(
            Vec4::new(v.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, v.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, v.z, 0.0),
            Vec4::W,
        )
    }

    /// Translation by `v`
    pub fn translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_column(3, Vec4::point(v));
        m
    }

    /// Right-handed perspective projection.
    ///
    /// `fov_degrees` is the vertical field of view. A zero-depth range
    /// (`far == near`) produces non-finite entries; see [`Mat4::try_perspective`].
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let fd = 1.0 / (fov_degrees * HALF_FOV_TO_RAD).tan();
        let depth = far - near;
        Self::from_columns(
            Vec4::new(fd / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, fd, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -(far + near) / depth, -1.0),
            Vec4::new(0.0, 0.0, -(2.0 * far * near) / depth, 0.0),
        )
    }

    /// [`Mat4::perspective`] that rejects an empty depth range
    pub fn try_perspective(
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, DegenerateTransform> {
        if far == near {
            return Err(DegenerateTransform::EmptyDepthRange { near, far });
        }
        Ok(Self::perspective(fov_degrees, aspect, near, far))
    }

    /// Camera basis for looking from `eye` at `target`: (right, up, back)
    fn camera_axes(eye: Vec3, target: Vec3, up: Vec3) -> (Vec3, Vec3, Vec3) {
        let back = (eye - target).normalized();
        let right = up.cross(back).normalized();
        let cam_up = back.cross(right).normalized();
        (right, cam_up, back)
    }

    /// View matrix looking from `eye` towards `target`.
    ///
    /// Rows 0..3 hold the camera's right, up and back axes; the translation
    /// column moves `eye` to the origin.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let (right, cam_up, back) = Self::camera_axes(eye, target, up);
        let mut m = Self::IDENTITY;
        m.set_row(0, Vec4::from_vec3(right, -right.dot(eye)));
        m.set_row(1, Vec4::from_vec3(cam_up, -cam_up.dot(eye)));
        m.set_row(2, Vec4::from_vec3(back, -back.dot(eye)));
        m
    }

    /// Orientation part of [`Mat4::look_at`], without translation
    pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let (right, cam_up, back) = Self::camera_axes(eye, target, up);
        let mut m = Self::IDENTITY;
        m.set_row(0, Vec4::direction(right));
        m.set_row(1, Vec4::direction(cam_up));
        m.set_row(2, Vec4::direction(back));
        m
    }

    /// Euler angles (degrees) of the rotation part.
    ///
    /// Returns `(atan2(m12, m22), asin(-m02), atan2(m01, m00))`.
    pub fn euler_degrees(&self) -> Vec3 {
        Vec3::new(
            self.get(1, 2).atan2(self.get(2, 2)) * RAD_TO_DEG,
            (-self.get(0, 2)).asin() * RAD_TO_DEG,
            self.get(0, 1).atan2(self.get(0, 0)) * RAD_TO_DEG,
        )
    }

    // --- Algebra ---

    pub fn transpose(&self) -> Self {
        let mut m = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                m.set(col, row, self.get(row, col));
            }
        }
        m
    }

    /// Determinant of the 3x3 minor left after deleting `skip_row` and `skip_col`
    fn minor3(&self, skip_row: usize, skip_col: usize) -> f32 {
        let mut m = [0.0f32; 9];
        let mut idx = 0;
        for row in (0..4).filter(|&r| r != skip_row) {
            for col in (0..4).filter(|&c| c != skip_col) {
                m[idx] = self.get(row, col);
                idx += 1;
            }
        }
        m[0] * (m[4] * m[8] - m[5] * m[7])
            - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    fn cofactor(&self, row: usize, col: usize) -> f32 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor3(row, col)
    }

    /// Determinant (Laplace expansion along the last column)
    pub fn determinant(&self) -> f32 {
        (0..4).map(|row| self.get(row, 3) * self.cofactor(row, 3)).sum()
    }

    /// Inverse via the adjugate.
    ///
    /// A singular matrix divides by zero: every entry comes out non-finite and
    /// nothing is clamped. Use [`Mat4::try_inverse`] to detect that case.
    pub fn inverse(&self) -> Self {
        let inv_det = 1.0 / self.determinant();
        let mut m = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                m.set(row, col, self.cofactor(col, row) * inv_det);
            }
        }
        m
    }

    /// Inverse, or an error carrying the determinant when it is zero
    pub fn try_inverse(&self) -> Result<Self, DegenerateTransform> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(DegenerateTransform::SingularMatrix { determinant });
        }
        Ok(self.inverse())
    }

    // --- Application ---

    /// Translation column as a Vec3
    #[inline]
    pub fn get_translation(&self) -> Vec3 {
        Vec3::new(self.get(0, 3), self.get(1, 3), self.get(2, 3))
    }

    /// Transform a position (`w = 1`), ignoring the bottom row
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::point(p)).xyz()
    }

    /// Transform a direction (`w = 0`)
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::direction(v)).xyz()
    }

    /// Transform a position and divide by the resulting `w`
    pub fn project_point(&self, p: Vec3) -> Vec3 {
        let clip = *self * Vec4::point(p);
        clip.xyz() / clip.w
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Element-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut m = Self::ZERO;
        for col in 0..4 {
            let c = other.column(col);
            for row in 0..4 {
                m.set(row, col, self.row(row).dot(c));
            }
        }
        m
    }
}

impl std::ops::MulAssign for Mat4 {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

/// Column vector product `m * v`
impl std::ops::Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

/// Row vector product `v * m`
impl std::ops::Mul<Mat4> for Vec4 {
    type Output = Vec4;

    fn mul(self, m: Mat4) -> Vec4 {
        Vec4::new(
            self.dot(m.column(0)),
            self.dot(m.column(1)),
            self.dot(m.column(2)),
            self.dot(m.column(3)),
        )
    }
}

impl From<Affine3> for Mat4 {
    fn from(a: Affine3) -> Self {
        Self::from_columns(
            Vec4::direction(a.i),
            Vec4::direction(a.j),
            Vec4::direction(a.k),
            Vec4::point(a.p),
        )
    }
}

impl Affine3 {
    /// Upper 3x4 block of a homogeneous matrix; the bottom row is dropped
    pub fn from_mat4(m: &Mat4) -> Self {
        Self::new(
            m.column(0).xyz(),
            m.column(1).xyz(),
            m.column(2).xyz(),
            m.column(3).xyz(),
        )
    }
}
