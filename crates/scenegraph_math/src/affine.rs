//! 3x4 affine matrix (rotation/scale basis + translation)
//!
//! An [`Affine3`] stores three basis columns `i`, `j`, `k` and a translation
//! `p`. Points map as `i * x + j * y + k * z + p`.
//!
//! The incremental operations come in two flavours:
//! - `*_local` compose on the right, in the matrix's own basis
//! - `*_global` compose on the left, in the parent/world basis
//!
//! All of them update the basis columns in closed form rather than going
//! through a full matrix product.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::{DegenerateTransform, Ray3, Vec3};

/// Sine below which two directions are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// Rigid/affine transform: 3x3 basis plus translation (column-major)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Affine3 {
    /// First basis column (image of +X)
    pub i: Vec3,
    /// Second basis column (image of +Y)
    pub j: Vec3,
    /// Third basis column (image of +Z)
    pub k: Vec3,
    /// Translation
    pub p: Vec3,
}

impl Default for Affine3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine3 {
    pub const IDENTITY: Self = Self {
        i: Vec3::X,
        j: Vec3::Y,
        k: Vec3::Z,
        p: Vec3::ZERO,
    };

    #[inline]
    pub const fn new(i: Vec3, j: Vec3, k: Vec3, p: Vec3) -> Self {
        Self { i, j, k, p }
    }

    /// Pure translation
    #[inline]
    pub const fn from_translation(p: Vec3) -> Self {
        Self { i: Vec3::X, j: Vec3::Y, k: Vec3::Z, p }
    }

    /// Build from 12 scalars: columns i, j, k, p
    pub fn from_cols_array(a: &[f32; 12]) -> Self {
        Self {
            i: Vec3::new(a[0], a[1], a[2]),
            j: Vec3::new(a[3], a[4], a[5]),
            k: Vec3::new(a[6], a[7], a[8]),
            p: Vec3::new(a[9], a[10], a[11]),
        }
    }

    pub fn to_cols_array(&self) -> [f32; 12] {
        [
            self.i.x, self.i.y, self.i.z,
            self.j.x, self.j.y, self.j.z,
            self.k.x, self.k.y, self.k.z,
            self.p.x, self.p.y, self.p.z,
        ]
    }

    /// Row `n` (0, 1 or 2) of the 3x3 block
    #[inline]
    pub fn row(&self, n: usize) -> Vec3 {
        match n {
            0 => Vec3::new(self.i.x, self.j.x, self.k.x),
            1 => Vec3::new(self.i.y, self.j.y, self.k.y),
            2 => Vec3::new(self.i.z, self.j.z, self.k.z),
            _ => panic!("Affine3 row index out of range: {}", n),
        }
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.p
    }

    #[inline]
    pub fn set_translation(&mut self, p: Vec3) {
        self.p = p;
    }

    /// Determinant of the 3x3 block
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.i.dot(self.j.cross(self.k))
    }

    /// Rows of the inverse 3x3 block (cofactor expansion over the determinant)
    fn inverse_rows(&self) -> [Vec3; 3] {
        let inv_det = 1.0 / self.determinant();
        [
            self.j.cross(self.k) * inv_det,
            self.k.cross(self.i) * inv_det,
            self.i.cross(self.j) * inv_det,
        ]
    }

    /// Inverse transform.
    ///
    /// A singular basis divides by zero and yields non-finite entries. Use
    /// [`Affine3::try_inverse`] when the input is not known to be invertible.
    pub fn inverse(&self) -> Self {
        let [r0, r1, r2] = self.inverse_rows();
        Self {
            i: Vec3::new(r0.x, r1.x, r2.x),
            j: Vec3::new(r0.y, r1.y, r2.y),
            k: Vec3::new(r0.z, r1.z, r2.z),
            p: -Vec3::new(r0.dot(self.p), r1.dot(self.p), r2.dot(self.p)),
        }
    }

    /// Inverse transform, or an error if the basis is singular
    pub fn try_inverse(&self) -> Result<Self, DegenerateTransform> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(DegenerateTransform::SingularMatrix { determinant });
        }
        Ok(self.inverse())
    }

    /// Transform a direction (ignores translation)
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.i * v.x + self.j * v.y + self.k * v.z
    }

    /// Transform a position
    #[inline]
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        self.transform_vector(v) + self.p
    }

    #[inline]
    pub fn transform_ray(&self, ray: &Ray3) -> Ray3 {
        Ray3::new(self.transform_point(ray.origin), self.transform_vector(ray.direction))
    }

    /// Multiply a direction by the transposed 3x3 block.
    ///
    /// Equals the inverse for orthonormal bases.
    #[inline]
    pub fn transform_transposed_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.i.dot(v), self.j.dot(v), self.k.dot(v))
    }

    pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 {
        let [r0, r1, r2] = self.inverse_rows();
        Vec3::new(r0.dot(v), r1.dot(v), r2.dot(v))
    }

    pub fn inverse_transform_point(&self, v: Vec3) -> Vec3 {
        self.inverse_transform_vector(v - self.p)
    }

    pub fn inverse_transform_ray(&self, ray: &Ray3) -> Ray3 {
        let [r0, r1, r2] = self.inverse_rows();
        let origin = ray.origin - self.p;
        Ray3::new(
            Vec3::new(r0.dot(origin), r1.dot(origin), r2.dot(origin)),
            Vec3::new(r0.dot(ray.direction), r1.dot(ray.direction), r2.dot(ray.direction)),
        )
    }

    /// `self * m`: apply `m` in this transform's local frame, then `self`
    pub fn apply_local(&self, m: &Self) -> Self {
        Self {
            i: self.transform_vector(m.i),
            j: self.transform_vector(m.j),
            k: self.transform_vector(m.k),
            p: self.transform_point(m.p),
        }
    }

    // --- Global (parent frame) increments ---

    pub fn rotate_global_x(&mut self, cos: f32, sin: f32) {
        self.i = self.i.rotate_x(cos, sin);
        self.j = self.j.rotate_x(cos, sin);
        self.k = self.k.rotate_x(cos, sin);
    }

    pub fn rotate_global_y(&mut self, cos: f32, sin: f32) {
        self.i = self.i.rotate_y(cos, sin);
        self.j = self.j.rotate_y(cos, sin);
        self.k = self.k.rotate_y(cos, sin);
    }

    pub fn rotate_global_z(&mut self, cos: f32, sin: f32) {
        self.i = self.i.rotate_z(cos, sin);
        self.j = self.j.rotate_z(cos, sin);
        self.k = self.k.rotate_z(cos, sin);
    }

    /// Rotate the basis about a unit world-space `axis`
    pub fn rotate_global(&mut self, axis: Vec3, cos: f32, sin: f32) {
        self.i = self.i.rotate(axis, cos, sin);
        self.j = self.j.rotate(axis, cos, sin);
        self.k = self.k.rotate(axis, cos, sin);
    }

    #[inline]
    pub fn translate_global(&mut self, v: Vec3) {
        self.p += v;
    }

    /// Scale each world axis of the basis (translation is kept)
    pub fn scale_global(&mut self, v: Vec3) {
        self.i = self.i.component_mul(v);
        self.j = self.j.component_mul(v);
        self.k = self.k.component_mul(v);
    }

    /// Shortest-arc rotation taking direction `from` onto `to`, in world axes
    pub fn rotate_global_between(&mut self, from: Vec3, to: Vec3) {
        if let Some((axis, cos, sin)) = shortest_arc(from, to) {
            self.rotate_global(axis, cos, sin);
        }
    }

    // --- Local (own basis) increments ---

    pub fn rotate_local_x(&mut self, cos: f32, sin: f32) {
        let (j, k) = (self.j, self.k);
        self.j = j * cos + k * sin;
        self.k = k * cos - j * sin;
    }

    pub fn rotate_local_y(&mut self, cos: f32, sin: f32) {
        let (i, k) = (self.i, self.k);
        self.i = i * cos - k * sin;
        self.k = i * sin + k * cos;
    }

    pub fn rotate_local_z(&mut self, cos: f32, sin: f32) {
        let (i, j) = (self.i, self.j);
        self.i = i * cos + j * sin;
        self.j = j * cos - i * sin;
    }

    /// Rotate about a unit `axis` expressed in the local basis
    pub fn rotate_local(&mut self, axis: Vec3, cos: f32, sin: f32) {
        let i = self.transform_vector(Vec3::X.rotate(axis, cos, sin));
        let j = self.transform_vector(Vec3::Y.rotate(axis, cos, sin));
        let k = self.transform_vector(Vec3::Z.rotate(axis, cos, sin));
        self.i = i;
        self.j = j;
        self.k = k;
    }

    /// Move along the local axes
    #[inline]
    pub fn translate_local(&mut self, v: Vec3) {
        self.p += self.transform_vector(v);
    }

    /// Scale the basis columns
    pub fn scale_local(&mut self, v: Vec3) {
        self.i *= v.x;
        self.j *= v.y;
        self.k *= v.z;
    }

    /// Shortest-arc rotation taking `from` onto `to`, both in local axes
    pub fn rotate_local_between(&mut self, from: Vec3, to: Vec3) {
        if let Some((axis, cos, sin)) = shortest_arc(from, to) {
            self.rotate_local(axis, cos, sin);
        }
    }

    /// View transform looking from `eye` towards `target`.
    ///
    /// The rows of the basis are the camera axes (`right`, `up`, `back`)
    /// and the translation moves `eye` to the origin.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let back = (eye - target).normalized();
        let right = up.cross(back).normalized();
        let cam_up = back.cross(right);

        Self {
            i: Vec3::new(right.x, cam_up.x, back.x),
            j: Vec3::new(right.y, cam_up.y, back.y),
            k: Vec3::new(right.z, cam_up.z, back.z),
            p: Vec3::new(-right.dot(eye), -cam_up.dot(eye), -back.dot(eye)),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.i.is_finite() && self.j.is_finite() && self.k.is_finite() && self.p.is_finite()
    }
}

impl std::ops::Mul for Affine3 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.apply_local(&other)
    }
}

/// Unit axis, cosine and sine of the rotation taking `from` onto `to`.
///
/// Returns `None` when the directions already agree.
fn shortest_arc(from: Vec3, to: Vec3) -> Option<(Vec3, f32, f32)> {
    let from = from.normalized();
    let to = to.normalized();
    let axis = from.cross(to);
    let sin = axis.length();
    let cos = from.dot(to);

    if sin > PARALLEL_EPSILON {
        return Some((axis / sin, cos, sin));
    }
    if cos > 0.0 {
        return None;
    }
    // Opposite directions: half turn about any perpendicular axis
    let (perpendicular, _) = from.complement_basis();
    Some((perpendicular, -1.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON && (a.z - b.z).abs() < EPSILON
    }

    fn affine_approx_eq(a: &Affine3, b: &Affine3) -> bool {
        vec_approx_eq(a.i, b.i)
            && vec_approx_eq(a.j, b.j)
            && vec_approx_eq(a.k, b.k)
            && vec_approx_eq(a.p, b.p)
    }

    fn sample() -> Affine3 {
        let mut m = Affine3::from_translation(Vec3::new(1.0, -2.0, 3.0));
        m.rotate_global_x(0.3_f32.cos(), 0.3_f32.sin());
        m.rotate_global_y(1.1_f32.cos(), 1.1_f32.sin());
        m.scale_local(Vec3::new(2.0, 1.0, 0.5));
        m
    }

    #[test]
    fn test_identity_laws() {
        let m = sample();
        assert!(affine_approx_eq(&(Affine3::IDENTITY * m), &m));
        assert!(affine_approx_eq(&(m * Affine3::IDENTITY), &m));
    }

    #[test]
    fn test_transform_point_and_vector() {
        let m = Affine3::from_translation(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(m.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(m.transform_vector(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_rows() {
        let m = Affine3::from_cols_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 0.0, 0.0, 0.0]);
        assert_eq!(m.row(0), Vec3::new(1.0, 4.0, 7.0));
        assert_eq!(m.row(1), Vec3::new(2.0, 5.0, 8.0));
        assert_eq!(m.row(2), Vec3::new(3.0, 6.0, 9.0));
        assert_eq!(Affine3::from_cols_array(&m.to_cols_array()), m);
    }

    #[test]
    #[should_panic(expected = "row index out of range")]
    fn test_row_out_of_range_panics() {
        Affine3::IDENTITY.row(3);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = sample();
        let inv = m.inverse();
        assert!(affine_approx_eq(&(m * inv), &Affine3::IDENTITY));
        assert!(affine_approx_eq(&(inv * m), &Affine3::IDENTITY));

        let p = Vec3::new(0.5, 7.0, -1.0);
        assert!(vec_approx_eq(m.inverse_transform_point(m.transform_point(p)), p));
        assert!(vec_approx_eq(m.inverse_transform_vector(m.transform_vector(p)), p));
    }

    #[test]
    fn test_inverse_ray() {
        let m = sample();
        let ray = Ray3::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 1.0));
        let back = m.inverse_transform_ray(&m.transform_ray(&ray));
        assert!(vec_approx_eq(back.origin, ray.origin));
        assert!(vec_approx_eq(back.direction, ray.direction));
    }

    #[test]
    fn test_singular_inverse() {
        let mut m = Affine3::IDENTITY;
        m.scale_local(Vec3::new(1.0, 0.0, 1.0));

        assert_eq!(m.determinant(), 0.0);
        assert!(!m.inverse().is_finite());
        assert!(matches!(
            m.try_inverse(),
            Err(DegenerateTransform::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_transposed_is_inverse_for_rotation() {
        let mut m = Affine3::IDENTITY;
        m.rotate_global(Vec3::new(1.0, 1.0, 0.0).normalized(), 0.4_f32.cos(), 0.4_f32.sin());
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(m.transform_transposed_vector(v), m.inverse_transform_vector(v)));
    }

    #[test]
    fn test_local_rotation_composes_on_the_right() {
        let (c, s) = (0.8_f32.cos(), 0.8_f32.sin());
        let base = sample();

        let mut rx = Affine3::IDENTITY;
        rx.rotate_global_x(c, s);
        let mut local = base;
        local.rotate_local_x(c, s);
        assert!(affine_approx_eq(&local, &(base * rx)));

        let mut ry = Affine3::IDENTITY;
        ry.rotate_global_y(c, s);
        let mut local = base;
        local.rotate_local_y(c, s);
        assert!(affine_approx_eq(&local, &(base * ry)));

        let mut rz = Affine3::IDENTITY;
        rz.rotate_global_z(c, s);
        let mut local = base;
        local.rotate_local_z(c, s);
        assert!(affine_approx_eq(&local, &(base * rz)));
    }

    #[test]
    fn test_global_rotation_composes_on_the_left() {
        let (c, s) = (0.8_f32.cos(), 0.8_f32.sin());
        let mut base = sample();
        base.set_translation(Vec3::ZERO);

        let mut rz = Affine3::IDENTITY;
        rz.rotate_global_z(c, s);
        let mut global = base;
        global.rotate_global_z(c, s);
        assert!(affine_approx_eq(&global, &(rz * base)));
    }

    #[test]
    fn test_axis_rotation_matches_named_axes() {
        let (c, s) = (0.25_f32.cos(), 0.25_f32.sin());
        let base = sample();

        let mut a = base;
        a.rotate_local(Vec3::Y, c, s);
        let mut b = base;
        b.rotate_local_y(c, s);
        assert!(affine_approx_eq(&a, &b));

        let mut a = base;
        a.rotate_global(Vec3::Z, c, s);
        let mut b = base;
        b.rotate_global_z(c, s);
        assert!(affine_approx_eq(&a, &b));
    }

    #[test]
    fn test_translate_local_vs_global() {
        let mut m = Affine3::IDENTITY;
        m.rotate_local_z(FRAC_PI_2.cos(), FRAC_PI_2.sin());

        let mut local = m;
        local.translate_local(Vec3::X);
        // Local X now points along world Y
        assert!(vec_approx_eq(local.p, Vec3::Y));

        let mut global = m;
        global.translate_global(Vec3::X);
        assert!(vec_approx_eq(global.p, Vec3::X));
    }

    #[test]
    fn test_scale_local_vs_global() {
        let mut m = Affine3::IDENTITY;
        m.rotate_global_z(FRAC_PI_2.cos(), FRAC_PI_2.sin());

        let mut local = m;
        local.scale_local(Vec3::new(2.0, 1.0, 1.0));
        // Local X (world Y) is stretched
        assert!(vec_approx_eq(local.transform_vector(Vec3::X), Vec3::new(0.0, 2.0, 0.0)));

        let mut global = m;
        global.scale_global(Vec3::new(2.0, 1.0, 1.0));
        // World X is stretched, which is where local Y now points
        assert!(vec_approx_eq(global.transform_vector(Vec3::Y), Vec3::new(-2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotate_between() {
        let mut m = Affine3::IDENTITY;
        m.rotate_local_between(Vec3::X, Vec3::Y);
        assert!(vec_approx_eq(m.transform_vector(Vec3::X), Vec3::Y));

        let mut m = Affine3::IDENTITY;
        m.rotate_global_between(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 2.0, 0.0));
        assert!(vec_approx_eq(m.transform_vector(Vec3::Z), Vec3::Y));
    }

    #[test]
    fn test_rotate_between_degenerate_directions() {
        let mut same = Affine3::IDENTITY;
        same.rotate_local_between(Vec3::X, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(same, Affine3::IDENTITY);

        let mut opposite = Affine3::IDENTITY;
        opposite.rotate_local_between(Vec3::X, -Vec3::X);
        assert!(opposite.is_finite());
        assert!(vec_approx_eq(opposite.transform_vector(Vec3::X), -Vec3::X));
    }

    #[test]
    fn test_look_at() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Affine3::look_at(eye, Vec3::ZERO, Vec3::Y);

        assert!(vec_approx_eq(view.transform_point(eye), Vec3::ZERO));
        assert!(vec_approx_eq(view.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_look_at_off_axis() {
        let eye = Vec3::new(3.0, 2.0, -4.0);
        let target = Vec3::new(-1.0, 0.5, 2.0);
        let view = Affine3::look_at(eye, target, Vec3::Y);

        let distance = eye.distance(target);
        assert!(vec_approx_eq(view.transform_point(target), Vec3::new(0.0, 0.0, -distance)));
        assert!((view.determinant() - 1.0).abs() < EPSILON);
    }
}
