//! Degenerate transform errors
//!
//! Returned by the checked variants of operations whose unchecked fast path
//! silently produces infinities or NaNs.

use std::fmt;

/// A transform or vector that cannot be inverted, normalized or projected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegenerateTransform {
    /// The matrix has a zero determinant and no inverse
    SingularMatrix {
        /// The determinant that was computed
        determinant: f32,
    },
    /// The vector is too short to be normalized
    ZeroLengthVector,
    /// A projection was requested with `far == near`
    EmptyDepthRange {
        /// Near clipping plane
        near: f32,
        /// Far clipping plane
        far: f32,
    },
}

impl fmt::Display for DegenerateTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateTransform::SingularMatrix { determinant } => {
                write!(f, "Singular matrix (determinant = {})", determinant)
            }
            DegenerateTransform::ZeroLengthVector => {
                write!(f, "Cannot normalize a zero-length vector")
            }
            DegenerateTransform::EmptyDepthRange { near, far } => {
                write!(f, "Empty depth range: near = {}, far = {}", near, far)
            }
        }
    }
}

impl std::error::Error for DegenerateTransform {}
