//! Const-evaluable 3×3 matrices for color transforms.
//!
//! Every operation is a `const fn`, so colorant matrices and their
//! products/inverses can live in constants and be folded at compile time.

use core::ops::Mul;

/// Row-major 3×3 `f64` matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    m: [f64; 9],
}

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);

    /// Build from elements in row-major order.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
    ) -> Self {
        Self {
            m: [m00, m01, m02, m10, m11, m12, m20, m21, m22],
        }
    }

    /// Element at `(row, col)`.
    #[inline]
    pub const fn at(&self, row: usize, col: usize) -> f64 {
        self.m[row * 3 + col]
    }

    /// Matrix product `self * rhs`.
    pub const fn mul(&self, rhs: &Self) -> Self {
        Self::new(
            // First row of the result.
            self.at(0, 0) * rhs.at(0, 0) + self.at(0, 1) * rhs.at(1, 0) + self.at(0, 2) * rhs.at(2, 0),
            self.at(0, 0) * rhs.at(0, 1) + self.at(0, 1) * rhs.at(1, 1) + self.at(0, 2) * rhs.at(2, 1),
            self.at(0, 0) * rhs.at(0, 2) + self.at(0, 1) * rhs.at(1, 2) + self.at(0, 2) * rhs.at(2, 2),
            // Second row.
            self.at(1, 0) * rhs.at(0, 0) + self.at(1, 1) * rhs.at(1, 0) + self.at(1, 2) * rhs.at(2, 0),
            self.at(1, 0) * rhs.at(0, 1) + self.at(1, 1) * rhs.at(1, 1) + self.at(1, 2) * rhs.at(2, 1),
            self.at(1, 0) * rhs.at(0, 2) + self.at(1, 1) * rhs.at(1, 2) + self.at(1, 2) * rhs.at(2, 2),
            // Third row.
            self.at(2, 0) * rhs.at(0, 0) + self.at(2, 1) * rhs.at(1, 0) + self.at(2, 2) * rhs.at(2, 0),
            self.at(2, 0) * rhs.at(0, 1) + self.at(2, 1) * rhs.at(1, 1) + self.at(2, 2) * rhs.at(2, 1),
            self.at(2, 0) * rhs.at(0, 2) + self.at(2, 1) * rhs.at(1, 2) + self.at(2, 2) * rhs.at(2, 2),
        )
    }

    /// Every element multiplied by `s`.
    pub const fn scaled(&self, s: f64) -> Self {
        Self::new(
            self.at(0, 0) * s,
            self.at(0, 1) * s,
            self.at(0, 2) * s,
            self.at(1, 0) * s,
            self.at(1, 1) * s,
            self.at(1, 2) * s,
            self.at(2, 0) * s,
            self.at(2, 1) * s,
            self.at(2, 2) * s,
        )
    }

    /// Determinant.
    pub const fn determinant(&self) -> f64 {
        self.at(0, 0) * self.at(1, 1) * self.at(2, 2)
            + self.at(0, 1) * self.at(1, 2) * self.at(2, 0)
            + self.at(0, 2) * self.at(1, 0) * self.at(2, 1)
            - self.at(0, 0) * self.at(1, 2) * self.at(2, 1)
            - self.at(0, 1) * self.at(1, 0) * self.at(2, 2)
            - self.at(0, 2) * self.at(1, 1) * self.at(2, 0)
    }

    /// Inverse (adjugate over determinant).
    ///
    /// A singular matrix yields non-finite elements; callers hold the
    /// invariant that colorant matrices are invertible.
    pub const fn inverse(&self) -> Self {
        let adjugate = Self::new(
            self.at(1, 1) * self.at(2, 2) - self.at(1, 2) * self.at(2, 1),
            -(self.at(0, 1) * self.at(2, 2) - self.at(0, 2) * self.at(2, 1)),
            self.at(0, 1) * self.at(1, 2) - self.at(0, 2) * self.at(1, 1),
            -(self.at(1, 0) * self.at(2, 2) - self.at(1, 2) * self.at(2, 0)),
            self.at(0, 0) * self.at(2, 2) - self.at(0, 2) * self.at(2, 0),
            -(self.at(0, 0) * self.at(1, 2) - self.at(0, 2) * self.at(1, 0)),
            self.at(1, 0) * self.at(2, 1) - self.at(1, 1) * self.at(2, 0),
            -(self.at(0, 0) * self.at(2, 1) - self.at(0, 1) * self.at(2, 0)),
            self.at(0, 0) * self.at(1, 1) - self.at(0, 1) * self.at(1, 0),
        );
        adjugate.scaled(1.0 / self.determinant())
    }

    /// Apply to a column vector.
    #[inline]
    pub const fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        [
            self.at(0, 0) * v[0] + self.at(0, 1) * v[1] + self.at(0, 2) * v[2],
            self.at(1, 0) * v[0] + self.at(1, 1) * v[1] + self.at(1, 2) * v[2],
            self.at(2, 0) * v[0] + self.at(2, 1) * v[1] + self.at(2, 2) * v[2],
        ]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        Mat3::mul(&self, &rhs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
