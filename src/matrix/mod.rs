//! 2D affine transform matrices in the CSS `matrix(a, b, c, d, e, f)`
//! convention.
//!
//! # Module Structure
//!
//! - [`types`] - The immutable [`Matrix`] value type, kind classification,
//!   and named factories
//! - [`algebra`] - 3x3 augmented-matrix products and Gauss-Jordan inversion
//! - [`decompose`] - Factoring a composite matrix into elementary transforms

pub mod algebra;
pub mod decompose;
pub mod types;

// Re-export main types at the module level for convenience
pub use algebra::{invert, mul, mul_vec, Mat3, SingularMatrixError};
pub use decompose::decompose;
pub use types::{Matrix, MatrixKind};
