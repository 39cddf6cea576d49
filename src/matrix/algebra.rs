//! 3x3 augmented-matrix algebra
//!
//! The affine transforms in this crate are 2D, but all arithmetic runs over
//! the 3x3 augmented form `[[a, c, e], [b, d, f], [0, 0, 1]]` so translation
//! composes and inverts with the same code paths as the linear part.

use thiserror::Error;

/// Row-major 3x3 augmented matrix.
pub type Mat3 = [[f64; 3]; 3];

/// The 3x3 identity matrix.
pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Error returned when inverting a matrix that has no inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("matrix is singular and has no inverse")]
pub struct SingularMatrixError;

/// Multiply a matrix by a column vector (rows times vector).
///
/// Point transforms pass `[x, y, 1.0]` so the translation column applies.
pub fn mul_vec(m: &Mat3, v: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (slot, row) in out.iter_mut().zip(m.iter()) {
        *slot = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
    }
    out
}

/// 3x3 matrix product `m1 * m2` (m1 rows times m2 columns).
pub fn mul(m1: &Mat3, m2: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = m1[i][0] * m2[0][j] + m1[i][1] * m2[1][j] + m1[i][2] * m2[2][j];
        }
    }
    out
}

/// Invert a 3x3 matrix by Gauss-Jordan elimination.
///
/// Elimination runs in parallel against an accumulator initialized to the
/// identity: row swaps, pivot scaling, and row subtraction apply to both, so
/// when the source reaches the identity the accumulator holds the inverse.
///
/// A zero pivot is repaired by swapping with the first row below that has a
/// nonzero entry in the pivot column; if no such row exists the matrix is
/// singular.
pub fn invert(m: &Mat3) -> Result<Mat3, SingularMatrixError> {
    let mut src = *m;
    let mut acc = IDENTITY;

    for pivot in 0..3 {
        if src[pivot][pivot] == 0.0 {
            let swap = (pivot + 1..3)
                .find(|&row| src[row][pivot] != 0.0)
                .ok_or(SingularMatrixError)?;
            src.swap(pivot, swap);
            acc.swap(pivot, swap);
        }

        let scale = src[pivot][pivot];
        for col in 0..3 {
            src[pivot][col] /= scale;
            acc[pivot][col] /= scale;
        }

        for row in 0..3 {
            if row == pivot {
                continue;
            }
            let factor = src[row][pivot];
            if factor == 0.0 {
                continue;
            }
            for col in 0..3 {
                src[row][col] -= factor * src[pivot][col];
                acc[row][col] -= factor * acc[pivot][col];
            }
        }
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat3_close(actual: &Mat3, expected: &Mat3) {
        for (row_a, row_e) in actual.iter().zip(expected.iter()) {
            for (lhs, rhs) in row_a.iter().zip(row_e.iter()) {
                assert!((lhs - rhs).abs() < 1e-9, "expected {:?}, got {:?}", expected, actual);
            }
        }
    }

    #[test]
    fn test_mul_vec_identity() {
        assert_eq!(mul_vec(&IDENTITY, [3.0, -4.0, 1.0]), [3.0, -4.0, 1.0]);
    }

    #[test]
    fn test_mul_vec_translation() {
        let m: Mat3 = [[1.0, 0.0, 5.0], [0.0, 1.0, -2.0], [0.0, 0.0, 1.0]];
        assert_eq!(mul_vec(&m, [10.0, 5.0, 1.0]), [15.0, 3.0, 1.0]);
    }

    #[test]
    fn test_mul_identity_is_neutral() {
        let m: Mat3 = [[0.5, -0.1, 10.0], [0.1, 0.9, -20.0], [0.0, 0.0, 1.0]];
        assert_eq!(mul(&IDENTITY, &m), m);
        assert_eq!(mul(&m, &IDENTITY), m);
    }

    #[test]
    fn test_mul_order_matters() {
        let scale: Mat3 = [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]];
        let translate: Mat3 = [[1.0, 0.0, 3.0], [0.0, 1.0, 4.0], [0.0, 0.0, 1.0]];
        // Scale-then-translate moves by (3, 4); translate-then-scale by (6, 8).
        assert_eq!(mul(&scale, &translate)[0][2], 6.0);
        assert_eq!(mul(&translate, &scale)[0][2], 3.0);
    }

    #[test]
    fn test_invert_identity() {
        assert_eq!(invert(&IDENTITY).unwrap(), IDENTITY);
    }

    #[test]
    fn test_invert_roundtrip() {
        let m: Mat3 = [[2.0, 1.0, 5.0], [0.5, 3.0, -3.0], [0.0, 0.0, 1.0]];
        let inv = invert(&m).unwrap();
        assert_mat3_close(&mul(&m, &inv), &IDENTITY);
        assert_mat3_close(&mul(&inv, &m), &IDENTITY);
    }

    #[test]
    fn test_invert_needs_row_swap() {
        // Zero in the top-left pivot forces a swap with the row below.
        let m: Mat3 = [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let inv = invert(&m).unwrap();
        assert_mat3_close(&mul(&m, &inv), &IDENTITY);
    }

    #[test]
    fn test_invert_singular() {
        let zero: Mat3 = [[0.0; 3]; 3];
        assert_eq!(invert(&zero), Err(SingularMatrixError));

        // Rank-deficient linear part: second column is twice the first.
        let collapsed: Mat3 = [[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(invert(&collapsed), Err(SingularMatrixError));
    }

    #[test]
    fn test_singular_error_display() {
        assert_eq!(SingularMatrixError.to_string(), "matrix is singular and has no inverse");
    }
}
