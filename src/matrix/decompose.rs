//! Factoring composite transforms into elementary matrices.
//!
//! A composite matrix admits many factorizations. Two candidates are
//! computed for the linear part, one rotation-led and one shear-led, and the
//! one with the smaller total skew magnitude wins: skew is rare in authored
//! CSS, so the factorization that explains the map with rotation and scale
//! instead of large shear terms is almost always the one a human wrote.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::types::{Matrix, MatrixKind};

/// Factor a matrix into an ordered list of elementary transforms.
///
/// The composition of the returned list reproduces the input's overall map,
/// not necessarily the exact factors it was built from. The identity
/// decomposes to an empty list and any other elementary kind to itself.
///
/// ```
/// use cssmatrix::matrix::{decompose, Matrix};
///
/// let m = Matrix::new(0.825, 0.0, 0.0, 0.5775, 10.89, -17.71);
/// let factors = decompose(&m);
/// assert_eq!(factors, vec![
///     Matrix::translation(10.89, -17.71),
///     Matrix::scaling(0.825, 0.5775),
/// ]);
/// ```
pub fn decompose(matrix: &Matrix) -> Vec<Matrix> {
    match matrix.kind() {
        MatrixKind::Identity => Vec::new(),
        MatrixKind::Composite => decompose_composite(matrix),
        _ => vec![*matrix],
    }
}

fn decompose_composite(matrix: &Matrix) -> Vec<Matrix> {
    let (a, b) = (matrix.a(), matrix.b());
    let (c, d) = (matrix.c(), matrix.d());
    let (e, f) = (matrix.e(), matrix.f());

    let translation = Matrix::translation(e, f);
    let residual = Matrix::new(a, b, c, d, 0.0, 0.0);
    let has_translation = e != 0.0 || f != 0.0;

    // Translation plus a single elementary linear part needs no factoring.
    if has_translation && residual.kind() != MatrixKind::Composite {
        return vec![translation, residual];
    }

    let det = a * d - b * c;
    let qr = qr_factors(a, b, c, d, det);
    let lu = lu_factors(a, b, c, d, det);
    let linear = if skew_score(&lu) < skew_score(&qr) { lu } else { qr };

    let mut factors = Vec::with_capacity(4);
    factors.push(translation);
    factors.extend(linear);
    factors.retain(|m| m.kind() != MatrixKind::Identity);
    factors
}

/// Rotation-led factorization: rotate, scale, then a single skew.
///
/// Both branches reconstruct the linear part exactly. The second branch
/// needs the angle with `cos = d/s` and `sin = -c/s`; expressing it through
/// `acos(d/s)` keeps the quadrant right for every sign of `c` and `d`.
fn qr_factors(a: f64, b: f64, c: f64, d: f64, det: f64) -> Vec<Matrix> {
    if a != 0.0 && b != 0.0 {
        let r = a.hypot(b);
        let angle = (a / r).acos().copysign(b);
        vec![
            Matrix::rotation(angle),
            Matrix::scaling(r, det / r),
            Matrix::skew_x(((a * c + b * d) / (r * r)).atan()),
        ]
    } else if c != 0.0 || d != 0.0 {
        let s = c.hypot(d);
        let angle = if c > 0.0 { -(d / s).acos() } else { (d / s).acos() };
        vec![
            Matrix::rotation(angle),
            Matrix::scaling(det / s, s),
            Matrix::skew_y(((a * c + b * d) / (s * s)).atan()),
        ]
    } else {
        vec![Matrix::identity()]
    }
}

/// Shear-led factorization: skew, scale, skew.
fn lu_factors(a: f64, b: f64, c: f64, d: f64, det: f64) -> Vec<Matrix> {
    if a != 0.0 {
        vec![
            Matrix::skew_y((b / a).atan()),
            Matrix::scaling(a, det / a),
            Matrix::skew_x((c / a).atan()),
        ]
    } else if b != 0.0 {
        vec![
            Matrix::rotation(FRAC_PI_2),
            Matrix::scaling(b, det / b),
            Matrix::skew_x((d / b).atan()),
        ]
    } else {
        vec![
            Matrix::scaling(c, d),
            Matrix::skew_x(FRAC_PI_4),
            Matrix::scaling(0.0, 1.0),
        ]
    }
}

/// Total skew magnitude of a candidate; non-skew factors contribute nothing.
fn skew_score(factors: &[Matrix]) -> f64 {
    factors
        .iter()
        .map(|m| match m.kind() {
            MatrixKind::SkewX => m.c().atan().abs(),
            MatrixKind::SkewY => m.b().atan().abs(),
            _ => 0.0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(m: &Matrix, expected: &Matrix) {
        for (lhs, rhs) in m.css_vector().iter().zip(expected.css_vector().iter()) {
            assert!(
                (lhs - rhs).abs() < 1e-9,
                "expected {}, got {}",
                expected,
                m
            );
        }
    }

    #[test]
    fn test_decompose_identity_is_empty() {
        assert!(decompose(&Matrix::identity()).is_empty());
    }

    #[test]
    fn test_decompose_elementary_is_itself() {
        for m in [
            Matrix::translation(3.0, -4.0),
            Matrix::scaling(2.0, 0.5),
            Matrix::rotation(1.0),
            Matrix::skew_x(0.3),
            Matrix::skew_y(-0.2),
        ] {
            let factors = decompose(&m);
            assert_eq!(factors.len(), 1);
            assert_eq!(factors[0], m);
            assert_eq!(factors[0].kind(), m.kind());
        }
    }

    #[test]
    fn test_decompose_translate_scale_shortcut() {
        let m = Matrix::new(0.825, 0.0, 0.0, 0.5775, 10.89, -17.71);
        let factors = decompose(&m);
        assert_eq!(
            factors,
            vec![Matrix::translation(10.89, -17.71), Matrix::scaling(0.825, 0.5775)]
        );
        assert_eq!(factors[0].kind(), MatrixKind::Translate);
        assert_eq!(factors[1].kind(), MatrixKind::Scale);
    }

    #[test]
    fn test_decompose_single_axis_translation_kept() {
        // e nonzero with f zero still yields a translation factor.
        let m = Matrix::new(2.0, 0.0, 0.0, 3.0, 7.0, 0.0);
        let factors = decompose(&m);
        assert_eq!(factors, vec![Matrix::translation(7.0, 0.0), Matrix::scaling(2.0, 3.0)]);
    }

    #[test]
    fn test_decompose_rotate_scale_prefers_rotation() {
        // rotate(30deg) then scale(2, 1): the rotation-led candidate has zero
        // skew and must win over the shear-led one.
        let m = Matrix::compose(&[Matrix::rotation(PI / 6.0), Matrix::scaling(2.0, 1.0)]);
        let factors = decompose(&m);
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].kind(), MatrixKind::Rotate);
        assert_eq!(factors[1].kind(), MatrixKind::Scale);
        assert_close(&Matrix::compose(&factors), &m);
    }

    #[test]
    fn test_decompose_recomposes_general_matrix() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let factors = decompose(&m);
        assert_eq!(factors[0], Matrix::translation(5.0, 6.0));
        assert_close(&Matrix::compose(&factors), &m);
    }

    #[test]
    fn test_decompose_skew_heavy_matrix() {
        // translate + skewX only: the residual linear part is already an
        // elementary skew, so no factoring happens.
        let m = Matrix::compose(&[Matrix::translation(1.0, 2.0), Matrix::skew_x(0.4)]);
        let factors = decompose(&m);
        assert_eq!(factors, vec![Matrix::translation(1.0, 2.0), Matrix::skew_x(0.4)]);
    }

    #[test]
    fn test_decompose_zero_column_linear_part() {
        // a = b = 0 forces the rotation-led fallback branch.
        let m = Matrix::new(0.0, 0.0, 1.5, -2.0, 3.0, 0.0);
        let factors = decompose(&m);
        assert_close(&Matrix::compose(&factors), &m);
    }

    #[test]
    fn test_decompose_rotation_with_translation() {
        let m = Matrix::compose(&[Matrix::translation(10.0, 0.0), Matrix::rotation(1.1)]);
        let factors = decompose(&m);
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0], Matrix::translation(10.0, 0.0));
        assert_eq!(factors[1].kind(), MatrixKind::Rotate);
        assert_close(&Matrix::compose(&factors), &m);
    }

    #[test]
    fn test_decompose_drops_identity_factors() {
        // Zero translation on a composite linear part: no translation factor
        // in the output.
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 0.0, 0.0);
        let factors = decompose(&m);
        assert!(factors.iter().all(|f| f.kind() != MatrixKind::Identity));
        assert!(factors.iter().all(|f| f.kind() != MatrixKind::Translate));
        assert_close(&Matrix::compose(&factors), &m);
    }

    #[test]
    fn test_decompose_negative_determinant() {
        // A reflection mixed into the map; recomposition still holds.
        let m = Matrix::new(-1.5, 0.5, 2.0, 1.0, 4.0, -1.0);
        let factors = decompose(&m);
        assert_close(&Matrix::compose(&factors), &m);
    }

    #[test]
    fn test_qr_branch_negative_rotation() {
        // b < 0 must produce a negative rotation angle, not its mirror.
        let m = Matrix::compose(&[Matrix::rotation(-0.7), Matrix::scaling(3.0, 2.0)]);
        let factors = decompose(&m);
        assert_eq!(factors[0].kind(), MatrixKind::Rotate);
        let angle = factors[0].b().atan2(factors[0].a());
        assert!((angle + 0.7).abs() < 1e-9);
        assert_close(&Matrix::compose(&factors), &m);
    }
}
