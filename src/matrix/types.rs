//! Matrix value type, classification, and named factories.

use std::fmt;

use super::algebra::{self, Mat3, SingularMatrixError};
use super::decompose;
use crate::parse::{self, ParseError};

/// Classification of a matrix into elementary transform kinds.
///
/// Every matrix carries exactly one kind, derived from its coefficients at
/// construction time. `Composite` covers everything that is not expressible
/// as a single elementary transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    Identity,
    Translate,
    Scale,
    Rotate,
    SkewX,
    SkewY,
    Composite,
}

impl MatrixKind {
    /// Lowercase name used in CLI reports and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            MatrixKind::Identity => "identity",
            MatrixKind::Translate => "translate",
            MatrixKind::Scale => "scale",
            MatrixKind::Rotate => "rotate",
            MatrixKind::SkewX => "skewX",
            MatrixKind::SkewY => "skewY",
            MatrixKind::Composite => "composite",
        }
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable 2D affine transform in the CSS `matrix(a, b, c, d, e, f)`
/// convention.
///
/// The linear part is `[[a, c], [b, d]]` and `(e, f)` is the translation,
/// giving the augmented form `[[a, c, e], [b, d, f], [0, 0, 1]]`. Values are
/// never mutated; operations that "change" a matrix return a new one, and the
/// kind tag is computed once when the value is built.
///
/// Two matrices with identical coefficients compare equal no matter how they
/// were constructed:
///
/// ```
/// use cssmatrix::matrix::Matrix;
///
/// assert_eq!(Matrix::new(1.0, 0.0, 0.0, 1.0, 3.0, 0.0), Matrix::translation(3.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
    kind: MatrixKind,
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.css_vector() == other.css_vector()
    }
}

impl Matrix {
    /// Build a matrix from raw CSS coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        let kind = classify(a, b, c, d, e, f);
        Self { a, b, c, d, e, f, kind }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Scaling by `sx` along x and `sy` along y.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `radians`.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Skew along the x axis by `radians`.
    pub fn skew_x(radians: f64) -> Self {
        Self::new(1.0, 0.0, radians.tan(), 1.0, 0.0, 0.0)
    }

    /// Skew along the y axis by `radians`.
    pub fn skew_y(radians: f64) -> Self {
        Self::new(1.0, radians.tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Skew along both axes.
    pub fn skew(ax: f64, ay: f64) -> Self {
        Self::new(1.0, ay.tan(), ax.tan(), 1.0, 0.0, 0.0)
    }

    /// Build a matrix from its row-major 3x3 augmented form.
    ///
    /// The bottom row is assumed to be `[0, 0, 1]` and is not read.
    pub fn from_rows(rows: Mat3) -> Self {
        Self::new(rows[0][0], rows[1][0], rows[0][1], rows[1][1], rows[0][2], rows[1][2])
    }

    /// Parse a CSS transform-list string and compose it into one matrix.
    ///
    /// 3D functions are tolerated and skipped, matching the lenient parser
    /// mode; callers that need the diagnostics should use
    /// [`parse_transform`](crate::parse::parse_transform) directly.
    ///
    /// ```
    /// use cssmatrix::matrix::Matrix;
    ///
    /// let m = Matrix::from_css("translate(10px, 5px)").unwrap();
    /// assert_eq!(m.css_vector(), [1.0, 0.0, 0.0, 1.0, 10.0, 5.0]);
    /// ```
    pub fn from_css(input: &str) -> Result<Self, ParseError> {
        let outcome = parse::parse_transform(input, false)?;
        Ok(Self::compose(&outcome.matrices))
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn e(&self) -> f64 {
        self.e
    }

    pub fn f(&self) -> f64 {
        self.f
    }

    /// The kind tag derived from the coefficients.
    pub fn kind(&self) -> MatrixKind {
        self.kind
    }

    pub fn is_identity(&self) -> bool {
        self.kind == MatrixKind::Identity
    }

    /// The flat `[a, b, c, d, e, f]` coefficient vector.
    pub fn css_vector(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// The row-major 3x3 augmented form.
    pub fn rows(&self) -> Mat3 {
        [
            [self.a, self.c, self.e],
            [self.b, self.d, self.f],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Matrix product `self * other`.
    ///
    /// The result's kind is recomputed from the product coefficients; two
    /// matrices of the same elementary kind can compose to a different kind
    /// or to a composite.
    pub fn dot(&self, other: &Matrix) -> Matrix {
        Matrix::from_rows(algebra::mul(&self.rows(), &other.rows()))
    }

    /// Left-fold a list of matrices into a single product.
    ///
    /// An empty list composes to the identity; a single matrix passes
    /// through with identical coefficients.
    pub fn compose(matrices: &[Matrix]) -> Matrix {
        matrices.iter().fold(Matrix::identity(), |acc, m| acc.dot(m))
    }

    /// The inverse transform, or an error if the matrix is singular.
    pub fn inverse(&self) -> Result<Matrix, SingularMatrixError> {
        Ok(Matrix::from_rows(algebra::invert(&self.rows())?))
    }

    /// Apply the transform to the point `(x, y)`.
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        if self.kind == MatrixKind::Identity {
            return (x, y);
        }
        let [px, py, _] = algebra::mul_vec(&self.rows(), [x, y, 1.0]);
        (px, py)
    }

    /// Factor this matrix into an ordered list of elementary transforms.
    ///
    /// The identity decomposes to an empty list, any other elementary kind
    /// to a one-element list, and a composite to translation followed by
    /// rotate/scale/skew factors. See [`decompose`](super::decompose) for
    /// how the factorization is chosen.
    pub fn decompose(&self) -> Vec<Matrix> {
        decompose::decompose(self)
    }

    /// One-line human-readable description of what this matrix does.
    pub fn describe(&self) -> String {
        match self.kind {
            MatrixKind::Identity => "Identity (leaves points unchanged)".to_string(),
            MatrixKind::Translate => format!("Translate by ({}, {})", self.e, self.f),
            MatrixKind::Scale => format!("Scale x by {}, y by {}", self.a, self.d),
            MatrixKind::Rotate => {
                format!("Rotate by {:.2}°", self.b.atan2(self.a).to_degrees())
            }
            MatrixKind::SkewX => {
                format!("Skew x by {:.2}°", self.c.atan().to_degrees())
            }
            MatrixKind::SkewY => {
                format!("Skew y by {:.2}°", self.b.atan().to_degrees())
            }
            MatrixKind::Composite => "Composite transform".to_string(),
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// Derive the kind tag from raw coefficients.
///
/// Order matters and the first match wins. Comparisons against 0 and 1 are
/// exact; a matrix that is numerically close to an elementary kind but not
/// equal to it is composite.
///
/// A pure translation requires only the linear part to be the identity;
/// either of `e`, `f` may be zero as long as both are not.
fn classify(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> MatrixKind {
    let linear_identity = a == 1.0 && d == 1.0 && b == 0.0 && c == 0.0;
    let no_translation = e == 0.0 && f == 0.0;

    if linear_identity && no_translation {
        return MatrixKind::Identity;
    }
    if linear_identity {
        return MatrixKind::Translate;
    }
    if b == 0.0 && c == 0.0 && no_translation {
        return MatrixKind::Scale;
    }
    if a == 1.0 && d == 1.0 && c != 0.0 && b == 0.0 && no_translation {
        return MatrixKind::SkewX;
    }
    if a == 1.0 && d == 1.0 && b != 0.0 && c == 0.0 && no_translation {
        return MatrixKind::SkewY;
    }
    let unit_range = [a, b, c, d].iter().all(|v| (-1.0..=1.0).contains(v));
    if unit_range && no_translation && a == d && b == -c {
        return MatrixKind::Rotate;
    }
    MatrixKind::Composite
}
