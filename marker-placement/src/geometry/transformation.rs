use std::ops::{Add, Mul};

use anyhow::{Result, anyhow};
use ordered_float::NotNan;

//See https://pages.mtu.edu/~shene/COURSES/cs3621/NOTES/geometry/geo-tran.html

/// Affine transformation of the plane in matrix form.
///
/// All chaining methods ([`rotate`](Self::rotate), [`translate`](Self::translate), [`scale`](Self::scale),
/// [`transform`](Self::transform)) append the new operation *after* the current one:
/// `t.rotate(a).translate(d)` first applies `t`, then the rotation by `a` and finally the translation by `d`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformation {
    matrix: [[NotNan<f64>; 3]; 3],
}

impl Transformation {
    pub const fn identity() -> Self {
        Self {
            matrix: IDENTITY_MATRIX,
        }
    }

    pub fn from_translation((tx, ty): (f64, f64)) -> Self {
        Self {
            matrix: transl_m((tx, ty)),
        }
    }

    pub fn from_rotation(angle: f64) -> Self {
        Self {
            matrix: rot_m(angle),
        }
    }

    pub fn from_scale((sx, sy): (f64, f64)) -> Self {
        Self {
            matrix: scale_m((sx, sy)),
        }
    }

    /// Creates a transformation from the six coefficients `[a, b, c, d, e, f]`, in the order used by
    /// SVG's `matrix()` transform: `x' = a*x + c*y + e` and `y' = b*x + d*y + f`.
    pub fn from_matrix([a, b, c, d, e, f]: [f64; 6]) -> Result<Self> {
        let nn = |v: f64| NotNan::new(v).map_err(|_| anyhow!("matrix coefficient is NaN"));
        Ok(Self {
            matrix: [
                [nn(a)?, nn(c)?, nn(e)?],
                [nn(b)?, nn(d)?, nn(f)?],
                [_0, _0, _1],
            ],
        })
    }

    pub fn rotate(mut self, angle: f64) -> Self {
        self.matrix = dot_prod(&rot_m(angle), &self.matrix);
        self
    }

    pub fn translate(mut self, (tx, ty): (f64, f64)) -> Self {
        self.matrix = dot_prod(&transl_m((tx, ty)), &self.matrix);
        self
    }

    pub fn scale(mut self, (sx, sy): (f64, f64)) -> Self {
        self.matrix = dot_prod(&scale_m((sx, sy)), &self.matrix);
        self
    }

    /// Appends `other` after `self`
    pub fn transform(mut self, other: &Self) -> Self {
        self.matrix = dot_prod(&other.matrix, &self.matrix);
        self
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == IDENTITY_MATRIX
    }

    /// Determinant of the linear part, zero if the transformation collapses the plane onto a line or a point
    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.coefficients();
        a * d - b * c
    }

    pub fn matrix(&self) -> &[[NotNan<f64>; 3]; 3] {
        &self.matrix
    }

    /// Maps a single coordinate pair
    #[inline(always)]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.matrix;
        let t_x = m[0][0].into_inner() * x + m[0][1].into_inner() * y + m[0][2].into_inner();
        let t_y = m[1][0].into_inner() * x + m[1][1].into_inner() * y + m[1][2].into_inner();
        (t_x, t_y)
    }

    /// Returns the six coefficients in the same order as [`Transformation::from_matrix`]
    pub fn coefficients(&self) -> [f64; 6] {
        let m = &self.matrix;
        [
            m[0][0].into_inner(),
            m[1][0].into_inner(),
            m[0][1].into_inner(),
            m[1][1].into_inner(),
            m[0][2].into_inner(),
            m[1][2].into_inner(),
        ]
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

const _0: NotNan<f64> = unsafe { NotNan::new_unchecked(0.0) };
const _1: NotNan<f64> = unsafe { NotNan::new_unchecked(1.0) };

const IDENTITY_MATRIX: [[NotNan<f64>; 3]; 3] = [[_1, _0, _0], [_0, _1, _0], [_0, _0, _1]];

fn rot_m(angle: f64) -> [[NotNan<f64>; 3]; 3] {
    let (sin, cos) = angle.sin_cos();
    let cos = NotNan::new(cos).expect("cos is NaN");
    let sin = NotNan::new(sin).expect("sin is NaN");

    [[cos, -sin, _0], [sin, cos, _0], [_0, _0, _1]]
}

fn transl_m((tx, ty): (f64, f64)) -> [[NotNan<f64>; 3]; 3] {
    let h = NotNan::new(tx).expect("tx is NaN");
    let k = NotNan::new(ty).expect("ty is NaN");

    [[_1, _0, h], [_0, _1, k], [_0, _0, _1]]
}

fn scale_m((sx, sy): (f64, f64)) -> [[NotNan<f64>; 3]; 3] {
    let sx = NotNan::new(sx).expect("sx is NaN");
    let sy = NotNan::new(sy).expect("sy is NaN");

    [[sx, _0, _0], [_0, sy, _0], [_0, _0, _1]]
}

#[inline(always)]
fn dot_prod<T>(l: &[[T; 3]; 3], r: &[[T; 3]; 3]) -> [[T; 3]; 3]
where
    T: Add<Output = T> + Mul<Output = T> + Copy,
{
    [
        [
            l[0][0] * r[0][0] + l[0][1] * r[1][0] + l[0][2] * r[2][0],
            l[0][0] * r[0][1] + l[0][1] * r[1][1] + l[0][2] * r[2][1],
            l[0][0] * r[0][2] + l[0][1] * r[1][2] + l[0][2] * r[2][2],
        ],
        [
            l[1][0] * r[0][0] + l[1][1] * r[1][0] + l[1][2] * r[2][0],
            l[1][0] * r[0][1] + l[1][1] * r[1][1] + l[1][2] * r[2][1],
            l[1][0] * r[0][2] + l[1][1] * r[1][2] + l[1][2] * r[2][2],
        ],
        [
            l[2][0] * r[0][0] + l[2][1] * r[1][0] + l[2][2] * r[2][0],
            l[2][0] * r[0][1] + l[2][1] * r[1][1] + l[2][2] * r[2][1],
            l[2][0] * r[0][2] + l[2][1] * r[1][2] + l[2][2] * r[2][2],
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_maps(t: &Transformation, from: (f64, f64), to: (f64, f64)) {
        let (x, y) = t.apply(from.0, from.1);
        assert!(
            approx_eq!(f64, x, to.0, epsilon = 1e-9) && approx_eq!(f64, y, to.1, epsilon = 1e-9),
            "{from:?} mapped to {:?}, expected {to:?}",
            (x, y)
        );
    }

    #[test]
    fn identity_leaves_points_untouched() {
        let t = Transformation::identity();
        assert!(t.is_identity());
        assert_maps(&t, (3.0, -4.0), (3.0, -4.0));
    }

    #[test]
    fn chained_operations_apply_left_to_right() {
        // rotate first, translate second
        let t = Transformation::identity()
            .rotate(FRAC_PI_2)
            .translate((10.0, 0.0));
        assert_maps(&t, (1.0, 0.0), (10.0, 1.0));

        // translate first, rotate second
        let t = Transformation::identity()
            .translate((10.0, 0.0))
            .rotate(FRAC_PI_2);
        assert_maps(&t, (1.0, 0.0), (0.0, 11.0));
    }

    #[test]
    fn scale_then_rotate() {
        let t = Transformation::from_scale((2.0, 3.0)).rotate(FRAC_PI_2);
        assert_maps(&t, (1.0, 1.0), (-3.0, 2.0));
    }

    #[test]
    fn svg_matrix_coefficients_round_trip() {
        let coeffs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let t = Transformation::from_matrix(coeffs).unwrap();
        assert_eq!(t.coefficients(), coeffs);
        assert_maps(&t, (1.0, 1.0), (1.0 + 3.0 + 5.0, 2.0 + 4.0 + 6.0));
    }

    #[test]
    fn nan_coefficients_are_rejected() {
        assert!(Transformation::from_matrix([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn transform_appends_other() {
        let base = Transformation::from_scale((2.0, 2.0));
        let t = base.transform(&Transformation::from_translation((1.0, 1.0)));
        assert_maps(&t, (1.0, 1.0), (3.0, 3.0));
    }

    #[test]
    fn flattening_transformations_are_singular() {
        assert_eq!(Transformation::from_scale((0.0, 1.0)).determinant(), 0.0);
        assert_eq!(Transformation::from_scale((2.0, 3.0)).determinant(), 6.0);
        let t = Transformation::from_scale((2.0, 3.0))
            .rotate(1.0)
            .translate((5.0, -4.0));
        assert!(approx_eq!(f64, t.determinant(), 6.0, epsilon = 1e-9));
    }
}
