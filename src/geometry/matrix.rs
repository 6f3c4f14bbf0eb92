use crate::foundation::core::{Affine, Point, Rect};

const FIXED_ONE: f64 = 65536.0;

/// Affine placement transform in the shape coordinate model.
///
/// The linear part (`a`, `b`, `c`, `d`) is 16.16 fixed point; the translation is
/// in output units. Points map as `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Matrix {
    /// X scale / rotation cosine term (16.16).
    pub a: i32,
    /// Y shear term applied to x (16.16).
    pub b: i32,
    /// X shear term applied to y (16.16).
    pub c: i32,
    /// Y scale / rotation cosine term (16.16).
    pub d: i32,
    /// X translation.
    pub tx: i32,
    /// Y translation.
    pub ty: i32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

fn to_fixed(v: f64) -> i32 {
    (v * FIXED_ONE)
        .round()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

fn to_int(v: f64) -> i32 {
    v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

impl Matrix {
    /// Identity transform.
    pub const fn identity() -> Self {
        Self {
            a: 65536,
            b: 0,
            c: 0,
            d: 65536,
            tx: 0,
            ty: 0,
        }
    }

    /// Pure scale transform.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: to_fixed(sx),
            d: to_fixed(sy),
            ..Self::identity()
        }
    }

    /// Pure translation.
    pub fn translation(tx: i32, ty: i32) -> Self {
        Self {
            tx,
            ty,
            ..Self::identity()
        }
    }

    /// Replace the scale factors, keeping the current rotation.
    pub fn set_scale(&mut self, sx: f64, sy: f64) {
        let rotation = f64::from(self.b).atan2(f64::from(self.a));
        let (sin, cos) = rotation.sin_cos();
        self.a = to_fixed(sx * cos);
        self.b = to_fixed(sx * sin);
        self.c = to_fixed(-sy * sin);
        self.d = to_fixed(sy * cos);
    }

    /// Replace the translation.
    pub fn set_translation(&mut self, tx: f64, ty: f64) {
        self.tx = to_int(tx);
        self.ty = to_int(ty);
    }

    /// `self = self * m`: `m` is applied first, then the previous `self`.
    pub fn concatenate(&mut self, m: &Matrix) {
        let mul = |p: i32, q: i32| i64::from(p) * i64::from(q);
        let fixed = |v: i64| {
            ((v + (1 << 15)) >> 16).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };

        let a = fixed(mul(self.a, m.a) + mul(self.c, m.b));
        let b = fixed(mul(self.b, m.a) + mul(self.d, m.b));
        let c = fixed(mul(self.a, m.c) + mul(self.c, m.d));
        let d = fixed(mul(self.b, m.c) + mul(self.d, m.d));
        let tx = fixed(mul(self.a, m.tx) + mul(self.c, m.ty)).saturating_add(self.tx);
        let ty = fixed(mul(self.b, m.tx) + mul(self.d, m.ty)).saturating_add(self.ty);

        *self = Self { a, b, c, d, tx, ty };
    }

    /// Return `self * m` without mutating `self`.
    pub fn then_apply(mut self, m: &Matrix) -> Self {
        self.concatenate(m);
        self
    }

    /// Floating point view of this transform.
    pub fn to_affine(&self) -> Affine {
        Affine::new([
            f64::from(self.a) / FIXED_ONE,
            f64::from(self.b) / FIXED_ONE,
            f64::from(self.c) / FIXED_ONE,
            f64::from(self.d) / FIXED_ONE,
            f64::from(self.tx),
            f64::from(self.ty),
        ])
    }

    /// Quantise a floating point transform into the fixed representation.
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, tx, ty] = affine.as_coeffs();
        Self {
            a: to_fixed(a),
            b: to_fixed(b),
            c: to_fixed(c),
            d: to_fixed(d),
            tx: to_int(tx),
            ty: to_int(ty),
        }
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.to_affine().determinant()
    }

    /// Inverse transform, or `None` when the linear part is singular.
    pub fn invert(&self) -> Option<Matrix> {
        if self.determinant() == 0.0 {
            return None;
        }
        Some(Self::from_affine(self.to_affine().inverse()))
    }

    /// Map a point.
    pub fn transform_point(&self, p: Point) -> Point {
        self.to_affine() * p
    }

    /// Axis-aligned bounds of the transformed rectangle.
    pub fn transform_rect(&self, r: Rect) -> Rect {
        self.to_affine().transform_rect_bbox(r)
    }

    /// Length of the transformed x unit vector.
    pub fn x_scale(&self) -> f64 {
        (f64::from(self.a) / FIXED_ONE).hypot(f64::from(self.b) / FIXED_ONE)
    }

    /// Length of the transformed y unit vector.
    pub fn y_scale(&self) -> f64 {
        (f64::from(self.c) / FIXED_ONE).hypot(f64::from(self.d) / FIXED_ONE)
    }

    /// Worst relative error of the linear part from 16.16 rounding: half a
    /// unit over the smallest non-zero coefficient.
    pub(crate) fn relative_error(&self) -> f64 {
        [self.a, self.b, self.c, self.d]
            .into_iter()
            .map(i32::unsigned_abs)
            .filter(|&v| v != 0)
            .min()
            .map_or(0.0, |v| 0.5 / f64::from(v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/matrix.rs"]
mod tests;
