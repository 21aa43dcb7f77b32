//! Small three-vector helpers and physical constants.
//!
//! The engine works in a fixed unit system: lengths in cm, times in ns,
//! energies and momenta in MeV, magnetic fields in tesla. Helpers are
//! free functions over a plain `[f64; 3]` so state arrays stay POD.

/// A point or direction in three-space.
pub type Real3 = [f64; 3];

/// Speed of light in cm/ns.
pub const C_LIGHT: f64 = 29.979_245_8;

/// Momentum change per unit path for a unit charge in a unit field,
/// in MeV / (cm · T).
pub const FIELD_FACTOR: f64 = 2.997_924_58;

/// Dot product.
pub fn dot(a: &Real3, b: &Real3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a × b`.
pub fn cross(a: &Real3, b: &Real3) -> Real3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean norm.
pub fn norm(a: &Real3) -> f64 {
    dot(a, a).sqrt()
}

/// `a + b`.
pub fn add(a: &Real3, b: &Real3) -> Real3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// `a - b`.
pub fn sub(a: &Real3, b: &Real3) -> Real3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `s * a`.
pub fn scale(s: f64, a: &Real3) -> Real3 {
    [s * a[0], s * a[1], s * a[2]]
}

/// `y + s * x` (axpy).
pub fn axpy(s: f64, x: &Real3, y: &Real3) -> Real3 {
    [y[0] + s * x[0], y[1] + s * x[1], y[2] + s * x[2]]
}

/// Distance between two points.
pub fn distance(a: &Real3, b: &Real3) -> f64 {
    norm(&sub(a, b))
}

/// Unit vector along `a`.
///
/// Returns `a` unchanged when its norm is zero; callers validate
/// directions at the boundary of the system, not per call.
pub fn unit(a: &Real3) -> Real3 {
    let n = norm(a);
    if n > 0.0 {
        scale(1.0 / n, a)
    } else {
        *a
    }
}

/// Whether all components are finite.
pub fn is_finite(a: &Real3) -> bool {
    a.iter().all(|c| c.is_finite())
}

/// Whether `a` has unit norm to within `tol`.
pub fn is_unit(a: &Real3, tol: f64) -> bool {
    (norm(a) - 1.0).abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_axes() {
        let x = [1.0, 0.0, 0.0];
        let y = [0.0, 1.0, 0.0];
        assert_eq!(cross(&x, &y), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn unit_normalizes() {
        let v = unit(&[3.0, 4.0, 0.0]);
        assert!((norm(&v) - 1.0).abs() < 1e-12);
        assert!((v[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn unit_of_zero_is_zero() {
        assert_eq!(unit(&[0.0; 3]), [0.0; 3]);
    }

    #[test]
    fn axpy_matches_manual() {
        let r = axpy(2.0, &[1.0, 2.0, 3.0], &[10.0, 10.0, 10.0]);
        assert_eq!(r, [12.0, 14.0, 16.0]);
    }

    #[test]
    fn distance_and_finiteness() {
        assert_eq!(distance(&[1.0, 0.0, 0.0], &[1.0, 4.0, 3.0]), 5.0);
        assert!(is_finite(&[0.0, -1.0, 2.0]));
        assert!(!is_finite(&[0.0, f64::NAN, 0.0]));
        assert!(!is_finite(&[f64::INFINITY, 0.0, 0.0]));
    }
}
