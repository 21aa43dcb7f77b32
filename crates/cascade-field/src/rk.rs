//! Equation of motion and the embedded Dormand–Prince 4(5) stepper.

use cascade_core::math::{self, Real3};

use crate::field::FieldSource;

/// Integration state: position [cm] and momentum [MeV/c].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OdeState {
    /// Position [cm].
    pub pos: Real3,
    /// Momentum [MeV/c].
    pub mom: Real3,
}

/// Derivative of [`OdeState`] with respect to path length.
#[derive(Clone, Copy, Debug)]
struct OdeDeriv {
    dpos: Real3,
    dmom: Real3,
}

/// Lorentz-force equation of motion for a charged particle.
///
/// With `u = p/|p|` the unit momentum, `dr/ds = u` and
/// `dp/ds = k q (u × B)` where `k` converts (e, T, cm) to MeV.
pub(crate) struct MagFieldEquation<'a, F: FieldSource + ?Sized> {
    field: &'a F,
    /// Charge [e] times the unit conversion factor.
    coeff: f64,
}

impl<'a, F: FieldSource + ?Sized> MagFieldEquation<'a, F> {
    pub(crate) fn new(field: &'a F, charge: f64) -> Self {
        Self {
            field,
            coeff: math::FIELD_FACTOR * charge,
        }
    }

    fn eval(&self, state: &OdeState) -> OdeDeriv {
        let u = math::unit(&state.mom);
        let b = self.field.value(&state.pos);
        OdeDeriv {
            dpos: u,
            dmom: math::scale(self.coeff, &math::cross(&u, &b)),
        }
    }
}

/// Result of one embedded step: the 5th-order end state plus the
/// component-wise difference to the 4th-order solution.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RkStep {
    pub(crate) end: OdeState,
    pub(crate) err_pos: f64,
    pub(crate) err_mom: f64,
}

// Dormand–Prince 4(5) tableau (the classic 7-stage pair).
const A: [[f64; 6]; 6] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

const B5: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

const B4: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

/// Advance `state` by exactly `h` [cm], returning the end state and
/// the embedded error estimate.
pub(crate) fn dormand_prince_step<F: FieldSource + ?Sized>(
    eq: &MagFieldEquation<'_, F>,
    state: &OdeState,
    h: f64,
) -> RkStep {
    let mut k: [OdeDeriv; 7] = [eq.eval(state); 7];
    for stage in 1..7 {
        let mut pos = state.pos;
        let mut mom = state.mom;
        for (j, kj) in k.iter().enumerate().take(stage) {
            let a = A[stage - 1][j];
            if a != 0.0 {
                pos = math::axpy(h * a, &kj.dpos, &pos);
                mom = math::axpy(h * a, &kj.dmom, &mom);
            }
        }
        k[stage] = eq.eval(&OdeState { pos, mom });
    }

    let mut end = *state;
    let mut err_pos = [0.0; 3];
    let mut err_mom = [0.0; 3];
    for (i, ki) in k.iter().enumerate() {
        if B5[i] != 0.0 {
            end.pos = math::axpy(h * B5[i], &ki.dpos, &end.pos);
            end.mom = math::axpy(h * B5[i], &ki.dmom, &end.mom);
        }
        let db = B5[i] - B4[i];
        if db != 0.0 {
            err_pos = math::axpy(h * db, &ki.dpos, &err_pos);
            err_mom = math::axpy(h * db, &ki.dmom, &err_mom);
        }
    }

    RkStep {
        end,
        err_pos: math::norm(&err_pos),
        err_mom: math::norm(&err_mom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::UniformField;

    #[test]
    fn straight_line_without_field() {
        let field = UniformField::along_z(0.0);
        let eq = MagFieldEquation::new(&field, -1.0);
        let state = OdeState {
            pos: [0.0; 3],
            mom: [10.0, 0.0, 0.0],
        };
        let step = dormand_prince_step(&eq, &state, 2.0);
        assert!((step.end.pos[0] - 2.0).abs() < 1e-12);
        assert_eq!(step.end.mom, [10.0, 0.0, 0.0]);
        assert!(step.err_pos < 1e-14);
    }

    #[test]
    fn momentum_magnitude_is_preserved() {
        // The Lorentz force does no work: |p| is an integral of motion.
        let field = UniformField::along_z(1.0);
        let eq = MagFieldEquation::new(&field, -1.0);
        let mut state = OdeState {
            pos: [0.0; 3],
            mom: [10.0, 0.0, 0.0],
        };
        for _ in 0..50 {
            state = dormand_prince_step(&eq, &state, 0.1).end;
        }
        let p = cascade_core::math::norm(&state.mom);
        assert!((p - 10.0).abs() < 1e-6, "|p| drifted to {p}");
    }

    proptest::proptest! {
        /// The magnetic force does no work for any field strength,
        /// charge, or substep size.
        #[test]
        fn momentum_magnitude_preserved_for_arbitrary_fields(
            tesla in -10.0f64..10.0,
            charge in -2.0f64..2.0,
            h in 1e-4f64..1.0,
        ) {
            let field = UniformField::along_z(tesla);
            let eq = MagFieldEquation::new(&field, charge);
            let state = OdeState {
                pos: [0.0; 3],
                mom: [5.0, 0.0, 1.0],
            };
            let p0 = cascade_core::math::norm(&state.mom);
            let step = dormand_prince_step(&eq, &state, h);
            let p1 = cascade_core::math::norm(&step.end.mom);
            proptest::prop_assert!((p1 - p0).abs() / p0 < 1e-6);
        }
    }

    #[test]
    fn neutral_particle_ignores_field() {
        let field = UniformField::along_z(5.0);
        let eq = MagFieldEquation::new(&field, 0.0);
        let state = OdeState {
            pos: [0.0; 3],
            mom: [0.0, 1.0, 0.0],
        };
        let step = dormand_prince_step(&eq, &state, 1.0);
        assert_eq!(step.end.mom, [0.0, 1.0, 0.0]);
        assert!((step.end.pos[1] - 1.0).abs() < 1e-12);
    }
}
