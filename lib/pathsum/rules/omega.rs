use super::*;

/// The ω rule: an internal path variable `y` whose phase-polynomial quotient
/// becomes boolean after adding a quarter turn.
///
/// With quotient Q = π·p − π/2 for GF(2) `p`, summing over `y` gives
/// 1 + e^(iQ) = √2 · e^(−iπ/4) · e^(iπ·p/2), so the rule conjugates by the
/// known scalar: the residual phase gains −π/4 plus the quarter-turn-scaled
/// lift of `p`, and both the normalization exponent and the path-variable
/// count drop by one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Omega;

/// Output of [`Omega::find`].
#[derive(Debug)]
pub struct OmegaData<'a> {
    pub(crate) sop: &'a mut Pathsum,
    pub(crate) y: usize,
    pub(crate) p: BoolPoly,
}

impl RuleFinder for Omega {
    type Output<'a> = OmegaData<'a>;

    fn find(self, sop: &mut Pathsum) -> Option<Self::Output<'_>> {
        for y in 0..sop.path_vars() {
            if !sop.is_internal(y) { continue; }
            let mut quot = sop.phase_poly().quotient(&Var::Path(y));
            quot.add_const(Phase::pi2());
            if let Some(p) = quot.to_bool() {
                return Some(OmegaData { sop, y, p });
            }
        }
        None
    }
}

impl Rule for OmegaData<'_> {
    fn simplify(self) {
        let Self { sop, y, p } = self;
        sop.phase_poly = sop.phase_poly.remainder(&Var::Path(y));
        sop.phase_poly.add_const(-Phase::pi4());
        sop.phase_poly += crate::algebra::PhasePoly::lift_scaled(&p, Phase::pi2());
        sop.sde -= 1;
        sop.drop_path_var(y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{ Monomial, PhasePoly };

    #[test]
    fn fires_on_hsh() {
        // H·S·H leaves an internal variable with quotient π·x0 + π/2 + π·y1
        let mut sop = Pathsum::hadamard()
            .compose_rev(Pathsum::sgate()).unwrap()
            .compose_rev(Pathsum::hadamard()).unwrap();
        assert!(sop.find_rule(HHSolved).is_none());
        let data = sop.find_rule(Omega).unwrap();
        assert_eq!(data.y, 0);
        assert_eq!(
            data.p,
            BoolPoly::var(Var::Input(0))
                + BoolPoly::var(Var::Path(1))
                + BoolPoly::one(),
        );
        data.simplify();
        assert_eq!(sop.sde(), 1);
        assert_eq!(sop.path_vars(), 1);
        assert_eq!(sop.out_vals()[0], BoolPoly::var(Var::Path(0)));

        // e^(iπ/4)/√2 · Σ_y exp(2πi(3/4·x0 + 3/4·y + 1/2·x0·y)) |y⟩⟨x0|
        let mut expected = PhasePoly::zero();
        expected.add_const(Phase::pi4());
        expected.add_term(Monomial::var(Var::Input(0)), Phase::new(3, 4));
        expected.add_term(Monomial::var(Var::Path(0)), Phase::new(3, 4));
        expected.add_term(
            [Var::Input(0), Var::Path(0)].into_iter().collect(),
            Phase::pi(),
        );
        assert_eq!(sop.phase_poly(), &expected);
    }

    #[test]
    fn skips_plain_boolean_quotients() {
        // quotient π·x0 is boolean as-is; adding a quarter turn breaks it
        let mut sop = Pathsum::identity(1);
        sop.path_vars = 1;
        sop.phase_poly.add_term(
            [Var::Path(0), Var::Input(0)].into_iter().collect(),
            Phase::pi(),
        );
        assert!(sop.find_rule(Omega).is_none());
    }
}
