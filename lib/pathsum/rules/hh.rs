use super::*;

/// The Hadamard-Hadamard cancellation, solved instance: an internal path
/// variable `y` whose phase-polynomial quotient coerces to a GF(2)
/// polynomial `p` in which some other path variable `z` occurs exactly as a
/// bare monomial, i.e. `p = z ⊕ q` with `q` free of `z`.
///
/// Summing over `y` forces `z = q`; the rule substitutes `z ← q` everywhere,
/// drops `y`, and leaves the normalization exponent untouched (the now-unused
/// `z` falls to a following [`Elim`], which accounts for the factor of 2).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HHSolved;

/// The weaker linear instance of the Hadamard-Hadamard cancellation,
/// requiring the whole quotient `p` to be affine (degree ≤ 1).
///
/// Used only by [`Pathsum::simplify_once`]; [`Pathsum::grind`] matches the
/// more general [`HHSolved`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HHLinear;

/// Output of [`HHSolved::find`] and [`HHLinear::find`].
#[derive(Debug)]
pub struct HHData<'a> {
    pub(crate) sop: &'a mut Pathsum,
    pub(crate) y: usize,
    pub(crate) z: usize,
    pub(crate) q: BoolPoly,
}

// find an internal y whose quotient is boolean and solvable for a path
// variable; `max_degree` bounds the quotient degree (i32::MAX for none)
fn find_hh(sop: &Pathsum, max_degree: i32) -> Option<(usize, usize, BoolPoly)> {
    for y in 0..sop.path_vars() {
        if !sop.is_internal(y) { continue; }
        let Some(p) = sop.phase_poly().quotient(&Var::Path(y)).to_bool()
            else { continue };
        if p.degree() > max_degree { continue; }
        let solvable = p.vars().into_iter().find(|v| {
            v.is_path() && p.quotient(v).is_one()
        });
        if let Some(zv) = solvable {
            let q = p.remainder(&zv);
            let z = zv.path_index().unwrap();
            return Some((y, z, q));
        }
    }
    None
}

impl RuleFinder for HHSolved {
    type Output<'a> = HHData<'a>;

    fn find(self, sop: &mut Pathsum) -> Option<Self::Output<'_>> {
        let (y, z, q) = find_hh(sop, i32::MAX)?;
        Some(HHData { sop, y, z, q })
    }
}

impl RuleFinder for HHLinear {
    type Output<'a> = HHData<'a>;

    fn find(self, sop: &mut Pathsum) -> Option<Self::Output<'_>> {
        let (y, z, q) = find_hh(sop, 1)?;
        Some(HHData { sop, y, z, q })
    }
}

impl Rule for HHData<'_> {
    fn simplify(self) {
        let Self { sop, y, z, q } = self;
        sop.phase_poly = sop.phase_poly.remainder(&Var::Path(y));
        sop.substitute(&Var::Path(z), &q);
        sop.drop_path_var(y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_double_hadamard() {
        let mut sop = Pathsum::hadamard()
            .compose_rev(Pathsum::hadamard())
            .unwrap();
        let data = sop.find_rule(HHSolved).unwrap();
        assert_eq!(data.y, 0);
        assert_eq!(data.z, 1);
        assert_eq!(data.q, BoolPoly::var(Var::Input(0)));
        data.simplify();
        // y1 is now unused but still summed; Elim finishes the job
        assert_eq!(sop.path_vars(), 1);
        assert!(sop.phase_poly().is_zero());
        assert_eq!(sop.out_vals()[0], BoolPoly::var(Var::Input(0)));
        assert!(sop.simplify_rule(Elim));
        assert!(sop.is_trivial());
    }

    #[test]
    fn linear_variant_rejects_quadratic_quotients() {
        // phase = π·y0·(x0·x1 + y1), out = [y1, x1]: y0 is internal with a
        // degree-2 quotient, y1 is on an output, so only the solved instance
        // may fire (on y = y0, z = y1)
        let mut sop = Pathsum::identity(2);
        sop.path_vars = 2;
        sop.sde = 2;
        sop.out_vals[0] = BoolPoly::var(Var::Path(1));
        sop.phase_poly.add_term(
            [Var::Path(0), Var::Input(0), Var::Input(1)].into_iter().collect(),
            Phase::pi(),
        );
        sop.phase_poly.add_term(
            [Var::Path(0), Var::Path(1)].into_iter().collect(),
            Phase::pi(),
        );
        assert!(sop.clone().find_rule(HHLinear).is_none());
        let data = sop.find_rule(HHSolved).unwrap();
        assert_eq!(data.y, 0);
        assert_eq!(data.z, 1);
        data.simplify();
        assert_eq!(sop.path_vars(), 1);
        assert_eq!(
            sop.out_vals()[0],
            BoolPoly::monomial(
                [Var::Input(0), Var::Input(1)].into_iter().collect()),
        );
        assert!(sop.phase_poly().is_zero());
    }

    #[test]
    fn skips_non_boolean_quotients() {
        // phase = (π/2)·y0·x0 with y0 internal: not coercible to GF(2)
        let mut sop = Pathsum::identity(1);
        sop.path_vars = 1;
        sop.sde = 0;
        sop.phase_poly.add_term(
            [Var::Path(0), Var::Input(0)].into_iter().collect(),
            Phase::pi2(),
        );
        assert!(sop.find_rule(HHSolved).is_none());
    }

    #[test]
    fn substitution_rewrites_outputs() {
        // out = y1, phase = π·y0·(y1 + x0): forces y1 = x0 on the output
        let mut sop = Pathsum::identity(1);
        sop.path_vars = 2;
        sop.sde = 2;
        sop.out_vals[0] = BoolPoly::var(Var::Path(1));
        sop.phase_poly.add_term(
            [Var::Path(0), Var::Path(1)].into_iter().collect(),
            Phase::pi(),
        );
        sop.phase_poly.add_term(
            [Var::Path(0), Var::Input(0)].into_iter().collect(),
            Phase::pi(),
        );
        assert!(sop.simplify_rule(HHSolved));
        assert_eq!(sop.out_vals()[0], BoolPoly::var(Var::Input(0)));
        assert!(!sop.phase_poly().contains_var(&Var::Path(0)));
    }
}
