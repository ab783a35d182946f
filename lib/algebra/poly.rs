use std::collections::{ BTreeMap, BTreeSet };
use itertools::Itertools;
use num_rational::Rational64 as R64;
use rustc_hash::FxHashMap;
use crate::phase::Phase;
use super::Var;

/// A multilinear monomial: a set of distinct variables.
///
/// The empty monomial is the multiplicative unit and stands for the constant
/// term of a polynomial. Products are set unions, so no variable ever gains
/// an exponent above 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeSet<Var>);

impl Monomial {
    /// The empty monomial (the constant 1).
    pub fn unit() -> Self { Self(BTreeSet::new()) }

    /// A single-variable monomial.
    pub fn var(v: Var) -> Self {
        let mut set = BTreeSet::new();
        set.insert(v);
        Self(set)
    }

    /// Number of variables in the monomial.
    pub fn degree(&self) -> usize { self.0.len() }

    /// Return `true` if `self` is the empty monomial.
    pub fn is_unit(&self) -> bool { self.0.is_empty() }

    /// Return `true` if `self` contains `v`.
    pub fn contains(&self, v: &Var) -> bool { self.0.contains(v) }

    /// Iterate over the variables in canonical order.
    pub fn vars(&self) -> impl Iterator<Item = &Var> + '_ { self.0.iter() }

    /// The product of two monomials.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// A copy of `self` with `v` removed.
    pub fn without(&self, v: &Var) -> Self {
        let mut set = self.0.clone();
        set.remove(v);
        Self(set)
    }

    /// If `self` is a single variable, return it.
    pub fn as_var(&self) -> Option<&Var> {
        (self.0.len() == 1).then(|| self.0.iter().next().unwrap())
    }

    /// Evaluate under an assignment of the variables.
    pub fn eval<F>(&self, assign: F) -> bool
    where F: Fn(&Var) -> bool
    {
        self.0.iter().all(assign)
    }

    /// Apply a renaming to every variable.
    pub fn map_vars<F>(&self, map: F) -> Self
    where F: Fn(&Var) -> Var
    {
        Self(self.0.iter().map(map).collect())
    }
}

impl FromIterator<Var> for Monomial {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Var>
    {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Monomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unit() {
            write!(f, "1")
        } else {
            write!(f, "{}", self.0.iter().map(|v| v.to_string()).join("*"))
        }
    }
}

/// A multilinear polynomial over GF(2): a XOR of [`Monomial`]s.
///
/// Addition is symmetric difference of term sets; multiplication distributes
/// with multilinear reduction (x² = x). The empty monomial carries the
/// additive constant.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoolPoly {
    pub(crate) terms: BTreeSet<Monomial>,
}

impl BoolPoly {
    /// The zero polynomial.
    pub fn zero() -> Self { Self { terms: BTreeSet::new() } }

    /// The constant 1.
    pub fn one() -> Self {
        let mut terms = BTreeSet::new();
        terms.insert(Monomial::unit());
        Self { terms }
    }

    /// A single bare variable.
    pub fn var(v: Var) -> Self {
        let mut terms = BTreeSet::new();
        terms.insert(Monomial::var(v));
        Self { terms }
    }

    /// A single monomial.
    pub fn monomial(m: Monomial) -> Self {
        let mut terms = BTreeSet::new();
        terms.insert(m);
        Self { terms }
    }

    /// Return `true` if `self` is the zero polynomial.
    pub fn is_zero(&self) -> bool { self.terms.is_empty() }

    /// Return `true` if `self` is the constant 1.
    pub fn is_one(&self) -> bool {
        self.terms.len() == 1 && self.terms.contains(&Monomial::unit())
    }

    /// Return `true` if `self` is a constant (0 or 1).
    pub fn is_constant(&self) -> bool { self.degree() <= 0 }

    /// If `self` is exactly one bare variable (no constant), return it.
    pub fn as_var(&self) -> Option<Var> {
        if self.terms.len() != 1 { return None; }
        self.terms.iter().next().unwrap().as_var().cloned()
    }

    /// The degree of the highest-degree monomial; 0 for the constant 1 and
    /// −1 for the zero polynomial.
    pub fn degree(&self) -> i32 {
        self.terms.iter()
            .map(|m| m.degree() as i32)
            .max()
            .unwrap_or(-1)
    }

    /// Iterate over the terms in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = &Monomial> + '_ {
        self.terms.iter()
    }

    /// The set of all variables occurring in `self`.
    pub fn vars(&self) -> BTreeSet<Var> {
        self.terms.iter()
            .flat_map(|m| m.vars().cloned())
            .collect()
    }

    /// Return `true` if `v` occurs anywhere in `self`.
    pub fn contains_var(&self, v: &Var) -> bool {
        self.terms.iter().any(|m| m.contains(v))
    }

    // XOR a single monomial in
    pub(crate) fn toggle(&mut self, m: Monomial) {
        if !self.terms.remove(&m) { self.terms.insert(m); }
    }

    /// Multiply by a single monomial.
    pub fn mul_monomial(&self, m: &Monomial) -> Self {
        let mut res = Self::zero();
        for t in self.terms.iter() { res.toggle(t.union(m)); }
        res
    }

    /// The polynomial of all terms containing `v`, with `v` removed from
    /// each -- the coefficient of `v` viewed as a polynomial in the other
    /// variables.
    pub fn quotient(&self, v: &Var) -> Self {
        let mut res = Self::zero();
        for m in self.terms.iter().filter(|m| m.contains(v)) {
            res.toggle(m.without(v));
        }
        res
    }

    /// The polynomial of all terms not containing `v`.
    pub fn remainder(&self, v: &Var) -> Self {
        Self { terms:
            self.terms.iter()
                .filter(|m| !m.contains(v))
                .cloned()
                .collect()
        }
    }

    /// Replace every occurrence of `v` with the polynomial `p`.
    pub fn substitute(&self, v: &Var, p: &Self) -> Self {
        let mut res = self.remainder(v);
        for m in self.terms.iter().filter(|m| m.contains(v)) {
            res += p.mul_monomial(&m.without(v));
        }
        res
    }

    /// Replace every `Input(i)` with `subs[i]`, all at once.
    pub fn substitute_inputs(&self, subs: &[BoolPoly]) -> Self {
        let mut res = Self::zero();
        for m in self.terms.iter() {
            let mut prod = Self::one();
            for v in m.vars() {
                let factor = match v {
                    Var::Input(i) if *i < subs.len() => subs[*i].clone(),
                    _ => Self::var(v.clone()),
                };
                prod = &prod * &factor;
            }
            res += prod;
        }
        res
    }

    /// Evaluate under an assignment of the variables.
    pub fn eval<F>(&self, assign: F) -> bool
    where F: Fn(&Var) -> bool
    {
        self.terms.iter().fold(false, |acc, m| acc ^ m.eval(&assign))
    }

    /// Apply a renaming to every variable.
    ///
    /// A non-injective renaming merges colliding monomials with GF(2)
    /// cancellation.
    pub fn map_vars<F>(&self, map: F) -> Self
    where F: Fn(&Var) -> Var
    {
        let mut res = Self::zero();
        for m in self.terms.iter() { res.toggle(m.map_vars(&map)); }
        res
    }
}

impl std::ops::Add<BoolPoly> for BoolPoly {
    type Output = BoolPoly;

    fn add(mut self, rhs: BoolPoly) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign<BoolPoly> for BoolPoly {
    fn add_assign(&mut self, rhs: BoolPoly) {
        for m in rhs.terms.into_iter() { self.toggle(m); }
    }
}

impl std::ops::Mul<&BoolPoly> for &BoolPoly {
    type Output = BoolPoly;

    fn mul(self, rhs: &BoolPoly) -> Self::Output {
        let mut res = BoolPoly::zero();
        for m1 in self.terms.iter() {
            for m2 in rhs.terms.iter() {
                res.toggle(m1.union(m2));
            }
        }
        res
    }
}

impl std::fmt::Display for BoolPoly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            write!(f, "0")
        } else {
            write!(f, "{}", self.terms.iter().map(|m| m.to_string()).join(" + "))
        }
    }
}

// Pseudo-boolean polynomial with integer coefficients; the intermediate form
// for arithmetic lifts of GF(2) polynomials before scaling back into Phase
// coefficients.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct IntPoly {
    terms: BTreeMap<Monomial, i64>,
}

impl IntPoly {
    pub(crate) fn zero() -> Self { Self { terms: BTreeMap::new() } }

    pub(crate) fn one() -> Self { Self::monomial(Monomial::unit()) }

    pub(crate) fn monomial(m: Monomial) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(m, 1);
        Self { terms }
    }

    pub(crate) fn add_term(&mut self, m: Monomial, c: i64) {
        use std::collections::btree_map::Entry;
        if c == 0 { return; }
        match self.terms.entry(m) {
            Entry::Occupied(mut e) => {
                *e.get_mut() += c;
                if *e.get() == 0 { e.remove(); }
            },
            Entry::Vacant(e) => { e.insert(c); },
        }
    }

    pub(crate) fn mul(&self, rhs: &Self) -> Self {
        let mut res = Self::zero();
        for (m1, c1) in self.terms.iter() {
            for (m2, c2) in rhs.terms.iter() {
                res.add_term(m1.union(m2), c1 * c2);
            }
        }
        res
    }

    // the arithmetic lift of a GF(2) polynomial: a 0/1-valued integer
    // polynomial agreeing with `p` on every assignment, built by folding
    // L(a ⊕ b) = L(a) + L(b) − 2·L(a)·L(b)
    pub(crate) fn lift(p: &BoolPoly) -> Self {
        let mut acc = Self::zero();
        for m in p.terms.iter() {
            let term = Self::monomial(m.clone());
            let cross = acc.mul(&term);
            let mut next = acc.clone();
            for (m2, c) in term.terms.iter() { next.add_term(m2.clone(), *c); }
            for (m2, c) in cross.terms.iter() { next.add_term(m2.clone(), -2 * c); }
            acc = next;
        }
        acc
    }

    // scale every coefficient by `unit`, giving a phase polynomial
    pub(crate) fn scaled(&self, unit: Phase) -> PhasePoly {
        let mut res = PhasePoly::zero();
        for (m, c) in self.terms.iter() {
            res.add_term(m.clone(), unit * *c);
        }
        res
    }
}

/// A pseudo-boolean polynomial: a mapping from [`Monomial`]s to [`Phase`]
/// coefficients.
///
/// Zero coefficients are never stored. Substituting a GF(2) polynomial for a
/// variable goes through the arithmetic lift L(a ⊕ b) = a + b − 2ab so that
/// the substituted value enters the exponent as its actual 0/1 value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PhasePoly {
    pub(crate) terms: BTreeMap<Monomial, Phase>,
}

impl PhasePoly {
    /// The zero polynomial.
    pub fn zero() -> Self { Self { terms: BTreeMap::new() } }

    /// A single term.
    pub fn term(m: Monomial, a: Phase) -> Self {
        let mut res = Self::zero();
        res.add_term(m, a);
        res
    }

    /// Return `true` if `self` has no terms.
    pub fn is_zero(&self) -> bool { self.terms.is_empty() }

    /// Add `a` to the coefficient of `m`, dropping the term if the result is
    /// zero.
    pub fn add_term(&mut self, m: Monomial, a: Phase) {
        if a.is_zero() { return; }
        let entry = self.terms.entry(m.clone()).or_insert_with(Phase::zero);
        *entry += a;
        if entry.is_zero() { self.terms.remove(&m); }
    }

    /// Add a constant (the coefficient of the empty monomial).
    pub fn add_const(&mut self, a: Phase) {
        self.add_term(Monomial::unit(), a);
    }

    /// The coefficient of the empty monomial.
    pub fn constant_part(&self) -> Phase {
        self.terms.get(&Monomial::unit()).copied().unwrap_or_else(Phase::zero)
    }

    /// The coefficient of `m`.
    pub fn coeff(&self, m: &Monomial) -> Phase {
        self.terms.get(m).copied().unwrap_or_else(Phase::zero)
    }

    /// Iterate over (monomial, coefficient) pairs in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Phase)> + '_ {
        self.terms.iter()
    }

    /// The degree of the highest-degree monomial; 0 for constants and −1 for
    /// the zero polynomial.
    pub fn degree(&self) -> i32 {
        self.terms.keys()
            .map(|m| m.degree() as i32)
            .max()
            .unwrap_or(-1)
    }

    /// The set of all variables occurring in `self`.
    pub fn vars(&self) -> BTreeSet<Var> {
        self.terms.keys()
            .flat_map(|m| m.vars().cloned())
            .collect()
    }

    /// Return `true` if `v` occurs anywhere in `self`.
    pub fn contains_var(&self, v: &Var) -> bool {
        self.terms.keys().any(|m| m.contains(v))
    }

    /// Scale every coefficient by a rational, acting on reduced
    /// representatives.
    pub fn scale(&self, r: R64) -> Self {
        let mut res = Self::zero();
        for (m, a) in self.terms.iter() {
            res.add_term(m.clone(), *a * r);
        }
        res
    }

    /// The coefficient of `v`: all terms containing `v`, with `v` removed
    /// from each.
    pub fn quotient(&self, v: &Var) -> Self {
        let mut res = Self::zero();
        for (m, a) in self.terms.iter().filter(|(m, _)| m.contains(v)) {
            res.add_term(m.without(v), *a);
        }
        res
    }

    /// All terms not containing `v`.
    pub fn remainder(&self, v: &Var) -> Self {
        Self { terms:
            self.terms.iter()
                .filter(|(m, _)| !m.contains(v))
                .map(|(m, a)| (m.clone(), *a))
                .collect()
        }
    }

    /// Replace every occurrence of `v` with the GF(2) polynomial `p`,
    /// lifting `p` arithmetically.
    pub fn substitute(&self, v: &Var, p: &BoolPoly) -> Self {
        let lifted = IntPoly::lift(p);
        let mut res = self.remainder(v);
        for (m, a) in self.terms.iter().filter(|(m, _)| m.contains(v)) {
            let prod = lifted.mul(&IntPoly::monomial(m.without(v)));
            for (m2, c) in prod.terms.iter() {
                res.add_term(m2.clone(), *a * *c);
            }
        }
        res
    }

    /// Replace every `Input(i)` with `subs[i]`, all at once.
    ///
    /// This is the composition substitution: the polynomial is re-expressed
    /// over the outputs of a preceding path-sum.
    pub fn substitute_inputs(&self, subs: &[BoolPoly]) -> Self {
        let mut lifts: FxHashMap<usize, IntPoly> = FxHashMap::default();
        let mut res = Self::zero();
        for (m, a) in self.terms.iter() {
            let mut prod = IntPoly::one();
            for v in m.vars() {
                let factor = match v {
                    Var::Input(i) if *i < subs.len() => {
                        lifts.entry(*i)
                            .or_insert_with(|| IntPoly::lift(&subs[*i]))
                            .clone()
                    },
                    _ => IntPoly::monomial(Monomial::var(v.clone())),
                };
                prod = prod.mul(&factor);
            }
            for (m2, c) in prod.terms.iter() {
                res.add_term(m2.clone(), *a * *c);
            }
        }
        res
    }

    /// Coerce to a GF(2) polynomial `p` such that `self = π·p`, if every
    /// coefficient has order ≤ 2.
    pub fn to_bool(&self) -> Option<BoolPoly> {
        let mut p = BoolPoly::zero();
        for (m, a) in self.terms.iter() {
            if *a == Phase::pi() {
                p.toggle(m.clone());
            } else {
                return None;
            }
        }
        Some(p)
    }

    /// Return `true` if every coefficient has order ≤ 2.
    pub fn is_boolean(&self) -> bool {
        self.terms.values().all(|a| a.is_half_turn())
    }

    /// Build `unit · L(p)` where L is the arithmetic lift of `p`.
    pub fn lift_scaled(p: &BoolPoly, unit: Phase) -> Self {
        IntPoly::lift(p).scaled(unit)
    }

    /// Evaluate under an assignment of the variables.
    pub fn eval<F>(&self, assign: F) -> Phase
    where F: Fn(&Var) -> bool
    {
        self.terms.iter()
            .filter(|(m, _)| m.eval(&assign))
            .map(|(_, a)| *a)
            .sum()
    }

    /// Apply a renaming to every variable, merging colliding monomials.
    pub fn map_vars<F>(&self, map: F) -> Self
    where F: Fn(&Var) -> Var
    {
        let mut res = Self::zero();
        for (m, a) in self.terms.iter() {
            res.add_term(m.map_vars(&map), *a);
        }
        res
    }
}

impl std::ops::Add<PhasePoly> for PhasePoly {
    type Output = PhasePoly;

    fn add(mut self, rhs: PhasePoly) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign<PhasePoly> for PhasePoly {
    fn add_assign(&mut self, rhs: PhasePoly) {
        for (m, a) in rhs.terms.into_iter() { self.add_term(m, a); }
    }
}

impl std::ops::Sub<PhasePoly> for PhasePoly {
    type Output = PhasePoly;

    fn sub(mut self, rhs: PhasePoly) -> Self::Output {
        self -= rhs;
        self
    }
}

impl std::ops::SubAssign<PhasePoly> for PhasePoly {
    fn sub_assign(&mut self, rhs: PhasePoly) {
        for (m, a) in rhs.terms.into_iter() { self.add_term(m, -a); }
    }
}

impl std::ops::Neg for PhasePoly {
    type Output = PhasePoly;

    fn neg(self) -> Self::Output {
        let mut res = Self::zero();
        for (m, a) in self.terms.into_iter() { res.add_term(m, -a); }
        res
    }
}

impl std::fmt::Display for PhasePoly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            write!(f, "0")
        } else {
            write!(f, "{}",
                self.terms.iter()
                    .map(|(m, a)| format!("({})*{}", a, m))
                    .join(" + ")
            )
        }
    }
}
