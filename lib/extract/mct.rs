//! Decomposition of multi-controlled NOT gates into X, CNOT, and Toffoli.
//!
//! A gate with more than two controls is lowered recursively with one
//! borrowed scratch wire per recursion level: the target is toggled by the
//! last control together with the scratch both before and after the prefix
//! conjunction is XORed onto the scratch, so the construction is correct for
//! any initial scratch value and returns every scratch wire to it.

use rustc_hash::FxHashSet;
use crate::circuit::Gate;

/// Allocator for scratch wire names, skipping any name the caller already
/// uses.
#[derive(Clone, Debug)]
pub(crate) struct ScratchAlloc {
    used: FxHashSet<String>,
    next: usize,
    pub(crate) allocated: Vec<String>,
}

impl ScratchAlloc {
    pub(crate) fn new<'a, I>(used: I) -> Self
    where I: IntoIterator<Item = &'a String>
    {
        Self {
            used: used.into_iter().cloned().collect(),
            next: 0,
            allocated: Vec::new(),
        }
    }

    pub(crate) fn fresh(&mut self) -> String {
        loop {
            let name = format!("anc{}", self.next);
            self.next += 1;
            if self.used.insert(name.clone()) {
                self.allocated.push(name.clone());
                return name;
            }
        }
    }
}

// dirty-ancilla ladder: t toggles on ck·s and ck·(s ⊕ A) for prefix
// conjunction A, netting ck·A; the second prefix application restores s
fn lower(controls: &[String], target: &str, alloc: &mut ScratchAlloc, out: &mut Vec<Gate>) {
    match controls {
        [] => { out.push(Gate::x(target)); },
        [c] => { out.push(Gate::cx(c.as_str(), target)); },
        [c0, c1] => { out.push(Gate::ccx(c0.as_str(), c1.as_str(), target)); },
        [prefix @ .., last] => {
            let s = alloc.fresh();
            out.push(Gate::ccx(last.as_str(), s.as_str(), target));
            lower(prefix, &s, alloc, out);
            out.push(Gate::ccx(last.as_str(), s.as_str(), target));
            lower(prefix, &s, alloc, out);
        },
    }
}

/// Expand every [`Gate::Mct`] in `gates` into X/CNOT/Toffoli, returning the
/// expanded sequence and the scratch wires introduced.
///
/// Scratch names never collide with `real` wires; colliding with other
/// caller-held identifiers outside `real` is the caller's responsibility.
pub(crate) fn decompose_gates(gates: Vec<Gate>, real: &[String]) -> (Vec<Gate>, Vec<String>) {
    let mut alloc = ScratchAlloc::new(real.iter());
    let mut out: Vec<Gate> = Vec::new();
    for gate in gates.into_iter() {
        match gate {
            Gate::Mct(cs, t) => { lower(&cs, &t, &mut alloc, &mut out); },
            other => { out.push(other); },
        }
    }
    (out, alloc.allocated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("q{}", i)).collect()
    }

    #[test]
    fn small_cases_direct() {
        let real = names(3);
        let (gates, scratch) = decompose_gates(
            vec![
                Gate::mct(Vec::<String>::new(), "q0".to_string()),
                Gate::mct(vec!["q0".to_string()], "q1".to_string()),
                Gate::mct(
                    vec!["q0".to_string(), "q1".to_string()],
                    "q2".to_string(),
                ),
            ],
            &real,
        );
        assert!(scratch.is_empty());
        assert_eq!(gates, vec![
            Gate::x("q0"),
            Gate::cx("q0", "q1"),
            Gate::ccx("q0", "q1", "q2"),
        ]);
    }

    #[test]
    fn three_controls_borrow_one_scratch() {
        let real = names(4);
        let (gates, scratch) = decompose_gates(
            vec![Gate::mct(
                vec!["q0".to_string(), "q1".to_string(), "q2".to_string()],
                "q3".to_string(),
            )],
            &real,
        );
        assert_eq!(scratch, vec!["anc0".to_string()]);
        assert_eq!(gates, vec![
            Gate::ccx("q2", "anc0", "q3"),
            Gate::ccx("q0", "q1", "anc0"),
            Gate::ccx("q2", "anc0", "q3"),
            Gate::ccx("q0", "q1", "anc0"),
        ]);
    }

    #[test]
    fn scratch_skips_used_names() {
        let real = vec!["anc0".to_string(), "q0".to_string()];
        let mut alloc = ScratchAlloc::new(real.iter());
        assert_eq!(alloc.fresh(), "anc1");
    }
}
