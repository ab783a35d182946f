//! Round-trip a batch of random Clifford+T circuits through the path-sum
//! pipeline, cross-checking every successful extraction against brute-force
//! matrices.
//!
//! Extraction failure is a defined outcome, not a bug; failing circuits are
//! counted and reported. A matrix mismatch on a *successful* extraction
//! would be a soundness bug, and aborts.
//!
//! Run with `cargo run --example random-cliffordt`.

use anyhow::{ ensure, Result };
use rand::{ rngs::StdRng, Rng, SeedableRng };
use pathsum_calc::{
    circuit::{ Circuit, Gate },
    extract, sim,
};

const WIRES: [&str; 3] = ["q0", "q1", "q2"];
const CIRCUITS: usize = 25;
const GATES: usize = 12;

fn random_circuit(rng: &mut StdRng) -> Result<Circuit> {
    let mut circ = Circuit::new(WIRES)?;
    for _ in 0..GATES {
        let w = WIRES[rng.gen_range(0..WIRES.len())];
        let gate = match rng.gen_range(0..6) {
            0 => Gate::h(w),
            1 => Gate::t(w),
            2 => Gate::tdg(w),
            3 => Gate::s(w),
            4 => Gate::x(w),
            _ => {
                let a = rng.gen_range(0..WIRES.len());
                let b = (a + rng.gen_range(1..WIRES.len())) % WIRES.len();
                Gate::cx(WIRES[a], WIRES[b])
            },
        };
        circ.push(gate)?;
    }
    Ok(circ)
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0xfeed);
    let mut resolved: usize = 0;
    let mut unresolved: usize = 0;
    let mut extracted_gates: usize = 0;
    for k in 0..CIRCUITS {
        let circ = random_circuit(&mut rng)?;
        match extract::resynthesize(&circ)? {
            Some(resynth) => {
                let same = sim::approx_eq(
                    &sim::circuit_matrix(&circ),
                    &sim::circuit_matrix(&resynth),
                    1e-9,
                );
                ensure!(same, "unsound extraction on circuit {}", k);
                resolved += 1;
                extracted_gates += resynth.len();
            },
            None => { unresolved += 1; },
        }
    }
    println!(
        "{} circuits of {} gates: {} resolved ({} gates total), {} unresolved",
        CIRCUITS, GATES, resolved, extracted_gates, unresolved,
    );
    Ok(())
}
