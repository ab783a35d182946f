//! Fold a small Clifford+T circuit into a path-sum, normalize it, extract a
//! new gate sequence, and check the two circuits against each other.
//!
//! Run with `cargo run --example resynth`.

use anyhow::{ Context, Result };
use pathsum_calc::{
    circuit::{ check_equivalence, Circuit, Gate },
    extract,
};

fn main() -> Result<()> {
    let mut circ = Circuit::new(["x", "y"])?;
    circ.extend([
        Gate::cx("x", "y"),
        Gate::x("x"),
        Gate::t("y"),
        Gate::h("y"),
        Gate::t("y"),
        Gate::h("y"),
        Gate::tdg("y"),
    ])?;

    println!("input circuit:");
    for gate in circ.gates() { println!("  {}", gate); }

    let mut sop = circ.to_pathsum()?;
    println!("\nfolded path-sum:\n  {}", sop);
    let steps = sop.grind();
    println!("normalized in {} rewrite(s):\n  {}", steps, sop);

    let resynth =
        extract::resynthesize(&circ)?
        .context("extraction could not resolve the path-sum")?;
    println!("\nextracted circuit:");
    for gate in resynth.gates() { println!("  {}", gate); }

    let ok = check_equivalence(&circ, &resynth)?;
    println!("\nnormal-form equivalence check: {}", ok);
    Ok(())
}
