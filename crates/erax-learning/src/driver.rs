//! The outer learner loop (`spec.md` §4.8): alternates closing/making the
//! observation table consistent, checking the resulting hypothesis for
//! completeness against the system under learning, minimising it into a
//! DERA, and checking that minimisation for soundness, feeding back a
//! counterexample at either stage until both checks pass.

use erax_core::{Era, SymWord};
use erax_smt::Z3GuardOracle;
use tracing::{info, warn};

use crate::minimize::compute_minimal_dera;
use crate::oracle::ReachabilityOracle;
use crate::stats::Stats;
use crate::table::ObservationTable;

/// Checks `L(includer) subseteq L(included_in)`, returning a
/// counterexample word when the reachability oracle finds one.
fn check_inclusion(
    reachability: &impl ReachabilityOracle,
    stats: &mut Stats,
    includer: &Era,
    included_in: &Era,
) -> Option<SymWord> {
    stats.record_inclusion_query();
    reachability.find_inclusion_counterexample(includer, included_in)
}

/// Checks whether `candidate` and `sul` accept the same language, treating
/// `candidate`'s don't-care states as accepting on one side of the check
/// and rejecting on the other (`spec.md` §4.8): returns a counterexample
/// together with whichever side (the SUL) accepts it, or `None` once both
/// directions agree.
fn check_completeness(
    reachability: &impl ReachabilityOracle,
    stats: &mut Stats,
    candidate: &Era,
    sul: &Era,
) -> Option<(SymWord, bool)> {
    if let Some(cex) = check_inclusion(reachability, stats, candidate, sul) {
        return Some((cex, false));
    }

    let mut candidate_rejecting = candidate.clone();
    candidate_rejecting.make_dc_states_accepting();
    if let Some(cex) = check_inclusion(reachability, stats, sul, &candidate_rejecting) {
        return Some((cex, true));
    }

    None
}

/// Runs the active-learning procedure to completion, returning a minimal
/// DERA equivalent to `sul` (`spec.md` §4.8).
pub fn learn(
    sul: &Era,
    m: u32,
    guard_oracle: &Z3GuardOracle,
    reachability: &impl ReachabilityOracle,
    stats: &mut Stats,
) -> Era {
    let mut table = ObservationTable::new(sul, m, guard_oracle, stats);
    table.add_s_dot_sigma(&table.rows().to_vec());

    loop {
        let (candidate, row_of_state) = loop {
            table.record_equivalence_query();
            table.make_close_and_consistent();
            let (candidate, row_of_state) = table.generate_3era();

            match check_completeness(reachability, table.stats_mut(), &candidate, sul) {
                Some((cex, accepted_by_sul)) => {
                    table.add_counterexample(&cex, &candidate, accepted_by_sul, &row_of_state, false);
                }
                None => break (candidate, row_of_state),
            }
        };

        table.record_equivalence_query();
        let minimal = compute_minimal_dera(&candidate);

        let mut cex = check_inclusion(reachability, table.stats_mut(), sul, &minimal);
        let mut accepted_by_sul = true;
        if cex.is_none() {
            cex = check_inclusion(reachability, table.stats_mut(), &minimal, sul);
            accepted_by_sul = false;
        }

        match cex {
            None => {
                let mut minimal = minimal;
                minimal.remove_sinks();
                info!(states = minimal.nstates(), "learning converged");
                return minimal;
            }
            Some(cex) => {
                warn!(%cex, "soundness check found a counterexample, feeding it back");
                table.add_counterexample(&cex, &candidate, accepted_by_sul, &row_of_state, true);
            }
        }
    }
}
