//! DERA minimisation (`spec.md` §4.7): turns a 3ERA hypothesis into a
//! deterministic ERA by merging every maximal set of pairwise-compatible
//! states into a single state, via a forward exploration of the resulting
//! automaton starting from the (merged) initial state.

use std::collections::VecDeque;

use erax_core::{Era, Event, Guard};

/// Picks the set with the largest cardinality; ties broken by the first
/// one encountered (any choice is sound, `spec.md` §4.7 Open Questions).
fn largest<'a>(sets: &'a [Vec<usize>]) -> &'a [usize] {
    sets.iter()
        .max_by_key(|s| s.len())
        .expect("candidate list must be non-empty")
}

/// Computes the minimal DERA consistent with a 3ERA hypothesis by merging
/// its maximal compatible state sets. Every transition out of a merged
/// state is the union, over its members, of their outgoing transitions on
/// that letter, redirected to whichever maximal set contains that union
/// (one must exist, since the sets partition-cover the compatible
/// relation).
pub fn compute_minimal_dera(hypothesis: &Era) -> Era {
    let maximal_sets = hypothesis.find_maximal_compatible_sets();
    let initial = hypothesis
        .initial_state()
        .expect("hypothesis has no initial state");

    let init_candidates: Vec<Vec<usize>> = maximal_sets
        .iter()
        .filter(|s| s.contains(&initial))
        .cloned()
        .collect();
    let init_set = largest(&init_candidates).to_vec();

    let accepting_sets: Vec<bool> = maximal_sets
        .iter()
        .map(|s| s.iter().any(|&i| hypothesis.state(i).is_accepting()))
        .collect();

    let mut out = Era::new(0, hypothesis.alphabet().clone());

    // new-state index -> index into `maximal_sets`
    let mut set_of_state: Vec<usize> = Vec::new();
    let init_set_index = maximal_sets
        .iter()
        .position(|s| *s == init_set)
        .expect("the chosen initial set is one of the maximal sets");

    let q_in = out.add_state();
    out.make_initial(q_in);
    set_of_state.push(init_set_index);

    let mut queue = VecDeque::from([q_in]);
    // letters appearing anywhere in the hypothesis, off the (event, guard)
    // reverse index rather than a manual scan.
    let letters: Vec<(Event, Guard)> = hypothesis.letters().cloned().collect();

    while let Some(current) = queue.pop_front() {
        let set_index = set_of_state[current];
        if accepting_sets[set_index] {
            out.make_final(current);
        }

        for (event, guard) in &letters {
            let mut out_set: Vec<usize> = Vec::new();
            for &member in &maximal_sets[set_index] {
                for &tgt in hypothesis.targets_on_letter(event, guard, member) {
                    if !out_set.contains(&tgt) {
                        out_set.push(tgt);
                    }
                }
            }
            if out_set.is_empty() {
                continue;
            }

            let next_set_index = maximal_sets
                .iter()
                .enumerate()
                .filter(|(_, s)| out_set.iter().all(|e| s.contains(e)))
                .map(|(i, s)| (i, s.len()))
                .max_by_key(|&(_, len)| len)
                .map(|(i, _)| i)
                .expect("some maximal set must contain the union of successors");

            let existing = set_of_state.iter().position(|&s| s == next_set_index);
            let tgt = match existing {
                Some(state) => state,
                None => {
                    let new_state = out.add_state();
                    set_of_state.push(next_set_index);
                    queue.push_back(new_state);
                    new_state
                }
            };
            out.nd_add_transition(current, event.clone(), guard.clone(), tgt);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use erax_core::{Alphabet, Event as Ev};

    fn alphabet() -> Alphabet {
        let mut a = Alphabet::new();
        a.declare(Ev::new("a"), true);
        a
    }

    #[test]
    fn merges_dont_care_only_differing_states() {
        // two states differ only by one being don't-care: they are
        // compatible and should collapse into a single minimised state.
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_dc(1);
        let minimal = compute_minimal_dera(&era);
        assert_eq!(minimal.nstates(), 1);
    }

    #[test]
    fn keeps_incompatible_reachable_states_separate() {
        struct TrueOracle;
        impl erax_core::GuardOracle for TrueOracle {
            fn is_contained(&self, sub: &Guard, sup: &Guard) -> bool {
                sup.is_true() || sub == sup
            }
            fn intersects(&self, a: &Guard, b: &Guard) -> bool {
                a.is_true() || b.is_true() || a == b
            }
        }

        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_final(1);
        era.add_transition(&TrueOracle, 0, Ev::new("a"), Guard::True, 1);

        let minimal = compute_minimal_dera(&era);
        assert_eq!(minimal.nstates(), 2);
    }
}
