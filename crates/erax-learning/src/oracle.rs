//! Equivalence/inclusion checking via a reachability capability.
//!
//! The original system answers "is L(a) subseteq L(b)?" by emitting both
//! automata to an external timed-automaton reachability checker and parsing
//! back a counterexample certificate (`spec.md` §6, §9 Design Notes). That
//! external tool is out of scope here, so the capability is exposed as a
//! trait and backed by an in-process, depth-bounded search over the
//! product-and-complement construction instead.

use erax_core::{Era, SymEvent, SymWord};
use erax_smt::Z3GuardOracle;

/// Decides language inclusion between two ERAs by searching for a
/// counterexample: a word accepted by `includer` but not by `included_in`.
pub trait ReachabilityOracle {
    /// `Some(word)` witnesses `L(includer) \ L(included_in) != {}`; `None`
    /// means no such word was found (within whatever bound the
    /// implementation applies — this is not necessarily a soundness
    /// guarantee that `L(includer) subseteq L(included_in))`).
    fn find_inclusion_counterexample(&self, includer: &Era, included_in: &Era) -> Option<SymWord>;
}

/// An in-process stand-in for the external reachability tool: breadth-first
/// search over `includer x complement(included_in)` up to `depth`
/// transitions, filtering candidate words through the SMT emptiness check
/// so only feasible timing sequences are returned.
///
/// This is a deliberate approximation (an explicitly resolved design
/// question, not a bug): a bounded search can miss a counterexample that
/// only appears beyond `depth`, so a `None` result from this oracle should
/// be read as "no violation found within the search bound", not as a
/// proof of inclusion. See the crate's design notes for the full
/// justification.
pub struct BoundedReachabilityOracle<'a> {
    guard_oracle: &'a Z3GuardOracle,
    depth: usize,
}

impl<'a> BoundedReachabilityOracle<'a> {
    pub fn new(guard_oracle: &'a Z3GuardOracle, depth: usize) -> Self {
        Self { guard_oracle, depth }
    }
}

impl<'a> ReachabilityOracle for BoundedReachabilityOracle<'a> {
    fn find_inclusion_counterexample(&self, includer: &Era, included_in: &Era) -> Option<SymWord> {
        let mut complement = included_in.clone();
        complement.complement();
        let product = includer.product(&complement);

        let start = product.initial_state()?;
        if product.state(start).is_accepting() {
            return Some(SymWord::epsilon());
        }

        let mut frontier = vec![(start, SymWord::epsilon())];
        for _ in 0..self.depth {
            let mut next = Vec::new();
            for (state, word) in frontier {
                for t in product.out_transitions(state) {
                    let letter = SymEvent::new(t.event().clone(), t.guard().clone());
                    let candidate = word.concat(&SymWord::from_events([letter]));
                    if erax_smt::is_empty(self.guard_oracle, &candidate) {
                        continue;
                    }
                    if product.state(t.tgt()).is_accepting() {
                        return Some(candidate);
                    }
                    next.push((t.tgt(), candidate));
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erax_core::{Alphabet, Event, Guard};

    fn alphabet() -> Alphabet {
        let mut a = Alphabet::new();
        a.declare(Event::new("a"), true);
        a
    }

    #[test]
    fn finds_counterexample_when_languages_differ() {
        let guard_oracle = Z3GuardOracle::new();
        let oracle = BoundedReachabilityOracle::new(&guard_oracle, 4);

        let mut accepts_a = Era::new(2, alphabet());
        accepts_a.make_initial(0);
        accepts_a.make_final(1);
        accepts_a.add_transition(&guard_oracle, 0, Event::new("a"), Guard::True, 1);

        let mut accepts_nothing = Era::new(1, alphabet());
        accepts_nothing.make_initial(0);

        let cex = oracle.find_inclusion_counterexample(&accepts_a, &accepts_nothing);
        assert!(cex.is_some());
    }

    #[test]
    fn finds_no_counterexample_for_identical_automata() {
        let guard_oracle = Z3GuardOracle::new();
        let oracle = BoundedReachabilityOracle::new(&guard_oracle, 4);

        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_final(1);
        era.add_transition(&guard_oracle, 0, Event::new("a"), Guard::True, 1);

        assert!(oracle
            .find_inclusion_counterexample(&era, &era.clone())
            .is_none());
    }
}
