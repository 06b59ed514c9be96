//! Emits an ERA as a textual description in a third-party learning
//! toolkit's native DTA representation (`spec.md` §6, grounded in
//! `tlsep/era-to-dta.py`): states, transitions with guards rendered as
//! `clk.at(i) {op} k` (splitting a fused `==k` conjunct back into its
//! defining `>=k && <=k` pair, since the target format has no dedicated
//! equality operator), and a clock reset on every transition belonging to
//! an active event.

use std::fmt::Write as _;

use itertools::Itertools;

use erax_core::{Cmp, Era, Guard};

fn cmp_str(cmp: Cmp) -> &'static str {
    match cmp {
        Cmp::Lt => "<",
        Cmp::Le => "<=",
        Cmp::Eq => "==",
        Cmp::Ge => ">=",
        Cmp::Gt => ">",
    }
}

fn simple_to_dta(clock_index: usize, cmp: Cmp, bound: u32) -> String {
    format!("clk.at({clock_index}) {} {bound}", cmp_str(cmp))
}

/// Renders a guard's conjuncts against the active-clock index table.
/// `==k` is not directly expressible in the target format, so it is split
/// back into the `>=k && <=k` pair that [`Guard`]'s own canonicalisation
/// would have fused it from.
fn guard_to_dta(guard: &Guard, clock_index: &impl Fn(&str) -> usize) -> String {
    let mut parts = Vec::new();
    for s in guard.conjuncts() {
        let idx = clock_index(s.event().name());
        if s.cmp() == Cmp::Eq {
            parts.push(simple_to_dta(idx, Cmp::Ge, s.bound()));
            parts.push(simple_to_dta(idx, Cmp::Le, s.bound()));
        } else {
            parts.push(simple_to_dta(idx, s.cmp(), s.bound()));
        }
    }
    if parts.is_empty() {
        "true".to_string()
    } else {
        parts.iter().join(" && ")
    }
}

/// Emits `era` in the DTA textual format: its alphabet's active clocks,
/// states (marking the initial and accepting ones), and every live
/// transition with its guard rewritten against the clock index table and,
/// for transitions on an active event, an explicit reset of that event's
/// clock.
pub fn emit_dta(era: &Era) -> String {
    let active_clocks = era.alphabet().active_clocks();
    let clock_index = |name: &str| -> usize {
        active_clocks
            .iter()
            .position(|c| c.name() == name)
            .expect("a transition's guard only ever constrains an active clock")
    };

    let mut out = String::new();
    writeln!(out, "clocks {}", active_clocks.len()).unwrap();
    for (i, c) in active_clocks.iter().enumerate() {
        writeln!(out, "clock {i} {c}").unwrap();
    }
    writeln!(out, "states {}", era.states_count()).unwrap();
    for s in era.states() {
        write!(out, "state {}", s.name()).unwrap();
        if s.is_init() {
            write!(out, " initial").unwrap();
        }
        if s.is_accepting() {
            write!(out, " accepting").unwrap();
        }
        writeln!(out).unwrap();
    }
    for state in era.states() {
        for t in era.out_transitions(state.index()) {
            let guard_text = guard_to_dta(t.guard(), &clock_index);
            write!(
                out,
                "transition {} -> {} on {} guard {}",
                era.state(t.src()).name(),
                era.state(t.tgt()).name(),
                t.event(),
                guard_text
            )
            .unwrap();
            if era.alphabet().is_active(t.event()) {
                write!(out, " reset clk.at({})", clock_index(t.event().name())).unwrap();
            }
            writeln!(out).unwrap();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use erax_core::{Alphabet, Event, GuardOracle};

    struct TrueOracle;
    impl GuardOracle for TrueOracle {
        fn is_contained(&self, sub: &Guard, sup: &Guard) -> bool {
            sup.is_true() || sub == sup
        }
        fn intersects(&self, a: &Guard, b: &Guard) -> bool {
            a.is_true() || b.is_true() || a == b
        }
    }

    fn alphabet() -> Alphabet {
        let mut a = Alphabet::new();
        a.declare(Event::new("a"), true);
        a
    }

    #[test]
    fn fuses_eq_back_into_ge_le_pair() {
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_final(1);
        era.add_transition(
            &TrueOracle,
            0,
            Event::new("a"),
            Guard::simple(Event::new("a"), Cmp::Eq, 1),
            1,
        );
        let dta = emit_dta(&era);
        assert!(dta.contains("clk.at(0) >= 1 && clk.at(0) <= 1"));
    }

    #[test]
    fn resets_clock_on_active_event_transition() {
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);
        let dta = emit_dta(&era);
        assert!(dta.contains("reset clk.at(0)"));
    }

    #[test]
    fn marks_initial_and_accepting_states() {
        let mut era = Era::new(1, alphabet());
        era.make_initial(0);
        era.make_final(0);
        let dta = emit_dta(&era);
        assert!(dta.contains("initial"));
        assert!(dta.contains("accepting"));
    }
}
