//! Symbolic acceptance checking (`spec.md` §4.5): deciding whether some
//! concretisation of a symbolic word is accepted by an ERA without
//! enumerating the word's regions, by encoding the run as an SMT formula
//! over per-position state-index bits and per-event time stamps.

use erax_core::{Era, Event, Guard, SymWord};
use z3::ast::{Ast, Bool, Real};
use z3::{Context, SatResult, Solver};

use crate::containment::Z3GuardOracle;

/// Number of bits needed to name `n` as Z3 boolean state-index variables.
/// Mirrors the original construction's `len(bin(n)[2:])`: a single state
/// still gets one bit, since `bin(1) == "0b1"`.
fn bits_for(n: usize) -> usize {
    format!("{n:b}").len()
}

fn state_formula<'c>(
    ctx: &'c Context,
    state_index: usize,
    nvars: usize,
    pos: usize,
    state_vars: &[Vec<Bool<'c>>],
) -> Bool<'c> {
    let binary = format!("{state_index:0width$b}", width = nvars);
    let literals: Vec<Bool<'c>> = binary
        .chars()
        .enumerate()
        .map(|(i, bit)| {
            if bit == '1' {
                state_vars[pos][i].clone()
            } else {
                state_vars[pos][i].not()
            }
        })
        .collect();
    let refs: Vec<&Bool<'c>> = literals.iter().collect();
    Bool::and(ctx, &refs)
}

fn find_last_occurrence(word: &SymWord, event: &Event, pos: usize) -> Option<usize> {
    (0..pos).rev().find(|&i| word.events()[i].event() == event)
}

fn guard_formula<'c>(
    ctx: &'c Context,
    word: &SymWord,
    pos: usize,
    time_vars: &[Real<'c>],
) -> Vec<Bool<'c>> {
    let event = word.events()[pos].event();
    let guard = word.events()[pos].guard();
    let last = find_last_occurrence(word, event, pos);
    let conjuncts: Vec<Bool<'c>> = guard
        .conjuncts()
        .iter()
        .map(|s| {
            let curr = &time_vars[pos];
            let prev = last
                .map(|i| time_vars[i].clone())
                .unwrap_or_else(|| Real::from_real(ctx, 0, 1));
            let bound = Real::from_real(ctx, s.bound() as i32, 1);
            let diff = curr - &prev;
            match s.cmp() {
                erax_core::Cmp::Lt => diff.lt(&bound),
                erax_core::Cmp::Le => diff.le(&bound),
                erax_core::Cmp::Eq => diff._eq(&bound),
                erax_core::Cmp::Ge => diff.ge(&bound),
                erax_core::Cmp::Gt => diff.gt(&bound),
            }
        })
        .collect();
    if conjuncts.is_empty() {
        Vec::new()
    } else {
        vec![Bool::and(ctx, &conjuncts.iter().collect::<Vec<_>>())]
    }
}

fn formulae_for_event<'c>(
    ctx: &'c Context,
    era: &Era,
    word: &SymWord,
    state_vars: &[Vec<Bool<'c>>],
    time_vars: &[Real<'c>],
    pos: usize,
    nvars: usize,
) -> Vec<Bool<'c>> {
    let event = word.events()[pos].event();
    let mut formulae = Vec::new();
    for &(src, tgt) in era.transitions_on_event(event) {
        if !era.state(src).is_live() || !era.state(tgt).is_live() {
            continue;
        }
        for t in era.transitions_between(src, tgt) {
            if t.event() != event {
                continue;
            }
            let mut parts = vec![
                state_formula(ctx, src, nvars, pos, state_vars),
                state_formula(ctx, tgt, nvars, pos + 1, state_vars),
            ];
            parts.extend(guard_formula(ctx, word, pos, time_vars));
            formulae.push(Bool::and(ctx, &parts.iter().collect::<Vec<_>>()));
        }
    }
    formulae
}

fn word_formula<'c>(ctx: &'c Context, word: &SymWord, time_vars: &[Real<'c>]) -> Vec<Bool<'c>> {
    (0..word.len())
        .flat_map(|pos| guard_formula(ctx, word, pos, time_vars))
        .collect()
}

fn final_states_formula<'c>(
    ctx: &'c Context,
    era: &Era,
    nvars: usize,
    state_vars: &[Vec<Bool<'c>>],
    pos: usize,
) -> Bool<'c> {
    let disjuncts: Vec<Bool<'c>> = era
        .states()
        .filter(|s| s.is_accepting())
        .map(|s| state_formula(ctx, s.index(), nvars, pos, state_vars))
        .collect();
    Bool::or(ctx, &disjuncts.iter().collect::<Vec<_>>())
}

/// Decides whether some concretisation of the symbolic region-word `word`
/// is accepted by `era`, by encoding the run symbolically rather than
/// enumerating regions. Short-circuits without invoking the solver when
/// `word` is `ε` (reading straight off the initial state's acceptance) or
/// when some position in `word` has no candidate transition at all in
/// `era` (`spec.md` §4.5's fast-reject path).
pub fn check(oracle: &Z3GuardOracle, era: &Era, word: &SymWord) -> bool {
    let initial = era.initial_state().expect("era has no initial state");
    if word.is_epsilon() {
        return era.state(initial).is_accepting();
    }

    let ctx = oracle.context();
    let nvars = bits_for(era.nstates());
    let n = word.len();

    let state_vars: Vec<Vec<Bool>> = (0..=n)
        .map(|pos| {
            (0..nvars)
                .map(|bit| Bool::new_const(ctx, format!("q{bit}_{pos}")))
                .collect()
        })
        .collect();
    let time_vars: Vec<Real> = (0..n).map(|i| Real::new_const(ctx, format!("t_{i}"))).collect();

    let mut phi: Vec<Bool> = Vec::new();
    phi.push(Bool::and(
        ctx,
        &time_vars
            .iter()
            .map(|t| t.ge(&Real::from_real(ctx, 0, 1)))
            .collect::<Vec<_>>()
            .iter()
            .collect::<Vec<_>>(),
    ));
    if n > 1 {
        let ordered: Vec<Bool> = (1..n).map(|i| time_vars[i].ge(&time_vars[i - 1])).collect();
        phi.push(Bool::and(ctx, &ordered.iter().collect::<Vec<_>>()));
    }
    phi.push(state_formula(ctx, initial, nvars, 0, &state_vars));

    for pos in 0..n {
        let formulae = formulae_for_event(ctx, era, word, &state_vars, &time_vars, pos, nvars);
        if formulae.is_empty() {
            return false;
        }
        phi.push(Bool::or(ctx, &formulae.iter().collect::<Vec<_>>()));
    }

    phi.push(final_states_formula(ctx, era, nvars, &state_vars, n));
    let word_phi = word_formula(ctx, word, &time_vars);
    if !word_phi.is_empty() {
        phi.push(Bool::and(ctx, &word_phi.iter().collect::<Vec<_>>()));
    }

    let solver = Solver::new(ctx);
    for f in &phi {
        solver.assert(f);
    }
    matches!(solver.check(), SatResult::Sat)
}

/// Decides whether the symbolic region-word `word` denotes the empty set
/// of concrete timed words, independent of any automaton: a word with
/// guards that admit no non-negative, monotonically increasing time
/// sequence is vacuous.
pub fn is_empty(oracle: &Z3GuardOracle, word: &SymWord) -> bool {
    let ctx = oracle.context();
    let n = word.len();
    let time_vars: Vec<Real> = (0..n).map(|i| Real::new_const(ctx, format!("t_{i}"))).collect();

    let mut phi: Vec<Bool> = Vec::new();
    phi.push(Bool::and(
        ctx,
        &time_vars
            .iter()
            .map(|t| t.ge(&Real::from_real(ctx, 0, 1)))
            .collect::<Vec<_>>()
            .iter()
            .collect::<Vec<_>>(),
    ));
    if n > 1 {
        let ordered: Vec<Bool> = (1..n).map(|i| time_vars[i].ge(&time_vars[i - 1])).collect();
        phi.push(Bool::and(ctx, &ordered.iter().collect::<Vec<_>>()));
    }
    let word_phi = word_formula(ctx, word, &time_vars);
    if !word_phi.is_empty() {
        phi.push(Bool::and(ctx, &word_phi.iter().collect::<Vec<_>>()));
    }

    let solver = Solver::new(ctx);
    for f in &phi {
        solver.assert(f);
    }
    matches!(solver.check(), SatResult::Unsat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use erax_core::{Alphabet, Cmp, Event, SymEvent};

    fn alphabet() -> Alphabet {
        let mut a = Alphabet::new();
        a.declare(Event::new("a"), true);
        a
    }

    #[test]
    fn epsilon_checks_initial_state_directly() {
        let oracle = Z3GuardOracle::new();
        let mut era = Era::new(1, alphabet());
        era.make_initial(0);
        era.make_final(0);
        assert!(check(&oracle, &era, &SymWord::epsilon()));
    }

    #[test]
    fn no_transition_fast_rejects() {
        let oracle = Z3GuardOracle::new();
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        let word = SymWord::from_events([SymEvent::new(Event::new("a"), Guard::True)]);
        assert!(!check(&oracle, &era, &word));
    }

    #[test]
    fn accepts_region_satisfying_run() {
        let oracle = Z3GuardOracle::new();
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_final(1);
        era.add_transition(&oracle, 0, Event::new("a"), Guard::True, 1);
        let word = SymWord::from_events([SymEvent::new(
            Event::new("a"),
            Guard::simple(Event::new("a"), Cmp::Gt, 0),
        )]);
        assert!(check(&oracle, &era, &word));
    }

    #[test]
    fn empty_word_region_is_detected() {
        let oracle = Z3GuardOracle::new();
        let word = SymWord::from_events([
            SymEvent::new(Event::new("a"), Guard::simple(Event::new("a"), Cmp::Lt, 0)),
        ]);
        assert!(is_empty(&oracle, &word));
    }
}
