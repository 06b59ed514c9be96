//! Guard containment and intersection, decided by encoding both guards over
//! shared per-clock `Real` variables and asking Z3 whether the implication
//! (resp. conjunction) is valid (resp. satisfiable) for all non-negative
//! valuations (`spec.md` §4.1).

use std::collections::HashMap;

use erax_core::{Cmp, Event, Guard, GuardOracle, Simple};
use tracing::trace;
use z3::ast::{Ast, Bool, Real};
use z3::{Context, SatResult, Solver};

fn declare_clocks<'c>(ctx: &'c Context, guards: &[&Guard]) -> HashMap<Event, Real<'c>> {
    let mut clocks = HashMap::new();
    for g in guards {
        for s in g.conjuncts() {
            clocks
                .entry(s.event().clone())
                .or_insert_with(|| Real::new_const(ctx, s.event().name()));
        }
    }
    clocks
}

fn encode_simple<'c>(ctx: &'c Context, clocks: &HashMap<Event, Real<'c>>, s: &Simple) -> Bool<'c> {
    let clock = &clocks[s.event()];
    let bound = Real::from_real(ctx, s.bound() as i32, 1);
    match s.cmp() {
        Cmp::Lt => clock.lt(&bound),
        Cmp::Le => clock.le(&bound),
        Cmp::Eq => clock._eq(&bound),
        Cmp::Ge => clock.ge(&bound),
        Cmp::Gt => clock.gt(&bound),
    }
}

fn encode_guard<'c>(ctx: &'c Context, clocks: &HashMap<Event, Real<'c>>, g: &Guard) -> Bool<'c> {
    let conjuncts: Vec<Bool<'c>> = g
        .conjuncts()
        .iter()
        .map(|s| encode_simple(ctx, clocks, s))
        .collect();
    if conjuncts.is_empty() {
        return Bool::from_bool(ctx, true);
    }
    let refs: Vec<&Bool<'c>> = conjuncts.iter().collect();
    Bool::and(ctx, &refs)
}

/// `GuardOracle` backed by an owned Z3 context. Cheap to construct; each
/// query builds a fresh solver over freshly-declared clock variables, so an
/// instance may safely be shared across many independent queries.
pub struct Z3GuardOracle {
    ctx: Context,
}

impl Default for Z3GuardOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Z3GuardOracle {
    pub fn new() -> Self {
        let cfg = z3::Config::new();
        Self { ctx: Context::new(&cfg) }
    }

    pub(crate) fn context(&self) -> &Context {
        &self.ctx
    }
}

impl GuardOracle for Z3GuardOracle {
    fn is_contained(&self, sub: &Guard, sup: &Guard) -> bool {
        let ctx = &self.ctx;
        let clocks = declare_clocks(ctx, &[sub, sup]);
        let sub_f = encode_guard(ctx, &clocks, sub);
        let sup_f = encode_guard(ctx, &clocks, sup);

        let solver = Solver::new(ctx);
        for clock in clocks.values() {
            solver.assert(&clock.ge(&Real::from_real(ctx, 0, 1)));
        }
        solver.assert(&sub_f.implies(&sup_f).not());
        let result = matches!(solver.check(), SatResult::Unsat);
        trace!(%sub, %sup, result, "is_contained query");
        result
    }

    fn intersects(&self, a: &Guard, b: &Guard) -> bool {
        let ctx = &self.ctx;
        let clocks = declare_clocks(ctx, &[a, b]);
        let a_f = encode_guard(ctx, &clocks, a);
        let b_f = encode_guard(ctx, &clocks, b);

        let solver = Solver::new(ctx);
        for clock in clocks.values() {
            solver.assert(&clock.ge(&Real::from_real(ctx, 0, 1)));
        }
        solver.assert(&Bool::and(ctx, &[&a_f, &b_f]));
        let result = matches!(solver.check(), SatResult::Sat);
        trace!(%a, %b, result, "intersects query");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erax_core::Event;

    #[test]
    fn true_contains_everything() {
        let oracle = Z3GuardOracle::new();
        let g = Guard::simple(Event::new("a"), Cmp::Eq, 3);
        assert!(oracle.is_contained(&g, &Guard::True));
        assert!(!oracle.is_contained(&Guard::True, &g));
    }

    #[test]
    fn region_is_contained_in_its_defining_interval() {
        let oracle = Z3GuardOracle::new();
        let region = Guard::conjoin([
            Guard::simple(Event::new("a"), Cmp::Gt, 0),
            Guard::simple(Event::new("a"), Cmp::Lt, 1),
        ]);
        let bound = Guard::simple(Event::new("a"), Cmp::Lt, 2);
        assert!(oracle.is_contained(&region, &bound));
    }

    #[test]
    fn disjoint_bounds_do_not_intersect() {
        let oracle = Z3GuardOracle::new();
        let lt_one = Guard::simple(Event::new("a"), Cmp::Lt, 1);
        let gt_two = Guard::simple(Event::new("a"), Cmp::Gt, 2);
        assert!(!oracle.intersects(&lt_one, &gt_two));
    }

    #[test]
    fn overlapping_bounds_intersect() {
        let oracle = Z3GuardOracle::new();
        let le_five = Guard::simple(Event::new("a"), Cmp::Le, 5);
        let ge_two = Guard::simple(Event::new("a"), Cmp::Ge, 2);
        assert!(oracle.intersects(&le_five, &ge_two));
    }
}
