//! Region enumeration (`spec.md` §4.4): given a maximum constant `m` and a
//! list of active clocks, enumerate every region as a [`Guard`].

use itertools::Itertools;

use crate::event::Event;
use crate::guard::{Cmp, Guard};

/// The per-clock sequence `{x=0, 0<x<1, x=1, ..., x=m, x>m}` — `2m+2`
/// intervals — for the clock of `event`.
fn regions_for_clock(event: &Event, m: u32) -> Vec<Guard> {
    let mut out = Vec::with_capacity(2 * m as usize + 2);
    for i in 0..m {
        out.push(Guard::simple(event.clone(), Cmp::Eq, i));
        out.push(Guard::conjoin([
            Guard::simple(event.clone(), Cmp::Gt, i),
            Guard::simple(event.clone(), Cmp::Lt, i + 1),
        ]));
    }
    out.push(Guard::simple(event.clone(), Cmp::Eq, m));
    out.push(Guard::simple(event.clone(), Cmp::Gt, m));
    out
}

/// Enumerates all regions over `active_clocks` up to bound `m`: the
/// cartesian product, in order, of each clock's region sequence, with
/// cardinality `(2m+2)^k` for `k` active clocks.
///
/// With no active clocks the only region is the vacuous constraint `True`.
pub fn enumerate_regions(m: u32, active_clocks: &[Event]) -> Vec<Guard> {
    if active_clocks.is_empty() {
        return vec![Guard::True];
    }
    let per_clock: Vec<Vec<Guard>> = active_clocks
        .iter()
        .map(|e| regions_for_clock(e, m))
        .collect();

    per_clock
        .into_iter()
        .multi_cartesian_product()
        .map(Guard::conjoin)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_clock_cardinality() {
        let regions = enumerate_regions(1, &[Event::new("a")]);
        // {a=0, 0<a<1, a=1, a>1}
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn two_clocks_cardinality_is_product() {
        let regions = enumerate_regions(1, &[Event::new("a"), Event::new("b")]);
        assert_eq!(regions.len(), 4 * 4);
    }

    #[test]
    fn no_active_clocks_yields_true_only() {
        let regions = enumerate_regions(3, &[]);
        assert_eq!(regions, vec![Guard::True]);
    }

    #[test]
    fn regions_are_pairwise_distinct() {
        let regions = enumerate_regions(2, &[Event::new("a")]);
        for i in 0..regions.len() {
            for j in (i + 1)..regions.len() {
                assert_ne!(regions[i], regions[j]);
            }
        }
    }
}
