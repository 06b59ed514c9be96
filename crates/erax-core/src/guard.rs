use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::event::Event;

/// A comparison operator appearing in an atomic clock constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cmp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Cmp {
    fn as_str(self) -> &'static str {
        match self {
            Cmp::Lt => "<",
            Cmp::Le => "<=",
            Cmp::Eq => "==",
            Cmp::Ge => ">=",
            Cmp::Gt => ">",
        }
    }

    /// The operator obtained by swapping the two sides of the comparison,
    /// e.g. `x >= 3` flipped is the same constraint as `3 <= x`.
    fn flip(self) -> Cmp {
        match self {
            Cmp::Lt => Cmp::Gt,
            Cmp::Le => Cmp::Ge,
            Cmp::Eq => Cmp::Eq,
            Cmp::Ge => Cmp::Le,
            Cmp::Gt => Cmp::Lt,
        }
    }
}

/// An atomic constraint `event ~ k` on the clock of a single active event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Simple {
    event: Event,
    cmp: Cmp,
    bound: u32,
}

impl Simple {
    pub fn new(event: Event, cmp: Cmp, bound: u32) -> Self {
        Self { event, cmp, bound }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn cmp(&self) -> Cmp {
        self.cmp
    }

    pub fn bound(&self) -> u32 {
        self.bound
    }
}

impl fmt::Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.event, self.cmp.as_str(), self.bound)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("no eligible operator found in guard \"{0}\"")]
    NoOperator(String),
    #[error("unexpected conjunction found where a simple constraint was expected: \"{0}\"")]
    UnexpectedConjunction(String),
    #[error("malformed bound in guard \"{0}\"")]
    MalformedBound(String),
    #[error("empty conjunct in guard \"{0}\"")]
    EmptyConjunct(String),
}

/// A constraint on the active clocks: the vacuous constraint, a single
/// atomic constraint, or a non-empty conjunction of atomic constraints.
///
/// `Conj` is always stored canonicalised (duplicates removed, matching
/// `>=k`/`<=k` pairs on the same event fused into `==k`) and sorted, so that
/// structural equality/hashing coincide with the "equal canonicalised
/// multiset of simples" equivalence from the specification. A canonicalised
/// conjunction of exactly one simple is represented as [`Guard::Simple`]
/// rather than a singleton [`Guard::Conj`] — unlike the original
/// implementation's `ConjExpression`, which keeps its own type even with one
/// conjunct, there is no behavioural difference between the two here, so we
/// collapse them to keep `Guard`'s equality total and its variants disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Guard {
    True,
    Simple(Simple),
    Conj(Vec<Simple>),
}

impl Guard {
    pub fn simple(event: Event, cmp: Cmp, bound: u32) -> Self {
        Guard::Simple(Simple::new(event, cmp, bound))
    }

    /// The atomic constraints making up this guard: empty for `True`.
    pub fn conjuncts(&self) -> &[Simple] {
        match self {
            Guard::True => &[],
            Guard::Simple(s) => std::slice::from_ref(s),
            Guard::Conj(v) => v,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Guard::True)
    }

    /// Builds the conjunction of several guards, flattening nested
    /// conjunctions and re-running canonicalisation over the full set of
    /// atomic constraints. Mirrors `ConjExpression`'s tuple constructor.
    pub fn conjoin(guards: impl IntoIterator<Item = Guard>) -> Guard {
        let mut simples = Vec::new();
        for g in guards {
            simples.extend(g.conjuncts().iter().cloned());
        }
        Guard::from_simples(simples)
    }

    fn from_simples(simples: Vec<Simple>) -> Guard {
        if simples.is_empty() {
            return Guard::True;
        }
        let canonical = canonicalize(simples);
        if canonical.len() == 1 {
            Guard::Simple(canonical.into_iter().next().unwrap())
        } else {
            Guard::Conj(canonical)
        }
    }

    /// Parses a guard string per the textual syntax from `spec.md` §4.1/§6:
    /// the literal `True`, a `&&`-separated conjunction of simple
    /// constraints, or a single simple constraint.
    pub fn parse(input: &str) -> Result<Guard, GuardError> {
        let trimmed: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if trimmed == "True" {
            return Ok(Guard::True);
        }
        if trimmed.contains("&&") {
            let conjuncts = trimmed
                .split("&&")
                .map(parse_simple)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Guard::from_simples(conjuncts));
        }
        let simple = parse_simple(&trimmed)?;
        Ok(Guard::from_simples(vec![simple]))
    }
}

fn parse_simple(atom: &str) -> Result<Simple, GuardError> {
    if atom.is_empty() {
        return Err(GuardError::EmptyConjunct(atom.to_string()));
    }
    if atom.contains("&&") {
        return Err(GuardError::UnexpectedConjunction(atom.to_string()));
    }
    // longer operators must be matched before their single-character prefixes
    const OPS: [(&str, Cmp); 5] = [
        ("<=", Cmp::Le),
        (">=", Cmp::Ge),
        ("==", Cmp::Eq),
        ("<", Cmp::Lt),
        (">", Cmp::Gt),
    ];
    let (op_str, cmp) = OPS
        .iter()
        .find(|(op, _)| atom.contains(op))
        .ok_or_else(|| GuardError::NoOperator(atom.to_string()))?;
    let mut parts = atom.splitn(2, op_str);
    let lhs = parts.next().unwrap_or_default();
    let rhs = parts.next().unwrap_or_default();

    // accept operand order reversed by flipping the operator
    if let (Ok(bound), false) = (lhs.parse::<u32>(), lhs.is_empty()) {
        return Ok(Simple::new(Event::new(rhs), cmp.flip(), bound));
    }
    let bound = rhs
        .parse::<u32>()
        .map_err(|_| GuardError::MalformedBound(atom.to_string()))?;
    Ok(Simple::new(Event::new(lhs), *cmp, bound))
}

/// Removes duplicates and fuses matching `>=k`/`<=k` pairs on the same
/// event into a single `==k`, then sorts for a canonical, hashable form.
fn canonicalize(mut simples: Vec<Simple>) -> Vec<Simple> {
    remove_duplicates(&mut simples);
    fuse_eq(&mut simples);
    simples.sort();
    simples
}

fn remove_duplicates(simples: &mut Vec<Simple>) {
    let mut deduped: Vec<Simple> = Vec::with_capacity(simples.len());
    for s in simples.drain(..) {
        if !deduped.contains(&s) {
            deduped.push(s);
        }
    }
    *simples = deduped;
}

fn fuse_eq(simples: &mut Vec<Simple>) {
    loop {
        let mut fused = None;
        'search: for i in 0..simples.len() {
            for j in 0..simples.len() {
                if i == j {
                    continue;
                }
                let (a, b) = (&simples[i], &simples[j]);
                if a.event == b.event
                    && a.bound == b.bound
                    && a.cmp == Cmp::Ge
                    && b.cmp == Cmp::Le
                {
                    fused = Some((i, j, Simple::new(a.event.clone(), Cmp::Eq, a.bound)));
                    break 'search;
                }
            }
        }
        match fused {
            Some((i, j, eq)) => {
                // overwriting index `i` in place does not shift `j`
                simples[i] = eq;
                simples.remove(j);
            }
            None => break,
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::True => f.write_str("True"),
            Guard::Simple(s) => write!(f, "{s}"),
            Guard::Conj(list) => f.write_str(&list.iter().join("&&")),
        }
    }
}

/// Capability trait for the SMT-backed decisions the guard algebra and ERA
/// operations rely on (`spec.md` §4.1, §4.5, §9 Design Notes). Kept separate
/// from `Guard`/`Era` so the core data model never links against a concrete
/// solver; `erax-smt` provides the production implementation and tests can
/// substitute a stub.
pub trait GuardOracle {
    /// `true` iff every valuation satisfying `sub` also satisfies `sup`.
    fn is_contained(&self, sub: &Guard, sup: &Guard) -> bool;
    /// `true` iff some valuation (with all clocks `>= 0`) satisfies both.
    fn intersects(&self, a: &Guard, b: &Guard) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_true() {
        assert_eq!(Guard::parse("True").unwrap(), Guard::True);
    }

    #[test]
    fn parses_simple() {
        let g = Guard::parse("a==1").unwrap();
        assert_eq!(g, Guard::simple(Event::new("a"), Cmp::Eq, 1));
    }

    #[test]
    fn reverses_operand_order() {
        let g = Guard::parse("1<=a").unwrap();
        assert_eq!(g, Guard::simple(Event::new("a"), Cmp::Ge, 1));
    }

    #[test]
    fn fuses_ge_le_into_eq() {
        let g = Guard::parse("a>=2&&a<=2").unwrap();
        assert_eq!(g, Guard::simple(Event::new("a"), Cmp::Eq, 2));
    }

    #[test]
    fn conjunction_equality_ignores_order() {
        let g1 = Guard::parse("a>0&&b<3").unwrap();
        let g2 = Guard::parse("b<3&&a>0").unwrap();
        assert_eq!(g1, g2);
    }

    #[test]
    fn canonicalisation_is_idempotent() {
        let once = Guard::parse("a>=2&&a<=2&&a>=2").unwrap();
        let twice = Guard::conjoin([once.clone()]);
        assert_eq!(once, twice);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let g = Guard::parse("a>0&&b<3").unwrap();
        let reparsed = Guard::parse(&g.to_string()).unwrap();
        assert_eq!(g, reparsed);
    }

    #[test]
    fn rejects_missing_operator() {
        assert!(matches!(Guard::parse("a"), Err(GuardError::NoOperator(_))));
    }
}
