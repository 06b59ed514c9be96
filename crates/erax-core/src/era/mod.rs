//! Event-recording automata: the core `Era` data model and its operations
//! (`spec.md` §3, §4.3).

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::event::{Alphabet, Event};
use crate::guard::{Guard, GuardOracle};
use crate::symword::{SymEvent, SymWord};

/// A state of an [`Era`]. States are addressed by their index into
/// [`Era::states`]; `name` is only used for display.
#[derive(Debug, Clone)]
pub struct State {
    name: String,
    index: usize,
    init: bool,
    accepting: bool,
    /// Don't-care flag carried by hypotheses built from a 3ERA (`spec.md`
    /// §4.6): a don't-care state imposes no acceptance requirement until it
    /// is resolved, one way or another, by [`Era::make_dc_states_accepting`]
    /// or by remaining don't-care in a final minimised hypothesis.
    dc: bool,
    /// Live/removed flag. Removed states (e.g. sinks pruned by
    /// [`Era::remove_sinks`]) stay in the arena so existing indices remain
    /// valid, but are skipped by iteration and display.
    status: bool,
}

impl State {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_init(&self) -> bool {
        self.init
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn is_dc(&self) -> bool {
        self.dc
    }

    pub fn is_live(&self) -> bool {
        self.status
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A single labelled, guarded edge between two states.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    src: usize,
    tgt: usize,
    event: Event,
    guard: Guard,
}

impl Transition {
    pub fn src(&self) -> usize {
        self.src
    }

    pub fn tgt(&self) -> usize {
        self.tgt
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.src, self.tgt, self.event, self.guard)
    }
}

/// An event-recording automaton: an alphabet together with a finite state
/// set and a relation of guarded transitions between them (`spec.md` §3).
///
/// `transitions[src][tgt]` holds every transition from `src` to `tgt`; the
/// three maps mirror it from the angles the learner and acceptance checker
/// need: by event, by (source, event), and by (event, guard).
#[derive(Clone)]
pub struct Era {
    alphabet: Alphabet,
    states: Vec<State>,
    transitions: Vec<Vec<Vec<Transition>>>,
    initial: Option<usize>,
    deterministic: bool,

    transitions_on_event: HashMap<Event, Vec<(usize, usize)>>,
    transitions_from_state_on_event: HashMap<usize, HashMap<Event, Vec<Guard>>>,
    transitions_on_letter_from_state: IndexMap<(Event, Guard), HashMap<usize, Vec<usize>>>,
}

impl Era {
    /// Builds an `Era` with `n` fresh, unnamed-but-numbered states (`q0` ..
    /// `q{n-1}`), no transitions, and the given alphabet.
    pub fn new(n: usize, alphabet: Alphabet) -> Self {
        let states = (0..n)
            .map(|i| State {
                name: format!("q{i}"),
                index: i,
                init: false,
                accepting: false,
                dc: false,
                status: true,
            })
            .collect();
        Self {
            alphabet,
            states,
            transitions: vec![vec![Vec::new(); n]; n],
            initial: None,
            deterministic: true,
            transitions_on_event: HashMap::new(),
            transitions_from_state_on_event: HashMap::new(),
            transitions_on_letter_from_state: IndexMap::new(),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.status)
    }

    pub fn state(&self, index: usize) -> &State {
        &self.states[index]
    }

    /// Finds a live state by its display name, e.g. `"q0"`. Used by textual
    /// formats that reference states by name rather than by index
    /// (`spec.md` §6).
    pub fn find_state_by_name(&self, name: &str) -> Option<usize> {
        self.states()
            .find(|s| s.name() == name)
            .map(State::index)
    }

    /// Renames a state, e.g. to honour an explicit name from a textual
    /// description rather than the default `q{index}`.
    pub fn rename_state(&mut self, index: usize, name: impl Into<String>) {
        self.states[index].name = name.into();
    }

    pub fn nstates(&self) -> usize {
        self.states.len()
    }

    /// The number of live (non-removed) states.
    pub fn states_count(&self) -> usize {
        self.states().count()
    }

    pub fn initial_state(&self) -> Option<usize> {
        self.initial
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn out_transitions(&self, src: usize) -> impl Iterator<Item = &Transition> {
        self.transitions[src].iter().flatten()
    }

    pub fn transitions_between(&self, src: usize, tgt: usize) -> &[Transition] {
        &self.transitions[src][tgt]
    }

    /// Every `(src, tgt)` pair with at least one transition on `event`,
    /// used by the symbolic acceptance check to avoid scanning the full
    /// `n x n` transition matrix per event per position.
    pub fn transitions_on_event(&self, event: &Event) -> &[(usize, usize)] {
        self.transitions_on_event
            .get(event)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every distinct `(event, guard)` pair labelling some transition of
    /// this automaton, in first-insertion order — the symbolic alphabet
    /// C7's forward exploration iterates over per state-set.
    pub fn letters(&self) -> impl Iterator<Item = &(Event, Guard)> {
        self.transitions_on_letter_from_state.keys()
    }

    /// The targets reachable from `src` on exactly the letter
    /// `(event, guard)`, via the (event, guard)-then-source reverse index.
    pub fn targets_on_letter(&self, event: &Event, guard: &Guard, src: usize) -> &[usize] {
        self.transitions_on_letter_from_state
            .get(&(event.clone(), guard.clone()))
            .and_then(|by_src| by_src.get(&src))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn make_initial(&mut self, index: usize) {
        self.states[index].init = true;
        self.initial = Some(index);
    }

    pub fn make_final(&mut self, index: usize) {
        self.states[index].accepting = true;
    }

    pub fn make_dc(&mut self, index: usize) {
        self.states[index].dc = true;
    }

    /// Resolves every remaining don't-care state to accepting, e.g. once a
    /// 3ERA hypothesis has converged and must be turned into an ordinary
    /// ERA for output (`spec.md` §4.6).
    pub fn make_dc_states_accepting(&mut self) {
        for s in &mut self.states {
            if s.dc {
                s.dc = false;
                s.accepting = true;
            }
        }
    }

    /// Appends a fresh state and returns its index.
    pub fn add_state(&mut self) -> usize {
        let index = self.states.len();
        self.states.push(State {
            name: format!("q{index}"),
            index,
            init: false,
            accepting: false,
            dc: false,
            status: true,
        });
        for row in &mut self.transitions {
            row.push(Vec::new());
        }
        self.transitions.push(vec![Vec::new(); self.states.len()]);
        index
    }

    /// Marks `index` removed: clears its acceptance and every outgoing
    /// transition, but keeps the slot in the arena so other indices stay
    /// valid.
    pub fn del_state(&mut self, index: usize) {
        self.states[index].status = false;
        self.states[index].accepting = false;
        for tgt in 0..self.states.len() {
            self.transitions[index][tgt].clear();
        }
    }

    fn record_indices(&mut self, src: usize, event: Event, guard: Guard, tgt: usize) {
        self.transitions_on_event
            .entry(event.clone())
            .or_default()
            .push((src, tgt));
        self.transitions_from_state_on_event
            .entry(src)
            .or_default()
            .entry(event.clone())
            .or_default()
            .push(guard.clone());
        self.transitions_on_letter_from_state
            .entry((event, guard))
            .or_default()
            .entry(src)
            .or_default()
            .push(tgt);
    }

    /// Adds a transition without any subsumption check, mirroring the
    /// unchecked insertion used while constructing a product automaton.
    pub fn nd_add_transition(&mut self, src: usize, event: Event, guard: Guard, tgt: usize) {
        self.transitions[src][tgt].push(Transition {
            src,
            tgt,
            event: event.clone(),
            guard: guard.clone(),
        });
        self.record_indices(src, event, guard, tgt);
    }

    /// Adds a transition `src --event[guard]--> tgt`, keeping the transition
    /// relation subsumption-free: if an existing transition on the same
    /// event between the same pair of states has a guard that contains (or
    /// is) `guard`, the new transition is redundant and dropped; if instead
    /// the new guard contains an existing one (or the new guard is `True`),
    /// the weaker transitions are replaced (`spec.md` §4.3).
    pub fn add_transition(
        &mut self,
        oracle: &impl GuardOracle,
        src: usize,
        event: Event,
        guard: Guard,
        tgt: usize,
    ) {
        let mut to_delete = Vec::new();
        for t in &self.transitions[src][tgt] {
            if t.event != event {
                continue;
            }
            if guard.is_true() || oracle.is_contained(&guard, &t.guard) {
                trace!(%event, %guard, "redundant transition, existing guard subsumes it");
                return;
            } else if t.guard.is_true() || oracle.is_contained(&t.guard, &guard) {
                to_delete.push(t.clone());
            }
        }
        for t in to_delete {
            self.del_transition(&t);
        }
        self.nd_add_transition(src, event, guard, tgt);
    }

    /// Removes `target`, keeping every reverse index consistent with the
    /// transition table (`spec.md` §3: "three reverse indices kept
    /// consistent with the table").
    fn del_transition(&mut self, target: &Transition) {
        self.transitions[target.src][target.tgt].retain(|t| t != target);

        if let Some(pairs) = self.transitions_on_event.get_mut(&target.event) {
            if let Some(pos) = pairs.iter().position(|&(s, t)| s == target.src && t == target.tgt) {
                pairs.remove(pos);
            }
        }
        if let Some(by_event) = self.transitions_from_state_on_event.get_mut(&target.src) {
            if let Some(guards) = by_event.get_mut(&target.event) {
                if let Some(pos) = guards.iter().position(|g| g == &target.guard) {
                    guards.remove(pos);
                }
            }
        }
        let key = (target.event.clone(), target.guard.clone());
        if let Some(by_src) = self.transitions_on_letter_from_state.get_mut(&key) {
            if let Some(targets) = by_src.get_mut(&target.src) {
                if let Some(pos) = targets.iter().position(|&t| t == target.tgt) {
                    targets.remove(pos);
                }
            }
        }
    }

    /// Executes a single guarded letter from `state`, returning the unique
    /// successor state, or `None` if no transition applies. Since `w`'s
    /// guard is assumed to describe a single region, non-determinism within
    /// the automaton would make the first intersecting transition
    /// ambiguous; for deterministic ERAs this never arises.
    pub fn step(&self, oracle: &impl GuardOracle, state: usize, w: &SymEvent) -> Option<usize> {
        for tgt in 0..self.states.len() {
            for t in &self.transitions[state][tgt] {
                if &t.event == w.event() && oracle.intersects(w.guard(), &t.guard) {
                    return Some(tgt);
                }
            }
        }
        None
    }

    /// Executes `w` letter by letter from `start`, short-circuiting to
    /// `None` the moment a letter cannot be read.
    pub fn read_word(&self, oracle: &impl GuardOracle, start: usize, w: &SymWord) -> Option<usize> {
        let mut state = start;
        for event in w.events() {
            state = self.step(oracle, state, event)?;
        }
        Some(state)
    }

    /// Whether every concretisation of the symbolic region-word `w` is
    /// accepted by this automaton, starting from `q_src` (defaulting to the
    /// initial state).
    pub fn accepts(&self, oracle: &impl GuardOracle, w: &SymWord, q_src: Option<usize>) -> bool {
        let start = q_src.or(self.initial).expect("era has no initial state");
        match self.read_word(oracle, start, w) {
            Some(q) => self.states[q].accepting,
            None => false,
        }
    }

    /// Flips acceptance of every state in place. Only defined for
    /// deterministic ERAs, since complementing a non-deterministic
    /// automaton this way does not compute the language complement.
    pub fn complement(&mut self) {
        assert!(
            self.deterministic,
            "complement is only defined for deterministic ERAs"
        );
        for s in &mut self.states {
            s.accepting = !s.accepting;
        }
    }

    /// A sink is a non-accepting state with no outgoing transition to a
    /// different state (only self-loops, or no transitions at all).
    /// Removing sinks keeps the automaton's language unchanged while
    /// shrinking its visible state set (`spec.md` §4.3).
    pub fn remove_sinks(&mut self) {
        let n = self.states.len();
        let mut sinks = Vec::new();
        for q in 0..n {
            if !self.states[q].status {
                continue;
            }
            let has_outgoing_elsewhere = (0..n)
                .filter(|&qp| qp != q)
                .any(|qp| !self.transitions[q][qp].is_empty());
            if !has_outgoing_elsewhere && !self.states[q].accepting {
                sinks.push(q);
            }
        }
        for q in sinks {
            self.del_state(q);
        }
    }

    /// The synchronous product of two ERAs over the same alphabet: a
    /// transition exists on `(i1,i2) -> (j1,j2)` for event `e` whenever both
    /// factors have a transition on `e` between the corresponding states,
    /// guarded by the conjunction of the two guards (or just one of them,
    /// if they are equal). Initial/accepting status is the conjunction of
    /// the two factors' (`spec.md` §4.3, used by [`crate`]'s reachability
    /// construction and by the BoundedReachabilityOracle in `erax-learning`).
    pub fn product(&self, other: &Era) -> Era {
        assert_eq!(
            self.alphabet.events(),
            other.alphabet.events(),
            "product is only defined over automata sharing an alphabet"
        );
        let n1 = self.states.len();
        let n2 = other.states.len();
        let mut out = Era::new(n1 * n2, self.alphabet.clone());

        for i in 0..n1 {
            for j in 0..n2 {
                let idx = i * n2 + j;
                if self.states[i].init && other.states[j].init {
                    out.make_initial(idx);
                }
                if self.states[i].accepting && other.states[j].accepting {
                    out.make_final(idx);
                }
                if self.states[i].dc || other.states[j].dc {
                    out.make_dc(idx);
                }
                out.states[idx].status = self.states[i].status && other.states[j].status;
            }
        }

        for i1 in 0..n1 {
            for j1 in 0..n1 {
                for t1 in &self.transitions[i1][j1] {
                    for i2 in 0..n2 {
                        for j2 in 0..n2 {
                            for t2 in &other.transitions[i2][j2] {
                                if t2.event != t1.event {
                                    continue;
                                }
                                let new_guard = if t1.guard == t2.guard {
                                    t1.guard.clone()
                                } else {
                                    Guard::conjoin([t1.guard.clone(), t2.guard.clone()])
                                };
                                let src = i1 * n2 + i2;
                                let tgt = j1 * n2 + j2;
                                out.nd_add_transition(src, t1.event.clone(), new_guard, tgt);
                            }
                        }
                    }
                }
            }
        }

        out.deterministic = self.deterministic && other.deterministic;
        out
    }

    /// Returns every pair of live state indices whose merger would be
    /// unsound: one accepting and the other rejecting (neither don't-care),
    /// closed under "leads by the same letter into an already-incompatible
    /// pair" (`spec.md` §4.7, used by DERA minimisation).
    pub fn find_incompatible_pairs(&self) -> Vec<(usize, usize)> {
        let live: Vec<usize> = (0..self.states.len())
            .filter(|&i| self.states[i].status)
            .collect();

        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (a, &i) in live.iter().enumerate() {
            for &j in &live[a + 1..] {
                let acc_i = self.states[i].accepting;
                let acc_j = self.states[j].accepting;
                let dc_i = self.states[i].dc;
                let dc_j = self.states[j].dc;
                let mismatched = (!acc_i && !dc_i && acc_j) || (!acc_j && !dc_j && acc_i);
                if mismatched {
                    pairs.push(order(i, j));
                }
            }
        }

        loop {
            let mut grown = pairs.clone();
            for (a, &i) in live.iter().enumerate() {
                for &j in &live[a + 1..] {
                    let pair = order(i, j);
                    if pairs.contains(&pair) {
                        continue;
                    }
                    if pairs
                        .iter()
                        .any(|&(p0, p1)| self.leads_into_incompatible(i, j, p0, p1))
                    {
                        grown.push(pair);
                    }
                }
            }
            if grown.len() == pairs.len() {
                break;
            }
            pairs = grown;
        }
        pairs
    }

    fn leads_into_incompatible(&self, src1: usize, src2: usize, t0: usize, t1: usize) -> bool {
        let shares_letter = |a: usize, b: usize| {
            self.transitions[src1][a].iter().any(|ta| {
                self.transitions[src2][b]
                    .iter()
                    .any(|tb| ta.event == tb.event && ta.guard == tb.guard)
            })
        };
        shares_letter(t0, t1) || shares_letter(t1, t0)
    }

    /// Returns every maximal set of pairwise-compatible live state indices
    /// (`spec.md` §4.7), by starting from the set of all states and
    /// repeatedly splitting out an offending state from any set that still
    /// contains an incompatible pair.
    pub fn find_maximal_compatible_sets(&self) -> Vec<Vec<usize>> {
        use std::collections::BTreeSet;

        let live: BTreeSet<usize> = (0..self.states.len())
            .filter(|&i| self.states[i].status)
            .collect();
        let incompatible = self.find_incompatible_pairs();

        let mut sets: Vec<BTreeSet<usize>> = vec![live];
        loop {
            let mut changed = false;
            let mut next: Vec<BTreeSet<usize>> = Vec::new();
            for set in &sets {
                if let Some(&(x, y)) = incompatible
                    .iter()
                    .find(|&&(x, y)| set.contains(&x) && set.contains(&y))
                {
                    changed = true;
                    let without_x: BTreeSet<usize> = set.iter().copied().filter(|&e| e != x).collect();
                    let without_y: BTreeSet<usize> = set.iter().copied().filter(|&e| e != y).collect();
                    for candidate in [without_x, without_y] {
                        if !next.iter().any(|s| candidate.is_subset(s)) {
                            next.push(candidate);
                        }
                    }
                } else {
                    next.push(set.clone());
                }
            }
            sets = next;
            if !changed {
                break;
            }
        }

        sets.into_iter().map(|s| s.into_iter().collect()).collect()
    }
}

fn order(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of states: {}", self.states_count())?;
        for e in self.alphabet.events() {
            write!(f, "event:{e}{{")?;
            if self.alphabet.is_active(e) {
                write!(f, "active")?;
            }
            writeln!(f, "}}")?;
        }
        for s in self.states() {
            write!(f, "location:{s}{{")?;
            let mut attrs = Vec::new();
            if s.init {
                attrs.push("initial".to_string());
            }
            if s.accepting {
                attrs.push("accepting".to_string());
            }
            if s.dc {
                attrs.push("don't care".to_string());
            }
            write!(f, "{}", attrs.join(","))?;
            writeln!(f, "}}")?;
        }
        for i in 0..self.states.len() {
            if !self.states[i].status {
                continue;
            }
            for j in 0..self.states.len() {
                if !self.states[j].status {
                    continue;
                }
                for t in &self.transitions[i][j] {
                    writeln!(
                        f,
                        "transition:{}:{}:{}:{}",
                        self.states[i].name(),
                        self.states[j].name(),
                        t.event(),
                        t.guard()
                    )?;
                }
            }
        }
        write!(f, "deterministic? {}", if self.deterministic { "Yes" } else { "No" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::Cmp;

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
        a.declare(Event::new("b"), true);
        a
    }

    #[test]
    fn single_event_unconditional_acceptance() {
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_final(1);
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);

        let w = SymWord::from_events([SymEvent::new(Event::new("a"), Guard::True)]);
        assert!(era.accepts(&TrueOracle, &w, None));
    }

    #[test]
    fn epsilon_acceptance_checks_initial_state() {
        let mut era = Era::new(1, alphabet());
        era.make_initial(0);
        era.make_final(0);
        assert!(era.accepts(&TrueOracle, &SymWord::epsilon(), None));
    }

    #[test]
    fn add_transition_drops_redundant_subsumed_guard() {
        let mut era = Era::new(2, alphabet());
        era.add_transition(
            &TrueOracle,
            0,
            Event::new("a"),
            Guard::simple(Event::new("a"), Cmp::Eq, 1),
            1,
        );
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);
        assert_eq!(era.transitions_between(0, 1).len(), 1);
        assert!(era.transitions_between(0, 1)[0].guard.is_true());
    }

    #[test]
    fn replaced_transition_is_pruned_from_every_reverse_index() {
        let mut era = Era::new(2, alphabet());
        let weak = Guard::simple(Event::new("a"), Cmp::Eq, 1);
        era.add_transition(&TrueOracle, 0, Event::new("a"), weak.clone(), 1);
        // True subsumes weak: the weak transition (and its index entries)
        // must be replaced, not merely shadowed.
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);

        assert!(era.targets_on_letter(&Event::new("a"), &weak, 0).is_empty());
        assert_eq!(
            era.targets_on_letter(&Event::new("a"), &Guard::True, 0).to_vec(),
            vec![1usize]
        );
        assert_eq!(
            era.transitions_on_event(&Event::new("a")).to_vec(),
            vec![(0usize, 1usize)],
            "stale duplicate (src,tgt) pair must not linger after subsumption"
        );
    }

    #[test]
    fn letters_reflects_every_distinct_label() {
        let mut era = Era::new(2, alphabet());
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);
        era.add_transition(&TrueOracle, 0, Event::new("b"), Guard::True, 1);
        let letters: Vec<_> = era.letters().cloned().collect();
        assert_eq!(letters.len(), 2);
        assert!(letters.contains(&(Event::new("a"), Guard::True)));
        assert!(letters.contains(&(Event::new("b"), Guard::True)));
    }

    #[test]
    fn complement_flips_every_state() {
        let mut era = Era::new(2, alphabet());
        era.make_final(0);
        era.complement();
        assert!(!era.state(0).is_accepting());
        assert!(era.state(1).is_accepting());
    }

    #[test]
    fn remove_sinks_prunes_dead_ends() {
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_final(0);
        // state 1 has no outgoing transitions and is not accepting: a sink
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);
        era.remove_sinks();
        assert!(!era.state(1).is_live());
        assert!(era.state(0).is_live());
    }

    #[test]
    fn incompatible_pairs_include_accept_reject_mismatch() {
        let mut era = Era::new(2, alphabet());
        era.make_final(0);
        let pairs = era.find_incompatible_pairs();
        assert!(pairs.contains(&(0, 1)));
    }

    #[test]
    fn renamed_state_is_found_by_name() {
        let mut era = Era::new(2, alphabet());
        era.rename_state(0, "s0");
        assert_eq!(era.find_state_by_name("s0"), Some(0));
        assert_eq!(era.find_state_by_name("q1"), Some(1));
        assert_eq!(era.find_state_by_name("missing"), None);
    }

    #[test]
    fn display_references_transitions_by_state_name() {
        let mut era = Era::new(2, alphabet());
        era.make_initial(0);
        era.make_final(1);
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);
        let text = era.to_string();
        assert!(text.contains("transition:q0:q1:a:True"));
    }

    #[test]
    fn dc_state_is_not_incompatible_with_either_side() {
        let mut era = Era::new(2, alphabet());
        era.make_final(0);
        era.make_dc(1);
        let pairs = era.find_incompatible_pairs();
        assert!(pairs.is_empty());
    }
}
