//! The observation table (`spec.md` §4.6): rows `S`, columns `E`, filled
//! against a ground-truth ERA (the system under learning, "SUL") via
//! SMT-backed membership queries, and turned into a candidate 3ERA
//! hypothesis once closed and consistent.

use erax_core::{Alphabet, Era, SymEvent, SymWord};
use erax_smt::Z3GuardOracle;
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::trace;

use crate::stats::Stats;

/// A single table cell: the word is accepted, rejected, or its status is
/// unresolved because the word itself denotes no concrete timed word (an
/// infeasible region combination), in which case the row carries no
/// acceptance information and the corresponding state is a don't-care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Accept,
    Reject,
    Unknown,
}

/// Builds `A = L x R`: every active-clock region guard, crossed with every
/// event in the alphabet (`spec.md` §4.4, §4.6).
fn symbolic_alphabet(alphabet: &Alphabet, m: u32) -> Vec<SymEvent> {
    let regions = erax_core::enumerate_regions(m, &alphabet.active_clocks());
    alphabet
        .events()
        .iter()
        .flat_map(|event| {
            regions
                .iter()
                .map(move |region| SymEvent::new(event.clone(), region.clone()))
        })
        .collect()
}

fn letter_word(letter: SymEvent) -> SymWord {
    SymWord::from_events([letter])
}

pub struct ObservationTable<'a> {
    alphabet: Alphabet,
    symbols: Vec<SymEvent>,
    s: Vec<SymWord>,
    e: Vec<SymWord>,
    table: IndexMap<SymWord, Vec<Cell>>,
    inconsistent_words: IndexMap<SymWord, ()>,
    read_word_in_sul: IndexMap<SymWord, Option<usize>>,
    sul: &'a Era,
    guard_oracle: &'a Z3GuardOracle,
    stats: &'a mut Stats,
}

impl<'a> ObservationTable<'a> {
    pub fn new(sul: &'a Era, m: u32, guard_oracle: &'a Z3GuardOracle, stats: &'a mut Stats) -> Self {
        let alphabet = sul.alphabet().clone();
        let symbols = symbolic_alphabet(&alphabet, m);

        let mut table = Self {
            alphabet,
            symbols,
            s: Vec::new(),
            e: Vec::new(),
            table: IndexMap::new(),
            inconsistent_words: IndexMap::new(),
            read_word_in_sul: IndexMap::new(),
            sul,
            guard_oracle,
            stats,
        };

        let epsilon = SymWord::epsilon();
        table.s.push(epsilon.clone());
        table.e.push(epsilon.clone());

        let initial = sul.initial_state().expect("sul has no initial state");
        let accepts = erax_smt::check(table.guard_oracle, table.sul, &epsilon);
        table.stats.record_membership_query();
        table.stats.record_cached_membership_query();
        table.table.insert(
            epsilon.clone(),
            vec![if accepts { Cell::Accept } else { Cell::Reject }],
        );
        table.read_word_in_sul.insert(epsilon, Some(initial));
        table
    }

    pub fn symbols(&self) -> &[SymEvent] {
        &self.symbols
    }

    pub fn rows(&self) -> &[SymWord] {
        &self.s
    }

    pub fn columns(&self) -> &[SymWord] {
        &self.e
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        self.stats
    }

    pub fn record_equivalence_query(&mut self) {
        self.stats.record_equivalence_query();
    }

    fn membership(&mut self, w: &SymWord) -> Cell {
        self.stats.record_membership_query();

        if let Some(q) = self.read_word_in_sul.get(w) {
            self.stats.record_cached_membership_query();
            return match q {
                Some(state) if self.sul.state(*state).is_accepting() => Cell::Accept,
                _ => Cell::Reject,
            };
        }

        let prefix_len = w.len().saturating_sub(1);
        let prefix = w.prefix_of_len(prefix_len);
        let last = w.events().last().cloned();

        let q_final = if let (Some(&q_prev), Some(letter)) =
            (self.read_word_in_sul.get(&prefix), last.as_ref())
        {
            q_prev.and_then(|q| self.sul.step(self.guard_oracle, q, letter))
        } else {
            let start = self.sul.initial_state().expect("sul has no initial state");
            self.sul.read_word(self.guard_oracle, start, w)
        };

        self.read_word_in_sul.insert(w.clone(), q_final);
        match q_final {
            Some(q) if self.sul.state(q).is_accepting() => Cell::Accept,
            _ => Cell::Reject,
        }
    }

    /// Queries the table entry for `p.s` (`s` defaulting to `ε`), marking
    /// both `p` and `p.s` inconsistent (i.e. infeasible) if either is.
    fn evaluate_and_add(&mut self, p: &SymWord, s: Option<&SymWord>) -> Cell {
        let suffix = s.cloned().unwrap_or_else(SymWord::epsilon);
        let w = p.concat(&suffix);

        if self.inconsistent_words.contains_key(p) || erax_smt::is_empty(self.guard_oracle, &w) {
            self.inconsistent_words.insert(w, ());
            return Cell::Unknown;
        }

        self.membership(&w)
    }

    /// Adds `prefix` as a fresh row if it is not already present, filling
    /// every column. Infeasible prefixes get an all-`Unknown` row (they
    /// will feed a don't-care state once a hypothesis is built).
    fn check_and_update_row(&mut self, prefix: &SymWord) {
        if self.table.contains_key(prefix) {
            return;
        }
        let first = self.evaluate_and_add(prefix, None);
        if first == Cell::Unknown {
            self.table
                .insert(prefix.clone(), vec![Cell::Unknown; self.e.len()]);
            return;
        }
        let mut row = vec![first];
        for suffix in &self.e[1..] {
            let suffix = suffix.clone();
            row.push(self.evaluate_and_add(prefix, Some(&suffix)));
        }
        self.table.insert(prefix.clone(), row);
    }

    pub fn add_s_dot_sigma(&mut self, prefixes: &[SymWord]) {
        for prefix in prefixes {
            for symbol in self.symbols.clone() {
                let extended = prefix.concat(&letter_word(symbol));
                self.check_and_update_row(&extended);
            }
        }
    }

    fn update_new_column(&mut self, suffix: &SymWord) {
        let rows: Vec<SymWord> = self.table.keys().cloned().collect();
        for p in rows {
            let cell = self.evaluate_and_add(&p, Some(suffix));
            self.table.get_mut(&p).expect("row exists").push(cell);
        }
    }

    /// If some `s.a` (`s` in `S`, `a` in the alphabet) has a row not present
    /// among `S`'s own rows, moves it into `S`. Returns whether anything was
    /// added.
    pub fn close_table(&mut self) -> bool {
        let s_values: Vec<Vec<Cell>> = self
            .s
            .iter()
            .map(|s| self.table[s].clone())
            .collect();

        let mut new_rows: Vec<SymWord> = Vec::new();
        let mut new_values: Vec<Vec<Cell>> = Vec::new();

        for s in self.s.clone() {
            for symbol in self.symbols.clone() {
                let p = s.concat(&letter_word(symbol));
                let value = self.table[&p].clone();
                if !s_values.contains(&value) && !new_values.contains(&value) {
                    new_values.push(value);
                    new_rows.push(p);
                }
            }
        }

        if new_rows.is_empty() {
            return false;
        }
        self.s.extend(new_rows.iter().cloned());
        self.add_s_dot_sigma(&new_rows);
        true
    }

    /// If two rows `s1`, `s2` agree but `s1.a`, `s2.a` disagree for some
    /// letter `a`, finds the distinguishing suffix and prepends `a`,
    /// growing `E`. Returns whether a column was added.
    pub fn consistent_table(&mut self) -> bool {
        for i in 0..self.s.len() {
            for j in (i + 1)..self.s.len() {
                let (s1, s2) = (self.s[i].clone(), self.s[j].clone());
                if self.table[&s1] != self.table[&s2] {
                    continue;
                }
                for symbol in self.symbols.clone() {
                    let p1 = s1.concat(&letter_word(symbol.clone()));
                    let p2 = s2.concat(&letter_word(symbol.clone()));
                    if self.table[&p1] == self.table[&p2] {
                        continue;
                    }

                    let problematic = if self.table[&p1].iter().all(|c| *c == Cell::Unknown)
                        || self.table[&p2].iter().all(|c| *c == Cell::Unknown)
                    {
                        SymWord::epsilon()
                    } else {
                        let index = self.table[&p1]
                            .iter()
                            .zip(&self.table[&p2])
                            .position(|(a, b)| a != b)
                            .expect("rows differ at some column");
                        self.e[index].clone()
                    };

                    let suffix = letter_word(symbol).concat(&problematic);
                    self.e.push(suffix.clone());
                    self.update_new_column(&suffix);
                    return true;
                }
            }
        }
        false
    }

    pub fn make_close_and_consistent(&mut self) {
        loop {
            let mut changed = self.close_table();
            while self.close_table() {
                changed = true;
            }
            if self.consistent_table() {
                changed = true;
                continue;
            }
            if !changed {
                break;
            }
        }
    }

    /// Every non-empty prefix of `w` is added as a row (the all-prefixes
    /// counterexample-processing strategy, `spec.md` §4.8).
    pub fn add_all_prefixes_to_s(&mut self, w: &SymWord) {
        for prefix in w.prefixes() {
            if self.s.contains(&prefix) {
                continue;
            }
            self.s.push(prefix.clone());
            self.check_and_update_row(&prefix);
            self.add_s_dot_sigma(std::slice::from_ref(&prefix));
        }
    }

    /// Finds the shortest suffix `v` of `w` such that replacing `w`'s
    /// prefix with the row `S` already maps it to still disagrees on `v`
    /// (the Rivest-Schapire binary search, `spec.md` §4.8), and adds it as
    /// a new column.
    pub fn add_ws_to_e(
        &mut self,
        w: &SymWord,
        hypothesis: &Era,
        row_of_state: &IndexMap<usize, Vec<Cell>>,
        sul_accepts_w: bool,
    ) {
        let mut left = 0i64;
        let mut right = w.len() as i64 - 1;
        let mut witness = None;

        loop {
            let pos = ((left + right) / 2).max(0) as usize;
            let u = w.prefix_of_len(pos);
            let v = w.suffix_from(pos);

            let initial = hypothesis.initial_state().expect("hypothesis has no initial state");
            let q = hypothesis
                .read_word(self.guard_oracle, initial, &u)
                .expect("hypothesis run on a prefix of the counterexample should be defined");

            let row_for_u = row_of_state
                .get(&q)
                .expect("every hypothesis state corresponds to a table row");
            let s = self
                .s
                .iter()
                .find(|s| &self.table[*s] == row_for_u)
                .expect("no row in S matched the hypothesis state for u")
                .clone();

            let new_word = s.concat(&v);
            self.stats.record_membership_query();

            let feasible_and_matches = !erax_smt::is_empty(self.guard_oracle, &new_word)
                && erax_smt::check(self.guard_oracle, self.sul, &new_word) == sul_accepts_w;

            if feasible_and_matches {
                left = pos as i64 + 1;
                if right < left {
                    witness = Some(v.suffix_from(1));
                    break;
                }
            } else {
                right = pos as i64 - 1;
                if right < left {
                    witness = Some(v);
                    break;
                }
            }
        }

        let witness = witness.unwrap_or_else(SymWord::epsilon);
        let witness = if witness.is_empty() { SymWord::epsilon() } else { witness };
        if !self.e.contains(&witness) {
            self.e.push(witness.clone());
            self.update_new_column(&witness);
        }
    }

    /// Processes a counterexample with either the all-prefixes strategy or
    /// the Rivest-Schapire binary search (`spec.md` §4.8).
    pub fn add_counterexample(
        &mut self,
        w: &SymWord,
        hypothesis: &Era,
        accepted_by_sul: bool,
        row_of_state: &IndexMap<usize, Vec<Cell>>,
        use_all_prefixes: bool,
    ) {
        if use_all_prefixes {
            self.stats.record_all_prefixes();
            self.add_all_prefixes_to_s(w);
        } else {
            self.stats.record_rivest_schapire();
            self.add_ws_to_e(w, hypothesis, row_of_state, accepted_by_sul);
        }
    }

    fn distinct_rows(&self) -> Vec<SymWord> {
        let mut sorted = self.s.clone();
        sorted.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.to_string().cmp(&b.to_string())));

        sorted
            .into_iter()
            .unique_by(|s| self.table[s].clone())
            .collect()
    }

    /// Synthesises a candidate 3ERA from the (closed, consistent) table:
    /// one state per distinct row, transitions following `S.A`'s table
    /// entries, and a single don't-care state absorbing every prefix whose
    /// feasibility is unresolved (`spec.md` §4.6).
    pub fn generate_3era(&self) -> (Era, IndexMap<usize, Vec<Cell>>) {
        let distinct_rows = self.distinct_rows();
        let mut era = Era::new(distinct_rows.len(), self.alphabet.clone());

        let mut state_of_row: IndexMap<Vec<Cell>, usize> = IndexMap::new();
        for (index, row) in distinct_rows.iter().enumerate() {
            state_of_row.insert(self.table[row].clone(), index);
        }

        era.make_initial(0);
        let mut dc_state = None;
        for (index, row) in distinct_rows.iter().enumerate() {
            match self.table[row][0] {
                Cell::Accept => era.make_final(index),
                Cell::Unknown => {
                    era.make_dc(index);
                    dc_state = Some(index);
                }
                Cell::Reject => {}
            }
        }

        for (i, row) in distinct_rows.iter().enumerate() {
            for symbol in &self.symbols {
                let prefix = row.concat(&letter_word(symbol.clone()));
                let Some(value) = self.table.get(&prefix) else {
                    continue;
                };
                let tgt = match state_of_row.get(value) {
                    Some(&tgt) => tgt,
                    None => dc_state.expect("unresolved transition target needs a don't-care state"),
                };
                era.nd_add_transition(i, symbol.event().clone(), symbol.guard().clone(), tgt);
            }
        }

        if let Some(dc) = dc_state {
            for symbol in &self.symbols {
                era.nd_add_transition(dc, symbol.event().clone(), symbol.guard().clone(), dc);
            }
        }

        let row_of_state: IndexMap<usize, Vec<Cell>> = state_of_row
            .into_iter()
            .map(|(row, state)| (state, row))
            .collect();
        trace!(states = era.nstates(), "generated 3ERA hypothesis");
        (era, row_of_state)
    }
}
