//! Learner statistics, injected into [`crate::table::ObservationTable`] and
//! [`crate::driver::learn`] as a handle rather than kept as global counters
//! (`spec.md` §9 Design Notes).

use std::fmt;

use tabled::builder::Builder;

/// Running counters for one learning session.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Total membership queries answered.
    pub membership_queries: u64,
    /// Membership queries answered straight from the `read_word_in_sul` cache.
    pub cached_membership_queries: u64,
    /// Inclusion (`check_inclusion`) queries issued.
    pub inclusion_queries: u64,
    /// Equivalence-query rounds of the outer loop.
    pub equivalence_queries: u64,
    /// Counterexamples processed with the all-prefixes strategy.
    pub all_prefixes_calls: u64,
    /// Counterexamples processed with the Rivest-Schapire strategy.
    pub rivest_schapire_calls: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_membership_query(&mut self) {
        self.membership_queries += 1;
    }

    pub fn record_cached_membership_query(&mut self) {
        self.cached_membership_queries += 1;
    }

    pub fn record_inclusion_query(&mut self) {
        self.inclusion_queries += 1;
    }

    pub fn record_equivalence_query(&mut self) {
        self.equivalence_queries += 1;
    }

    pub fn record_all_prefixes(&mut self) {
        self.all_prefixes_calls += 1;
    }

    pub fn record_rivest_schapire(&mut self) {
        self.rivest_schapire_calls += 1;
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(["metric", "count"]);
        builder.push_record(["membership queries", &self.membership_queries.to_string()]);
        builder.push_record([
            "membership queries (cached)",
            &self.cached_membership_queries.to_string(),
        ]);
        builder.push_record(["inclusion queries", &self.inclusion_queries.to_string()]);
        builder.push_record(["equivalence queries", &self.equivalence_queries.to_string()]);
        builder.push_record(["all-prefixes rounds", &self.all_prefixes_calls.to_string()]);
        builder.push_record([
            "Rivest-Schapire rounds",
            &self.rivest_schapire_calls.to_string(),
        ]);
        write!(f, "{}", builder.build())
    }
}
