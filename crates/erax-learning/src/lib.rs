//! Active learning of event-recording automata: the observation table,
//! DERA minimisation, the reachability capability used for equivalence
//! queries, and the outer learner loop that ties them together.

pub mod driver;
pub mod minimize;
pub mod oracle;
pub mod stats;
pub mod table;

pub use driver::learn;
pub use minimize::compute_minimal_dera;
pub use oracle::{BoundedReachabilityOracle, ReachabilityOracle};
pub use stats::Stats;
pub use table::{Cell, ObservationTable};
