//! Guard algebra, symbolic words and the event-recording-automaton (ERA)
//! data model shared by the SMT backend, the active learner and the
//! textual-format crates.

pub mod era;
pub mod event;
pub mod guard;
pub mod region;
pub mod symword;

pub use era::{Era, State, Transition};
pub use event::{Alphabet, Event};
pub use guard::{Cmp, Guard, GuardError, GuardOracle, Simple};
pub use region::enumerate_regions;
pub use symword::{SymEvent, SymWord};
