//! SMT-backed decisions for the guard algebra and ERA acceptance
//! (`spec.md` §4.1, §4.5, §9 Design Notes). Kept in its own crate so
//! `erax-core`'s data model never links a concrete solver: this crate
//! implements `erax_core::GuardOracle` and layers the symbolic acceptance
//! check on top of it.

mod acceptance;
mod containment;

pub use acceptance::{check, is_empty};
pub use containment::Z3GuardOracle;
