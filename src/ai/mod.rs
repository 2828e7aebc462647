//! Hamiltonian-cycle autopilot
//!
//! - [`cycle`]: random spanning tree on the half-resolution grid, expanded
//!   into a tour of every board cell
//! - [`index`]: cell to tour position lookup
//! - [`agent`]: per-tick move selection (shortcut or follow the tour)

pub mod agent;
pub mod cycle;
pub mod index;

pub use agent::{Decision, DecisionKind, HamiltonianAgent};
pub use cycle::{CycleError, CycleGenerator, HamiltonianCycle, SpanningTree};
pub use index::CycleIndex;
