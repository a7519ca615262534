//! Round numbering and task distribution.
//!
//! Maps the external, discontinuous on-chain round counter onto the internal
//! contiguous round numbering, and provisions each new internal round with a
//! bounded, randomly sampled task set.

pub(crate) mod mapper;
pub(crate) mod provisioner;
pub(crate) mod watcher;

/// Number of tasks sampled for each round. Longer rounds require more tasks
/// per round; this value is expected to be tuned based on measurements.
pub(crate) const TASKS_PER_ROUND: u64 = 1000;

/// How many tasks each checker node is expected to complete per round (at most).
pub(crate) const MAX_TASKS_PER_NODE: i32 = 15;
