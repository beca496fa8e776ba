//! Pipeline module - partitioning, WoE statistics, merging and orchestration

pub mod batch;
pub mod discretizer;
pub mod error;
pub mod loader;
pub mod merger;
pub mod observation;
pub mod partition;
pub mod statistics;

pub use batch::*;
pub use discretizer::*;
pub use error::{DiscretizeError, EmptyInputKind};
pub use loader::*;
pub use merger::{adjacent_woe_gaps, apply_merge, propose_merge, MergeProposal};
pub use observation::{observations_from_columns, Observation, OutcomeTotals};
pub use partition::{partition, Partition, QuantilePartition};
pub use statistics::{compute, StatisticsTable, WoeBin, DEFAULT_LAPLACE_EPSILON};
