//! woebin: Weight-of-Evidence binning library
//!
//! Discretizes continuous features against a binary target: quantile
//! pre-binning, Laplace-smoothed WoE statistics and greedy merging of
//! adjacent bins until the WoE profile converges.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
