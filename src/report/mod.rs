//! Report module - bin tables, JSON export and monthly stability

pub mod bin_table;
pub mod export;
pub mod stability;

pub use bin_table::*;
pub use export::*;
pub use stability::*;
