//! Core Module - Report pipeline
//!
//! Account resolution, config enumeration and policy aggregation.

pub mod aggregator;
pub mod resolver;

pub use aggregator::*;
pub use resolver::*;
