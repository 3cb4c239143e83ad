//! Providers Module - Akamai OPEN API access
//!
//! EdgeGrid signing plus the signed HTTP client.

pub mod appsec;
pub mod edgegrid;

pub use appsec::*;
pub use edgegrid::*;
