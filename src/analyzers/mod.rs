//! Aggregation and scoring of per-entity sentiment signal.
//!
//! Every function here is pure: it takes already-decoded records and returns
//! a new display-ready structure, degrading to a documented placeholder
//! instead of failing on empty or malformed input.

pub mod bucket;
pub mod complaints;
pub mod labels;
pub mod rank;
pub mod report;
pub mod sentiment;
pub mod series;
pub mod types;
pub mod utility;
pub mod volatility;
