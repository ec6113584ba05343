//! Progression and scoring rules for the coding academy.
//!
//! Everything here is pure: profiles go in, updated copies come out. Storage
//! and timing live in the `storage` and `services` crates.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod grader;
pub mod ledger;
pub mod leveling;
pub mod model;
pub mod stats;
pub mod time;

pub use time::Clock;
