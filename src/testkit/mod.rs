//! Test doubles and fixture builders.
//!
//! Compiled for unit tests and, behind the `testkit` feature, for the
//! integration test suite.

mod fixtures;
mod provider;
mod sink;

pub use fixtures::{addr, snapshot_at, snapshot_with_floor, t0};
pub use provider::ScriptedProvider;
pub use sink::RecordingSink;
