//! Ready-made workloads and the retry helpers they build on.
//!
//! Contains workload definitions that can be used both in `#[test]`
//! integration tests and in standalone binary targets.

pub mod retry;
pub mod ring;
