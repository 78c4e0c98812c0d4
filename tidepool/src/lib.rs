//! # Tidepool
//!
//! Deterministic discrete-event simulation for distributed-actor
//! workloads, in the spirit of [FoundationDB's simulation
//! testing](https://apple.github.io/foundationdb/testing.html).
//!
//! A workload is ordinary asynchronous actor code; the engine owns the
//! clock, the network, storage access, and every source of randomness.
//! Suspension points become events on a virtual timeline instead of
//! real timers and threads, so a run covering hours of simulated time
//! finishes in seconds, and any run can be replayed exactly from its
//! seed.
//!
//! Key properties:
//! - **Reproducible**: one `u32` seed fixes the entire execution
//! - **Hostile**: messages get delayed, duplicated, cut off by outages,
//!   and reported failed while still being delivered
//! - **Fast**: the clock jumps straight to the next event
//!
//! ## Core Components
//!
//! - [`SimWorld`]: virtual clock, event queue, and driver loop
//! - [`SimConfig`]: seed, fault probabilities, execution budget
//! - [`SimEnv`]: the capability surface handed to workload code
//! - [`Workload`]: the trait connecting actor logic to the engine
//! - [`simulations`]: bundled workloads and retry policies
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use tidepool::simulations::ring::{RingMessage, RingWorkload};
//! use tidepool::{SimConfig, SimWorld};
//!
//! let config = SimConfig {
//!     seed: 675672838,
//!     network_outage_probability: 0.0001,
//!     max_execution_time: Duration::from_secs(20),
//!     ..SimConfig::default()
//! };
//! let mut world = SimWorld::new(config);
//! world.schedule(Duration::ZERO, 0, RingMessage::Deposit { amount: 10, from: -1 });
//! let report = world.run(&RingWorkload::new(1000));
//! println!("{report}");
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

// =============================================================================
// Core Modules
// =============================================================================

/// The simulation world and its driver loop.
pub mod sim;

/// Run configuration: seed, fault probabilities, execution budget.
pub mod config;

/// Capabilities handed to workload code.
pub mod env;

/// The seam between the engine and application logic.
pub mod workload;

/// Bundled workloads and retry policies.
pub mod simulations;

/// Virtual-time events and the time-ordered event queue.
pub mod events;

/// Deterministic pseudo-random number generation.
pub mod rng;

/// Virtual-time sleeping.
pub mod sleep;

/// Error kinds and the crate-wide result alias.
pub mod error;

/// End-of-run reporting.
pub mod report;

mod scheduler;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::SimConfig;
pub use env::SimEnv;
pub use error::{SimError, SimResult};
pub use events::{ActorId, TaskId};
pub use report::{HaltReason, SimulationReport};
pub use rng::SimRng;
pub use sim::SimWorld;
pub use sleep::DelayFuture;
pub use workload::{DispatchFuture, Workload};
