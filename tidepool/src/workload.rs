//! The workload seam between the engine and application logic.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::env::SimEnv;
use crate::error::SimResult;
use crate::events::ActorId;

/// Boxed task produced by [`Workload::dispatch`].
///
/// Message handlers run as simulation tasks, so the engine stores them
/// type-erased. `async` handler bodies are wrapped with `Box::pin`.
pub type DispatchFuture = Pin<Box<dyn Future<Output = SimResult<()>>>>;

/// Application logic driven by the simulation.
///
/// The engine owns time, the network, storage, and every fault; the
/// workload owns what actors do with the messages they receive. A
/// workload must be deterministic given the environment: any randomness
/// or clock reads go through the [`SimEnv`] handed to `dispatch`, never
/// through ambient sources.
pub trait Workload {
    /// Message type exchanged between actors.
    type Message: Clone + fmt::Display + 'static;

    /// Builds the task that handles `message` arriving at `recipient`.
    ///
    /// The returned future is polled by the scheduler on the engine's
    /// virtual clock. Returning an error halts the run with that error
    /// recorded in the report.
    fn dispatch(
        &self,
        env: SimEnv<Self::Message>,
        recipient: ActorId,
        message: Self::Message,
    ) -> DispatchFuture;
}
