//! Delays in virtual time.
//!
//! Delaying never touches a real timer. The future below turns a duration
//! into one resume event on the simulation's queue, which is also how the
//! fault model expresses round-trip latency, freezes, and backoff sleeps.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use crate::env::SimEnv;
use crate::error::{SimError, SimResult};
use crate::events::{duration_to_ticks, Event, Ticks};

/// Future that completes after a virtual-time duration.
///
/// The first poll schedules a resume event for the currently running task
/// at `now + duration` and records where it landed. Later polls complete
/// with `Ok(())` once the clock has reached that deadline; a poll before
/// then (the task was woken by some other event it is also parked on)
/// stays pending, and the already-queued resume fires later. Wake-ups
/// travel only through the event queue; the context's waker is never
/// invoked.
pub struct DelayFuture<M> {
    /// Handle to the simulation that owns the event queue.
    env: SimEnv<M>,
    /// How far in the future the resume event is placed.
    duration: Duration,
    /// Tick the resume event landed on, once scheduled.
    deadline: Option<Ticks>,
}

impl<M> DelayFuture<M> {
    pub(crate) fn new(env: SimEnv<M>, duration: Duration) -> Self {
        Self {
            env,
            duration,
            deadline: None,
        }
    }
}

impl<M> Future for DelayFuture<M> {
    type Output = SimResult<()>;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let sim = match self.env.upgrade() {
            Ok(sim) => sim,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let mut inner = sim.borrow_mut();

        if let Some(deadline) = self.deadline {
            if inner.queue.now() >= deadline {
                return Poll::Ready(Ok(()));
            }
            return Poll::Pending;
        }

        let Some(task) = inner.tasks.current() else {
            return Poll::Ready(Err(SimError::InvalidState(
                "delay polled outside a simulation task".to_string(),
            )));
        };

        let at = inner
            .queue
            .schedule(duration_to_ticks(self.duration), Event::Resume { task });
        self.deadline = Some(at);
        Poll::Pending
    }
}
