//! Capability surface offered to workload code.
//!
//! A [`SimEnv`] is a weak handle to the simulation world. Everything a
//! workload may do (send messages, delay, read and write the account
//! store, emit debug traces) goes through it, and every one of those
//! operations is where the fault model lives. Fault decisions are drawn in
//! a fixed order, so a run is fully replayable from its seed.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::events::{ticks_to_duration, ActorId, Event, TICKS_PER_MILLI, TICKS_PER_SEC};
use crate::scheduler;
use crate::sim::SimInner;
use crate::sleep::DelayFuture;

/// Weak, cloneable handle through which workload code reaches the
/// simulation.
///
/// Handles do not keep the world alive: once the owning
/// [`SimWorld`](crate::SimWorld) is dropped, every operation fails with
/// [`SimError::Shutdown`].
pub struct SimEnv<M> {
    inner: Weak<RefCell<SimInner<M>>>,
}

impl<M> Clone for SimEnv<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<M> SimEnv<M> {
    pub(crate) fn new(inner: Weak<RefCell<SimInner<M>>>) -> Self {
        Self { inner }
    }

    pub(crate) fn upgrade(&self) -> SimResult<Rc<RefCell<SimInner<M>>>> {
        self.inner.upgrade().ok_or(SimError::Shutdown)
    }

    /// Current virtual time.
    pub fn now(&self) -> SimResult<Duration> {
        let sim = self.upgrade()?;
        let now = sim.borrow().queue.now();
        Ok(ticks_to_duration(now))
    }

    /// Suspends the calling task for `duration` of virtual time.
    ///
    /// Delays never fail as a fault; the resume happens exactly `duration`
    /// later. Only a dropped world surfaces an error.
    pub fn delay(&self, duration: Duration) -> DelayFuture<M> {
        DelayFuture::new(self.clone(), duration)
    }

    /// Emits a trace line prefixed with the milliseconds elapsed since the
    /// previous one. Gated by [`SimConfig::print_debug`]; no effect on the
    /// simulation itself.
    pub fn debug(&self, text: impl fmt::Display) {
        let Ok(sim) = self.upgrade() else { return };
        let enabled = sim.borrow().config.print_debug;
        if !enabled {
            return;
        }
        let line = text.to_string();
        sim.borrow_mut().debug_line(&line);
    }

    /// Reads the stored value for `key`, 0 if absent. Subject to actor and
    /// storage freezes.
    pub async fn get_account(&self, key: ActorId) -> SimResult<i64> {
        self.actor_freeze().await?;
        self.storage_freeze().await?;

        let sim = self.upgrade()?;
        let value = sim.borrow().accounts.get(&key).copied().unwrap_or(0);
        Ok(value)
    }

    /// Writes the stored value for `key`. Subject to actor and storage
    /// freezes. Writes are last-write-wins; interleaved access to a shared
    /// key is the workload's problem to coordinate.
    pub async fn put_account(&self, key: ActorId, value: i64) -> SimResult<()> {
        self.actor_freeze().await?;
        self.storage_freeze().await?;

        let sim = self.upgrade()?;
        sim.borrow_mut().accounts.insert(key, value);
        Ok(())
    }

    /// One probability-gate check against a configured fault probability.
    fn happens(
        &self,
        probability: impl Fn(&SimConfig) -> f64,
        label: &'static str,
    ) -> SimResult<bool> {
        let sim = self.upgrade()?;
        let mut inner = sim.borrow_mut();
        let p = probability(&inner.config);
        Ok(inner.happens(p, label))
    }

    /// Pauses the calling task for a fixed 5 seconds when the actor-freeze
    /// gate triggers. Applied before every send and every store access.
    async fn actor_freeze(&self) -> SimResult<()> {
        if !self.happens(|c| c.actor_freeze_probability, "ActorFreeze")? {
            return Ok(());
        }

        let freeze = {
            let sim = self.upgrade()?;
            let mut inner = sim.borrow_mut();
            let id = inner.next_freeze_id();
            inner.debug_line(&format!("Freeze {id} start"));
            id
        };
        self.delay(Duration::from_secs(5)).await?;

        let sim = self.upgrade()?;
        sim.borrow_mut().debug_line(&format!("Freeze {freeze} over"));
        Ok(())
    }

    /// Pauses the calling task for a drawn 0-10 seconds when the
    /// storage-freeze gate triggers.
    async fn storage_freeze(&self) -> SimResult<()> {
        if !self.happens(|c| c.storage_freeze_probability, "StorageFreeze")? {
            return Ok(());
        }

        let pause_ms = {
            let sim = self.upgrade()?;
            let mut inner = sim.borrow_mut();
            u64::from(inner.rng.next_bounded(10_000))
        };
        self.delay(Duration::from_millis(pause_ms)).await
    }

    /// Suspends for `count` intranet round trips: 10 ms per trip plus
    /// jitter of up to the same magnitude.
    async fn intranet_round_trips(&self, count: u32) -> SimResult<()> {
        let base = count * 10;
        let jitter = {
            let sim = self.upgrade()?;
            let mut inner = sim.borrow_mut();
            inner.rng.next_bounded(base)
        };
        self.delay(Duration::from_millis(u64::from(base + jitter))).await
    }
}

impl<M: Clone + 'static> SimEnv<M> {
    /// Sends `message` to `recipient` through the fault model.
    ///
    /// A send suspends for intranet latency, possibly for extra delay, and
    /// can fail either because an outage window is open or because the
    /// failure gate triggered. Failure and delivery are decided
    /// independently: a send that returns [`SimError::NetworkFailure`] may
    /// still have been delivered, and one that returns `Ok` always is.
    /// A duplicated send is fire-and-forget; its own outcome is dropped.
    pub async fn send(&self, recipient: ActorId, message: M) -> SimResult<()> {
        self.actor_freeze().await?;
        // failure can hit on the way out or on the way back
        self.intranet_round_trips(1).await?;

        if self.happens(|c| c.message_delay_probability, "MessageDelay")? {
            self.intranet_round_trips(5).await?;
        }

        let sim = self.upgrade()?;
        {
            let inner = sim.borrow();
            if inner.queue.now() < inner.network_outage_until {
                return Err(SimError::NetworkOutage);
            }
        }

        if self.happens(|c| c.network_outage_probability, "NetworkOutage")? {
            let mut inner = sim.borrow_mut();
            let secs = u64::from(20 + inner.rng.next_bounded(60));
            inner.network_outage_until = inner.queue.now() + secs * TICKS_PER_SEC;
        }

        let network_failure = self.happens(|c| c.network_failure_probability, "NetworkFailure")?;
        // drawn unconditionally so the draw sequence does not depend on the
        // failure outcome
        let delivered = sim.borrow_mut().rng.next_bounded(2) == 0;

        if !network_failure || delivered {
            let mut inner = sim.borrow_mut();
            let latency_ms = u64::from(5 + inner.rng.next_bounded(17));
            inner.queue.schedule(
                latency_ms * TICKS_PER_MILLI,
                Event::Deliver {
                    recipient,
                    message: message.clone(),
                },
            );
        }

        if self.happens(|c| c.message_copy_probability, "MessageCopy")? {
            let env = self.clone();
            let message = message.clone();
            scheduler::spawn_detached(
                &sim,
                Box::pin(async move { env.send(recipient, message).await }),
            );
        }

        if network_failure {
            return Err(SimError::NetworkFailure);
        }
        Ok(())
    }
}
