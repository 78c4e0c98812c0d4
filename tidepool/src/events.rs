//! Virtual clock and time-ordered event queue.
//!
//! The queue is the only scheduling mechanism in the engine: message
//! deliveries and continuation resumptions are both entries in one ordered
//! map from virtual timestamp to event. Keys are unique; scheduling into an
//! occupied slot probes forward one tick at a time, so same-tick insertions
//! keep their relative order and nothing is ever dropped.

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies a workload actor. Message payloads may carry their own richer
/// addressing; the engine only routes deliveries by this index.
pub type ActorId = usize;

/// Identifies a suspended continuation in the scheduler's task table.
pub type TaskId = u64;

/// Virtual time, counted in 100 ns ticks.
pub(crate) type Ticks = u64;

pub(crate) const TICKS_PER_MILLI: Ticks = 10_000;
pub(crate) const TICKS_PER_SEC: Ticks = 10_000_000;

pub(crate) fn duration_to_ticks(duration: Duration) -> Ticks {
    Ticks::try_from(duration.as_nanos() / 100).unwrap_or(Ticks::MAX)
}

pub(crate) fn ticks_to_duration(ticks: Ticks) -> Duration {
    Duration::from_nanos(ticks.saturating_mul(100))
}

/// A scheduled occurrence: either a message delivery or the resumption of a
/// previously suspended task.
#[derive(Debug)]
pub(crate) enum Event<M> {
    /// Deliver a workload message to an actor, starting a new task.
    Deliver {
        /// Actor the message is addressed to.
        recipient: ActorId,
        /// Opaque workload payload.
        message: M,
    },
    /// Re-poll the task parked under this id.
    Resume {
        /// Task table entry to re-enter.
        task: TaskId,
    },
}

/// Ordered event map plus the clock it advances.
///
/// `now` moves only when an event scheduled strictly later is popped; it
/// never advances on its own and never goes backwards.
#[derive(Debug)]
pub(crate) struct EventQueue<M> {
    events: BTreeMap<Ticks, Event<M>>,
    now: Ticks,
    steps: u64,
}

impl<M> EventQueue<M> {
    pub(crate) fn new() -> Self {
        Self {
            events: BTreeMap::new(),
            now: 0,
            steps: 0,
        }
    }

    /// Current virtual time.
    pub(crate) fn now(&self) -> Ticks {
        self.now
    }

    /// Number of schedule operations performed so far.
    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    /// Inserts `event` at `now + offset`, probing forward past occupied
    /// slots. Returns the tick the event actually landed on.
    pub(crate) fn schedule(&mut self, offset: Ticks, event: Event<M>) -> Ticks {
        self.steps += 1;
        let mut at = self.now.saturating_add(offset);
        while self.events.contains_key(&at) {
            at += 1;
        }
        self.events.insert(at, event);
        at
    }

    /// Removes and returns the earliest event, advancing the clock to its
    /// timestamp if that lies in the future.
    pub(crate) fn pop_earliest(&mut self) -> Option<(Ticks, Event<M>)> {
        let (at, event) = self.events.pop_first()?;
        if at > self.now {
            self.now = at;
        }
        Some((at, event))
    }
}
