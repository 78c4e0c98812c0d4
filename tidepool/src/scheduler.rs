//! Cooperative single-threaded task execution.
//!
//! Workload computations run as stored futures in a task table. Nothing here
//! uses real wakers or a runtime: a parked task is re-polled only when the
//! driver pops the resume event that the task's own suspension scheduled, so
//! every interleaving decision stays inside the event queue.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::error::{SimError, SimResult};
use crate::events::TaskId;
use crate::sim::SimInner;

/// Type-erased suspended computation owned by the task table.
pub(crate) type TaskFuture = Pin<Box<dyn Future<Output = SimResult<()>>>>;

struct TaskEntry {
    future: TaskFuture,
    /// Detached tasks are fire-and-forget; a failure is dropped instead of
    /// halting the run.
    detached: bool,
}

/// Table of suspended computations, keyed by [`TaskId`].
///
/// `current` names the task being polled right now; leaf futures read it to
/// know which task to park when they schedule their resume event.
pub(crate) struct TaskTable {
    tasks: HashMap<TaskId, TaskEntry>,
    next_id: TaskId,
    current: Option<TaskId>,
}

impl TaskTable {
    pub(crate) fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            next_id: 0,
            current: None,
        }
    }

    pub(crate) fn insert(&mut self, future: TaskFuture, detached: bool) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.insert(id, TaskEntry { future, detached });
        id
    }

    pub(crate) fn current(&self) -> Option<TaskId> {
        self.current
    }

    fn take(&mut self, id: TaskId) -> Option<TaskEntry> {
        self.tasks.remove(&id)
    }

    fn restore(&mut self, id: TaskId, entry: TaskEntry) {
        self.tasks.insert(id, entry);
    }

    fn set_current(&mut self, current: Option<TaskId>) -> Option<TaskId> {
        mem::replace(&mut self.current, current)
    }
}

/// Polls the task parked under `id` once.
///
/// The entry is taken out of the table for the duration of the poll so the
/// future can re-borrow the simulation state freely. A pending task goes
/// back into the table; a finished one is dropped, recording its error as
/// the halt cause unless the task is detached. A resume for an id with no
/// entry halts the run as fatal.
pub(crate) fn poll_task<M>(sim: &Rc<RefCell<SimInner<M>>>, id: TaskId) {
    let (mut entry, previous) = {
        let mut inner = sim.borrow_mut();
        let Some(entry) = inner.tasks.take(id) else {
            inner.halt = Some(SimError::UnknownTask(id));
            return;
        };
        let previous = inner.tasks.set_current(Some(id));
        (entry, previous)
    };

    let mut cx = Context::from_waker(Waker::noop());
    let poll = entry.future.as_mut().poll(&mut cx);

    let mut inner = sim.borrow_mut();
    inner.tasks.set_current(previous);
    match poll {
        Poll::Pending => inner.tasks.restore(id, entry),
        Poll::Ready(Ok(())) => {}
        Poll::Ready(Err(err)) => {
            if !entry.detached {
                inner.halt = Some(err);
            }
        }
    }
}

/// Registers a fire-and-forget task and polls it once before returning, so
/// the task runs up to its first suspension point inline: any draws it
/// makes and any events it schedules happen at the point of the spawn.
pub(crate) fn spawn_detached<M>(sim: &Rc<RefCell<SimInner<M>>>, future: TaskFuture) {
    let id = sim.borrow_mut().tasks.insert(future, true);
    poll_task(sim, id);
}
