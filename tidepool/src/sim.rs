//! Simulation world and run loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::SimConfig;
use crate::env::SimEnv;
use crate::error::SimError;
use crate::events::{
    duration_to_ticks, ticks_to_duration, ActorId, Event, EventQueue, Ticks, TICKS_PER_MILLI,
};
use crate::report::{HaltReason, SimulationReport};
use crate::rng::SimRng;
use crate::scheduler::{self, TaskTable};
use crate::workload::Workload;

/// Mutable state of one simulation: clock, queue, PRNG, fault state,
/// account store, and the task table. Everything the engine owns lives
/// here, behind the world's `Rc<RefCell<_>>`.
pub(crate) struct SimInner<M> {
    pub(crate) config: SimConfig,
    pub(crate) seed: u32,
    pub(crate) rng: SimRng,
    pub(crate) queue: EventQueue<M>,
    pub(crate) network_outage_until: Ticks,
    pub(crate) accounts: HashMap<ActorId, i64>,
    pub(crate) tasks: TaskTable,
    pub(crate) halt: Option<SimError>,
    freeze_seq: u64,
    last_debug: Ticks,
}

impl<M> SimInner<M> {
    fn new(config: SimConfig, seed: u32) -> Self {
        Self {
            rng: SimRng::new(seed),
            seed,
            config,
            queue: EventQueue::new(),
            network_outage_until: 0,
            accounts: HashMap::new(),
            tasks: TaskTable::new(),
            halt: None,
            freeze_seq: 0,
            last_debug: 0,
        }
    }

    /// Probability gate: one bounded draw in `[0, 10000)` per check, and no
    /// draw at all for probability zero. The gate's label is debug-traced
    /// on a hit.
    pub(crate) fn happens(&mut self, probability: f64, label: &str) -> bool {
        if probability == 0.0 {
            return false;
        }
        let draw = self.rng.next_bounded(10_000);
        if f64::from(draw) >= probability * 10_000.0 {
            return false;
        }
        self.debug_line(label);
        true
    }

    pub(crate) fn next_freeze_id(&mut self) -> u64 {
        let id = self.freeze_seq;
        self.freeze_seq += 1;
        id
    }

    /// Emits one trace line with a leading delta in milliseconds since the
    /// previous line. No-op unless `print_debug` is set.
    pub(crate) fn debug_line(&mut self, text: &str) {
        if !self.config.print_debug {
            return;
        }
        let elapsed = self.queue.now() - self.last_debug;
        self.last_debug = self.queue.now();
        let ms = (elapsed as f64 / TICKS_PER_MILLI as f64).round() as u64;
        tracing::debug!("+ {ms:04} ms: {text}");
    }
}

/// A deterministic simulation of one actor workload.
///
/// The world owns all simulation state for exactly one run and discards it
/// on drop; independent runs use independent worlds. Construction resolves
/// the seed, [`SimWorld::schedule`] plants the initial deliveries, and
/// [`SimWorld::run`] drives the event loop to a halt and reports.
pub struct SimWorld<M> {
    inner: Rc<RefCell<SimInner<M>>>,
}

impl<M> SimWorld<M> {
    /// Creates a world from `config`. A zero seed is resolved here to a
    /// freshly drawn nonzero one, so the reported seed always replays the
    /// run exactly.
    pub fn new(config: SimConfig) -> Self {
        let seed = if config.seed == 0 {
            rand::thread_rng().gen_range(1..=u32::MAX)
        } else {
            config.seed
        };
        Self {
            inner: Rc::new(RefCell::new(SimInner::new(config, seed))),
        }
    }

    /// Hands out a weak capability handle for workload code.
    pub fn env(&self) -> SimEnv<M> {
        SimEnv::new(Rc::downgrade(&self.inner))
    }

    /// Seeds a message delivery `offset` into the virtual future. This is
    /// how initial events are planted before [`SimWorld::run`].
    pub fn schedule(&mut self, offset: Duration, recipient: ActorId, message: M) {
        let mut inner = self.inner.borrow_mut();
        inner.queue.schedule(
            duration_to_ticks(offset),
            Event::Deliver { recipient, message },
        );
    }

    /// Stored balance for `key`, 0 if absent.
    pub fn account(&self, key: ActorId) -> i64 {
        self.inner.borrow().accounts.get(&key).copied().unwrap_or(0)
    }

    /// Current virtual time.
    pub fn current_time(&self) -> Duration {
        ticks_to_duration(self.inner.borrow().queue.now())
    }

    /// Drives the simulation until it halts and returns the report.
    ///
    /// Events are popped earliest-first. A delivery starts a new task for
    /// the workload's `dispatch`, queued to take its first step at the
    /// current time; a resume re-polls a parked task. The run halts when
    /// the wall-clock budget is exceeded (`done`), the queue is exhausted
    /// (`died`), a workload error goes unrecovered (`halt`), or the engine
    /// itself breaks (`fatal`). The full report is always logged.
    pub fn run<W>(&mut self, workload: &W) -> SimulationReport
    where
        W: Workload<Message = M>,
    {
        let budget = {
            let mut inner = self.inner.borrow_mut();
            let seed = inner.seed;
            inner.rng = SimRng::new(seed);
            inner.halt = None;
            inner.config.max_execution_time
        };

        let started = Instant::now();
        let reason = loop {
            if started.elapsed() > budget {
                break HaltReason::Done;
            }

            let popped = self.inner.borrow_mut().queue.pop_earliest();
            let Some((_, event)) = popped else {
                break HaltReason::Died;
            };

            match event {
                Event::Deliver { recipient, message } => {
                    let future = workload.dispatch(self.env(), recipient, message);
                    let mut inner = self.inner.borrow_mut();
                    let task = inner.tasks.insert(future, false);
                    inner.queue.schedule(0, Event::Resume { task });
                }
                Event::Resume { task } => scheduler::poll_task(&self.inner, task),
            }

            let verdict = {
                let inner = self.inner.borrow();
                inner.halt.as_ref().map(|err| {
                    let fatal = err.is_fatal();
                    if fatal {
                        tracing::error!(error = %err, "fatal simulation error");
                    }
                    fatal
                })
            };
            if let Some(fatal) = verdict {
                break if fatal {
                    HaltReason::Fatal
                } else {
                    HaltReason::Halt
                };
            }
        };

        let wall_time = started.elapsed();
        let mut inner = self.inner.borrow_mut();
        let report = SimulationReport {
            seed: inner.seed,
            config: inner.config.clone(),
            reason,
            halt_error: inner.halt.take(),
            virtual_time: ticks_to_duration(inner.queue.now()),
            steps: inner.queue.steps(),
            wall_time,
        };
        drop(inner);

        tracing::info!(seed = report.seed, "simulation halted\n{report}");
        report
    }
}
