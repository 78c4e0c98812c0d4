//! End-of-run reporting.

use std::fmt;
use std::time::Duration;

use crate::config::SimConfig;
use crate::error::SimError;

/// Terminal classification of why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The wall-clock execution budget ran out.
    Done,
    /// The event queue was exhausted.
    Died,
    /// A workload error went unrecovered.
    Halt,
    /// The engine itself failed.
    Fatal,
}

impl HaltReason {
    /// Lower-case reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            HaltReason::Done => "done",
            HaltReason::Died => "died",
            HaltReason::Halt => "halt",
            HaltReason::Fatal => "fatal",
        }
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one simulation run.
///
/// The `Display` rendering is the human summary: the seed and every
/// non-zero probability (enough to replay the run), the halt reason and
/// captured error, and how much virtual time was covered in how much real
/// time.
#[derive(Debug)]
pub struct SimulationReport {
    /// Seed the PRNG actually ran with.
    pub seed: u32,
    /// Configuration the run executed under.
    pub config: SimConfig,
    /// Why the run stopped.
    pub reason: HaltReason,
    /// Terminal error captured at the halt, if any.
    pub halt_error: Option<SimError>,
    /// Total simulated virtual time.
    pub virtual_time: Duration,
    /// Number of scheduling operations performed.
    pub steps: u64,
    /// Real time the run took.
    pub wall_time: Duration,
}

impl SimulationReport {
    /// Virtual seconds simulated per real second elapsed.
    pub fn speed_up(&self) -> f64 {
        self.virtual_time.as_secs_f64() / self.wall_time.as_secs_f64()
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(f, "Simulation parameters:")?;
        writeln!(f, "  {:<30} = {}", "Rand seed", self.seed)?;
        for (name, value) in [
            ("MessageCopyProbability", c.message_copy_probability),
            ("MessageDelayProbability", c.message_delay_probability),
            ("NetworkFailureProbability", c.network_failure_probability),
            ("MessageLossProbability", c.message_loss_probability),
            ("StorageFailureProbability", c.storage_failure_probability),
            ("StorageFreezeProbability", c.storage_freeze_probability),
            ("ActorFreezeProbability", c.actor_freeze_probability),
            ("NetworkOutageProbability", c.network_outage_probability),
        ] {
            if value > 0.0 {
                writeln!(f, "  {name:<30} = {value}")?;
            }
        }
        writeln!(f, "Result: {}", self.reason.as_str().to_uppercase())?;
        if let Some(err) = &self.halt_error {
            writeln!(f, "{err}")?;
        }
        writeln!(
            f,
            "Simulated {:.1} hours in {} steps.",
            self.virtual_time.as_secs_f64() / 3600.0,
            self.steps
        )?;
        write!(
            f,
            "Took {:.1} seconds of real time (x{:.0} speed-up)",
            self.wall_time.as_secs_f64(),
            self.speed_up()
        )
    }
}
