//! Run configuration.

use std::time::Duration;

/// Knobs for one simulation run.
///
/// All probabilities are in `[0, 1]` and are resolved at a granularity of
/// 1 in 10,000 by the probability gate. The default configuration injects
/// no faults at all, which is the right starting point for workload tests;
/// chaos runs opt into each fault individually.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// PRNG seed. Zero means "draw a fresh one" and is resolved to a
    /// nonzero seed when the world is created; the report always shows the
    /// seed actually used so the run can be replayed.
    pub seed: u32,
    /// Probability that a send is duplicated (best-effort extra delivery).
    pub message_copy_probability: f64,
    /// Reserved knob carried in the configuration and echoed in the report;
    /// no fault path draws on it yet.
    pub message_loss_probability: f64,
    /// Probability that a send takes five extra intranet round trips.
    pub message_delay_probability: f64,
    /// Probability that a send reports failure to its caller.
    pub network_failure_probability: f64,
    /// Probability that a send opens a 20-80 second network outage window.
    pub network_outage_probability: f64,
    /// Reserved knob carried in the configuration and echoed in the report;
    /// no fault path draws on it yet.
    pub storage_failure_probability: f64,
    /// Probability that a store access pauses for up to 10 seconds.
    pub storage_freeze_probability: f64,
    /// Probability that an actor pauses for 5 seconds before a send or a
    /// store access.
    pub actor_freeze_probability: f64,
    /// Wall-clock budget for the run; virtual time is unaffected.
    pub max_execution_time: Duration,
    /// Emit per-event debug traces through `tracing`.
    pub print_debug: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            message_copy_probability: 0.0,
            message_loss_probability: 0.0,
            message_delay_probability: 0.0,
            network_failure_probability: 0.0,
            network_outage_probability: 0.0,
            storage_failure_probability: 0.0,
            storage_freeze_probability: 0.0,
            actor_freeze_probability: 0.0,
            max_execution_time: Duration::from_secs(1),
            print_debug: false,
        }
    }
}
