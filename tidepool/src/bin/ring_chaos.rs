//! Chaos demo: a thousand-actor ring under every fault at once.
//!
//! Seeds two deposits into the ring and lets them circulate for twenty
//! real seconds while messages get copied, delayed, lost, and cut off
//! by outages. Prints the run report, including the seed needed to
//! replay the exact same execution.

use std::time::Duration;

use tidepool::simulations::ring::{RingMessage, RingWorkload};
use tidepool::{SimConfig, SimWorld};

fn main() {
    tracing_subscriber::fmt::init();

    let config = SimConfig {
        message_copy_probability: 0.001,
        network_failure_probability: 0.0001,
        message_delay_probability: 0.001,
        storage_freeze_probability: 0.001,
        actor_freeze_probability: 0.0001,
        storage_failure_probability: 0.0001,
        max_execution_time: Duration::from_secs(20),
        network_outage_probability: 0.0001,
        message_loss_probability: 0.001,
        // seed 0 picks a fresh one; pin a value here to replay a run
        seed: 0,
        print_debug: false,
    };

    let actors = 1000;
    let mut world = SimWorld::new(config);
    world.schedule(
        Duration::ZERO,
        0,
        RingMessage::Deposit {
            amount: 10,
            from: -1,
        },
    );
    world.schedule(
        Duration::from_secs(1),
        500,
        RingMessage::Deposit {
            amount: 10,
            from: -1,
        },
    );

    let report = world.run(&RingWorkload::new(actors));
    println!("{report}");
}
