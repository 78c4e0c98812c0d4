//! Shared fixtures for the integration tests.

use tidepool::simulations::retry::send_with_backoff;
use tidepool::simulations::ring::RingMessage;
use tidepool::{ActorId, DispatchFuture, SimEnv, Workload};

/// Ring variant that forwards a deposit exactly once.
///
/// Seeded deposits (`from == -1`) are credited and handed to the next
/// actor; deposits arriving from inside the ring are only credited, so
/// the run winds down instead of circulating forever. That makes final
/// balances and halt reasons exact values a test can assert on.
pub struct RelayWorkload {
    actors: usize,
}

impl RelayWorkload {
    pub fn new(actors: usize) -> Self {
        RelayWorkload { actors }
    }
}

impl Workload for RelayWorkload {
    type Message = RingMessage;

    fn dispatch(
        &self,
        env: SimEnv<RingMessage>,
        recipient: ActorId,
        message: RingMessage,
    ) -> DispatchFuture {
        let next = (recipient + 1) % self.actors;
        Box::pin(async move {
            match message {
                RingMessage::Deposit { amount, from } => {
                    let current = env.get_account(recipient).await?;
                    env.put_account(recipient, current + amount).await?;
                    if from == -1 {
                        let transfer = RingMessage::Transfer { amount, to: next };
                        send_with_backoff(&env, recipient, transfer).await?;
                    }
                    Ok(())
                }
                RingMessage::Transfer { amount, to } => {
                    let current = env.get_account(recipient).await?;
                    env.put_account(recipient, current - amount).await?;
                    let deposit = RingMessage::Deposit {
                        amount,
                        from: recipient as i64,
                    };
                    send_with_backoff(&env, to, deposit).await
                }
            }
        })
    }
}
