//! A ring of account-holding actors passing a balance around.
//!
//! Every actor owns one account. A deposit is credited and then handed
//! to the next actor in the ring, so once seeded, the amount circulates
//! forever. Under fault injection the interesting part is what happens
//! to the money while messages are delayed, duplicated, or dropped on
//! the floor.

use std::fmt;

use crate::env::SimEnv;
use crate::error::{SimError, SimResult};
use crate::events::ActorId;
use crate::simulations::retry;
use crate::workload::{DispatchFuture, Workload};

/// Messages exchanged around the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingMessage {
    /// Credit an amount to the recipient's account.
    Deposit {
        /// Amount to credit.
        amount: i64,
        /// Index of the sending actor, `-1` for seeded deposits.
        from: i64,
    },
    /// Withdraw an amount and hand it to another actor.
    Transfer {
        /// Amount to withdraw.
        amount: i64,
        /// Recipient of the follow-up deposit.
        to: ActorId,
    },
}

impl fmt::Display for RingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingMessage::Deposit { amount, from } => {
                write!(f, "Deposit {amount} from A{from}")
            }
            RingMessage::Transfer { amount, to } => {
                write!(f, "Transfer {amount} to A{to}")
            }
        }
    }
}

/// Ring workload over a fixed number of actors.
///
/// Actor `i` forwards to actor `(i + 1) % actors`. Seed it by
/// scheduling a [`RingMessage::Deposit`] with `from` set to `-1`.
pub struct RingWorkload {
    actors: usize,
}

impl RingWorkload {
    /// Builds a ring of `actors` actors.
    ///
    /// # Panics
    ///
    /// Panics if `actors` is zero.
    pub fn new(actors: usize) -> Self {
        assert!(actors > 0, "a ring needs at least one actor");
        RingWorkload { actors }
    }
}

impl Workload for RingWorkload {
    type Message = RingMessage;

    fn dispatch(
        &self,
        env: SimEnv<RingMessage>,
        recipient: ActorId,
        message: RingMessage,
    ) -> DispatchFuture {
        let next = (recipient + 1) % self.actors;
        Box::pin(async move {
            env.debug(format!("A{recipient:04} {message}"));
            retry::handle_with_retry(|| {
                handle_message(env.clone(), recipient, next, message.clone())
            })
            .await
        })
    }
}

async fn handle_message(
    env: SimEnv<RingMessage>,
    actor: ActorId,
    next: ActorId,
    message: RingMessage,
) -> SimResult<()> {
    match message {
        RingMessage::Deposit { amount, .. } => deposit(env, actor, next, amount).await,
        RingMessage::Transfer { amount, to } => transfer(env, actor, to, amount).await,
    }
}

async fn deposit(
    env: SimEnv<RingMessage>,
    actor: ActorId,
    next: ActorId,
    amount: i64,
) -> SimResult<()> {
    let current = env.get_account(actor).await?;
    env.put_account(actor, current + amount).await?;
    // after depositing, message ourselves to transfer the amount to the
    // next actor in the ring
    retry::send_with_backoff(&env, actor, RingMessage::Transfer { amount, to: next }).await
}

async fn transfer(
    env: SimEnv<RingMessage>,
    actor: ActorId,
    target: ActorId,
    amount: i64,
) -> SimResult<()> {
    let current = env.get_account(actor).await?;
    if amount > current {
        return Err(SimError::Workload(format!(
            "Account {actor} has insufficient amount to withdraw"
        )));
    }

    env.put_account(actor, current - amount).await?;
    retry::send_with_backoff(
        &env,
        target,
        RingMessage::Deposit {
            amount,
            from: actor as i64,
        },
    )
    .await
}
