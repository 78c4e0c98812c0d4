//! Retry policies layered over the send and dispatch contracts.
//!
//! The engine never retries anything on its own; recovering from a
//! failed send is workload business. These helpers are the policies the
//! bundled workloads use.

use std::future::Future;
use std::time::Duration;

use crate::env::SimEnv;
use crate::error::SimResult;
use crate::events::ActorId;

/// Sends `message` to `recipient`, retrying with exponential backoff.
///
/// Up to ten retries, sleeping `2^n` virtual seconds before attempt
/// `n`. The eleventh failure propagates.
pub async fn send_with_backoff<M>(
    env: &SimEnv<M>,
    recipient: ActorId,
    message: M,
) -> SimResult<()>
where
    M: Clone + 'static,
{
    let mut counter = 0u32;
    loop {
        match env.send(recipient, message.clone()).await {
            Ok(()) => return Ok(()),
            Err(err) => {
                if counter < 10 {
                    counter += 1;
                    let secs = 1u64 << counter;
                    env.debug(format!(
                        "Retrying send on {err} #{counter} after {secs} seconds"
                    ));
                    env.delay(Duration::from_secs(secs)).await?;
                    continue;
                }

                return Err(err);
            }
        }
    }
}

/// Runs `handler`, counting attempts up to a budget of four but
/// re-raising every error. A failing handler therefore executes exactly
/// once; recovery is expected to happen on the send side instead.
#[allow(clippy::never_loop, unused_assignments)]
pub async fn handle_with_retry<F, Fut>(mut handler: F) -> SimResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SimResult<()>>,
{
    let mut counter = 0u32;
    loop {
        match handler().await {
            Ok(()) => return Ok(()),
            Err(err) => {
                if counter < 4 {
                    counter += 1;
                }

                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::task::{Context, Poll, Waker};

    use crate::config::SimConfig;
    use crate::error::SimError;
    use crate::report::HaltReason;
    use crate::sim::SimWorld;
    use crate::workload::{DispatchFuture, Workload};

    #[test]
    fn successful_handler_runs_once() {
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);
        let mut fut = Box::pin(handle_with_retry(move || {
            seen.set(seen.get() + 1);
            async { Ok(()) }
        }));
        let mut cx = Context::from_waker(Waker::noop());
        assert_eq!(fut.as_mut().poll(&mut cx), Poll::Ready(Ok(())));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failing_handler_is_not_reinvoked() {
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);
        let mut fut = Box::pin(handle_with_retry(move || {
            seen.set(seen.get() + 1);
            async { Err(SimError::Workload("boom".to_string())) }
        }));
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(Err(SimError::Workload(text))) => assert_eq!(text, "boom"),
            other => panic!("handler error did not surface: {other:?}"),
        }
        assert_eq!(calls.get(), 1);
    }

    struct BackoffSender {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Workload for BackoffSender {
        type Message = String;

        fn dispatch(
            &self,
            env: SimEnv<String>,
            recipient: ActorId,
            message: String,
        ) -> DispatchFuture {
            let log = Rc::clone(&self.log);
            Box::pin(async move {
                if message == "start" {
                    send_with_backoff(&env, recipient, "one".to_string()).await?;
                    send_with_backoff(&env, recipient, "two".to_string()).await?;
                    log.borrow_mut().push("both sent".to_string());
                } else {
                    log.borrow_mut().push(message);
                }
                Ok(())
            })
        }
    }

    // With an outage probability of 1.0 the first send opens an outage
    // window, so the second send fails until its backoff sleeps carry it
    // past the end of the window.
    #[test]
    fn backoff_rides_out_a_network_outage() {
        let config = SimConfig {
            seed: 7,
            network_outage_probability: 1.0,
            max_execution_time: Duration::from_secs(5),
            ..SimConfig::default()
        };
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = SimWorld::new(config);
        world.schedule(Duration::ZERO, 0, "start".to_string());
        let report = world.run(&BackoffSender {
            log: Rc::clone(&log),
        });
        assert_eq!(report.reason, HaltReason::Died);
        assert_eq!(*log.borrow(), vec!["one", "both sent", "two"]);
    }
}
