//! Condition waits
//!
//! Every suspension point of the scan goes through [`wait_until`]: homing,
//! probing and both watchers. The condition is sampled, then the task
//! yields for one poll interval, until the condition holds or the timeout
//! budget is spent.

use embedded_hal_async::delay::DelayNs;

/// Result of a condition wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    /// Condition became true
    Triggered,
    /// Timeout elapsed with the condition still false
    TimedOut,
}

/// Suspend until `condition` holds or `timeout_ms` elapses
///
/// The condition is checked before the first suspension, so an already
/// true condition returns without yielding. `None` waits forever.
/// Elapsed time is the sum of completed poll intervals.
pub async fn wait_until<D, F>(
    delay: &mut D,
    poll_interval_ms: u32,
    timeout_ms: Option<u32>,
    mut condition: F,
) -> WaitOutcome
where
    D: DelayNs,
    F: FnMut() -> bool,
{
    let mut elapsed_ms: u32 = 0;

    loop {
        if condition() {
            return WaitOutcome::Triggered;
        }

        if let Some(timeout) = timeout_ms {
            if elapsed_ms >= timeout {
                return WaitOutcome::TimedOut;
            }
        }

        delay.delay_ms(poll_interval_ms).await;
        elapsed_ms = elapsed_ms.saturating_add(poll_interval_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDelay;
    use embassy_futures::block_on;

    #[test]
    fn test_already_true_does_not_suspend() {
        let mut delay = FakeDelay::new();
        let outcome = block_on(wait_until(&mut delay, 10, Some(100), || true));

        assert_eq!(outcome, WaitOutcome::Triggered);
        assert_eq!(delay.elapsed_ms, 0);
    }

    #[test]
    fn test_triggers_after_polls() {
        let mut delay = FakeDelay::new();
        let mut checks = 0;
        let outcome = block_on(wait_until(&mut delay, 10, Some(1_000), || {
            checks += 1;
            checks == 4
        }));

        assert_eq!(outcome, WaitOutcome::Triggered);
        assert_eq!(delay.elapsed_ms, 30);
    }

    #[test]
    fn test_times_out() {
        let mut delay = FakeDelay::new();
        let outcome = block_on(wait_until(&mut delay, 10, Some(10_000), || false));

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(delay.elapsed_ms, 10_000);
    }

    #[test]
    fn test_no_timeout_waits_for_condition() {
        let mut delay = FakeDelay::new();
        let mut checks = 0u32;
        let outcome = block_on(wait_until(&mut delay, 10, None, || {
            checks += 1;
            checks > 5_000
        }));

        assert_eq!(outcome, WaitOutcome::Triggered);
        assert_eq!(delay.elapsed_ms, 50_000);
    }
}
