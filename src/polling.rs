//! Fixed-interval polling for endpoints that answer with empty bodies while
//! a result is not ready.
//!
//! Every attempt is preceded by `interval`. An empty answer adds
//! `empty_response_delay` before the next attempt. There is no backoff
//! growth; attempts are unbounded unless `max_attempts` is set.

use std::time::Duration;

use crate::config::PollingConfig;

/// Polling timing and bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    /// Wait before every attempt, including the first
    pub interval: Duration,
    /// Extra wait after an empty answer
    pub empty_response_delay: Duration,
    /// Maximum number of attempts (`None` = poll until an answer arrives)
    pub max_attempts: Option<usize>,
}

impl PollingPolicy {
    /// A policy that never sleeps, for tests and local fixtures.
    pub fn immediate() -> Self {
        Self {
            interval: Duration::ZERO,
            empty_response_delay: Duration::ZERO,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollingPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            empty_response_delay: Duration::from_millis(config.empty_response_delay_ms),
            max_attempts: config.max_attempts,
        }
    }
}

/// Attempt counter for one polling run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Number of attempts made so far
    pub attempts: usize,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }
}

/// What to do after an attempt came back empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// Wait this long, then try again
    Retry(Duration),
    /// Stop polling
    GiveUp(String),
}

/// Decide whether to poll again after an empty answer.
///
/// # Edge Cases
/// * `max_attempts = None` → always retry
/// * `attempts >= max_attempts` → give up without the extra delay
pub fn decide_after_empty(state: &PollState, policy: &PollingPolicy) -> PollDecision {
    if let Some(max) = policy.max_attempts {
        if state.attempts >= max {
            return PollDecision::GiveUp(format!(
                "No answer after {} attempt{}",
                state.attempts,
                if state.attempts == 1 { "" } else { "s" }
            ));
        }
    }

    PollDecision::Retry(policy.empty_response_delay)
}

/// Result of a polling run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// An attempt produced a value
    Ready(T),
    /// `max_attempts` was reached without a value
    Exhausted { attempts: usize },
}

/// Blocking wait used between attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Run `attempt` until it yields a value, fails, or the policy gives up.
///
/// `attempt` receives the 1-based attempt number and returns `Ok(None)` for
/// an empty answer. Errors are returned immediately and never retried.
pub fn poll<T, E, F>(
    policy: &PollingPolicy,
    sleeper: &dyn Sleeper,
    mut attempt: F,
) -> Result<PollOutcome<T>, E>
where
    F: FnMut(usize) -> Result<Option<T>, E>,
{
    let mut state = PollState::new();

    loop {
        sleeper.sleep(policy.interval);
        state.record_attempt();

        if let Some(value) = attempt(state.attempts)? {
            return Ok(PollOutcome::Ready(value));
        }

        match decide_after_empty(&state, policy) {
            PollDecision::Retry(delay) => {
                tracing::info!(
                    attempt = state.attempts,
                    delay_ms = delay.as_millis() as u64,
                    "empty answer, polling again"
                );
                sleeper.sleep(delay);
            }
            PollDecision::GiveUp(reason) => {
                tracing::warn!("{}", reason);
                return Ok(PollOutcome::Exhausted {
                    attempts: state.attempts,
                });
            }
        }
    }
}
