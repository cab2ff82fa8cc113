//! Focus session timer.
//!
//! A [`FocusTimer`] counts down a target duration and can be stopped early
//! by a cancellation future (Ctrl+C in the CLI). It moves from
//! [`TimerState::Running`] to either [`TimerState::Completed`] or
//! [`TimerState::StoppedEarly`] exactly once. Recording the session is
//! left to the caller.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::{Instant, MissedTickBehavior};

use crate::storage::ValidationError;

/// How often progress is reported while running.
const TICK: Duration = Duration::from_secs(1);

/// Where a timer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    /// Cancelled before the target was reached.
    StoppedEarly,
    /// Ran for the full target duration.
    Completed,
}

/// Result of running a timer to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusOutcome {
    pub state: TimerState,
    /// Wall time spent running, capped at the target.
    pub elapsed: Duration,
    /// Whole minutes to credit: the full target when completed, elapsed
    /// whole minutes when stopped early.
    pub minutes: u32,
}

impl FocusOutcome {
    /// Minutes worth recording, or `None` for sessions under a minute.
    pub fn minutes_to_record(&self) -> Option<u32> {
        (self.minutes > 0).then_some(self.minutes)
    }
}

/// Countdown timer for a single focus session.
#[derive(Debug)]
pub struct FocusTimer {
    target: Duration,
    tick: Duration,
    state: TimerState,
}

impl FocusTimer {
    /// Creates a timer for `minutes` whole minutes. Zero is rejected.
    pub fn new(minutes: u32) -> Result<Self, ValidationError> {
        if minutes == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(Self::with_target(
            Duration::from_secs(u64::from(minutes) * 60),
            TICK,
        ))
    }

    /// Creates a timer with an arbitrary target and progress interval.
    pub fn with_target(target: Duration, tick: Duration) -> Self {
        Self {
            target,
            tick,
            state: TimerState::Running,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Runs until the target is reached or `cancel` resolves.
    ///
    /// `on_tick` is called with the elapsed time on every progress tick,
    /// starting immediately. Cancellation takes priority when both are
    /// ready at once.
    pub async fn run<C, T>(&mut self, cancel: C, mut on_tick: T) -> FocusOutcome
    where
        C: Future<Output = ()>,
        T: FnMut(Duration),
    {
        let start = Instant::now();
        let deadline = tokio::time::sleep_until(start + self.target);
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(cancel);
        tokio::pin!(deadline);

        tracing::debug!(target_secs = self.target.as_secs(), "Focus timer started");

        let state = loop {
            tokio::select! {
                biased;
                _ = &mut cancel => break TimerState::StoppedEarly,
                _ = &mut deadline => break TimerState::Completed,
                _ = ticker.tick() => on_tick(start.elapsed().min(self.target)),
            }
        };
        self.state = state;

        let elapsed = start.elapsed().min(self.target);
        let minutes = match state {
            TimerState::Completed => whole_minutes(self.target),
            _ => whole_minutes(elapsed),
        };

        tracing::debug!(?state, elapsed_secs = elapsed.as_secs(), minutes, "Focus timer finished");
        FocusOutcome {
            state,
            elapsed,
            minutes,
        }
    }
}

fn whole_minutes(d: Duration) -> u32 {
    u32::try_from(d.as_secs() / 60).unwrap_or(u32::MAX)
}

/// Resolves when the user presses Ctrl+C.
///
/// If the signal handler cannot be installed the future never resolves,
/// so the timer simply runs to completion.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Runs `timer` on a current-thread runtime, stopping early on Ctrl+C.
pub fn run_until_interrupted<T>(timer: &mut FocusTimer, on_tick: T) -> Result<FocusOutcome>
where
    T: FnMut(Duration),
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    Ok(rt.block_on(timer.run(interrupted(), on_tick)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_minutes() {
        assert_eq!(
            FocusTimer::new(0).unwrap_err(),
            ValidationError::ZeroDuration
        );
    }

    #[test]
    fn test_new_sets_target() {
        let timer = FocusTimer::new(25).expect("valid duration");
        assert_eq!(timer.target(), Duration::from_secs(25 * 60));
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[tokio::test]
    async fn test_runs_to_completion() {
        let mut timer =
            FocusTimer::with_target(Duration::from_millis(60), Duration::from_millis(10));
        let mut ticks = 0;

        let outcome = timer
            .run(std::future::pending::<()>(), |_| ticks += 1)
            .await;

        assert_eq!(outcome.state, TimerState::Completed);
        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(outcome.elapsed, Duration::from_millis(60));
        assert!(ticks >= 1);
    }

    #[tokio::test]
    async fn test_cancel_stops_early() {
        let mut timer =
            FocusTimer::with_target(Duration::from_secs(30), Duration::from_millis(10));

        let outcome = timer
            .run(tokio::time::sleep(Duration::from_millis(30)), |_| {})
            .await;

        assert_eq!(outcome.state, TimerState::StoppedEarly);
        assert!(outcome.elapsed < Duration::from_secs(30));
        assert_eq!(outcome.minutes, 0);
        assert_eq!(outcome.minutes_to_record(), None);
    }

    #[tokio::test]
    async fn test_cancel_wins_when_both_ready() {
        let mut timer = FocusTimer::with_target(Duration::ZERO, Duration::from_millis(10));
        let outcome = timer.run(std::future::ready(()), |_| {}).await;
        assert_eq!(outcome.state, TimerState::StoppedEarly);
    }

    #[tokio::test]
    async fn test_tick_reports_capped_elapsed() {
        let target = Duration::from_millis(40);
        let mut timer = FocusTimer::with_target(target, Duration::from_millis(5));
        let mut seen = Vec::new();

        timer
            .run(std::future::pending::<()>(), |elapsed| seen.push(elapsed))
            .await;

        assert!(!seen.is_empty());
        assert!(seen.iter().all(|e| *e <= target));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_minutes_to_record() {
        let outcome = FocusOutcome {
            state: TimerState::Completed,
            elapsed: Duration::from_secs(25 * 60),
            minutes: 25,
        };
        assert_eq!(outcome.minutes_to_record(), Some(25));
    }

    #[test]
    fn test_whole_minutes_truncates() {
        assert_eq!(whole_minutes(Duration::from_secs(59)), 0);
        assert_eq!(whole_minutes(Duration::from_secs(61)), 1);
        assert_eq!(whole_minutes(Duration::from_secs(10 * 60 + 59)), 10);
    }
}
