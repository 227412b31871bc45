//! Rest timer between sets.
//!
//! The countdown runs on its own thread and reports the remaining time
//! through a callback on every tick. Stopping is explicit: the handle sends
//! a stop signal over a channel, which also wakes the worker immediately.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How a rest period ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerOutcome {
    Finished,
    Stopped,
}

/// Countdown timer with a periodic tick callback
pub struct RestTimer;

impl RestTimer {
    /// Start counting down `total`, calling `on_tick` with the remaining time
    /// immediately and then every `tick`. The final call reports zero.
    pub fn start<F>(total: Duration, tick: Duration, mut on_tick: F) -> RestTimerHandle
    where
        F: FnMut(Duration) + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::<()>();
        let tick = tick.max(Duration::from_millis(1));

        let worker = std::thread::spawn(move || {
            let deadline = Instant::now() + total;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                on_tick(remaining);
                if remaining.is_zero() {
                    tracing::debug!("Rest timer finished after {:?}", total);
                    return TimerOutcome::Finished;
                }

                match stop_rx.recv_timeout(tick.min(remaining)) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        tracing::debug!("Rest timer stopped with {:?} left", remaining);
                        return TimerOutcome::Stopped;
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                }
            }
        });

        RestTimerHandle {
            stop_tx: Some(stop_tx),
            worker,
        }
    }
}

/// Handle to a running rest timer
pub struct RestTimerHandle {
    stop_tx: Option<Sender<()>>,
    worker: JoinHandle<TimerOutcome>,
}

impl RestTimerHandle {
    /// Signal the timer to stop. Has no effect once it has finished.
    pub fn stop(&self) {
        if let Some(tx) = &self.stop_tx {
            let _ = tx.send(());
        }
    }

    /// Whether the countdown thread has exited
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the timer to end and report how it ended
    pub fn wait(mut self) -> TimerOutcome {
        // Keep the sender alive until the worker exits so dropping it
        // doesn't read as a stop request.
        let outcome = self.worker.join().unwrap_or(TimerOutcome::Stopped);
        self.stop_tx.take();
        outcome
    }
}

/// Format a duration as `m:ss`
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_timer_runs_to_completion() {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&ticks);

        let handle = RestTimer::start(
            Duration::from_millis(50),
            Duration::from_millis(10),
            move |remaining| recorded.lock().unwrap().push(remaining),
        );

        assert_eq!(handle.wait(), TimerOutcome::Finished);

        let ticks = ticks.lock().unwrap();
        assert!(ticks.len() >= 2);
        assert_eq!(*ticks.last().unwrap(), Duration::ZERO);
        assert!(ticks.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_stop_signal_ends_early() {
        let handle = RestTimer::start(Duration::from_secs(60), Duration::from_secs(1), |_| {});

        handle.stop();
        let started = Instant::now();
        assert_eq!(handle.wait(), TimerOutcome::Stopped);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let handle = RestTimer::start(Duration::ZERO, Duration::from_secs(1), |_| {});
        assert_eq!(handle.wait(), TimerOutcome::Finished);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::from_secs(90)), "1:30");
        assert_eq!(format_remaining(Duration::from_secs(5)), "0:05");
        assert_eq!(format_remaining(Duration::from_millis(4_200)), "0:05");
        assert_eq!(format_remaining(Duration::ZERO), "0:00");
    }
}
