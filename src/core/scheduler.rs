//! Scheduler port for the navigation engine.
//!
//! The engine never touches a real clock.  It asks a [`Scheduler`] for
//! one-shot timers (lock release), a repeating timer (autoplay) and
//! "next frame" callbacks (the second half of a backward wrap).  Fired
//! requests come back to the engine as [`Wakeup`] values.
//!
//! [`TimerQueue`] is the implementation used everywhere: the event loop
//! feeds it wall-clock time, tests feed it a fake clock.

use std::time::Duration;

/// Handle to a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Work the engine asked to be woken up for.
///
/// Every variant carries the epoch that was current when it was scheduled;
/// the engine drops wakeups whose epoch has since moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    ReleaseLock { epoch: u64 },
    AutoplayTick { epoch: u64 },
    DeferredStep { epoch: u64 },
}

/// Timer and frame capabilities injected into the engine.
pub trait Scheduler {
    /// Fire `wake` once after `delay`.
    fn schedule_once(&mut self, delay: Duration, wake: Wakeup) -> TimerId;
    /// Fire `wake` every `period` until cancelled.
    fn schedule_repeating(&mut self, period: Duration, wake: Wakeup) -> TimerId;
    /// Cancel a timer.  Unknown or already-fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
    /// Fire `wake` once after the current frame has been committed.
    fn request_frame(&mut self, wake: Wakeup);
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    wake: Wakeup,
}

/// Repeating timers never fire more often than this.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Clock-agnostic timer queue.  Time only moves when the owner calls
/// [`advance_to`](Self::advance_to).
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
    frame_requests: Vec<Wakeup>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time.
    #[cfg(test)]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    #[cfg(test)]
    pub fn armed(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending deadline, if any.
    #[cfg(test)]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Move the clock to `now` and return every wakeup that fell due, in
    /// deadline order.  Time never moves backwards.
    pub fn advance_to(&mut self, now: Duration) -> Vec<Wakeup> {
        self.now = self.now.max(now);
        let mut fired = Vec::new();

        loop {
            let Some(idx) = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= self.now)
                .min_by_key(|(_, t)| (t.due, t.id))
                .map(|(i, _)| i)
            else {
                break;
            };

            let timer = &mut self.timers[idx];
            fired.push(timer.wake);
            match timer.period {
                Some(period) => timer.due += period,
                None => {
                    self.timers.swap_remove(idx);
                }
            }
        }

        fired
    }

    /// Convenience for fake-clock tests.
    #[cfg(test)]
    pub fn advance_by(&mut self, delta: Duration) -> Vec<Wakeup> {
        let target = self.now + delta;
        self.advance_to(target)
    }

    /// Drain "next frame" requests.  Call once after each committed draw.
    pub fn take_frame_requests(&mut self) -> Vec<Wakeup> {
        std::mem::take(&mut self.frame_requests)
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, wake: Wakeup) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            wake,
        });
        id
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, delay: Duration, wake: Wakeup) -> TimerId {
        self.push(delay, None, wake)
    }

    fn schedule_repeating(&mut self, period: Duration, wake: Wakeup) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.push(period, Some(period), wake)
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    fn request_frame(&mut self, wake: Wakeup) {
        self.frame_requests.push(wake);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let mut q = TimerQueue::new();
        q.schedule_once(ms(100), Wakeup::ReleaseLock { epoch: 1 });

        assert!(q.advance_to(ms(99)).is_empty());
        assert_eq!(q.advance_to(ms(100)), vec![Wakeup::ReleaseLock { epoch: 1 }]);
        assert!(q.advance_to(ms(500)).is_empty());
        assert_eq!(q.armed(), 0);
    }

    #[test]
    fn repeating_timer_fires_every_period_until_cancelled() {
        let mut q = TimerQueue::new();
        let id = q.schedule_repeating(ms(10), Wakeup::AutoplayTick { epoch: 0 });

        assert_eq!(q.advance_to(ms(35)).len(), 3);
        assert_eq!(q.next_deadline(), Some(ms(40)));

        q.cancel(id);
        assert!(q.advance_to(ms(100)).is_empty());
    }

    #[test]
    fn wakeups_come_back_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule_once(ms(30), Wakeup::ReleaseLock { epoch: 3 });
        q.schedule_once(ms(10), Wakeup::ReleaseLock { epoch: 1 });
        q.schedule_once(ms(20), Wakeup::ReleaseLock { epoch: 2 });

        let fired = q.advance_to(ms(30));
        assert_eq!(
            fired,
            vec![
                Wakeup::ReleaseLock { epoch: 1 },
                Wakeup::ReleaseLock { epoch: 2 },
                Wakeup::ReleaseLock { epoch: 3 },
            ]
        );
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut q = TimerQueue::new();
        q.advance_to(ms(50));
        q.advance_to(ms(10));
        assert_eq!(q.now(), ms(50));

        q.schedule_once(ms(5), Wakeup::DeferredStep { epoch: 0 });
        assert_eq!(q.next_deadline(), Some(ms(55)));
    }

    #[test]
    fn frame_requests_are_drained_separately_from_timers() {
        let mut q = TimerQueue::new();
        q.request_frame(Wakeup::DeferredStep { epoch: 7 });

        assert!(q.advance_by(ms(1000)).is_empty());
        assert_eq!(q.take_frame_requests(), vec![Wakeup::DeferredStep { epoch: 7 }]);
        assert!(q.take_frame_requests().is_empty());
    }
}
