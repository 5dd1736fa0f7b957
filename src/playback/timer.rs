//! The single item timer owned by the playback machine.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Host timer facility. Timers fire back into the machine as
/// `PlayerEvent::TimerFired(id)`.
pub trait Scheduler {
    /// Monotonic clock in seconds.
    fn now(&self) -> f64;
    fn schedule(&mut self, id: TimerId, delay: Duration);
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerKind {
    /// One step of the image countdown. `started_at` is the scheduler clock when
    /// the step was armed, `base` the elapsed value at that moment.
    ImageTick {
        base: f64,
        step: f64,
        started_at: f64,
    },
    /// Poll of the video element clock.
    VideoClock,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub kind: TimerKind,
}

/// Arena of one: arming a timer always cancels whatever was pending.
#[derive(Debug, Default)]
pub struct ActiveTimer {
    slot: Option<PendingTimer>,
    next_id: u64,
}

impl ActiveTimer {
    pub fn arm<S: Scheduler>(&mut self, scheduler: &mut S, kind: TimerKind, delay: Duration) {
        self.cancel(scheduler);
        self.next_id += 1;
        let id = TimerId(self.next_id);
        scheduler.schedule(id, delay);
        self.slot = Some(PendingTimer { id, kind });
    }

    pub fn cancel<S: Scheduler>(&mut self, scheduler: &mut S) -> Option<PendingTimer> {
        let pending = self.slot.take()?;
        scheduler.cancel(pending.id);
        Some(pending)
    }

    /// Claim a fired timer. Returns `None` for ids that are no longer current.
    /// The claimed timer has already fired, so it is not cancelled.
    pub fn claim(&mut self, id: TimerId) -> Option<PendingTimer> {
        match self.slot {
            Some(pending) if pending.id == id => self.slot.take(),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingTimer> {
        self.slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::testing::FakeScheduler;

    #[test]
    fn arming_replaces_the_previous_timer() {
        let mut scheduler = FakeScheduler::default();
        let mut timer = ActiveTimer::default();

        timer.arm(&mut scheduler, TimerKind::VideoClock, Duration::from_secs(1));
        let first = timer.pending().map(|p| p.id);
        timer.arm(&mut scheduler, TimerKind::VideoClock, Duration::from_secs(1));

        assert_eq!(scheduler.pending_count(), 1);
        assert!(first.is_some());
        assert_ne!(first, timer.pending().map(|p| p.id));
    }

    #[test]
    fn stale_ids_are_not_claimed() {
        let mut scheduler = FakeScheduler::default();
        let mut timer = ActiveTimer::default();

        timer.arm(&mut scheduler, TimerKind::VideoClock, Duration::from_secs(1));
        let stale = timer.pending().map(|p| p.id).unwrap();
        timer.arm(&mut scheduler, TimerKind::VideoClock, Duration::from_secs(1));

        assert!(timer.claim(stale).is_none());
        assert!(timer.pending().is_some());
    }
}
