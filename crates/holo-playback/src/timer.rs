use std::fmt;

use crate::error::{PlaybackError, PlaybackResult};

/// The component a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerOwner {
    /// Caption reveal and settle timers.
    Narrator,
    /// The generation progress ticker.
    Progress,
    /// `Wait` step delays.
    Sequencer,
}

impl fmt::Display for TimerOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrator => write!(f, "narrator"),
            Self::Progress => write!(f, "progress"),
            Self::Sequencer => write!(f, "sequencer"),
        }
    }
}

/// What a fired timer means to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Reveal the next caption character.
    RevealTick,
    /// The pause after a fully revealed caption has elapsed.
    Settle,
    /// Advance generation progress by one step.
    ProgressTick,
    /// A `Wait` step has elapsed.
    StepDelay,
}

impl TimerKind {
    /// The component that owns timers of this kind.
    pub fn owner(self) -> TimerOwner {
        match self {
            Self::RevealTick | Self::Settle => TimerOwner::Narrator,
            Self::ProgressTick => TimerOwner::Progress,
            Self::StepDelay => TimerOwner::Sequencer,
        }
    }
}

/// Opaque handle used to cancel a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A timer that reached its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// Handle of the fired timer. Repeating timers keep their handle.
    pub handle: TimerHandle,
    /// What the timer was scheduled for.
    pub kind: TimerKind,
    /// The instant the timer was due.
    pub deadline: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    kind: TimerKind,
    deadline: u64,
    repeat: Option<u64>,
}

/// Virtual-time timer service.
///
/// Offers one-shot and repeating timers, both cancelable, and hands due
/// timers back in deadline order (ties broken by scheduling order).
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer `delay_ms` after `now`.
    pub fn schedule_after(&mut self, now: u64, delay_ms: u64, kind: TimerKind) -> TimerHandle {
        self.insert(now.saturating_add(delay_ms), None, kind)
    }

    /// Schedule a timer firing every `interval_ms` starting one interval after `now`.
    ///
    /// A zero interval is bumped to one millisecond so the queue always advances.
    pub fn schedule_repeating(
        &mut self,
        now: u64,
        interval_ms: u64,
        kind: TimerKind,
    ) -> TimerHandle {
        let interval = interval_ms.max(1);
        self.insert(now.saturating_add(interval), Some(interval), kind)
    }

    fn insert(&mut self, deadline: u64, repeat: Option<u64>, kind: TimerKind) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            kind,
            deadline,
            repeat,
        });
        handle
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    /// Whether the timer is still pending.
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Number of pending timers held by `owner`.
    pub fn active_for(&self, owner: TimerOwner) -> usize {
        self.timers
            .iter()
            .filter(|t| t.kind.owner() == owner)
            .count()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Return `true` if no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Take the earliest timer due at or before `now`.
    ///
    /// Repeating timers are re-armed one interval after their deadline and
    /// stay in the queue under the same handle.
    pub fn pop_due(&mut self, now: u64) -> Option<FiredTimer> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.handle))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        let fired = FiredTimer {
            handle: timer.handle,
            kind: timer.kind,
            deadline: timer.deadline,
        };
        match timer.repeat {
            Some(interval) => timer.deadline = timer.deadline.saturating_add(interval),
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fired)
    }

    /// Check that no owner holds more than one pending timer.
    pub fn verify(&self) -> PlaybackResult<()> {
        for owner in [
            TimerOwner::Narrator,
            TimerOwner::Progress,
            TimerOwner::Sequencer,
        ] {
            let count = self.active_for(owner);
            if count > 1 {
                return Err(PlaybackError::InvariantViolation(format!(
                    "{owner} holds {count} live timers"
                )));
            }
        }
        Ok(())
    }
}

/// Holds at most one timer handle for a component.
///
/// Arming always cancels whatever the slot held before, so a component can
/// never leave a stale timer behind in the queue.
#[derive(Debug, Default)]
pub struct TimerSlot {
    handle: Option<TimerHandle>,
}

impl TimerSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot's timer with a one-shot timer.
    pub fn arm_after(
        &mut self,
        queue: &mut TimerQueue,
        now: u64,
        delay_ms: u64,
        kind: TimerKind,
    ) -> TimerHandle {
        self.clear(queue);
        let handle = queue.schedule_after(now, delay_ms, kind);
        self.handle = Some(handle);
        handle
    }

    /// Replace the slot's timer with a repeating timer.
    pub fn arm_repeating(
        &mut self,
        queue: &mut TimerQueue,
        now: u64,
        interval_ms: u64,
        kind: TimerKind,
    ) -> TimerHandle {
        self.clear(queue);
        let handle = queue.schedule_repeating(now, interval_ms, kind);
        self.handle = Some(handle);
        handle
    }

    /// Cancel the held timer. Returns `true` if a pending timer was dropped.
    pub fn clear(&mut self, queue: &mut TimerQueue) -> bool {
        self.handle.take().is_some_and(|h| queue.cancel(h))
    }

    /// Forget the held handle without touching the queue (after a one-shot fired).
    pub fn release(&mut self) {
        self.handle = None;
    }

    /// Whether `handle` is the timer this slot currently holds.
    pub fn holds(&self, handle: TimerHandle) -> bool {
        self.handle == Some(handle)
    }

    /// Whether the slot holds a timer that is still pending.
    pub fn is_armed(&self, queue: &TimerQueue) -> bool {
        self.handle.is_some_and(|h| queue.is_active(h))
    }
}
