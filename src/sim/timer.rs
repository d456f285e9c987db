//! Cancellable timers on the simulation clock
//!
//! Every scheduled action returns a [`TimerHandle`]. Handles carry a
//! generation so a fire can always be matched against the handle the owner
//! currently holds; anything else is stale and must be ignored.

use serde::{Deserialize, Serialize};

/// What a timer is for. The fishing state machine holds at most one handle per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerRole {
    /// Repeating bobber jitter while waiting for a bite
    Tremble,
    /// One-shot delay until the skill check opens
    Bite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    pub id: u32,
    pub generation: u64,
}

/// A timer that came due during [`Scheduler::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub role: TimerRole,
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TimerHandle,
    role: TimerRole,
    due: f64,
    /// Some(interval) for repeating timers
    repeat: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    entries: Vec<Scheduled>,
    next_id: u32,
    generation: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        self.generation += 1;
        TimerHandle {
            id: self.next_id,
            generation: self.generation,
        }
    }

    /// Fire once after `delay` seconds
    pub fn schedule_once(&mut self, delay: f32, role: TimerRole) -> TimerHandle {
        let handle = self.next_handle();
        self.entries.push(Scheduled {
            handle,
            role,
            due: self.now + delay.max(0.0) as f64,
            repeat: None,
        });
        handle
    }

    /// Fire every `interval` seconds until cancelled
    pub fn schedule_repeating(&mut self, interval: f32, role: TimerRole) -> TimerHandle {
        // A zero interval would fire unboundedly inside one advance
        let interval = (interval as f64).max(1e-3);
        let handle = self.next_handle();
        self.entries.push(Scheduled {
            handle,
            role,
            due: self.now + interval,
            repeat: Some(interval),
        });
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Number of timers still waiting to fire
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Advance the clock, returning fires in due order.
    ///
    /// One-shot timers are removed when they fire. Repeating timers fire once
    /// per elapsed interval and stay scheduled.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerFired> {
        self.now += dt.max(0.0) as f64;
        let now = self.now;

        let mut fired: Vec<(f64, TimerFired)> = Vec::new();
        for entry in &mut self.entries {
            while entry.due <= now {
                fired.push((
                    entry.due,
                    TimerFired {
                        handle: entry.handle,
                        role: entry.role,
                    },
                ));
                match entry.repeat {
                    Some(interval) => entry.due += interval,
                    None => break,
                }
            }
        }
        self.entries.retain(|e| e.repeat.is_some() || e.due > now);

        fired.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.handle.generation.cmp(&b.1.handle.generation))
        });
        fired.into_iter().map(|(_, f)| f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut sched = Scheduler::new();
        let handle = sched.schedule_once(0.5, TimerRole::Bite);
        assert!(sched.advance(0.25).is_empty());
        let fired = sched.advance(0.3);
        assert_eq!(fired, vec![TimerFired { handle, role: TimerRole::Bite }]);
        assert_eq!(sched.pending(), 0);
        assert!(sched.advance(10.0).is_empty());
    }

    #[test]
    fn test_repeating_fires_per_interval() {
        let mut sched = Scheduler::new();
        sched.schedule_repeating(0.1, TimerRole::Tremble);
        let fired = sched.advance(0.35);
        assert_eq!(fired.len(), 3);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut sched = Scheduler::new();
        let handle = sched.schedule_once(1.0, TimerRole::Bite);
        assert!(sched.cancel(handle));
        assert!(!sched.cancel(handle));
        assert!(sched.advance(2.0).is_empty());
    }

    #[test]
    fn test_handles_are_never_reused() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_once(1.0, TimerRole::Bite);
        sched.cancel(a);
        let b = sched.schedule_once(1.0, TimerRole::Bite);
        assert_ne!(a, b);
        assert!(!sched.is_pending(a));
        assert!(sched.is_pending(b));
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut sched = Scheduler::new();
        let late = sched.schedule_once(0.3, TimerRole::Bite);
        let early = sched.schedule_once(0.1, TimerRole::Tremble);
        let fired = sched.advance(1.0);
        assert_eq!(fired[0].handle, early);
        assert_eq!(fired[1].handle, late);
    }
}
