//! Per-cast session flags and timer handles

use super::timer::{Scheduler, TimerHandle, TimerRole};

/// Transient state of the current fishing attempt.
///
/// At most one handle per timer role is held; assigning a new one always
/// cancels the old one first, and cancelling nulls the slot.
#[derive(Debug, Clone, Default)]
pub struct FishingSession {
    /// Bobber is out (cast in flight or in the water)
    pub is_fishing: bool,
    /// A fish was landed this session
    pub fish_caught: bool,
    /// Confirm presses during the skill check
    pub click_count: u32,
    tremble: Option<TimerHandle>,
    bite: Option<TimerHandle>,
}

impl FishingSession {
    fn slot(&mut self, role: TimerRole) -> &mut Option<TimerHandle> {
        match role {
            TimerRole::Tremble => &mut self.tremble,
            TimerRole::Bite => &mut self.bite,
        }
    }

    pub fn handle(&self, role: TimerRole) -> Option<TimerHandle> {
        match role {
            TimerRole::Tremble => self.tremble,
            TimerRole::Bite => self.bite,
        }
    }

    /// True while a tremble or bite timer is outstanding
    pub fn has_active_timer(&self) -> bool {
        self.tremble.is_some() || self.bite.is_some()
    }

    /// Store a freshly scheduled handle, cancelling whatever held the role
    pub fn arm(&mut self, scheduler: &mut Scheduler, role: TimerRole, handle: TimerHandle) {
        if let Some(old) = self.slot(role).replace(handle) {
            scheduler.cancel(old);
        }
    }

    /// Cancel one role's timer. Safe to call with nothing pending.
    pub fn cancel(&mut self, scheduler: &mut Scheduler, role: TimerRole) {
        if let Some(handle) = self.slot(role).take() {
            scheduler.cancel(handle);
        }
    }

    pub fn cancel_timers(&mut self, scheduler: &mut Scheduler) {
        self.cancel(scheduler, TimerRole::Tremble);
        self.cancel(scheduler, TimerRole::Bite);
    }

    /// Whether a fire belongs to the handle currently held for its role
    pub fn owns(&self, role: TimerRole, handle: TimerHandle) -> bool {
        self.handle(role) == Some(handle)
    }

    /// A one-shot timer that fired is no longer pending; forget it
    pub fn consume(&mut self, role: TimerRole) {
        self.slot(role).take();
    }

    pub fn reset_flags(&mut self) {
        self.is_fishing = false;
        self.fish_caught = false;
        self.click_count = 0;
    }
}
