//! One-shot timers against the simulation clock.
//!
//! The scheduler owns simulated time. Callers hold a `TimerHandle`
//! and either let it fire (returned from `advance`) or cancel it.
//! A cancelled handle never fires; cancelling twice is a no-op.

/// Opaque id of a scheduled one-shot timer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct Pending {
    handle: TimerHandle,
    due: f64,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    /// Simulated seconds since the scheduler was created.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Register a timer that fires `delay` simulated seconds from now.
    pub fn schedule(&mut self, delay: f32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { handle, due: self.now + delay as f64 });
        handle
    }

    /// Remove a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Advance the clock by `dt` seconds and return the timers that came due,
    /// earliest first. Fired timers are no longer pending.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerHandle> {
        self.now += dt as f64;
        let now = self.now;

        // Small tolerance so 0.5s over 16ms ticks fires on the tick that reaches it
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now + 1e-9 {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|p| p.handle).collect()
    }

    /// Drop every pending timer (level restart).
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
