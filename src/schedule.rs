use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Milliseconds of game time
pub type Millis = f64;

/// Deferred, fire-once effects. They are not cancellable; the owner guards
/// against scheduling the same effect twice with its own flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// resolve an enemy side contact against the player
    HazardStrike,
    /// restart the current level after the death animation
    Respawn,
    /// easy mode : accept the next hazard contact again
    HazardCooldown,
    /// tube pause over, gravity back on
    TubeGravity,
    /// push the player past the right edge so the level completes
    TubeExit,
    InvincibilityEnd,
}

/// Monotonic clock advanced once per simulation tick
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GameClock {
    now: Millis,
}

impl GameClock {
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn advance(&mut self, delta: Millis) {
        if delta > 0.0 {
            self.now += delta;
        }
    }
}

#[derive(Debug)]
struct Entry {
    due: Millis,
    // insertion sequence, keeps same-instant events in FIFO order
    seq: u64,
    event: ScheduledEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // BinaryHeap is a max heap, reverse so the earliest entry sits on top
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    pub fn schedule(&mut self, now: Millis, delay: Millis, event: ScheduledEvent) {
        let entry = Entry {
            due: now + delay.max(0.0),
            seq: self.next_seq,
            event,
        };
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// Pop every event due at or before `now`, earliest first
    pub fn take_due(&mut self, now: Millis) -> Vec<ScheduledEvent> {
        let mut due = vec![];
        while let Some(entry) = self.queue.peek() {
            if entry.due > now {
                break;
            }
            if let Some(entry) = self.queue.pop() {
                due.push(entry.event);
            }
        }
        due
    }

    pub fn is_pending(&self, event: ScheduledEvent) -> bool {
        self.queue.iter().any(|entry| entry.event == event)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
