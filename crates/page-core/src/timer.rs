//! Timer queue and debouncing driven by an external clock.
//!
//! Time is expressed in [`Millis`] since page start. Nothing here reads a
//! real clock: the caller decides what "now" is, which lets tests advance
//! time deterministically.

/// Milliseconds since the page started.
pub type Millis = u64;

/// Handle returned when scheduling a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct TimerEntry<T> {
    id: TimerId,
    fire_at: Millis,
    /// Insertion order, breaks ties between timers due at the same instant.
    seq: u64,
    interval: Option<Millis>,
    payload: T,
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// Scheduled firing time (not the time it was popped).
    pub at: Millis,
    pub payload: T,
}

/// Single-threaded timer list (setTimeout / setInterval).
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_id: u64,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            next_seq: 0,
        }
    }

    fn push(&mut self, fire_at: Millis, interval: Option<Millis>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(TimerEntry {
            id,
            fire_at,
            seq,
            interval,
            payload,
        });
        id
    }

    /// Fire once, `delay` after `now`.
    pub fn set_timeout(&mut self, now: Millis, delay: Millis, payload: T) -> TimerId {
        self.push(now.saturating_add(delay), None, payload)
    }

    /// Fire every `period` starting `period` after `now`. A zero period is treated as 1ms.
    pub fn set_interval(&mut self, now: Millis, period: Millis, payload: T) -> TimerId {
        let period = period.max(1);
        self.push(now.saturating_add(period), Some(period), payload)
    }

    /// Cancel a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Earliest scheduled firing time.
    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.fire_at).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Pop the earliest timer due at or before `now`.
    ///
    /// Intervals are re-armed one period after their scheduled time.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fired<T>> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.fire_at <= now)
            .min_by_key(|(_, e)| (e.fire_at, e.seq))
            .map(|(i, _)| i)?;

        match self.entries[index].interval {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let entry = &mut self.entries[index];
                let fired = Fired {
                    id: entry.id,
                    at: entry.fire_at,
                    payload: entry.payload.clone(),
                };
                entry.fire_at = entry.fire_at.saturating_add(period);
                entry.seq = seq;
                Some(fired)
            }
            None => {
                let entry = self.entries.swap_remove(index);
                Some(Fired {
                    id: entry.id,
                    at: entry.fire_at,
                    payload: entry.payload,
                })
            }
        }
    }
}

/// Trailing-edge debounce bookkeeping.
///
/// Holds the currently armed timer; re-arming hands back the previous one so
/// the owner can cancel it.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    wait: Millis,
    pending: Option<TimerId>,
}

impl Debouncer {
    pub fn new(wait: Millis) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    pub fn wait(&self) -> Millis {
        self.wait
    }

    /// Record `timer` as the armed timer, returning the one it supersedes.
    pub fn rearm(&mut self, timer: TimerId) -> Option<TimerId> {
        self.pending.replace(timer)
    }

    /// Called when a timer fires. Returns true only for the armed timer.
    pub fn settle(&mut self, timer: TimerId) -> bool {
        if self.pending == Some(timer) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
