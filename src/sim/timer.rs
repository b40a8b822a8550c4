//! Fake-clock scheduler for animation delays
//!
//! Delays are fire-and-forget: once scheduled an event always fires, in due
//! order (ties in scheduling order). Nothing is cancelled.

use serde::{Deserialize, Serialize};

/// Events fired when an animation delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Rolling animation finished on `value`
    DieSettled { value: u8 },
    /// Roll again automatically after an operator was chosen
    AutoRoll,
    /// Level 1 done, show the next intro
    Level1Finished,
    /// Card flip finished
    CardRevealed,
    /// Card result display finished
    RoundFinished,
    /// Coin stopped spinning
    CoinLanded,
    /// Coin result ready to show
    FlipResultShown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    event: TimerEvent,
}

/// Pending delays keyed by the session clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now_ms: f64,
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Fire `event` after `delay_ms`
    pub fn schedule(&mut self, delay_ms: u32, event: TimerEvent) {
        let entry = Scheduled {
            due_ms: self.now_ms + f64::from(delay_ms),
            seq: self.next_seq,
            event,
        };
        self.next_seq += 1;
        self.pending.push(entry);
    }

    /// Any delay in flight (level input is locked while busy)
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Earliest due time, if anything is scheduled
    pub fn next_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|s| s.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Move the clock forward to `now_ms` (never backwards)
    pub fn set_now(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    /// Pop the earliest event due at or before `until_ms`.
    ///
    /// The clock is moved to the event's due time so delays scheduled from its
    /// handler are measured from when it fired.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<TimerEvent> {
        let (idx, entry) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(i, s)| (i, *s))?;
        self.pending.remove(idx);
        self.set_now(entry.due_ms);
        Some(entry.event)
    }

    /// Drop every pending delay; the clock keeps its time
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(800, TimerEvent::CardRevealed);
        s.schedule(500, TimerEvent::FlipResultShown);
        s.schedule(500, TimerEvent::AutoRoll);
        assert_eq!(s.pop_due(1000.0), Some(TimerEvent::FlipResultShown));
        assert_eq!(s.pop_due(1000.0), Some(TimerEvent::AutoRoll));
        assert_eq!(s.pop_due(1000.0), Some(TimerEvent::CardRevealed));
        assert_eq!(s.pop_due(1000.0), None);
        assert!(!s.is_busy());
    }

    #[test]
    fn test_not_due_yet() {
        let mut s = Scheduler::new();
        s.schedule(700, TimerEvent::AutoRoll);
        assert_eq!(s.pop_due(699.0), None);
        assert!(s.is_busy());
        assert_eq!(s.next_due(), Some(700.0));
    }

    #[test]
    fn test_chained_delay_measured_from_fire_time() {
        let mut s = Scheduler::new();
        s.schedule(800, TimerEvent::CardRevealed);
        assert_eq!(s.pop_due(5000.0), Some(TimerEvent::CardRevealed));
        assert_eq!(s.now(), 800.0);
        s.schedule(1500, TimerEvent::RoundFinished);
        assert_eq!(s.next_due(), Some(2300.0));
    }
}
