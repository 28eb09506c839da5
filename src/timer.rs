use std::time::Duration;

use web_time::Instant;

use crate::types::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A scheduled automated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledMove {
    pub id: TaskId,
    /// The player the move was scheduled for.
    pub player: Player,
    pub due: Instant,
}

/// Holds at most one pending automated move; scheduling replaces it.
#[derive(Debug)]
pub struct AutoPlayTimer {
    delay: Duration,
    next_id: u64,
    pending: Option<ScheduledMove>,
}

impl AutoPlayTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a move for `player` at `now + delay`, cancelling whatever
    /// was pending.
    pub fn schedule(&mut self, player: Player, now: Instant) -> TaskId {
        self.cancel();
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending = Some(ScheduledMove {
            id,
            player,
            due: now + self.delay,
        });
        id
    }

    /// Drops the pending task, returning it if there was one.
    pub fn cancel(&mut self) -> Option<ScheduledMove> {
        self.pending.take()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|task| task.due)
    }

    /// Hands out the pending task once it is due. A task is handed out at
    /// most once.
    pub fn take_due(&mut self, now: Instant) -> Option<ScheduledMove> {
        match self.pending {
            Some(task) if task.due <= now => self.pending.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player::{Player1, Player2};

    const DELAY: Duration = Duration::from_millis(1500);

    #[test]
    fn task_is_not_due_before_delay() {
        let start = Instant::now();
        let mut timer = AutoPlayTimer::new(DELAY);
        timer.schedule(Player2, start);

        assert!(timer.take_due(start + Duration::from_millis(1499)).is_none());
        assert_eq!(timer.deadline(), Some(start + DELAY));

        let task = timer.take_due(start + DELAY).unwrap();
        assert_eq!(task.player, Player2);
        assert!(timer.take_due(start + DELAY * 2).is_none());
    }

    #[test]
    fn cancelled_task_never_fires() {
        let start = Instant::now();
        let mut timer = AutoPlayTimer::new(DELAY);
        timer.schedule(Player2, start);

        assert!(timer.cancel().is_some());

        assert!(timer.take_due(start + DELAY * 10).is_none());
        assert!(timer.deadline().is_none());
    }

    #[test]
    fn rescheduling_supersedes_previous_task() {
        let start = Instant::now();
        let mut timer = AutoPlayTimer::new(DELAY);
        let first = timer.schedule(Player2, start);
        let second = timer.schedule(Player1, start + Duration::from_millis(500));

        assert_ne!(first, second);
        assert!(timer.take_due(start + DELAY).is_none());

        let task = timer.take_due(start + DELAY + Duration::from_millis(500)).unwrap();
        assert_eq!(task.id, second);
        assert_eq!(task.player, Player1);
    }
}
