//! Virtual clock for combat pacing.
//!
//! Enemy turns and combat cleanup wait a fixed delay before running. The
//! engine advances this clock by the frame delta, so tests drive combat by
//! calling `tick` with large deltas instead of sleeping.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    /// Resolve the enemy whose turn it is.
    EnemyTurn,
    /// Clear a finished combat and return to exploration.
    CombatCleanup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TimerId,
    pub kind: TaskKind,
    pub due: Millis,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("scheduler is full ({} pending tasks)", GameConfig::MAX_SCHEDULED_TASKS)]
pub struct SchedulerFull;

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: Millis,
    next_id: u64,
    tasks: ArrayVec<ScheduledTask, { GameConfig::MAX_SCHEDULED_TASKS }>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedules `kind` to fire `delay_ms` after the current virtual time.
    pub fn schedule(&mut self, kind: TaskKind, delay_ms: u64) -> Result<TimerId, SchedulerFull> {
        let id = TimerId(self.next_id);
        self.tasks
            .try_push(ScheduledTask {
                id,
                kind,
                due: self.now + delay_ms,
            })
            .map_err(|_| SchedulerFull)?;
        self.next_id += 1;
        Ok(id)
    }

    /// Cancels a pending task. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }

    pub fn pending(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter()
    }

    /// Moves the clock forward and removes every task that came due,
    /// returned in firing order.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<ScheduledTask> {
        self.now = self.now + dt_ms;
        let now = self.now;

        let mut due: Vec<ScheduledTask> = self.tasks.iter().filter(|t| t.due <= now).copied().collect();
        self.tasks.retain(|t| t.due > now);
        due.sort_by_key(|t| (t.due, t.id));
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_once_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskKind::CombatCleanup, 2_000).unwrap();
        scheduler.schedule(TaskKind::EnemyTurn, 500).unwrap();

        assert!(scheduler.advance(499).is_empty());
        let fired: Vec<_> = scheduler.advance(2_000).iter().map(|t| t.kind).collect();
        assert_eq!(fired, vec![TaskKind::EnemyTurn, TaskKind::CombatCleanup]);
        assert!(scheduler.advance(10_000).is_empty());
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(TaskKind::EnemyTurn, 100).unwrap();
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(1_000).is_empty());
    }

    #[test]
    fn capacity_is_bounded() {
        let mut scheduler = Scheduler::new();
        for _ in 0..GameConfig::MAX_SCHEDULED_TASKS {
            scheduler.schedule(TaskKind::EnemyTurn, 10).unwrap();
        }
        assert_eq!(scheduler.schedule(TaskKind::EnemyTurn, 10), Err(SchedulerFull));
        assert_eq!(scheduler.advance(10).len(), GameConfig::MAX_SCHEDULED_TASKS);
    }
}
