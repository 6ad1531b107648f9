//! Cancellable scheduled tasks on the simulation clock
//!
//! Every restartable timer in the game is a [`TaskKind`]. Scheduling a kind
//! that is already pending supersedes the old instance: the old heap entry
//! stays in the queue but its generation no longer matches, so it is skipped
//! when it comes due. At most one instance of each kind is ever live.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::effects::EffectId;

/// What a scheduled task is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKind {
    /// Next link of the target spawn chain
    SpawnChain,
    /// Combo resets if no hit lands before this fires
    ComboDecay,
    /// Screen shake switches off
    ShakeEnd,
    /// A cosmetic effect reaches the end of its time-to-live
    EffectExpiry(EffectId),
}

/// Identity of one scheduled instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    pub kind: TaskKind,
    generation: u64,
}

/// A task that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTask {
    pub kind: TaskKind,
    pub due_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    generation: u64,
    due_ms: u64,
}

/// Min-heap of pending tasks keyed by due time, then scheduling order
#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<(u64, u64, TaskKind)>>,
    pending: HashMap<TaskKind, Pending>,
    next_generation: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` at `due_ms`, replacing any pending instance of it
    pub fn schedule(&mut self, kind: TaskKind, due_ms: u64) -> TaskHandle {
        let generation = self.next_generation;
        self.next_generation += 1;

        self.pending.insert(kind, Pending { generation, due_ms });
        self.queue.push(Reverse((due_ms, generation, kind)));

        TaskHandle { kind, generation }
    }

    /// Cancel the pending instance of `kind`, if any
    pub fn cancel(&mut self, kind: TaskKind) -> bool {
        self.pending.remove(&kind).is_some()
    }

    /// Whether `handle` is still the live instance of its kind
    pub fn is_live(&self, handle: TaskHandle) -> bool {
        self.pending
            .get(&handle.kind)
            .is_some_and(|p| p.generation == handle.generation)
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.pending.contains_key(&kind)
    }

    /// Due time of the live instance of `kind`
    pub fn due_at(&self, kind: TaskKind) -> Option<u64> {
        self.pending.get(&kind).map(|p| p.due_ms)
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pop the earliest live task due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<FiredTask> {
        while let Some(Reverse((due_ms, generation, kind))) = self.queue.peek().copied() {
            if due_ms > now_ms {
                return None;
            }
            self.queue.pop();

            let live = self
                .pending
                .get(&kind)
                .is_some_and(|p| p.generation == generation);
            if live {
                self.pending.remove(&kind);
                return Some(FiredTask { kind, due_ms });
            }
        }
        None
    }

    /// Drop every task
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }
}
