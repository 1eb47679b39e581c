//! Timeline: single-threaded cooperative task queue on a virtual millisecond clock.
//!
//! Every delayed action in the game (scheduler ticks, pull-downs, animation
//! completions) is a task posted here and drained in due-time order. Tasks with
//! the same due time fire in the order they were posted.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Who posted a task. Each owner can be cancelled as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Scheduler,
    Animator,
}

impl Owner {
    const COUNT: usize = 2;

    fn index(self) -> usize {
        match self {
            Self::Scheduler => 0,
            Self::Animator => 1,
        }
    }
}

#[derive(Debug)]
struct Entry<T> {
    due_ms: u64,
    seq: u64,
    owner: Owner,
    generation: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

/// A task taken off the queue, with the bookkeeping needed to check it is still live.
#[derive(Debug)]
pub struct Fired<T> {
    pub due_ms: u64,
    pub owner: Owner,
    generation: u64,
    pub task: T,
}

#[derive(Debug)]
pub struct TaskQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    now_ms: u64,
    next_seq: u64,
    generations: [u64; Owner::COUNT],
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            now_ms: 0,
            next_seq: 0,
            generations: [0; Owner::COUNT],
        }
    }

    /// Current time of the queue: the due time of the last fired task, or the last `advance_to`.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Post a task to run as soon as possible (after everything already due now).
    pub fn post(&mut self, owner: Owner, task: T) {
        self.post_delayed(owner, 0, task);
    }

    pub fn post_delayed(&mut self, owner: Owner, delay_ms: u64, task: T) {
        let entry = Entry {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
            owner,
            generation: self.generations[owner.index()],
            task,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
    }

    /// Drop every pending task of `owner` in one step. Idempotent.
    ///
    /// Bumps the owner's generation so a task that was already popped but not yet
    /// executed is recognised as stale by [`TaskQueue::is_live`].
    pub fn cancel_all(&mut self, owner: Owner) {
        self.heap.retain(|Reverse(e)| e.owner != owner);
        self.generations[owner.index()] += 1;
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<T>> {
        let due = self.heap.peek().map(|Reverse(e)| e.due_ms)?;
        if due > until_ms {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(Fired {
            due_ms: entry.due_ms,
            owner: entry.owner,
            generation: entry.generation,
            task: entry.task,
        })
    }

    /// Move the clock forward once nothing else is due. Never moves it backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// False when the task's owner was cancelled after the task was posted.
    pub fn is_live(&self, fired: &Fired<T>) -> bool {
        fired.generation == self.generations[fired.owner.index()]
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    #[cfg(test)]
    pub fn pending_for(&self, owner: Owner) -> usize {
        self.heap.iter().filter(|Reverse(e)| e.owner == owner).count()
    }

    #[cfg(test)]
    pub fn pending_tasks(&self, owner: Owner) -> impl Iterator<Item = &T> {
        self.heap
            .iter()
            .filter(move |Reverse(e)| e.owner == owner)
            .map(|Reverse(e)| &e.task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut TaskQueue<&'static str>, until: u64) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some(f) = q.pop_due(until) {
            out.push(f.task);
        }
        out
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut q = TaskQueue::new();
        q.post_delayed(Owner::Scheduler, 300, "late");
        q.post_delayed(Owner::Scheduler, 100, "early");
        q.post_delayed(Owner::Animator, 200, "middle");
        assert_eq!(drain(&mut q, 1_000), vec!["early", "middle", "late"]);
        assert_eq!(q.now_ms(), 300);
    }

    #[test]
    fn test_equal_due_times_are_fifo() {
        let mut q = TaskQueue::new();
        q.post(Owner::Scheduler, "a");
        q.post(Owner::Animator, "b");
        q.post(Owner::Scheduler, "c");
        assert_eq!(drain(&mut q, 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_not_due_yet_stays_queued() {
        let mut q = TaskQueue::new();
        q.post_delayed(Owner::Scheduler, 500, "later");
        assert!(q.pop_due(499).is_none());
        assert_eq!(q.pending(), 1);
        assert_eq!(drain(&mut q, 500), vec!["later"]);
    }

    #[test]
    fn test_delay_is_relative_to_clock() {
        let mut q = TaskQueue::new();
        q.advance_to(1_000);
        q.post_delayed(Owner::Scheduler, 250, "x");
        assert!(q.pop_due(1_249).is_none());
        let f = q.pop_due(1_250).unwrap();
        assert_eq!(f.due_ms, 1_250);
    }

    #[test]
    fn test_cancel_all_only_hits_owner() {
        let mut q = TaskQueue::new();
        q.post_delayed(Owner::Scheduler, 10, "tick");
        q.post_delayed(Owner::Scheduler, 20, "pull down");
        q.post_delayed(Owner::Animator, 15, "anim");
        q.cancel_all(Owner::Scheduler);
        assert_eq!(q.pending_for(Owner::Scheduler), 0);
        assert_eq!(drain(&mut q, 100), vec!["anim"]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut q: TaskQueue<&str> = TaskQueue::new();
        q.cancel_all(Owner::Scheduler);
        q.cancel_all(Owner::Scheduler);
        assert_eq!(q.pending(), 0);
        q.post(Owner::Scheduler, "fresh");
        let f = q.pop_due(0).unwrap();
        assert!(q.is_live(&f));
    }

    #[test]
    fn test_popped_task_goes_stale_after_cancel() {
        let mut q = TaskQueue::new();
        q.post(Owner::Scheduler, "tick");
        let fired = q.pop_due(0).unwrap();
        assert!(q.is_live(&fired));
        q.cancel_all(Owner::Scheduler);
        assert!(!q.is_live(&fired));
    }

    #[test]
    fn test_advance_never_goes_back() {
        let mut q: TaskQueue<()> = TaskQueue::new();
        q.advance_to(50);
        q.advance_to(10);
        assert_eq!(q.now_ms(), 50);
    }
}
