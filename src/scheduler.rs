//! Pop-up scheduler: self-rescheduling chains that raise a random lowered figure.

use crate::figure::{ANIMATION_MS, AnimationToken, FigureState};
use crate::grid::Grid;
use crate::timeline::{Owner, TaskQueue};
use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::RangeInclusive;

/// Work items on the game timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// One tick of pop-up chain `chain`.
    PopUp { chain: usize },
    /// Lower a figure raised earlier by a tick.
    PullDown { row: usize, col: usize },
    /// A figure's rise or fall animation ran its course.
    AnimationDone {
        row: usize,
        col: usize,
        token: AnimationToken,
    },
}

/// Random delay bounds, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cadence {
    pub move_delay_ms: RangeInclusive<u64>,
    pub pull_down_delay_ms: RangeInclusive<u64>,
}

impl Cadence {
    pub fn from_config(config: &crate::GameConfig) -> Self {
        Self {
            move_delay_ms: config.min_move_delay_ms..=config.max_move_delay_ms,
            pull_down_delay_ms: config.min_pull_down_delay_ms..=config.max_pull_down_delay_ms,
        }
    }
}

fn sample<R: Rng>(rng: &mut R, range: &RangeInclusive<u64>) -> u64 {
    rng.gen_range(range.clone())
}

/// Post the completion of a just-started animation.
pub fn post_animation_done(
    queue: &mut TaskQueue<Task>,
    row: usize,
    col: usize,
    token: AnimationToken,
) {
    queue.post_delayed(Owner::Animator, ANIMATION_MS, Task::AnimationDone { row, col, token });
}

#[derive(Debug, Default)]
pub struct Scheduler {
    active: bool,
    chains: usize,
    /// Ticks executed while active, all chains together.
    pub ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn chains(&self) -> usize {
        self.chains
    }

    /// Enqueue `moves_per_time` independent chains, replacing any running ones.
    pub fn start(&mut self, queue: &mut TaskQueue<Task>, moves_per_time: usize) {
        queue.cancel_all(Owner::Scheduler);
        self.active = true;
        self.chains = moves_per_time;
        for chain in 0..moves_per_time {
            queue.post(Owner::Scheduler, Task::PopUp { chain });
        }
        tracing::debug!(chains = moves_per_time, "scheduler started");
    }

    /// Cancel every pending scheduler task at once. Idempotent.
    pub fn stop(&mut self, queue: &mut TaskQueue<Task>) {
        if self.active {
            tracing::debug!(ticks = self.ticks, "scheduler stopped");
        }
        self.active = false;
        queue.cancel_all(Owner::Scheduler);
    }

    /// Run one tick of `chain`. Returns the figure raised, if any.
    ///
    /// An inactive scheduler neither raises nor reschedules, so a cancelled chain ends here.
    pub fn tick<R: Rng>(
        &mut self,
        chain: usize,
        grid: &mut Grid,
        queue: &mut TaskQueue<Task>,
        rng: &mut R,
        cadence: &Cadence,
    ) -> Option<(usize, usize)> {
        if !self.active {
            return None;
        }
        self.ticks += 1;
        let now = queue.now_ms();

        let lowered = grid.cells_in(FigureState::Down);
        let raised = lowered.choose(rng).copied();
        if let Some((row, col)) = raised {
            if let Some(token) = grid.get_mut(row, col).and_then(|f| f.pull_up(now)) {
                post_animation_done(queue, row, col, token);
            }
            let stay = sample(rng, &cadence.pull_down_delay_ms);
            queue.post_delayed(Owner::Scheduler, stay, Task::PullDown { row, col });
            tracing::trace!(chain, row, col, stay_ms = stay, "pop-up");
        }

        let next = sample(rng, &cadence.move_delay_ms);
        queue.post_delayed(Owner::Scheduler, next, Task::PopUp { chain });
        raised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cadence() -> Cadence {
        Cadence {
            move_delay_ms: 500..=1500,
            pull_down_delay_ms: 500..=1500,
        }
    }

    fn setup() -> (Scheduler, Grid, TaskQueue<Task>, ChaCha8Rng) {
        (
            Scheduler::new(),
            Grid::new(Vec3::default(), 3, 3),
            TaskQueue::new(),
            ChaCha8Rng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_start_enqueues_one_tick_per_chain() {
        let (mut s, _, mut q, _) = setup();
        s.start(&mut q, 2);
        let mut chains: Vec<usize> = q
            .pending_tasks(Owner::Scheduler)
            .map(|t| match t {
                Task::PopUp { chain } => *chain,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        chains.sort_unstable();
        assert_eq!(chains, vec![0, 1]);
        assert!(s.is_active());
        assert_eq!(s.chains(), 2);
    }

    #[test]
    fn test_restart_replaces_chains() {
        let (mut s, _, mut q, _) = setup();
        s.start(&mut q, 2);
        s.start(&mut q, 2);
        assert_eq!(q.pending_for(Owner::Scheduler), 2);
    }

    #[test]
    fn test_tick_raises_and_schedules_follow_ups() {
        let (mut s, mut g, mut q, mut rng) = setup();
        s.start(&mut q, 1);
        q.pop_due(0).unwrap();
        let (row, col) = s.tick(0, &mut g, &mut q, &mut rng, &cadence()).unwrap();
        assert_eq!(g.get(row, col).unwrap().state(), FigureState::MovingUp);

        let tasks: Vec<Task> = q.pending_tasks(Owner::Scheduler).copied().collect();
        assert!(tasks.contains(&Task::PullDown { row, col }));
        assert!(tasks.contains(&Task::PopUp { chain: 0 }));
        assert_eq!(q.pending_for(Owner::Animator), 1);
    }

    #[test]
    fn test_delays_stay_within_cadence() {
        let (mut s, mut g, mut q, mut rng) = setup();
        s.start(&mut q, 1);
        q.pop_due(0).unwrap();
        s.tick(0, &mut g, &mut q, &mut rng, &cadence());
        let mut seen = 0;
        while let Some(f) = q.pop_due(u64::MAX) {
            match f.task {
                Task::PopUp { .. } | Task::PullDown { .. } => {
                    assert!((500..=1500).contains(&f.due_ms), "due {}", f.due_ms);
                    seen += 1;
                }
                Task::AnimationDone { .. } => assert_eq!(f.due_ms, ANIMATION_MS),
            }
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_tick_with_nothing_down_still_reschedules() {
        let (mut s, mut g, mut q, mut rng) = setup();
        for row in 0..3 {
            for col in 0..3 {
                g.get_mut(row, col).unwrap().pull_up(0);
            }
        }
        s.start(&mut q, 1);
        q.pop_due(0).unwrap();
        assert!(s.tick(0, &mut g, &mut q, &mut rng, &cadence()).is_none());
        let tasks: Vec<Task> = q.pending_tasks(Owner::Scheduler).copied().collect();
        assert_eq!(tasks, vec![Task::PopUp { chain: 0 }]);
    }

    #[test]
    fn test_inactive_tick_does_nothing() {
        let (mut s, mut g, mut q, mut rng) = setup();
        s.start(&mut q, 1);
        s.stop(&mut q);
        assert!(s.tick(0, &mut g, &mut q, &mut rng, &cadence()).is_none());
        assert_eq!(q.pending(), 0);
        assert_eq!(g.count_in(FigureState::Down), 9);
        assert_eq!(s.ticks, 0);
    }

    #[test]
    fn test_stop_cancels_pull_downs_but_not_animations() {
        let (mut s, mut g, mut q, mut rng) = setup();
        s.start(&mut q, 1);
        q.pop_due(0).unwrap();
        s.tick(0, &mut g, &mut q, &mut rng, &cadence());
        s.stop(&mut q);
        s.stop(&mut q);
        assert_eq!(q.pending_for(Owner::Scheduler), 0);
        assert_eq!(q.pending_for(Owner::Animator), 1);
        assert!(!s.is_active());
    }

    #[test]
    fn test_only_lowered_figures_are_picked() {
        let (mut s, mut g, mut q, mut rng) = setup();
        s.start(&mut q, 1);
        let mut raised = Vec::new();
        for _ in 0..9 {
            if let Some(pos) = s.tick(0, &mut g, &mut q, &mut rng, &cadence()) {
                raised.push(pos);
            }
        }
        raised.sort_unstable();
        raised.dedup();
        assert_eq!(raised.len(), 9);
        assert_eq!(g.count_in(FigureState::Down), 0);
    }
}
