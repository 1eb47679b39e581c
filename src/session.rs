//! Score and lives of one play-through.

pub const HIT_POINTS: i64 = 100;
pub const MISS_PENALTY: i64 = 50;

/// What a registered miss did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissOutcome {
    /// Ignored: no session running.
    Idle,
    LifeLost { lives_left: u32 },
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub score: i64,
    pub lives: u32,
    running: bool,
    /// Number of sessions started so far.
    pub rounds: u32,
}

impl Session {
    pub fn new(start_lives: u32) -> Self {
        Self {
            score: 0,
            lives: start_lives,
            running: false,
            rounds: 0,
        }
    }

    /// Reset counters for a fresh play-through and mark it running.
    pub fn start(&mut self, start_lives: u32) {
        self.score = 0;
        self.lives = start_lives;
        self.running = start_lives > 0;
        self.rounds += 1;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_over(&self) -> bool {
        self.lives == 0
    }

    /// Returns false when no session is running.
    pub fn register_hit(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.score += HIT_POINTS;
        true
    }

    /// Score has no lower bound; lives stop at zero.
    pub fn register_miss(&mut self) -> MissOutcome {
        if !self.running {
            return MissOutcome::Idle;
        }
        self.score -= MISS_PENALTY;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.running = false;
            MissOutcome::GameOver
        } else {
            MissOutcome::LifeLost {
                lives_left: self.lives,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_resets_counters() {
        let mut s = Session::new(3);
        s.start(3);
        s.register_hit();
        s.register_miss();
        s.start(5);
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, 5);
        assert!(s.is_running());
        assert_eq!(s.rounds, 2);
    }

    #[test]
    fn test_hit_adds_hundred() {
        let mut s = Session::new(3);
        s.start(3);
        assert!(s.register_hit());
        assert_eq!(s.score, 100);
        assert_eq!(s.lives, 3);
    }

    #[test]
    fn test_miss_costs_fifty_and_a_life() {
        let mut s = Session::new(3);
        s.start(3);
        assert_eq!(s.register_miss(), MissOutcome::LifeLost { lives_left: 2 });
        assert_eq!(s.score, -50);
        assert_eq!(s.lives, 2);
    }

    #[test]
    fn test_three_misses_end_the_game() {
        let mut s = Session::new(3);
        s.start(3);
        s.register_miss();
        s.register_miss();
        assert_eq!(s.register_miss(), MissOutcome::GameOver);
        assert_eq!(s.lives, 0);
        assert_eq!(s.score, -150);
        assert!(s.is_over());
        assert!(!s.is_running());
    }

    #[test]
    fn test_nothing_counts_before_start_or_after_game_over() {
        let mut s = Session::new(1);
        assert_eq!(s.register_miss(), MissOutcome::Idle);
        assert!(!s.register_hit());
        assert_eq!((s.score, s.lives), (0, 1));
        s.start(1);
        assert_eq!(s.register_miss(), MissOutcome::GameOver);
        assert_eq!(s.register_miss(), MissOutcome::Idle);
        assert_eq!(s.lives, 0);
        assert_eq!(s.score, -50);
    }
}
