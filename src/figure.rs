//! Figure: one grid cell's up/down state machine and its rise/fall animation.

/// Height of a fully raised figure above the anchor plane.
pub const RAISED_HEIGHT: f32 = 0.4;
/// Height of a lowered figure.
pub const LOWERED_HEIGHT: f32 = 0.0;
/// Duration of one rise or fall.
pub const ANIMATION_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FigureState {
    #[default]
    Down,
    MovingUp,
    Up,
    MovingDown,
}

impl FigureState {
    #[cfg(test)]
    pub fn is_rest(self) -> bool {
        matches!(self, Self::Down | Self::Up)
    }

    /// Down or already on its way down.
    pub fn is_sinking(self) -> bool {
        matches!(self, Self::Down | Self::MovingDown)
    }
}

/// Offset in anchor space: x to the right, y up, z towards the player.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add_offset(self, x: f32, y: f32, z: f32) -> Self {
        Self::new(self.x + x, self.y + y, self.z + z)
    }
}

/// Identifies one started animation, so a completion for a replaced animation is ignored.
pub type AnimationToken = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    token: AnimationToken,
    from: f32,
    to: f32,
    started_ms: u64,
    target: FigureState,
}

impl Animation {
    fn height_at(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.started_ms).min(ANIMATION_MS);
        let t = elapsed as f32 / ANIMATION_MS as f32;
        self.from + (self.to - self.from) * t
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    state: FigureState,
    pub offset: Vec3,
    /// Height the body rests at when no animation runs.
    height: f32,
    animation: Option<Animation>,
    next_token: AnimationToken,
}

impl Figure {
    pub fn new(offset: Vec3) -> Self {
        Self {
            state: FigureState::Down,
            offset,
            height: LOWERED_HEIGHT,
            animation: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> FigureState {
        self.state
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Start rising unless already up or on the way. Returns the token to complete later.
    pub fn pull_up(&mut self, now_ms: u64) -> Option<AnimationToken> {
        if matches!(self.state, FigureState::MovingUp | FigureState::Up) {
            return None;
        }
        Some(self.animate(now_ms, RAISED_HEIGHT, FigureState::MovingUp, FigureState::Up))
    }

    /// Start sinking unless already down or on the way. Returns the token to complete later.
    pub fn pull_down(&mut self, now_ms: u64) -> Option<AnimationToken> {
        if self.state.is_sinking() {
            return None;
        }
        Some(self.animate(now_ms, LOWERED_HEIGHT, FigureState::MovingDown, FigureState::Down))
    }

    fn animate(
        &mut self,
        now_ms: u64,
        to: f32,
        moving: FigureState,
        target: FigureState,
    ) -> AnimationToken {
        // Start from wherever the body is now; a replaced animation simply stops here.
        let from = self.height_at(now_ms);
        let token = self.next_token;
        self.next_token += 1;
        self.height = from;
        self.animation = Some(Animation {
            token,
            from,
            to,
            started_ms: now_ms,
            target,
        });
        self.state = moving;
        token
    }

    /// Complete the animation identified by `token`. Stale tokens are ignored. Returns true if applied.
    pub fn finish_animation(&mut self, token: AnimationToken) -> bool {
        match self.animation {
            Some(anim) if anim.token == token => {
                self.height = anim.to;
                self.state = anim.target;
                self.animation = None;
                true
            }
            _ => false,
        }
    }

    /// Current body height for drawing.
    pub fn height_at(&self, now_ms: u64) -> f32 {
        self.animation
            .map(|a| a.height_at(now_ms))
            .unwrap_or(self.height)
    }

    /// Raised fraction 0.0..=1.0.
    pub fn raised_fraction(&self, now_ms: u64) -> f32 {
        (self.height_at(now_ms) / RAISED_HEIGHT).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure() -> Figure {
        Figure::new(Vec3::default())
    }

    #[test]
    fn test_new_figure_is_down() {
        let f = figure();
        assert_eq!(f.state(), FigureState::Down);
        assert!(!f.is_animating());
        assert_eq!(f.height_at(0), LOWERED_HEIGHT);
    }

    #[test]
    fn test_pull_up_completes_up() {
        let mut f = figure();
        let token = f.pull_up(0).unwrap();
        assert_eq!(f.state(), FigureState::MovingUp);
        assert!(f.finish_animation(token));
        assert_eq!(f.state(), FigureState::Up);
        assert_eq!(f.height_at(1_000), RAISED_HEIGHT);
    }

    #[test]
    fn test_pull_down_completes_down() {
        let mut f = figure();
        let up = f.pull_up(0).unwrap();
        f.finish_animation(up);
        let down = f.pull_down(300).unwrap();
        assert_eq!(f.state(), FigureState::MovingDown);
        assert!(f.finish_animation(down));
        assert_eq!(f.state(), FigureState::Down);
        assert_eq!(f.height_at(1_000), LOWERED_HEIGHT);
    }

    #[test]
    fn test_pull_up_while_up_or_rising_is_noop() {
        let mut f = figure();
        let token = f.pull_up(0).unwrap();
        assert!(f.pull_up(100).is_none());
        assert_eq!(f.state(), FigureState::MovingUp);
        f.finish_animation(token);
        assert!(f.pull_up(400).is_none());
        assert_eq!(f.state(), FigureState::Up);
        assert!(!f.is_animating());
    }

    #[test]
    fn test_pull_down_while_down_is_noop() {
        let mut f = figure();
        assert!(f.pull_down(0).is_none());
        assert_eq!(f.state(), FigureState::Down);
        assert!(!f.is_animating());
    }

    #[test]
    fn test_pull_down_while_sinking_is_noop() {
        let mut f = figure();
        let up = f.pull_up(0).unwrap();
        f.finish_animation(up);
        f.pull_down(500).unwrap();
        assert!(f.pull_down(600).is_none());
        assert_eq!(f.state(), FigureState::MovingDown);
    }

    #[test]
    fn test_new_animation_replaces_in_flight_one() {
        let mut f = figure();
        let rise = f.pull_up(0).unwrap();
        // Halfway up, lowered again.
        let fall = f.pull_down(125).unwrap();
        assert_ne!(rise, fall);
        assert!(!f.finish_animation(rise));
        assert_eq!(f.state(), FigureState::MovingDown);
        assert!(f.finish_animation(fall));
        assert_eq!(f.state(), FigureState::Down);
    }

    #[test]
    fn test_replaced_animation_starts_from_current_height() {
        let mut f = figure();
        f.pull_up(0).unwrap();
        let mid = f.height_at(125);
        assert!((mid - RAISED_HEIGHT / 2.0).abs() < 1e-4);
        f.pull_down(125).unwrap();
        assert!((f.height_at(125) - mid).abs() < 1e-4);
        assert_eq!(f.height_at(125 + ANIMATION_MS), LOWERED_HEIGHT);
    }

    #[test]
    fn test_height_interpolates_linearly() {
        let mut f = figure();
        f.pull_up(1_000).unwrap();
        assert_eq!(f.height_at(1_000), 0.0);
        assert!((f.raised_fraction(1_000 + ANIMATION_MS / 5) - 0.2).abs() < 1e-4);
        assert_eq!(f.raised_fraction(5_000), 1.0);
    }

    #[test]
    fn test_rest_states() {
        assert!(FigureState::Down.is_rest());
        assert!(FigureState::Up.is_rest());
        assert!(!FigureState::MovingUp.is_rest());
        assert!(!FigureState::MovingDown.is_rest());
    }

    #[test]
    fn test_add_offset() {
        let v = Vec3::new(0.3, 0.0, 0.6).add_offset(0.3, 0.6, 0.0);
        assert!((v.x - 0.6).abs() < 1e-6);
        assert!((v.y - 0.6).abs() < 1e-6);
        assert!((v.z - 0.6).abs() < 1e-6);
    }
}
