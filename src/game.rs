//! Game: owns the grid, session, scheduler and timeline, and resolves taps.

use crate::GameConfig;
use crate::assets::{AssetKind, Loaded, Sprite};
use crate::figure::{FigureState, Vec3};
use crate::grid::Grid;
use crate::scheduler::{Cadence, Scheduler, Task, post_animation_done};
use crate::session::{HIT_POINTS, MISS_PENALTY, MissOutcome, Session};
use crate::timeline::{Fired, TaskQueue};
use rand::Rng;

/// How long a notification stays on screen.
pub const NOTIFICATION_MS: u64 = 2_000;
/// How long a score popup floats.
pub const POPUP_MS: u64 = 1_500;
/// Duration of the red alert blink on a miss.
pub const ALERT_BLINK_MS: u64 = 400;

const WRONG_SURFACE_MESSAGE: &str = "Find a HORIZONTAL and UPWARD FACING surface!";

/// Classification of a detected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneType {
    HorizontalUpwardFacing,
    HorizontalDownwardFacing,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub plane: PlaneType,
}

impl Surface {
    pub const fn new(plane: PlaneType) -> Self {
        Self { plane }
    }

    /// Only an upward-facing horizontal plane can carry the grid.
    pub fn can_hold_grid(&self) -> bool {
        self.plane == PlaneType::HorizontalUpwardFacing
    }
}

/// What a tap resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored,
    WrongSurface,
    Placed,
    Hit { row: usize, col: usize },
    Miss { lives_left: u32 },
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub posted_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorePopup {
    /// Where it appeared, in table space.
    pub at: Vec3,
    pub amount: i64,
    pub born_ms: u64,
}

impl ScorePopup {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.born_ms)
    }
}

/// The red failure light.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alert {
    pub blinks: u32,
    pub last_blink_ms: Option<u64>,
}

impl Alert {
    pub fn blink(&mut self, now_ms: u64) {
        self.blinks += 1;
        self.last_blink_ms = Some(now_ms);
    }

    pub fn is_lit(&self, now_ms: u64) -> bool {
        self.last_blink_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < ALERT_BLINK_MS)
    }
}

#[derive(Debug)]
pub struct Game<R: Rng> {
    config: GameConfig,
    cadence: Cadence,
    rng: R,
    queue: TaskQueue<Task>,
    scheduler: Scheduler,
    session: Session,
    grid: Option<Grid>,
    figure_sprite: Option<Sprite>,
    scoreboard_sprite: Option<Sprite>,
    pub alert: Alert,
    pub notifications: Vec<Notification>,
    pub popups: Vec<ScorePopup>,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self {
            cadence: Cadence::from_config(&config),
            session: Session::new(config.start_lives),
            config,
            rng,
            queue: TaskQueue::new(),
            scheduler: Scheduler::new(),
            grid: None,
            figure_sprite: None,
            scoreboard_sprite: None,
            alert: Alert::default(),
            notifications: Vec::new(),
            popups: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    #[cfg(test)]
    pub fn queue(&self) -> &TaskQueue<Task> {
        &self.queue
    }

    pub fn now_ms(&self) -> u64 {
        self.queue.now_ms()
    }

    pub fn is_initialized(&self) -> bool {
        self.grid.is_some()
    }

    pub fn figure_sprite(&self) -> Option<&Sprite> {
        self.figure_sprite.as_ref()
    }

    pub fn scoreboard_sprite(&self) -> Option<&Sprite> {
        self.scoreboard_sprite.as_ref()
    }

    pub fn assets_ready(&self) -> bool {
        self.figure_sprite.is_some() && self.scoreboard_sprite.is_some()
    }

    /// Store a finished asset load; a failure becomes a notification.
    pub fn on_asset_loaded(&mut self, loaded: Loaded) {
        match loaded.result {
            Ok(sprite) => {
                tracing::debug!(kind = %loaded.kind, "asset ready");
                match loaded.kind {
                    AssetKind::Figure => self.figure_sprite = Some(sprite),
                    AssetKind::Scoreboard => self.scoreboard_sprite = Some(sprite),
                }
            }
            Err(e) => {
                tracing::warn!(kind = %loaded.kind, error = %e, "asset failed to load");
                self.notify(e.to_string());
            }
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push(Notification {
            message: message.into(),
            posted_ms: self.now_ms(),
        });
    }

    /// A tap on a detected surface at `point` (table space).
    pub fn on_surface_tap(&mut self, surface: Surface, point: Vec3) -> TapOutcome {
        if self.is_initialized() {
            // Tapped beside every figure.
            return self.register_miss(point);
        }
        if !surface.can_hold_grid() {
            self.notify(WRONG_SURFACE_MESSAGE);
            return TapOutcome::WrongSurface;
        }
        if !self.assets_ready() {
            return TapOutcome::Ignored;
        }
        if self.initialize_grid(point) {
            TapOutcome::Placed
        } else {
            TapOutcome::Ignored
        }
    }

    /// Populate the grid at `anchor`. Does nothing once a grid exists.
    pub fn initialize_grid(&mut self, anchor: Vec3) -> bool {
        if self.grid.is_some() {
            return false;
        }
        self.grid = Some(Grid::new(anchor, self.config.rows, self.config.cols));
        tracing::info!(
            rows = self.config.rows,
            cols = self.config.cols,
            x = anchor.x,
            z = anchor.z,
            "grid placed"
        );
        true
    }

    pub fn on_figure_tap(&mut self, row: usize, col: usize) -> TapOutcome {
        let Some(figure) = self.grid.as_ref().and_then(|g| g.get(row, col)) else {
            return TapOutcome::Ignored;
        };
        let at = self.figure_position(row, col);
        if figure.state() == FigureState::Up {
            self.register_hit(row, col)
        } else {
            self.register_miss(at.unwrap_or_default())
        }
    }

    /// Reset counters and begin popping figures. Ignored until the grid is placed.
    pub fn on_start_requested(&mut self) -> bool {
        if self.grid.is_none() {
            tracing::debug!("start requested before grid placement");
            return false;
        }
        self.session.start(self.config.start_lives);
        // Replacing the chains drops their pending pull-downs, so lower by hand.
        self.lower_standing();
        self.scheduler.start(&mut self.queue, self.config.moves_per_time);
        tracing::info!(
            round = self.session.rounds,
            lives = self.session.lives,
            "session started"
        );
        true
    }

    fn register_hit(&mut self, row: usize, col: usize) -> TapOutcome {
        if !self.session.register_hit() {
            return TapOutcome::Ignored;
        }
        let now = self.now_ms();
        if let Some(token) = self
            .grid
            .as_mut()
            .and_then(|g| g.get_mut(row, col))
            .and_then(|f| f.pull_down(now))
        {
            post_animation_done(&mut self.queue, row, col, token);
        }
        if let Some(at) = self.figure_position(row, col) {
            self.spawn_popup(at, HIT_POINTS);
        }
        tracing::info!(row, col, score = self.session.score, "hit");
        TapOutcome::Hit { row, col }
    }

    fn register_miss(&mut self, at: Vec3) -> TapOutcome {
        let outcome = self.session.register_miss();
        if outcome == MissOutcome::Idle {
            return TapOutcome::Ignored;
        }
        let now = self.now_ms();
        self.alert.blink(now);
        self.spawn_popup(at, -MISS_PENALTY);
        match outcome {
            MissOutcome::LifeLost { lives_left } => {
                tracing::info!(lives_left, score = self.session.score, "miss");
                TapOutcome::Miss { lives_left }
            }
            _ => {
                self.game_over();
                TapOutcome::GameOver
            }
        }
    }

    fn game_over(&mut self) {
        self.scheduler.stop(&mut self.queue);
        self.lower_standing();
        tracing::info!(score = self.session.score, "game over");
    }

    /// Start lowering every figure that is up or rising.
    fn lower_standing(&mut self) {
        let now = self.now_ms();
        if let Some(grid) = self.grid.as_mut() {
            let standing: Vec<(usize, usize)> = grid
                .cells()
                .filter(|(_, f)| !f.state().is_sinking())
                .map(|(pos, _)| pos)
                .collect();
            for (row, col) in standing {
                if let Some(token) = grid.get_mut(row, col).and_then(|f| f.pull_down(now)) {
                    post_animation_done(&mut self.queue, row, col, token);
                }
            }
        }
    }

    /// Run every task due by `now_ms`, then expire transient overlays.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some(fired) = self.queue.pop_due(now_ms) {
            self.dispatch(fired);
        }
        self.queue.advance_to(now_ms);
        let now = self.now_ms();
        self.notifications
            .retain(|n| now.saturating_sub(n.posted_ms) < NOTIFICATION_MS);
        self.popups.retain(|p| p.age_ms(now) < POPUP_MS);
    }

    fn dispatch(&mut self, fired: Fired<Task>) {
        if !self.queue.is_live(&fired) {
            return;
        }
        let now = self.now_ms();
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        match fired.task {
            Task::PopUp { chain } => {
                if !self.session.is_running() {
                    return;
                }
                self.scheduler
                    .tick(chain, grid, &mut self.queue, &mut self.rng, &self.cadence);
            }
            Task::PullDown { row, col } => {
                if let Some(token) = grid.get_mut(row, col).and_then(|f| f.pull_down(now)) {
                    tracing::trace!(row, col, due_ms = fired.due_ms, "pull down");
                    post_animation_done(&mut self.queue, row, col, token);
                }
            }
            Task::AnimationDone { row, col, token } => {
                if let Some(f) = grid.get_mut(row, col) {
                    f.finish_animation(token);
                }
            }
        }
    }

    /// Figure's resting spot in table space.
    pub fn figure_position(&self, row: usize, col: usize) -> Option<Vec3> {
        let grid = self.grid.as_ref()?;
        let f = grid.get(row, col)?;
        Some(grid.anchor.add_offset(f.offset.x, f.offset.y, f.offset.z))
    }

    fn spawn_popup(&mut self, at: Vec3, amount: i64) {
        self.popups.push(ScorePopup {
            at,
            amount,
            born_ms: self.now_ms(),
        });
    }
}
