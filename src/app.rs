//! App: terminal init, main loop, clock, and routing of keys and clicks into the game.

use crate::assets::{self, AssetKind, AssetRef, Loaded};
use crate::game::{Game, PlaneType, Surface, TapOutcome};
use crate::highscores;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, Target};
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tachyonfx::Effect;

const TABLE: Surface = Surface::new(PlaneType::HorizontalUpwardFacing);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No grid yet: waiting for a tap on the table.
    Scanning,
    /// Grid placed, no session running.
    Ready,
    Playing,
    GameOver,
}

impl Screen {
    pub fn of<R: rand::Rng>(game: &Game<R>) -> Self {
        let session = game.session();
        if !game.is_initialized() {
            Self::Scanning
        } else if session.is_running() {
            Self::Playing
        } else if session.rounds > 0 && session.is_over() {
            Self::GameOver
        } else {
            Self::Ready
        }
    }
}

pub struct App {
    args: Args,
    theme: Theme,
    game: Game<StdRng>,
    paused: bool,
    /// Game clock; stands still while paused.
    clock_ms: u64,
    last_frame: Instant,
    cursor: (usize, usize),
    loader: Option<Receiver<Loaded>>,
    best_path: PathBuf,
    best: Option<i64>,
    new_record: bool,
    seen_blinks: u32,
    alert_effect: Option<Effect>,
    /// Terminal area of the last frame, used for hit testing.
    area: Rect,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Self {
        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let best_path = highscores::config_path();
        let best = highscores::load_best(&best_path);
        Self {
            args,
            theme,
            game: Game::new(config, rng),
            paused: false,
            clock_ms: 0,
            last_frame: Instant::now(),
            cursor: (0, 0),
            loader: None,
            best_path,
            best,
            new_record: false,
            seen_blinks: 0,
            alert_effect: None,
            area: Rect::default(),
        }
    }

    fn start_loading_assets(&mut self) {
        let requests = vec![
            (
                AssetKind::Figure,
                AssetRef::from_option(self.args.figure_sprite.as_deref()),
            ),
            (
                AssetKind::Scoreboard,
                AssetRef::from_option(self.args.scoreboard_sprite.as_deref()),
            ),
        ];
        self.loader = Some(assets::spawn_loader(requests));
    }

    fn poll_assets(&mut self) {
        let Some(rx) = &self.loader else {
            return;
        };
        let mut finished = false;
        let mut loaded = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(l) => loaded.push(l),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
            }
        }
        for l in loaded {
            self.game.on_asset_loaded(l);
        }
        if finished {
            self.loader = None;
        }
    }

    fn tick_clock(&mut self) -> u32 {
        let elapsed = self.last_frame.elapsed();
        self.last_frame = Instant::now();
        let delta_ms = elapsed.as_millis().min(u128::from(u32::MAX)) as u32;
        if !self.paused {
            self.clock_ms += u64::from(delta_ms);
            self.game.advance(self.clock_ms);
        }
        delta_ms
    }

    fn screen(&self) -> Screen {
        Screen::of(&self.game)
    }

    /// Bookkeeping after every tap: best score on game over.
    fn after_tap(&mut self, outcome: TapOutcome) {
        if outcome == TapOutcome::GameOver {
            let score = self.game.session().score;
            let (best, is_new) = highscores::merge_best(self.best, score);
            self.best = Some(best);
            self.new_record = is_new;
            if is_new {
                if let Err(e) = highscores::save_best(&self.best_path, best) {
                    tracing::warn!(error = %e, "could not save best score");
                }
            }
        }
        if outcome == TapOutcome::Placed {
            self.cursor = (0, 0);
        }
    }

    fn tap_surface(&mut self, surface: Surface, point: crate::figure::Vec3) {
        let point = if self.game.is_initialized() {
            point
        } else {
            let config = self.game.config();
            ui::clamp_anchor(ui::scene_layout(self.area).table, config.rows, config.cols, point)
        };
        let outcome = self.game.on_surface_tap(surface, point);
        self.after_tap(outcome);
    }

    fn start(&mut self) {
        if self.game.on_start_requested() {
            self.new_record = false;
            self.paused = false;
        }
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let Some(grid) = self.game.grid() else {
            return;
        };
        let (rows, cols) = (grid.rows() as isize, grid.cols() as isize);
        let row = (self.cursor.0 as isize + d_row).clamp(0, rows - 1);
        let col = (self.cursor.1 as isize + d_col).clamp(0, cols - 1);
        self.cursor = (row as usize, col as usize);
    }

    /// Returns true when the player asked to quit.
    fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Pause => {
                if self.screen() == Screen::Playing {
                    self.paused = !self.paused;
                }
            }
            _ if self.paused => {}
            Action::Start => self.start(),
            Action::CursorLeft => self.move_cursor(0, -1),
            Action::CursorRight => self.move_cursor(0, 1),
            Action::CursorUp => self.move_cursor(-1, 0),
            Action::CursorDown => self.move_cursor(1, 0),
            Action::Whack => {
                if self.game.is_initialized() {
                    let (row, col) = self.cursor;
                    let outcome = self.game.on_figure_tap(row, col);
                    self.after_tap(outcome);
                } else {
                    let config = self.game.config();
                    let anchor =
                        ui::centered_anchor(ui::scene_layout(self.area).table, config.rows, config.cols);
                    self.tap_surface(TABLE, anchor);
                }
            }
            Action::TapTable => {
                if let Some(anchor) = self.game.grid().map(|g| g.anchor) {
                    // Just left of the grid.
                    let point = anchor.add_offset(-crate::grid::SPACING / 2.0, 0.0, 0.0);
                    self.tap_surface(TABLE, point);
                }
            }
            Action::None => {}
        }
        false
    }

    fn click(&mut self, col: u16, row: u16) {
        if self.paused {
            return;
        }
        match ui::hit_test(self.area, &self.game, col, row) {
            Target::Figure { row, col } => {
                self.cursor = (row, col);
                let outcome = self.game.on_figure_tap(row, col);
                self.after_tap(outcome);
            }
            Target::Surface { plane, point } => self.tap_surface(Surface::new(plane), point),
            Target::StartButton => self.start(),
            Target::Nothing => {}
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        self.start_loading_assets();
        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_rate = if self.args.frame_rate > 0.0 {
            self.args.frame_rate
        } else {
            30.0
        };
        let frame_duration = Duration::from_secs_f64(1.0 / frame_rate);
        self.last_frame = Instant::now();
        loop {
            let frame_start = Instant::now();
            self.poll_assets();
            let delta_ms = self.tick_clock();

            if self.game.alert.blinks != self.seen_blinks {
                self.seen_blinks = self.game.alert.blinks;
                self.alert_effect = Some(ui::alert_effect(&self.theme));
            }

            let view = ui::View {
                game: &self.game,
                theme: &self.theme,
                screen: Screen::of(&self.game),
                cursor: self.cursor,
                best: self.best,
                new_record: self.new_record,
                paused: self.paused,
                now_ms: self.clock_ms,
            };
            let alert_effect = &mut self.alert_effect;
            let mut area = self.area;
            terminal.draw(|f| {
                area = f.area();
                ui::draw(f, &view);
                if let Some(effect) = alert_effect.as_mut() {
                    ui::render_alert(f, effect, delta_ms);
                }
            })?;
            self.area = area;
            if self.alert_effect.as_ref().is_some_and(|e| e.done()) {
                self.alert_effect = None;
            }

            let timeout = frame_duration.saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if self.apply_action(key_to_action(key)) {
                                return Ok(());
                            }
                        }
                        Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                            self.click(m.column, m.row);
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
