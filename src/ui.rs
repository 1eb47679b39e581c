//! Layout, hit testing and drawing: scene (ceiling, wall, table), grid, sidebar, overlays.

use crate::app::Screen;
use crate::figure::{Figure, FigureState, Vec3};
use crate::game::{Game, PlaneType, ScorePopup};
use crate::grid::SPACING;
use crate::theme::Theme;
use rand::Rng;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// One grid cell in terminal cells: sprite rows above a one-row hole.
pub const CELL_W: u16 = 10;
pub const CELL_H: u16 = 5;
const SIDEBAR_WIDTH: u16 = 26;
const CEILING_HEIGHT: u16 = 2;
/// Popups climb one row per this many ms.
const POPUP_RISE_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLayout {
    pub ceiling: Rect,
    pub wall: Rect,
    pub table: Rect,
    pub sidebar: Rect,
}

/// Scene on the left (ceiling strip, wall, table top), sidebar on the right.
pub fn scene_layout(area: Rect) -> SceneLayout {
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CEILING_HEIGHT),
            Constraint::Fill(1),
            Constraint::Fill(2),
        ])
        .split(horiz[0]);
    SceneLayout {
        ceiling: vert[0],
        wall: vert[1],
        table: vert[2],
        sidebar: horiz[1],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarLayout {
    pub scoreboard: Rect,
    pub start_button: Rect,
    pub help: Rect,
}

pub fn sidebar_layout(sidebar: Rect) -> SidebarLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Scoreboard (border + banner + stats + button)
            Constraint::Length(1),  // gap
            Constraint::Fill(1),    // Help
        ])
        .split(sidebar);
    let scoreboard = chunks[0];
    let inner = Block::default().borders(Borders::ALL).inner(scoreboard);
    let start_button = Rect {
        x: inner.x + 1,
        y: inner.y + 7,
        width: 11.min(inner.width.saturating_sub(1)),
        height: 1,
    }
    .intersection(inner);
    SidebarLayout {
        scoreboard,
        start_button,
        help: chunks[2],
    }
}

/// Table-space point → terminal cell (may lie outside the table).
pub fn table_to_screen(table: Rect, p: Vec3) -> (i32, i32) {
    let x = (p.x / SPACING * f32::from(CELL_W)).round() as i32;
    let y = (p.z / SPACING * f32::from(CELL_H)).round() as i32;
    (i32::from(table.x) + x, i32::from(table.y) + y)
}

/// Terminal cell → table-space point.
pub fn screen_to_table(table: Rect, col: u16, row: u16) -> Vec3 {
    let dx = i32::from(col) - i32::from(table.x);
    let dy = i32::from(row) - i32::from(table.y);
    Vec3::new(
        dx as f32 / f32::from(CELL_W) * SPACING,
        0.0,
        dy as f32 / f32::from(CELL_H) * SPACING,
    )
}

/// Move an anchor so a `rows` × `cols` grid placed there stays on the table.
pub fn clamp_anchor(table: Rect, rows: usize, cols: usize, p: Vec3) -> Vec3 {
    let grid_w = i32::from(CELL_W) * cols as i32;
    let grid_h = i32::from(CELL_H) * rows as i32;
    let max_x = (i32::from(table.width) - grid_w).max(0);
    let max_y = (i32::from(table.height) - grid_h).max(0);
    let (sx, sy) = table_to_screen(table, p);
    let x = (sx - i32::from(table.x)).clamp(0, max_x);
    let y = (sy - i32::from(table.y)).clamp(0, max_y);
    Vec3::new(
        x as f32 / f32::from(CELL_W) * SPACING,
        0.0,
        y as f32 / f32::from(CELL_H) * SPACING,
    )
}

/// Anchor that centres the grid on the table.
pub fn centered_anchor(table: Rect, rows: usize, cols: usize) -> Vec3 {
    let x = table.x + table.width.saturating_sub(CELL_W * cols as u16) / 2;
    let y = table.y + table.height.saturating_sub(CELL_H * rows as u16) / 2;
    clamp_anchor(table, rows, cols, screen_to_table(table, x, y))
}

/// Screen rect of one grid cell, clipped to the table.
pub fn cell_rect<R: Rng>(table: Rect, game: &Game<R>, row: usize, col: usize) -> Option<Rect> {
    let (x, y) = table_to_screen(table, game.figure_position(row, col)?);
    if x < 0 || y < 0 {
        return None;
    }
    let rect = Rect {
        x: u16::try_from(x).ok()?,
        y: u16::try_from(y).ok()?,
        width: CELL_W,
        height: CELL_H,
    }
    .intersection(table);
    (!rect.is_empty()).then_some(rect)
}

/// What sits under a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Figure { row: usize, col: usize },
    Surface { plane: PlaneType, point: Vec3 },
    StartButton,
    Nothing,
}

pub fn hit_test<R: Rng>(area: Rect, game: &Game<R>, col: u16, row: u16) -> Target {
    let layout = scene_layout(area);
    let pos = Position::new(col, row);
    if game.is_initialized() && sidebar_layout(layout.sidebar).start_button.contains(pos) {
        return Target::StartButton;
    }
    let point = screen_to_table(layout.table, col, row);
    if layout.table.contains(pos) {
        if let Some(grid) = game.grid() {
            for ((r, c), _) in grid.cells() {
                if cell_rect(layout.table, game, r, c).is_some_and(|rect| rect.contains(pos)) {
                    return Target::Figure { row: r, col: c };
                }
            }
        }
        return Target::Surface {
            plane: PlaneType::HorizontalUpwardFacing,
            point,
        };
    }
    if layout.wall.contains(pos) {
        return Target::Surface {
            plane: PlaneType::Vertical,
            point,
        };
    }
    if layout.ceiling.contains(pos) {
        return Target::Surface {
            plane: PlaneType::HorizontalDownwardFacing,
            point,
        };
    }
    Target::Nothing
}

/// Everything a frame needs besides the frame itself.
pub struct View<'a, R: Rng> {
    pub game: &'a Game<R>,
    pub theme: &'a Theme,
    pub screen: Screen,
    pub cursor: (usize, usize),
    pub best: Option<i64>,
    pub new_record: bool,
    pub paused: bool,
    pub now_ms: u64,
}

pub fn draw<R: Rng>(frame: &mut Frame, view: &View<'_, R>) {
    let area = frame.area();
    let layout = scene_layout(area);
    draw_scene(frame, view, &layout);
    draw_grid(frame, view, layout.table);
    draw_popups(frame, view, &layout);
    draw_sidebar(frame, view, layout.sidebar);
    match view.screen {
        Screen::Scanning => draw_hint(
            frame,
            view.theme,
            layout.wall,
            if view.game.assets_ready() {
                " Click the table (or Enter) to place the grid "
            } else {
                " Loading assets... "
            },
        ),
        Screen::Ready => draw_hint(
            frame,
            view.theme,
            layout.wall,
            " Press S or click [ Start ] to play ",
        ),
        Screen::Playing if view.paused => draw_pause_overlay(frame, view.theme, area),
        Screen::Playing => {}
        Screen::GameOver => draw_game_over(frame, view, area),
    }
    draw_notifications(frame, view, layout.table);
}

fn fill(frame: &mut Frame, rect: Rect, color: Color) {
    Block::default()
        .style(Style::default().bg(color))
        .render(rect, frame.buffer_mut());
}

/// Write `text` at a possibly off-screen position, clipped to `clip`.
fn put_str(frame: &mut Frame, clip: Rect, x: i32, y: i32, text: &str, style: Style) {
    if y < i32::from(clip.y) || y >= i32::from(clip.bottom()) {
        return;
    }
    let buf = frame.buffer_mut();
    for (i, ch) in text.chars().enumerate() {
        let cx = x + i as i32;
        if cx < i32::from(clip.x) || cx >= i32::from(clip.right()) {
            continue;
        }
        buf[(cx as u16, y as u16)].set_char(ch).set_style(style);
    }
}

fn draw_scene<R: Rng>(frame: &mut Frame, view: &View<'_, R>, layout: &SceneLayout) {
    let t = view.theme;
    fill(frame, layout.ceiling, t.ceiling);
    fill(frame, layout.wall, t.wall);
    fill(frame, layout.table, t.table);
    let label = Style::default().fg(t.inactive_fg);
    put_str(
        frame,
        layout.ceiling,
        i32::from(layout.ceiling.x) + 1,
        i32::from(layout.ceiling.y),
        "ceiling",
        label,
    );
    put_str(
        frame,
        layout.wall,
        i32::from(layout.wall.x) + 1,
        i32::from(layout.wall.y),
        "wall",
        label,
    );
    put_str(
        frame,
        layout.table,
        i32::from(layout.table.x) + 1,
        i32::from(layout.table.bottom()) - 1,
        "table",
        label,
    );
    // Table edge.
    let edge = "▁".repeat(usize::from(layout.wall.width));
    put_str(
        frame,
        layout.wall,
        i32::from(layout.wall.x),
        i32::from(layout.wall.bottom()) - 1,
        &edge,
        Style::default().fg(t.table),
    );
}

fn draw_grid<R: Rng>(frame: &mut Frame, view: &View<'_, R>, table: Rect) {
    let Some(grid) = view.game.grid() else {
        return;
    };
    for ((row, col), figure) in grid.cells() {
        let Some(pos) = view.game.figure_position(row, col) else {
            continue;
        };
        let origin = table_to_screen(table, pos);
        let selected = view.screen != Screen::Scanning && view.cursor == (row, col);
        draw_figure(frame, view, table, origin, figure, selected);
    }
}

fn draw_figure<R: Rng>(
    frame: &mut Frame,
    view: &View<'_, R>,
    table: Rect,
    (x, y): (i32, i32),
    figure: &Figure,
    selected: bool,
) {
    let t = view.theme;
    let hole_y = y + i32::from(CELL_H) - 1;
    let hole_style = if selected {
        Style::default().fg(t.title).bg(t.hole)
    } else {
        Style::default().fg(t.div_line).bg(t.hole)
    };
    let hole = if selected { "[▔▔▔▔▔▔]" } else { "(______)" };
    put_str(frame, table, x + 1, hole_y, hole, hole_style);

    let Some(sprite) = view.game.figure_sprite() else {
        return;
    };
    let fraction = figure.raised_fraction(view.now_ms);
    let visible = (fraction * sprite.height() as f32).ceil() as usize;
    let visible = visible.min(sprite.height());
    let mut style = Style::default().fg(t.figure);
    if figure.state() == FigureState::Up {
        style = style.add_modifier(Modifier::BOLD);
    }
    let sx = x + (i32::from(CELL_W) - sprite.width() as i32) / 2;
    for (i, line) in sprite.lines.iter().take(visible).enumerate() {
        let ly = hole_y - visible as i32 + i as i32;
        put_str(frame, table, sx, ly, line, style);
    }
}

fn popup_text(p: &ScorePopup) -> String {
    if p.amount >= 0 {
        format!("+{}", p.amount)
    } else {
        p.amount.to_string()
    }
}

fn draw_popups<R: Rng>(frame: &mut Frame, view: &View<'_, R>, layout: &SceneLayout) {
    let scene = layout.ceiling.union(layout.wall).union(layout.table);
    for p in &view.game.popups {
        let (x, y) = table_to_screen(layout.table, p.at);
        let rise = (p.age_ms(view.now_ms) / POPUP_RISE_MS) as i32;
        let color = if p.amount >= 0 {
            view.theme.figure
        } else {
            view.theme.alert
        };
        let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        put_str(frame, scene, x + 2, y - rise, &popup_text(p), style);
    }
}

fn draw_sidebar<R: Rng>(frame: &mut Frame, view: &View<'_, R>, area: Rect) {
    let t = view.theme;
    let layout = sidebar_layout(area);
    let title_style = Style::default().fg(t.title);
    let fg_style = Style::default().fg(t.main_fg);
    let border_style = Style::default().fg(t.div_line).bg(t.bg);

    // --- Scoreboard ---
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(t.bg));
    let inner = block.inner(layout.scoreboard);
    block.render(layout.scoreboard, frame.buffer_mut());

    let game = view.game;
    let mut lines: Vec<Line> = Vec::new();
    match game.scoreboard_sprite() {
        Some(banner) => {
            for l in &banner.lines {
                lines.push(Line::from(Span::styled(l.clone(), title_style)));
            }
            for _ in banner.height()..2 {
                lines.push(Line::from(""));
            }
        }
        None => {
            lines.push(Line::from(Span::styled("...", title_style)));
            lines.push(Line::from(""));
        }
    }
    if game.is_initialized() {
        let session = game.session();
        let hearts: String = "♥".repeat(session.lives as usize);
        lines.push(Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(session.score.to_string(), fg_style),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Lives: ", title_style),
            Span::styled(hearts, Style::default().fg(t.alert)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Best:  ", title_style),
            Span::styled(
                view.best.map_or_else(|| "-".to_string(), |b| b.to_string()),
                fg_style,
            ),
        ]));
        if game.scheduler().is_active() {
            let up = game
                .grid()
                .map_or(0, |g| g.count_in(FigureState::Up));
            lines.push(Line::from(vec![
                Span::styled("Up:    ", title_style),
                Span::styled(
                    format!("{up} ({} chains)", game.scheduler().chains()),
                    Style::default().fg(t.inactive_fg),
                ),
            ]));
        }
        Paragraph::new(lines).render(inner, frame.buffer_mut());

        let button_style = if view.screen == Screen::Playing {
            Style::default().fg(t.inactive_fg)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(t.title)
                .add_modifier(Modifier::BOLD)
        };
        let label = if view.screen == Screen::Playing {
            " Playing.. "
        } else {
            " [ Start ] "
        };
        Paragraph::new(Line::from(Span::styled(label, button_style)))
            .render(layout.start_button, frame.buffer_mut());
    } else {
        lines.push(Line::from(Span::styled("Scanning for", fg_style)));
        lines.push(Line::from(Span::styled("a surface...", fg_style)));
        Paragraph::new(lines).render(inner, frame.buffer_mut());
    }

    // --- Help ---
    let help_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(t.bg))
        .title(Span::styled(" Keys ", title_style));
    let help_inner = help_block.inner(layout.help);
    help_block.render(layout.help, frame.buffer_mut());
    let help = [
        ("←↑↓→/hjkl", "cursor"),
        ("Space", "whack"),
        ("T", "tap table"),
        ("S", "start"),
        ("P", "pause"),
        ("Q", "quit"),
    ];
    let help_lines: Vec<Line> = help
        .iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("{k:<10}"), title_style),
                Span::styled(*v, Style::default().fg(t.inactive_fg)),
            ])
        })
        .collect();
    Paragraph::new(help_lines).render(help_inner, frame.buffer_mut());
}

fn draw_hint(frame: &mut Frame, theme: &Theme, wall: Rect, text: &str) {
    let width = (text.chars().count() as u16).min(wall.width);
    let rect = Rect {
        x: wall.x + wall.width.saturating_sub(width) / 2,
        y: wall.y + wall.height / 2,
        width,
        height: 1.min(wall.height),
    };
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::Black).bg(theme.title),
    )))
    .render(rect, frame.buffer_mut());
}

fn draw_notifications<R: Rng>(frame: &mut Frame, view: &View<'_, R>, table: Rect) {
    for (i, n) in view.game.notifications.iter().rev().take(3).enumerate() {
        let text = format!(" {} ", n.message);
        let width = (text.chars().count() as u16).min(table.width);
        let y = table.bottom().saturating_sub(3 + i as u16);
        if y < table.y {
            break;
        }
        let rect = Rect {
            x: table.x + table.width.saturating_sub(width) / 2,
            y,
            width,
            height: 1,
        };
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )))
        .render(rect, frame.buffer_mut());
    }
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Clear.render(popup, frame.buffer_mut());
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .style(Style::default().bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over<R: Rng>(frame: &mut Frame, view: &View<'_, R>, area: Rect) {
    let t = view.theme;
    let popup = centered(area, 32, 10);
    let session = view.game.session();
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(t.alert),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", session.score),
            Style::default().fg(t.main_fg),
        )),
        Line::from(Span::styled(
            format!(
                " Best: {} ",
                view.best.map_or_else(|| "-".to_string(), |b| b.to_string())
            ),
            Style::default().fg(t.main_fg),
        )),
    ];
    if view.new_record {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " S — Restart    Q — Quit ",
        Style::default().fg(t.main_fg),
    )));
    Clear.render(popup, frame.buffer_mut());
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.div_line).bg(t.bg))
            .style(Style::default().bg(t.bg))
            .title(Span::styled(" Whackatui ", Style::default().fg(t.title))),
    );
    p.render(popup, frame.buffer_mut());
}

/// Red flash over the scene for one alert blink.
pub fn alert_effect(theme: &Theme) -> Effect {
    fx::fade_from(
        theme.alert,
        theme.alert,
        (crate::game::ALERT_BLINK_MS as u32, Interpolation::QuadOut),
    )
}

/// Advance and draw the alert flash over the scene part of `area`.
pub fn render_alert(frame: &mut Frame, effect: &mut Effect, delta_ms: u32) {
    let layout = scene_layout(frame.area());
    let scene = layout.ceiling.union(layout.wall).union(layout.table);
    frame.render_effect(effect, scene, TfxDuration::from_millis(delta_ms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::assets::{AssetKind, AssetRef, Loaded, load_renderable};
    use crate::game::Surface;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 106,
        height: 40,
    };

    fn placed_at(anchor: Vec3) -> Game<ChaCha8Rng> {
        let mut g = Game::new(GameConfig::default(), ChaCha8Rng::seed_from_u64(3));
        for kind in [AssetKind::Figure, AssetKind::Scoreboard] {
            g.on_asset_loaded(Loaded {
                kind,
                result: load_renderable(kind, &AssetRef::Builtin),
            });
        }
        g.on_surface_tap(Surface::new(PlaneType::HorizontalUpwardFacing), anchor);
        g
    }

    #[test]
    fn test_scene_layout_splits_area() {
        let l = scene_layout(AREA);
        assert_eq!(l.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(l.ceiling.height, CEILING_HEIGHT);
        assert_eq!(l.ceiling.y, 0);
        assert_eq!(l.wall.y, CEILING_HEIGHT);
        assert_eq!(l.table.bottom(), AREA.height);
        assert!(l.table.height > l.wall.height);
    }

    #[test]
    fn test_screen_table_round_trip() {
        let table = scene_layout(AREA).table;
        let p = screen_to_table(table, table.x + 20, table.y + 10);
        assert_eq!(
            table_to_screen(table, p),
            (i32::from(table.x) + 20, i32::from(table.y) + 10)
        );
    }

    #[test]
    fn test_clamp_anchor_keeps_grid_on_table() {
        let table = scene_layout(AREA).table;
        let far = screen_to_table(table, table.right() - 1, table.bottom() - 1);
        let a = clamp_anchor(table, 3, 3, far);
        let (x, y) = table_to_screen(table, a);
        assert_eq!(x + i32::from(CELL_W) * 3, i32::from(table.right()));
        assert_eq!(y + i32::from(CELL_H) * 3, i32::from(table.bottom()));
        let neg = clamp_anchor(table, 3, 3, Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(table_to_screen(table, neg), (i32::from(table.x), i32::from(table.y)));
    }

    #[test]
    fn test_hit_test_regions() {
        let g = placed_at(Vec3::default());
        let l = scene_layout(AREA);
        assert_eq!(
            hit_test(AREA, &g, l.table.x + 1, l.table.y + 1),
            Target::Figure { row: 0, col: 0 }
        );
        assert_eq!(
            hit_test(AREA, &g, l.table.x + CELL_W + 1, l.table.y + CELL_H + 1),
            Target::Figure { row: 1, col: 1 }
        );
        assert!(matches!(
            hit_test(AREA, &g, l.table.right() - 1, l.table.bottom() - 1),
            Target::Surface {
                plane: PlaneType::HorizontalUpwardFacing,
                ..
            }
        ));
        assert!(matches!(
            hit_test(AREA, &g, l.wall.x + 2, l.wall.y + 1),
            Target::Surface {
                plane: PlaneType::Vertical,
                ..
            }
        ));
        assert!(matches!(
            hit_test(AREA, &g, 0, 0),
            Target::Surface {
                plane: PlaneType::HorizontalDownwardFacing,
                ..
            }
        ));
        let button = sidebar_layout(l.sidebar).start_button;
        assert_eq!(hit_test(AREA, &g, button.x, button.y), Target::StartButton);
    }

    #[test]
    fn test_start_button_inactive_before_placement() {
        let g = Game::new(GameConfig::default(), ChaCha8Rng::seed_from_u64(3));
        let button = sidebar_layout(scene_layout(AREA).sidebar).start_button;
        assert_eq!(hit_test(AREA, &g, button.x, button.y), Target::Nothing);
    }

    #[test]
    fn test_centered_anchor_centres_grid() {
        let table = scene_layout(AREA).table;
        let a = centered_anchor(table, 3, 3);
        let (x, _) = table_to_screen(table, a);
        let left = x - i32::from(table.x);
        let right = i32::from(table.right()) - (x + i32::from(CELL_W) * 3);
        assert!((left - right).abs() <= 1);
    }

    #[test]
    fn test_popup_text_signs() {
        let p = |amount| ScorePopup {
            at: Vec3::default(),
            amount,
            born_ms: 0,
        };
        assert_eq!(popup_text(&p(100)), "+100");
        assert_eq!(popup_text(&p(-50)), "-50");
    }
}
