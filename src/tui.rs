use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

use crate::config::GameConfig;
use crate::engine::{Board, GameState, Outcome};
use crate::error::{GameError, Result};
use crate::geometry::Coord;
use crate::render::{self, Canvas};
use crate::tile::Overlay;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Open,
    Flag,
}

/// Applies a player action and, when it ends the game, the final reveal.
/// Actions after the game ended are ignored.
pub fn play(board: &mut Board, action: Action, coord: Coord) -> Result<()> {
    let outcome = match action {
        Action::Open => board.open(coord),
        Action::Flag => board.toggle_flag(coord).map(|_| Outcome::Alive),
    };
    match outcome {
        Ok(Outcome::Dead) => board.reveal_all(false),
        Ok(Outcome::Alive) if action == Action::Open && board.check_victory() => board.reveal_all(true),
        Ok(Outcome::Alive) | Err(GameError::AlreadyEnded) => Ok(()),
        Err(e) => Err(e),
    }
}

pub fn run_tui(config: GameConfig, seed: u64) -> anyhow::Result<()> {
    let mut board = Board::new(config, seed)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let _guard = TermGuard;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut cursor = start_cursor(&board);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);
    let autodemo = std::env::var("HEXAMINE_TUI_AUTODEMO").ok().is_some();
    let mut demo_step = 0usize;

    let mut last_inner_board = Rect::default();
    let res = loop {
        let canvas = Canvas::fit(&board);
        terminal.draw(|f| { last_inner_board = ui(f, &board, &canvas, cursor); })?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                        KeyCode::Char('h') | KeyCode::Left => cursor = step(&board, cursor, LEFT),
                        KeyCode::Char('l') | KeyCode::Right => cursor = step(&board, cursor, RIGHT),
                        KeyCode::Char('k') | KeyCode::Up => cursor = step(&board, cursor, (-1, 0)),
                        KeyCode::Char('j') | KeyCode::Down => cursor = step(&board, cursor, (1, 0)),
                        KeyCode::Char('f') => play(&mut board, Action::Flag, cursor)?,
                        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => play(&mut board, Action::Open, cursor)?,
                        KeyCode::Char('n') => {
                            board = Board::new(config, seed)?;
                            cursor = start_cursor(&board);
                        }
                        _ => {}
                    }
                }
                Event::Mouse(m) => {
                    if let MouseEventKind::Down(btn) = m.kind {
                        if let Some(coord) = pos_to_tile(m.column, m.row, last_inner_board, &canvas, &board) {
                            cursor = coord;
                            match btn {
                                MouseButton::Left | MouseButton::Middle => play(&mut board, Action::Open, coord)?,
                                MouseButton::Right => play(&mut board, Action::Flag, coord)?,
                            }
                        }
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            if autodemo {
                match demo_step {
                    0 => play(&mut board, Action::Open, cursor)?,
                    1 => {
                        cursor = step(&board, cursor, (1, 0));
                        play(&mut board, Action::Flag, cursor)?;
                    }
                    2 => { /* pause frame */ }
                    _ => break Ok(()),
                }
                demo_step += 1;
            }
        }
    };

    terminal.show_cursor()?;
    res
}

// Two columns over along j, one row back along i: the next tile drawn on the same line.
const LEFT: (i32, i32) = (1, -2);
const RIGHT: (i32, i32) = (-1, 2);

fn start_cursor(board: &Board) -> Coord {
    board.coords().nth(board.len() / 2).unwrap_or(Coord::new(0, 0))
}

fn step(board: &Board, cursor: Coord, (di, dj): (i32, i32)) -> Coord {
    let next = Coord::new(cursor.i + di, cursor.j + dj);
    if board.contains(next) { next } else { cursor }
}

fn ui(f: &mut ratatui::Frame, board: &Board, canvas: &Canvas, cursor: Coord) -> Rect {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    let status = match board.state() {
        GameState::Lost => "Boom! You hit a mine. q to quit, n to restart",
        GameState::Won => "You cleared the board! q to quit, n to restart",
        _ => "Mouse: left=open, right=flag | Arrows/HJKL move | Enter/Space open | f flag | n new | q quit",
    };
    let header = Paragraph::new(status)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("HexaMine"));
    f.render_widget(header, root[0]);

    let area = centered_area(root[1], canvas.cols(), canvas.rows());
    draw_board(f, board, canvas, area, cursor);

    let footer = Paragraph::new(format!(
        "Size: {}x{}  Mines: {}  Left: {}  Opened: {}/{}",
        board.width(),
        board.height(),
        board.mine_count(),
        board.estimated_mines_remaining(),
        board.opened_count(),
        board.config().safe_tiles(),
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, root[2]);
    inner_area(area)
}

/// Bordered area of `cols` x `rows` cells centered in `parent`.
fn centered_area(parent: Rect, cols: u16, rows: u16) -> Rect {
    let w = cols.saturating_add(2);
    let h = rows.saturating_add(2);
    let x = parent.x.saturating_add(parent.width.saturating_sub(w) / 2);
    let y = parent.y.saturating_add(parent.height.saturating_sub(h) / 2);
    Rect { x, y, width: w.min(parent.width), height: h.min(parent.height) }
}

fn draw_board(f: &mut ratatui::Frame, board: &Board, canvas: &Canvas, area: Rect, cursor: Coord) {
    let lines: Vec<Line> = canvas
        .grid(board)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    Some(coord) => tile_span(board, coord, coord == cursor),
                    None => Span::raw(" "),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let para = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Board"));
    f.render_widget(para, area);
}

fn tile_span(board: &Board, coord: Coord, selected: bool) -> Span<'static> {
    let mut ch = render::glyph(board, coord);
    let mut style = match board.tile(coord).map(|t| t.overlay()) {
        Ok(Overlay::Flagged) => Style::default().fg(Color::Yellow),
        Ok(Overlay::Questioned) => Style::default().fg(Color::LightYellow),
        Ok(Overlay::Missed) => Style::default().fg(Color::Red),
        Ok(Overlay::Detonated) => Style::default().fg(Color::White).bg(Color::Red),
        Ok(Overlay::Opened) => number_style(board.count_mined_neighbors(coord).unwrap_or(0)),
        _ => Style::default().fg(Color::DarkGray),
    };
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
        if ch == ' ' { ch = '·'; }
    }
    Span::styled(ch.to_string(), style)
}

fn number_style(n: u8) -> Style {
    match n {
        0 => Style::default().fg(Color::Gray),
        1 => Style::default().fg(Color::Blue),
        2 => Style::default().fg(Color::Green),
        3 => Style::default().fg(Color::Red),
        4 => Style::default().fg(Color::Magenta),
        5 => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::Cyan),
    }
}

fn inner_area(area: Rect) -> Rect {
    // Match Block::inner() for Borders::ALL: shrink by 1 on each side
    Rect { x: area.x.saturating_add(1), y: area.y.saturating_add(1), width: area.width.saturating_sub(2), height: area.height.saturating_sub(2) }
}

fn pos_to_tile(mx: u16, my: u16, inner: Rect, canvas: &Canvas, board: &Board) -> Option<Coord> {
    if mx < inner.x || my < inner.y { return None; }
    let col = mx - inner.x;
    let row = my - inner.y;
    if col >= inner.width || row >= inner.height { return None; }
    canvas.pick(board, col, row)
}

struct TermGuard;
impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
