use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;

use crate::xtm_board::Cell;
use crate::xtm_color::{state_palette, TermMatch};
use crate::xtm_game::{Command, Config, Game};

pub fn run(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let mut game = Game::new(cfg)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // one command fully processed per cycle, then redraw
    while game.is_running() {
        terminal.draw(|f| draw_frame(f, &game))?;

        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            if let Some(command) = map_key(code) {
                game.apply(command)?;
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Decode a key press into a player command; unknown keys are ignored
fn map_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up => Some(Command::MoveUp),
        KeyCode::Down => Some(Command::MoveDown),
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Char(' ') => Some(Command::Reveal),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Command::ToggleMark),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn draw_frame<B: Backend>(f: &mut Frame<B>, game: &Game) {
    let size = f.size();
    let status = status_lines(game);
    let status_h = status.len() as u16 + 1;
    let board_w = game.board().width() as u16 + 2;
    let board_h = game.board().height() as u16 + 2;

    // If terminal is too small, render a centered warning and skip normal UI
    let min_w = board_w.max(24);
    let min_h = status_h + board_h;
    if size.width < min_w || size.height < min_h {
        let warn_lines = vec![
            Spans::from("Terminal size too small."),
            Spans::from(format!("Minimum required: {} x {}", min_w, min_h)),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width.saturating_sub(2));
        let h = 4u16.min(size.height.saturating_sub(2));
        f.render_widget(warn, center_rect(w, h, size));
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(status_h), Constraint::Min(board_h)].as_ref())
        .split(size);

    let palette = state_palette(game.state());
    let status = Paragraph::new(Text::from(status))
        .style(Style::default().fg(palette.status))
        .alignment(Alignment::Left);
    f.render_widget(status, chunks[0]);

    let board = Paragraph::new(Text::from(board_lines(game)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Minefield")
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Left);
    f.render_widget(board, center_rect(board_w, board_h, chunks[1]));
}

/// Key help and verdict for the current state, plus the round counters
fn status_lines(game: &Game) -> Vec<Spans<'static>> {
    let mut lines: Vec<Spans> = game.status_text().lines().map(Spans::from).collect();
    lines.push(Spans::from(""));
    lines.push(Spans::from(format!(
        "Mines: {}   Hidden: {}",
        game.board().mine_count(),
        game.board().hidden_count()
    )));
    lines
}

/// One styled span per cell; the cursor cell gets a background highlight
fn board_lines(game: &Game) -> Vec<Spans<'static>> {
    let palette = state_palette(game.state());
    let cursor_bg = Color::DarkGray.term_match();
    let mut lines = Vec::with_capacity(game.board().height());
    for (y, row) in game.board().rows().enumerate() {
        let mut spans = Vec::with_capacity(row.len());
        for (x, cell) in row.iter().enumerate() {
            let mut style = Style::default().fg(palette.board);
            if (game.cursor().x(), game.cursor().y()) == (x, y) {
                style = style.bg(cursor_bg);
            }
            spans.push(Span::styled(cell_char(cell).to_string(), style));
        }
        lines.push(Spans::from(spans));
    }
    lines
}

/// Glyph for one cell; revealed state wins over a stale mark
fn cell_char(cell: &Cell) -> char {
    if cell.revealed {
        if cell.has_mine {
            '*'
        } else if cell.adjacent_mines > 0 {
            char::from(b'0' + cell.adjacent_mines)
        } else {
            ' '
        }
    } else if cell.marked {
        'X'
    } else {
        '.'
    }
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn test_game(width: usize, height: usize, fill: f64) -> Game {
        let cfg = Config {
            width,
            height,
            fill,
            seed: Some(1),
        };
        Game::new(&cfg).unwrap()
    }

    fn buffer_rows(buffer: &Buffer) -> Vec<String> {
        let area = *buffer.area();
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer.get(x, y).symbol.as_str())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn cell_glyphs_follow_the_conventional_mapping() {
        let mut cell = Cell::default();
        assert_eq!(cell_char(&cell), '.');

        cell.marked = true;
        assert_eq!(cell_char(&cell), 'X');

        cell.revealed = true;
        cell.has_mine = true;
        assert_eq!(cell_char(&cell), '*', "revealed mine wins over the mark");

        let open = Cell {
            revealed: true,
            ..Cell::default()
        };
        assert_eq!(cell_char(&open), ' ');

        for n in 1..=8u8 {
            let numbered = Cell {
                revealed: true,
                adjacent_mines: n,
                ..Cell::default()
            };
            assert_eq!(cell_char(&numbered), char::from(b'0' + n));
        }
    }

    #[test]
    fn keys_decode_to_commands() {
        assert_eq!(map_key(KeyCode::Up), Some(Command::MoveUp));
        assert_eq!(map_key(KeyCode::Down), Some(Command::MoveDown));
        assert_eq!(map_key(KeyCode::Left), Some(Command::MoveLeft));
        assert_eq!(map_key(KeyCode::Right), Some(Command::MoveRight));
        assert_eq!(map_key(KeyCode::Char(' ')), Some(Command::Reveal));
        assert_eq!(map_key(KeyCode::Char('m')), Some(Command::ToggleMark));
        assert_eq!(map_key(KeyCode::Char('M')), Some(Command::ToggleMark));
        assert_eq!(map_key(KeyCode::Char('r')), Some(Command::Reset));
        assert_eq!(map_key(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(map_key(KeyCode::Char('q')), None);
        assert_eq!(map_key(KeyCode::Enter), None);
    }

    #[test]
    fn cursor_cell_is_the_only_highlighted_span() {
        let game = test_game(3, 3, 0.0);
        let lines = board_lines(&game);

        for (y, line) in lines.iter().enumerate() {
            for (x, span) in line.0.iter().enumerate() {
                assert_eq!(
                    span.style.bg.is_some(),
                    (x, y) == (1, 1),
                    "highlight expected only under the cursor"
                );
            }
        }
    }

    #[test]
    fn frame_shows_status_board_and_counters() {
        let game = test_game(10, 10, 0.0);
        let backend = TestBackend::new(32, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_frame(f, &game)).unwrap();

        let rows = buffer_rows(terminal.backend().buffer());
        let text = rows.join("\n");
        assert!(rows[0].starts_with("Arrows: Move Cursor"));
        assert!(text.contains("CHOOSE WISELY"));
        assert!(text.contains("Mines: 0   Hidden: 100"));
        assert!(text.contains("Minefield"));

        let dots = text.chars().filter(|&c| c == '.').count();
        assert_eq!(dots, 100, "one dot per unrevealed cell, nothing else");
    }

    #[test]
    fn frame_reports_a_won_round() {
        let mut game = test_game(3, 3, 0.0);
        game.apply(Command::Reveal).unwrap();

        let backend = TestBackend::new(30, 18);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_frame(f, &game)).unwrap();

        let text = buffer_rows(terminal.backend().buffer()).join("\n");
        assert!(text.contains("FIELD CLEARED!"));
        assert!(text.contains("Mines: 0   Hidden: 0"));
    }

    #[test]
    fn cramped_terminal_asks_for_a_resize() {
        let game = test_game(10, 10, 0.0);
        let backend = TestBackend::new(30, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_frame(f, &game)).unwrap();

        let text = buffer_rows(terminal.backend().buffer()).join("\n");
        assert!(text.contains("Terminal size too small."));
        assert!(!text.contains("Minefield"));
    }
}
