// Game controller and configuration management
// Ties board and cursor together, dispatches commands, persists settings

use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::xtm_board::Board;
use crate::xtm_coord::wrap;
use crate::xtm_error::Result;

/// User configuration
/// Persisted to disk as TOML
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    // Board dimensions
    pub width: usize,
    pub height: usize,

    // Probability that any given cell holds a mine
    pub fill: f64,

    // Fixed seed for reproducible mine layouts; fresh entropy when absent
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 10,
            height: 10,
            fill: 0.05,
            seed: None,
        }
    }
}

/// Keyboard-driven selection point on the board
/// Coordinates stay inside the grid by wrapping around the edges
#[derive(Debug)]
pub struct Cursor {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl Cursor {
    /// Create a cursor for the given board, centered on it
    pub fn new(board: &Board) -> Cursor {
        let mut cursor = Cursor {
            x: 0,
            y: 0,
            width: board.width(),
            height: board.height(),
        };
        cursor.reset();
        cursor
    }

    /// Move to (x, y), wrapping each axis cyclically so any signed
    /// position lands on a valid cell
    pub fn set_position(&mut self, x: isize, y: isize) {
        self.x = wrap(x, self.width);
        self.y = wrap(y, self.height);
    }

    pub fn move_left(&mut self) {
        self.set_position(self.x as isize - 1, self.y as isize);
    }

    pub fn move_right(&mut self) {
        self.set_position(self.x as isize + 1, self.y as isize);
    }

    pub fn move_up(&mut self) {
        self.set_position(self.x as isize, self.y as isize - 1);
    }

    pub fn move_down(&mut self) {
        self.set_position(self.x as isize, self.y as isize + 1);
    }

    /// Recenter on the board
    pub fn reset(&mut self) {
        self.set_position((self.width / 2) as isize, (self.height / 2) as isize);
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }
}

/// Result of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Failed,
    Won,
}

/// Player actions after key decoding; the UI translates key events into
/// these and the controller dispatches them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Reveal,
    ToggleMark,
    Reset,
    Quit,
}

/// Main game controller
/// Owns the board and cursor, applies commands, tracks the round state
#[derive(Debug)]
pub struct Game {
    board: Board,
    cursor: Cursor,
    state: GameState,
    running: bool,
}

impl Game {
    /// Create a game from the configuration and deal the first round
    /// Fails fast on invalid dimensions or fill ratio
    pub fn new(cfg: &Config) -> Result<Game> {
        let mut board = match cfg.seed {
            Some(seed) => Board::with_seed(cfg.width, cfg.height, cfg.fill, seed)?,
            None => Board::new(cfg.width, cfg.height, cfg.fill)?,
        };
        board.reset();
        let cursor = Cursor::new(&board);
        Ok(Game {
            board,
            cursor,
            state: GameState::Playing,
            running: true,
        })
    }

    /// Dispatch one player command
    /// Cursor movement, reset and quit work in every state; reveal and
    /// mark only while playing
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::MoveUp => self.cursor.move_up(),
            Command::MoveDown => self.cursor.move_down(),
            Command::MoveLeft => self.cursor.move_left(),
            Command::MoveRight => self.cursor.move_right(),
            Command::Reveal => self.reveal_at_cursor()?,
            Command::ToggleMark => self.toggle_mark_at_cursor()?,
            Command::Reset => self.reset(),
            Command::Quit => self.running = false,
        }
        Ok(())
    }

    fn reveal_at_cursor(&mut self) -> Result<()> {
        if self.state != GameState::Playing {
            return Ok(());
        }
        let (x, y) = (self.cursor.x(), self.cursor.y());
        let cell = self.board.cell_at(x, y)?;

        // marked cells are shielded from accidental reveals
        if cell.marked {
            return Ok(());
        }

        self.board.reveal(x, y)?;
        if cell.has_mine {
            self.board.reveal_mines();
            self.state = GameState::Failed;
        } else if self.board.hidden_count() == self.board.mine_count() {
            self.state = GameState::Won;
        }
        Ok(())
    }

    fn toggle_mark_at_cursor(&mut self) -> Result<()> {
        if self.state != GameState::Playing {
            return Ok(());
        }
        self.board.toggle_mark(self.cursor.x(), self.cursor.y())
    }

    /// Start a fresh round: new mine layout, centered cursor
    pub fn reset(&mut self) {
        self.board.reset();
        self.cursor.reset();
        self.state = GameState::Playing;
    }

    /// Key help plus a verdict line, one text per state
    pub fn status_text(&self) -> &'static str {
        match self.state {
            GameState::Playing => {
                "Arrows: Move Cursor\nSpace: Reveal/Clear\nM: Mark\nEsc: Quit\nR: Reset\n\nCHOOSE WISELY"
            }
            GameState::Failed => "Esc: Quit\nR: Reset\n\nGAME OVER!",
            GameState::Won => "Esc: Quit\nR: Reset\n\nFIELD CLEARED!",
        }
    }

    /// The event loop runs while this holds
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn state(&self) -> GameState {
        self.state
    }
}

/// Get the configuration file path
/// Uses the platform config directory (e.g. ~/.config/xtmines/xtmines.toml
/// on Linux), falling back to the current directory
pub fn config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let name = exe.file_stem().and_then(|s| s.to_str())?.to_string();
    if let Some(proj) = ProjectDirs::from("com", "xhbl", &name) {
        let mut path = proj.config_dir().to_path_buf();
        path.push(format!("{}.toml", name));
        Some(path)
    } else {
        let mut path = env::current_dir().ok()?;
        path.push(format!("{}.toml", name));
        Some(path)
    }
}

/// Load configuration from disk, or create the default file if not found
/// A file that fails to parse is replaced with defaults
pub fn load_or_create_config() -> Config {
    if let Some(path) = config_path() {
        if path.exists() {
            if let Ok(s) = fs::read_to_string(&path) {
                match toml::from_str::<Config>(&s) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warn!("config {} is invalid ({}), rewriting defaults", path.display(), e)
                    }
                }
            }
        }
        let cfg = Config::default();
        if let Ok(s) = toml::to_string(&cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, s);
        }
        return cfg;
    }
    Config::default()
}
