// Entry point for the xtmines TUI application
// Loads the configuration and launches the main UI loop

use std::error::Error;

// Module declarations
mod xtm_board; // Cell grid, mine placement and reveal rules
mod xtm_color; // Cross-platform color matching utilities
mod xtm_coord; // Coordinate clamping, wrapping and validation
mod xtm_error; // Error type shared across the game
mod xtm_game;  // Game controller, cursor and configuration
mod xtm_ui;    // Terminal UI rendering and event handling

use xtm_game::load_or_create_config;
use xtm_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Load or create user configuration (board size, fill ratio, seed)
    let cfg = load_or_create_config();

    // Launch the main UI loop
    run_ui(&cfg)
}
