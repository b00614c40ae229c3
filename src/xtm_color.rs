use ratatui::style::Color;
use term_color_support::ColorSupport;

use crate::xtm_game::GameState;

/// Foreground colors for one frame: the status text and the board grid.
pub struct Palette {
    pub status: Color,
    pub board: Color,
}

/// Pick the frame colors for a round state: yellow-on-white while playing,
/// all red after a loss, blue-on-cyan after a win.
pub fn state_palette(state: GameState) -> Palette {
    let (status, board) = match state {
        GameState::Playing => (Color::Yellow, Color::White),
        GameState::Failed => (Color::Red, Color::Red),
        GameState::Won => (Color::Blue, Color::Cyan),
    };
    Palette {
        status: status.term_match(),
        board: board.term_match(),
    }
}

/// A trait to extend Ratatui's Color with cross-platform consistency methods.
pub trait TermMatch {
    /// Adjusts the color to match the Windows Terminal (Campbell) visual style
    /// based on the current terminal's color capabilities.
    fn term_match(self) -> Color;
}

impl TermMatch for Color {
    fn term_match(self) -> Color {
        // Detect terminal color support (TrueColor, 256, or Basic)
        let support = ColorSupport::stdout();

        // Campbell RGB samples for the ANSI colors this game draws with.
        // Format: Some(((R, G, B), ANSI_256_Index))
        let mapping = match self {
            Color::Red =>      Some(((197, 15, 31),   160)),
            Color::Yellow =>   Some(((193, 156, 0),   178)),
            Color::Blue =>     Some(((0, 55, 218),    20)),
            Color::Cyan =>     Some(((58, 150, 221),  38)),
            Color::DarkGray => Some(((118, 118, 118), 243)),
            Color::White =>    Some(((242, 242, 242), 255)),
            _ => None, // Custom RGB or Indexed colors are returned as-is
        };

        match mapping {
            Some((rgb, index256)) => {
                if support.has_16m {
                    Color::Rgb(rgb.0, rgb.1, rgb.2)
                } else if support.has_256 {
                    Color::Indexed(index256)
                } else {
                    // Basic 16-color support: keep the ANSI variant
                    self
                }
            }
            None => self,
        }
    }
}
