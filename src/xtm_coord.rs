// Grid coordinate arithmetic shared by the board and the cursor
// Clamping bounds the adjacency loops; wrapping keeps the cursor on the board

use crate::xtm_error::{GameError, Result};

/// Restrict `value` to the inclusive range `[lower, upper]`.
pub fn clamp(value: isize, lower: isize, upper: isize) -> isize {
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}

/// Wrap `value` cyclically into `[0, size)`: negative values wrap in from
/// the top, overflow wraps back from zero. Used for cursor movement only,
/// so stepping past an edge re-enters from the opposite edge.
pub fn wrap(value: isize, size: usize) -> usize {
    debug_assert!(size > 0);
    value.rem_euclid(size as isize) as usize
}

/// Check that `(x, y)` addresses a cell of a `width`x`height` grid.
pub fn validate(x: usize, y: usize, width: usize, height: usize) -> Result<()> {
    if x < width && y < height {
        Ok(())
    } else {
        Err(GameError::OutOfRange {
            x,
            y,
            width,
            height,
        })
    }
}

/// Iterate the in-bounds 8-neighborhood of `(x, y)`, center excluded.
pub fn neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let x0 = clamp(x as isize - 1, 0, width as isize - 1) as usize;
    let x1 = clamp(x as isize + 1, 0, width as isize - 1) as usize;
    let y0 = clamp(y as isize - 1, 0, height as isize - 1) as usize;
    let y1 = clamp(y as isize + 1, 0, height as isize - 1) as usize;
    (y0..=y1)
        .flat_map(move |ny| (x0..=x1).map(move |nx| (nx, ny)))
        .filter(move |&pos| pos != (x, y))
}
