use minechase_core::{Board, Cell, Session};

/// Terminal glyph for a cell, the text counterpart of the per-cell textures of a 3D floor.
pub fn glyph(cell: Cell) -> char {
    match cell {
        Cell {
            is_covered: true,
            is_flagged: true,
            ..
        } => 'F',
        Cell {
            is_covered: true, ..
        } => '#',
        Cell { is_mine: true, .. } => '*',
        Cell {
            neighbor_mines: 0, ..
        } => '.',
        Cell { neighbor_mines, .. } => char::from_digit(neighbor_mines.into(), 10).unwrap_or('?'),
    }
}

/// Board as text, one row per z with the x axis labelled on top.
pub fn board(board: &Board) -> String {
    let (width, height) = board.size();
    let mut out = String::from("    ");
    for x in 0..width {
        out.push(char::from_digit((x % 10) as u32, 10).unwrap_or(' '));
    }
    out.push('\n');

    for z in 0..height {
        out.push_str(&format!("{z:>3} "));
        for x in 0..width {
            out.push(glyph(board[(x, z)]));
        }
        out.push('\n');
    }
    out
}

pub fn status(session: &Session) -> String {
    format!(
        "{:?}, mines left: {}, opened {}/{}",
        session.outcome(),
        session.mines_left(),
        session.board().opened_safe_count(),
        session.board().safe_cell_count()
    )
}
