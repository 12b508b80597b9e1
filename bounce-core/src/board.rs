//! Bit-packed board storage.
//!
//! See the crate documentation for the encoding. The board knows nothing
//! about turns or the piece in hand: it only answers "what lies where".

use crate::{Player, Pos, Size, DIMENSION};

/// Compact board state - fits in a single u128.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Board(pub u128);

impl Board {
    /// Bits per cell (0 = empty, 1..3 = size).
    const CELL_BITS: u32 = 2;
    /// Mask for a single cell (0b11).
    const CELL_MASK: u128 = 0b11;
    /// Mask for one full line (6 cells x 2 bits).
    const LINE_MASK: u128 = (1 << (DIMENSION as u32 * Self::CELL_BITS)) - 1;
    /// First bit of the goal slots, right after the 36 cells.
    const GOAL_SHIFT: u32 = (DIMENSION * DIMENSION) as u32 * Self::CELL_BITS;

    /// Create a new empty board.
    #[inline]
    pub fn new() -> Board {
        Board(0)
    }

    /// Get the piece at a position, if any.
    #[inline]
    pub fn cell(&self, pos: Pos) -> Option<Size> {
        let bits = (self.0 >> (pos.0 as u32 * Self::CELL_BITS)) & Self::CELL_MASK;
        Size::from_value(bits as u8)
    }

    /// Overwrite a cell.
    #[inline]
    pub fn set_cell(&mut self, pos: Pos, piece: Option<Size>) {
        let shift = pos.0 as u32 * Self::CELL_BITS;
        let value = piece.map_or(0, |size| size.value() as u128);
        self.0 = (self.0 & !(Self::CELL_MASK << shift)) | (value << shift);
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cell(pos).is_none()
    }

    /// Remove and return the piece at a position.
    #[inline]
    pub fn take(&mut self, pos: Pos) -> Option<Size> {
        let piece = self.cell(pos);
        self.set_cell(pos, None);
        piece
    }

    /// Put a piece on a cell.
    /// Does NOT validate - caller must ensure the cell is empty.
    #[inline]
    pub fn put(&mut self, pos: Pos, size: Size) {
        debug_assert!(self.is_empty(pos), "put on occupied cell {}", pos);
        self.set_cell(pos, Some(size));
    }

    // ========== Goals ==========

    #[inline]
    fn goal_shift(attacker: Player) -> u32 {
        Self::GOAL_SHIFT + attacker.index() as u32 * Self::CELL_BITS
    }

    /// The piece that entered the goal attacked by `attacker`, if any.
    #[inline]
    pub fn goal(&self, attacker: Player) -> Option<Size> {
        let bits = (self.0 >> Self::goal_shift(attacker)) & Self::CELL_MASK;
        Size::from_value(bits as u8)
    }

    /// Record a piece entering the goal attacked by `attacker`.
    #[inline]
    pub fn enter_goal(&mut self, attacker: Player, size: Size) {
        let shift = Self::goal_shift(attacker);
        self.0 = (self.0 & !(Self::CELL_MASK << shift)) | ((size.value() as u128) << shift);
    }

    // ========== Line Queries ==========

    /// Check whether any piece stands on a line.
    #[inline]
    pub fn is_line_occupied(&self, line: u8) -> bool {
        let shift = line as u32 * DIMENSION as u32 * Self::CELL_BITS;
        (self.0 >> shift) & Self::LINE_MASK != 0
    }

    /// Smallest line number holding a piece, None on an empty board.
    pub fn southmost_occupied_line(&self) -> Option<u8> {
        (0..DIMENSION as u8).find(|&line| self.is_line_occupied(line))
    }

    /// Largest line number holding a piece, None on an empty board.
    pub fn northmost_occupied_line(&self) -> Option<u8> {
        (0..DIMENSION as u8).rev().find(|&line| self.is_line_occupied(line))
    }

    /// The occupied line closest to a player's own edge.
    #[inline]
    pub fn closest_occupied_line(&self, player: Player) -> Option<u8> {
        match player {
            Player::South => self.southmost_occupied_line(),
            Player::North => self.northmost_occupied_line(),
        }
    }

    // ========== Counting & Enumeration ==========

    /// Number of pieces on the grid (goals excluded).
    pub fn piece_count(&self) -> usize {
        Pos::all().filter(|&pos| !self.is_empty(pos)).count()
    }

    /// Number of pieces of a size on the grid and in both goals.
    pub fn count(&self, size: Size) -> u8 {
        let on_grid = Pos::all().filter(|&pos| self.cell(pos) == Some(size)).count() as u8;
        let in_goals = Player::all().filter(|&p| self.goal(p) == Some(size)).count() as u8;
        on_grid + in_goals
    }

    /// Every cell in row-major order, line 0 (south) first.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Option<Size>)> + '_ {
        Pos::all().map(move |pos| (pos, self.cell(pos)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws the board north-up, one line per row, `.` for empty cells.
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let goal = |attacker| self.goal(attacker).map_or('.', |s: Size| (b'0' + s.value()) as char);
        writeln!(f, "  goal[{}]", goal(Player::South))?;
        for line in (0..DIMENSION as u8).rev() {
            write!(f, "{} ", line)?;
            for column in 0..DIMENSION as u8 {
                match self.cell(Pos::from_line_column(line, column)) {
                    Some(size) => write!(f, " {}", size.value())?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  goal[{}]", goal(Player::North))?;
        write!(f, "   ")?;
        for column in 0..DIMENSION {
            write!(f, " {}", column)?;
        }
        Ok(())
    }
}
