//! Rules engine for a two-player bounce/swap board game on a 6x6 board.
//!
//! # Rules in short
//!
//! Each player places two pieces of each size (1, 2, 3) on their home line.
//! South moves first. On a turn, a player picks a piece from the occupied
//! line closest to their own edge and moves it exactly `size` steps. Only the
//! last step may land on an occupied cell; the player then either *bounces*
//! (keeps moving with the resident piece's size as the new budget) or
//! *swaps* (takes the resident's cell and drops the resident on any empty
//! cell). Entering the opponent's goal with the last unit of movement wins.
//!
//! # Board Encoding (128-bit)
//!
//! ```text
//! Bits 0-71:  36 cells x 2 bits, row-major (cell = line * 6 + column)
//!               0 = empty, 1 = size one, 2 = size two, 3 = size three
//! Bits 72-73: piece that entered the north goal (South's target)
//! Bits 74-75: piece that entered the south goal (North's target)
//! Bits 76-127: unused (zero)
//!
//! Line 0 is the south edge, line 5 the north edge:
//!   line 5: 30 31 32 33 34 35   <- North's home line
//!   ...
//!   line 0:  0  1  2  3  4  5   <- South's home line
//! ```

use serde::{Deserialize, Serialize};

pub mod board;
pub mod codes;
pub mod command;
pub mod error;
pub mod game;
pub mod setup;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::Board;
pub use codes::{CodedGame, ReturnCode};
pub use command::{Command, ParseCommandError};
pub use error::PlayError;
pub use game::{Game, HandView, Phase, Snapshot};
pub use setup::Setup;

/// Number of lines and columns of the board.
pub const DIMENSION: usize = 6;

/// Number of distinct piece sizes.
pub const NB_SIZE: usize = 3;

/// Number of players.
pub const NB_PLAYERS: usize = 2;

/// Pieces of each size each player places during setup.
pub const NB_INITIAL_PIECES: u8 = 2;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    /// Starts on line 0 and attacks the north goal.
    South = 1,
    /// Starts on line `DIMENSION - 1` and attacks the south goal.
    North = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::South => Player::North,
            Player::North => Player::South,
        }
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Player> {
        match bits {
            1 => Some(Player::South),
            2 => Some(Player::North),
            _ => None,
        }
    }

    /// Index for per-player tables (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// The line this player places pieces on during setup.
    #[inline]
    pub fn home_line(self) -> u8 {
        match self {
            Player::South => 0,
            Player::North => (DIMENSION - 1) as u8,
        }
    }

    /// The line a piece must stand on to enter this player's target goal.
    #[inline]
    pub fn goal_line(self) -> u8 {
        self.opponent().home_line()
    }

    /// Both players, South first.
    pub fn all() -> impl Iterator<Item = Player> {
        [Player::South, Player::North].into_iter()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::South => write!(f, "South"),
            Player::North => write!(f, "North"),
        }
    }
}

/// Returns the player following `player` in the turn order.
#[inline]
pub fn next_player(player: Player) -> Player {
    player.opponent()
}

/// Piece size. The discriminant is also the number of movement units.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Size {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Size {
    /// Convert from a size value (1, 2, 3) to Size.
    #[inline]
    pub fn from_value(value: u8) -> Option<Size> {
        match value {
            1 => Some(Size::One),
            2 => Some(Size::Two),
            3 => Some(Size::Three),
            _ => None,
        }
    }

    /// Number of movement units this piece grants.
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Index for per-size tables (0, 1, 2).
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Get all sizes as an iterator.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::One, Size::Two, Size::Three].into_iter()
    }
}

/// A movement direction. `Goal` is only legal at a special stage of a move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Goal = 0,
    /// Toward decreasing line numbers.
    South = 1,
    /// Toward increasing line numbers.
    North = 2,
    /// Toward increasing column numbers.
    East = 3,
    /// Toward decreasing column numbers.
    West = 4,
}

impl Direction {
    /// Convert from the integer code (0 = goal .. 4 = west).
    #[inline]
    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            0 => Some(Direction::Goal),
            1 => Some(Direction::South),
            2 => Some(Direction::North),
            3 => Some(Direction::East),
            4 => Some(Direction::West),
            _ => None,
        }
    }

    /// The opposite cardinal direction. `Goal` has none.
    #[inline]
    pub fn reverse(self) -> Option<Direction> {
        match self {
            Direction::Goal => None,
            Direction::South => Some(Direction::North),
            Direction::North => Some(Direction::South),
            Direction::East => Some(Direction::West),
            Direction::West => Some(Direction::East),
        }
    }

    /// Line and column deltas. `Goal` does not move on the grid.
    #[inline]
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Goal => (0, 0),
            Direction::South => (-1, 0),
            Direction::North => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    /// The four cardinal directions.
    pub fn cardinals() -> impl Iterator<Item = Direction> {
        [Direction::South, Direction::North, Direction::East, Direction::West].into_iter()
    }
}

/// Position on the 6x6 board (0-35), row-major from the south-west corner.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from line and column (0-5 each).
    #[inline]
    pub fn from_line_column(line: u8, column: u8) -> Pos {
        debug_assert!((line as usize) < DIMENSION && (column as usize) < DIMENSION);
        Pos(line * DIMENSION as u8 + column)
    }

    /// Validate caller-supplied coordinates. Returns None off the board.
    #[inline]
    pub fn checked(line: i32, column: i32) -> Option<Pos> {
        let dim = DIMENSION as i32;
        if (0..dim).contains(&line) && (0..dim).contains(&column) {
            Some(Pos::from_line_column(line as u8, column as u8))
        } else {
            None
        }
    }

    /// Get the line (0-5).
    #[inline]
    pub fn line(self) -> u8 {
        self.0 / DIMENSION as u8
    }

    /// Get the column (0-5).
    #[inline]
    pub fn column(self) -> u8 {
        self.0 % DIMENSION as u8
    }

    /// The neighbouring cell in a cardinal direction, None off the board.
    #[inline]
    pub fn neighbor(self, direction: Direction) -> Option<Pos> {
        if direction == Direction::Goal {
            return None;
        }
        let (dl, dc) = direction.delta();
        Pos::checked(self.line() as i32 + dl, self.column() as i32 + dc)
    }

    /// Iterate over all 36 positions, row-major from line 0.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..(DIMENSION * DIMENSION) as u8).map(Pos)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.line(), self.column())
    }
}
