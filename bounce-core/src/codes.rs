//! Integer-coded facade over [`Game`].
//!
//! Mirrors the classic C-style contract: sizes, players and directions travel
//! as plain integers, operations answer with a [`ReturnCode`], and accessors
//! use sentinels (`NONE`, `NO_PLAYER`, `-1`) instead of `Option`.

use crate::command::Command;
use crate::error::PlayError;
use crate::game::Game;
use crate::{Direction, Player, Size};

/// No piece / no size.
pub const NONE: i32 = 0;
/// No player.
pub const NO_PLAYER: i32 = 0;
pub const SOUTH_P: i32 = Player::South as i32;
pub const NORTH_P: i32 = Player::North as i32;

/// Result of a coded operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(i32)]
pub enum ReturnCode {
    Ok = 0,
    Empty = 1,
    Forbidden = 2,
    Param = 3,
}

impl ReturnCode {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            ReturnCode::Ok => "OK",
            ReturnCode::Empty => "EMPTY",
            ReturnCode::Forbidden => "FORBIDDEN",
            ReturnCode::Param => "PARAM",
        }
    }
}

impl From<PlayError> for ReturnCode {
    fn from(err: PlayError) -> Self {
        match err {
            PlayError::Empty => ReturnCode::Empty,
            PlayError::Forbidden => ReturnCode::Forbidden,
            PlayError::Param => ReturnCode::Param,
        }
    }
}

impl From<Result<(), PlayError>> for ReturnCode {
    fn from(result: Result<(), PlayError>) -> Self {
        match result {
            Ok(()) => ReturnCode::Ok,
            Err(err) => err.into(),
        }
    }
}

impl std::fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn size_from(code: i32) -> Option<Size> {
    u8::try_from(code).ok().and_then(Size::from_value)
}

fn player_from(code: i32) -> Option<Player> {
    u8::try_from(code).ok().and_then(Player::from_bits)
}

fn direction_from(code: i32) -> Option<Direction> {
    u8::try_from(code).ok().and_then(Direction::from_code)
}

fn size_code(size: Option<Size>) -> i32 {
    size.map_or(NONE, |s| s.value() as i32)
}

fn player_code(player: Option<Player>) -> i32 {
    player.map_or(NO_PLAYER, |p| p as i32)
}

fn line_code(line: Option<u8>) -> i32 {
    line.map_or(-1, i32::from)
}

/// The player after `player`, `NO_PLAYER` for anything invalid.
pub fn next_player(player: i32) -> i32 {
    player_code(player_from(player).map(crate::next_player))
}

/// A [`Game`] spoken to in integers.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CodedGame {
    game: Game,
}

impl CodedGame {
    pub fn new_game() -> CodedGame {
        CodedGame { game: Game::new() }
    }

    /// Independent deep copy.
    pub fn copy_game(&self) -> CodedGame {
        self.clone()
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    // ========== Queries ==========

    /// Size at (line, column), `NONE` if empty or off the board.
    pub fn get_piece_size(&self, line: i32, column: i32) -> i32 {
        size_code(self.game.get_piece_size(line, column))
    }

    pub fn get_winner(&self) -> i32 {
        player_code(self.game.winner())
    }

    pub fn southmost_occupied_line(&self) -> i32 {
        line_code(self.game.southmost_occupied_line())
    }

    pub fn northmost_occupied_line(&self) -> i32 {
        line_code(self.game.northmost_occupied_line())
    }

    pub fn picked_piece_owner(&self) -> i32 {
        player_code(self.game.picked_piece_owner())
    }

    pub fn picked_piece_size(&self) -> i32 {
        size_code(self.game.picked_piece_size())
    }

    pub fn picked_piece_line(&self) -> i32 {
        line_code(self.game.picked_piece_line())
    }

    pub fn picked_piece_column(&self) -> i32 {
        line_code(self.game.picked_piece_column())
    }

    pub fn movement_left(&self) -> i32 {
        line_code(self.game.movement_left())
    }

    /// Pieces left to place, -1 for an invalid size or player.
    pub fn nb_pieces_available(&self, size: i32, player: i32) -> i32 {
        match (size_from(size), player_from(player)) {
            (Some(size), Some(player)) => self.game.nb_pieces_available(size, player) as i32,
            _ => -1,
        }
    }

    /// False for an invalid direction code.
    pub fn is_move_possible(&self, direction: i32) -> bool {
        direction_from(direction).is_some_and(|d| self.game.is_move_possible(d))
    }

    // ========== Operations ==========

    pub fn place_piece(&mut self, size: i32, player: i32, column: i32) -> ReturnCode {
        match (size_from(size), player_from(player)) {
            (Some(size), Some(player)) => self.game.place_piece(size, player, column).into(),
            _ => ReturnCode::Param,
        }
    }

    /// An invalid player is `Param`, unless no pick is possible at all
    /// (setup, finished game, piece already in hand), which is `Forbidden`.
    pub fn pick_piece(&mut self, player: i32, line: i32, column: i32) -> ReturnCode {
        match player_from(player) {
            Some(player) => self.game.pick_piece(player, line, column).into(),
            None if self.game.turn().is_none() || self.game.picked_piece_owner().is_some() => {
                ReturnCode::Forbidden
            }
            None => ReturnCode::Param,
        }
    }

    pub fn move_piece(&mut self, direction: i32) -> ReturnCode {
        match direction_from(direction) {
            Some(direction) => self.game.move_piece(direction).into(),
            None => ReturnCode::Param,
        }
    }

    pub fn swap_piece(&mut self, target_line: i32, target_column: i32) -> ReturnCode {
        self.game.swap_piece(target_line, target_column).into()
    }

    pub fn cancel_movement(&mut self) -> ReturnCode {
        self.game.cancel_movement().into()
    }

    pub fn cancel_step(&mut self) -> ReturnCode {
        self.game.cancel_step().into()
    }

    pub fn apply(&mut self, command: &Command) -> ReturnCode {
        self.game.apply(command).into()
    }
}

impl From<Game> for CodedGame {
    fn from(game: Game) -> Self {
        CodedGame { game }
    }
}
