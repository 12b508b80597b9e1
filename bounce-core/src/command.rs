//! Textual command notation for driving a game from scripts.
//!
//! ```text
//! place <1|2|3> <S|N> <column>
//! pick <S|N> <line> <column>
//! move <G|S|N|E|W>
//! swap <line> <column>
//! cancel
//! undo
//! ```
//!
//! Coordinates are signed so that out-of-range values still reach the engine
//! and get reported as `Param` there.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlayError;
use crate::game::Game;
use crate::{Direction, Player, Size};

/// One player action.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Place { size: Size, player: Player, column: i32 },
    Pick { player: Player, line: i32, column: i32 },
    Move { direction: Direction },
    Swap { line: i32, column: i32 },
    /// Abandon the whole move.
    Cancel,
    /// Take back one step.
    Undo,
}

/// Why a command line could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    /// Nothing but whitespace.
    Blank,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidArgument { expected: &'static str, found: String },
    TrailingInput(String),
}

impl std::fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseCommandError::Blank => write!(f, "empty command"),
            ParseCommandError::UnknownCommand(word) => write!(f, "unknown command '{}'", word),
            ParseCommandError::MissingArgument(what) => write!(f, "missing {}", what),
            ParseCommandError::InvalidArgument { expected, found } => {
                write!(f, "expected {}, found '{}'", expected, found)
            }
            ParseCommandError::TrailingInput(token) => write!(f, "unexpected '{}'", token),
        }
    }
}

impl std::error::Error for ParseCommandError {}

fn parse_player(token: &str) -> Option<Player> {
    match token.to_ascii_lowercase().as_str() {
        "s" | "south" => Some(Player::South),
        "n" | "north" => Some(Player::North),
        _ => None,
    }
}

fn parse_direction(token: &str) -> Option<Direction> {
    match token.to_ascii_lowercase().as_str() {
        "g" | "goal" => Some(Direction::Goal),
        "s" | "south" => Some(Direction::South),
        "n" | "north" => Some(Direction::North),
        "e" | "east" => Some(Direction::East),
        "w" | "west" => Some(Direction::West),
        _ => None,
    }
}

fn parse_size(token: &str) -> Option<Size> {
    token.parse::<u8>().ok().and_then(Size::from_value)
}

/// Pulls whitespace-separated arguments off a command line.
struct Args<'a> {
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn next<T>(
        &mut self,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, ParseCommandError> {
        let token = self
            .tokens
            .next()
            .ok_or(ParseCommandError::MissingArgument(expected))?;
        parse(token).ok_or_else(|| ParseCommandError::InvalidArgument {
            expected,
            found: token.to_string(),
        })
    }

    fn int(&mut self, expected: &'static str) -> Result<i32, ParseCommandError> {
        self.next(expected, |token| token.parse().ok())
    }

    fn finish(mut self) -> Result<(), ParseCommandError> {
        match self.tokens.next() {
            Some(token) => Err(ParseCommandError::TrailingInput(token.to_string())),
            None => Ok(()),
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let verb = tokens.next().ok_or(ParseCommandError::Blank)?;
        let mut args = Args { tokens };

        let command = match verb.to_ascii_lowercase().as_str() {
            "place" => Command::Place {
                size: args.next("size 1, 2 or 3", parse_size)?,
                player: args.next("player S or N", parse_player)?,
                column: args.int("column")?,
            },
            "pick" => Command::Pick {
                player: args.next("player S or N", parse_player)?,
                line: args.int("line")?,
                column: args.int("column")?,
            },
            "move" => Command::Move {
                direction: args.next("direction G, S, N, E or W", parse_direction)?,
            },
            "swap" => Command::Swap {
                line: args.int("line")?,
                column: args.int("column")?,
            },
            "cancel" => Command::Cancel,
            "undo" => Command::Undo,
            _ => return Err(ParseCommandError::UnknownCommand(verb.to_string())),
        };
        args.finish()?;
        Ok(command)
    }
}

impl Command {
    /// Parse one script line. Comments (`#` to end of line) and blank lines
    /// yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Command>, ParseCommandError> {
        let code = line.split('#').next().unwrap_or("");
        if code.trim().is_empty() {
            return Ok(None);
        }
        code.parse().map(Some)
    }
}

/// Prints the command back in script notation.
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let player = |p: Player| match p {
            Player::South => 'S',
            Player::North => 'N',
        };
        match *self {
            Command::Place { size, player: p, column } => {
                write!(f, "place {} {} {}", size.value(), player(p), column)
            }
            Command::Pick { player: p, line, column } => {
                write!(f, "pick {} {} {}", player(p), line, column)
            }
            Command::Move { direction } => {
                let letter = match direction {
                    Direction::Goal => 'G',
                    Direction::South => 'S',
                    Direction::North => 'N',
                    Direction::East => 'E',
                    Direction::West => 'W',
                };
                write!(f, "move {}", letter)
            }
            Command::Swap { line, column } => write!(f, "swap {} {}", line, column),
            Command::Cancel => write!(f, "cancel"),
            Command::Undo => write!(f, "undo"),
        }
    }
}

impl Game {
    /// Run a command against the game.
    pub fn apply(&mut self, command: &Command) -> Result<(), PlayError> {
        match *command {
            Command::Place { size, player, column } => self.place_piece(size, player, column),
            Command::Pick { player, line, column } => self.pick_piece(player, line, column),
            Command::Move { direction } => self.move_piece(direction),
            Command::Swap { line, column } => self.swap_piece(line, column),
            Command::Cancel => self.cancel_movement(),
            Command::Undo => self.cancel_step(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Parsing ==========

    #[test]
    fn test_parse_each_command() {
        assert_eq!(
            "place 2 S 3".parse(),
            Ok(Command::Place { size: Size::Two, player: Player::South, column: 3 })
        );
        assert_eq!(
            "pick N 5 0".parse(),
            Ok(Command::Pick { player: Player::North, line: 5, column: 0 })
        );
        assert_eq!("move G".parse(), Ok(Command::Move { direction: Direction::Goal }));
        assert_eq!("swap 3 3".parse(), Ok(Command::Swap { line: 3, column: 3 }));
        assert_eq!("cancel".parse(), Ok(Command::Cancel));
        assert_eq!("undo".parse(), Ok(Command::Undo));
    }

    #[test]
    fn test_parse_words_and_case() {
        assert_eq!(
            "PICK south 0 1".parse(),
            Ok(Command::Pick { player: Player::South, line: 0, column: 1 })
        );
        assert_eq!("Move West".parse(), Ok(Command::Move { direction: Direction::West }));
        assert_eq!("move  e ".parse(), Ok(Command::Move { direction: Direction::East }));
    }

    #[test]
    fn test_parse_negative_coordinates() {
        assert_eq!(
            "place 1 N -1".parse(),
            Ok(Command::Place { size: Size::One, player: Player::North, column: -1 })
        );
        assert_eq!("swap 50 0".parse(), Ok(Command::Swap { line: 50, column: 0 }));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseCommandError::Blank));
        assert_eq!(
            "jump 1".parse::<Command>(),
            Err(ParseCommandError::UnknownCommand("jump".to_string()))
        );
        assert_eq!(
            "pick S 0".parse::<Command>(),
            Err(ParseCommandError::MissingArgument("column"))
        );
        assert_eq!(
            "place 4 S 0".parse::<Command>(),
            Err(ParseCommandError::InvalidArgument {
                expected: "size 1, 2 or 3",
                found: "4".to_string()
            })
        );
        assert_eq!(
            "move X".parse::<Command>(),
            Err(ParseCommandError::InvalidArgument {
                expected: "direction G, S, N, E or W",
                found: "X".to_string()
            })
        );
        assert_eq!(
            "cancel now".parse::<Command>(),
            Err(ParseCommandError::TrailingInput("now".to_string()))
        );
    }

    #[test]
    fn test_parse_line_comments() {
        assert_eq!(Command::parse_line("   "), Ok(None));
        assert_eq!(Command::parse_line("# setup"), Ok(None));
        assert_eq!(
            Command::parse_line("move N  # first step"),
            Ok(Some(Command::Move { direction: Direction::North }))
        );
    }

    #[test]
    fn test_display_reparses() {
        let commands = [
            Command::Place { size: Size::Three, player: Player::North, column: 5 },
            Command::Pick { player: Player::South, line: 0, column: -2 },
            Command::Move { direction: Direction::Goal },
            Command::Swap { line: 4, column: 1 },
            Command::Undo,
        ];
        for command in commands {
            assert_eq!(command.to_string().parse(), Ok(command));
        }
        assert_eq!(Command::Move { direction: Direction::West }.to_string(), "move W");
    }

    #[test]
    fn test_error_display() {
        let err = "place 1 X 0".parse::<Command>().unwrap_err();
        assert_eq!(err.to_string(), "expected player S or N, found 'X'");
    }

    // ========== Apply ==========

    #[test]
    fn test_apply_dispatches() {
        let mut game = Game::new();
        let place = Command::Place { size: Size::One, player: Player::South, column: 7 };
        assert_eq!(game.apply(&place), Err(PlayError::Param));

        let place = Command::Place { size: Size::One, player: Player::South, column: 0 };
        assert_eq!(game.apply(&place), Ok(()));
        assert_eq!(game.get_piece_size(0, 0), Some(Size::One));

        assert_eq!(game.apply(&Command::Cancel), Err(PlayError::Empty));
        assert_eq!(game.apply(&Command::Undo), Err(PlayError::Empty));
        assert_eq!(
            game.apply(&Command::Pick { player: Player::South, line: 0, column: 0 }),
            Err(PlayError::Forbidden)
        );
    }

    #[test]
    fn test_command_json() {
        let command = Command::Pick { player: Player::South, line: 0, column: 3 };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"op":"pick","player":"South","line":0,"column":3}"#);
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }
}
