//! The game engine: setup, turns, and the piece in hand.
//!
//! A [`Game`] moves through three phases:
//!
//! ```text
//! Setup --(last placement)--> Turn(South) <--> Turn(North) --(goal)--> Finished
//! ```
//!
//! During a turn the acting player may hold one piece. The piece is off the
//! board while held; it only lands again when its movement ends, when it is
//! swapped in, or when the move is cancelled.

use serde::Serialize;
use tracing::{debug, trace};

use crate::board::Board;
use crate::error::PlayError;
use crate::setup::Setup;
use crate::{Direction, Player, Pos, Size, NB_PLAYERS, NB_SIZE};

/// Where the game stands.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(tag = "phase", content = "player", rename_all = "snake_case")]
pub enum Phase {
    /// Players are still placing pieces.
    Setup,
    /// The given player is to move.
    Turn(Player),
    /// The given player entered the opponent's goal. Terminal.
    Finished(Player),
}

/// Progress of the piece in hand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Stage {
    /// `left` steps remain, always at least one.
    Moving { left: u8 },
    /// The last step ended on a piece of size `under`: the player must
    /// bounce (keep moving with `under` steps) or swap.
    Landed { under: Size },
}

impl Stage {
    /// Movement units available for the next step sequence.
    #[inline]
    fn budget(self) -> u8 {
        match self {
            Stage::Moving { left } => left,
            Stage::Landed { under } => under.value(),
        }
    }
}

/// Undo record for one step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct Step {
    from: Pos,
    stage: Stage,
    last: Option<Direction>,
}

/// The piece currently being moved.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct Hand {
    owner: Player,
    size: Size,
    origin: Pos,
    at: Pos,
    stage: Stage,
    /// Direction of the previous step this turn.
    last: Option<Direction>,
    history: Vec<Step>,
}

impl Hand {
    fn new(owner: Player, size: Size, origin: Pos) -> Hand {
        Hand {
            owner,
            size,
            origin,
            at: origin,
            stage: Stage::Moving { left: size.value() },
            last: None,
            history: Vec::new(),
        }
    }

    fn advance(&mut self, direction: Direction, to: Pos, stage: Stage) {
        self.history.push(Step {
            from: self.at,
            stage: self.stage,
            last: self.last,
        });
        self.at = to;
        self.stage = stage;
        self.last = Some(direction);
    }

    /// Legality of the next step, without side effects.
    fn target(&self, board: &Board, direction: Direction) -> Result<Target, PlayError> {
        let budget = self.stage.budget();

        if direction == Direction::Goal {
            return if self.at.line() == self.owner.goal_line() && budget == 1 {
                Ok(Target::Goal)
            } else {
                Err(PlayError::Forbidden)
            };
        }

        let target = self.at.neighbor(direction).ok_or(PlayError::Param)?;
        // Landing on a piece resets the no-reversal rule
        if matches!(self.stage, Stage::Moving { .. }) && direction.reverse() == self.last {
            return Err(PlayError::Forbidden);
        }
        match board.cell(target) {
            None => Ok(Target::Free(target)),
            Some(under) if budget == 1 => Ok(Target::Bounce(target, under)),
            Some(_) => Err(PlayError::Forbidden),
        }
    }
}

/// Outcome of a legal step, computed before anything is mutated.
enum Target {
    Goal,
    Free(Pos),
    Bounce(Pos, Size),
}

/// Public view of the piece in hand.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct HandView {
    pub owner: Player,
    pub size: Size,
    pub origin: Pos,
    pub line: u8,
    pub column: u8,
    pub movement_left: u8,
    pub pending_decision: bool,
}

/// Serializable dump of a game, cells row-major from line 0.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    /// 36 entries, 0 for empty or the piece size.
    pub cells: Vec<u8>,
    /// Piece in the north goal (entered by South), 0 if none.
    pub north_goal: u8,
    /// Piece in the south goal (entered by North), 0 if none.
    pub south_goal: u8,
    /// Pieces left to place, indexed [player][size - 1], South first.
    pub to_place: [[u8; NB_SIZE]; NB_PLAYERS],
    pub hand: Option<HandView>,
}

fn rejected(op: &'static str, err: PlayError) -> PlayError {
    trace!(op, error = %err, "operation rejected");
    err
}

/// A complete game instance. `Clone` yields a fully independent copy.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Game {
    board: Board,
    setup: Setup,
    phase: Phase,
    hand: Option<Hand>,
}

impl Game {
    /// A fresh game: empty board, setup phase.
    pub fn new() -> Game {
        Game {
            board: Board::new(),
            setup: Setup::new(),
            phase: Phase::Setup,
            hand: None,
        }
    }

    // ========== Accessors ==========

    /// The board as it stands, without the piece in hand.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The player to move, None during setup and after a win.
    #[inline]
    pub fn turn(&self) -> Option<Player> {
        match self.phase {
            Phase::Turn(player) => Some(player),
            _ => None,
        }
    }

    /// The winning player, None while nobody has reached a goal.
    #[inline]
    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Finished(player) => Some(player),
            _ => None,
        }
    }

    #[inline]
    pub fn is_setup_complete(&self) -> bool {
        self.setup.is_complete()
    }

    /// Size of the piece on the board at (line, column). None for empty or
    /// off-board coordinates. The piece in hand is never reported.
    pub fn get_piece_size(&self, line: i32, column: i32) -> Option<Size> {
        Pos::checked(line, column).and_then(|pos| self.board.cell(pos))
    }

    /// Smallest line number holding a piece on the board.
    pub fn southmost_occupied_line(&self) -> Option<u8> {
        self.board.southmost_occupied_line()
    }

    /// Largest line number holding a piece on the board.
    pub fn northmost_occupied_line(&self) -> Option<u8> {
        self.board.northmost_occupied_line()
    }

    pub fn picked_piece_owner(&self) -> Option<Player> {
        self.hand.as_ref().map(|hand| hand.owner)
    }

    pub fn picked_piece_size(&self) -> Option<Size> {
        self.hand.as_ref().map(|hand| hand.size)
    }

    pub fn picked_piece_line(&self) -> Option<u8> {
        self.hand.as_ref().map(|hand| hand.at.line())
    }

    pub fn picked_piece_column(&self) -> Option<u8> {
        self.hand.as_ref().map(|hand| hand.at.column())
    }

    /// Movement units left to the piece in hand. Right after landing on a
    /// piece this is the size of that piece, the budget a bounce would get.
    pub fn movement_left(&self) -> Option<u8> {
        self.hand.as_ref().map(|hand| hand.stage.budget())
    }

    /// True when the piece in hand sits on another piece and the player
    /// must choose between bouncing and swapping.
    pub fn is_decision_pending(&self) -> bool {
        matches!(
            self.hand,
            Some(Hand {
                stage: Stage::Landed { .. },
                ..
            })
        )
    }

    pub fn hand_view(&self) -> Option<HandView> {
        self.hand.as_ref().map(|hand| HandView {
            owner: hand.owner,
            size: hand.size,
            origin: hand.origin,
            line: hand.at.line(),
            column: hand.at.column(),
            movement_left: hand.stage.budget(),
            pending_decision: matches!(hand.stage, Stage::Landed { .. }),
        })
    }

    /// Pieces of `size` that `player` still has to place. 0 after setup.
    pub fn nb_pieces_available(&self, size: Size, player: Player) -> u8 {
        if self.is_setup_complete() {
            return 0;
        }
        self.setup.remaining(player, size)
    }

    pub fn snapshot(&self) -> Snapshot {
        let value = |piece: Option<Size>| piece.map_or(0, Size::value);
        Snapshot {
            phase: self.phase,
            cells: self.board.cells().map(|(_, piece)| value(piece)).collect(),
            north_goal: value(self.board.goal(Player::South)),
            south_goal: value(self.board.goal(Player::North)),
            to_place: [
                self.setup.reserves(Player::South),
                self.setup.reserves(Player::North),
            ],
            hand: self.hand_view(),
        }
    }

    // ========== Setup ==========

    /// Place a piece on the player's home line during setup.
    ///
    /// Errors, in this order:
    /// * `Param` if the column is off the board
    /// * `Empty` if the cell is occupied
    /// * `Forbidden` if the player has no piece of that size left to place
    ///   (in particular once setup is over)
    pub fn place_piece(&mut self, size: Size, player: Player, column: i32) -> Result<(), PlayError> {
        const OP: &str = "place_piece";
        let pos = Pos::checked(player.home_line() as i32, column)
            .ok_or_else(|| rejected(OP, PlayError::Param))?;
        if !self.board.is_empty(pos) {
            return Err(rejected(OP, PlayError::Empty));
        }
        if self.phase != Phase::Setup || !self.setup.take(player, size) {
            return Err(rejected(OP, PlayError::Forbidden));
        }

        self.board.put(pos, size);
        debug!(player = %player, column, size = size.value(), "placed piece");

        if self.setup.is_complete() {
            self.phase = Phase::Turn(Player::South);
            debug!("setup complete, South to move");
        }
        Ok(())
    }

    // ========== Playing ==========

    /// Take a piece off the board to start a move.
    ///
    /// Errors, in this order:
    /// * `Forbidden` if setup is not over, the game is won, or a piece is
    ///   already in hand
    /// * `Param` if the coordinates are off the board
    /// * `Empty` if the cell is empty
    /// * `Forbidden` if it is not `player`'s turn or the piece is not on the
    ///   occupied line closest to `player`'s edge
    pub fn pick_piece(&mut self, player: Player, line: i32, column: i32) -> Result<(), PlayError> {
        const OP: &str = "pick_piece";
        let to_move = match self.phase {
            Phase::Turn(p) if self.hand.is_none() => p,
            _ => return Err(rejected(OP, PlayError::Forbidden)),
        };
        let pos = Pos::checked(line, column).ok_or_else(|| rejected(OP, PlayError::Param))?;
        let size = self.board.cell(pos).ok_or_else(|| rejected(OP, PlayError::Empty))?;
        if to_move != player || self.board.closest_occupied_line(player) != Some(pos.line()) {
            return Err(rejected(OP, PlayError::Forbidden));
        }

        self.board.take(pos);
        self.hand = Some(Hand::new(player, size, pos));
        debug!(player = %player, line, column, size = size.value(), "picked piece");
        Ok(())
    }

    /// Whether the piece in hand may step in `direction` now.
    ///
    /// `Goal` requires standing on the line next to the opponent's goal with
    /// exactly one unit left. A cardinal step must stay on the board, must
    /// not undo the previous step (landing on a piece clears that), and may
    /// only end on an occupied cell when it is the last unit of movement.
    pub fn is_move_possible(&self, direction: Direction) -> bool {
        self.hand
            .as_ref()
            .is_some_and(|hand| hand.target(&self.board, direction).is_ok())
    }

    /// Directions currently accepted by `move_piece`, goal first.
    pub fn legal_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        std::iter::once(Direction::Goal)
            .chain(Direction::cardinals())
            .filter(move |&direction| self.is_move_possible(direction))
    }

    /// Step the piece in hand. A step onto a piece leaves the player to
    /// decide: another `move_piece` bounces, `swap_piece` swaps.
    ///
    /// Errors, in this order:
    /// * `Empty` if no piece is in hand
    /// * `Param` if the target cell is off the board
    /// * `Forbidden` if the step breaks a rule (backtracking, colliding
    ///   before the last unit, entering the goal from the wrong place)
    pub fn move_piece(&mut self, direction: Direction) -> Result<(), PlayError> {
        const OP: &str = "move_piece";
        let Some(hand) = self.hand.as_mut() else {
            return Err(rejected(OP, PlayError::Empty));
        };
        let target = hand
            .target(&self.board, direction)
            .map_err(|err| rejected(OP, err))?;

        match target {
            Target::Goal => {
                let (owner, size) = (hand.owner, hand.size);
                self.hand = None;
                self.board.enter_goal(owner, size);
                self.phase = Phase::Finished(owner);
                debug!(player = %owner, size = size.value(), "piece entered the goal");
            }
            Target::Free(pos) => {
                let left = hand.stage.budget() - 1;
                if left == 0 {
                    let (owner, size) = (hand.owner, hand.size);
                    self.hand = None;
                    self.board.put(pos, size);
                    self.phase = Phase::Turn(owner.opponent());
                    debug!(player = %owner, line = pos.line(), column = pos.column(), "piece came to rest");
                } else {
                    hand.advance(direction, pos, Stage::Moving { left });
                    debug!(?direction, left, "stepped");
                }
            }
            Target::Bounce(pos, under) => {
                hand.advance(direction, pos, Stage::Landed { under });
                debug!(?direction, line = pos.line(), column = pos.column(), under = under.value(), "landed on a piece");
            }
        }
        Ok(())
    }

    /// Instead of bouncing, take the place of the piece landed on and drop
    /// that piece on (target_line, target_column). Ends the turn.
    ///
    /// Errors, in this order:
    /// * `Empty` if the piece in hand has not just landed on another piece
    /// * `Param` if the target is off the board
    /// * `Forbidden` if the target is occupied
    pub fn swap_piece(&mut self, target_line: i32, target_column: i32) -> Result<(), PlayError> {
        const OP: &str = "swap_piece";
        let (owner, size, landing, under) = match &self.hand {
            Some(Hand {
                owner,
                size,
                at,
                stage: Stage::Landed { under },
                ..
            }) => (*owner, *size, *at, *under),
            _ => return Err(rejected(OP, PlayError::Empty)),
        };
        let target = Pos::checked(target_line, target_column)
            .ok_or_else(|| rejected(OP, PlayError::Param))?;
        if !self.board.is_empty(target) {
            return Err(rejected(OP, PlayError::Forbidden));
        }

        self.hand = None;
        self.board.set_cell(landing, Some(size));
        self.board.put(target, under);
        self.phase = Phase::Turn(owner.opponent());
        debug!(
            player = %owner,
            landing = %landing,
            target = %target,
            "swapped pieces"
        );
        Ok(())
    }

    /// Put the piece in hand back where it was picked. The same player
    /// keeps the turn.
    pub fn cancel_movement(&mut self) -> Result<(), PlayError> {
        let hand = self
            .hand
            .take()
            .ok_or_else(|| rejected("cancel_movement", PlayError::Empty))?;
        self.board.put(hand.origin, hand.size);
        debug!(player = %hand.owner, origin = %hand.origin, "movement cancelled");
        Ok(())
    }

    /// Undo the last step of the current move, or the pick itself when no
    /// step was taken.
    pub fn cancel_step(&mut self) -> Result<(), PlayError> {
        let Some(hand) = self.hand.as_mut() else {
            return Err(rejected("cancel_step", PlayError::Empty));
        };
        let Some(step) = hand.history.pop() else {
            return self.cancel_movement();
        };
        hand.at = step.from;
        hand.stage = step.stage;
        hand.last = step.last;
        debug!(at = %hand.at, left = hand.stage.budget(), "step cancelled");
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// The board followed by one status line.
impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        match self.phase {
            Phase::Setup => write!(f, "setup: {} pieces to place", self.setup.total_remaining())?,
            Phase::Turn(player) => write!(f, "{} to move", player)?,
            Phase::Finished(player) => write!(f, "{} wins", player)?,
        }
        if let Some(hand) = self.hand_view() {
            write!(
                f,
                " | holding size {} at ({},{}), {} left{}",
                hand.size.value(),
                hand.line,
                hand.column,
                hand.movement_left,
                if hand.pending_decision { ", bounce or swap" } else { "" }
            )?;
        }
        Ok(())
    }
}
