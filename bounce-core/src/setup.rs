//! Placement counters for the setup phase.

use crate::{Player, Size, NB_INITIAL_PIECES, NB_PLAYERS, NB_SIZE};

/// Remaining pieces to place, per player and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Setup {
    remaining: [[u8; NB_SIZE]; NB_PLAYERS],
}

impl Setup {
    /// Every player still holds `NB_INITIAL_PIECES` of each size.
    pub fn new() -> Setup {
        Setup {
            remaining: [[NB_INITIAL_PIECES; NB_SIZE]; NB_PLAYERS],
        }
    }

    /// Pieces of `size` that `player` still has to place.
    #[inline]
    pub fn remaining(&self, player: Player, size: Size) -> u8 {
        self.remaining[player.index()][size.index()]
    }

    /// Reserve counts for a player as [one, two, three].
    #[inline]
    pub fn reserves(&self, player: Player) -> [u8; NB_SIZE] {
        self.remaining[player.index()]
    }

    /// Pieces still to place across both players.
    pub fn total_remaining(&self) -> u8 {
        self.remaining.iter().flatten().sum()
    }

    /// True once every piece has been placed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.total_remaining() == 0
    }

    /// Consume one piece from the reserve. Returns false if none is left.
    pub fn take(&mut self, player: Player, size: Size) -> bool {
        let slot = &mut self.remaining[player.index()][size.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::new()
    }
}
