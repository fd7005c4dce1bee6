//! Game state: a plain-old-data snapshot of piece positions, the turn
//! index, and pending special-cell markers. The snapshot is `Copy`, so
//! search explores hypothetical lines by copying it; a copy can never
//! alias the pieces of the state it came from.

use std::fmt;

use crate::board::{self, Cell, CellEffect};

/// Fixed two-player game.
pub const NUM_PLAYERS: u8 = 2;

/// Piece arena capacity. Classic setups field 5 or 7 pieces per side.
pub const MAX_PIECES: usize = 16;

/// Stable index into the piece arena. Ids survive snapshot copies, which
/// is what makes replaying a move against a copy sound.
pub type PieceId = u8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub owner: u8,
    pub position: u8,
}

impl Piece {
    pub fn new(owner: u8, position: u8) -> Self {
        Piece { owner, position }
    }

    /// A piece past the last track position has left the board.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.position > board::LAST_POSITION
    }
}

/// A special-cell trigger awaiting resolution by the turn driver.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PendingEffect {
    pub piece: PieceId,
    pub player: u8,
}

/// Construction-time precondition failures. The engine refuses to search
/// an invalid state rather than guard for one at every node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StateError {
    NoPieces,
    TooManyPieces,
    BadOwner { piece: usize, owner: u8 },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NoPieces => write!(f, "a game needs at least one piece"),
            StateError::TooManyPieces => {
                write!(f, "piece arena holds at most {} pieces", MAX_PIECES)
            }
            StateError::BadOwner { piece, owner } => {
                write!(f, "piece {} names owner {} out of {} players", piece, owner, NUM_PLAYERS)
            }
        }
    }
}

impl std::error::Error for StateError {}

#[derive(Clone, Copy)]
pub struct GameState {
    pieces: [Piece; MAX_PIECES],
    piece_count: u8,
    current: u8,
    pending_rethrow: Option<PendingEffect>,
    pending_extra_turn: Option<PendingEffect>,
    pending_repeat: Option<PendingEffect>,
}

impl GameState {
    /// Build the initial snapshot. Fails fast on malformed setups: no
    /// pieces, arena overflow, or an owner outside the fixed player pair.
    pub fn new(pieces: &[Piece]) -> Result<GameState, StateError> {
        if pieces.is_empty() {
            return Err(StateError::NoPieces);
        }
        if pieces.len() > MAX_PIECES {
            return Err(StateError::TooManyPieces);
        }
        let mut arena = [Piece::new(0, 0); MAX_PIECES];
        for (i, piece) in pieces.iter().enumerate() {
            if piece.owner >= NUM_PLAYERS {
                return Err(StateError::BadOwner { piece: i, owner: piece.owner });
            }
            arena[i] = *piece;
        }
        Ok(GameState {
            pieces: arena,
            piece_count: pieces.len() as u8,
            current: 0,
            pending_rethrow: None,
            pending_extra_turn: None,
            pending_repeat: None,
        })
    }

    /// Live pieces, in stable arena order.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces[..self.piece_count as usize]
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<Piece> {
        self.pieces().get(id as usize).copied()
    }

    pub fn set_position(&mut self, id: PieceId, position: u8) {
        let count = self.piece_count as usize;
        if let Some(piece) = self.pieces[..count].get_mut(id as usize) {
            piece.position = position;
        }
    }

    /// Ids and pieces owned by `player`, in arena order.
    pub fn pieces_owned_by(&self, player: u8) -> impl Iterator<Item = (PieceId, Piece)> + '_ {
        self.pieces()
            .iter()
            .enumerate()
            .filter(move |(_, piece)| piece.owner == player)
            .map(|(id, piece)| (id as PieceId, *piece))
    }

    /// First live piece matching `(owner, position)`. Used when a move is
    /// replayed against a snapshot copy; with the arena this is a
    /// consistency check more than a lookup, but the contract stands.
    pub fn resolve_piece(&self, owner: u8, position: u8) -> Option<PieceId> {
        self.pieces()
            .iter()
            .position(|piece| piece.owner == owner && piece.position == position)
            .map(|id| id as PieceId)
    }

    /// Bounds-checked board lookup, `None` off the track.
    #[inline]
    pub fn cell_at(&self, index: u8) -> Option<&'static Cell> {
        board::cell_at(index)
    }

    #[inline]
    pub fn current_player_index(&self) -> u8 {
        self.current
    }

    /// Round-robin turn handover.
    #[inline]
    pub fn advance_turn(&mut self) {
        self.current = (self.current + 1) % NUM_PLAYERS;
    }

    /// The player with every piece off the board, if any. A side with no
    /// pieces at all has not finished anything and cannot win this way.
    pub fn winner(&self) -> Option<u8> {
        (0..NUM_PLAYERS).find(|&player| {
            let mut owned = self.pieces().iter().filter(|p| p.owner == player).peekable();
            owned.peek().is_some() && owned.all(|p| p.is_finished())
        })
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Record a pending effect marker for `piece` (owner derived from the
    /// arena). Unknown ids are ignored.
    pub fn mark_pending(&mut self, effect: CellEffect, piece: PieceId) {
        let owner = match self.piece(piece) {
            Some(p) => p.owner,
            None => return,
        };
        *self.pending_slot(effect) = Some(PendingEffect { piece, player: owner });
    }

    #[inline]
    pub fn pending(&self, effect: CellEffect) -> Option<PendingEffect> {
        match effect {
            CellEffect::Rethrow => self.pending_rethrow,
            CellEffect::ExtraTurn => self.pending_extra_turn,
            CellEffect::MustRepeat => self.pending_repeat,
        }
    }

    pub fn clear_pending(&mut self, effect: CellEffect) {
        *self.pending_slot(effect) = None;
    }

    fn pending_slot(&mut self, effect: CellEffect) -> &mut Option<PendingEffect> {
        match effect {
            CellEffect::Rethrow => &mut self.pending_rethrow,
            CellEffect::ExtraTurn => &mut self.pending_extra_turn,
            CellEffect::MustRepeat => &mut self.pending_repeat,
        }
    }

    /// Remove a piece from play (swap-remove). Markers naming the removed
    /// piece are dropped; markers naming the relocated last slot follow it.
    pub fn remove_piece(&mut self, id: PieceId) {
        if id >= self.piece_count {
            return;
        }
        let last = self.piece_count - 1;
        self.pieces[id as usize] = self.pieces[last as usize];
        self.piece_count = last;
        for slot in [
            &mut self.pending_rethrow,
            &mut self.pending_extra_turn,
            &mut self.pending_repeat,
        ] {
            if let Some(marker) = slot {
                if marker.piece == id {
                    *slot = None;
                } else if marker.piece == last {
                    marker.piece = id;
                }
            }
        }
    }
}
