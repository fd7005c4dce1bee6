//! Move abstraction and generation for the linear track.
//! A throw advances one piece by the stick value; pieces already in the
//! finishing zone may overshoot straight off the board.

use crate::board;
use crate::rules::Ruleset;
use crate::state::{GameState, PieceId};

/// A candidate relocation: `piece` advances to `target`. A move is only
/// meaningful against the state it was generated from (or a copy of it).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Move {
    pub piece: PieceId,
    pub target: u8,
}

impl Move {
    /// Relocate the piece and fire the destination cell's landing hook
    /// against the given state. Targets past the track have no cell and
    /// therefore no hook. Unknown piece ids leave the state untouched.
    pub fn execute(&self, state: &mut GameState) {
        if state.piece(self.piece).is_none() {
            return;
        }
        state.set_position(self.piece, self.target);
        if let Some(cell) = board::cell_at(self.target) {
            cell.on_land(self.piece, state);
        }
    }
}

/// All legal moves for `player` given a resolved stick value, in arena
/// order. An empty result means the throw is blocked and the turn passes;
/// it is a legitimate outcome, not an error.
pub fn generate_moves(
    state: &GameState,
    player: u8,
    stick: u8,
    rules: &dyn Ruleset,
) -> Vec<Move> {
    let mut moves = Vec::new();
    for (id, piece) in state.pieces_owned_by(player) {
        if piece.is_finished() {
            continue;
        }
        let target = piece.position + stick;
        let in_finish_zone = piece.position >= board::FINISH_ZONE_START;
        if target <= board::LAST_POSITION || in_finish_zone {
            let candidate = Move { piece: id, target };
            if rules.is_legal(&candidate, state) {
                moves.push(candidate);
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellEffect;
    use crate::rules::Permissive;
    use crate::state::Piece;

    struct RejectAll;

    impl Ruleset for RejectAll {
        fn is_legal(&self, _mv: &Move, _state: &GameState) -> bool {
            false
        }
    }

    fn two_sided(ai: &[u8], human: &[u8]) -> GameState {
        let mut pieces = Vec::new();
        pieces.extend(ai.iter().map(|&p| Piece::new(0, p)));
        pieces.extend(human.iter().map(|&p| Piece::new(1, p)));
        GameState::new(&pieces).unwrap()
    }

    #[test]
    fn test_finishing_throw_from_28() {
        let state = two_sided(&[28], &[5]);
        let moves = generate_moves(&state, 0, 3, &Permissive);
        assert_eq!(moves, vec![Move { piece: 0, target: 31 }]);
    }

    #[test]
    fn test_overshoot_allowed_from_finish_zone() {
        // 30 + 5 = 35, far past the last position, still a finish.
        let state = two_sided(&[30], &[5]);
        let moves = generate_moves(&state, 0, 5, &Permissive);
        assert_eq!(moves, vec![Move { piece: 0, target: 35 }]);
    }

    #[test]
    fn test_finished_pieces_do_not_move() {
        let state = two_sided(&[31, 10], &[5]);
        let moves = generate_moves(&state, 0, 2, &Permissive);
        assert_eq!(moves, vec![Move { piece: 1, target: 12 }]);
    }

    #[test]
    fn test_all_finished_yields_pass() {
        let state = two_sided(&[31, 33], &[5]);
        assert!(generate_moves(&state, 0, 4, &Permissive).is_empty());
    }

    #[test]
    fn test_generation_order_is_arena_order() {
        let state = two_sided(&[10, 4, 22], &[5]);
        let moves = generate_moves(&state, 0, 2, &Permissive);
        let targets: Vec<u8> = moves.iter().map(|m| m.target).collect();
        assert_eq!(targets, vec![12, 6, 24]);
    }

    #[test]
    fn test_legality_oracle_filters_candidates() {
        let state = two_sided(&[10, 4], &[5]);
        assert!(generate_moves(&state, 0, 2, &RejectAll).is_empty());
    }

    #[test]
    fn test_execute_fires_landing_hook() {
        let mut state = two_sided(&[13], &[5]);
        Move { piece: 0, target: 15 }.execute(&mut state);
        assert_eq!(state.piece(0).unwrap().position, 15);
        let marker = state.pending(CellEffect::ExtraTurn).unwrap();
        assert_eq!((marker.piece, marker.player), (0, 0));
    }

    #[test]
    fn test_execute_off_board_has_no_hook() {
        let mut state = two_sided(&[28], &[5]);
        Move { piece: 0, target: 31 }.execute(&mut state);
        assert_eq!(state.piece(0).unwrap().position, 31);
        assert!(state.pending(CellEffect::Rethrow).is_none());
        assert!(state.pending(CellEffect::ExtraTurn).is_none());
        assert!(state.pending(CellEffect::MustRepeat).is_none());
    }
}
