//! Static evaluation — positional heuristic scored from one player's
//! perspective. Every term is mirrored with flipped sign for the
//! opponent, so the score is exactly antisymmetric between the two sides.

use crate::board;
use crate::state::GameState;

// Evaluation weights. Tuned jointly: no sum of positional terms can
// outrank a decided game.
const W_WIN: i32 = 10_000;
const W_ADVANCE: i32 = 1;
const W_STRATEGIC: i32 = 50;
const ENDGAME_BASE: i32 = 20;
const ENDGAME_STEP: i32 = 15;
const LAG_HEAVY: i32 = 30;
const LAG_MEDIUM: i32 = 20;
const LAG_LIGHT: i32 = 10;

/// Score `state` for `perspective` (higher is better). Purely a function
/// of piece positions; no randomness, no hidden state.
pub fn evaluate(state: &GameState, perspective: u8) -> i32 {
    let mut score = 0;
    for piece in state.pieces() {
        let term = piece_term(piece.position);
        if piece.owner == perspective {
            score += term;
        } else {
            score -= term;
        }
    }
    score
}

/// Contribution of a single piece at `position`, before the owner sign.
fn piece_term(position: u8) -> i32 {
    if position > board::LAST_POSITION {
        return W_WIN;
    }
    let pos = position as i32;
    let mut term = pos * W_ADVANCE * zone_multiplier(position);
    if board::STRATEGIC_CELLS.contains(&position) {
        term += W_STRATEGIC;
    }
    if position >= board::FINISH_ZONE_START {
        // Escalates from 35 at position 26 up to 95 at position 30.
        term += ENDGAME_BASE + (pos - 25) * ENDGAME_STEP;
    }
    term - lag_penalty(position)
}

/// Advancement into the final third counts double.
#[inline]
fn zone_multiplier(position: u8) -> i32 {
    if position >= 20 {
        2
    } else {
        1
    }
}

/// Penalty for pieces still stuck near the start, heaviest at the very
/// first cells. Positive for own pieces, a bonus when it is the
/// opponent's piece lagging.
fn lag_penalty(position: u8) -> i32 {
    if position >= 10 {
        0
    } else if position <= 3 {
        LAG_HEAVY
    } else if position <= 6 {
        LAG_MEDIUM
    } else {
        LAG_LIGHT
    }
}
