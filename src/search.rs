//! Expectiminimax search over snapshot copies: decision nodes alternate
//! with chance nodes that average over the stick-throw distribution, down
//! to a fixed horizon scored by the static evaluation.

use crate::eval::evaluate;
use crate::movegen::{generate_moves, Move};
use crate::rules::Ruleset;
use crate::state::GameState;

/// Stick-throw distribution: value `i + 1` falls with `STICK_PROBS[i]`.
/// Models a four-binary-stick throw; the weights sum to exactly 1.
pub static STICK_PROBS: [f64; 5] = [0.25, 0.375, 0.25, 0.0625, 0.0625];

/// Search horizon in plies. The root candidate consumes the first.
pub const DEFAULT_DEPTH: u32 = 3;

/// Get current time in milliseconds (via js_sys in WASM, or std in native).
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

// =====================================================================
// Configuration and result structures
// =====================================================================

/// Knobs for one searcher. Explicit construction-time values, never
/// process-wide state; repeated searches with different settings cannot
/// interfere.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Search horizon in plies.
    pub depth: u32,
    /// Record a node-by-node trace in the result. Observational only.
    pub verbose: bool,
    /// Optional wall-clock budget in ms. Once exceeded, nodes return the
    /// static evaluation instead of recursing further.
    pub deadline_ms: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            verbose: false,
            deadline_ms: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeKind {
    Chance,
    Max,
    Min,
    Leaf,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Chance => "chance",
            NodeKind::Max => "max",
            NodeKind::Min => "min",
            NodeKind::Leaf => "leaf",
        }
    }
}

/// One visited node, for human-readable explanation of a decision.
#[derive(Clone, Copy, Debug)]
pub struct TraceEntry {
    pub kind: NodeKind,
    pub depth: u32,
    pub value: i32,
}

/// Result of the root search.
pub struct SearchResult {
    /// Chosen move, `None` when the throw is blocked (pass).
    pub best: Option<Move>,
    pub best_score: i32,
    pub depth: u32,
    /// Nodes visited by the recursion; stays 0 on the fast paths.
    pub nodes: u32,
    /// Per-candidate scores, in generation order. Empty when the root
    /// skipped scoring (pass or single candidate).
    pub analysis: Vec<(Move, i32)>,
    /// Node trace, populated only when `verbose` is set.
    pub trace: Vec<TraceEntry>,
}

// =====================================================================
// Searcher
// =====================================================================

/// Owns the per-search bookkeeping: legality oracle, config, node counter
/// and trace buffer. Every exploration branch works on its own snapshot
/// copy, discarded when the node returns.
pub struct Searcher<'a> {
    rules: &'a dyn Ruleset,
    cfg: SearchConfig,
    nodes: u32,
    trace: Vec<TraceEntry>,
    started_ms: f64,
}

impl<'a> Searcher<'a> {
    pub fn new(rules: &'a dyn Ruleset, cfg: SearchConfig) -> Self {
        Searcher {
            rules,
            cfg,
            nodes: 0,
            trace: Vec::new(),
            started_ms: 0.0,
        }
    }

    /// Pick the move maximizing `player`'s expected long-run advantage
    /// given the already-rolled stick value.
    ///
    /// Blocked throw: `best` is `None` and the input state is untouched.
    /// Single candidate: returned directly, with no tree walked at all.
    pub fn choose_move(&mut self, state: &GameState, player: u8, stick: u8) -> SearchResult {
        self.nodes = 0;
        self.trace.clear();
        self.started_ms = now_ms();

        let candidates = generate_moves(state, player, stick, self.rules);
        if candidates.len() <= 1 {
            return self.finish(candidates.into_iter().next(), 0, Vec::new());
        }

        let mut best: Option<Move> = None;
        let mut best_score = 0;
        let mut analysis = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let mut child = *state;
            // Re-resolve the moving piece in the copy by (owner, position).
            // Arena ids make this a consistency check; a failure means the
            // snapshot diverged, and the candidate is skipped, not fatal.
            let piece = match state.piece(candidate.piece) {
                Some(p) => p,
                None => continue,
            };
            let resolved = match child.resolve_piece(piece.owner, piece.position) {
                Some(id) => Move { piece: id, target: candidate.target },
                None => continue,
            };
            resolved.execute(&mut child);
            child.advance_turn();
            let score = self.expected(&child, player, self.cfg.depth.saturating_sub(1));
            analysis.push((resolved, score));
            // Strict comparison: ties keep the earliest candidate.
            if best.is_none() || score > best_score {
                best = Some(resolved);
                best_score = score;
            }
        }
        self.finish(best, best_score, analysis)
    }

    fn finish(&mut self, best: Option<Move>, best_score: i32, analysis: Vec<(Move, i32)>) -> SearchResult {
        SearchResult {
            best,
            best_score,
            depth: self.cfg.depth,
            nodes: self.nodes,
            analysis,
            trace: std::mem::take(&mut self.trace),
        }
    }

    /// Expected value of `state` for `perspective` with `depth` plies to
    /// go. A chance node averages over the stick distribution; under each
    /// stick value the side to move picks its best reply (max for the
    /// perspective side, min for the opponent). A won position
    /// short-circuits before any deeper recursion.
    fn expected(&mut self, state: &GameState, perspective: u8, depth: u32) -> i32 {
        self.nodes += 1;
        if state.is_terminal() || depth == 0 || self.past_deadline() {
            let value = evaluate(state, perspective);
            self.trace_node(NodeKind::Leaf, depth, value);
            return value;
        }

        let mover = state.current_player_index();
        let maximizing = mover == perspective;
        let mut expectation = 0.0f64;
        for (i, &prob) in STICK_PROBS.iter().enumerate() {
            let stick = (i + 1) as u8;
            let moves = generate_moves(state, mover, stick, self.rules);
            let branch = if moves.is_empty() {
                // Blocked throw: the turn passes, no piece moves.
                let mut passed = *state;
                passed.advance_turn();
                self.expected(&passed, perspective, depth - 1)
            } else {
                let mut best = if maximizing { i32::MIN } else { i32::MAX };
                for mv in moves {
                    let mut child = *state;
                    mv.execute(&mut child);
                    child.advance_turn();
                    let value = self.expected(&child, perspective, depth - 1);
                    best = if maximizing { best.max(value) } else { best.min(value) };
                }
                let kind = if maximizing { NodeKind::Max } else { NodeKind::Min };
                self.trace_node(kind, depth, best);
                best
            };
            expectation += prob * branch as f64;
        }

        // Truncation toward zero, not rounding: downstream max/min
        // comparisons work on integers.
        let value = expectation as i32;
        self.trace_node(NodeKind::Chance, depth, value);
        value
    }

    #[inline]
    fn past_deadline(&self) -> bool {
        match self.cfg.deadline_ms {
            Some(budget) => now_ms() - self.started_ms >= budget,
            None => false,
        }
    }

    #[inline]
    fn trace_node(&mut self, kind: NodeKind, depth: u32, value: i32) {
        if self.cfg.verbose {
            self.trace.push(TraceEntry { kind, depth, value });
        }
    }
}
