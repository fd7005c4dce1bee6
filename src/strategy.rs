//! Pluggable move-selection strategies, and the player identity that owns
//! one. Strategies are interchangeable at configuration time; the search
//! engine is just the strongest of them.

use crate::movegen::{generate_moves, Move};
use crate::rules::{Permissive, Ruleset};
use crate::search::{SearchConfig, SearchResult, Searcher};
use crate::state::GameState;

/// A move-selection capability: given the live state, the player index
/// and the rolled stick value, pick a move or pass (`None`).
pub trait MoveStrategy {
    fn choose_move(&self, state: &GameState, player: u8, stick: u8) -> Option<Move>;
}

/// The automated strategy: finite-horizon expectiminimax over snapshot
/// copies.
pub struct Expectiminimax {
    rules: Box<dyn Ruleset>,
    cfg: SearchConfig,
}

impl Expectiminimax {
    pub fn new(cfg: SearchConfig) -> Self {
        Self::with_rules(Box::new(Permissive), cfg)
    }

    pub fn with_rules(rules: Box<dyn Ruleset>, cfg: SearchConfig) -> Self {
        Expectiminimax { rules, cfg }
    }

    /// Full search result, including per-candidate analysis and
    /// diagnostics; `choose_move` is this minus everything but the move.
    pub fn search(&self, state: &GameState, player: u8, stick: u8) -> SearchResult {
        Searcher::new(self.rules.as_ref(), self.cfg).choose_move(state, player, stick)
    }
}

impl MoveStrategy for Expectiminimax {
    fn choose_move(&self, state: &GameState, player: u8, stick: u8) -> Option<Move> {
        self.search(state, player, stick).best
    }
}

/// Baseline strategy: the first legal candidate, no lookahead. Kept as
/// the cheap opponent for strength comparisons.
pub struct FirstLegal {
    rules: Box<dyn Ruleset>,
}

impl FirstLegal {
    pub fn new() -> Self {
        FirstLegal { rules: Box::new(Permissive) }
    }
}

impl Default for FirstLegal {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveStrategy for FirstLegal {
    fn choose_move(&self, state: &GameState, player: u8, stick: u8) -> Option<Move> {
        generate_moves(state, player, stick, self.rules.as_ref())
            .into_iter()
            .next()
    }
}

/// Configuration-time registry mapping strategy names to implementations.
pub fn strategy_by_name(name: &str, cfg: SearchConfig) -> Option<Box<dyn MoveStrategy>> {
    match name {
        "expectiminimax" => Some(Box::new(Expectiminimax::new(cfg))),
        "first-legal" => Some(Box::new(FirstLegal::new())),
        _ => None,
    }
}

/// A named participant and the strategy that picks its moves. Identity is
/// immutable once created; states refer to players by index only.
pub struct Player {
    name: String,
    strategy: Box<dyn MoveStrategy>,
}

impl Player {
    pub fn new(name: impl Into<String>, strategy: Box<dyn MoveStrategy>) -> Self {
        Player { name: name.into(), strategy }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delegate the turn to this player's strategy.
    pub fn play(&self, state: &GameState, player_index: u8, stick: u8) -> Option<Move> {
        self.strategy.choose_move(state, player_index, stick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Piece;

    fn two_sided(ai: &[u8], human: &[u8]) -> GameState {
        let mut pieces = Vec::new();
        pieces.extend(ai.iter().map(|&p| Piece::new(0, p)));
        pieces.extend(human.iter().map(|&p| Piece::new(1, p)));
        GameState::new(&pieces).unwrap()
    }

    #[test]
    fn test_registry_knows_its_strategies() {
        let cfg = SearchConfig::default();
        assert!(strategy_by_name("expectiminimax", cfg).is_some());
        assert!(strategy_by_name("first-legal", cfg).is_some());
        assert!(strategy_by_name("grandmaster", cfg).is_none());
    }

    #[test]
    fn test_first_legal_takes_the_first_candidate() {
        let state = two_sided(&[10, 28], &[5]);
        let mv = FirstLegal::new().choose_move(&state, 0, 3).unwrap();
        assert_eq!((mv.piece, mv.target), (0, 13));
    }

    #[test]
    fn test_expectiminimax_agrees_with_its_search() {
        let state = two_sided(&[10, 28], &[5, 12]);
        let strategy = Expectiminimax::new(SearchConfig::default());
        let chosen = strategy.choose_move(&state, 0, 3);
        let searched = strategy.search(&state, 0, 3).best;
        assert_eq!(chosen, searched);
    }

    #[test]
    fn test_strategies_disagree_where_lookahead_matters() {
        // First-legal pushes the laggard; search takes the finish.
        let state = two_sided(&[10, 28], &[5, 12]);
        let greedy = FirstLegal::new().choose_move(&state, 0, 3).unwrap();
        let searched = Expectiminimax::new(SearchConfig::default())
            .choose_move(&state, 0, 3)
            .unwrap();
        assert_eq!(greedy.target, 13);
        assert_eq!(searched.target, 31);
    }

    #[test]
    fn test_player_delegates_to_strategy() {
        let state = two_sided(&[28], &[5]);
        let player = Player::new("bot", Box::new(Expectiminimax::new(SearchConfig::default())));
        assert_eq!(player.name(), "bot");
        let mv = player.play(&state, 0, 3).unwrap();
        assert_eq!(mv.target, 31);
    }
}
