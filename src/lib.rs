//! WASM entry point — single exported function that accepts JSON, runs
//! the configured strategy for the AI side, returns JSON. Called from the
//! game's AI worker.

pub mod board;
pub mod eval;
pub mod movegen;
pub mod rules;
pub mod search;
pub mod state;
pub mod strategy;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::movegen::Move;
use crate::search::{SearchConfig, SearchResult, TraceEntry, DEFAULT_DEPTH};
use crate::state::{GameState, Piece, StateError};
use crate::strategy::{Expectiminimax, MoveStrategy};

/// Player indices at the boundary: the engine always decides for the AI.
const AI_PLAYER: u8 = 0;
const HUMAN_PLAYER: u8 = 1;

// =====================================================================
// Serde types matching the JS worker message format
// =====================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput {
    /// Track positions of the AI side's pieces, in slot order.
    ai_pieces: Vec<u8>,
    /// Track positions of the human side's pieces.
    human_pieces: Vec<u8>,
    /// The already-rolled stick value (1..=5).
    stick_value: u8,
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    time_budget: Option<f64>,
    #[serde(default)]
    strategy: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisEntry {
    piece: i32,
    from: i32,
    to: i32,
    score: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceLine {
    kind: &'static str,
    depth: u32,
    value: i32,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchOutput {
    /// Slot index into `aiPieces` of the piece to move; -1 means pass.
    piece: i32,
    from: i32,
    to: i32,
    best_score: i32,
    depth: u32,
    nodes: u32,
    analysis: Vec<AnalysisEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<TraceLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SearchOutput {
    fn pass() -> Self {
        SearchOutput { piece: -1, from: -1, to: -1, ..SearchOutput::default() }
    }

    fn failed(message: String) -> Self {
        SearchOutput { error: Some(message), ..SearchOutput::pass() }
    }
}

// =====================================================================
// WASM exported function
// =====================================================================

#[wasm_bindgen]
pub fn wasm_choose_move(input_json: &str) -> String {
    let output = match serde_json::from_str::<SearchInput>(input_json) {
        Ok(input) => run(&input),
        Err(e) => SearchOutput::failed(format!("bad input: {}", e)),
    };
    serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
}

fn run(input: &SearchInput) -> SearchOutput {
    if !(1..=5).contains(&input.stick_value) {
        return SearchOutput::failed(format!("stick value {} out of range", input.stick_value));
    }

    let state = match build_state(input) {
        Ok(state) => state,
        Err(e) => return SearchOutput::failed(e.to_string()),
    };

    let cfg = SearchConfig {
        depth: input.depth.unwrap_or(DEFAULT_DEPTH),
        verbose: input.verbose,
        deadline_ms: input.time_budget,
    };

    match input.strategy.as_deref().unwrap_or("expectiminimax") {
        // The full engine also reports analysis and diagnostics.
        "expectiminimax" => {
            let result = Expectiminimax::new(cfg).search(&state, AI_PLAYER, input.stick_value);
            render_result(&state, result)
        }
        name => match strategy::strategy_by_name(name, cfg) {
            Some(chosen) => {
                let mv = chosen.choose_move(&state, AI_PLAYER, input.stick_value);
                render_move(&state, mv)
            }
            None => SearchOutput::failed(format!("unknown strategy: {}", name)),
        },
    }
}

fn build_state(input: &SearchInput) -> Result<GameState, StateError> {
    // AI pieces occupy the first arena slots, so piece id == aiPieces index.
    let mut pieces = Vec::with_capacity(input.ai_pieces.len() + input.human_pieces.len());
    pieces.extend(input.ai_pieces.iter().map(|&p| Piece::new(AI_PLAYER, p)));
    pieces.extend(input.human_pieces.iter().map(|&p| Piece::new(HUMAN_PLAYER, p)));
    GameState::new(&pieces)
}

fn render_move(state: &GameState, mv: Option<Move>) -> SearchOutput {
    let mut output = SearchOutput::pass();
    if let Some(mv) = mv {
        output.piece = mv.piece as i32;
        output.from = state
            .piece(mv.piece)
            .map(|p| p.position as i32)
            .unwrap_or(-1);
        output.to = mv.target as i32;
    }
    output
}

fn render_result(state: &GameState, result: SearchResult) -> SearchOutput {
    let mut output = render_move(state, result.best);
    output.best_score = result.best_score;
    output.depth = result.depth;
    output.nodes = result.nodes;
    output.analysis = result
        .analysis
        .iter()
        .map(|&(mv, score)| AnalysisEntry {
            piece: mv.piece as i32,
            from: state
                .piece(mv.piece)
                .map(|p| p.position as i32)
                .unwrap_or(-1),
            to: mv.target as i32,
            score,
        })
        .collect();
    output.analysis.sort_by(|a, b| b.score.cmp(&a.score));
    if !result.trace.is_empty() {
        output.trace = Some(result.trace.iter().map(TraceLine::from).collect());
    }
    output
}

impl From<&TraceEntry> for TraceLine {
    fn from(entry: &TraceEntry) -> Self {
        TraceLine {
            kind: entry.kind.as_str(),
            depth: entry.depth,
            value: entry.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn call(input: &str) -> Value {
        serde_json::from_str(&wasm_choose_move(input)).expect("output must be valid JSON")
    }

    #[test]
    fn test_round_trip_chooses_a_move() {
        let out = call(r#"{"aiPieces":[10,28],"humanPieces":[5,12],"stickValue":3}"#);
        assert!(out.get("error").is_none());
        // The finishing move from 28 wins the analysis.
        assert_eq!(out["piece"], 1);
        assert_eq!(out["from"], 28);
        assert_eq!(out["to"], 31);
        assert!(out["nodes"].as_u64().unwrap() > 0);
        assert_eq!(out["analysis"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_single_candidate_via_boundary() {
        let out = call(r#"{"aiPieces":[28],"humanPieces":[5],"stickValue":3}"#);
        assert_eq!(out["to"], 31);
        assert_eq!(out["nodes"], 0);
    }

    #[test]
    fn test_blocked_throw_reports_pass() {
        let out = call(r#"{"aiPieces":[31,33],"humanPieces":[5],"stickValue":2}"#);
        assert_eq!(out["piece"], -1);
        assert!(out.get("error").is_none());
    }

    #[test]
    fn test_malformed_input_reports_error() {
        let out = call("{not json");
        assert!(out["error"].as_str().unwrap().starts_with("bad input"));
        assert_eq!(out["piece"], -1);
    }

    #[test]
    fn test_empty_setup_is_rejected() {
        let out = call(r#"{"aiPieces":[],"humanPieces":[],"stickValue":1}"#);
        assert!(out.get("error").is_some());
    }

    #[test]
    fn test_stick_range_is_enforced() {
        let out = call(r#"{"aiPieces":[4],"humanPieces":[9],"stickValue":6}"#);
        assert!(out["error"].as_str().unwrap().contains("stick value"));
    }

    #[test]
    fn test_trace_only_when_verbose() {
        let quiet = call(r#"{"aiPieces":[10,20],"humanPieces":[5,12],"stickValue":2}"#);
        assert!(quiet.get("trace").is_none());
        let chatty =
            call(r#"{"aiPieces":[10,20],"humanPieces":[5,12],"stickValue":2,"verbose":true}"#);
        assert!(!chatty["trace"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_strategy_selection() {
        let greedy =
            call(r#"{"aiPieces":[10,28],"humanPieces":[5],"stickValue":3,"strategy":"first-legal"}"#);
        assert_eq!(greedy["to"], 13);
        let unknown =
            call(r#"{"aiPieces":[10],"humanPieces":[5],"stickValue":3,"strategy":"oracle"}"#);
        assert!(unknown["error"].as_str().unwrap().contains("unknown strategy"));
    }

    #[test]
    fn test_analysis_is_sorted_best_first() {
        let out = call(r#"{"aiPieces":[4,17,28],"humanPieces":[9,26],"stickValue":2}"#);
        let scores: Vec<i64> = out["analysis"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["score"].as_i64().unwrap())
            .collect();
        let mut sorted = scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
    }
}
