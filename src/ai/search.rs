use tracing::debug;
use web_time::{Duration, Instant};

use crate::board::Board;
use crate::movegen::successors;
use crate::types::Side;

const MIN_SCORE: f64 = f64::NEG_INFINITY;
const MAX_SCORE: f64 = f64::INFINITY;

/// Plain fixed-depth minimax without pruning.
///
/// `side` is the side to move; `B` maximizes and `A` minimizes. Returns the
/// extremal score and the successor board that reaches it. At a leaf (depth 0,
/// a decided game, or a side with no legal move) the board itself is returned.
/// Among equal scores the last enumerated successor wins.
pub fn minimax(board: &Board, depth: u8, side: Side) -> (f64, Board) {
    let mut nodes = 0;
    minimax_counted(board, depth, side, &mut nodes)
}

fn minimax_counted(board: &Board, depth: u8, side: Side, nodes: &mut u64) -> (f64, Board) {
    *nodes += 1;

    if depth == 0 || board.winner().is_some() {
        return (board.evaluate(), *board);
    }

    let candidates = successors(board, side);
    if candidates.is_empty() {
        return (board.evaluate(), *board);
    }

    let maximizing = side.is_maximizing();
    let mut best_score = if maximizing { MIN_SCORE } else { MAX_SCORE };
    let mut best_board = candidates[0];

    for candidate in candidates {
        let (score, _) = minimax_counted(&candidate, depth - 1, side.opponent(), nodes);
        if is_better_or_equal(score, best_score, maximizing) {
            best_score = score;
            best_board = candidate;
        }
    }

    (best_score, best_board)
}

fn is_better_or_equal(score: f64, best_score: f64, maximizing: bool) -> bool {
    if maximizing {
        score >= best_score
    } else {
        score <= best_score
    }
}

/// Result of one [`Searcher::search`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub score: f64,
    pub board: Board,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Depth-bounded searcher that records node counts and timing per call.
pub struct Searcher {
    max_depth: u8,
    last_nodes: u64,
}

impl Searcher {
    pub fn new(max_depth: u8) -> Self {
        Self {
            max_depth,
            last_nodes: 0,
        }
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Nodes visited by the previous search.
    pub fn last_nodes(&self) -> u64 {
        self.last_nodes
    }

    /// Runs to completion; the caller blocks until the whole tree is expanded.
    pub fn search(&mut self, board: &Board, side: Side) -> SearchOutcome {
        let start_time = Instant::now();
        let mut nodes = 0;

        let (score, best) = minimax_counted(board, self.max_depth, side, &mut nodes);

        let elapsed = start_time.elapsed();
        self.last_nodes = nodes;
        debug!(
            ?side,
            depth = self.max_depth,
            score,
            nodes,
            elapsed_ms = elapsed.as_millis() as u64,
            "minimax search finished"
        );

        SearchOutcome {
            score,
            board: best,
            nodes,
            elapsed,
        }
    }
}
