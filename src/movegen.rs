//! Legal move generation, including multi-jump capture chains.
//!
//! A whole chain of jumps is one ply: the generator reports the final landing
//! square together with every piece jumped on the way, in jump order. Landing
//! squares in the middle of a chain are reported as well, so a player may stop
//! early. Capturing is never mandatory.

use std::collections::BTreeMap;

use crate::board::{Board, Piece};
use crate::types::{Position, Side};

const SIDEWAYS: [i32; 2] = [-1, 1];

/// Destination -> pieces captured on the way there (empty for a simple move).
pub type MoveMap = BTreeMap<Position, Vec<Position>>;

/// One ply for one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub captures: Vec<Position>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }
}

/// Every legal destination for `piece` this turn.
pub fn generate(board: &Board, piece: &Piece) -> MoveMap {
    let mut moves = MoveMap::new();
    let from = piece.position();

    for dr in row_directions(piece) {
        for dc in SIDEWAYS {
            scan(board, piece.side, from, dr, dc, &[], &mut moves);
        }
    }

    moves
}

/// Every legal move of `side`, grouped by piece in row-major order.
pub fn all_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .pieces(side)
        .iter()
        .flat_map(|piece| {
            let from = piece.position();
            generate(board, piece)
                .into_iter()
                .map(move |(to, captures)| Move { from, to, captures })
        })
        .collect()
}

/// Whether `side` has at least one legal move.
pub fn has_moves(board: &Board, side: Side) -> bool {
    board
        .pieces(side)
        .iter()
        .any(|piece| !generate(board, piece).is_empty())
}

/// Boards reachable by one ply of `side`, in `all_moves` order.
pub fn successors(board: &Board, side: Side) -> Vec<Board> {
    all_moves(board, side)
        .iter()
        .map(|mv| {
            let mut next = *board;
            next.apply_move(mv);
            next
        })
        .collect()
}

fn row_directions(piece: &Piece) -> Vec<i32> {
    if piece.is_king {
        vec![-1, 1]
    } else {
        vec![piece.side.forward()]
    }
}

/// Looks one diagonal step from `from`. `captured` is the chain so far; a
/// non-empty chain only admits further jumps.
fn scan(
    board: &Board,
    side: Side,
    from: Position,
    dr: i32,
    dc: i32,
    captured: &[Position],
    moves: &mut MoveMap,
) {
    let Some(next) = from.offset(dr, dc) else {
        return;
    };

    match board.piece_at(next) {
        None => {
            if captured.is_empty() {
                record(moves, next, Vec::new());
            }
        }
        Some(occupant) if occupant.side == side => {}
        Some(_) => {
            let Some(landing) = next.offset(dr, dc) else {
                return;
            };
            if board.piece_at(landing).is_some() {
                return;
            }

            let mut chain = captured.to_vec();
            chain.push(next);
            record(moves, landing, chain.clone());

            // The chain keeps its vertical direction but may turn sideways.
            for turn in SIDEWAYS {
                scan(board, side, landing, dr, turn, &chain, moves);
            }
        }
    }
}

/// Keeps the longer chain when two paths reach the same square.
fn record(moves: &mut MoveMap, to: Position, captures: Vec<Position>) {
    match moves.get(&to) {
        Some(existing) if existing.len() >= captures.len() => {}
        _ => {
            moves.insert(to, captures);
        }
    }
}
