use once_cell::sync::Lazy;

use crate::movegen::Move;
use crate::types::{BOARD_SIZE, Position, Side};

const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const START_ROWS: usize = 3;
const KING_WEIGHT: f64 = 0.5;

/// The 32 dark squares in row-major order.
static PLAYABLE_SQUARES: Lazy<Vec<Position>> = Lazy::new(|| {
    (0..BOARD_SIZE as u8)
        .flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Position::new(row, col)))
        .filter(|pos| pos.is_playable())
        .collect()
});

/// A checker. Identity is positional: `row`/`col` always mirror the cell holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub side: Side,
    pub is_king: bool,
    pub row: u8,
    pub col: u8,
}

impl Piece {
    pub fn new(side: Side, row: u8, col: u8) -> Self {
        Self {
            side,
            is_king: false,
            row,
            col,
        }
    }

    pub fn king(side: Side, row: u8, col: u8) -> Self {
        Self {
            is_king: true,
            ..Self::new(side, row, col)
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Checkers board state: an 8x8 grid plus per-side piece and king counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    a_count: u8,
    b_count: u8,
    a_kings: u8,
    b_kings: u8,
}

impl Board {
    /// Creates the initial board:
    /// B on rows 0..=2, A on rows 5..=7, dark squares only.
    pub fn new() -> Self {
        let pieces: Vec<Piece> = PLAYABLE_SQUARES
            .iter()
            .filter_map(|pos| {
                let row = pos.row as usize;
                if row < START_ROWS {
                    Some(Piece::new(Side::B, pos.row, pos.col))
                } else if row >= BOARD_SIZE - START_ROWS {
                    Some(Piece::new(Side::A, pos.row, pos.col))
                } else {
                    None
                }
            })
            .collect();
        Self::from_pieces(&pieces)
    }

    /// Builds a board holding exactly `pieces`, deriving every counter from them.
    pub fn from_pieces(pieces: &[Piece]) -> Self {
        let mut board = Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            a_count: 0,
            b_count: 0,
            a_kings: 0,
            b_kings: 0,
        };
        for piece in pieces {
            debug_assert!(
                piece.position().is_playable(),
                "piece placed on a light square: {piece:?}"
            );
            debug_assert!(
                board.piece_at(piece.position()).is_none(),
                "two pieces placed on {:?}",
                piece.position()
            );
            board.cells[piece.row as usize][piece.col as usize] = Some(*piece);
            *board.count_mut(piece.side) += 1;
            if piece.is_king {
                *board.kings_mut(piece.side) += 1;
            }
        }
        board
    }

    /// Occupant of `(row, col)`. Callers pass coordinates in `0..8`.
    pub fn get_piece(&self, row: u8, col: u8) -> Option<Piece> {
        self.cells[row as usize][col as usize]
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.get_piece(pos.row, pos.col)
    }

    /// Relocates the piece on `from` to `to` and crowns a man landing on its crown row.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        let Some(mut piece) = self.cells[from.row as usize][from.col as usize].take() else {
            debug_assert!(false, "move_piece called on empty square {from:?}");
            return;
        };
        debug_assert!(self.piece_at(to).is_none(), "destination {to:?} is occupied");

        piece.row = to.row;
        piece.col = to.col;
        if !piece.is_king && to.row == piece.side.crown_row() {
            piece.is_king = true;
            *self.kings_mut(piece.side) += 1;
        }
        self.cells[to.row as usize][to.col as usize] = Some(piece);

        debug_assert!(self.counts_consistent());
    }

    /// Clears each listed square and decrements its owner's counters.
    /// Already-empty squares are skipped.
    pub fn remove_pieces(&mut self, captured: &[Position]) {
        for pos in captured {
            let Some(piece) = self.cells[pos.row as usize][pos.col as usize].take() else {
                continue;
            };
            *self.count_mut(piece.side) -= 1;
            if piece.is_king {
                *self.kings_mut(piece.side) -= 1;
            }
        }

        debug_assert!(self.counts_consistent());
    }

    /// Moves the piece and removes everything it jumped over.
    pub fn apply_move(&mut self, mv: &Move) {
        self.move_piece(mv.from, mv.to);
        if !mv.captures.is_empty() {
            self.remove_pieces(&mv.captures);
        }
    }

    /// Static evaluation, signed toward `B`.
    pub fn evaluate(&self) -> f64 {
        let men = self.b_count as f64 - self.a_count as f64;
        let kings = self.b_kings as f64 - self.a_kings as f64;
        men + KING_WEIGHT * kings
    }

    /// Count-based winner: a side wins once the other has no pieces left.
    pub fn winner(&self) -> Option<Side> {
        if self.b_count == 0 {
            Some(Side::A)
        } else if self.a_count == 0 {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Live pieces of `side` in row-major order.
    pub fn pieces(&self, side: Side) -> Vec<Piece> {
        PLAYABLE_SQUARES
            .iter()
            .filter_map(|pos| self.piece_at(*pos))
            .filter(|piece| piece.side == side)
            .collect()
    }

    pub fn count(&self, side: Side) -> u8 {
        match side {
            Side::A => self.a_count,
            Side::B => self.b_count,
        }
    }

    pub fn kings(&self, side: Side) -> u8 {
        match side {
            Side::A => self.a_kings,
            Side::B => self.b_kings,
        }
    }

    /// Whether the counters agree with the grid contents.
    pub fn counts_consistent(&self) -> bool {
        let mut counted = [0u8; 4];
        for piece in self.cells.iter().flatten().flatten() {
            let base = match piece.side {
                Side::A => 0,
                Side::B => 2,
            };
            counted[base] += 1;
            if piece.is_king {
                counted[base + 1] += 1;
            }
        }
        counted == [self.a_count, self.a_kings, self.b_count, self.b_kings]
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=A, 2=B, 3=A king, 4=B king.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (idx, cell) in board.iter_mut().enumerate() {
            *cell = match self.cells[idx / BOARD_SIZE][idx % BOARD_SIZE] {
                None => 0,
                Some(Piece {
                    side: Side::A,
                    is_king,
                    ..
                }) => 1 + 2 * is_king as u8,
                Some(Piece {
                    side: Side::B,
                    is_king,
                    ..
                }) => 2 + 2 * is_king as u8,
            };
        }
        board
    }

    fn count_mut(&mut self, side: Side) -> &mut u8 {
        match side {
            Side::A => &mut self.a_count,
            Side::B => &mut self.b_count,
        }
    }

    fn kings_mut(&mut self, side: Side) -> &mut u8 {
        match side {
            Side::A => &mut self.a_kings,
            Side::B => &mut self.b_kings,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
