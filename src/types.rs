use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;

/// One of the two players.
///
/// `A` starts on rows 5..=7 and moves toward row 0.
/// `B` starts on rows 0..=2 and moves toward row 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Row delta of a forward step.
    pub fn forward(self) -> i32 {
        match self {
            Side::A => -1,
            Side::B => 1,
        }
    }

    /// The row on which a man of this side is crowned.
    pub fn crown_row(self) -> u8 {
        match self {
            Side::A => 0,
            Side::B => (BOARD_SIZE - 1) as u8,
        }
    }

    /// The evaluation is signed toward `B`, so `B` is the maximizing side.
    pub fn is_maximizing(self) -> bool {
        self == Side::B
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Steps by `(dr, dc)`, returning `None` when the result leaves the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Self> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if in_bounds(row, col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Whether the square lies on the playable diagonal pattern.
    pub fn is_playable(self) -> bool {
        (self.row as usize + self.col as usize) % 2 == 1
    }
}

pub fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

/// Serialized move target for UI highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveHint {
    pub to: Position,
    pub captures: Vec<Position>,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// 64 cells: 0=empty, 1=A man, 2=B man, 3=A king, 4=B king.
    pub board: Vec<u8>,
    pub current_player: Side,
    pub a_count: u8,
    pub b_count: u8,
    pub a_kings: u8,
    pub b_kings: u8,
    pub selected: Option<Position>,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the previous action was a pass.
    /// - `false` when the previous action was a normal move.
    pub is_pass: bool,
    /// Squares emptied by the previous move's captures.
    pub captured: Vec<Position>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// `None` for a draw.
    pub winner: Option<Side>,
    pub a_count: u8,
    pub b_count: u8,
    pub elapsed_secs: u64,
}
