use crate::types::Side;

/// Errors surfaced by turn-controller operations that are not click driven.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game is already over")]
    GameOver,

    #[error("it is not {side:?}'s turn")]
    NotYourTurn { side: Side },

    #[error("{side:?} has no legal moves")]
    NoLegalMoves { side: Side },

    #[error("{side:?} still has legal moves and cannot pass")]
    MustMove { side: Side },

    #[error("row/col out of range: ({row}, {col})")]
    OutOfRange { row: u8, col: u8 },

    #[error("AI could not select a move")]
    SelectorFailed,

    #[error("AI selected an illegal move")]
    IllegalSelection,
}
