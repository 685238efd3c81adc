use serde::Deserialize;
use tracing::{debug, trace};
use web_time::{Duration, Instant};

use crate::ai::search::Searcher;
use crate::board::Board;
use crate::error::GameError;
use crate::movegen::{Move, MoveMap, generate, has_moves, successors};
use crate::types::{BOARD_SIZE, GameResult, GameState, MoveHint, Position, Side};

const DEFAULT_SEARCH_DEPTH: u8 = 4;

/// Chooses the board the AI side moves to.
pub trait MoveSelector: Send + Sync {
    fn select_board(&self, board: &Board, side: Side, depth: u8) -> Option<Board>;
}

/// Full-width minimax to the configured depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector;

impl MoveSelector for MinimaxSelector {
    fn select_board(&self, board: &Board, side: Side, depth: u8) -> Option<Board> {
        if !has_moves(board, side) {
            return None;
        }
        // A depth-0 search returns the board unchanged, which is not a move.
        let outcome = Searcher::new(depth.max(1)).search(board, side);
        Some(outcome.board)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub search_depth: u8,
    pub first_turn: Side,
    pub ai_side: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            first_turn: Side::A,
            ai_side: Side::B,
        }
    }
}

pub struct GameInstance {
    board: Board,
    pub config: GameConfig,
    pub current_player: Side,
    pub selected: Option<Position>,
    pub is_game_over: bool,
    pub is_pass: bool,
    pub captured: Vec<Position>,
    valid_moves: MoveMap,
    started_at: Instant,
    finished_after: Option<Duration>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    pub fn new(config: GameConfig, selector: Box<dyn MoveSelector>) -> Self {
        Self {
            board: Board::new(),
            config,
            current_player: config.first_turn,
            selected: None,
            is_game_over: false,
            is_pass: false,
            captured: Vec::new(),
            valid_moves: MoveMap::new(),
            started_at: Instant::now(),
            finished_after: None,
            selector,
        }
    }

    pub fn new_with_default_selector(config: GameConfig) -> Self {
        Self::new(config, Box::new(MinimaxSelector))
    }

    /// Starts over with the same configuration and selector.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = self.config.first_turn;
        self.selected = None;
        self.is_game_over = false;
        self.is_pass = false;
        self.captured.clear();
        self.valid_moves.clear();
        self.started_at = Instant::now();
        self.finished_after = None;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human_side(&self) -> Side {
        self.config.ai_side.opponent()
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.is_game_over && self.current_player == self.config.ai_side
    }

    /// Handles a click on `(row, col)` by the human side.
    ///
    /// With a piece selected, a click on one of its destinations plays that
    /// move. Any other click drops the selection and tries to select the
    /// clicked piece instead. Returns `false` when nothing happened.
    pub fn select(&mut self, row: u8, col: u8) -> bool {
        if self.is_game_over || self.current_player != self.human_side() {
            return false;
        }
        let Ok(pos) = row_col_to_pos(row, col) else {
            return false;
        };

        if self.selected.is_some() {
            if self.try_move(pos) {
                return true;
            }
            self.clear_selection();
        }

        match self.board.piece_at(pos) {
            Some(piece) if piece.side == self.current_player => {
                self.selected = Some(pos);
                self.valid_moves = generate(&self.board, &piece);
                trace!(?pos, moves = self.valid_moves.len(), "piece selected");
                true
            }
            _ => false,
        }
    }

    /// Destinations of the selected piece.
    pub fn valid_moves(&self) -> &MoveMap {
        &self.valid_moves
    }

    /// Destinations of whatever piece stands on `(row, col)`; empty for an empty square.
    pub fn moves_at(&self, row: u8, col: u8) -> Result<MoveMap, GameError> {
        let pos = row_col_to_pos(row, col)?;
        Ok(self
            .board
            .piece_at(pos)
            .map(|piece| generate(&self.board, &piece))
            .unwrap_or_default())
    }

    /// Highlight list for the selected piece.
    pub fn get_legal_moves(&self) -> Vec<MoveHint> {
        self.valid_moves
            .iter()
            .map(|(to, captures)| MoveHint {
                to: *to,
                captures: captures.clone(),
            })
            .collect()
    }

    pub fn has_legal_moves_for_current(&self) -> bool {
        has_moves(&self.board, self.current_player)
    }

    /// Passes the turn of a side that has pieces but no legal move.
    /// Two passes in a row end the game.
    pub fn pass(&mut self) -> Result<(), GameError> {
        if self.is_game_over {
            return Err(GameError::GameOver);
        }
        if self.has_legal_moves_for_current() {
            return Err(GameError::MustMove {
                side: self.current_player,
            });
        }

        debug!(side = ?self.current_player, "turn passed");
        let second_pass = self.is_pass;
        self.is_pass = true;
        self.captured.clear();
        self.clear_selection();
        self.current_player = self.current_player.opponent();

        if second_pass {
            self.end_game();
        }
        Ok(())
    }

    pub fn end_game(&mut self) {
        if !self.is_game_over {
            self.is_game_over = true;
            self.finished_after = Some(self.started_at.elapsed());
        }
    }

    /// Lets the selector pick the AI side's move and adopts the resulting board.
    pub fn do_ai_move(&mut self) -> Result<(), GameError> {
        if self.is_game_over {
            return Err(GameError::GameOver);
        }
        let side = self.config.ai_side;
        if self.current_player != side {
            return Err(GameError::NotYourTurn { side });
        }
        if !self.has_legal_moves_for_current() {
            return Err(GameError::NoLegalMoves { side });
        }

        let next = self
            .selector
            .select_board(&self.board, side, self.config.search_depth)
            .ok_or(GameError::SelectorFailed)?;

        if !successors(&self.board, side).contains(&next) {
            return Err(GameError::IllegalSelection);
        }

        let opponent = side.opponent();
        self.captured = self
            .board
            .pieces(opponent)
            .iter()
            .map(|piece| piece.position())
            .filter(|pos| next.piece_at(*pos).is_none())
            .collect();
        self.board = next;
        debug!(?side, captured = self.captured.len(), "AI move adopted");

        self.is_pass = false;
        self.change_turn();
        Ok(())
    }

    /// Count-based winner of the current board.
    pub fn winner(&self) -> Option<Side> {
        self.board.winner()
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.current_player,
            a_count: self.board.count(Side::A),
            b_count: self.board.count(Side::B),
            a_kings: self.board.kings(Side::A),
            b_kings: self.board.kings(Side::B),
            selected: self.selected,
            is_game_over: self.is_game_over,
            is_pass: self.is_pass,
            captured: self.captured.clone(),
        }
    }

    /// A game that ended by two passes goes to the side with more pieces.
    pub fn to_game_result(&self) -> GameResult {
        let a_count = self.board.count(Side::A);
        let b_count = self.board.count(Side::B);
        let winner = self.board.winner().or(if a_count > b_count {
            Some(Side::A)
        } else if b_count > a_count {
            Some(Side::B)
        } else {
            None
        });
        let elapsed = self
            .finished_after
            .unwrap_or_else(|| self.started_at.elapsed());

        GameResult {
            winner,
            a_count,
            b_count,
            elapsed_secs: elapsed.as_secs(),
        }
    }

    fn try_move(&mut self, to: Position) -> bool {
        let Some(from) = self.selected else {
            return false;
        };
        if self.board.piece_at(to).is_some() {
            return false;
        }
        let Some(captures) = self.valid_moves.get(&to).cloned() else {
            return false;
        };

        let mv = Move { from, to, captures };
        self.board.apply_move(&mv);
        debug!(?from, ?to, captured = mv.captures.len(), "human move played");

        self.captured = mv.captures;
        self.is_pass = false;
        self.change_turn();
        true
    }

    fn change_turn(&mut self) {
        self.clear_selection();
        self.current_player = self.current_player.opponent();
        if self.board.winner().is_some() {
            self.end_game();
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Side) {
        self.board = board;
        self.current_player = current_player;
        self.is_game_over = false;
        self.is_pass = false;
        self.captured.clear();
        self.clear_selection();
    }
}

fn row_col_to_pos(row: u8, col: u8) -> Result<Position, GameError> {
    if row >= BOARD_SIZE as u8 || col >= BOARD_SIZE as u8 {
        return Err(GameError::OutOfRange { row, col });
    }
    Ok(Position::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    struct FixedBoardSelector {
        board: Option<Board>,
    }

    impl MoveSelector for FixedBoardSelector {
        fn select_board(&self, _board: &Board, _side: Side, _depth: u8) -> Option<Board> {
            self.board
        }
    }

    fn game_with_depth(depth: u8) -> GameInstance {
        GameInstance::new_with_default_selector(GameConfig {
            search_depth: depth,
            ..GameConfig::default()
        })
    }

    #[test]
    fn initial_state_is_correct() {
        let game = game_with_depth(2);
        let state = game.to_game_state();

        assert_eq!(state.current_player, Side::A);
        assert_eq!(state.a_count, 12);
        assert_eq!(state.b_count, 12);
        assert_eq!(state.board.len(), 64);
        assert!(!state.is_game_over);
        assert!(!state.is_pass);
        assert!(state.captured.is_empty());
        assert!(state.selected.is_none());
        assert!(!game.is_ai_turn());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GameConfig = serde::Deserialize::deserialize(
            serde::de::value::MapDeserializer::<_, serde::de::value::Error>::new(
                [("search_depth", 2u8)].into_iter(),
            ),
        )
        .unwrap();

        assert_eq!(config.search_depth, 2);
        assert_eq!(config.first_turn, Side::A);
        assert_eq!(config.ai_side, Side::B);
    }

    #[test]
    fn selecting_own_piece_exposes_its_moves() {
        let mut game = game_with_depth(1);

        assert!(game.select(5, 2));

        assert_eq!(game.selected, Some(Position::new(5, 2)));
        let targets: Vec<Position> = game.get_legal_moves().iter().map(|m| m.to).collect();
        assert_eq!(targets, vec![Position::new(4, 1), Position::new(4, 3)]);
    }

    #[test]
    fn selecting_opponent_or_empty_square_fails() {
        let mut game = game_with_depth(1);

        assert!(!game.select(2, 1));
        assert!(!game.select(4, 1));
        assert!(!game.select(9, 0));
        assert!(game.selected.is_none());
    }

    #[test]
    fn clicking_destination_moves_and_switches_turn() {
        let mut game = game_with_depth(1);

        assert!(game.select(5, 2));
        assert!(game.select(4, 3));

        assert_eq!(game.current_player, Side::B);
        assert!(game.selected.is_none());
        assert!(game.valid_moves().is_empty());
        assert!(game.board().get_piece(5, 2).is_none());
        assert_eq!(game.board().get_piece(4, 3).map(|p| p.side), Some(Side::A));
        assert!(game.is_ai_turn());
    }

    #[test]
    fn invalid_destination_reselects_clicked_piece() {
        let mut game = game_with_depth(1);

        assert!(game.select(5, 2));
        // (5,4) is not a destination but is another own piece.
        assert!(game.select(5, 4));
        assert_eq!(game.selected, Some(Position::new(5, 4)));
        assert_eq!(game.current_player, Side::A);

        // An unreachable empty square just drops the selection.
        assert!(!game.select(3, 0));
        assert!(game.selected.is_none());
    }

    #[test]
    fn human_cannot_click_during_ai_turn() {
        let mut game = game_with_depth(1);
        assert!(game.select(5, 2));
        assert!(game.select(4, 3));

        assert!(!game.select(2, 1));
    }

    #[test]
    fn human_capture_chain_removes_pieces_and_ends_game() {
        let mut game = game_with_depth(1);
        let board = Board::from_pieces(&[
            Piece::new(Side::A, 7, 0),
            Piece::new(Side::B, 6, 1),
            Piece::new(Side::B, 4, 1),
        ]);
        game.set_board_for_test(board, Side::A);

        assert!(game.select(7, 0));
        assert!(game.select(3, 0));

        assert_eq!(game.captured, vec![Position::new(6, 1), Position::new(4, 1)]);
        assert_eq!(game.board().count(Side::B), 0);
        assert!(game.is_game_over);
        assert_eq!(game.winner(), Some(Side::A));
        assert_eq!(game.to_game_result().winner, Some(Side::A));
        assert!(!game.select(3, 0));
    }

    #[test]
    fn ai_move_adopts_minimax_board() {
        let mut game = game_with_depth(2);
        assert!(game.select(5, 2));
        assert!(game.select(4, 3));

        let before = *game.board();
        game.do_ai_move().unwrap();

        assert_eq!(game.current_player, Side::A);
        assert_ne!(*game.board(), before);
        assert!(successors(&before, Side::B).contains(game.board()));
        assert!(game.board().counts_consistent());
    }

    #[test]
    fn ai_move_records_captured_squares() {
        let board = Board::from_pieces(&[
            Piece::new(Side::B, 2, 3),
            Piece::new(Side::A, 3, 4),
            Piece::new(Side::A, 5, 4),
            Piece::new(Side::A, 7, 0),
        ]);
        let mut game = game_with_depth(1);
        game.set_board_for_test(board, Side::B);

        game.do_ai_move().unwrap();

        assert_eq!(game.captured, vec![Position::new(3, 4), Position::new(5, 4)]);
        assert_eq!(game.board().count(Side::A), 1);
        assert!(!game.is_game_over);
    }

    #[test]
    fn ai_move_rejected_when_not_ai_turn() {
        let mut game = game_with_depth(1);

        let err = game.do_ai_move().unwrap_err();

        assert_eq!(err, GameError::NotYourTurn { side: Side::B });
        assert!(err.to_string().contains("turn"));
    }

    #[test]
    fn illegal_selector_board_is_rejected() {
        let mut game = GameInstance::new(
            GameConfig {
                first_turn: Side::B,
                ..GameConfig::default()
            },
            Box::new(FixedBoardSelector {
                board: Some(Board::from_pieces(&[Piece::new(Side::B, 3, 0)])),
            }),
        );
        let before = *game.board();

        assert_eq!(game.do_ai_move(), Err(GameError::IllegalSelection));
        assert_eq!(*game.board(), before);
        assert_eq!(game.current_player, Side::B);
    }

    #[test]
    fn zero_search_depth_still_plays_a_move() {
        let mut game = GameInstance::new_with_default_selector(GameConfig {
            search_depth: 0,
            first_turn: Side::B,
            ai_side: Side::B,
        });
        let before = *game.board();

        game.do_ai_move().unwrap();

        assert!(successors(&before, Side::B).contains(game.board()));
        assert_eq!(game.current_player, Side::A);
        assert!(!game.is_game_over);
    }

    #[test]
    fn empty_selector_reports_failure() {
        let mut game = GameInstance::new(
            GameConfig {
                first_turn: Side::B,
                ..GameConfig::default()
            },
            Box::new(FixedBoardSelector { board: None }),
        );

        assert_eq!(game.do_ai_move(), Err(GameError::SelectorFailed));
    }

    #[test]
    fn pass_requires_blocked_side_and_two_passes_end_game() {
        let mut game = game_with_depth(1);
        assert_eq!(game.pass(), Err(GameError::MustMove { side: Side::A }));

        // A is jammed in the corner: the only jump lands on an occupied square.
        let board = Board::from_pieces(&[
            Piece::new(Side::A, 7, 0),
            Piece::new(Side::B, 6, 1),
            Piece::new(Side::B, 5, 2),
        ]);
        game.set_board_for_test(board, Side::A);
        assert!(!game.has_legal_moves_for_current());

        game.pass().unwrap();
        assert_eq!(game.current_player, Side::B);
        assert!(game.is_pass);
        assert!(!game.is_game_over);
        assert!(game.has_legal_moves_for_current());
    }

    #[test]
    fn consecutive_passes_end_game_by_piece_count() {
        let mut game = game_with_depth(1);
        // Uncrowned men parked on their crown rows have no forward squares.
        let board = Board::from_pieces(&[
            Piece::new(Side::A, 0, 1),
            Piece::new(Side::B, 7, 0),
            Piece::new(Side::B, 7, 2),
        ]);
        game.set_board_for_test(board, Side::A);

        game.pass().unwrap();
        assert!(!game.has_legal_moves_for_current());
        game.pass().unwrap();

        assert!(game.is_game_over);
        assert_eq!(game.pass(), Err(GameError::GameOver));
        let result = game.to_game_result();
        assert_eq!(result.winner, Some(Side::B));
        assert_eq!((result.a_count, result.b_count), (1, 2));
    }

    #[test]
    fn moves_at_validates_coordinates() {
        let game = game_with_depth(1);

        assert_eq!(game.moves_at(2, 7).unwrap().len(), 1);
        assert!(game.moves_at(4, 1).unwrap().is_empty());
        assert_eq!(
            game.moves_at(8, 1),
            Err(GameError::OutOfRange { row: 8, col: 1 })
        );
    }

    #[test]
    fn reset_restores_initial_position() {
        let mut game = game_with_depth(1);
        assert!(game.select(5, 2));
        assert!(game.select(4, 3));

        game.reset();

        assert_eq!(*game.board(), Board::new());
        assert_eq!(game.current_player, Side::A);
        assert!(!game.is_game_over);
    }
}
