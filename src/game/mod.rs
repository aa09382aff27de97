// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

//! Game sessions
//!
//! A [`Game`] drives one game from submitted moves: it resolves each
//! from/to pair against the current board, plays it, and keeps the
//! move history with SAN rendered at the moment each move was played.
//! Checkmate and stalemate map to a [`GameResult`]; resignations,
//! abandonment and draw agreements happen outside the rules, so their
//! reasons are vocabulary for callers to record, not states the board
//! detects.

use anyhow::Result;
#[cfg(feature = "random")]
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::{to_san, Board, Color, Move, MoveError, MoveStatus, Square, Turn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GameId(u64);

impl GameId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
    #[cfg(feature = "random")]
    pub fn random() -> Self {
        Self(thread_rng().gen())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameResult {
    Win(Color, WinReason),
    Draw(DrawReason),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WinReason {
    CheckMate,
    Resigned,
    Abandoned,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DrawReason {
    Agreed,
    StaleMate,
}

/// One played move, with its SAN as rendered from the board it was
/// played on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    mv: Move,
    san: String,
}

impl HistoryEntry {
    #[inline]
    pub fn played(&self) -> &Move {
        &self.mv
    }

    #[inline]
    pub fn san(&self) -> &str {
        &self.san
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.mv.piece().color()
    }
}

/// A game in progress: the current board plus the history that
/// produced it. Rejected submissions leave the game untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: GameId,
    board: Board,
    history: Vec<HistoryEntry>,
}

impl Game {
    /// Starts a game from the standard position.
    pub fn new(id: GameId) -> Self {
        Self::with_board(id, Board::standard())
    }

    /// Starts from an arbitrary board, for analysis and test
    /// positions.
    pub fn with_board(id: GameId, board: Board) -> Self {
        Self {
            id,
            board,
            history: Vec::new(),
        }
    }

    /// Reconstructs a game by replaying from/to pairs from the
    /// standard position.
    pub fn replay(id: GameId, moves: &[(Square, Square)]) -> Result<Self> {
        let mut game = Self::new(id);
        for &(from, to) in moves {
            if !game.submit(from, to).is_done() {
                return Err(MoveError::InvalidMove.into());
            }
        }
        Ok(game)
    }

    #[inline]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Submits the move from `from` to `to` for the side to move. A
    /// pair that names no listed move, or a move belonging to the side
    /// not on turn, is illegal.
    pub fn submit(&mut self, from: Square, to: Square) -> MoveStatus {
        let Some(mv) = self.board.resolve_move(from, to) else {
            return MoveStatus::Illegal;
        };
        let transition = self.board.current_player().make_move(&mv);
        let status = transition.status();
        if transition.is_done() {
            let san = to_san(&self.board, &mv);
            self.history.push(HistoryEntry { mv, san });
            self.board = transition.into_board();
        }
        status
    }

    /// Legal destination squares for the piece on `from`, for move
    /// hints. Only the side to move gets hints.
    pub fn move_destinations(&self, from: Square) -> Vec<Square> {
        self.board
            .legal_moves(self.turn())
            .iter()
            .filter(|mv| mv.origin() == from)
            .map(|mv| mv.destination())
            .collect()
    }

    /// The outcome reached by rule, if any: checkmate beats the side
    /// to move, stalemate is a draw.
    pub fn result(&self) -> Option<GameResult> {
        let player = self.board.current_player();
        if player.is_in_checkmate() {
            Some(GameResult::Win(!player.color(), WinReason::CheckMate))
        } else if player.is_in_stalemate() {
            Some(GameResult::Draw(DrawReason::StaleMate))
        } else {
            None
        }
    }
}

impl Turn for Game {
    #[inline]
    fn turn(&self) -> Color {
        self.board.turn()
    }
}
