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

use once_cell::sync::OnceCell;

use super::material::{Color, Material};
use super::moves::{Move, MoveStatus, MoveTransition};
use super::square::{File, Rank, Square};
use super::{Board, BoardError, Position};

/// One side's derived state, computed once when the board is built:
/// the king, the frozen move list, and whether the king is attacked.
/// The escape probe is lazy since answering it means trial-playing
/// every listed move.
#[derive(Debug, Clone)]
pub(crate) struct PlayerState {
    king: Material,
    legal_moves: Vec<Move>,
    in_check: bool,
    escapes: OnceCell<bool>,
}

impl PlayerState {
    /// Check status is settled before castles are considered: a king
    /// in check may not castle out of it.
    pub(crate) fn new(
        position: &Position,
        color: Color,
        own_moves: &[Move],
        opponent_moves: &[Move],
    ) -> Result<Self, BoardError> {
        let king = find_king(position, color)?;
        let in_check = attacks_on(king.square(), opponent_moves);
        let mut legal_moves = own_moves.to_vec();
        castle_moves(position, &king, in_check, opponent_moves, &mut legal_moves);
        Ok(Self {
            king,
            legal_moves,
            in_check,
            escapes: OnceCell::new(),
        })
    }

    #[inline]
    pub(crate) fn king(&self) -> Material {
        self.king
    }

    #[inline]
    pub(crate) fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    #[inline]
    pub(crate) fn in_check(&self) -> bool {
        self.in_check
    }
}

fn find_king(position: &Position, color: Color) -> Result<Material, BoardError> {
    let mut kings = position
        .pieces(color)
        .iter()
        .filter(|material| material.piece().is_king());
    let king = kings.next().ok_or(BoardError::MissingKing(color))?;
    if kings.next().is_some() {
        return Err(BoardError::DuplicateKing(color));
    }
    Ok(*king)
}

/// Whether `square` appears as a destination anywhere in `moves`.
fn attacks_on(square: Square, moves: &[Move]) -> bool {
    moves.iter().any(|mv| mv.destination() == square)
}

/// Appends the castle moves still open to this king: kingside first,
/// then queenside. The king must be unmoved and not in check, the
/// corner must hold an unmoved rook of the same color, the lane must
/// be empty, and no square the king crosses may be attacked. On the
/// queenside that leaves b1/b8 free to be attacked.
fn castle_moves(
    position: &Position,
    king: &Material,
    in_check: bool,
    opponent_moves: &[Move],
    moves: &mut Vec<Move>,
) {
    if king.has_moved() || in_check {
        return;
    }
    let color = king.color();
    let back = |file: File| Square::new(file, Rank::back_rank(color));

    let f = back(File::FileF);
    let g = back(File::FileG);
    if !position.tile(f).is_occupied()
        && !position.tile(g).is_occupied()
        && !attacks_on(f, opponent_moves)
        && !attacks_on(g, opponent_moves)
    {
        if let Some(rook) = castle_rook(position, color, back(File::FileH)) {
            moves.push(Move::ShortCastle {
                king: *king,
                to: g,
                rook,
                rook_to: f,
            });
        }
    }

    let b = back(File::FileB);
    let c = back(File::FileC);
    let d = back(File::FileD);
    if !position.tile(b).is_occupied()
        && !position.tile(c).is_occupied()
        && !position.tile(d).is_occupied()
        && !attacks_on(c, opponent_moves)
        && !attacks_on(d, opponent_moves)
    {
        if let Some(rook) = castle_rook(position, color, back(File::FileA)) {
            moves.push(Move::LongCastle {
                king: *king,
                to: c,
                rook,
                rook_to: d,
            });
        }
    }
}

fn castle_rook(position: &Position, color: Color, corner: Square) -> Option<Material> {
    let material = position.tile(corner).material()?;
    (material.piece().is_rook() && material.color() == color && !material.has_moved())
        .then_some(material)
}

/// One side's view of a board: the entry point for playing a move and
/// for check, checkmate and stalemate queries. Views are cheap copies;
/// the state they answer from lives on the board.
#[derive(Debug, Clone, Copy)]
pub struct Player<'a> {
    board: &'a Board,
    color: Color,
}

impl<'a> Player<'a> {
    pub(crate) fn new(board: &'a Board, color: Color) -> Self {
        Self { board, color }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn king(&self) -> Material {
        self.state().king()
    }

    #[inline]
    pub fn legal_moves(&self) -> &'a [Move] {
        self.board.legal_moves(self.color)
    }

    /// This side's pieces still on the board.
    #[inline]
    pub fn active_pieces(&self) -> &'a [Material] {
        self.board.pieces(self.color)
    }

    #[inline]
    pub fn opponent(&self) -> Player<'a> {
        self.board.player(!self.color)
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.state().in_check()
    }

    /// In check with no listed move that survives: this side has lost.
    pub fn is_in_checkmate(&self) -> bool {
        self.is_in_check() && !self.has_escape_moves()
    }

    /// Not in check, but every listed move would expose the king.
    pub fn is_in_stalemate(&self) -> bool {
        !self.is_in_check() && !self.has_escape_moves()
    }

    /// Plays `mv`. The move must be one of this side's listed moves,
    /// and the position after it must not leave this side's king
    /// attacked; a rejected submission carries the original board
    /// back, untouched.
    pub fn make_move(&self, mv: &Move) -> MoveTransition {
        if !self.legal_moves().contains(mv) {
            return MoveTransition::new(self.board.clone(), mv.clone(), MoveStatus::Illegal);
        }
        let next = mv.execute(self.board);
        let king = next.player_state(self.color).king();
        if attacks_on(king.square(), next.legal_moves(!self.color)) {
            return MoveTransition::new(self.board.clone(), mv.clone(), MoveStatus::LeavesInCheck);
        }
        MoveTransition::new(next, mv.clone(), MoveStatus::Done)
    }

    fn has_escape_moves(&self) -> bool {
        *self.state().escapes.get_or_init(|| {
            self.legal_moves()
                .iter()
                .any(|mv| self.make_move(mv).is_done())
        })
    }

    fn state(&self) -> &'a PlayerState {
        self.board.player_state(self.color)
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use Square::*;

    fn play(board: Board, from: Square, to: Square) -> Board {
        let mv = board.resolve_move(from, to).unwrap();
        let transition = board.current_player().make_move(&mv);
        assert!(transition.is_done(), "{mv} was rejected");
        transition.into_board()
    }

    #[test]
    fn test_new_game_is_quiet() {
        let board = Board::standard();
        for color in [Color::White, Color::Black] {
            let player = board.player(color);
            assert!(!player.is_in_check());
            assert!(!player.is_in_checkmate());
            assert!(!player.is_in_stalemate());
            assert_eq!(player.legal_moves().len(), 20);
            assert_eq!(player.active_pieces().len(), 16);
        }
        assert_eq!(board.current_player().color(), Color::White);
        assert_eq!(board.current_player().opponent().color(), Color::Black);
    }

    #[test]
    fn test_rook_gives_check() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::Rook, E8))
            .place(Material::black(Piece::King, H8))
            .build()
            .unwrap();
        let white = board.player(Color::White);
        assert!(white.is_in_check());
        assert!(!white.is_in_checkmate());
        assert!(!board.player(Color::Black).is_in_check());
    }

    #[test]
    fn test_move_exposing_king_is_rejected() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Bishop, E2))
            .place(Material::black(Piece::Rook, E8))
            .place(Material::black(Piece::King, H8))
            .build()
            .unwrap();
        let mv = board.resolve_move(E2, D3).unwrap();
        let transition = board.current_player().make_move(&mv);
        assert_eq!(transition.status(), MoveStatus::LeavesInCheck);
        assert_eq!(*transition.board(), board);
        assert!(!transition.is_done());
    }

    #[test]
    fn test_unlisted_move_is_illegal() {
        let board = Board::standard();
        let mv = Move::Standard {
            piece: Material::white(Piece::Queen, D1),
            to: D5,
        };
        let transition = board.current_player().make_move(&mv);
        assert_eq!(transition.status(), MoveStatus::Illegal);
        assert_eq!(*transition.board(), board);
    }

    #[test]
    fn test_fools_mate() {
        let board = play(Board::standard(), F2, F3);
        let board = play(board, E7, E5);
        let board = play(board, G2, G4);
        let board = play(board, D8, H4);

        assert_eq!(board.turn(), Color::White);
        let white = board.current_player();
        assert!(white.is_in_check());
        assert!(white.is_in_checkmate());
        assert!(!white.is_in_stalemate());
        assert!(!white.opponent().is_in_check());
        assert!(!white.opponent().is_in_checkmate());
    }

    #[test]
    fn test_cornered_king_is_stalemated() {
        let board = BoardBuilder::new()
            .place(Material::black(Piece::King, A8))
            .place(Material::white(Piece::Queen, B6))
            .place(Material::white(Piece::King, C1))
            .to_move(Color::Black)
            .build()
            .unwrap();
        let black = board.current_player();
        assert!(!black.is_in_check());
        assert!(black.is_in_stalemate());
        assert!(!black.is_in_checkmate());
        assert!(!board.player(Color::White).is_in_stalemate());
    }

    #[test]
    fn test_short_castle() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, H1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        let castle = board
            .legal_moves(Color::White)
            .iter()
            .find(|mv| matches!(mv, Move::ShortCastle { .. }))
            .cloned()
            .unwrap();
        assert_eq!(castle.to_string(), "O-O");
        let transition = board.current_player().make_move(&castle);
        assert!(transition.is_done());
        let next = transition.board();
        assert!(next.tile_at(G1).material().unwrap().piece().is_king());
        assert!(next.tile_at(F1).material().unwrap().piece().is_rook());
        assert!(!next.tile_at(E1).is_occupied());
        assert!(!next.tile_at(H1).is_occupied());
    }

    #[test]
    fn test_long_castle() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, A1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        let castle = board
            .legal_moves(Color::White)
            .iter()
            .find(|mv| matches!(mv, Move::LongCastle { .. }))
            .cloned()
            .unwrap();
        let next = board.current_player().make_move(&castle).into_board();
        assert!(next.tile_at(C1).material().unwrap().piece().is_king());
        assert!(next.tile_at(D1).material().unwrap().piece().is_rook());
        assert!(!next.tile_at(A1).is_occupied());
        assert!(!next.tile_at(B1).is_occupied());
    }

    #[test]
    fn test_black_castles_on_its_own_back_rank() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::King, E8))
            .place(Material::black(Piece::Rook, H8))
            .to_move(Color::Black)
            .build()
            .unwrap();
        let castle = board
            .legal_moves(Color::Black)
            .iter()
            .find(|mv| matches!(mv, Move::ShortCastle { .. }))
            .cloned()
            .unwrap();
        assert_eq!(castle.destination(), G8);
        let next = board.current_player().make_move(&castle).into_board();
        assert!(next.tile_at(G8).material().unwrap().piece().is_king());
        assert!(next.tile_at(F8).material().unwrap().piece().is_rook());
    }

    #[test]
    fn test_castle_unavailable_after_king_moved() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1).moved_to(E1))
            .place(Material::white(Piece::Rook, H1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        assert!(board
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));
    }

    #[test]
    fn test_castle_requires_own_unmoved_rook() {
        let enemy_rook = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::Rook, H1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        assert!(enemy_rook
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));

        let not_a_rook = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Bishop, H1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        assert!(not_a_rook
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));

        let moved_rook = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, H1).moved_to(H1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        assert!(moved_rook
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));
    }

    #[test]
    fn test_castle_blocked_while_in_check() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, H1))
            .place(Material::white(Piece::Rook, A1))
            .place(Material::black(Piece::Rook, E8))
            .place(Material::black(Piece::King, H8))
            .build()
            .unwrap();
        assert!(board.player(Color::White).is_in_check());
        assert!(board
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));
    }

    #[test]
    fn test_short_castle_lane_blocked() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, H1))
            .place(Material::white(Piece::Knight, G1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        assert!(board
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));
    }

    #[test]
    fn test_short_castle_lane_attacked() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, H1))
            .place(Material::black(Piece::Rook, F8))
            .place(Material::black(Piece::King, H8))
            .build()
            .unwrap();
        assert!(board
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));
    }

    #[test]
    fn test_long_castle_lane_blocked_on_b_file() {
        // b1 is outside the king's path but must still be empty.
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, A1))
            .place(Material::white(Piece::Knight, B1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        assert!(board
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));
    }

    #[test]
    fn test_long_castle_lane_attacked() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, A1))
            .place(Material::black(Piece::Rook, D8))
            .place(Material::black(Piece::King, H8))
            .build()
            .unwrap();
        assert!(board
            .legal_moves(Color::White)
            .iter()
            .all(|mv| !mv.is_castle()));
    }

    #[test]
    fn test_long_castle_allowed_when_b1_attacked() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, A1))
            .place(Material::black(Piece::Rook, B8))
            .place(Material::black(Piece::King, H8))
            .build()
            .unwrap();
        let castle = board
            .legal_moves(Color::White)
            .iter()
            .find(|mv| matches!(mv, Move::LongCastle { .. }))
            .cloned()
            .unwrap();
        assert!(board.current_player().make_move(&castle).is_done());
    }

    #[test]
    fn test_en_passant_window_closes_after_one_reply() {
        let board = play(Board::standard(), E2, E4);
        let board = play(board, A7, A6);
        let board = play(board, E4, E5);
        let board = play(board, D7, D5);

        let ep = board.resolve_move(E5, D6).unwrap();
        assert!(matches!(ep, Move::EnPassant { .. }));
        let taken = board.current_player().make_move(&ep);
        assert!(taken.is_done());
        assert!(!taken.board().tile_at(D5).is_occupied());

        let board = play(board, H2, H3);
        assert!(board.en_passant_pawn().is_none());
        assert!(board.resolve_move(E5, D6).is_none());
    }

    #[test]
    fn test_promotion_squares_new_queen() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::King, H8))
            .place(Material::white(Piece::Pawn, B7).moved_to(B7))
            .build()
            .unwrap();
        let next = play(board, B7, B8);
        let queen = next.tile_at(B8).material().unwrap();
        assert!(queen.piece().is_queen());
        assert_eq!(queen.color(), Color::White);
        assert!(queen.has_moved());
        assert_eq!(next.pieces(Color::White).len(), 2);
        assert_eq!(next.turn(), Color::Black);
    }

    #[test]
    fn test_escape_probe_is_cached() {
        let board = play(Board::standard(), F2, F3);
        let board = play(board, E7, E5);
        let board = play(board, G2, G4);
        let board = play(board, D8, H4);
        let white = board.current_player();
        assert!(white.is_in_checkmate());
        assert!(white.is_in_checkmate());
        assert!(board.current_player().is_in_checkmate());
    }
}
