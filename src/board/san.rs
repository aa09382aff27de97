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

use super::moves::Move;
use super::Board;

/// Generate a SAN string for `mv` as played from `board`.
///
/// `board` must be the board whose move list produced `mv`, and the
/// move must be playable on it; the check and mate suffixes come from
/// trial execution.
pub fn to_san(board: &Board, mv: &Move) -> String {
    let mut s = match mv {
        Move::ShortCastle { .. } => "O-O".to_string(),
        Move::LongCastle { .. } => "O-O-O".to_string(),
        _ => format_move(board, mv),
    };
    s.push_str(check_suffix(board, mv));
    s
}

fn format_move(board: &Board, mv: &Move) -> String {
    let piece = mv.piece();
    let to = mv.destination();

    let mut s = String::new();

    if piece.piece().is_pawn() {
        if mv.is_capture() {
            s.push(piece.square().file().to_char());
        }
    } else {
        s.push(piece.piece().letter());
        disambiguate(board, mv, &mut s);
    }

    if mv.is_capture() {
        s.push('x');
    }

    s.push(to.file().to_char());
    s.push(to.rank().to_char());

    if matches!(mv, Move::Promotion { .. }) {
        s.push_str("=Q");
    }

    s
}

/// Appends the origin file and/or rank when another listed move could
/// bring the same kind of piece to the same destination.
fn disambiguate(board: &Board, mv: &Move, s: &mut String) {
    let piece = mv.piece();
    let from = piece.square();
    let mut same_file = false;
    let mut same_rank = false;
    let mut ambiguous = false;

    for other in board.legal_moves(piece.color()) {
        if other.origin() == from
            || other.destination() != mv.destination()
            || other.piece().piece() != piece.piece()
        {
            continue;
        }
        ambiguous = true;
        if other.origin().file() == from.file() {
            same_file = true;
        }
        if other.origin().rank() == from.rank() {
            same_rank = true;
        }
    }

    if !ambiguous {
        return;
    }

    if !same_file {
        s.push(from.file().to_char());
    } else if !same_rank {
        s.push(from.rank().to_char());
    } else {
        s.push(from.file().to_char());
        s.push(from.rank().to_char());
    }
}

fn check_suffix(board: &Board, mv: &Move) -> &'static str {
    let next = mv.execute(board);
    let defender = next.current_player();
    if defender.is_in_check() {
        if defender.is_in_checkmate() {
            "#"
        } else {
            "+"
        }
    } else {
        ""
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

    fn san(board: &Board, from: Square, to: Square) -> String {
        to_san(board, &board.resolve_move(from, to).unwrap())
    }

    #[test]
    fn test_pawn_advance() {
        let board = Board::standard();
        assert_eq!(san(&board, E2, E4), "e4");
        assert_eq!(san(&board, E2, E3), "e3");
    }

    #[test]
    fn test_pawn_capture() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::King, E8))
            .place(Material::white(Piece::Pawn, E4).moved_to(E4))
            .place(Material::black(Piece::Pawn, D5).moved_to(D5))
            .build()
            .unwrap();
        assert_eq!(san(&board, E4, D5), "exd5");
    }

    #[test]
    fn test_pawn_promotion() {
        // Quiet promotion on b8 and a capturing one on a8, from the
        // same pawn.
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::King, G1))
            .place(Material::white(Piece::Pawn, B7).moved_to(B7))
            .place(Material::black(Piece::Rook, A8))
            .build()
            .unwrap();
        assert_eq!(san(&board, B7, B8), "b8=Q");
        assert_eq!(san(&board, B7, A8), "bxa8=Q");
    }

    #[test]
    fn test_knight_move() {
        let board = Board::standard();
        assert_eq!(san(&board, G1, F3), "Nf3");
    }

    #[test]
    fn test_knight_disambiguation_by_file() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::King, E8))
            .place(Material::white(Piece::Knight, A3))
            .place(Material::white(Piece::Knight, C3))
            .build()
            .unwrap();
        assert_eq!(san(&board, A3, B5), "Nab5");
        assert_eq!(san(&board, C3, B5), "Ncb5");
    }

    #[test]
    fn test_knight_disambiguation_by_rank() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::King, E8))
            .place(Material::white(Piece::Knight, G1))
            .place(Material::white(Piece::Knight, G3))
            .build()
            .unwrap();
        assert_eq!(san(&board, G1, E2), "N1e2");
        assert_eq!(san(&board, G3, E2), "N3e2");
    }

    #[test]
    fn test_castling() {
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::white(Piece::Rook, H1))
            .place(Material::white(Piece::Rook, A1))
            .place(Material::black(Piece::King, E8))
            .build()
            .unwrap();
        let short = board
            .legal_moves(Color::White)
            .iter()
            .find(|mv| matches!(mv, Move::ShortCastle { .. }))
            .unwrap();
        let long = board
            .legal_moves(Color::White)
            .iter()
            .find(|mv| matches!(mv, Move::LongCastle { .. }))
            .unwrap();
        assert_eq!(to_san(&board, short), "O-O");
        assert_eq!(to_san(&board, long), "O-O-O");
    }

    #[test]
    fn test_en_passant() {
        let target = Material::black(Piece::Pawn, D5).moved_to(D5);
        let board = BoardBuilder::new()
            .place(Material::white(Piece::King, E1))
            .place(Material::black(Piece::King, H8))
            .place(Material::white(Piece::Pawn, E5).moved_to(E5))
            .place(target)
            .en_passant(target)
            .build()
            .unwrap();
        assert_eq!(san(&board, E5, D6), "exd6");
    }

    #[test]
    fn test_check_suffix() {
        // Scholar's mate fragment: the h5 queen takes f7 with check,
        // but the king can recapture.
        let board = Board::standard()
            .to_builder()
            .remove(D1)
            .place(Material::white(Piece::Queen, H5).moved_to(H5))
            .build()
            .unwrap();
        assert_eq!(san(&board, H5, F7), "Qxf7+");
    }

    #[test]
    fn test_checkmate_suffix() {
        // Fool's mate: 1. f3 e5 2. g4 Qh4#
        let board = play(Board::standard(), F2, F3);
        let board = play(board, E7, E5);
        let board = play(board, G2, G4);
        assert_eq!(san(&board, D8, H4), "Qh4#");
    }

    #[test]
    fn test_piece_capture() {
        let board = Board::standard()
            .to_builder()
            .remove(F1)
            .place(Material::white(Piece::Bishop, C4).moved_to(C4))
            .build()
            .unwrap();
        assert_eq!(san(&board, C4, F7), "Bxf7+");
    }
}
