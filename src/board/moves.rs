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

use once_cell::sync::Lazy;
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::material::{Color, Material, Piece};
use super::square::{Direction, Offset, Rank, Square};
use super::{Board, BoardBuilder, Position, Tile};

use Piece::*;

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Not a legal move")]
    InvalidMove,
}

/// One move, fully described: every variant carries the moving piece
/// (with its origin square and moved flag) and whatever else execution
/// needs, so a move both renders itself and produces the successor
/// board without consulting anything beyond the board it came from.
///
/// Equality is structural, which is what pins a move to the position
/// that generated it: the embedded pieces carry squares and moved
/// flags, so an equal-looking move from a different position compares
/// unequal as soon as any of that state differs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// A quiet move to an empty tile.
    Standard { piece: Material, to: Square },
    /// A capturing move onto the captured piece's tile.
    Capture {
        piece: Material,
        to: Square,
        captured: Material,
    },
    /// A pawn's initial two-square advance.
    DoubleAdvance { piece: Material, to: Square },
    /// A pawn capture of the double-advanced pawn recorded on the
    /// board; the captured pawn does not stand on the destination.
    EnPassant {
        piece: Material,
        to: Square,
        captured: Material,
    },
    /// Kingside castle; `to` is the king's destination.
    ShortCastle {
        king: Material,
        to: Square,
        rook: Material,
        rook_to: Square,
    },
    /// Queenside castle; `to` is the king's destination.
    LongCastle {
        king: Material,
        to: Square,
        rook: Material,
        rook_to: Square,
    },
    /// A pawn advance or capture onto the far rank, wrapping the
    /// underlying move; execution replays it and substitutes a queen.
    Promotion { pawn: Material, inner: Box<Move> },
}

impl Move {
    /// The piece making the move: the king for castles, the pawn for
    /// promotions.
    pub fn piece(&self) -> Material {
        match self {
            Move::Standard { piece, .. }
            | Move::Capture { piece, .. }
            | Move::DoubleAdvance { piece, .. }
            | Move::EnPassant { piece, .. } => *piece,
            Move::ShortCastle { king, .. } | Move::LongCastle { king, .. } => *king,
            Move::Promotion { pawn, .. } => *pawn,
        }
    }

    #[inline]
    pub fn origin(&self) -> Square {
        self.piece().square()
    }

    pub fn destination(&self) -> Square {
        match self {
            Move::Standard { to, .. }
            | Move::Capture { to, .. }
            | Move::DoubleAdvance { to, .. }
            | Move::EnPassant { to, .. }
            | Move::ShortCastle { to, .. }
            | Move::LongCastle { to, .. } => *to,
            Move::Promotion { inner, .. } => inner.destination(),
        }
    }

    pub fn captured(&self) -> Option<Material> {
        match self {
            Move::Capture { captured, .. } | Move::EnPassant { captured, .. } => Some(*captured),
            Move::Promotion { inner, .. } => inner.captured(),
            _ => None,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured().is_some()
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        matches!(self, Move::ShortCastle { .. } | Move::LongCastle { .. })
    }

    /// Executes this move against the board it was generated from and
    /// returns the successor board. The source board is untouched; the
    /// new board's side to move is flipped, and only a double advance
    /// records an en-passant pawn on it.
    pub fn execute(&self, board: &Board) -> Board {
        let mover = self.piece().color();
        let mut builder = BoardBuilder::new();
        match self {
            Move::Promotion { pawn, inner } => {
                let advanced = inner.execute(board);
                let to = self.destination();
                for color in Color::iter() {
                    for material in advanced.pieces(color) {
                        if material.square() != to {
                            builder = builder.place(*material);
                        }
                    }
                }
                builder = builder.place(pawn.promoted(to));
            }
            Move::ShortCastle {
                king,
                to,
                rook,
                rook_to,
            }
            | Move::LongCastle {
                king,
                to,
                rook,
                rook_to,
            } => {
                for material in board.pieces(mover) {
                    if material != king && material != rook {
                        builder = builder.place(*material);
                    }
                }
                for material in board.pieces(!mover) {
                    builder = builder.place(*material);
                }
                builder = builder
                    .place(king.moved_to(*to))
                    .place(rook.moved_to(*rook_to));
            }
            _ => {
                let piece = self.piece();
                let captured = self.captured();
                for material in board.pieces(mover) {
                    if *material != piece {
                        builder = builder.place(*material);
                    }
                }
                for material in board.pieces(!mover) {
                    if Some(*material) != captured {
                        builder = builder.place(*material);
                    }
                }
                let landed = piece.moved_to(self.destination());
                builder = builder.place(landed);
                if matches!(self, Move::DoubleAdvance { .. }) {
                    builder = builder.en_passant(landed);
                }
            }
        }
        builder
            .to_move(!mover)
            .build()
            .expect("executing a generated move preserves both kings")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Standard { piece, to } | Move::DoubleAdvance { piece, to } => {
                if piece.piece().is_pawn() {
                    write!(f, "{to}")
                } else {
                    write!(f, "{}{to}", piece.piece().letter())
                }
            }
            Move::Capture { piece, to, .. } | Move::EnPassant { piece, to, .. } => {
                if piece.piece().is_pawn() {
                    write!(f, "{}x{to}", piece.square().file())
                } else {
                    write!(f, "{}x{to}", piece.piece().letter())
                }
            }
            Move::ShortCastle { .. } => write!(f, "O-O"),
            Move::LongCastle { .. } => write!(f, "O-O-O"),
            Move::Promotion { inner, .. } => write!(f, "{inner}=Q"),
        }
    }
}

/// Outcome of submitting a move through [`Player::make_move`].
///
/// [`Player::make_move`]: super::Player::make_move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveStatus {
    /// The move was executed; the transition carries the new board.
    Done,
    /// The move is not in the player's legal-move list.
    Illegal,
    /// The move would leave the mover's own king attacked.
    LeavesInCheck,
}

impl MoveStatus {
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, MoveStatus::Done)
    }
}

/// The result of a move submission: the board to continue from (the
/// untouched original when the move was rejected), the attempted move,
/// and the status to branch on. Rejections are data, not errors.
#[derive(Debug, Clone)]
pub struct MoveTransition {
    board: Board,
    attempted: Move,
    status: MoveStatus,
}

impl MoveTransition {
    pub(crate) fn new(board: Board, attempted: Move, status: MoveStatus) -> Self {
        Self {
            board,
            attempted,
            status,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn into_board(self) -> Board {
        self.board
    }

    #[inline]
    pub fn attempted(&self) -> &Move {
        &self.attempted
    }

    #[inline]
    pub fn status(&self) -> MoveStatus {
        self.status
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

impl Material {
    /// This piece's pseudo-legal moves against `board`: consistent with
    /// its movement rules and the board's occupancy, ignoring whether
    /// the mover's king ends up attacked.
    pub fn pseudo_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        material_moves(board.position(), self, &mut moves);
        moves
    }
}

/// All pseudo-legal moves for one side, in stable order: pieces in
/// ascending square order, each piece's moves in fixed offset order.
pub(crate) fn pseudo_legal_moves(position: &Position, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for material in position.pieces(color) {
        material_moves(position, material, &mut moves);
    }
    moves
}

fn material_moves(position: &Position, material: &Material, moves: &mut Vec<Move>) {
    let from = material.square();
    match material.piece() {
        King => step_moves(position, material, &KING_STEPS[from.to_index()], moves),
        Queen => line_moves(position, material, Direction::iter(), moves),
        Rook => line_moves(position, material, Direction::horizontals(), moves),
        Bishop => line_moves(position, material, Direction::diagonals(), moves),
        Knight => step_moves(position, material, &KNIGHT_STEPS[from.to_index()], moves),
        Pawn => pawn_moves(position, material, moves),
    }
}

fn step_moves(position: &Position, material: &Material, targets: &[Square], moves: &mut Vec<Move>) {
    for &to in targets {
        match position.tile(to) {
            Tile::Empty => moves.push(Move::Standard {
                piece: *material,
                to,
            }),
            Tile::Occupied(target) if target.color() != material.color() => {
                moves.push(Move::Capture {
                    piece: *material,
                    to,
                    captured: target,
                })
            }
            Tile::Occupied(_) => {}
        }
    }
}

fn line_moves(
    position: &Position,
    material: &Material,
    directions: impl Iterator<Item = Direction>,
    moves: &mut Vec<Move>,
) {
    for dir in directions {
        let mut next = material.square() + dir;
        while let Some(to) = next {
            match position.tile(to) {
                Tile::Empty => {
                    moves.push(Move::Standard {
                        piece: *material,
                        to,
                    });
                    next = to + dir;
                }
                Tile::Occupied(target) if target.color() != material.color() => {
                    moves.push(Move::Capture {
                        piece: *material,
                        to,
                        captured: target,
                    });
                    break;
                }
                Tile::Occupied(_) => break,
            }
        }
    }
}

fn pawn_moves(position: &Position, pawn: &Material, moves: &mut Vec<Move>) {
    let color = pawn.color();
    let from = pawn.square();
    let forward = color.forward();

    if let Some(to) = from + Offset::new(0, forward) {
        if !position.tile(to).is_occupied() {
            let advance = Move::Standard { piece: *pawn, to };
            moves.push(wrap_promotion(pawn, advance));
            if !pawn.has_moved() && from.rank() == Rank::pawn_rank(color) {
                if let Some(jump) = from + Offset::new(0, forward * 2) {
                    if !position.tile(jump).is_occupied() {
                        moves.push(Move::DoubleAdvance {
                            piece: *pawn,
                            to: jump,
                        });
                    }
                }
            }
        }
    }

    for dx in [-1, 1] {
        let Some(to) = from + Offset::new(dx, forward) else {
            continue;
        };
        match position.tile(to) {
            Tile::Occupied(target) if target.color() != color => {
                let capture = Move::Capture {
                    piece: *pawn,
                    to,
                    captured: target,
                };
                moves.push(wrap_promotion(pawn, capture));
            }
            Tile::Empty => {
                if let Some(target) = position.en_passant() {
                    if target.color() != color && Some(target.square()) == from + Offset::new(dx, 0)
                    {
                        moves.push(Move::EnPassant {
                            piece: *pawn,
                            to,
                            captured: target,
                        });
                    }
                }
            }
            Tile::Occupied(_) => {}
        }
    }
}

fn wrap_promotion(pawn: &Material, mv: Move) -> Move {
    if mv.destination().rank().is_back_rank(!pawn.color()) {
        Move::Promotion {
            pawn: *pawn,
            inner: Box::new(mv),
        }
    } else {
        mv
    }
}

static KING_STEPS: Lazy<[Vec<Square>; 64]> = Lazy::new(|| {
    let mut array: [Vec<Square>; 64] = std::array::from_fn(|_| Vec::new());
    for square in Square::iter() {
        array[square.to_index()] = Direction::iter().filter_map(|dir| square + dir).collect();
    }
    array
});

static KNIGHT_STEPS: Lazy<[Vec<Square>; 64]> = Lazy::new(|| {
    const OFFSETS: [Offset; 8] = [
        Offset::new(-2, -1),
        Offset::new(-2, 1),
        Offset::new(2, -1),
        Offset::new(2, 1),
        Offset::new(-1, -2),
        Offset::new(-1, 2),
        Offset::new(1, -2),
        Offset::new(1, 2),
    ];
    let mut array: [Vec<Square>; 64] = std::array::from_fn(|_| Vec::new());
    for square in Square::iter() {
        array[square.to_index()] = OFFSETS
            .into_iter()
            .filter_map(|offset| square + offset)
            .collect();
    }
    array
});
