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

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

use super::square::Square;

/// A piece of a specific color standing on a specific square.
///
/// Materials are immutable values: moving one produces a new value at
/// the destination with the moved flag set, it never updates in place.
/// Equality is structural over all four fields, so a rook that has
/// moved away and returned compares unequal to the rook that never
/// left, and castling eligibility can tell them apart.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
    square: Square,
    moved: bool,
}

impl Material {
    #[inline]
    pub const fn new(color: Color, piece: Piece, square: Square) -> Self {
        Self {
            color,
            piece,
            square,
            moved: false,
        }
    }

    #[inline]
    pub const fn white(piece: Piece, square: Square) -> Self {
        Self::new(White, piece, square)
    }

    #[inline]
    pub const fn black(piece: Piece, square: Square) -> Self {
        Self::new(Black, piece, square)
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// The same piece as it stands after moving to `to`.
    #[inline]
    pub const fn moved_to(self, to: Square) -> Self {
        Self {
            square: to,
            moved: true,
            ..self
        }
    }

    /// The queen this pawn becomes on reaching the far rank.
    #[inline]
    pub const fn promoted(self, to: Square) -> Self {
        Self {
            piece: Queen,
            square: to,
            moved: true,
            ..self
        }
    }

    /// Single-letter rendering: white pieces uppercase, black lowercase.
    pub fn letter(&self) -> char {
        match self.color {
            White => self.piece.letter(),
            Black => self.piece.letter().to_ascii_lowercase(),
        }
    }
}

use Color::{Black, White};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The rank delta this side's pawns advance by: White pawns move
    /// toward rank 8 (decreasing rank index), Black toward rank 1.
    #[inline]
    pub const fn forward(&self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self((white, black))
    }
}

impl<T> Pair<T> {
    pub fn white(&self) -> &T {
        &self.0 .0
    }
    pub fn white_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn black(&self) -> &T {
        &self.0 .1
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T> Index<&Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: &Color) -> &Self::Output {
        match index {
            White => self.white(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<&Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: &Color) -> &mut Self::Output {
        match index {
            White => self.white_mut(),
            Black => self.black_mut(),
        }
    }
}

impl<T> Index<Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        match index {
            White => self.white(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            White => self.white_mut(),
            Black => self.black_mut(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
use Piece::{Bishop, King, Knight, Pawn, Queen, Rook};

impl Piece {
    pub fn is_king(&self) -> bool {
        matches!(*self, King)
    }
    pub fn is_queen(&self) -> bool {
        matches!(*self, Queen)
    }
    pub fn is_rook(&self) -> bool {
        matches!(*self, Rook)
    }
    pub fn is_bishop(&self) -> bool {
        matches!(*self, Bishop)
    }
    pub fn is_knight(&self) -> bool {
        matches!(*self, Knight)
    }
    pub fn is_pawn(&self) -> bool {
        matches!(*self, Pawn)
    }

    /// Uppercase algebraic letter.
    pub const fn letter(&self) -> char {
        match self {
            Pawn => 'P',
            Knight => 'N',
            Bishop => 'B',
            Rook => 'R',
            Queen => 'Q',
            King => 'K',
        }
    }

    /// Conventional exchange value, for front ends ordering captures.
    pub const fn value(&self) -> u32 {
        match self {
            Pawn => 100,
            Knight => 300,
            Bishop => 300,
            Rook => 500,
            Queen => 900,
            King => 10_000,
        }
    }
}
