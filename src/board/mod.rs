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

//! Chess rules board
//!
//! A _board_ is an immutable snapshot of a game in progress: the piece
//! placement, the side to move, and the durable consequences of the
//! moves that produced it (per-piece moved flags and the one-ply
//! en-passant window). Making a move never mutates a board; it
//! produces the successor board. The following features are supported:
//!
//! [x] Standard chess rules
//! [x] Castling, both wings, with occupancy and attack checks
//! [x] En passant (the window closes after one reply)
//! [x] Pawn promotion (always to a queen)
//! [x] Check, checkmate and stalemate detection
//! [x] Arbitrary positions via `BoardBuilder`
//! [ ] Under-promotion
//! [ ] Draw accounting (repetition, fifty-move rule)
//! [ ] Chess960
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates of a single square on an
//!   8-by-8 board. The 8 rows and 8 columns are represented by `Rank`
//!   (`Rank1` .. `Rank8`) and `File` (`FileA` .. `FileH`). Each square
//!   is named by file letter then rank number (`A1` .. `H8`), and
//!   square arithmetic goes through `Offset`, which refuses steps that
//!   would leave the board instead of wrapping to an adjacent rank.
//!
//! * `Material` represents a piece of a specific color standing on a
//!   specific square, along with whether it has ever moved. Materials
//!   are immutable values; moving one produces a new value.
//!
//! * A `Move` carries everything needed to describe and execute it:
//!   the moving piece, the destination, any captured piece, and for
//!   castles the rook's movement as well. `Move::execute` replays the
//!   move against the board that generated it and returns the
//!   successor board.
//!
//! * A `Board` computes each side's legal-move list once, at
//!   construction, and freezes it. The lists are movement-legal:
//!   castling requirements are enforced up front, but a move that
//!   would expose the mover's own king is still listed and is only
//!   rejected when it is played. `Player` is the per-side view that
//!   plays moves and answers check, checkmate and stalemate queries.
//!
//! * A `BoardBuilder` assembles any position from scratch. `build`
//!   validates that each side has exactly one king; there is no other
//!   sanity check, so test positions are free to be unreachable.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

mod material;
mod moves;
mod player;
mod san;
mod square;

pub use material::*;
pub use moves::*;
pub use player::*;
pub use san::*;
pub use square::*;

use Color::*;
use Piece::*;

pub trait Turn {
    fn turn(&self) -> Color;
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("{0} has no king")]
    MissingKing(Color),
    #[error("{0} has more than one king")]
    DuplicateKing(Color),
}

/// One square's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Occupied(Material),
}

impl Tile {
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Tile::Occupied(_))
    }

    #[inline]
    pub fn material(&self) -> Option<Material> {
        match self {
            Tile::Empty => None,
            Tile::Occupied(material) => Some(*material),
        }
    }
}

/// Piece placement plus the state a successor board inherits from the
/// move that created it: whose turn it is, and which pawn (if any)
/// just double-advanced and may be captured en passant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Position {
    tiles: [Tile; 64],
    pieces: Pair<Vec<Material>>,
    turn: Color,
    en_passant: Option<Material>,
}

impl Position {
    fn from_placements(
        placements: &[Option<Material>; 64],
        turn: Color,
        en_passant: Option<Material>,
    ) -> Self {
        let mut tiles = [Tile::Empty; 64];
        let mut pieces: Pair<Vec<Material>> = Pair::default();
        for square in Square::iter() {
            if let Some(material) = placements[square.to_index()] {
                tiles[square.to_index()] = Tile::Occupied(material);
                pieces[material.color()].push(material);
            }
        }
        Self {
            tiles,
            pieces,
            turn,
            en_passant,
        }
    }

    #[inline]
    pub(crate) fn tile(&self, square: Square) -> Tile {
        self.tiles[square.to_index()]
    }

    #[inline]
    pub(crate) fn pieces(&self, color: Color) -> &[Material] {
        &self.pieces[color]
    }

    #[inline]
    pub(crate) fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub(crate) fn en_passant(&self) -> Option<Material> {
        self.en_passant
    }
}

/// An immutable board. Each side's legal-move list and check state are
/// computed at construction and never change; playing a move goes
/// through [`Player::make_move`] and yields a new board.
///
/// Equality compares the position only (placement, turn, en-passant
/// window). The per-side state is a function of the position, so two
/// boards that compare equal behave identically.
#[derive(Debug, Clone)]
pub struct Board {
    position: Position,
    players: Pair<PlayerState>,
}

impl Board {
    pub(crate) fn new(position: Position) -> Result<Self, BoardError> {
        let white_moves = moves::pseudo_legal_moves(&position, White);
        let black_moves = moves::pseudo_legal_moves(&position, Black);
        let players = Pair::new(
            PlayerState::new(&position, White, &white_moves, &black_moves)?,
            PlayerState::new(&position, Black, &black_moves, &white_moves)?,
        );
        Ok(Self { position, players })
    }

    /// The standard starting position, White to move.
    pub fn standard() -> Self {
        const BACK_RANK: [Piece; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut builder = Self::builder();
        for color in Color::iter() {
            let back = Rank::back_rank(color);
            let pawns = Rank::pawn_rank(color);
            for file in File::iter() {
                builder = builder
                    .place(Material::new(
                        color,
                        BACK_RANK[file.to_index()],
                        Square::new(file, back),
                    ))
                    .place(Material::new(color, Pawn, Square::new(file, pawns)));
            }
        }
        builder.build().expect("the standard layout has both kings")
    }

    #[inline]
    pub fn builder() -> BoardBuilder {
        BoardBuilder::new()
    }

    /// A builder pre-loaded with this board's pieces, turn and
    /// en-passant state, for deriving test and analysis positions.
    pub fn to_builder(&self) -> BoardBuilder {
        let mut builder = BoardBuilder::new().to_move(self.turn());
        if let Some(pawn) = self.en_passant_pawn() {
            builder = builder.en_passant(pawn);
        }
        for color in Color::iter() {
            for material in self.pieces(color) {
                builder = builder.place(*material);
            }
        }
        builder
    }

    #[inline]
    pub(crate) fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn tile_at(&self, square: Square) -> Tile {
        self.position.tile(square)
    }

    /// One side's pieces, in ascending square order.
    #[inline]
    pub fn pieces(&self, color: Color) -> &[Material] {
        self.position.pieces(color)
    }

    /// The pawn that just double-advanced, while it is still
    /// capturable en passant.
    #[inline]
    pub fn en_passant_pawn(&self) -> Option<Material> {
        self.position.en_passant()
    }

    #[inline]
    pub fn player(&self, color: Color) -> Player<'_> {
        Player::new(self, color)
    }

    #[inline]
    pub fn current_player(&self) -> Player<'_> {
        self.player(self.turn())
    }

    #[inline]
    pub(crate) fn player_state(&self, color: Color) -> &PlayerState {
        &self.players[color]
    }

    /// The frozen move list computed for `color` when this board was
    /// built: every movement-legal move including castles, whether or
    /// not it is `color`'s turn. A listed move that would leave the
    /// mover's own king attacked is rejected when played.
    #[inline]
    pub fn legal_moves(&self, color: Color) -> &[Move] {
        self.players[color].legal_moves()
    }

    /// Both sides' frozen move lists, White's first.
    pub fn all_legal_moves(&self) -> impl Iterator<Item = &Move> {
        self.legal_moves(White)
            .iter()
            .chain(self.legal_moves(Black))
    }

    /// Finds the listed move from `from` to `to`, searching White's
    /// list and then Black's. At most one move connects two squares.
    pub fn resolve_move(&self, from: Square, to: Square) -> Option<Move> {
        self.all_legal_moves()
            .find(|mv| mv.origin() == from && mv.destination() == to)
            .cloned()
    }
}

impl Turn for Board {
    #[inline]
    fn turn(&self) -> Color {
        self.position.turn()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter() {
            for file in File::iter() {
                let glyph = match self.tile_at(Square::new(file, rank)) {
                    Tile::Empty => '-',
                    Tile::Occupied(material) => material.letter(),
                };
                if file == File::FileA {
                    write!(f, "{glyph}")?;
                } else {
                    write!(f, " {glyph}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "Board")]
struct BoardRepr {
    pieces: Vec<Material>,
    turn: Color,
    en_passant: Option<Material>,
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut pieces = Vec::with_capacity(32);
        pieces.extend_from_slice(self.pieces(White));
        pieces.extend_from_slice(self.pieces(Black));
        BoardRepr {
            pieces,
            turn: self.turn(),
            en_passant: self.en_passant_pawn(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = BoardRepr::deserialize(deserializer)?;
        let mut builder = BoardBuilder::new().to_move(repr.turn);
        if let Some(pawn) = repr.en_passant {
            builder = builder.en_passant(pawn);
        }
        for material in repr.pieces {
            builder = builder.place(material);
        }
        builder.build().map_err(serde::de::Error::custom)
    }
}

/// Assembles a board from scratch. `place` keys on the material's own
/// square and overwrites anything already there; `build` checks that
/// each side has exactly one king and computes the frozen move lists.
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    placements: [Option<Material>; 64],
    turn: Color,
    en_passant: Option<Material>,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self {
            placements: [None; 64],
            turn: White,
            en_passant: None,
        }
    }

    pub fn place(mut self, material: Material) -> Self {
        self.placements[material.square().to_index()] = Some(material);
        self
    }

    pub fn remove(mut self, square: Square) -> Self {
        self.placements[square.to_index()] = None;
        self
    }

    pub fn to_move(mut self, color: Color) -> Self {
        self.turn = color;
        self
    }

    /// Records `pawn` as capturable en passant on the built board.
    pub fn en_passant(mut self, pawn: Material) -> Self {
        self.en_passant = Some(pawn);
        self
    }

    pub fn build(self) -> Result<Board, BoardError> {
        Board::new(Position::from_placements(
            &self.placements,
            self.turn,
            self.en_passant,
        ))
    }
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
