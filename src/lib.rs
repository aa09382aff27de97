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

//! Rules engine for standard chess
//!
//! Boards are immutable snapshots with their legal-move lists computed
//! up front; playing a move produces the next board. The engine covers
//! full move legality (castling, en passant, promotion), check,
//! checkmate and stalemate detection, and SAN rendering. See the
//! [`board`] module for the core abstractions and [`game`] for driving
//! a whole game from submitted moves.

pub mod board;
pub mod game;

pub use board::*;
pub use game::*;
