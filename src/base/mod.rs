/*
  Trebuchet, a UCI-compatible chess engine.
  Copyright (C) 2023 The Trebuchet Authors

  Trebuchet is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Trebuchet is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The foundational structures of the game of chess: boards, squares,
//! moves, and the rules for generating and applying them.

mod bitboard;
pub use bitboard::Bitboard;

mod square;
pub use square::Square;

mod piece;
pub use piece::{Color, Piece, PIECE_VALUES};

pub mod attacks;

pub mod zobrist;

mod moves;
pub use moves::{Move, MoveList, ScoredMove, FIELD_EMPTY, FIELD_EN_PASSANT};

mod position;
pub use position::Position;

pub mod movegen;

pub mod fen;

pub mod perft;
