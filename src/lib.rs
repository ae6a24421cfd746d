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

//! Trebuchet, a UCI-compatible chess engine.
//!
//! The crate is split in three layers:
//!
//! * `base` contains the board representation: bitboards, magic-bitboard
//!   attack tables, the packed move encoding, pseudo-legal move generation,
//!   and the make/unmake machinery with its incremental hash key.
//! * `engine` contains the thinking parts: the static evaluation, the
//!   bucketed transposition table, and the iterative-deepening
//!   principal-variation search.
//! * `uci` is the text front end which wires the engine to a chess GUI
//!   over the Universal Chess Interface protocol.

pub mod base;
pub mod engine;
pub mod uci;
