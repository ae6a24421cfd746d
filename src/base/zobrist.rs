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

//! Hash key generation for positions.
//!
//! The position key is incremental: playing a move XORs that move's hash
//! into the key, and unmaking it XORs the same value back out. To keep
//! similar moves from colliding, each from-square and each to-square has
//! its own pre-generated 64-bit random, and the packed move word itself
//! is mixed in as well.

use super::Move;

use once_cell::sync::Lazy;

/// Seed for the key generator. Fixed so that hash keys are reproducible
/// run-to-run and inside tests.
const KEY_SEED: u64 = 0x7e5b_u64;

struct MoveKeys {
    from: [u64; 64],
    to: [u64; 64],
}

static KEYS: Lazy<MoveKeys> = Lazy::new(|| {
    let rng = fastrand::Rng::with_seed(KEY_SEED);
    let mut keys = MoveKeys {
        from: [0; 64],
        to: [0; 64],
    };
    for k in &mut keys.from {
        *k = rng.u64(..);
    }
    for k in &mut keys.to {
        *k = rng.u64(..);
    }
    keys
});

#[inline(always)]
#[must_use]
/// Get the hash value of one move, to be XOR-ed into a position's key
/// when the move is played and XOR-ed out when it is taken back.
pub fn move_hash(m: Move) -> u64 {
    let word = u64::from(m.word());
    KEYS.from[m.from_square() as usize] ^ KEYS.to[m.to_square() as usize] ^ (word << 32 | word)
}

#[inline(always)]
#[must_use]
/// The distinguished hash value of a null move (giving the turn away
/// without moving a piece).
pub fn null_move_hash() -> u64 {
    KEYS.from[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Color, Piece, Square};

    #[test]
    fn hash_is_self_inverse() {
        let m = Move::new_quiet(Square::E2, Square::E4, Piece::Pawn, Color::White);
        let start = 0xdead_beef_u64;
        let once = start ^ move_hash(m);
        assert_ne!(once, start);
        assert_eq!(once ^ move_hash(m), start);
    }

    #[test]
    fn distinct_moves_have_distinct_hashes() {
        let m1 = Move::new_quiet(Square::E2, Square::E4, Piece::Pawn, Color::White);
        let m2 = Move::new_quiet(Square::E2, Square::E3, Piece::Pawn, Color::White);
        let m3 = Move::new_quiet(Square::D2, Square::E3, Piece::Pawn, Color::White);
        assert_ne!(move_hash(m1), move_hash(m2));
        assert_ne!(move_hash(m2), move_hash(m3));
        assert_ne!(move_hash(m1), null_move_hash());
    }
}
