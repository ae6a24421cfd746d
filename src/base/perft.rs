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

//! Perft: counting the leaves of the legal move tree to a fixed depth.
//! The reference counts for well-known positions pin down every corner
//! of move generation and make/unmake at once.

use super::{movegen::get_moves, Color, Position};

/// Count the number of legal move sequences of length `depth` from this
/// position.
pub fn perft(pos: &mut Position, side: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    let moves = get_moves(pos, side);
    for sm in &moves {
        if pos.make(sm.m) {
            nodes += perft(pos, !side, depth - 1);
        }
        pos.unmake(sm.m);
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::fen;

    fn assert_perft(fen_str: &str, expected: &[u64]) {
        let info = fen::parse(fen_str).unwrap();
        let mut pos = info.position.clone();
        for (i, &nodes) in expected.iter().enumerate() {
            let depth = i as u32 + 1;
            assert_eq!(
                perft(&mut pos, info.side, depth),
                nodes,
                "wrong node count at depth {depth}"
            );
            // the position must come back untouched
            assert_eq!(pos, info.position);
        }
    }

    #[test]
    fn perft_start_position() {
        assert_perft(fen::START_FEN, &[20, 400, 8_902, 197_281, 4_865_609]);
    }

    #[test]
    fn perft_kiwipete() {
        assert_perft(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2_039, 97_862, 4_085_603],
        );
    }

    #[test]
    fn perft_promotion_position() {
        assert_perft(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[6, 264, 9_467, 422_333],
        );
    }
}
