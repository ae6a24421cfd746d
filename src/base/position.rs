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

//! Positions: the piece bitboards of both sides, a stack of per-ply
//! metadata words, and an incrementally maintained hash key, together
//! with the make/unmake machinery which mutates them.
//!
//! A metadata word is itself a bitboard. The castling rights are encoded
//! as bits on the squares the kings castle *to* (C1, G1, C8, G8), and an
//! available en-passant target is a bit on rank 3 or rank 6. Every
//! `make` pushes a new word; every `unmake` pops one, so the word on top
//! always describes the current ply.

use super::{
    attacks::{bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks},
    zobrist::{move_hash, null_move_hash},
    Bitboard, Color, Move, Piece, Square,
};

use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A chess position. The side to move is not part of the position; it is
/// threaded through the search by its callers.
pub struct Position {
    /// One bitboard per side and piece kind.
    pieces: [[Bitboard; Piece::NUM]; Color::NUM],
    /// Castling-rights and en-passant metadata, one word per ply plus
    /// one for the root.
    meta_stack: Vec<Bitboard>,
    /// The incremental hash key: the XOR of the hashes of every move
    /// played from the starting position of the game.
    hash_key: u64,
}

impl Position {
    #[must_use]
    /// Create a position with no pieces, no rights, and an empty board.
    pub fn empty() -> Position {
        Position {
            pieces: [[Bitboard::EMPTY; Piece::NUM]; Color::NUM],
            meta_stack: vec![Bitboard::EMPTY],
            hash_key: 0,
        }
    }

    /// Put a piece on a square. Intended for position setup only; the
    /// hash key is not touched.
    pub fn put(&mut self, color: Color, piece: Piece, sq: Square) {
        self.pieces[color as usize][piece as usize].insert(sq);
    }

    /// Replace the current metadata word. Intended for position setup.
    pub fn set_meta(&mut self, meta: Bitboard) {
        *self.meta_stack.last_mut().expect("meta stack is never empty") = meta;
    }

    #[inline(always)]
    #[must_use]
    /// Get the bitboard of one side's pieces of one kind.
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color as usize][piece as usize]
    }

    #[inline(always)]
    #[must_use]
    /// Get the set of squares occupied by one side, computed from the
    /// per-kind bitboards.
    pub fn side_mask(&self, color: Color) -> Bitboard {
        let side = &self.pieces[color as usize];
        side[0] | side[1] | side[2] | side[3] | side[4] | side[5]
    }

    #[inline(always)]
    #[must_use]
    /// Get the set of all occupied squares.
    pub fn occupied(&self) -> Bitboard {
        self.side_mask(Color::White) | self.side_mask(Color::Black)
    }

    #[inline(always)]
    #[must_use]
    /// Get the current metadata word.
    pub fn meta_top(&self) -> Bitboard {
        *self.meta_stack.last().expect("meta stack is never empty")
    }

    #[inline(always)]
    #[must_use]
    /// Get the incremental hash key.
    pub fn hash_key(&self) -> u64 {
        self.hash_key
    }

    #[inline(always)]
    #[must_use]
    /// How many metadata words are on the stack. One word means the
    /// position is at its root ply.
    pub fn meta_depth(&self) -> usize {
        self.meta_stack.len()
    }

    #[must_use]
    /// Whether two positions hold the same pieces on the same squares.
    /// This is the equality used for repetition detection; metadata and
    /// hash key are deliberately ignored.
    pub fn same_pieces(&self, other: &Position) -> bool {
        self.pieces == other.pieces
    }

    #[must_use]
    /// Compute the set of squares attacked by `side`, excluding squares
    /// occupied by `side`'s own pieces.
    pub fn attacked_squares(&self, side: Color) -> Bitboard {
        self.attacked_squares_with_occ(side, self.occupied())
    }

    #[must_use]
    /// Compute the set of squares attacked by `side` as if the board
    /// were occupied by `occ`. Used by static exchange evaluation to see
    /// through pieces that have already traded off.
    pub fn attacked_squares_with_occ(&self, side: Color, occ: Bitboard) -> Bitboard {
        let mut attacked = Bitboard::EMPTY;

        for from in self.pieces(side, Piece::Knight) {
            attacked |= knight_attacks(from);
        }
        for from in self.pieces(side, Piece::Bishop) {
            attacked |= bishop_attacks(occ, from);
        }
        for from in self.pieces(side, Piece::Rook) {
            attacked |= rook_attacks(occ, from);
        }
        for from in self.pieces(side, Piece::Queen) {
            attacked |= queen_attacks(occ, from);
        }
        let king = self.pieces(side, Piece::King);
        if !king.is_empty() {
            attacked |= king_attacks(king.lsb_square());
        }

        let pawns = self.pieces(side, Piece::Pawn);
        if side.is_white() {
            attacked |= (pawns & !Bitboard::NW_BORDER) << 7;
            attacked |= (pawns & !Bitboard::NE_BORDER) << 9;
        } else {
            attacked |= (pawns & !Bitboard::SW_BORDER) >> 9;
            attacked |= (pawns & !Bitboard::SE_BORDER) >> 7;
        }

        attacked & !self.side_mask(side)
    }

    #[inline(always)]
    #[must_use]
    /// Whether `side`'s king is currently attacked by the other side.
    pub fn in_check(&self, side: Color) -> bool {
        !(self.attacked_squares(!side) & self.pieces(side, Piece::King)).is_empty()
    }

    /// Apply `m` to this position, pushing a metadata word and updating
    /// the hash key. Returns `true` if the move was legal. An illegal
    /// move (the mover's king left attacked, or a castle through an
    /// attacked square) is still fully applied and must be reverted with
    /// `unmake`.
    pub fn make(&mut self, m: Move) -> bool {
        let color = m.color();
        let piece = m.piece();
        let from = m.from_square();
        let to = m.to_square();

        self.pieces[color as usize][piece as usize] &= !Bitboard::square(from);
        self.pieces[color as usize][piece as usize] |= Bitboard::square(to);

        let mut meta = self.meta_top();

        let captured = m.captured_field();
        if captured != super::moves::FIELD_EMPTY {
            let captured_color = !color;
            if captured != super::moves::FIELD_EN_PASSANT {
                self.pieces[captured_color as usize][captured as usize] &= !Bitboard::square(to);
            } else {
                // the captured pawn sits one rank behind the arrival square
                let taken = ep_victim_square(to, color);
                self.pieces[captured_color as usize][Piece::Pawn as usize] &=
                    !Bitboard::square(taken);
            }
        }

        if let Some(promotion) = m.promotion() {
            self.pieces[color as usize][piece as usize] &= !Bitboard::square(to);
            self.pieces[color as usize][promotion as usize] |= Bitboard::square(to);
        }

        let mut illegal_castle = false;
        if m.is_castle() {
            // the path test sees the king already on its destination;
            // the rook has not moved yet
            if castle_path_attacked(to, self.attacked_squares(!color)) {
                illegal_castle = true;
            }
            let (rook_from, rook_to) = rook_castle_squares(to);
            self.pieces[color as usize][Piece::Rook as usize] &= !Bitboard::square(rook_from);
            self.pieces[color as usize][Piece::Rook as usize] |= Bitboard::square(rook_to);
        }

        if piece == Piece::King {
            // both castle-rights bits live on the king's back rank
            meta &= !back_rank(color);
        }
        if piece == Piece::Rook {
            match from {
                Square::A1 => meta &= !Bitboard::square(Square::C1),
                Square::H1 => meta &= !Bitboard::square(Square::G1),
                Square::A8 => meta &= !Bitboard::square(Square::C8),
                Square::H8 => meta &= !Bitboard::square(Square::G8),
                _ => {}
            }
        }

        meta &= Bitboard::CLEAR_EN_PASSANT;
        if piece == Piece::Pawn && from.chebyshev_to(to) == 2 && from.file() == to.file() {
            // double push: mark the skipped square as the en-passant target
            meta |= if color.is_white() {
                Bitboard::square(from) << 8
            } else {
                Bitboard::square(from) >> 8
            };
        }

        self.meta_stack.push(meta);
        self.hash_key ^= move_hash(m);

        if illegal_castle {
            return false;
        }
        (self.attacked_squares(!color) & self.pieces(color, Piece::King)).is_empty()
    }

    /// Revert `m`, the most recently made move, restoring the position
    /// bit-for-bit.
    pub fn unmake(&mut self, m: Move) {
        let color = m.color();
        let piece = m.piece();
        let from = m.from_square();
        let to = m.to_square();

        self.pieces[color as usize][piece as usize] |= Bitboard::square(from);
        self.pieces[color as usize][piece as usize] &= !Bitboard::square(to);

        let captured = m.captured_field();
        if captured != super::moves::FIELD_EMPTY {
            let captured_color = !color;
            if captured != super::moves::FIELD_EN_PASSANT {
                self.pieces[captured_color as usize][captured as usize] |= Bitboard::square(to);
            } else {
                let taken = ep_victim_square(to, color);
                self.pieces[captured_color as usize][Piece::Pawn as usize] |=
                    Bitboard::square(taken);
            }
        }

        if let Some(promotion) = m.promotion() {
            self.pieces[color as usize][promotion as usize] &= !Bitboard::square(to);
        }

        if m.is_castle() {
            let (rook_from, rook_to) = rook_castle_squares(to);
            self.pieces[color as usize][Piece::Rook as usize] |= Bitboard::square(rook_from);
            self.pieces[color as usize][Piece::Rook as usize] &= !Bitboard::square(rook_to);
        }

        self.meta_stack.pop();
        self.hash_key ^= move_hash(m);
    }

    /// Give the turn away: the pieces stay put, the en-passant target
    /// (if any) lapses, and the hash key gains the null-move random.
    pub fn make_null(&mut self) {
        let meta = self.meta_top() & Bitboard::CLEAR_EN_PASSANT;
        self.meta_stack.push(meta);
        self.hash_key ^= null_move_hash();
    }

    /// Revert the most recent `make_null`.
    pub fn unmake_null(&mut self) {
        self.meta_stack.pop();
        self.hash_key ^= null_move_hash();
    }
}

#[inline(always)]
/// The square of the pawn taken by an en-passant capture arriving on
/// `to`: one rank behind the arrival square, from the mover's point of
/// view.
const fn ep_victim_square(to: Square, color: Color) -> Square {
    Square::new((to as u8).wrapping_sub(8).wrapping_add(16 * color as u8))
}

#[inline(always)]
/// The back rank of a side, where its castle-rights bits live.
const fn back_rank(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::RANK_1,
        Color::Black => Bitboard::RANK_8,
    }
}

#[inline(always)]
/// Map a castle destination square to the (from, to) squares of the
/// rook's accompanying move.
const fn rook_castle_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        Square::C1 => (Square::A1, Square::D1),
        Square::G1 => (Square::H1, Square::F1),
        Square::C8 => (Square::A8, Square::D8),
        _ => (Square::H8, Square::F8),
    }
}

/// Whether a castle arriving on `king_to` would carry the king across an
/// attacked square. The tested squares include the king's starting
/// square, so castling out of check is also rejected.
fn castle_path_attacked(king_to: Square, attacked: Bitboard) -> bool {
    let path = match king_to {
        Square::C1 => {
            Bitboard::square(Square::C1) | Bitboard::square(Square::D1) | Bitboard::square(Square::E1)
        }
        Square::G1 => {
            Bitboard::square(Square::E1) | Bitboard::square(Square::F1) | Bitboard::square(Square::G1)
        }
        Square::C8 => {
            Bitboard::square(Square::C8) | Bitboard::square(Square::D8) | Bitboard::square(Square::E8)
        }
        _ => Bitboard::square(Square::E8) | Bitboard::square(Square::F8) | Bitboard::square(Square::G8),
    };
    !(path & attacked).is_empty()
}

impl Display for Position {
    /// Draw the board with Unicode figurines, rank 8 on top.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let sq = Square::new(rank << 3 | file);
                let mut drawn = '.';
                for color in [Color::White, Color::Black] {
                    for piece in Piece::ALL {
                        if self.pieces(color, piece).contains(sq) {
                            drawn = figurine(color, piece);
                        }
                    }
                }
                write!(f, "{drawn} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The Unicode figurine for a piece.
const fn figurine(color: Color, piece: Piece) -> char {
    match (color, piece) {
        (Color::White, Piece::Pawn) => '♙',
        (Color::White, Piece::Knight) => '♘',
        (Color::White, Piece::Bishop) => '♗',
        (Color::White, Piece::Rook) => '♖',
        (Color::White, Piece::Queen) => '♕',
        (Color::White, Piece::King) => '♔',
        (Color::Black, Piece::Pawn) => '♟',
        (Color::Black, Piece::Knight) => '♞',
        (Color::Black, Piece::Bishop) => '♝',
        (Color::Black, Piece::Rook) => '♜',
        (Color::Black, Piece::Queen) => '♛',
        (Color::Black, Piece::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::fen;
    use crate::base::moves::FIELD_EMPTY;

    #[test]
    fn make_unmake_restores_everything() {
        let info = fen::start_position();
        let mut pos = info.position.clone();
        let before = pos.clone();

        let m = Move::new_quiet(Square::E2, Square::E4, Piece::Pawn, Color::White);
        assert!(pos.make(m));
        assert_ne!(pos, before);
        assert_eq!(pos.meta_depth(), before.meta_depth() + 1);
        pos.unmake(m);
        assert_eq!(pos, before);
    }

    #[test]
    fn make_unmake_walk_over_kiwipete() {
        // every generated move, legal or not, must round-trip exactly,
        // including castles, promotions, and the en-passant machinery
        let info =
            fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        let mut pos = info.position.clone();
        let moves = crate::base::movegen::get_moves(&pos, info.side);
        assert!(!moves.is_empty());
        for sm in &moves {
            pos.make(sm.m);
            pos.unmake(sm.m);
            assert_eq!(pos, info.position, "{:?} did not round-trip", sm.m);
        }
    }

    #[test]
    fn hash_updates_by_xor() {
        let info = fen::start_position();
        let mut pos = info.position.clone();
        let h0 = pos.hash_key();
        let m = Move::new_quiet(Square::G1, Square::F3, Piece::Knight, Color::White);
        pos.make(m);
        assert_eq!(pos.hash_key(), h0 ^ crate::base::zobrist::move_hash(m));
        pos.unmake(m);
        assert_eq!(pos.hash_key(), h0);
    }

    #[test]
    fn null_move_round_trip() {
        let info =
            fen::parse("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2").unwrap();
        let mut pos = info.position.clone();
        let before = pos.clone();
        pos.make_null();
        // the en-passant target lapses for the null ply
        assert!((pos.meta_top() & Bitboard::RANK_6).is_empty());
        assert_ne!(pos.hash_key(), before.hash_key());
        pos.unmake_null();
        assert_eq!(pos, before);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let info = fen::start_position();
        let mut pos = info.position.clone();
        let m = Move::new_quiet(Square::D2, Square::D4, Piece::Pawn, Color::White);
        pos.make(m);
        assert!(pos.meta_top().contains(Square::D3));
        pos.unmake(m);
        assert!(!pos.meta_top().contains(Square::D3));
    }

    #[test]
    fn en_passant_capture_removes_pawn() {
        // White pawn on e5 may capture the d-pawn which just double-pushed
        let info =
            fen::parse("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let mut pos = info.position.clone();
        let m = Move::new_capture(
            Square::E5,
            Square::D6,
            Piece::Pawn,
            crate::base::moves::FIELD_EN_PASSANT,
            Color::White,
            FIELD_EMPTY,
        );
        assert!(pos.make(m));
        assert!(!pos.pieces(Color::Black, Piece::Pawn).contains(Square::D5));
        assert!(pos.pieces(Color::White, Piece::Pawn).contains(Square::D6));
        pos.unmake(m);
        assert!(pos.pieces(Color::Black, Piece::Pawn).contains(Square::D5));
    }

    #[test]
    fn king_move_revokes_castling_rights() {
        let info = fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mut pos = info.position.clone();
        let m = Move::new_quiet(Square::E1, Square::E2, Piece::King, Color::White);
        assert!(pos.make(m));
        assert!(!pos.meta_top().contains(Square::C1));
        assert!(!pos.meta_top().contains(Square::G1));
        // Black's rights are untouched
        assert!(pos.meta_top().contains(Square::C8));
        assert!(pos.meta_top().contains(Square::G8));
        pos.unmake(m);
        assert!(pos.meta_top().contains(Square::C1));
    }

    #[test]
    fn castle_moves_rook_and_restores() {
        // cleared white kingside: king on E1, rook on H1, right at G1
        let info = fen::parse("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let mut pos = info.position.clone();
        let before = pos.clone();
        let m = Move::new_castle(Square::E1, Square::G1, Color::White);
        assert!(pos.make(m));
        assert!(pos.pieces(Color::White, Piece::King).contains(Square::G1));
        assert!(pos.pieces(Color::White, Piece::Rook).contains(Square::F1));
        assert!(!pos.pieces(Color::White, Piece::Rook).contains(Square::H1));
        pos.unmake(m);
        assert_eq!(pos, before);
    }

    #[test]
    fn castle_through_attack_is_illegal() {
        // Black rook on f8 covers F1; castling kingside crosses it
        let info = fen::parse("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let mut pos = info.position.clone();
        let m = Move::new_castle(Square::E1, Square::G1, Color::White);
        assert!(!pos.make(m));
        pos.unmake(m);
        assert_eq!(pos, info.position);
    }

    #[test]
    fn moving_into_check_is_illegal() {
        let info = fen::parse("4k3/8/8/7b/8/8/4P3/3K4 w - - 0 1").unwrap();
        let mut pos = info.position.clone();
        // the e2 pawn is pinned against the king by the h5 bishop
        let m = Move::new_quiet(Square::E2, Square::E3, Piece::Pawn, Color::White);
        assert!(!pos.make(m));
        pos.unmake(m);
        assert_eq!(pos, info.position);
    }

    #[test]
    fn attacked_squares_of_start_position() {
        let info = fen::start_position();
        let attacked = info.position.attacked_squares(Color::White);
        // the whole third rank is covered, nothing past the fourth
        assert_eq!(attacked & Bitboard::RANK_3, Bitboard::RANK_3);
        assert!((attacked & Bitboard::new(0xFFFF_FFFF_0000_0000)).is_empty());
    }
}
