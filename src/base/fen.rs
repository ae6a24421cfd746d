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

//! Forsyth-Edwards Notation: turning strings into positions and back.
//!
//! The parser is permissive where the UCI protocol recommends it: a
//! missing side-to-move, castling, or move-counter field falls back to a
//! sensible default rather than failing, but a malformed board field is
//! an error.

use super::{Bitboard, Color, Piece, Position, Square};

/// The FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Debug)]
/// Everything a FEN string describes: the position itself, whose turn it
/// is, and the two move counters. The halfmove clock is carried only so
/// that FEN round-trips; the engine does not consult it.
pub struct FenInfo {
    pub position: Position,
    pub side: Color,
    pub halfmove: u32,
    pub fullmove: u32,
}

#[must_use]
/// The standard starting position.
///
/// # Panics
///
/// Never panics; the start FEN is known to be valid.
pub fn start_position() -> FenInfo {
    parse(START_FEN).expect("start FEN parses")
}

/// Parse a FEN string.
///
/// # Errors
///
/// Returns a description of the failure if the board field of `fen` is
/// malformed.
pub fn parse(fen: &str) -> Result<FenInfo, String> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let board = fields.first().ok_or("empty FEN string")?;

    let mut position = Position::empty();
    let rows: Vec<&str> = board.split('/').collect();
    if rows.len() != 8 {
        return Err(format!("expected 8 board rows, got {}", rows.len()));
    }
    for (row_idx, row) in rows.iter().enumerate() {
        let rank = 7 - row_idx as u8;
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                continue;
            }
            let piece = Piece::from_code(c.to_ascii_lowercase())
                .ok_or_else(|| format!("unknown piece character `{c}`"))?;
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            if file > 7 {
                return Err(format!("board row `{row}` is too long"));
            }
            position.put(color, piece, Square::new(rank << 3 | file));
            file += 1;
        }
        if file != 8 {
            return Err(format!("board row `{row}` does not cover 8 files"));
        }
    }

    let side = match fields.get(1) {
        Some(&"b") => Color::Black,
        _ => Color::White,
    };

    let mut meta = Bitboard::EMPTY;
    if let Some(castling) = fields.get(2) {
        if castling.contains('K') {
            meta.insert(Square::G1);
        }
        if castling.contains('Q') {
            meta.insert(Square::C1);
        }
        if castling.contains('k') {
            meta.insert(Square::G8);
        }
        if castling.contains('q') {
            meta.insert(Square::C8);
        }
    }
    if let Some(ep) = fields.get(3) {
        if ep.len() == 2 {
            if let Ok(sq) = Square::from_algebraic(ep) {
                meta.insert(sq);
            }
        }
    }
    position.set_meta(meta);

    let halfmove = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
    let fullmove = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

    Ok(FenInfo {
        position,
        side,
        halfmove,
        fullmove,
    })
}

#[must_use]
/// Render a position back into a FEN string.
pub fn write(pos: &Position, side: Color, halfmove: u32, fullmove: u32) -> String {
    let mut out = String::with_capacity(80);

    for rank in (0..8).rev() {
        let mut empties = 0;
        for file in 0..8 {
            let sq = Square::new(rank << 3 | file);
            match piece_on(pos, sq) {
                None => empties += 1,
                Some((color, piece)) => {
                    if empties > 0 {
                        out.push(char::from_digit(empties, 10).unwrap());
                        empties = 0;
                    }
                    let code = piece.code();
                    out.push(if color.is_white() {
                        code.to_ascii_uppercase()
                    } else {
                        code
                    });
                }
            }
        }
        if empties > 0 {
            out.push(char::from_digit(empties, 10).unwrap());
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(if side.is_white() { 'w' } else { 'b' });

    out.push(' ');
    let meta = pos.meta_top();
    let mut any_rights = false;
    for (sq, code) in [
        (Square::G1, 'K'),
        (Square::C1, 'Q'),
        (Square::G8, 'k'),
        (Square::C8, 'q'),
    ] {
        if meta.contains(sq) {
            out.push(code);
            any_rights = true;
        }
    }
    if !any_rights {
        out.push('-');
    }

    out.push(' ');
    let ep = meta & (Bitboard::RANK_3 | Bitboard::RANK_6);
    if ep.is_empty() {
        out.push('-');
    } else {
        out.push_str(&ep.lsb_square().to_string());
    }

    out.push_str(&format!(" {halfmove} {fullmove}"));
    out
}

/// Find the piece on a square, if any.
fn piece_on(pos: &Position, sq: Square) -> Option<(Color, Piece)> {
    for color in [Color::White, Color::Black] {
        for piece in Piece::ALL {
            if pos.pieces(color, piece).contains(sq) {
                return Some((color, piece));
            }
        }
    }
    None
}
