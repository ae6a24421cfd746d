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

//! The UCI front end: a line-oriented loop on stdin which owns the
//! position, the game history, and the transposition table, and hands
//! the table to one search thread at a time.
//!
//! The parser is permissive, as the protocol asks: unknown commands and
//! malformed parameters are ignored rather than answered.

use crate::base::{
    attacks, fen, perft::perft, Bitboard, Color, Move, Piece, Position, Square, FIELD_EMPTY,
    FIELD_EN_PASSANT,
};
use crate::engine::{
    search::{Search, MAX_DEPTH},
    transposition::Table,
};

use once_cell::sync::Lazy;

use std::{
    io::{self, BufRead},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Instant,
};

/// Default transposition-table size, in megabytes.
const DEFAULT_HASH_MB: usize = 16;

/// The fixed position searched by the `bench` command.
const BENCH_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

/// A running search thread. The transposition table travels into the
/// thread when a search starts and comes back when it is joined.
struct Worker {
    handle: JoinHandle<Table>,
    should_run: Arc<AtomicBool>,
    pondering: Arc<AtomicBool>,
}

/// Stop the running search (if any), wait for its `bestmove`, and take
/// the transposition table back.
fn stop_worker(worker: &mut Option<Worker>, table: &mut Option<Table>, hash_mb: usize) {
    if let Some(w) = worker.take() {
        w.should_run.store(false, Ordering::Release);
        w.pondering.store(false, Ordering::Release);
        *table = Some(
            w.handle
                .join()
                .unwrap_or_else(|_| Table::with_size_mb(hash_mb)),
        );
    }
}

/// Find the integer following the token `name` in `line`, if any.
fn parse_int_parameter(line: &str, name: &str) -> Option<u64> {
    let mut tokens = line.split_whitespace();
    while let Some(tok) = tokens.next() {
        if tok == name {
            return tokens.next().and_then(|v| v.parse().ok());
        }
    }
    None
}

/// The piece of `side` standing on `sq`, if any.
fn piece_at(position: &Position, sq: Square, side: Color) -> Option<Piece> {
    Piece::ALL
        .into_iter()
        .find(|&p| position.pieces(side, p).contains(sq))
}

/// Reconstruct a full move word from its long-algebraic form and the
/// position it is played in, then apply it. Malformed move strings are
/// ignored; a promotion without a letter becomes a queen.
fn update_with_move(position: &mut Position, move_str: &str, side: Color) {
    if move_str.len() < 4 {
        return;
    }
    let (Ok(from), Ok(to)) = (
        Square::from_algebraic(&move_str[0..2]),
        Square::from_algebraic(&move_str[2..4]),
    ) else {
        return;
    };
    let Some(piece) = piece_at(position, from, side) else {
        return;
    };

    let meta = position.meta_top();
    let mut promotion = FIELD_EMPTY;
    if piece == Piece::Pawn && (to.rank() == 7 || to.rank() == 0) {
        promotion = match move_str.chars().nth(4) {
            Some('n') => Piece::Knight as u32,
            Some('b') => Piece::Bishop as u32,
            Some('r') => Piece::Rook as u32,
            // missing or unexpected promotion letter: assume a queen
            _ => Piece::Queen as u32,
        };
    }

    let ep_capture = piece == Piece::Pawn
        && !(Bitboard::square(to) & meta & (Bitboard::RANK_3 | Bitboard::RANK_6)).is_empty();

    let is_castle = piece == Piece::King
        && ((from == Square::E1 && (to == Square::G1 || to == Square::C1))
            || (from == Square::E8 && (to == Square::G8 || to == Square::C8)));

    let m = if is_castle {
        Move::new_castle(from, to, side)
    } else if position.occupied().contains(to) || ep_capture {
        let captured = if ep_capture {
            FIELD_EN_PASSANT
        } else {
            piece_at(position, to, !side).map_or(FIELD_EN_PASSANT, |p| p as u32)
        };
        Move::new_capture(from, to, piece, captured, side, promotion)
    } else {
        Move::new_quiet_promotion(from, to, piece, side, promotion)
    };

    position.make(m);
}

/// The time budget for one move: a fraction of the remaining clock,
/// spending more generously in the opening.
fn think_time_ms(time: u64, inc: u64, moves_togo: u64, move_number: u64) -> u64 {
    let factor = 2 - move_number.clamp(10, 20) / 20;
    (factor * ((time + (moves_togo - 1) * inc) / moves_togo)).saturating_sub(3)
}

/// Run the UCI loop until `quit` or end of input.
pub fn run() {
    // pay for the attack tables now, not on the first `go`
    Lazy::force(&attacks::ATTACKS);

    let start_info = fen::start_position();
    let mut position = start_info.position;
    let mut side = start_info.side;
    let mut move_number: u64 = u64::from(start_info.fullmove);
    let mut history: Vec<(Position, Color)> = Vec::new();

    let mut hash_mb = DEFAULT_HASH_MB;
    let mut table = Some(Table::with_size_mb(hash_mb));
    let mut worker: Option<Worker> = None;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            continue;
        };

        match command {
            "uci" => {
                println!("id name trebuchet {}", env!("CARGO_PKG_VERSION"));
                println!("id author The Trebuchet Authors");
                println!("option name Hash type spin default {DEFAULT_HASH_MB} min 1 max 1024");
                println!("option name Ponder type check default false");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                stop_worker(&mut worker, &mut table, hash_mb);
                let info = fen::start_position();
                position = info.position;
                side = info.side;
                move_number = u64::from(info.fullmove);
                history.clear();
                table = Some(Table::with_size_mb(hash_mb));
            }
            "setoption" => {
                if line.contains("name Hash") {
                    if let Some(mb) = parse_int_parameter(&line, "value") {
                        stop_worker(&mut worker, &mut table, hash_mb);
                        hash_mb = (mb as usize).clamp(1, 1024);
                        table = Some(Table::with_size_mb(hash_mb));
                    }
                }
                // Ponder is advisory; nothing to configure
            }
            "position" => {
                stop_worker(&mut worker, &mut table, hash_mb);
                history.clear();
                if line.contains("startpos") {
                    let info = fen::start_position();
                    position = info.position;
                    side = info.side;
                    move_number = u64::from(info.fullmove);
                }
                if let Some(fen_at) = line.find("fen") {
                    let after = &line[fen_at + 3..];
                    let fen_str = match after.find("moves") {
                        Some(moves_at) => &after[..moves_at],
                        None => after,
                    };
                    if let Ok(info) = fen::parse(fen_str) {
                        position = info.position;
                        side = info.side;
                        move_number = u64::from(info.fullmove);
                    }
                }
                if let Some(moves_at) = line.find("moves") {
                    let mut applied = 0u64;
                    for move_str in line[moves_at + 5..].split_whitespace() {
                        history.push((position.clone(), side));
                        update_with_move(&mut position, move_str, side);
                        side = !side;
                        applied += 1;
                    }
                    move_number += applied / 2;
                }
            }
            "go" => {
                stop_worker(&mut worker, &mut table, hash_mb);
                let should_run = Arc::new(AtomicBool::new(true));
                let pondering = Arc::new(AtomicBool::new(
                    line.split_whitespace().any(|t| t == "ponder"),
                ));
                let mut search = Search::new(Arc::clone(&should_run), Arc::clone(&pondering));
                search.generation = move_number.min(255) as u8;

                if let Some(depth) = parse_int_parameter(&line, "depth") {
                    if depth != 0 {
                        search.max_depth = (depth as u32).min(MAX_DEPTH);
                    }
                }
                if line.contains("infinite") {
                    search.max_think_time_ms = u64::MAX / 4;
                } else if let Some(movetime) = parse_int_parameter(&line, "movetime") {
                    search.max_think_time_ms = movetime.saturating_sub(3);
                    search.save_time = false;
                } else {
                    let time = if side.is_white() {
                        parse_int_parameter(&line, "wtime")
                    } else {
                        parse_int_parameter(&line, "btime")
                    }
                    .unwrap_or(0);
                    let inc = if side.is_white() {
                        parse_int_parameter(&line, "winc")
                    } else {
                        parse_int_parameter(&line, "binc")
                    }
                    .unwrap_or(0);
                    let mut moves_togo = parse_int_parameter(&line, "movestogo").unwrap_or(0);
                    if moves_togo == 0 {
                        moves_togo = (40i64 - move_number as i64).max(10) as u64;
                    }
                    if time != 0 {
                        search.max_think_time_ms = think_time_ms(time, inc, moves_togo, move_number);
                    }
                }

                let pos = position.clone();
                let search_side = side;
                let game_history = history.clone();
                let mut tt = table.take().expect("table is home when no search runs");
                let handle = thread::spawn(move || {
                    search.search_best_move(&pos, search_side, &game_history, &mut tt);
                    tt
                });
                worker = Some(Worker {
                    handle,
                    should_run,
                    pondering,
                });
            }
            "stop" => stop_worker(&mut worker, &mut table, hash_mb),
            "ponderhit" => {
                if let Some(w) = &worker {
                    // ponder time now counts as time already spent
                    w.pondering.store(false, Ordering::Release);
                }
            }
            "quit" => {
                stop_worker(&mut worker, &mut table, hash_mb);
                return;
            }
            // non-UCI helpers
            "perft" => {
                let depth = match parse_int_parameter(&line, "depth") {
                    Some(0) | None => 5,
                    Some(d) => d,
                } as u32;
                let mut p = position.clone();
                for d in 1..=depth {
                    let begin = Instant::now();
                    let nodes = perft(&mut p, side, d);
                    println!(
                        "perft depth({d}) nodes: {nodes} in {} ms",
                        begin.elapsed().as_millis()
                    );
                }
            }
            "bench" => {
                stop_worker(&mut worker, &mut table, hash_mb);
                history.clear();
                let info = fen::parse(BENCH_FEN).expect("bench FEN parses");
                let should_run = Arc::new(AtomicBool::new(true));
                let pondering = Arc::new(AtomicBool::new(false));
                let mut search = Search::new(should_run, pondering);
                search.max_depth = 10;
                search.max_think_time_ms = 60_000;
                let mut tt = Table::with_size_mb(DEFAULT_HASH_MB);
                let begin = Instant::now();
                search.search_best_move(&info.position, info.side, &[], &mut tt);
                println!(
                    "bench {} nodes in {} ms",
                    search.node_count,
                    begin.elapsed().as_millis()
                );
            }
            "show" => match tokens.next() {
                Some("w") => {
                    println!("This program is distributed in the hope that it will be useful,");
                    println!("but WITHOUT ANY WARRANTY; without even the implied warranty of");
                    println!("MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the");
                    println!("GNU General Public License for more details.");
                }
                Some("c") => {
                    println!("This program is free software: you can redistribute it and/or modify");
                    println!("it under the terms of the GNU General Public License as published by");
                    println!("the Free Software Foundation, either version 3 of the License, or");
                    println!("(at your option) any later version.");
                }
                _ => {}
            },
            // unrecognized tokens are ignored, as the protocol asks
            _ => {}
        }
    }

    // end of input: make sure a running search is reaped
    stop_worker(&mut worker, &mut table, hash_mb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_integers() {
        let line = "go wtime 300000 btime 295000 winc 2000 binc 2000 movestogo 31";
        assert_eq!(parse_int_parameter(line, "wtime"), Some(300_000));
        assert_eq!(parse_int_parameter(line, "binc"), Some(2_000));
        assert_eq!(parse_int_parameter(line, "movestogo"), Some(31));
        assert_eq!(parse_int_parameter(line, "depth"), None);
        assert_eq!(parse_int_parameter("go depth x", "depth"), None);
    }

    #[test]
    fn budget_is_generous_early_and_tighter_later() {
        // early moves get the doubled factor
        let early = think_time_ms(60_000, 0, 30, 1);
        let later = think_time_ms(60_000, 0, 30, 25);
        assert_eq!(early, 2 * 2_000 - 3);
        assert_eq!(later, 2_000 - 3);
        // increment counts toward the budget
        assert!(think_time_ms(60_000, 1_000, 30, 25) > later);
    }

    #[test]
    fn replays_a_normal_move() {
        let info = fen::start_position();
        let mut position = info.position;
        update_with_move(&mut position, "e2e4", Color::White);
        assert!(position.pieces(Color::White, Piece::Pawn).contains(Square::E4));
        assert!(!position.pieces(Color::White, Piece::Pawn).contains(Square::E2));
    }

    #[test]
    fn replays_a_castle() {
        let info = fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mut position = info.position;
        update_with_move(&mut position, "e1g1", Color::White);
        assert!(position.pieces(Color::White, Piece::King).contains(Square::G1));
        assert!(position.pieces(Color::White, Piece::Rook).contains(Square::F1));
    }

    #[test]
    fn replays_a_promotion_with_default_queen() {
        let info = fen::parse("8/5P2/2k5/4K3/8/8/8/8 w - - 0 1").unwrap();
        let mut position = info.position;
        // no promotion letter: the queen is assumed
        update_with_move(&mut position, "f7f8", Color::White);
        assert!(position.pieces(Color::White, Piece::Queen).contains(Square::F8));
        assert!(position.pieces(Color::White, Piece::Pawn).is_empty());
    }

    #[test]
    fn replays_an_underpromotion() {
        let info = fen::parse("8/5P2/2k5/4K3/8/8/8/8 w - - 0 1").unwrap();
        let mut position = info.position;
        update_with_move(&mut position, "f7f8n", Color::White);
        assert!(position.pieces(Color::White, Piece::Knight).contains(Square::F8));
    }

    #[test]
    fn replays_an_en_passant_capture() {
        let info =
            fen::parse("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let mut position = info.position;
        update_with_move(&mut position, "e5d6", Color::White);
        assert!(position.pieces(Color::White, Piece::Pawn).contains(Square::D6));
        assert!(!position.pieces(Color::Black, Piece::Pawn).contains(Square::D5));
    }

    #[test]
    fn malformed_moves_are_ignored() {
        let info = fen::start_position();
        let mut position = info.position.clone();
        update_with_move(&mut position, "zz9x", Color::White);
        update_with_move(&mut position, "e2", Color::White);
        update_with_move(&mut position, "e5e6", Color::White); // no piece there
        assert_eq!(position, info.position);
    }
}
