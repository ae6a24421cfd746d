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

//! The search core: iterative deepening with aspiration windows around a
//! principal-variation alpha-beta in negamax form, with quiescence at
//! the leaves.
//!
//! The move loop leans on a family of cooperating heuristics: the
//! transposition-table move, killers and history for ordering; null-move
//! pruning, futility margins and late-move reductions for cutting the
//! tree down; and a check extension so forcing lines are not cut short.
//! Cancellation is cooperative: the UCI thread flips an atomic flag, and
//! every alpha-beta entry checks it.

use crate::base::{
    movegen::{get_captures, get_moves, has_legal_move},
    zobrist::move_hash,
    Color, Move, MoveList, Piece, Position, PIECE_VALUES,
};

use super::{
    eval::{nega_evaluate, KING_TAKEN},
    transposition::{verification, Bound, Table},
};

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

/// The deepest iteration the driver will start.
pub const MAX_DEPTH: u32 = 30;

/// Scores beyond this magnitude can only come from a (forced) king
/// capture, so the driver stops deepening once it sees one.
pub const MATE_THRESHOLD: i32 = 5000;

/// Width of the first aspiration window, and of the re-centered window
/// after each completed depth.
const START_WINDOW: i32 = 30;

/// Quiescence skips captures which cannot lift alpha even with this
/// margin of positional slack on top of the captured piece.
const DELTA_PRUNING_MARGIN: i32 = 200;

/// Depth subtracted (beyond the usual one) for a null-move search.
const NULL_MOVE_REDUCTION: i32 = 2;

/// At most this many check extensions per line.
const MAX_CHECK_EXTENSION: u8 = 2;

/// Sort-score boost for the transposition table's best move.
const TT_MOVE_BONUS: i32 = 1_100_000;

/// Sort-score boosts for the two killer slots; between the captures and
/// the history-ranked quiets.
const FIRST_KILLER_BONUS: i32 = 999_999;
const SECOND_KILLER_BONUS: i32 = 899_999;

/// Root-ordering bonus for the table's best move.
const ROOT_TT_BONUS: i32 = 1000;

/// Killer slots are tracked for this many plies.
const MAX_PLY: usize = 32;

/// How often the ponder wait loop re-checks its flags.
const PONDER_POLL: Duration = Duration::from_millis(3);

/// Two quiet moves per ply which most recently caused a beta cutoff
/// there. Tried right after the captures.
struct Killers([[Move; 2]; MAX_PLY]);

impl Killers {
    fn new() -> Killers {
        Killers([[Move::NONE; 2]; MAX_PLY])
    }

    #[inline(always)]
    fn first(&self, ply: usize) -> Move {
        self.0[ply - 1][0]
    }

    #[inline(always)]
    fn second(&self, ply: usize) -> Move {
        self.0[ply - 1][1]
    }

    /// Remember a cutoff move, shifting the previous first killer into
    /// the second slot.
    fn store(&mut self, ply: usize, m: Move) {
        let slots = &mut self.0[ply - 1];
        if slots[0] != m {
            slots[1] = slots[0];
            slots[0] = m;
        }
    }
}

/// Per-(from, to) counters of how often a quiet move raised alpha,
/// weighted by depth. Used to order the quiet tail of the move list.
type History = [[i32; 64]; 64];

/// One search job: the engine side of a single `go` command. Owns the
/// clock and the node counter; shares two atomic flags with the UCI
/// thread, which writes them (release) while the search only reads them
/// (acquire).
pub struct Search {
    start: Instant,
    should_run: Arc<AtomicBool>,
    pondering: Arc<AtomicBool>,
    /// The time budget for this search, in milliseconds.
    pub max_think_time_ms: u64,
    /// The deepest iteration to run.
    pub max_depth: u32,
    /// Nodes visited so far.
    pub node_count: u64,
    /// Whether to cut an iteration short when the next depth clearly
    /// cannot finish in budget. `movetime` searches turn this off.
    pub save_time: bool,
    /// Transposition-table freshness counter for this search.
    pub generation: u8,
    best_move: Option<Move>,
    ponder_move: Option<Move>,
    best_score: i32,
}

impl Search {
    #[must_use]
    /// Create a search which reads the given stop and ponder flags.
    pub fn new(should_run: Arc<AtomicBool>, pondering: Arc<AtomicBool>) -> Search {
        Search {
            start: Instant::now(),
            should_run,
            pondering,
            max_think_time_ms: 10_000,
            max_depth: MAX_DEPTH,
            node_count: 0,
            save_time: true,
            generation: 0,
            best_move: None,
            ponder_move: None,
            best_score: 0,
        }
    }

    #[must_use]
    /// The best move found so far, if any iteration completed.
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    #[must_use]
    /// The expected reply to the best move, used as the ponder move.
    pub fn ponder_move(&self) -> Option<Move> {
        self.ponder_move
    }

    #[must_use]
    /// The score of the best move, from the searching side's view.
    pub fn best_score(&self) -> i32 {
        self.best_score
    }

    #[inline]
    fn time_to_stop(&self) -> bool {
        let out_of_time = self.start.elapsed().as_millis() as u64 > self.max_think_time_ms
            && !self.pondering.load(Ordering::Acquire);
        out_of_time || !self.should_run.load(Ordering::Acquire)
    }

    /// Capture-only search: resolve all favorable exchanges and return a
    /// fail-hard score for the quiet position behind them.
    fn qsearch(&mut self, side: Color, mut alpha: i32, beta: i32, pos: &mut Position) -> i32 {
        // captures are pseudo-legal, so a king may transiently be gone
        if pos.pieces(Color::White, Piece::King).is_empty() {
            return if side.is_white() { -KING_TAKEN } else { KING_TAKEN };
        }
        if pos.pieces(Color::Black, Piece::King).is_empty() {
            return if side.is_white() { KING_TAKEN } else { -KING_TAKEN };
        }

        let static_eval = nega_evaluate(pos, side);
        if static_eval > alpha {
            alpha = static_eval;
        }
        if static_eval >= beta {
            return beta;
        }

        let mut moves = get_captures(pos, side);
        if moves.is_empty() {
            // the end point of the quiescence search
            return static_eval;
        }
        let mut has_legal_capture = false;
        let mut i = 0;
        while i < moves.len() {
            moves.pick_next(i);
            let m = moves[i].m;
            i += 1;
            // delta pruning: even winning the piece outright cannot help
            if static_eval + PIECE_VALUES[m.captured_field() as usize] + DELTA_PRUNING_MARGIN
                < alpha
            {
                continue;
            }
            if !pos.make(m) {
                pos.unmake(m);
                continue;
            }
            has_legal_capture = true;
            let res = -self.qsearch(!side, -beta, -alpha, pos);
            pos.unmake(m);
            if res >= beta {
                return beta;
            }
            if res > alpha {
                alpha = res;
            }
            if self.time_to_stop() {
                return alpha;
            }
        }
        if !has_legal_capture {
            return static_eval;
        }
        alpha
    }

    /// Futility pruning: at shallow depths, a node whose static
    /// evaluation trails alpha by more than any plausible positional
    /// swing is dropped straight into quiescence.
    fn should_prune(depth: i32, side: Color, pos: &Position, alpha: i32) -> bool {
        let margin = match depth {
            1 => 300,
            2 => 520,
            3 => 900,
            _ => return false,
        };
        nega_evaluate(pos, side) + margin < alpha
    }

    #[allow(clippy::too_many_arguments)]
    fn null_window_search(
        &mut self,
        side: Color,
        depth: i32,
        beta: i32,
        pos: &mut Position,
        tt: &mut Table,
        null_disabled: bool,
        killers: &mut Killers,
        history: &mut History,
        ply: usize,
        extension: u8,
    ) -> i32 {
        let alpha = beta - 1;
        self.alpha_beta(
            side,
            depth,
            alpha,
            beta,
            pos,
            tt,
            null_disabled,
            killers,
            history,
            ply,
            extension,
        )
    }

    #[allow(clippy::too_many_arguments)]
    /// Principal-variation alpha-beta in negamax form. Returns a
    /// fail-hard score for the position from `side`'s perspective.
    fn alpha_beta(
        &mut self,
        side: Color,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        pos: &mut Position,
        tt: &mut Table,
        null_disabled: bool,
        killers: &mut Killers,
        history: &mut History,
        ply: usize,
        mut extension: u8,
    ) -> i32 {
        if depth <= 0 {
            return self.qsearch(side, alpha, beta, pos);
        }
        if self.time_to_stop() {
            return alpha;
        }
        if Search::should_prune(depth, side, pos, alpha) {
            return self.qsearch(side, alpha, beta, pos);
        }

        // null move: give the turn away and search shallower; if even
        // that refutes the opponent, the real position surely does
        if !null_disabled && depth > 3 {
            pos.make_null();
            let res = -self.alpha_beta(
                !side,
                depth - 1 - NULL_MOVE_REDUCTION,
                -beta,
                -alpha,
                pos,
                tt,
                true,
                killers,
                history,
                ply + 1,
                extension,
            );
            pos.unmake_null();
            if res >= beta {
                return beta;
            }
        }

        let key = pos.hash_key();
        let tt_move = {
            let entry = tt.probe(key);
            if entry.verification == verification(key) {
                entry.best_move
            } else {
                Move::NONE
            }
        };

        let mut moves = get_moves(pos, side);
        for sm in moves.iter_mut() {
            // the table's best move goes first
            if !tt_move.is_none() && sm.m == tt_move {
                sm.score += TT_MOVE_BONUS;
            }
            // then captures (scored at generation time), then killers,
            // then quiets by history
            if !sm.m.is_capture() {
                if killers.first(ply) == sm.m {
                    sm.score += FIRST_KILLER_BONUS;
                } else if killers.second(ply) == sm.m {
                    sm.score += SECOND_KILLER_BONUS;
                } else {
                    sm.score +=
                        history[sm.m.from_square() as usize][sm.m.to_square() as usize];
                }
            }
        }

        let mut best_move = Move::NONE;
        let mut has_legal_move = false;
        let mut late_eval = 0;
        for i in 0..moves.len() {
            moves.pick_next(i);
            let m = moves[i].m;
            self.node_count += 1;
            if !pos.make(m) {
                pos.unmake(m);
                continue;
            }
            has_legal_move = true;

            let res;
            if i < 5 && best_move.is_none() {
                // the first few moves get the full window, one ply
                // deeper if they give check
                let mut depth_extension = 0;
                if extension < MAX_CHECK_EXTENSION
                    && !(pos.attacked_squares(side) & pos.pieces(!side, Piece::King)).is_empty()
                {
                    extension += 1;
                    depth_extension = 1;
                }
                res = -self.alpha_beta(
                    !side,
                    depth - 1 + depth_extension,
                    -beta,
                    -alpha,
                    pos,
                    tt,
                    null_disabled,
                    killers,
                    history,
                    ply + 1,
                    extension,
                );
            } else {
                // prune late moves that cannot reach alpha anyway
                if i == 12 && depth <= 2 {
                    late_eval = nega_evaluate(pos, side);
                }
                if i >= 12 && depth <= 2 && late_eval + 100 < alpha {
                    pos.unmake(m);
                    break;
                }
                // late-move reduction: trust the ordering and search the
                // tail of the list shallower
                let mut reduction = 0;
                if depth > 2 && i > 5 && !m.is_capture() {
                    reduction = if depth > 5 && i > 20 { 2 } else { 1 };
                }
                // a cheap null-window probe first; only a surprise gets
                // the full window, and only a reduced surprise gets the
                // full depth
                let mut r = -self.null_window_search(
                    !side,
                    depth - 1 - reduction,
                    -alpha,
                    pos,
                    tt,
                    null_disabled,
                    killers,
                    history,
                    ply + 1,
                    extension,
                );
                if r > alpha {
                    r = -self.alpha_beta(
                        !side,
                        depth - 1 - reduction,
                        -beta,
                        -alpha,
                        pos,
                        tt,
                        null_disabled,
                        killers,
                        history,
                        ply + 1,
                        extension,
                    );
                }
                if reduction > 0 && r > alpha && r < beta {
                    r = -self.alpha_beta(
                        !side,
                        depth - 1,
                        -beta,
                        -alpha,
                        pos,
                        tt,
                        null_disabled,
                        killers,
                        history,
                        ply + 1,
                        extension,
                    );
                }
                res = r;
            }

            pos.unmake(m);
            if self.time_to_stop() {
                return alpha;
            }
            if res >= beta {
                if !m.is_capture() {
                    killers.store(ply, m);
                }
                tt.probe(key).save(
                    verification(key),
                    m,
                    depth as u8,
                    Bound::Lower,
                    clamp_score(beta),
                    self.generation,
                );
                return beta;
            }
            if res > alpha {
                best_move = m;
                alpha = res;
                if !m.is_capture() {
                    history[m.from_square() as usize][m.to_square() as usize] += depth;
                }
            }
        }

        if !has_legal_move {
            return if pos.in_check(side) {
                // checkmated
                -KING_TAKEN
            } else {
                // stalemate
                0
            };
        }

        let bound = if best_move.is_none() {
            Bound::Upper
        } else {
            Bound::Exact
        };
        tt.probe(key).save(
            verification(key),
            best_move,
            depth as u8,
            bound,
            clamp_score(alpha),
            self.generation,
        );
        alpha
    }

    /// Iterative deepening from the root with aspiration windows.
    /// Prints `info` lines as depths complete and a final `bestmove`
    /// (after the ponder wait, if pondering).
    pub fn search_best_move(
        &mut self,
        position: &Position,
        side: Color,
        game_history: &[(Position, Color)],
        tt: &mut Table,
    ) {
        self.start = Instant::now();
        self.best_move = None;
        self.ponder_move = None;

        let mut p = position.clone();
        let mut root_moves = get_moves(&p, side);

        // order root moves by a shallow evaluation guess, with a nudge
        // for the move the table remembers
        let root_key = p.hash_key();
        let tt_move = {
            let entry = tt.probe(root_key);
            if entry.verification == verification(root_key) {
                entry.best_move
            } else {
                Move::NONE
            }
        };
        for sm in root_moves.iter_mut() {
            p.make(sm.m);
            sm.score = nega_evaluate(&p, side);
            p.unmake(sm.m);
            if !tt_move.is_none() && sm.m == tt_move {
                sm.score += ROOT_TT_BONUS;
            }
        }

        let mut killers = Killers::new();
        let mut history: History = [[0; 64]; 64];

        let in_check = !(p.attacked_squares(!side) & p.pieces(side, Piece::King)).is_empty();

        let mut alpha = -START_WINDOW;
        let mut beta = START_WINDOW;
        // if the clock expires before any window settles, answer with
        // the first legal move rather than nothing
        let mut fallback: Option<Move> = None;
        let mut depth: u32 = 1;
        while depth <= self.max_depth {
            let mut score = alpha;
            let mut a = alpha;
            let b = beta;
            let mut next_iteration = MoveList::new();
            let mut pv: Vec<Move> = Vec::new();
            let mut any_legal = false;

            for i in 0..root_moves.len() {
                root_moves.pick_next(i);
                let mut sm = root_moves[i];
                if a < b {
                    self.node_count += 1;
                    if !p.make(sm.m) {
                        p.unmake(sm.m);
                        continue;
                    }
                    any_legal = true;
                    if fallback.is_none() {
                        fallback = Some(sm.m);
                    }

                    // a single earlier occurrence with matching
                    // side-to-move already counts as a draw
                    let mut res = None;
                    for (hist_pos, hist_side) in game_history {
                        if *hist_side != side && p.same_pieces(hist_pos) {
                            res = Some(0);
                            break;
                        }
                    }
                    if res.is_none() {
                        // stalemating the opponent is a draw too
                        let opponent_in_check =
                            !(p.attacked_squares(side) & p.pieces(!side, Piece::King)).is_empty();
                        if !opponent_in_check && !has_legal_move(&mut p, !side) {
                            res = Some(0);
                        }
                    }
                    let res = match res {
                        Some(r) => r,
                        None if i > 0 && depth > 1 => {
                            // cheap null-window probe to confirm this
                            // move is worse than the best so far
                            let probe = -self.null_window_search(
                                !side,
                                depth as i32 - 1,
                                -a,
                                &mut p,
                                tt,
                                in_check,
                                &mut killers,
                                &mut history,
                                1,
                                0,
                            );
                            if probe > a {
                                -self.alpha_beta(
                                    !side,
                                    depth as i32 - 1,
                                    -b,
                                    -a,
                                    &mut p,
                                    tt,
                                    in_check,
                                    &mut killers,
                                    &mut history,
                                    1,
                                    0,
                                )
                            } else {
                                // keep the sort order without a full search
                                a - i as i32 * 500
                            }
                        }
                        None => -self.alpha_beta(
                            !side,
                            depth as i32 - 1,
                            -b,
                            -a,
                            &mut p,
                            tt,
                            in_check,
                            &mut killers,
                            &mut history,
                            1,
                            0,
                        ),
                    };
                    p.unmake(sm.m);

                    if res > a && (!self.time_to_stop() || i == 0) {
                        score = res;
                        a = res;
                        pv = reconstruct_pv(sm.m, &p, tt, depth);
                        sm.score = res;
                    } else {
                        sm.score = a - i as i32 * 500;
                    }
                } else {
                    // the window already failed high; the rest keep
                    // their relative order
                    sm.score = a - i as i32 * 500;
                }
                next_iteration.push_back(sm.m, sm.score);
            }

            let elapsed = self.start.elapsed().as_millis() as u64;
            if score > alpha && score < beta {
                self.best_move = pv.first().copied();
                self.ponder_move = pv.get(1).copied();
                self.best_score = score;
                self.print_uci_info(&pv, depth, score);
            }
            if !any_legal {
                // mated or stalemated at the root; nothing to deepen
                break;
            }
            if self.time_to_stop() {
                break;
            }

            let window = beta - alpha;
            if score <= alpha {
                // failed low: widen downward, repeat this depth
                alpha -= window;
                continue;
            }
            if score >= beta {
                // failed high: widen upward, repeat this depth
                beta += window;
                continue;
            }

            root_moves = next_iteration;
            alpha = score - START_WINDOW / 2;
            beta = score + START_WINDOW / 2;

            // a found mate cannot improve with depth
            if score.abs() > MATE_THRESHOLD {
                break;
            }
            if self.save_time && 4 * elapsed > self.max_think_time_ms {
                break;
            }
            depth += 1;
        }

        // pondering holds the answer back until the GUI decides
        while self.pondering.load(Ordering::Acquire) && self.should_run.load(Ordering::Acquire) {
            thread::sleep(PONDER_POLL);
        }

        match (self.best_move.or(fallback), self.ponder_move) {
            (Some(m), Some(pm)) => println!("bestmove {m} ponder {pm}"),
            (Some(m), None) => println!("bestmove {m}"),
            (None, _) => println!("bestmove 0000"),
        }
    }

    fn print_uci_info(&self, pv: &[Move], depth: u32, score: i32) {
        let elapsed = self.start.elapsed().as_millis();
        let pv_string = pv.iter().map(|m| m.to_uci()).collect::<Vec<_>>().join(" ");
        println!(
            "info score cp {score} depth {depth} time {elapsed} nodes {} pv {pv_string}",
            self.node_count
        );
    }
}

/// Rebuild the principal variation after a new best root move: starting
/// from the root hash, follow the chain of best moves recorded in the
/// transposition table until it runs out or the depth is exhausted.
fn reconstruct_pv(first: Move, root: &Position, tt: &mut Table, depth: u32) -> Vec<Move> {
    let mut pv = vec![first];
    let mut hash = root.hash_key();
    let mut next = first;
    for _ in 1..depth {
        hash ^= move_hash(next);
        let entry = tt.probe(hash);
        if entry.verification == verification(hash) && !entry.best_move.is_none() {
            pv.push(entry.best_move);
            next = entry.best_move;
        } else {
            break;
        }
    }
    pv
}

#[inline(always)]
/// Squeeze a search score into the table's 16-bit score field.
fn clamp_score(score: i32) -> i16 {
    score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::fen;

    fn flags() -> (Arc<AtomicBool>, Arc<AtomicBool>) {
        (
            Arc::new(AtomicBool::new(true)),
            Arc::new(AtomicBool::new(false)),
        )
    }

    /// Run a search over a FEN to a fixed depth with a generous clock.
    fn search_helper(fen_str: &str, depth: u32) -> Search {
        let info = fen::parse(fen_str).unwrap();
        let (run, ponder) = flags();
        let mut search = Search::new(run, ponder);
        search.max_depth = depth;
        search.max_think_time_ms = 60_000;
        search.save_time = false;
        let mut tt = Table::with_size_mb(16);
        search.search_best_move(&info.position, info.side, &[], &mut tt);
        search
    }

    #[test]
    fn finds_mate_in_one() {
        // Rb8# is the only mate
        let search = search_helper("3k4/R7/1R6/5K2/8/8/8/8 w - - 0 1", 2);
        let best = search.best_move().expect("search found a move");
        assert_eq!(best.to_uci(), "b6b8");
        assert!(search.best_score() > MATE_THRESHOLD);
    }

    #[test]
    fn finds_the_fried_liver_refutation() {
        // Qf3+ wins material by force
        let search = search_helper("r1bq1b1r/ppp2kpp/2n5/3np3/2B5/8/PPPP1PPP/RNBQK2R w KQ - 0 7", 6);
        let best = search.best_move().expect("search found a move");
        assert_eq!(best.to_uci(), "d1f3");
    }

    #[test]
    fn best_move_is_legal() {
        let info = fen::start_position();
        let search = search_helper(fen::START_FEN, 4);
        let best = search.best_move().expect("search found a move");
        let mut pos = info.position.clone();
        assert!(pos.make(best));
    }

    #[test]
    fn repetition_escape_is_a_draw() {
        // Black is hopelessly behind, but one knight retreat repeats a
        // position from the game history
        let info = fen::parse("k5n1/8/8/8/3Q4/8/8/K7 b - - 0 1").unwrap();
        let escape = Move::new_quiet(
            crate::base::Square::G8,
            crate::base::Square::F6,
            Piece::Knight,
            Color::Black,
        );
        let mut after = info.position.clone();
        assert!(after.make(escape));

        let (run, ponder) = flags();
        let mut search = Search::new(run, ponder);
        search.max_depth = 1;
        search.max_think_time_ms = 60_000;
        search.save_time = false;
        let mut tt = Table::with_size_mb(16);
        search.search_best_move(
            &info.position,
            info.side,
            &[(after, Color::White)],
            &mut tt,
        );

        assert_eq!(search.best_move().map(|m| m.to_uci()), Some("g8f6".into()));
        assert_eq!(search.best_score(), 0);
    }

    #[test]
    fn stop_flag_halts_the_search_quickly() {
        let info = fen::start_position();
        let run = Arc::new(AtomicBool::new(false));
        let ponder = Arc::new(AtomicBool::new(false));
        let mut search = Search::new(run, ponder);
        search.max_depth = MAX_DEPTH;
        search.max_think_time_ms = u64::MAX / 8;
        let mut tt = Table::with_size_mb(16);
        let begin = Instant::now();
        search.search_best_move(&info.position, info.side, &[], &mut tt);
        assert!(begin.elapsed() < Duration::from_secs(2));
        // only the first depth's root pass could have run
        assert!(search.node_count < 10_000);
    }

    #[test]
    fn qsearch_is_fail_hard_above() {
        let info =
            fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        let (run, ponder) = flags();
        let mut search = Search::new(run, ponder);
        search.max_think_time_ms = 60_000;
        let mut pos = info.position.clone();
        let res = search.qsearch(info.side, -50, 50, &mut pos);
        assert!(res <= 50);
        // the position must be untouched by the capture walk
        assert_eq!(pos, info.position);
    }

    #[test]
    fn stalemate_scores_zero() {
        // White to move cannot stalemate-trap here, but Black's reply
        // position is a stalemate test at depth 1 inside alpha-beta
        let info = fen::parse("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let (run, ponder) = flags();
        let mut search = Search::new(run, ponder);
        search.max_think_time_ms = 60_000;
        let mut tt = Table::with_size_mb(1);
        let mut killers = Killers::new();
        let mut history: History = [[0; 64]; 64];
        let mut pos = info.position.clone();
        let res = search.alpha_beta(
            Color::Black,
            3,
            -20_000,
            20_000,
            &mut pos,
            &mut tt,
            false,
            &mut killers,
            &mut history,
            1,
            0,
        );
        assert_eq!(res, 0);
    }
}
