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

//! Throughput benchmarks for the hot paths: move generation (via
//! perft) and static evaluation.

use criterion::{criterion_group, criterion_main, Criterion};

use trebuchet::base::{fen, perft::perft};
use trebuchet::engine::eval::evaluate;

fn perft_start(c: &mut Criterion) {
    let info = fen::start_position();
    c.bench_function("perft 4 from the start position", |b| {
        b.iter(|| {
            let mut pos = info.position.clone();
            assert_eq!(perft(&mut pos, info.side, 4), 197_281);
        });
    });
}

fn perft_kiwipete(c: &mut Criterion) {
    let info =
        fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    c.bench_function("perft 3 from kiwipete", |b| {
        b.iter(|| {
            let mut pos = info.position.clone();
            assert_eq!(perft(&mut pos, info.side, 3), 97_862);
        });
    });
}

fn evaluate_middlegame(c: &mut Criterion) {
    let info =
        fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    c.bench_function("evaluate kiwipete", |b| {
        b.iter(|| evaluate(&info.position));
    });
}

criterion_group!(benches, perft_start, perft_kiwipete, evaluate_middlegame);
criterion_main!(benches);
