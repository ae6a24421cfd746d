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

//! The transposition table: a fixed-size cache from position hash keys
//! to the best move, score, and bound found on an earlier visit.
//!
//! The table is organized into buckets of four entries. A probe scans
//! the bucket for a verification match and otherwise hands back the
//! entry with the lowest generation (breaking ties toward the lowest
//! depth), so old and shallow results make way for the current search.
//! Stored scores are kept conservative company: the search orders the
//! stored move first but does not cut off on the stored score.

use crate::base::Move;

use std::mem::size_of;

/// Entries per bucket. A probe for a key only ever touches one bucket.
const BUCKET_SIZE: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
/// What a stored score means relative to the true value of its position.
pub enum Bound {
    /// Slot has never been written.
    Unused = 0,
    /// The score is the exact minimax value at the stored depth.
    Exact = 1,
    /// The search failed high: the true value is at least the score.
    Lower = 2,
    /// The search failed low: the true value is at most the score.
    Upper = 3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// One transposition-table entry.
pub struct Entry {
    /// The upper 32 bits of the position's hash key, to verify a probe.
    pub verification: u32,
    /// The best move found from this position, or `Move::NONE`.
    pub best_move: Move,
    /// Remaining depth when this entry was written.
    pub depth: u8,
    /// How to interpret `score`.
    pub bound: Bound,
    /// Score in centipawns, from the perspective of the side to move at
    /// this position.
    pub score: i16,
    /// The root-search counter at write time; higher is fresher.
    pub generation: u8,
}

impl Entry {
    const EMPTY: Entry = Entry {
        verification: 0,
        best_move: Move::NONE,
        depth: 0,
        bound: Bound::Unused,
        score: 0,
        generation: 0,
    };

    /// Overwrite this slot in place.
    pub fn save(
        &mut self,
        verification: u32,
        best_move: Move,
        depth: u8,
        bound: Bound,
        score: i16,
        generation: u8,
    ) {
        *self = Entry {
            verification,
            best_move,
            depth,
            bound,
            score,
            generation,
        };
    }
}

#[inline(always)]
#[must_use]
/// The probe-verification half of a hash key.
pub const fn verification(hash_key: u64) -> u32 {
    (hash_key >> 32) as u32
}

#[derive(Clone, Debug)]
/// A transposition table: one contiguous zeroed allocation, reused
/// across searches and reallocated only when the hash size changes.
pub struct Table {
    entries: Box<[Entry]>,
}

impl Table {
    /// Create a table of the largest power-of-two entry count whose
    /// total size fits in `size_mb` megabytes. Sizes are clamped so the
    /// table always holds at least one bucket.
    #[must_use]
    pub fn with_size_mb(size_mb: usize) -> Table {
        let budget = size_mb.max(1) * 1024 * 1024 / size_of::<Entry>();
        let count = if budget.is_power_of_two() {
            budget
        } else {
            budget.next_power_of_two() >> 1
        };
        let count = count.max(BUCKET_SIZE);
        Table {
            entries: vec![Entry::EMPTY; count].into_boxed_slice(),
        }
    }

    #[inline(always)]
    #[must_use]
    /// The number of entries in the table. Always a power of two.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Probe the table for `hash_key`. Returns the matching entry if one
    /// of the four bucket slots verifies, and otherwise the bucket's
    /// replacement victim: the slot with the lowest generation, ties
    /// broken by lowest depth.
    pub fn probe(&mut self, hash_key: u64) -> &mut Entry {
        let bucket_mask = (self.entries.len() - 1) / BUCKET_SIZE;
        let base = BUCKET_SIZE * (hash_key as u32 as usize & bucket_mask);

        let mut chosen = None;
        let mut victim = base;
        let mut lowest_depth = u8::MAX;
        let mut lowest_generation = u8::MAX;
        for i in 0..BUCKET_SIZE {
            let entry = &self.entries[base + i];
            if entry.verification == verification(hash_key) && entry.bound != Bound::Unused {
                chosen = Some(base + i);
                break;
            }
            if entry.generation <= lowest_generation {
                if entry.generation < lowest_generation {
                    // a strictly older generation restarts the depth race
                    lowest_depth = u8::MAX;
                }
                if entry.depth <= lowest_depth {
                    victim = base + i;
                    lowest_depth = entry.depth;
                }
                lowest_generation = entry.generation;
            }
        }
        &mut self.entries[chosen.unwrap_or(victim)]
    }

    #[must_use]
    /// An approximation of how full the table is, in per mille, from a
    /// sample of the first thousand entries. Reported in the UCI
    /// `hashfull` field.
    pub fn hashfull(&self) -> u32 {
        let sample = self.entries.len().min(1000);
        let full = self.entries[..sample]
            .iter()
            .filter(|e| e.verification != 0)
            .count();
        (full * 1000 / sample) as u32
    }
}
