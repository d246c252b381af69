/*
*	Copyright (C) 2025 Kendall Tauser
*
*	This program is free software; you can redistribute it and/or modify
*	it under the terms of the GNU General Public License as published by
*	the Free Software Foundation; either version 2 of the License, or
*	(at your option) any later version.
*
*	This program is distributed in the hope that it will be useful,
*	but WITHOUT ANY WARRANTY; without even the implied warranty of
*	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*	GNU General Public License for more details.
*
*	You should have received a copy of the GNU General Public License along
*	with this program; if not, write to the Free Software Foundation, Inc.,
*	51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.
 */

use crate::consts::{EXP_TABLE_SIZE, MAX_EXP, NEGATIVE_SAMPLE_POWER, NEGATIVE_SAMPLE_TABLE_SIZE};
use crate::vocab::Vocabulary;

/// Precomputed `sigmoid(x)` over `EXP_TABLE_SIZE` cells spanning `[-MAX_EXP, +MAX_EXP]`.
/// Callers outside that range are expected to clamp first; `lookup` does not bounds-check.
pub struct SigmoidTable {
    table: Vec<f64>,
}

impl SigmoidTable {
    pub fn new() -> Self {
        let table = (0..EXP_TABLE_SIZE)
            .map(|i| {
                let x = (i as f64 / EXP_TABLE_SIZE as f64 * 2.0 - 1.0) * MAX_EXP;
                let exp = x.exp();
                exp / (exp + 1.0)
            })
            .collect();
        Self { table }
    }

    /// Looks up `sigmoid(x)` for `x` already known to lie in `[-MAX_EXP, MAX_EXP]`.
    pub fn lookup(&self, x: f64) -> f64 {
        let slot = ((x + MAX_EXP) * (EXP_TABLE_SIZE as f64 / MAX_EXP / 2.0)) as usize;
        self.table[slot.min(EXP_TABLE_SIZE - 1)]
    }
}

impl Default for SigmoidTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A flattened unigram^0.75 distribution: `table[i]` is the vocabulary index to draw when a
/// worker rolls `i` uniformly in `[0, NEGATIVE_SAMPLE_TABLE_SIZE)`.
pub struct NegativeSampleTable {
    table: Vec<u32>,
}

impl NegativeSampleTable {
    /// Builds the full-size (`NEGATIVE_SAMPLE_TABLE_SIZE`) table by walking the vocabulary in
    /// insertion order (not hash order), so that two runs over the same corpus produce
    /// byte-identical tables.
    pub fn build(vocab: &Vocabulary) -> Self {
        Self::build_with_size(vocab, NEGATIVE_SAMPLE_TABLE_SIZE)
    }

    /// Same construction as [`NegativeSampleTable::build`] but at a caller-chosen table size;
    /// exists so tests can check proportions/coverage without allocating and filling a
    /// hundred-million-entry `Vec` for every assertion.
    pub fn build_with_size(vocab: &Vocabulary, table_size: usize) -> Self {
        let entries = vocab.entries();
        let total_power: f64 = entries
            .iter()
            .map(|e| (e.frequency as f64).powf(NEGATIVE_SAMPLE_POWER))
            .sum();

        let mut table = vec![0u32; table_size];
        if entries.is_empty() || total_power == 0.0 {
            return Self { table };
        }

        let mut idx = 0usize;
        let mut cumulative = (entries[0].frequency as f64).powf(NEGATIVE_SAMPLE_POWER) / total_power;
        for (slot_index, slot) in table.iter_mut().enumerate() {
            *slot = entries[idx].index;
            if slot_fraction(slot_index, table_size) > cumulative && idx + 1 < entries.len() {
                idx += 1;
                cumulative += (entries[idx].frequency as f64).powf(NEGATIVE_SAMPLE_POWER) / total_power;
            }
        }
        Self { table }
    }

    pub fn sample(&self, roll: usize) -> u32 {
        self.table[roll % self.table.len()]
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn slot_fraction(slot: usize, total: usize) -> f64 {
    slot as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_monotonic_and_bounded() {
        let table = SigmoidTable::new();
        let low = table.lookup(-MAX_EXP);
        let mid = table.lookup(0.0);
        let high = table.lookup(MAX_EXP);
        assert!(low < mid);
        assert!(mid < high);
        assert!(low > 0.0 && high < 1.0);
        assert!((mid - 0.5).abs() < 0.01);
    }

    #[test]
    fn negative_sample_table_respects_frequency_proportions() {
        let mut vocab = Vocabulary::new();
        for _ in 0..1 {
            vocab.add("rare");
        }
        for _ in 0..3 {
            vocab.add("common");
        }
        vocab.build_huffman();

        // A 100_000-entry table is plenty to check the 1:3^0.75 ratio without paying for a
        // hundred-million-entry allocation on every test run.
        let ns = NegativeSampleTable::build_with_size(&vocab, 100_000);
        let rare_idx = vocab.get_by_word("rare").unwrap().index;
        let common_idx = vocab.get_by_word("common").unwrap().index;

        let rare_count = (0..ns.len()).filter(|&i| ns.sample(i) == rare_idx).count();
        let common_count = (0..ns.len())
            .filter(|&i| ns.sample(i) == common_idx)
            .count();

        let expected_ratio = 1f64.powf(NEGATIVE_SAMPLE_POWER) / 3f64.powf(NEGATIVE_SAMPLE_POWER);
        let actual_ratio = rare_count as f64 / common_count as f64;
        assert!((actual_ratio - expected_ratio).abs() < 0.01);
    }

    #[test]
    fn negative_sample_table_covers_entire_vocabulary() {
        let mut vocab = Vocabulary::new();
        vocab.add("a");
        vocab.add("b");
        vocab.add("c");
        vocab.build_huffman();

        let ns = NegativeSampleTable::build_with_size(&vocab, 10_000);
        let mut seen = std::collections::HashSet::new();
        for i in 0..ns.len() {
            seen.insert(ns.sample(i));
        }
        assert_eq!(seen.len(), 3);
    }
}
