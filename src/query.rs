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

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::errors::Doc2VecError;
use crate::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoredIndex {
    index: u32,
    score: f64,
}

impl Eq for ScoredIndex {}

// Reversed so a max-heap of ScoredIndex acts as a bounded min-heap: the lowest score sits at
// the top and is the first one evicted once the heap exceeds `k`.
impl Ord for ScoredIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cosine similarity between two already-normalized rows is just their dot product.
fn cosine_of_normalized(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Returns the `k` rows of `table` (excluding `exclude`, typically the query row itself) with the
/// highest cosine similarity to `query`, descending. Rows containing NaN (never-seen words or
/// documents, per [`crate::model::NeuralModel::normalize`]) are skipped rather than compared.
pub fn top_k_similar(
    table: &Matrix,
    query: &[f64],
    exclude: Option<u32>,
    k: usize,
) -> Vec<(u32, f64)> {
    let mut heap: BinaryHeap<ScoredIndex> = BinaryHeap::with_capacity(k + 1);

    for i in 0..table.row_count() {
        if exclude == Some(i as u32) {
            continue;
        }
        let row = table.row(i).snapshot();
        if row.iter().any(|v| v.is_nan()) {
            continue;
        }
        let score = cosine_of_normalized(query, &row);
        heap.push(ScoredIndex {
            index: i as u32,
            score,
        });
        if heap.len() > k {
            heap.pop();
        }
    }

    let mut results: Vec<(u32, f64)> = heap.into_iter().map(|s| (s.index, s.score)).collect();
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    results
}

/// Fetches a single normalized row by index, failing if it is out of range.
pub fn fetch_vector(table: &Matrix, index: u32, what: &'static str) -> Result<Vec<f64>, Doc2VecError> {
    if index as usize >= table.row_count() {
        return Err(Doc2VecError::OutOfRange {
            what,
            index,
            len: table.row_count() as u32,
        });
    }
    Ok(table.row(index as usize).snapshot())
}
