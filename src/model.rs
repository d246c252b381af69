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

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::matrix::Matrix;

/// The full set of embedding tables a training run touches. `w_hs` and `w_ng` are sized to the
/// vocabulary either way but only one is ever updated, depending on which loss the run uses;
/// the unused one stays all-zero and is never persisted.
pub struct NeuralModel {
    /// Input word embeddings, `vocab_size x dim`.
    pub w_in: Matrix,
    /// Document embeddings, `doc_count x dim`.
    pub d_in: Matrix,
    /// Hierarchical-softmax internal-node weights, `vocab_size x dim`.
    pub w_hs: Matrix,
    /// Negative-sampling output weights, `vocab_size x dim`.
    pub w_ng: Matrix,
    /// L2-normalized copy of `w_in`, populated by [`NeuralModel::normalize`].
    pub w_norm: Matrix,
    /// L2-normalized copy of `d_in`, populated by [`NeuralModel::normalize`].
    pub d_norm: Matrix,
    dim: usize,
}

impl NeuralModel {
    /// Allocates all six tables and randomly initializes `w_in`/`d_in` with the same seed the
    /// original uses: one `ChaCha8Rng` stream, words first, then documents, so the run is
    /// reproducible given `seed`.
    pub fn new(vocab_size: usize, doc_count: usize, dim: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let w_in = Matrix::uniform(vocab_size, dim, &mut rng);
        let d_in = Matrix::uniform(doc_count, dim, &mut rng);
        Self {
            w_in,
            d_in,
            w_hs: Matrix::zeroed(vocab_size, dim),
            w_ng: Matrix::zeroed(vocab_size, dim),
            w_norm: Matrix::zeroed(vocab_size, dim),
            d_norm: Matrix::zeroed(doc_count, dim),
            dim,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Fills `w_norm`/`d_norm` with L2-normalized copies of `w_in`/`d_in`. A row whose norm is
    /// zero (only possible for a word or document that never actually appeared) is left as NaN
    /// rather than being arbitrarily zeroed, so a downstream similarity query on it fails loudly
    /// instead of silently reporting a bogus score of zero.
    pub fn normalize(&mut self) {
        normalize_into(&self.w_in, &mut self.w_norm);
        normalize_into(&self.d_in, &mut self.d_norm);
    }
}

fn normalize_into(src: &Matrix, dst: &mut Matrix) {
    for i in 0..src.row_count() {
        let row = src.row(i).snapshot();
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        dst.row(i).with_mut(|out| {
            for (o, v) in out.iter_mut().zip(row.iter()) {
                *o = v / norm;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_match_requested_sizes() {
        let model = NeuralModel::new(10, 3, 8, 42);
        assert_eq!(model.w_in.row_count(), 10);
        assert_eq!(model.d_in.row_count(), 3);
        assert_eq!(model.dim(), 8);
    }

    #[test]
    fn same_seed_is_reproducible() {
        let a = NeuralModel::new(5, 2, 4, 99);
        let b = NeuralModel::new(5, 2, 4, 99);
        for i in 0..5 {
            assert_eq!(a.w_in.row(i).snapshot(), b.w_in.row(i).snapshot());
        }
    }

    #[test]
    fn normalize_produces_unit_vectors() {
        let mut model = NeuralModel::new(4, 2, 6, 7);
        model.normalize();
        for i in 0..4 {
            let row = model.w_norm.row(i).snapshot();
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn normalize_of_zero_row_is_nan() {
        let mut model = NeuralModel::new(1, 1, 4, 1);
        model.w_in.row(0).with_mut(|r| r.iter_mut().for_each(|v| *v = 0.0));
        model.normalize();
        assert!(model.w_norm.row(0).snapshot().iter().all(|v| v.is_nan()));
    }
}
