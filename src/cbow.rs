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

use rand::Rng;

use crate::context::TrainContext;

/// Trains one document under the CBOW (+ document-vector) objective: at each position of the
/// (subsampled) `sentence`, the averaged context-word vectors and the document vector form a
/// single hidden vector; the hierarchical-softmax and/or negative-sampling loss is computed
/// against it, and the resulting error is propagated back, undivided, into every row that
/// contributed to the average.
pub fn train_document(ctx: &TrainContext, doc_row: usize, indices: &[u32], alpha: f64) {
    let dim = ctx.dim();

    for pos in 0..indices.len() {
        let jitter = if ctx.window == 0 {
            0
        } else {
            rand::rng().random_range(0..ctx.window)
        };
        let reduced_window = ctx.window.saturating_sub(jitter);
        let start = pos.saturating_sub(reduced_window as usize);
        let end = (pos + reduced_window as usize + 1).min(indices.len());

        let context: Vec<u32> = (start..end)
            .filter(|&p| p != pos)
            .map(|p| indices[p])
            .collect();

        let mut neu1 = vec![0.0f64; dim];
        let mut count = 0usize;
        for &c in &context {
            let row = ctx.model.w_in.row(c as usize).snapshot();
            for (a, b) in neu1.iter_mut().zip(row.iter()) {
                *a += b;
            }
            count += 1;
        }
        let doc_vec = ctx.model.d_in.row(doc_row).snapshot();
        for (a, b) in neu1.iter_mut().zip(doc_vec.iter()) {
            *a += b;
        }
        count += 1;
        for v in neu1.iter_mut() {
            *v /= count as f64;
        }

        let mut neu1e = vec![0.0f64; dim];
        let target = indices[pos];

        if ctx.hierarchical_softmax {
            let entry = ctx.vocab.get_by_index(target).expect("target in vocabulary");
            for (step, &node) in entry.path.iter().take(entry.code.len()).enumerate() {
                let code = entry.code[step];
                let node_row = ctx.model.w_hs.row(node as usize);
                let weights = node_row.snapshot();
                let f: f64 = neu1.iter().zip(weights.iter()).map(|(a, b)| a * b).sum();
                if f.is_nan() || f <= -crate::consts::MAX_EXP || f >= crate::consts::MAX_EXP {
                    continue;
                }
                let sigmoid = ctx.sigmoid_of(f);
                let g = (1.0 - code as f64 - sigmoid) * alpha;
                for (a, b) in neu1e.iter_mut().zip(weights.iter()) {
                    *a += g * b;
                }
                node_row.with_mut(|w| {
                    for (w, n) in w.iter_mut().zip(neu1.iter()) {
                        *w += g * n;
                    }
                });
            }
        }

        if ctx.negative > 0 {
            for d in 0..=ctx.negative {
                let (sample, label) = if d == 0 {
                    (target, 1.0)
                } else {
                    let candidate = ctx.draw_negative();
                    if candidate == target {
                        continue;
                    }
                    (candidate, 0.0)
                };
                let out_row = ctx.model.w_ng.row(sample as usize);
                let weights = out_row.snapshot();
                let f: f64 = neu1.iter().zip(weights.iter()).map(|(a, b)| a * b).sum();
                let g = if f.is_nan() || f > crate::consts::MAX_EXP {
                    (label - 1.0) * alpha
                } else if f < -crate::consts::MAX_EXP {
                    label * alpha
                } else {
                    (label - ctx.sigmoid_of(f)) * alpha
                };
                for (a, b) in neu1e.iter_mut().zip(weights.iter()) {
                    *a += g * b;
                }
                out_row.with_mut(|w| {
                    for (w, n) in w.iter_mut().zip(neu1.iter()) {
                        *w += g * n;
                    }
                });
            }
        }

        for &c in &context {
            ctx.model.w_in.row(c as usize).with_mut(|row| {
                for (r, e) in row.iter_mut().zip(neu1e.iter()) {
                    *r += e;
                }
            });
        }
        ctx.model.d_in.row(doc_row).with_mut(|row| {
            for (r, e) in row.iter_mut().zip(neu1e.iter()) {
                *r += e;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::model::NeuralModel;
    use crate::sampling::SigmoidTable;
    use crate::vocab::Vocabulary;

    #[test]
    fn training_keeps_vectors_finite_with_hierarchical_softmax() {
        let corpus = Corpus::from_lines(vec![
            "doc0 the cat sat on the mat".to_string(),
            "doc1 the dog sat on the rug".to_string(),
        ])
        .unwrap();
        let vocab = Vocabulary::from_corpus(&corpus);
        let model = NeuralModel::new(vocab.len(), corpus.len(), 8, 1);
        let sigmoid = SigmoidTable::new();

        let ctx = TrainContext {
            vocab: &vocab,
            model: &model,
            sigmoid: &sigmoid,
            ns_table: None,
            negative: 0,
            window: 2,
            hierarchical_softmax: true,
            sample: 0.0,
        };

        let doc = &corpus.documents()[0];
        let indices: Vec<u32> = doc
            .words
            .iter()
            .filter_map(|w| vocab.get_by_word(w))
            .map(|e| e.index)
            .collect();

        train_document(&ctx, 0, &indices, 0.025);

        for i in 0..model.w_in.row_count() {
            assert!(model.w_in.row(i).snapshot().iter().all(|v| v.is_finite()));
        }
    }
}
