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

use crate::context::{DocumentSentences, TrainContext};
use crate::matrix::Row;

/// Trains one document under the Skip-Gram (+ document-vector) objective: for every center word
/// in `sentence`, each surrounding context word's embedding is used, one at a time, as the hidden
/// vector to predict the center word. Separately (§4.6), the document vector is paired against
/// every token of `sentence_nosample` — the unfiltered, pre-subsampling token list — so the
/// document-attachment pass never skips a word just because the context-window pass subsampled
/// it away.
pub fn train_document(ctx: &TrainContext, doc_row: usize, sentences: &DocumentSentences, alpha: f64) {
    let sentence = &sentences.sentence;
    for pos in 0..sentence.len() {
        let center = sentence[pos];

        let jitter = if ctx.window == 0 {
            0
        } else {
            rand::rng().random_range(0..ctx.window)
        };
        let reduced_window = ctx.window.saturating_sub(jitter);
        let start = pos.saturating_sub(reduced_window as usize);
        let end = (pos + reduced_window as usize + 1).min(sentence.len());

        for c in start..end {
            if c == pos {
                continue;
            }
            train_pair(ctx, ctx.model.w_in.row(sentence[c] as usize), center, alpha);
        }
    }

    for &word in &sentences.sentence_nosample {
        train_pair(ctx, ctx.model.d_in.row(doc_row), word, alpha);
    }
}

/// Trains a single (input row, target word) pair: `input` supplies the hidden vector, `target`'s
/// Huffman path and/or negative samples supply the loss, and the resulting error is written back
/// into `input` only.
fn train_pair(ctx: &TrainContext, input: &Row, target: u32, alpha: f64) {
    let dim = ctx.dim();
    let l1 = input.snapshot();
    let mut neu1e = vec![0.0f64; dim];

    if ctx.hierarchical_softmax {
        let entry = ctx.vocab.get_by_index(target).expect("target in vocabulary");
        for (step, &node) in entry.path.iter().take(entry.code.len()).enumerate() {
            let code = entry.code[step];
            let node_row = ctx.model.w_hs.row(node as usize);
            let weights = node_row.snapshot();
            let f: f64 = l1.iter().zip(weights.iter()).map(|(a, b)| a * b).sum();
            if f.is_nan() || f <= -crate::consts::MAX_EXP || f >= crate::consts::MAX_EXP {
                continue;
            }
            let sigmoid = ctx.sigmoid_of(f);
            let g = (1.0 - code as f64 - sigmoid) * alpha;
            for (a, b) in neu1e.iter_mut().zip(weights.iter()) {
                *a += g * b;
            }
            node_row.with_mut(|w| {
                for (w, l) in w.iter_mut().zip(l1.iter()) {
                    *w += g * l;
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
            let f: f64 = l1.iter().zip(weights.iter()).map(|(a, b)| a * b).sum();
            // Unlike the CBOW pass, a NaN `f` here is not special-cased and falls through to the
            // sigmoid-table branch, producing a NaN update. This mirrors the original's behavior.
            let g = if f > crate::consts::MAX_EXP {
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
                for (w, l) in w.iter_mut().zip(l1.iter()) {
                    *w += g * l;
                }
            });
        }
    }

    input.with_mut(|row| {
        for (r, e) in row.iter_mut().zip(neu1e.iter()) {
            *r += e;
        }
    });
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
        let model = NeuralModel::new(vocab.len(), corpus.len(), 8, 3);
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
        let sentences = DocumentSentences {
            sentence: indices.clone(),
            sentence_nosample: indices,
        };

        train_document(&ctx, 0, &sentences, 0.025);

        for i in 0..model.w_in.row_count() {
            assert!(model.w_in.row(i).snapshot().iter().all(|v| v.is_finite()));
        }
        assert!(model.d_in.row(0).snapshot().iter().all(|v| v.is_finite()));
    }
}
