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

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::alpha::{ProgressSink, SharedAlpha};
use crate::cbow;
use crate::consts::UPDATE_WORD_NUMBER;
use crate::context::TrainContext;
use crate::corpus::Corpus;
use crate::errors::Doc2VecError;
use crate::model::NeuralModel;
use crate::sampling::{NegativeSampleTable, SigmoidTable};
use crate::skipgram;
use crate::spec::TrainingSpec;
use crate::vocab::Vocabulary;

/// The output of a completed training run: the vocabulary and corpus it was trained on, plus
/// the trained (and already L2-normalized) embedding matrices.
pub struct TrainedModel {
    pub vocab: Vocabulary,
    pub corpus: Corpus,
    pub model: NeuralModel,
    pub spec: TrainingSpec,
}

/// Runs a full training job: builds the vocabulary and sampling tables from `corpus`, shards the
/// corpus across `spec.threads` OS threads, runs `spec.iterations` epochs per shard with a
/// shared, decaying learning rate, then L2-normalizes the result.
pub fn train(
    corpus: Corpus,
    spec: TrainingSpec,
    sink: &dyn ProgressSink,
) -> Result<TrainedModel, Doc2VecError> {
    if !spec.is_valid() {
        return Err(Doc2VecError::Parse(
            "training spec selects no loss path".to_string(),
        ));
    }

    let vocab = Vocabulary::from_corpus(&corpus);
    if vocab.is_empty() {
        return Err(Doc2VecError::EmptyCorpus);
    }

    let sigmoid = SigmoidTable::new();
    let ns_table = if spec.negative > 0 {
        Some(NegativeSampleTable::build(&vocab))
    } else {
        None
    };

    let mut model = NeuralModel::new(vocab.len(), corpus.len(), spec.dimension, spec.seed);
    let shards = corpus.split(spec.threads.max(1));
    let total_train_words = vocab.train_words_count() * spec.iterations as u64;
    let alpha = SharedAlpha::new(spec.alpha, total_train_words);
    let worker_panicked = AtomicBool::new(false);

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for (shard_index, shard) in shards.iter().enumerate() {
            let vocab = &vocab;
            let model = &model;
            let sigmoid = &sigmoid;
            let ns_table = ns_table.as_ref();
            let alpha = &alpha;
            let spec = &spec;

            handles.push(scope.spawn(move || {
                let ctx = TrainContext {
                    vocab,
                    model,
                    sigmoid,
                    ns_table,
                    negative: spec.negative,
                    window: spec.window,
                    hierarchical_softmax: spec.hierarchical_softmax,
                    sample: spec.sample,
                };
                let mut rng = ChaCha8Rng::seed_from_u64(spec.seed ^ (shard_index as u64 + 1));
                let mut local_words = 0u64;

                for _epoch in 0..spec.iterations {
                    for doc in shard {
                        let sentences = ctx.build_document(doc, &mut rng);
                        let current_alpha = alpha.current();
                        if spec.cbow {
                            cbow::train_document(
                                &ctx,
                                doc.index as usize,
                                &sentences.sentence,
                                current_alpha,
                            );
                        } else {
                            skipgram::train_document(&ctx, doc.index as usize, &sentences, current_alpha);
                        }
                        local_words += sentences.sentence_nosample.len() as u64;
                        if local_words >= UPDATE_WORD_NUMBER {
                            alpha.advance(local_words, sink);
                            local_words = 0;
                        }
                    }
                }
                if local_words > 0 {
                    alpha.advance(local_words, sink);
                }
            }));
        }

        for handle in handles {
            if handle.join().is_err() {
                worker_panicked.store(true, Ordering::SeqCst);
            }
        }
    });

    if worker_panicked.load(Ordering::SeqCst) {
        return Err(Doc2VecError::Parse(
            "a training worker panicked".to_string(),
        ));
    }

    model.normalize();

    Ok(TrainedModel {
        vocab,
        corpus,
        model,
        spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SilentSink;
    impl ProgressSink for SilentSink {
        fn report(&self, _progress_pct: f64, _alpha: f64, _words_per_sec: f64) {}
    }

    fn tiny_corpus() -> Corpus {
        Corpus::from_lines(vec![
            "doc0 the cat sat on the mat".to_string(),
            "doc1 the dog sat on the rug".to_string(),
            "doc2 the cat chased the dog".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn training_produces_normalized_vectors() {
        let spec = TrainingSpec {
            dimension: 6,
            cbow: true,
            hierarchical_softmax: true,
            negative: 0,
            window: 2,
            sample: 0.0,
            iterations: 2,
            alpha: 0.05,
            threads: 2,
            seed: 42,
        };
        let trained = train(tiny_corpus(), spec, &SilentSink).unwrap();
        for i in 0..trained.model.w_norm.row_count() {
            let row = trained.model.w_norm.row(i).snapshot();
            if row.iter().any(|v| v.is_nan()) {
                continue;
            }
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn skipgram_with_negative_sampling_runs_to_completion() {
        let spec = TrainingSpec {
            dimension: 6,
            cbow: false,
            hierarchical_softmax: false,
            negative: 3,
            window: 2,
            sample: 0.0,
            iterations: 1,
            alpha: 0.05,
            threads: 1,
            seed: 7,
        };
        let trained = train(tiny_corpus(), spec, &SilentSink).unwrap();
        assert_eq!(trained.model.w_in.row_count(), trained.vocab.len());
    }

    #[test]
    fn zero_dimension_spec_is_rejected() {
        let spec = TrainingSpec {
            dimension: 0,
            ..TrainingSpec::default()
        };
        let err = train(tiny_corpus(), spec, &SilentSink).unwrap_err();
        assert!(matches!(err, Doc2VecError::Parse(_)));
    }

    #[test]
    fn same_content_documents_converge_closer_than_different_content() {
        let corpus = Corpus::from_lines(vec![
            "cats0 cat cat cat".to_string(),
            "cats1 cat cat cat".to_string(),
            "dogs0 dog dog dog".to_string(),
            "dogs1 dog dog dog".to_string(),
        ])
        .unwrap();
        let spec = TrainingSpec {
            dimension: 16,
            cbow: true,
            hierarchical_softmax: true,
            negative: 0,
            window: 5,
            sample: 0.0,
            iterations: 20,
            alpha: 0.05,
            threads: 1,
            seed: 1,
        };
        let trained = train(corpus, spec, &SilentSink).unwrap();

        let cats0 = trained.corpus.index_of_tag("cats0").unwrap();
        let cats1 = trained.corpus.index_of_tag("cats1").unwrap();
        let dogs0 = trained.corpus.index_of_tag("dogs0").unwrap();

        let cosine = |a: u32, b: u32| {
            let ra = trained.model.d_norm.row(a as usize).snapshot();
            let rb = trained.model.d_norm.row(b as usize).snapshot();
            ra.iter().zip(rb.iter()).map(|(x, y)| x * y).sum::<f64>()
        };

        let same = cosine(cats0, cats1);
        let different = cosine(cats0, dogs0);
        assert!(same > different);
    }

    #[test]
    fn no_loss_path_trains_to_completion_without_updates() {
        let spec = TrainingSpec {
            hierarchical_softmax: false,
            negative: 0,
            iterations: 1,
            ..TrainingSpec::default()
        };
        let trained = train(tiny_corpus(), spec, &SilentSink).unwrap();
        for i in 0..trained.model.w_in.row_count() {
            let row = trained.model.w_in.row(i).snapshot();
            assert!(row.iter().all(|v| v.is_finite()));
        }
    }
}
