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
use rand_chacha::ChaCha8Rng;

use crate::corpus::Document;
use crate::model::NeuralModel;
use crate::sampling::{NegativeSampleTable, SigmoidTable};
use crate::vocab::Vocabulary;

/// Everything a CBOW/Skip-Gram update needs to read, bundled so the update functions don't
/// carry a dozen separate parameters.
pub struct TrainContext<'a> {
    pub vocab: &'a Vocabulary,
    pub model: &'a NeuralModel,
    pub sigmoid: &'a SigmoidTable,
    pub ns_table: Option<&'a NegativeSampleTable>,
    pub negative: u32,
    pub window: u32,
    pub hierarchical_softmax: bool,
    pub sample: f64,
}

/// The two parallel per-document sequences §4.4 describes: `sentence` drives every CBOW/SG
/// context-window update, while `sentence_nosample` (every in-vocabulary token, unfiltered) is
/// used only for the Skip-Gram document-attachment pass (§4.6).
pub struct DocumentSentences {
    pub sentence: Vec<u32>,
    pub sentence_nosample: Vec<u32>,
}

impl<'a> TrainContext<'a> {
    pub fn dim(&self) -> usize {
        self.model.dim()
    }

    /// Maps a document's raw words to vocabulary indices, dropping unknown words. Applies
    /// word2vec-style subsampling of frequent words (using the worker's seeded RNG, so the same
    /// seed always keeps/drops the same tokens independent of thread scheduling) to produce
    /// `sentence`, while `sentence_nosample` keeps every in-vocabulary token untouched.
    pub fn build_document(&self, doc: &Document, rng: &mut ChaCha8Rng) -> DocumentSentences {
        let train_words = self.vocab.train_words_count().max(1) as f64;
        let mut sentence = Vec::new();
        let mut sentence_nosample = Vec::new();

        for entry in doc.words.iter().filter_map(|w| self.vocab.get_by_word(w)) {
            sentence_nosample.push(entry.index);

            let keep = if self.sample <= 0.0 {
                true
            } else {
                let freq_ratio = entry.frequency as f64 / train_words;
                let keep_prob =
                    ((freq_ratio / self.sample).sqrt() + 1.0) * (self.sample / freq_ratio);
                keep_prob >= 1.0 || rng.random::<f64>() < keep_prob
            };
            if keep {
                sentence.push(entry.index);
            }
        }

        DocumentSentences {
            sentence,
            sentence_nosample,
        }
    }

    /// Clamps `x` into the sigmoid table's domain and looks it up.
    pub fn sigmoid_of(&self, x: f64) -> f64 {
        if x > crate::consts::MAX_EXP {
            1.0
        } else if x < -crate::consts::MAX_EXP {
            0.0
        } else {
            self.sigmoid.lookup(x)
        }
    }

    /// Draws one negative sample, using the thread-local RNG (matching the original's use of an
    /// unseeded `rand()` call for this draw). Does *not* redraw on a collision with `target` —
    /// callers must skip the whole `d` iteration when the draw matches, exactly as the original
    /// `continue`s its negative-sampling loop rather than resampling.
    pub fn draw_negative(&self) -> u32 {
        let table = self.ns_table.expect("negative sampling requires a table");
        let roll = rand::rng().random_range(0..table.len());
        table.sample(roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::model::NeuralModel;
    use crate::sampling::SigmoidTable;
    use rand::SeedableRng;

    fn ctx_for<'a>(vocab: &'a Vocabulary, model: &'a NeuralModel, sigmoid: &'a SigmoidTable, sample: f64) -> TrainContext<'a> {
        TrainContext {
            vocab,
            model,
            sigmoid,
            ns_table: None,
            negative: 0,
            window: 2,
            hierarchical_softmax: true,
            sample,
        }
    }

    #[test]
    fn zero_sample_keeps_every_in_vocabulary_token() {
        let corpus = Corpus::from_lines(vec!["doc0 the cat sat on the mat".to_string()]).unwrap();
        let vocab = Vocabulary::from_corpus(&corpus);
        let model = NeuralModel::new(vocab.len(), corpus.len(), 4, 1);
        let sigmoid = SigmoidTable::new();
        let ctx = ctx_for(&vocab, &model, &sigmoid, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let sentences = ctx.build_document(&corpus.documents()[0], &mut rng);
        assert_eq!(sentences.sentence.len(), sentences.sentence_nosample.len());
        assert_eq!(sentences.sentence, sentences.sentence_nosample);
    }

    #[test]
    fn sentence_nosample_never_shrinks_relative_to_sentence() {
        let corpus = Corpus::from_lines(vec!["doc0 the the the the cat sat on the mat".to_string()]).unwrap();
        let vocab = Vocabulary::from_corpus(&corpus);
        let model = NeuralModel::new(vocab.len(), corpus.len(), 4, 1);
        let sigmoid = SigmoidTable::new();
        let ctx = ctx_for(&vocab, &model, &sigmoid, 1e-3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let sentences = ctx.build_document(&corpus.documents()[0], &mut rng);
        assert!(sentences.sentence.len() <= sentences.sentence_nosample.len());
    }
}
