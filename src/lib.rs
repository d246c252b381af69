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

//! A from-scratch Doc2Vec (Paragraph Vector) trainer: CBOW and Skip-Gram objectives, each with
//! hierarchical-softmax or negative-sampling loss, trained Hogwild-style across plain OS
//! threads with per-row locking instead of a global lock.

pub mod alpha;
pub mod cbow;
pub mod consts;
pub mod context;
pub mod corpus;
pub mod errors;
pub mod matrix;
pub mod model;
pub mod persistence;
pub mod query;
pub mod sampling;
pub mod skipgram;
pub mod spec;
pub mod token;
pub mod trainer;
pub mod vocab;

pub use alpha::{ProgressSink, StdoutProgress};
pub use corpus::Corpus;
pub use errors::Doc2VecError;
pub use query::{fetch_vector, top_k_similar};
pub use spec::TrainingSpec;
pub use trainer::{train, TrainedModel};

impl TrainedModel {
    /// Returns the `k` words most cosine-similar to `word`, excluding `word` itself.
    pub fn similar_words(&self, word: &str, k: usize) -> Result<Vec<(String, f64)>, Doc2VecError> {
        let entry = self
            .vocab
            .get_by_word(word)
            .ok_or_else(|| Doc2VecError::Parse(format!("unknown word \"{}\"", word)))?;
        let query = fetch_vector(&self.model.w_norm, entry.index, "word")?;
        let hits = top_k_similar(&self.model.w_norm, &query, Some(entry.index), k);
        Ok(hits
            .into_iter()
            .filter_map(|(idx, score)| {
                self.vocab
                    .get_by_index(idx)
                    .map(|e| (e.surface.clone(), score))
            })
            .collect())
    }

    /// Returns the `k` documents most cosine-similar to the document tagged `tag`, excluding it.
    pub fn similar_documents(&self, tag: &str, k: usize) -> Result<Vec<(String, f64)>, Doc2VecError> {
        let index = self
            .corpus
            .index_of_tag(tag)
            .ok_or_else(|| Doc2VecError::Parse(format!("unknown document tag \"{}\"", tag)))?;
        let query = fetch_vector(&self.model.d_norm, index, "document")?;
        let hits = top_k_similar(&self.model.d_norm, &query, Some(index), k);
        Ok(hits
            .into_iter()
            .filter_map(|(idx, score)| self.corpus.get(idx).map(|d| (d.tag.clone(), score)))
            .collect())
    }

    pub fn word_vector(&self, word: &str) -> Result<Vec<f64>, Doc2VecError> {
        let entry = self
            .vocab
            .get_by_word(word)
            .ok_or_else(|| Doc2VecError::Parse(format!("unknown word \"{}\"", word)))?;
        fetch_vector(&self.model.w_norm, entry.index, "word")
    }

    pub fn document_vector(&self, tag: &str) -> Result<Vec<f64>, Doc2VecError> {
        let index = self
            .corpus
            .index_of_tag(tag)
            .ok_or_else(|| Doc2VecError::Parse(format!("unknown document tag \"{}\"", tag)))?;
        fetch_vector(&self.model.d_norm, index, "document")
    }
}
