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

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use doc2vec::consts::*;

#[derive(Parser)]
#[command(name = "doc2vec", about = "Train and query Paragraph Vector (Doc2Vec) models")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Train a new model from a tagged-document corpus.
    Train {
        /// Path to the training corpus: one document per line, `<tag> <words...>`.
        #[arg(long)]
        corpus: PathBuf,
        /// Path the trained model is written to.
        #[arg(long)]
        output: PathBuf,
        /// Embedding dimensionality.
        #[arg(long, default_value_t = DEFAULT_DIMENSION_SIZE)]
        size: usize,
        /// Use CBOW instead of Skip-Gram.
        #[arg(long, default_value_t = DEFAULT_CBOW)]
        cbow: bool,
        /// Use hierarchical softmax instead of (or in addition to) negative sampling.
        #[arg(long, default_value_t = DEFAULT_HIERARCHICAL_SOFTMAX)]
        hs: bool,
        /// Number of negative samples per positive example (0 disables negative sampling).
        #[arg(long, default_value_t = DEFAULT_NEGATIVE_SAMPLE_NUMBER)]
        negative: u32,
        /// Max context window radius on either side of a word.
        #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: u32,
        /// Subsampling threshold for frequent words (0 disables subsampling).
        #[arg(long, default_value_t = DEFAULT_SAMPLE)]
        sample: f64,
        /// Number of passes over the corpus.
        #[arg(long, default_value_t = DEFAULT_ITERATION_NUMBER)]
        iter: u32,
        /// Initial learning rate.
        #[arg(long, default_value_t = DEFAULT_ALPHA)]
        alpha: f64,
        /// Number of training threads. Defaults to the number of logical CPUs.
        #[arg(long)]
        threads: Option<usize>,
        /// RNG seed controlling weight initialization and subsampling draws.
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Print the `k` words or documents most similar to a given word or document tag.
    Similar {
        /// Path to a model written by `train`.
        #[arg(long)]
        model: PathBuf,
        /// The query word.
        #[arg(long, conflicts_with = "doc")]
        word: Option<String>,
        /// The query document tag.
        #[arg(long, conflicts_with = "word")]
        doc: Option<String>,
        /// Number of neighbors to print.
        #[arg(long, default_value_t = 10)]
        k: usize,
    },
    /// Print a word's or document's embedding vector.
    Vector {
        /// Path to a model written by `train`.
        #[arg(long)]
        model: PathBuf,
        /// The query word.
        #[arg(long, conflicts_with = "doc")]
        word: Option<String>,
        /// The query document tag.
        #[arg(long, conflicts_with = "word")]
        doc: Option<String>,
    },
}
