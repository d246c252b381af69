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

use std::io::{BufRead, Write};

use crate::corpus::{Corpus, Document};
use crate::errors::Doc2VecError;
use crate::matrix::Matrix;
use crate::model::NeuralModel;
use crate::spec::TrainingSpec;
use crate::trainer::TrainedModel;
use crate::vocab::{Vocabulary, WordEntry};

/// Writes a trained model in the on-disk text format: a `TDoc2Vec` envelope wrapping the
/// training spec, vocabulary, document list, and the four raw embedding matrices in turn. Every
/// section is framed by a `T<Name>` / `/T<Name>` pair so a reader can skip sections it doesn't
/// recognize without tracking byte offsets.
pub fn save(model: &TrainedModel, out: &mut impl Write) -> Result<(), Doc2VecError> {
    writeln!(out, "TDoc2Vec")?;
    write_spec(&model.spec, out)?;
    write_vocabulary(&model.vocab, out)?;
    write_documents(&model.corpus, out)?;

    writeln!(out, "TNeuralNetwork")?;
    write_layer_vector("w_in", &model.model.w_in, out)?;
    write_layer_vector("d_in", &model.model.d_in, out)?;
    write_layer_vector("w_norm", &model.model.w_norm, out)?;
    write_layer_vector("d_norm", &model.model.d_norm, out)?;
    write_layer("w_hs", &model.model.w_hs, out)?;
    write_layer("w_ng", &model.model.w_ng, out)?;
    writeln!(out, "/TNeuralNetwork")?;

    writeln!(out, "/TDoc2Vec")?;
    Ok(())
}

fn write_spec(spec: &TrainingSpec, out: &mut impl Write) -> Result<(), Doc2VecError> {
    writeln!(out, "TTrainSpec")?;
    writeln!(out, "dimension {}", spec.dimension)?;
    writeln!(out, "cbow {}", spec.cbow as u8)?;
    writeln!(out, "hierarchical_softmax {}", spec.hierarchical_softmax as u8)?;
    writeln!(out, "negative {}", spec.negative)?;
    writeln!(out, "window {}", spec.window)?;
    writeln!(out, "sample {}", spec.sample)?;
    writeln!(out, "iterations {}", spec.iterations)?;
    writeln!(out, "alpha {}", spec.alpha)?;
    writeln!(out, "threads {}", spec.threads)?;
    writeln!(out, "seed {}", spec.seed)?;
    writeln!(out, "/TTrainSpec")?;
    Ok(())
}

fn write_vocabulary(vocab: &Vocabulary, out: &mut impl Write) -> Result<(), Doc2VecError> {
    writeln!(out, "TVocabulary")?;
    writeln!(out, "word_count {}", vocab.len())?;
    for entry in vocab.entries() {
        writeln!(out, "TWord")?;
        writeln!(out, "surface {}", entry.surface)?;
        writeln!(out, "index {}", entry.index)?;
        writeln!(out, "frequency {}", entry.frequency)?;
        writeln!(out, "code {}", join(&entry.code))?;
        writeln!(out, "path {}", join(&entry.path))?;
        writeln!(out, "/TWord")?;
    }
    writeln!(out, "/TVocabulary")?;
    Ok(())
}

fn write_documents(corpus: &Corpus, out: &mut impl Write) -> Result<(), Doc2VecError> {
    writeln!(out, "TDocumentsHolder")?;
    writeln!(out, "doc_count {}", corpus.len())?;
    for doc in corpus.documents() {
        writeln!(out, "TDocument")?;
        writeln!(out, "tag {}", doc.tag)?;
        writeln!(out, "index {}", doc.index)?;
        writeln!(out, "raw {}", doc.raw)?;
        writeln!(out, "/TDocument")?;
    }
    writeln!(out, "/TDocumentsHolder")?;
    Ok(())
}

fn write_layer_vector(name: &str, matrix: &Matrix, out: &mut impl Write) -> Result<(), Doc2VecError> {
    writeln!(out, "TLayerVector")?;
    writeln!(out, "name {}", name)?;
    write_matrix_body(matrix, out)?;
    writeln!(out, "/TLayerVector")?;
    Ok(())
}

fn write_layer(name: &str, matrix: &Matrix, out: &mut impl Write) -> Result<(), Doc2VecError> {
    writeln!(out, "TLayer")?;
    writeln!(out, "name {}", name)?;
    write_matrix_body(matrix, out)?;
    writeln!(out, "/TLayer")?;
    Ok(())
}

fn write_matrix_body(matrix: &Matrix, out: &mut impl Write) -> Result<(), Doc2VecError> {
    writeln!(out, "rows {}", matrix.row_count())?;
    writeln!(out, "dim {}", matrix.dim())?;
    for i in 0..matrix.row_count() {
        let row = matrix.row(i).snapshot();
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{} {}", i, values.join(" "))?;
    }
    Ok(())
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a model previously written by [`save`]. The vocabulary's Huffman coding is restored
/// verbatim from the saved `code`/`path` fields rather than rebuilt, so a reloaded model is
/// byte-for-byte usable even if rebuilding from frequencies would (for a tied frequency
/// distribution) produce a different, equally valid tree.
pub fn load(input: &mut impl BufRead) -> Result<TrainedModel, Doc2VecError> {
    let mut lines = input.lines();
    expect_tag(&mut lines, "TDoc2Vec")?;

    let spec = read_spec(&mut lines)?;
    let vocab = read_vocabulary(&mut lines)?;
    let corpus = read_documents(&mut lines)?;

    expect_tag(&mut lines, "TNeuralNetwork")?;
    let w_in = read_layer(&mut lines, "TLayerVector")?;
    let d_in = read_layer(&mut lines, "TLayerVector")?;
    let w_norm = read_layer(&mut lines, "TLayerVector")?;
    let d_norm = read_layer(&mut lines, "TLayerVector")?;
    let w_hs = read_layer(&mut lines, "TLayer")?;
    let w_ng = read_layer(&mut lines, "TLayer")?;
    expect_close(&mut lines, "TNeuralNetwork")?;
    expect_close(&mut lines, "TDoc2Vec")?;

    let dim = w_in.dim();
    let mut model = NeuralModel::new(0, 0, dim, spec.seed);
    model.w_in = w_in;
    model.d_in = d_in;
    model.w_hs = w_hs;
    model.w_ng = w_ng;
    model.w_norm = w_norm;
    model.d_norm = d_norm;

    Ok(TrainedModel {
        vocab,
        corpus,
        model,
        spec,
    })
}

type Lines<B> = std::io::Lines<B>;

fn next_line<B: BufRead>(lines: &mut Lines<B>) -> Result<String, Doc2VecError> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(Doc2VecError::Parse("unexpected end of model file".to_string())),
    }
}

fn expect_tag<B: BufRead>(lines: &mut Lines<B>, tag: &str) -> Result<(), Doc2VecError> {
    let line = next_line(lines)?;
    if line.trim() != tag {
        return Err(Doc2VecError::Parse(format!(
            "expected tag {}, found {}",
            tag, line
        )));
    }
    Ok(())
}

fn expect_close<B: BufRead>(lines: &mut Lines<B>, tag: &str) -> Result<(), Doc2VecError> {
    expect_tag(lines, &format!("/{}", tag))
}

fn read_field<B: BufRead>(lines: &mut Lines<B>, key: &str) -> Result<String, Doc2VecError> {
    let line = next_line(lines)?;
    let mut parts = line.splitn(2, ' ');
    let found_key = parts.next().unwrap_or_default();
    if found_key != key {
        return Err(Doc2VecError::Parse(format!(
            "expected field {}, found {}",
            key, line
        )));
    }
    Ok(parts.next().unwrap_or_default().to_string())
}

fn parse_field<B: BufRead, T: std::str::FromStr>(lines: &mut Lines<B>, key: &str) -> Result<T, Doc2VecError> {
    read_field(lines, key)?
        .parse()
        .map_err(|_| Doc2VecError::Parse(format!("malformed field {}", key)))
}

fn read_spec<B: BufRead>(lines: &mut Lines<B>) -> Result<TrainingSpec, Doc2VecError> {
    expect_tag(lines, "TTrainSpec")?;
    let spec = TrainingSpec {
        dimension: parse_field(lines, "dimension")?,
        cbow: parse_field::<_, u8>(lines, "cbow")? != 0,
        hierarchical_softmax: parse_field::<_, u8>(lines, "hierarchical_softmax")? != 0,
        negative: parse_field(lines, "negative")?,
        window: parse_field(lines, "window")?,
        sample: parse_field(lines, "sample")?,
        iterations: parse_field(lines, "iterations")?,
        alpha: parse_field(lines, "alpha")?,
        threads: parse_field(lines, "threads")?,
        seed: parse_field(lines, "seed")?,
    };
    expect_close(lines, "TTrainSpec")?;
    Ok(spec)
}

fn read_vocabulary<B: BufRead>(lines: &mut Lines<B>) -> Result<Vocabulary, Doc2VecError> {
    expect_tag(lines, "TVocabulary")?;
    let word_count: usize = parse_field(lines, "word_count")?;
    let mut vocab = Vocabulary::new();
    let mut entries = Vec::with_capacity(word_count);

    for _ in 0..word_count {
        expect_tag(lines, "TWord")?;
        let surface = read_field(lines, "surface")?;
        let index: u32 = parse_field(lines, "index")?;
        let frequency: u32 = parse_field(lines, "frequency")?;
        let code: Vec<u32> = parse_numbers(&read_field(lines, "code")?)?;
        let path: Vec<u32> = parse_numbers(&read_field(lines, "path")?)?;
        expect_close(lines, "TWord")?;
        entries.push(WordEntry {
            surface,
            index,
            frequency,
            code: code.iter().map(|&v| v as u8).collect(),
            path,
        });
    }
    expect_close(lines, "TVocabulary")?;

    for entry in entries {
        vocab.restore_entry(entry);
    }
    Ok(vocab)
}

fn parse_numbers<T: std::str::FromStr>(s: &str) -> Result<Vec<T>, Doc2VecError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split_whitespace()
        .map(|tok| tok.parse().map_err(|_| Doc2VecError::Parse(format!("malformed number list: {}", s))))
        .collect()
}

fn read_documents<B: BufRead>(lines: &mut Lines<B>) -> Result<Corpus, Doc2VecError> {
    expect_tag(lines, "TDocumentsHolder")?;
    let doc_count: usize = parse_field(lines, "doc_count")?;
    let mut documents = Vec::with_capacity(doc_count);

    for _ in 0..doc_count {
        expect_tag(lines, "TDocument")?;
        let tag = read_field(lines, "tag")?;
        let index: u32 = parse_field(lines, "index")?;
        let raw = read_field(lines, "raw")?;
        expect_close(lines, "TDocument")?;

        let words = crate::token::split_tag_and_words(&raw)
            .map(|(_, words)| words)
            .unwrap_or_default();
        documents.push(Document {
            tag,
            raw,
            index,
            words,
        });
    }
    expect_close(lines, "TDocumentsHolder")?;
    Corpus::rebuild_index(documents)
}

fn read_layer<B: BufRead>(lines: &mut Lines<B>, open_tag: &str) -> Result<Matrix, Doc2VecError> {
    expect_tag(lines, open_tag)?;
    let _name = read_field(lines, "name")?;
    let rows: usize = parse_field(lines, "rows")?;
    let dim: usize = parse_field(lines, "dim")?;
    let matrix = Matrix::zeroed(rows, dim);

    for _ in 0..rows {
        let line = next_line(lines)?;
        let mut parts = line.split_whitespace();
        let row_index: usize = parts
            .next()
            .ok_or_else(|| Doc2VecError::Parse("missing row index".to_string()))?
            .parse()
            .map_err(|_| Doc2VecError::Parse("malformed row index".to_string()))?;
        let values: Vec<f64> = parts
            .map(|tok| tok.parse().map_err(|_| Doc2VecError::Parse("malformed row value".to_string())))
            .collect::<Result<_, _>>()?;
        if values.len() != dim {
            return Err(Doc2VecError::Parse(format!(
                "row {} has {} values, expected {}",
                row_index,
                values.len(),
                dim
            )));
        }
        matrix.row(row_index).with_mut(|r| r.copy_from_slice(&values));
    }
    expect_close(lines, open_tag)?;
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_trained_model() {
        let corpus = Corpus::from_lines(vec![
            "doc0 the cat sat on the mat".to_string(),
            "doc1 the dog sat on the rug".to_string(),
        ])
        .unwrap();
        let spec = TrainingSpec {
            dimension: 4,
            cbow: true,
            hierarchical_softmax: true,
            negative: 0,
            window: 2,
            sample: 0.0,
            iterations: 1,
            alpha: 0.05,
            threads: 1,
            seed: 9,
        };
        let trained = crate::trainer::train(corpus, spec, &crate::alpha::StdoutProgress).unwrap();

        let mut buf = Vec::new();
        save(&trained, &mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let reloaded = load(&mut cursor).unwrap();

        assert_eq!(reloaded.vocab.len(), trained.vocab.len());
        assert_eq!(reloaded.corpus.len(), trained.corpus.len());
        for i in 0..trained.model.w_in.row_count() {
            assert_eq!(
                reloaded.model.w_in.row(i).snapshot(),
                trained.model.w_in.row(i).snapshot()
            );
        }
    }
}
