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

mod cli;

use std::fs::File;
use std::io::{BufReader, BufWriter};

use clap::Parser;

use cli::{Cli, Command};
use doc2vec::alpha::StdoutProgress;
use doc2vec::{persistence, Corpus, TrainingSpec};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), doc2vec::Doc2VecError> {
    match command {
        Command::Train {
            corpus,
            output,
            size,
            cbow,
            hs,
            negative,
            window,
            sample,
            iter,
            alpha,
            threads,
            seed,
        } => {
            let lines = std::fs::read_to_string(&corpus)?
                .lines()
                .map(|l| l.to_string())
                .collect::<Vec<_>>();
            let corpus = Corpus::from_lines(lines)?;

            let spec = TrainingSpec {
                dimension: size,
                cbow,
                hierarchical_softmax: hs,
                negative,
                window,
                sample,
                iterations: iter,
                alpha,
                threads: threads.unwrap_or_else(num_cpus::get),
                seed,
            };

            let trained = doc2vec::train(corpus, spec, &StdoutProgress)?;

            let mut writer = BufWriter::new(File::create(&output)?);
            persistence::save(&trained, &mut writer)?;
            println!(
                "trained {} words over {} documents -> {}",
                trained.vocab.len(),
                trained.corpus.len(),
                output.display()
            );
        }
        Command::Similar { model, word, doc, k } => {
            let mut reader = BufReader::new(File::open(&model)?);
            let trained = persistence::load(&mut reader)?;
            let hits = match (word, doc) {
                (Some(word), None) => trained.similar_words(&word, k)?,
                (None, Some(doc)) => trained.similar_documents(&doc, k)?,
                _ => {
                    return Err(doc2vec::Doc2VecError::Parse(
                        "exactly one of --word or --doc is required".to_string(),
                    ))
                }
            };
            for (neighbor, score) in hits {
                println!("{:.4}\t{}", score, neighbor);
            }
        }
        Command::Vector { model, word, doc } => {
            let mut reader = BufReader::new(File::open(&model)?);
            let trained = persistence::load(&mut reader)?;
            let vector = match (word, doc) {
                (Some(word), None) => trained.word_vector(&word)?,
                (None, Some(doc)) => trained.document_vector(&doc)?,
                _ => {
                    return Err(doc2vec::Doc2VecError::Parse(
                        "exactly one of --word or --doc is required".to_string(),
                    ))
                }
            };
            let formatted: Vec<String> = vector.iter().map(|v| format!("{:.6}", v)).collect();
            println!("{}", formatted.join(" "));
        }
    }
    Ok(())
}
