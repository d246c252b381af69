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

use rustc_hash::FxHashMap;

use crate::{errors::Doc2VecError, token::split_tag_and_words};

/// A single line of the training corpus: a tag, the raw line, and its tokenized words.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub tag: String,
    pub raw: String,
    pub index: u32,
    pub words: Vec<String>,
}

impl Document {
    /// Parses `raw` into a document at `index`. Returns `None` if `raw` has no tag-separating
    /// space (the line cannot be split into a tag and a body).
    pub fn parse(raw: &str, index: u32) -> Option<Self> {
        let (tag, words) = split_tag_and_words(raw)?;
        Some(Self {
            tag: tag.to_string(),
            raw: raw.to_string(),
            index,
            words,
        })
    }
}

/// An ordered sequence of documents plus a tag → index lookup.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    tag_to_index: FxHashMap<String, u32>,
}

impl Corpus {
    /// Builds a corpus from raw lines (one document per non-skipped line). Fails if any two
    /// documents share a tag, or if no documents are produced.
    pub fn from_lines<I: IntoIterator<Item = String>>(lines: I) -> Result<Self, Doc2VecError> {
        let mut documents = Vec::new();
        let mut tag_to_index = FxHashMap::default();

        for line in lines {
            if line.is_empty() {
                continue;
            }
            let index = documents.len() as u32;
            let Some(doc) = Document::parse(&line, index) else {
                continue;
            };
            if tag_to_index.contains_key(&doc.tag) {
                return Err(Doc2VecError::DuplicateTag(doc.tag));
            }
            tag_to_index.insert(doc.tag.clone(), index);
            documents.push(doc);
        }

        if documents.is_empty() {
            return Err(Doc2VecError::EmptyCorpus);
        }

        Ok(Self {
            documents,
            tag_to_index,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, index: u32) -> Option<&Document> {
        self.documents.get(index as usize)
    }

    pub fn index_of_tag(&self, tag: &str) -> Option<u32> {
        self.tag_to_index.get(tag).copied()
    }

    /// Splits the corpus into `parts` disjoint, contiguous shards whose union is the full
    /// document range. Mirrors the original's `numDocsInPart = D / parts + 1` stepping: the
    /// last shard can end up smaller (or, for small corpora, larger) than an even split, but
    /// every document appears in exactly one shard.
    pub fn split(&self, parts: usize) -> Vec<Vec<Document>> {
        if parts == 0 || self.documents.is_empty() {
            return vec![self.documents.clone()];
        }

        let per_part = self.documents.len() / parts + 1;
        let mut shards = Vec::new();
        let mut start = 0usize;

        while self.documents.len() as isize - start as isize > per_part as isize {
            shards.push(self.documents[start..start + per_part].to_vec());
            start += per_part;
        }
        shards.push(self.documents[start..].to_vec());
        shards
    }

    pub fn rebuild_index(documents: Vec<Document>) -> Result<Self, Doc2VecError> {
        let mut tag_to_index = FxHashMap::default();
        for doc in &documents {
            if tag_to_index.contains_key(&doc.tag) {
                return Err(Doc2VecError::DuplicateTag(doc.tag.clone()));
            }
            tag_to_index.insert(doc.tag.clone(), doc.index);
        }
        if documents.is_empty() {
            return Err(Doc2VecError::EmptyCorpus);
        }
        Ok(Self {
            documents,
            tag_to_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_tag_and_words() {
        let doc = Document::parse("doc1 cat sat on mat", 0).unwrap();
        assert_eq!(doc.tag, "doc1");
        assert_eq!(doc.words, vec!["cat", "sat", "on", "mat"]);
    }

    #[test]
    fn duplicate_tags_fail() {
        let err = Corpus::from_lines(lines(&["a cat", "a dog"])).unwrap_err();
        assert!(matches!(err, Doc2VecError::DuplicateTag(_)));
    }

    #[test]
    fn empty_corpus_fails() {
        let err = Corpus::from_lines(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Doc2VecError::EmptyCorpus));
    }

    #[test]
    fn shard_coverage_is_exact_and_disjoint() {
        let raw: Vec<String> = (0..10).map(|i| format!("doc{i} word{i}")).collect();
        let corpus = Corpus::from_lines(raw).unwrap();
        let shards = corpus.split(4);

        assert_eq!(shards.len(), 4);
        assert!(shards.iter().all(|s| !s.is_empty()));

        let mut seen: Vec<u32> = shards.iter().flatten().map(|d| d.index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }
}
