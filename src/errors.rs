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

use std::{
    fmt::{Debug, Display},
    io,
};

pub enum Doc2VecError {
    Io(io::Error),
    /// Malformed model header/tail tag, or a numeric field failed to parse.
    Parse(String),
    /// Two documents in the same corpus carried the same tag.
    DuplicateTag(String),
    /// Ingestion saw no documents at all.
    EmptyCorpus,
    /// A programming-bug-grade out-of-range index into one of the embedding matrices.
    OutOfRange {
        what: &'static str,
        index: u32,
        len: u32,
    },
    /// Hierarchical-softmax lookup by a word index with no vocabulary entry.
    MissingWord(u32),
}

impl Display for Doc2VecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {}", e),
            Self::Parse(e) => write!(f, "parse: {}", e),
            Self::DuplicateTag(tag) => write!(f, "duplicate document tag \"{}\"", tag),
            Self::EmptyCorpus => write!(f, "corpus has no documents"),
            Self::OutOfRange { what, index, len } => {
                write!(f, "{} index {} out of range (len {})", what, index, len)
            }
            Self::MissingWord(idx) => write!(f, "no vocabulary entry for word index {}", idx),
        }
    }
}

impl Debug for Doc2VecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for Doc2VecError {}

impl From<io::Error> for Doc2VecError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<&str> for Doc2VecError {
    fn from(value: &str) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<String> for Doc2VecError {
    fn from(value: String) -> Self {
        Self::Parse(value)
    }
}
