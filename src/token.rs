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

/// ASCII lower-cases a word. Non-ASCII bytes pass through unchanged.
pub fn normalize_word(word: &str) -> String {
    word.chars().map(|c| c.to_ascii_lowercase()).collect()
}

/// Splits `raw` into its leading tag (substring before the first space) and the remainder,
/// then tokenizes the remainder by maximal runs of word characters (`[0-9A-Za-z_]+`).
pub fn split_tag_and_words(raw: &str) -> Option<(&str, Vec<String>)> {
    let space = raw.find(' ')?;
    let tag = &raw[..space];
    let words = extract_words(&raw[space + 1..]);
    Some((tag, words))
}

/// Extracts maximal runs of word characters from `text`, in order of appearance.
pub fn extract_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_ascii() {
        assert_eq!(normalize_word("HeLLo"), "hello");
    }

    #[test]
    fn extract_words_splits_on_non_word_chars() {
        assert_eq!(
            extract_words("the cat, sat: on_the mat!"),
            vec!["the", "cat", "sat", "on_the", "mat"]
        );
    }

    #[test]
    fn split_tag_and_words_uses_first_space() {
        let (tag, words) = split_tag_and_words("doc1 the cat sat").unwrap();
        assert_eq!(tag, "doc1");
        assert_eq!(words, vec!["the", "cat", "sat"]);
    }

    #[test]
    fn split_tag_and_words_none_without_space() {
        assert!(split_tag_and_words("notag").is_none());
    }
}
