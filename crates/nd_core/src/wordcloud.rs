use std::collections::HashMap;

use serde::Serialize;

use crate::query::ArticleFilter;
use crate::types::ArticleTable;

/// Maximum number of entries returned to the word-cloud view.
pub const MAX_WORDS: usize = 250;

/// One word-cloud entry: `size` is the raw occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub text: String,
    pub size: usize,
}

/// Count token frequencies over the text of every corpus row the filter
/// accepts.
///
/// Tokens are lowercase alphanumeric runs. Words occurring only once are
/// dropped; the rest are ordered by descending count, ties broken
/// alphabetically, and truncated to [`MAX_WORDS`].
pub fn word_frequencies(corpus: &ArticleTable, filter: &ArticleFilter) -> Vec<WordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for article in corpus.articles().iter().filter(|a| filter.matches(a)) {
        for token in tokenize(&article.summary) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(text, size)| WordCount { text, size })
        .collect();
    words.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.text.cmp(&b.text)));
    words.truncate(MAX_WORDS);
    words
}

/// Whole-word, case-insensitive membership test.
pub fn contains_word(text: &str, word: &str) -> bool {
    let needle = word.to_lowercase();
    !needle.is_empty() && tokenize(text).any(|token| token == needle)
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;
    use chrono::{TimeZone, Utc};

    fn corpus_row(summary: &str, source: &str, topic: &str) -> Article {
        Article {
            title: String::new(),
            summary: summary.to_string(),
            link: String::new(),
            image: String::new(),
            source: source.to_string(),
            topic1: topic.to_string(),
            topic2: String::new(),
            publish_date: Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn counts_are_case_insensitive_and_singletons_are_dropped() {
        let corpus = ArticleTable::new(vec![corpus_row("the cat sat. THE CAT ran.", "Grist", "Energy")]);
        let words = word_frequencies(&corpus, &ArticleFilter::new());
        assert_eq!(
            words,
            vec![
                WordCount { text: "cat".to_string(), size: 2 },
                WordCount { text: "the".to_string(), size: 2 },
            ]
        );
    }

    #[test]
    fn equal_counts_order_alphabetically() {
        let corpus = ArticleTable::new(vec![corpus_row("zebra zebra apple apple", "Grist", "Energy")]);
        let words = word_frequencies(&corpus, &ArticleFilter::new());
        assert_eq!(words[0].text, "apple");
        assert_eq!(words[1].text, "zebra");
    }

    #[test]
    fn filters_restrict_the_corpus() {
        let corpus = ArticleTable::new(vec![
            corpus_row("solar solar", "Grist", "Energy"),
            corpus_row("coal coal", "BBC News", "Fossil Fuels"),
        ]);
        let filter = ArticleFilter::new().with_source(Some("grist"));
        let words = word_frequencies(&corpus, &filter);
        assert_eq!(words, vec![WordCount { text: "solar".to_string(), size: 2 }]);
    }

    #[test]
    fn output_is_capped() {
        // 300 distinct words, each appearing twice.
        let text = (0..300)
            .map(|i| format!("word{i} word{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let corpus = ArticleTable::new(vec![corpus_row(&text, "Grist", "Energy")]);
        let words = word_frequencies(&corpus, &ArticleFilter::new());
        assert_eq!(words.len(), MAX_WORDS);
    }

    #[test]
    fn contains_word_matches_whole_tokens_only() {
        assert!(contains_word("The Climate Crisis deepens", "crisis"));
        assert!(contains_word("Wind, solar and storage", "SOLAR"));
        assert!(!contains_word("Crisis management", "crisi"));
        assert!(!contains_word("anything", ""));
    }
}
