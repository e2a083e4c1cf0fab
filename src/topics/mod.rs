//! Keyword-based topic assignment for ingested articles.
//!
//! Topics are scored from phrase hits and per-token keyword hits, with title
//! matches weighted above content matches. Only topics with enough evidence
//! survive, and ties are broken alphabetically so results are reproducible.

mod taxonomy;

use std::collections::BTreeMap;

pub use taxonomy::TAXONOMY;

const DEFAULT_MAX_TOPICS: usize = 3;
const DEFAULT_MIN_SCORE: f64 = 2.0;
const MIN_TOKEN_LEN: usize = 3;
const NEAR_MATCH_MIN_LEN: usize = 6;
const NEAR_MATCH_MIN_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Phrase,
    Exact,
    Near,
}

impl Field {
    fn points(self, kind: MatchKind) -> f64 {
        match (self, kind) {
            (Field::Title, MatchKind::Phrase) => 4.0,
            (Field::Content, MatchKind::Phrase) => 2.0,
            (Field::Title, MatchKind::Exact) => 2.0,
            (Field::Content, MatchKind::Exact) => 1.0,
            (Field::Title, MatchKind::Near) => 1.0,
            (Field::Content, MatchKind::Near) => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicScore {
    pub topic: &'static str,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct TopicExtractor {
    max_topics: usize,
    min_score: f64,
}

impl Default for TopicExtractor {
    fn default() -> Self {
        Self {
            max_topics: DEFAULT_MAX_TOPICS,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl TopicExtractor {
    pub fn new(max_topics: usize) -> Self {
        Self {
            max_topics,
            ..Self::default()
        }
    }

    /// Returns at most `max_topics` labels, strongest first.
    pub fn extract(&self, title: &str, content: &str) -> Vec<&'static str> {
        self.ranked_scores(title, content)
            .into_iter()
            .map(|s| s.topic)
            .collect()
    }

    /// Scores that cleared the minimum, sorted by descending score then label.
    pub fn ranked_scores(&self, title: &str, content: &str) -> Vec<TopicScore> {
        let mut ranked: Vec<TopicScore> = accumulate(title, content)
            .into_iter()
            .filter(|(_, score)| *score >= self.min_score)
            .map(|(topic, score)| TopicScore { topic, score })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.topic.cmp(b.topic)));
        ranked.truncate(self.max_topics);
        ranked
    }
}

fn accumulate(title: &str, content: &str) -> BTreeMap<&'static str, f64> {
    let title = title.to_lowercase();
    let content = content.to_lowercase();
    let mut scores = BTreeMap::new();

    for (topic, keywords) in TAXONOMY {
        for phrase in keywords.iter().filter(|k| k.contains(' ')) {
            if title.contains(phrase) {
                *scores.entry(*topic).or_insert(0.0) += Field::Title.points(MatchKind::Phrase);
            }
            if content.contains(phrase) {
                *scores.entry(*topic).or_insert(0.0) += Field::Content.points(MatchKind::Phrase);
            }
        }
    }

    for token in tokenize(&title) {
        score_token(token, Field::Title, &mut scores);
    }
    for token in tokenize(&content) {
        score_token(token, Field::Content, &mut scores);
    }

    scores
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

fn score_token(token: &str, field: Field, scores: &mut BTreeMap<&'static str, f64>) {
    let token_len = token.chars().count();
    if token_len < MIN_TOKEN_LEN {
        return;
    }

    for (topic, keywords) in TAXONOMY {
        // first matching keyword wins, one award per topic per token
        let hit = keywords
            .iter()
            .filter(|k| !k.contains(' '))
            .find_map(|keyword| match_keyword(token, token_len, keyword));

        if let Some(kind) = hit {
            *scores.entry(*topic).or_insert(0.0) += field.points(kind);
        }
    }
}

fn match_keyword(token: &str, token_len: usize, keyword: &str) -> Option<MatchKind> {
    if token == keyword {
        return Some(MatchKind::Exact);
    }

    let keyword_len = keyword.chars().count();
    if token_len < NEAR_MATCH_MIN_LEN || keyword_len < NEAR_MATCH_MIN_LEN {
        return None;
    }

    if !(token.contains(keyword) || keyword.contains(token)) {
        return None;
    }

    let ratio = token_len.min(keyword_len) as f64 / token_len.max(keyword_len) as f64;
    (ratio > NEAR_MATCH_MIN_RATIO).then_some(MatchKind::Near)
}
