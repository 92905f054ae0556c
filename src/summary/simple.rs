//! Frequency-based summarizer

use super::traits::*;
use crate::models::{ContentItem, Summary};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

const MAX_KEYWORDS: usize = 6;
const MAX_HIGHLIGHTS: usize = 3;
const HIGHLIGHT_SNIPPET_CHARS: usize = 80;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "growth", "rise", "breakthrough", "opportunity",
    "上升", "突破", "增长", "机遇",
];
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "risk", "decline", "crisis", "challenge", "drop",
    "下降", "危机", "挑战", "下滑",
];

/// Minimum token length in bytes; a single CJK character passes
const MIN_TOKEN_BYTES: usize = 2;

/// Summarizer built on plain token statistics
#[derive(Debug, Clone, Default)]
pub struct SimpleSummarizer;

impl SimpleSummarizer {
    pub fn new() -> Self {
        Self
    }

    fn extract_keywords(&self, items: &[ContentItem]) -> Vec<String> {
        let mut freq: HashMap<String, usize> = HashMap::new();
        for item in items {
            let text = format!("{} {}", item.title, item.snippet);
            let mut seen = HashSet::new();
            for token in tokenize(&text) {
                if token.len() < MIN_TOKEN_BYTES || !seen.insert(token.clone()) {
                    continue;
                }
                *freq.entry(token).or_insert(0) += 1;
            }
        }

        let mut pairs: Vec<(String, usize)> = freq.into_iter().collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        pairs
            .into_iter()
            .take(MAX_KEYWORDS)
            .map(|(token, _)| token)
            .collect()
    }

    fn build_highlights(&self, items: &[ContentItem]) -> Vec<String> {
        items
            .iter()
            .take(MAX_HIGHLIGHTS)
            .map(|item| {
                if item.snippet.is_empty() {
                    item.title.clone()
                } else {
                    format!(
                        "{} - {}",
                        item.title,
                        truncate(&item.snippet, HIGHLIGHT_SNIPPET_CHARS)
                    )
                }
            })
            .collect()
    }

    fn build_overview(&self, query: &str, items: &[ContentItem], highlights: &[String]) -> String {
        let topic = highlights
            .first()
            .map(String::as_str)
            .or_else(|| items.first().map(|item| item.title.as_str()))
            .unwrap_or_default();

        format!(
            "Found {} related items about \"{}\", mostly around: {}.",
            items.len(),
            query,
            topic
        )
    }

    fn estimate_sentiment(&self, items: &[ContentItem]) -> &'static str {
        let (positive, negative) = items.iter().fold((0, 0), |(pos, neg), item| {
            let text = format!("{} {}", item.snippet, item.title).to_lowercase();
            (
                pos + count_contains(&text, POSITIVE_WORDS),
                neg + count_contains(&text, NEGATIVE_WORDS),
            )
        });

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => "positive",
            std::cmp::Ordering::Less => "negative",
            std::cmp::Ordering::Equal => "neutral",
        }
    }
}

#[async_trait]
impl Summarizer for SimpleSummarizer {
    async fn summarize(&self, query: &str, items: &[ContentItem]) -> Result<Summary, SummaryError> {
        if items.is_empty() {
            return Ok(Summary {
                query: query.to_string(),
                generated_at: Some(Utc::now()),
                ..Default::default()
            });
        }

        let keywords = self.extract_keywords(items);
        let highlights = self.build_highlights(items);
        let sentiment = self.estimate_sentiment(items);

        let mut source_breakdown = HashMap::new();
        for item in items {
            *source_breakdown.entry(item.source.clone()).or_insert(0) += 1;
        }

        let overview = self.build_overview(query, items, &highlights);
        Ok(Summary {
            query: query.to_string(),
            overview,
            highlights,
            keywords,
            sentiment: sentiment.to_string(),
            source_breakdown,
            generated_at: Some(Utc::now()),
        })
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}

fn count_contains(text: &str, dictionary: &[&str]) -> usize {
    dictionary.iter().filter(|word| text.contains(*word)).count()
}
