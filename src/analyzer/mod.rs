//! @ai:module:intent Stage 2: static analysis of generated text
//! @ai:module:layer application
//! @ai:module:public_api ContentAnalyzer, count_words, extract_urls

pub mod links;

pub use links::{HttpLinkChecker, LinkCheck, LinkChecker, MockLinkChecker};

use crate::store::ContentItem;
use regex::Regex;
use std::sync::OnceLock;

const URL_PATTERN: &str = r#"https?://[^\s<>"')\]]+"#;

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(URL_PATTERN).expect("static URL pattern compiles"))
}

fn markdown_link_regex() -> &'static Regex {
    static MD_LINK_RE: OnceLock<Regex> = OnceLock::new();
    MD_LINK_RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("static pattern compiles"))
}

fn non_word_regex() -> &'static Regex {
    static NON_WORD_RE: OnceLock<Regex> = OnceLock::new();
    NON_WORD_RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("static pattern compiles"))
}

/// @ai:intent Extract all URLs from generated text
/// @ai:effects pure
pub fn extract_urls(text: &str) -> Vec<String> {
    url_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// @ai:intent Count words, ignoring markup and link targets
///
/// Markdown links keep their display text, bare URLs are dropped entirely,
/// then punctuation is stripped and whitespace-delimited tokens counted.
/// @ai:effects pure
pub fn count_words(text: &str) -> u64 {
    let without_md_links = markdown_link_regex().replace_all(text, "$1");
    let without_urls = url_regex().replace_all(&without_md_links, "");
    let cleaned = non_word_regex().replace_all(&without_urls, " ");
    cleaned.split_whitespace().count() as u64
}

/// @ai:intent Enriches content items with word counts and broken links
pub struct ContentAnalyzer<L: LinkChecker> {
    checker: L,
}

impl<L: LinkChecker> ContentAnalyzer<L> {
    /// @ai:intent Create a new analyzer
    /// @ai:effects pure
    pub fn new(checker: L) -> Self {
        Self { checker }
    }

    /// @ai:intent Analyze every item; no item is ever dropped
    ///
    /// Link checks that fail are conservatively recorded as broken rather
    /// than surfaced as errors.
    /// @ai:effects network
    pub async fn analyze_items(&self, mut items: Vec<ContentItem>) -> Vec<ContentItem> {
        let total = items.len();

        for (index, item) in items.iter_mut().enumerate() {
            let word_count = count_words(&item.text);
            let urls = extract_urls(&item.text);

            tracing::info!(
                "[{}/{}] Analyzing {}/{}: {} words, {} URLs",
                index + 1,
                total,
                item.model_id,
                item.prompt_id,
                word_count,
                urls.len()
            );

            let mut broken = Vec::new();

            for url in &urls {
                let check = self.checker.check(url).await;

                if check.reachable {
                    tracing::debug!("  {} ok ({})", check.url, check.detail);
                } else {
                    tracing::warn!("  {} broken ({})", check.url, check.detail);
                    broken.push(check.url);
                }
            }

            item.word_count = Some(word_count);
            item.broken_links = Some(broken);
        }

        items
    }
}
