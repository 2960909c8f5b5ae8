//! Splits model output into insight and recommendation bullets.
//!
//! The split is purely positional: the first [`INSIGHT_COUNT`] bullet lines
//! are insights, the next [`RECOMMENDATION_COUNT`] are recommendations, and
//! anything after that is dropped. Headings and prose are never consulted,
//! so a stray bulleted sub-point shifts every later bullet by one. Storage
//! depends on this layout; changing it is a behaviour change.

use once_cell::sync::Lazy;
use regex::Regex;

pub const INSIGHT_COUNT: usize = 5;
pub const RECOMMENDATION_COUNT: usize = 3;

static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[*\-•]\s+(\S.*)$").expect("bullet pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInsights {
    pub entry_id: i64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Content of every bullet line, in document order.
pub fn bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| BULLET_LINE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

pub fn parse_model_response(text: &str, entry_id: i64) -> ParsedInsights {
    let mut bullets = bullet_lines(text).into_iter();

    let insights = bullets.by_ref().take(INSIGHT_COUNT).collect();
    let recommendations = bullets.take(RECOMMENDATION_COUNT).collect();

    ParsedInsights {
        entry_id,
        insights,
        recommendations,
    }
}
