use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::ai::parser::ParsedInsights;

/// Bullet slots stored per record, for each of insights and recommendations.
pub const STORED_SLOTS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InsightRecord {
    pub insight_id: i64,
    pub entry_id: i64,
    pub insight_1: Option<String>,
    pub insight_2: Option<String>,
    pub insight_3: Option<String>,
    pub recommendation_1: Option<String>,
    pub recommendation_2: Option<String>,
    pub recommendation_3: Option<String>,
    pub full_response: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewInsight {
    pub entry_id: i64,
    pub insights: [Option<String>; STORED_SLOTS],
    pub recommendations: [Option<String>; STORED_SLOTS],
    pub full_response: String,
}

impl NewInsight {
    /// Fills the slots in order from a parse; slots the parse did not reach stay `None`.
    pub fn from_parsed(parsed: &ParsedInsights, full_response: impl Into<String>) -> Self {
        Self {
            entry_id: parsed.entry_id,
            insights: slots(&parsed.insights),
            recommendations: slots(&parsed.recommendations),
            full_response: full_response.into(),
        }
    }
}

fn slots(bullets: &[String]) -> [Option<String>; STORED_SLOTS] {
    let mut out: [Option<String>; STORED_SLOTS] = Default::default();
    for (slot, bullet) in out.iter_mut().zip(bullets) {
        *slot = Some(bullet.clone());
    }
    out
}
