//! Turns the most recent journal entries into a stored insight record.
//!
//! One call reads up to `recent_limit` entries, asks the model for five
//! insights and three recommendations, parses the bullets and writes a single
//! `AIInsights` row against the newest entry. Older entries are context only.
//!
//! The read, the model call and the write are separate statements with no
//! transaction around them. An entry added after the read is not seen, and two
//! concurrent calls can both target the same newest entry and each insert a
//! row for it.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::ai::parser::{self, INSIGHT_COUNT, RECOMMENDATION_COUNT};
use crate::ai::ModelClient;
use crate::db::{entries, insights, StoreError};
use crate::models::entry::RecentEntry;
use crate::models::insight::NewInsight;

pub const DEFAULT_RECENT_LIMIT: i64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("no journal entries found")]
    NoEntries,

    #[error("model call failed: {0}")]
    Model(anyhow::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub entry_id: i64,
    pub insight_id: i64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// Raw model output, untruncated.
    pub full_text: String,
}

#[derive(Clone)]
pub struct Recommender {
    db: SqlitePool,
    model: Arc<dyn ModelClient>,
    recent_limit: i64,
}

impl Recommender {
    pub fn new(db: SqlitePool, model: Arc<dyn ModelClient>, recent_limit: i64) -> Self {
        Self {
            db,
            model,
            recent_limit,
        }
    }

    pub async fn recommend(&self) -> Result<Recommendation, RecommendError> {
        let recent = entries::fetch_recent(&self.db, self.recent_limit).await?;
        let target = recent.first().ok_or(RecommendError::NoEntries)?.entry_id;

        let prompt = build_prompt(&recent);
        tracing::debug!(
            entry_id = target,
            context_entries = recent.len(),
            provider = self.model.name(),
            "Requesting recommendations"
        );

        let text = self
            .model
            .generate(&prompt)
            .await
            .map_err(RecommendError::Model)?;

        let parsed = parser::parse_model_response(&text, target);
        if parsed.insights.len() < INSIGHT_COUNT || parsed.recommendations.len() < RECOMMENDATION_COUNT {
            tracing::warn!(
                entry_id = target,
                insights = parsed.insights.len(),
                recommendations = parsed.recommendations.len(),
                "Model returned fewer bullets than requested"
            );
        }

        let insight_id =
            insights::insert_insights(&self.db, &NewInsight::from_parsed(&parsed, text.as_str()))
                .await?;
        tracing::info!(entry_id = target, insight_id, "Stored insight record");

        Ok(Recommendation {
            entry_id: target,
            insight_id,
            insights: parsed.insights,
            recommendations: parsed.recommendations,
            full_text: text,
        })
    }
}

const PROMPT_PREAMBLE: &str = "You are a supportive journaling assistant. Below are a user's most \
recent journal entries, newest first. Each entry has ten questionnaire scores from 1 to 5, \
their average, and the user's own reflection.

In a single pass, respond with exactly 5 bullet points of insights about patterns in the \
user's wellbeing, followed by exactly 3 bullet points of practical recommendations. Start \
every bullet with \"- \". Do not include any other text, headings, or nested bullets.";

pub fn format_entry(entry: &RecentEntry) -> String {
    let scores: Vec<String> = entry
        .scores
        .iter()
        .enumerate()
        .map(|(i, score)| format!("Q{}: {}", i + 1, score))
        .collect();

    format!(
        "Entry {}\nScores: {}\nAverage mood score: {:.2}\nReflection: {}",
        entry.entry_id,
        scores.join(", "),
        entry.average_score(),
        entry.response.trim()
    )
}

pub fn build_prompt(entries: &[RecentEntry]) -> String {
    let formatted: Vec<String> = entries.iter().map(format_entry).collect();
    format!("{}\n\n{}", PROMPT_PREAMBLE, formatted.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::fake::FakeModel;
    use crate::db::entries::{insert_entry, sample_entry};
    use crate::db::pool::test_pool;

    const EIGHT_BULLETS: &str = "- i1\n- i2\n- i3\n- i4\n- i5\n- r1\n- r2\n- r3";

    fn recommender(pool: &SqlitePool, model: Arc<FakeModel>) -> Recommender {
        Recommender::new(pool.clone(), model, DEFAULT_RECENT_LIMIT)
    }

    #[test]
    fn test_format_entry_uses_derived_average() {
        let entry = RecentEntry {
            entry_id: 4,
            scores: [1, 2, 3, 4, 5, 5, 4, 3, 2, 2],
            response: "  felt ok  ".into(),
        };
        let text = format_entry(&entry);
        assert!(text.contains("Q1: 1, Q2: 2"));
        assert!(text.contains("Q10: 2"));
        assert!(text.contains("Average mood score: 3.10"));
        assert!(text.ends_with("Reflection: felt ok"));
    }

    #[test]
    fn test_build_prompt_keeps_entry_order() {
        let newer = RecentEntry { entry_id: 2, scores: [3; 10], response: "newer".into() };
        let older = RecentEntry { entry_id: 1, scores: [3; 10], response: "older".into() };
        let prompt = build_prompt(&[newer, older]);

        assert!(prompt.starts_with(PROMPT_PREAMBLE));
        assert!(prompt.contains("exactly 5 bullet points"));
        assert!(prompt.contains("exactly 3 bullet points"));
        assert!(prompt.find("newer").unwrap() < prompt.find("older").unwrap());
    }

    #[tokio::test]
    async fn test_no_entries_skips_model_and_store() {
        let pool = test_pool().await;
        let model = Arc::new(FakeModel::replying(EIGHT_BULLETS));

        let err = recommender(&pool, model.clone()).recommend().await.unwrap_err();
        assert!(matches!(err, RecommendError::NoEntries));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_targets_newest_entry_only() {
        let pool = test_pool().await;
        let older = insert_entry(&pool, &sample_entry("2024-10-13", 4)).await.unwrap();
        let newest = insert_entry(&pool, &sample_entry("2024-10-14", 3)).await.unwrap();
        let model = Arc::new(FakeModel::replying(EIGHT_BULLETS));

        let rec = recommender(&pool, model.clone()).recommend().await.unwrap();
        assert_eq!(rec.entry_id, newest);
        assert_eq!(rec.insights.len(), 5);
        assert_eq!(rec.recommendations, vec!["r1", "r2", "r3"]);
        assert_eq!(rec.full_text, EIGHT_BULLETS);

        let stored = insights::list_for_entry(&pool, newest).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].insight_1.as_deref(), Some("i1"));
        assert_eq!(stored[0].insight_3.as_deref(), Some("i3"));
        assert_eq!(stored[0].recommendation_3.as_deref(), Some("r3"));
        assert_eq!(stored[0].full_response, EIGHT_BULLETS);
        assert!(insights::list_for_entry(&pool, older).await.unwrap().is_empty());

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("entry for 2024-10-13"));
    }

    #[tokio::test]
    async fn test_context_is_capped_at_limit() {
        let pool = test_pool().await;
        for i in 0..12 {
            insert_entry(&pool, &sample_entry(&format!("2024-10-{:02}", i + 1), 3))
                .await
                .unwrap();
        }
        let model = Arc::new(FakeModel::replying(EIGHT_BULLETS));
        recommender(&pool, model.clone()).recommend().await.unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts[0].matches("Reflection:").count(), 10);
        assert!(!prompts[0].contains("entry for 2024-10-02"));
    }

    #[tokio::test]
    async fn test_model_failure_writes_nothing() {
        let pool = test_pool().await;
        let id = insert_entry(&pool, &sample_entry("2024-10-14", 3)).await.unwrap();
        let model = Arc::new(FakeModel::failing("429 quota exceeded"));

        let err = recommender(&pool, model).recommend().await.unwrap_err();
        match err {
            RecommendError::Model(e) => assert!(e.to_string().contains("quota exceeded")),
            other => panic!("expected model error, got {other:?}"),
        }
        assert!(insights::list_for_entry(&pool, id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_calls_insert_separate_rows() {
        let pool = test_pool().await;
        let id = insert_entry(&pool, &sample_entry("2024-10-14", 3)).await.unwrap();
        let rec = recommender(&pool, Arc::new(FakeModel::replying(EIGHT_BULLETS)));

        let first = rec.recommend().await.unwrap();
        let second = rec.recommend().await.unwrap();
        assert_ne!(first.insight_id, second.insight_id);
        assert_eq!(first.entry_id, second.entry_id);
        assert_eq!(insights::list_for_entry(&pool, id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bulletless_reply_stores_nulls() {
        let pool = test_pool().await;
        let id = insert_entry(&pool, &sample_entry("2024-10-14", 3)).await.unwrap();
        let rec = recommender(&pool, Arc::new(FakeModel::replying("Sorry, I can't help.")));

        let result = rec.recommend().await.unwrap();
        assert!(result.insights.is_empty());

        let stored = insights::list_for_entry(&pool, id).await.unwrap();
        assert!(stored[0].insight_1.is_none());
        assert!(stored[0].recommendation_1.is_none());
        assert_eq!(stored[0].full_response, "Sorry, I can't help.");
    }
}
