use sqlx::SqlitePool;

use super::StoreResult;
use crate::models::insight::{InsightRecord, NewInsight};

/// Fails with `StoreError::Integrity` when `entry_id` names no journal entry.
pub async fn insert_insights(db: &SqlitePool, insight: &NewInsight) -> StoreResult<i64> {
    let [i1, i2, i3] = &insight.insights;
    let [r1, r2, r3] = &insight.recommendations;

    let result = sqlx::query(
        r#"
        INSERT INTO AIInsights
            (entry_id, insight_1, insight_2, insight_3,
             recommendation_1, recommendation_2, recommendation_3, full_response)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(insight.entry_id)
    .bind(i1.as_deref())
    .bind(i2.as_deref())
    .bind(i3.as_deref())
    .bind(r1.as_deref())
    .bind(r2.as_deref())
    .bind(r3.as_deref())
    .bind(&insight.full_response)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_for_entry(db: &SqlitePool, entry_id: i64) -> StoreResult<Vec<InsightRecord>> {
    let records = sqlx::query_as::<_, InsightRecord>(
        "SELECT * FROM AIInsights WHERE entry_id = ? ORDER BY insight_id ASC",
    )
    .bind(entry_id)
    .fetch_all(db)
    .await?;

    Ok(records)
}
