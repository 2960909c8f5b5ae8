use sqlx::SqlitePool;

use super::StoreResult;
use crate::models::entry::{JournalEntry, NewEntry, RecentEntry};

pub async fn insert_entry(db: &SqlitePool, entry: &NewEntry) -> StoreResult<i64> {
    let [q1, q2, q3, q4, q5, q6, q7, q8, q9, q10] = entry.scores;

    let result = sqlx::query(
        r#"
        INSERT INTO JournalEntries
            (entry_date, q1, q2, q3, q4, q5, q6, q7, q8, q9, q10, moodScore, response)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.entry_date)
    .bind(q1)
    .bind(q2)
    .bind(q3)
    .bind(q4)
    .bind(q5)
    .bind(q6)
    .bind(q7)
    .bind(q8)
    .bind(q9)
    .bind(q10)
    .bind(entry.mood_score)
    .bind(&entry.response)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Up to `limit` entries, newest first by id. The stored date plays no part.
pub async fn fetch_recent(db: &SqlitePool, limit: i64) -> StoreResult<Vec<RecentEntry>> {
    if limit <= 0 {
        return Ok(Vec::new());
    }

    let entries = sqlx::query_as::<_, JournalEntry>(
        "SELECT * FROM JournalEntries ORDER BY entry_id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(entries.into_iter().map(RecentEntry::from).collect())
}

pub async fn list_all(db: &SqlitePool) -> StoreResult<Vec<JournalEntry>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        "SELECT * FROM JournalEntries ORDER BY entry_id DESC",
    )
    .fetch_all(db)
    .await?;

    Ok(entries)
}

pub async fn find_entry(db: &SqlitePool, entry_id: i64) -> StoreResult<Option<JournalEntry>> {
    let entry = sqlx::query_as::<_, JournalEntry>(
        "SELECT * FROM JournalEntries WHERE entry_id = ?",
    )
    .bind(entry_id)
    .fetch_optional(db)
    .await?;

    Ok(entry)
}

pub async fn count(db: &SqlitePool) -> StoreResult<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM JournalEntries")
        .fetch_one(db)
        .await?;
    Ok(total)
}

#[cfg(test)]
pub(crate) fn sample_entry(date: &str, score: i64) -> NewEntry {
    NewEntry {
        entry_date: date.to_string(),
        scores: [score; 10],
        mood_score: score,
        response: format!("entry for {date}"),
    }
}
