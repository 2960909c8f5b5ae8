use sqlx::SqlitePool;

use super::{entries, StoreResult};
use crate::models::entry::NewEntry;

struct SampleEntry {
    date: &'static str,
    scores: [i64; 10],
    mood_score: i64,
    response: &'static str,
}

const SAMPLE_ENTRIES: [SampleEntry; 5] = [
    SampleEntry {
        date: "2024-10-10",
        scores: [5, 4, 5, 5, 4, 5, 4, 5, 5, 4],
        mood_score: 4,
        response: "Had an incredibly productive day at work. Finished the big project ahead of schedule and celebrated with a great dinner with friends. Feeling energized and happy about my progress.",
    },
    SampleEntry {
        date: "2024-10-11",
        scores: [3, 2, 4, 3, 2, 3, 2, 3, 4, 3],
        mood_score: 2,
        response: "The new project deadlines are really stressing me out. Spent 12 hours straight coding and forgot to take a proper break. I feel mentally drained and anxious about the upcoming review.",
    },
    SampleEntry {
        date: "2024-10-12",
        scores: [1, 1, 2, 1, 1, 3, 2, 2, 1, 1],
        mood_score: 1,
        response: "Slept badly again, maybe only 4 hours. Couldn't focus on anything today. Skipped the gym and just watched TV. Need to figure out a better sleep schedule and stop drinking coffee late.",
    },
    SampleEntry {
        date: "2024-10-13",
        scores: [4, 5, 3, 4, 5, 4, 5, 4, 3, 5],
        mood_score: 5,
        response: "Spent the entire afternoon hiking with my family, which was wonderful. Got a lot of exercise and great conversation. My creative scores were lower, but my social battery is fully charged.",
    },
    SampleEntry {
        date: "2024-10-14",
        scores: [3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
        mood_score: 3,
        response: "Just a standard Monday. Got through my emails, went grocery shopping, and cooked dinner. Nothing exceptional happened, good or bad, but I feel a little isolated after the busy weekend.",
    },
];

/// Inserts the five sample entries, oldest first, so the last one is the
/// entry `/recommend` targets. Returns how many rows were written.
pub async fn seed_sample_entries(db: &SqlitePool) -> StoreResult<usize> {
    for sample in &SAMPLE_ENTRIES {
        let entry = NewEntry {
            entry_date: sample.date.to_string(),
            scores: sample.scores,
            mood_score: sample.mood_score,
            response: sample.response.to_string(),
        };
        entries::insert_entry(db, &entry).await?;
    }
    Ok(SAMPLE_ENTRIES.len())
}

/// Seeds only into an empty journal.
pub async fn seed_if_empty(db: &SqlitePool) -> StoreResult<usize> {
    if entries::count(db).await? > 0 {
        tracing::info!("Journal already has entries, skipping sample data");
        return Ok(0);
    }
    let inserted = seed_sample_entries(db).await?;
    tracing::info!(inserted, "Seeded sample journal entries");
    Ok(inserted)
}
