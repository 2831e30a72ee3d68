use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use journal_types::{AiActivity, AiActivityRecord};
use rusqlite::Connection;
use std::path::Path;
use tracing::warn;

/// Collect AI code-attribution rows for the target date from the local
/// tracking store. The store is optional sidecar data: a missing file or
/// any read error degrades to an empty bundle.
pub fn collect_activity(db_path: &Path, target_date: NaiveDate) -> AiActivity {
    if !db_path.is_file() {
        return AiActivity::default();
    }
    match query_activity(db_path, target_date) {
        Ok(activity) => activity,
        Err(err) => {
            warn!(db = %db_path.display(), error = %err, "could not read AI tracking store");
            AiActivity::default()
        }
    }
}

fn query_activity(db_path: &Path, target_date: NaiveDate) -> Result<AiActivity> {
    let (start_ms, end_ms) = day_window_ms(target_date).context("compute day window")?;

    let conn = Connection::open(db_path).context("open AI tracking store")?;
    let mut stmt = conn
        .prepare(
            "SELECT hash, source, fileName, fileExtension, timestamp, conversationId
             FROM ai_code_hashes
             WHERE timestamp >= ?1 AND timestamp < ?2
             ORDER BY timestamp DESC",
        )
        .context("prepare AI tracking query")?;

    let rows = stmt.query_map([start_ms, end_ms], |row| {
        Ok(AiActivityRecord {
            hash: row.get(0)?,
            source: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            file: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            extension: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            timestamp_ms: row.get(4)?,
            conversation_id: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        })
    })?;

    let mut activity = AiActivity::default();
    for row in rows {
        let record = row?;
        if !record.file.is_empty() {
            activity.files_touched.insert(record.file.clone());
        }
        activity.code_generated.push(record);
    }
    Ok(activity)
}

/// `[startOfDay, startOfNextDay)` for the target date in the local
/// timezone, as epoch milliseconds. The store records wall-clock local
/// activity, so the window has to line up with local midnight or rows
/// near the edges land on the wrong day.
fn day_window_ms(date: NaiveDate) -> Option<(i64, i64)> {
    let start = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?
        .timestamp_millis();
    let end = Local
        .from_local_datetime(&date.succ_opt()?.and_hms_opt(0, 0, 0)?)
        .earliest()?
        .timestamp_millis();
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_store(path: &Path, rows: &[(&str, &str, &str, &str, i64, &str)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute(
            "CREATE TABLE ai_code_hashes (
                hash TEXT, source TEXT, fileName TEXT,
                fileExtension TEXT, timestamp INTEGER, conversationId TEXT
            )",
            [],
        )
        .unwrap();
        for &(hash, source, file, ext, ts, conv) in rows {
            conn.execute(
                "INSERT INTO ai_code_hashes VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (hash, source, file, ext, ts, conv),
            )
            .unwrap();
        }
    }

    #[test]
    fn selects_rows_inside_the_day_window_most_recent_first() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("tracking.db");
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let (start_ms, end_ms) = day_window_ms(date).unwrap();

        seed_store(
            &db,
            &[
                ("h1", "tab", "src/a.rs", "rs", start_ms + 1_000, "c1"),
                ("h2", "chat", "src/b.rs", "rs", end_ms - 1_000, "c2"),
                ("h3", "chat", "src/b.rs", "rs", start_ms + 2_000, "c2"),
                ("old", "tab", "src/z.rs", "rs", start_ms - 1, "c0"),
                ("next", "tab", "src/z.rs", "rs", end_ms, "c9"),
            ],
        );

        let activity = collect_activity(&db, date);
        assert_eq!(activity.code_generated.len(), 3);
        assert_eq!(activity.code_generated[0].hash, "h2");
        assert_eq!(activity.code_generated[2].hash, "h1");
        // Derived set holds distinct names only.
        assert_eq!(activity.files_touched.len(), 2);
        assert!(activity.files_touched.contains("src/a.rs"));
    }

    #[test]
    fn day_window_is_anchored_at_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let (start_ms, end_ms) = day_window_ms(date).unwrap();

        let local_midnight = Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            .earliest()
            .unwrap();
        assert_eq!(start_ms, local_midnight.timestamp_millis());
        assert_eq!(end_ms - start_ms, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn missing_store_degrades_to_empty() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let activity = collect_activity(Path::new("/nonexistent/tracking.db"), date);
        assert!(activity.is_empty());
    }

    #[test]
    fn malformed_store_degrades_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("tracking.db");
        let conn = Connection::open(&db).unwrap();
        conn.execute("CREATE TABLE unrelated (x TEXT)", []).unwrap();
        drop(conn);

        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let activity = collect_activity(&db, date);
        assert!(activity.is_empty());
    }

    #[test]
    fn null_columns_become_empty_strings() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("tracking.db");
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let (start_ms, _) = day_window_ms(date).unwrap();

        let conn = Connection::open(&db).unwrap();
        conn.execute(
            "CREATE TABLE ai_code_hashes (
                hash TEXT, source TEXT, fileName TEXT,
                fileExtension TEXT, timestamp INTEGER, conversationId TEXT
            )",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO ai_code_hashes VALUES ('h1', NULL, NULL, NULL, ?1, NULL)",
            [start_ms + 1],
        )
        .unwrap();
        drop(conn);

        let activity = collect_activity(&db, date);
        assert_eq!(activity.code_generated.len(), 1);
        assert_eq!(activity.code_generated[0].file, "");
        assert!(activity.files_touched.is_empty());
    }
}
