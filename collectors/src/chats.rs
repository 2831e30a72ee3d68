use journal_types::ChatProbe;
use rusqlite::Connection;
use std::path::Path;

const STORE_FILE: &str = "store.db";

/// Probe per-session chat stores for the presence of conversational data.
/// Layout is `chats_dir/<group>/<session>/store.db`; a session counts as
/// having data when any of its table names looks message-like. This is
/// deliberately shallow: it signals that context exists without coupling
/// to the store's evolving message schema. Every per-session failure is
/// swallowed and the scan continues.
pub fn probe_chat_sessions(chats_dir: &Path) -> Vec<ChatProbe> {
    let groups = match std::fs::read_dir(chats_dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut probes = Vec::new();
    for group in groups.flatten() {
        let group_path = group.path();
        if !group_path.is_dir() {
            continue;
        }
        let sessions = match std::fs::read_dir(&group_path) {
            Ok(e) => e,
            Err(_) => continue,
        };
        for session in sessions.flatten() {
            let db_path = session.path().join(STORE_FILE);
            if !db_path.is_file() {
                continue;
            }
            if store_has_conversation(&db_path) {
                probes.push(ChatProbe {
                    session: session.file_name().to_string_lossy().into_owned(),
                    has_data: true,
                });
            }
        }
    }

    probes.sort_by(|a, b| a.session.cmp(&b.session));
    probes
}

/// Capability check: does this store contain a message-like table?
/// Table-name scanning is the one replaceable heuristic here; a stricter
/// schema would become an alternate probe, not a rewrite of callers.
fn store_has_conversation(db_path: &Path) -> bool {
    let Ok(conn) = Connection::open(db_path) else {
        return false;
    };
    let Ok(mut stmt) = conn.prepare("SELECT name FROM sqlite_master WHERE type='table'") else {
        return false;
    };
    let Ok(rows) = stmt.query_map([], |row| row.get::<_, String>(0)) else {
        return false;
    };

    let found = rows.flatten().any(|table| {
        let lower = table.to_lowercase();
        lower.contains("message") || lower.contains("chat")
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn mk_store(dir: &Path, tables: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        let conn = Connection::open(dir.join(STORE_FILE)).unwrap();
        for table in tables {
            conn.execute(&format!("CREATE TABLE {table} (id INTEGER)"), [])
                .unwrap();
        }
    }

    #[test]
    fn flags_sessions_with_message_like_tables() {
        let tmp = tempfile::tempdir().unwrap();
        mk_store(&tmp.path().join("composer/session-a"), &["Messages", "meta"]);
        mk_store(&tmp.path().join("composer/session-b"), &["kv_store"]);
        mk_store(&tmp.path().join("agent/session-c"), &["chat_turns"]);

        let probes = probe_chat_sessions(tmp.path());
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].session, "session-a");
        assert_eq!(probes[1].session, "session-c");
        assert!(probes.iter().all(|p| p.has_data));
    }

    #[test]
    fn corrupt_store_is_skipped_and_scan_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("composer/session-bad");
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join(STORE_FILE), b"not a sqlite file").unwrap();
        mk_store(&tmp.path().join("composer/session-ok"), &["messages"]);

        let probes = probe_chat_sessions(tmp.path());
        assert_eq!(probes.len(), 1);
        assert_eq!(probes[0].session, "session-ok");
    }

    #[test]
    fn missing_chats_dir_yields_empty() {
        assert!(probe_chat_sessions(Path::new("/nonexistent/chats")).is_empty());
    }
}
