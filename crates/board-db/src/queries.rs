use crate::Database;
use crate::models::MessageRow;
use anyhow::Result;
use rusqlite::{OptionalExtension, Row};

/// SQLite's datetime text layout, with microseconds so that back-to-back
/// writes still produce ordered, distinguishable timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const MESSAGE_COLUMNS: &str = "id, body, username, created_at, updated_at";

impl Database {
    // -- Messages --

    /// All messages, oldest first. Rows sharing a `created_at` keep insertion order.
    pub fn list_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY created_at ASC, id ASC"
            ))?;

            let rows = stmt
                .query_map([], map_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
                    [id],
                    map_message,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Inserts a message with `created_at == updated_at == now` and returns the
    /// stored row, including its generated id.
    pub fn insert_message(&self, body: &str, username: &str) -> Result<MessageRow> {
        let now = now_timestamp();
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO messages (body, username, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)
                     RETURNING {MESSAGE_COLUMNS}"
                ),
                rusqlite::params![body, username, now],
                map_message,
            )?;
            Ok(row)
        })
    }

    /// Replaces the body when one is given and always refreshes `updated_at`.
    /// Returns `None` if no message has this id.
    pub fn update_message(&self, id: i64, body: Option<&str>) -> Result<Option<MessageRow>> {
        let now = now_timestamp();
        self.with_conn_mut(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "UPDATE messages
                         SET body = COALESCE(?2, body), updated_at = ?3
                         WHERE id = ?1
                         RETURNING {MESSAGE_COLUMNS}"
                    ),
                    rusqlite::params![id, body, now],
                    map_message,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Returns `false` if no message has this id.
    pub fn delete_message(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn map_message(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        body: row.get(1)?,
        username: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(db: &Database) -> i64 {
        db.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?))
            .unwrap()
    }

    #[test]
    fn insert_then_get() {
        let db = Database::open_in_memory().unwrap();
        let created = db.insert_message("hi", "alice").unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.body, "hi");
        assert_eq!(created.username, "alice");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = db.get_message(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn get_missing_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_message(42).unwrap().is_none());
    }

    #[test]
    fn list_is_ordered_by_creation() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_messages().unwrap().is_empty());

        for i in 0..5 {
            db.insert_message(&format!("m{i}"), "bob").unwrap();
        }

        let rows = db.list_messages().unwrap();
        assert_eq!(rows.len(), 5);
        for pair in rows.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
        let bodies: Vec<_> = rows.iter().map(|r| r.body.as_str()).collect();
        assert_eq!(bodies, ["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn list_breaks_timestamp_ties_by_id() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn_mut(|conn| {
            conn.execute_batch(
                "INSERT INTO messages (body, username, created_at, updated_at) VALUES
                    ('first', 'a', '2024-01-01 00:00:00.000000', '2024-01-01 00:00:00.000000'),
                    ('second', 'b', '2024-01-01 00:00:00.000000', '2024-01-01 00:00:00.000000'),
                    ('earliest', 'c', '2023-12-31 23:59:59.000000', '2023-12-31 23:59:59.000000');",
            )?;
            Ok(())
        })
        .unwrap();

        let bodies: Vec<_> = db.list_messages().unwrap().into_iter().map(|r| r.body).collect();
        assert_eq!(bodies, ["earliest", "first", "second"]);
    }

    #[test]
    fn update_replaces_body_and_refreshes_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let original = db.insert_message("hi", "alice").unwrap();

        let updated = db.update_message(original.id, Some("hello")).unwrap().unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.body, "hello");
        assert_eq!(updated.username, original.username);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[test]
    fn update_without_body_only_touches_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let original = db.insert_message("hi", "alice").unwrap();

        let updated = db.update_message(original.id, None).unwrap().unwrap();
        assert_eq!(updated.body, "hi");
        assert!(updated.updated_at >= original.updated_at);
    }

    #[test]
    fn update_missing_creates_nothing() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.update_message(7, Some("ghost")).unwrap().is_none());
        assert_eq!(count(&db), 0);
    }

    #[test]
    fn delete_removes_row() {
        let db = Database::open_in_memory().unwrap();
        let row = db.insert_message("bye", "carol").unwrap();

        assert!(db.delete_message(row.id).unwrap());
        assert!(db.get_message(row.id).unwrap().is_none());
        assert!(!db.delete_message(row.id).unwrap());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_message("one", "dave").unwrap();
        db.delete_message(first.id).unwrap();

        let second = db.insert_message("two", "dave").unwrap();
        assert!(second.id > first.id);
    }
}
