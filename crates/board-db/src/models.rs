/// Database row types — these map directly to SQLite rows.
/// Distinct from board-types API models to keep the DB layer independent.

#[derive(Debug, Clone, PartialEq)]
pub struct MessageRow {
    pub id: i64,
    pub body: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}
