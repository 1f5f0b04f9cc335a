use rusqlite::{params, Connection, OptionalExtension};

use super::models::{InboxMessage, Message};

pub fn create_message(
    conn: &Connection,
    content: &str,
    sender_id: i64,
    recipient_id: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO messages (content, sender_id, recipient_id) VALUES (?1, ?2, ?3)",
        params![content, sender_id, recipient_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_message(conn: &Connection, id: i64) -> rusqlite::Result<Option<Message>> {
    conn.query_row(
        "SELECT id, content, sender_id, recipient_id, created_at
         FROM messages WHERE id = ?1",
        params![id],
        |row| {
            Ok(Message {
                id: row.get(0)?,
                content: row.get(1)?,
                sender_id: row.get(2)?,
                recipient_id: row.get(3)?,
                created_at: row.get(4)?,
            })
        },
    )
    .optional()
}

/// Messages addressed to the given user, with sender usernames resolved.
pub fn inbox(conn: &Connection, recipient_id: i64) -> rusqlite::Result<Vec<InboxMessage>> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.content, u.username, m.created_at
         FROM messages m JOIN users u ON u.id = m.sender_id
         WHERE m.recipient_id = ?1
         ORDER BY m.id",
    )?;
    let messages = stmt
        .query_map(params![recipient_id], |row| {
            Ok(InboxMessage {
                id: row.get(0)?,
                content: row.get(1)?,
                sender: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect();
    messages
}

pub fn delete_message(conn: &Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM messages WHERE id = ?1", params![id])?;
    Ok(())
}
