use rusqlite::{params, Connection, OptionalExtension};

use super::models::User;

/// Insert a new user and return its generated id.
/// Fails with a constraint violation if the username or email is taken.
pub fn create_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
        params![username, email, password_hash],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?1",
        params![email],
        user_from_row,
    )
    .optional()
}

pub fn username_exists(conn: &Connection, username: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )
}

pub fn email_exists(conn: &Connection, email: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )
}

pub fn list_users(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password_hash, created_at FROM users ORDER BY id",
    )?;
    let users = stmt.query_map([], user_from_row)?.collect();
    users
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn create_and_find_by_email() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let id = create_user(&conn, "alice", "a@x.com", "hash").unwrap();

        let user = find_by_email(&conn, "a@x.com").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "hash");

        assert!(find_by_email(&conn, "nobody@x.com").unwrap().is_none());
    }

    #[test]
    fn existence_checks() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        create_user(&conn, "alice", "a@x.com", "hash").unwrap();

        assert!(username_exists(&conn, "alice").unwrap());
        assert!(!username_exists(&conn, "bob").unwrap());
        assert!(email_exists(&conn, "a@x.com").unwrap());
        assert!(!email_exists(&conn, "b@x.com").unwrap());
    }

    #[test]
    fn list_users_returns_all_in_id_order() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        create_user(&conn, "alice", "a@x.com", "h1").unwrap();
        create_user(&conn, "bob", "b@x.com", "h2").unwrap();

        let users = list_users(&conn).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[1].username, "bob");
    }

    #[test]
    fn duplicate_username_rejected_by_store() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        create_user(&conn, "alice", "a@x.com", "h").unwrap();

        let err = create_user(&conn, "alice", "b@x.com", "h").unwrap_err();
        assert!(crate::db::is_unique_violation(&err));
    }
}
