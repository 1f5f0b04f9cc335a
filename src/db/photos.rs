use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Photo, PhotoListing};

pub fn create_photo(
    conn: &Connection,
    description: &str,
    keywords: &str,
    image_file: &str,
    user_id: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO photos (description, keywords, image_file, user_id) VALUES (?1, ?2, ?3, ?4)",
        params![description, keywords, image_file, user_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_photo(conn: &Connection, id: i64) -> rusqlite::Result<Option<Photo>> {
    conn.query_row(
        "SELECT id, description, keywords, image_file, user_id, created_at
         FROM photos WHERE id = ?1",
        params![id],
        |row| {
            Ok(Photo {
                id: row.get(0)?,
                description: row.get(1)?,
                keywords: row.get(2)?,
                image_file: row.get(3)?,
                user_id: row.get(4)?,
                created_at: row.get(5)?,
            })
        },
    )
    .optional()
}

pub fn list_photos(conn: &Connection) -> rusqlite::Result<Vec<PhotoListing>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.description, p.keywords, p.image_file, u.username
         FROM photos p JOIN users u ON u.id = p.user_id
         ORDER BY p.id",
    )?;
    let photos = stmt.query_map([], listing_from_row)?.collect();
    photos
}

/// Substring search over the keywords column. SQLite LIKE is
/// case-insensitive for ASCII; an empty keyword matches every photo.
pub fn search_photos(conn: &Connection, keyword: &str) -> rusqlite::Result<Vec<PhotoListing>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.description, p.keywords, p.image_file, u.username
         FROM photos p JOIN users u ON u.id = p.user_id
         WHERE p.keywords LIKE '%' || ?1 || '%'
         ORDER BY p.id",
    )?;
    let photos = stmt.query_map(params![keyword], listing_from_row)?.collect();
    photos
}

fn listing_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PhotoListing> {
    Ok(PhotoListing {
        id: row.get(0)?,
        description: row.get(1)?,
        keywords: row.get(2)?,
        image_file: row.get(3)?,
        owner: row.get(4)?,
    })
}
