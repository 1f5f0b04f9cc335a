use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub description: String,
    pub keywords: String,
    pub image_file: String,
    pub user_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub created_at: String,
}

/// Photo joined with its owner's username, for listing pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoListing {
    pub id: i64,
    pub description: String,
    pub keywords: String,
    pub image_file: String,
    pub owner: String,
}

/// Message joined with the sender's username, for the inbox page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id: i64,
    pub content: String,
    pub sender: String,
    pub created_at: String,
}
