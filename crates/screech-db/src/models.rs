//! Database row types. These map directly to SQLite rows and carry the
//! internal integer keys; the API layer maps them to public DTOs.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub public_id: String,
    pub token: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when inserting a user.
pub struct NewUser<'a> {
    pub public_id: &'a str,
    pub token: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub image_url: &'a str,
}

/// A screech joined with the owning user's username and token.
#[derive(Debug, Clone)]
pub struct ScreechRow {
    pub id: i64,
    pub public_id: String,
    pub user_id: i64,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub username: String,
    pub owner_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}
