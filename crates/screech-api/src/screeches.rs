use tracing::warn;

use screech_db::Database;
use screech_db::models::{ScreechRow, SortOrder};
use screech_types::api::{
    CreateScreechRequest, ListScreechesQuery, PublicScreech, ScreechQuery, UpdateScreechRequest,
};
use screech_types::ids::new_id;

use crate::error::ApiError;
use crate::{any_empty, non_empty};

pub const MAX_CONTENT_CHARS: usize = 1024;
pub const DEFAULT_COUNT: u32 = 50;
pub const MAX_COUNT: u32 = 500;

pub fn create_screech(db: &Database, req: CreateScreechRequest) -> Result<PublicScreech, ApiError> {
    let token = req.token.trim();
    let content = req.content.trim();

    if any_empty(&[token, content]) || too_long(content) {
        return Err(ApiError::InvalidInput);
    }

    let owner = db.get_user_by_token(token)?.ok_or(ApiError::NotFound)?;
    let row = db.insert_screech(&new_id(), &owner, content)?;

    Ok(PublicScreech {
        id: row.public_id,
        username: None,
        content: row.content,
    })
}

/// Replace a screech's content. Only the owner's token may do this.
pub fn update_screech(db: &Database, req: UpdateScreechRequest) -> Result<PublicScreech, ApiError> {
    let token = req.token.trim();
    let id = req.id.trim();
    let content = req.content.trim();

    if any_empty(&[token, id, content]) || too_long(content) {
        return Err(ApiError::InvalidInput);
    }

    let mut row = db.get_screech_by_public_id(id)?.ok_or(ApiError::NotFound)?;

    if row.owner_token != token {
        warn!("Rejected update of screech {}: token mismatch", id);
        return Err(ApiError::Unauthorized);
    }

    if row.content != content {
        db.update_screech_content(&mut row, content)?;
    }

    Ok(PublicScreech {
        id: row.public_id,
        username: None,
        content: row.content,
    })
}

pub fn get_screech(db: &Database, query: ScreechQuery) -> Result<PublicScreech, ApiError> {
    let id = query.id.trim();
    if id.is_empty() {
        return Err(ApiError::InvalidInput);
    }

    let row = db.get_screech_by_public_id(id)?.ok_or(ApiError::NotFound)?;
    Ok(public_screech(row))
}

/// List screeches newest-first (or oldest-first with `order=asc`), optionally
/// restricted to the user matching `username` and/or `user_id`.
pub fn list_screeches(db: &Database, query: ListScreechesQuery) -> Result<Vec<PublicScreech>, ApiError> {
    let username = query.username.trim();
    let user_id = query.user_id.trim();

    let owner = if username.is_empty() && user_id.is_empty() {
        None
    } else {
        let user = db
            .find_user(non_empty(user_id), non_empty(username))?
            .ok_or(ApiError::NotFound)?;
        Some(user.id)
    };

    let rows = db.list_screeches(owner, parse_order(&query.order), parse_count(&query.count))?;

    Ok(rows.into_iter().map(public_screech).collect())
}

/// Page size: unparsable or < 1 falls back to `DEFAULT_COUNT`, capped at `MAX_COUNT`.
pub fn parse_count(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => n.min(MAX_COUNT as i64) as u32,
        _ => DEFAULT_COUNT,
    }
}

/// ASCII case folding only: `asc` in any mix of case selects ascending.
pub fn parse_order(raw: &str) -> SortOrder {
    if raw.eq_ignore_ascii_case("asc") {
        SortOrder::Asc
    } else {
        SortOrder::Desc
    }
}

fn too_long(content: &str) -> bool {
    content.chars().count() > MAX_CONTENT_CHARS
}

fn public_screech(row: ScreechRow) -> PublicScreech {
    PublicScreech {
        id: row.public_id,
        username: Some(row.username),
        content: row.content,
    }
}
