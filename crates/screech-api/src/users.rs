use tracing::{info, warn};

use screech_db::Database;
use screech_db::models::{NewUser, UserRow};
use screech_types::api::{CreateUserRequest, PublicUser, UpdateUserRequest, UserQuery};
use screech_types::ids::new_id;

use crate::error::ApiError;
use crate::{any_empty, non_empty};

/// Register a new user. The returned view is the only one that carries the token.
pub fn create_user(db: &Database, req: CreateUserRequest) -> Result<PublicUser, ApiError> {
    let username = req.username.trim();
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    let image_url = req.image_url.trim();

    if any_empty(&[username, first_name, last_name]) {
        return Err(ApiError::InvalidInput);
    }

    if db.get_user_by_username(username)?.is_some() {
        return Err(ApiError::Conflict);
    }

    let token = new_id();
    let public_id = new_id();

    let row = db
        .create_user(&NewUser {
            public_id: &public_id,
            token: &token,
            username,
            first_name,
            last_name,
            image_url,
        })
        .map_err(ApiError::from_write)?;

    info!("Created user {} ({})", row.username, row.public_id);

    let mut user = public_user(row);
    user.token = Some(token);
    Ok(user)
}

/// Fetch a user by public id, username, or both (both must then match).
pub fn get_user(db: &Database, query: UserQuery) -> Result<PublicUser, ApiError> {
    let id = query.id.trim();
    let username = query.username.trim();

    if id.is_empty() && username.is_empty() {
        return Err(ApiError::InvalidInput);
    }

    let row = db
        .find_user(non_empty(id), non_empty(username))?
        .ok_or(ApiError::NotFound)?;

    Ok(public_user(row))
}

/// Overwrite profile fields with every non-empty value in `req`. Empty
/// values mean "leave unchanged"; nothing is written if no field differs.
pub fn update_user(db: &Database, req: UpdateUserRequest) -> Result<PublicUser, ApiError> {
    let id = req.id.trim();
    let token = req.token.trim();

    if id.is_empty() {
        return Err(ApiError::InvalidInput);
    }

    let mut row = db.get_user_by_public_id(id)?.ok_or(ApiError::Unauthorized)?;

    if token.is_empty() || row.token != token {
        warn!("Rejected update of user {}: token mismatch", id);
        return Err(ApiError::Unauthorized);
    }

    let changed = apply(&mut row.username, req.username.trim())
        | apply(&mut row.first_name, req.first_name.trim())
        | apply(&mut row.last_name, req.last_name.trim())
        | apply(&mut row.image_url, req.image_url.trim());

    if changed {
        db.update_user(&mut row).map_err(ApiError::from_write)?;
    }

    Ok(public_user(row))
}

/// Replace `field` with a non-empty `value`. Returns whether it changed.
fn apply(field: &mut String, value: &str) -> bool {
    if value.is_empty() || field.as_str() == value {
        return false;
    }
    *field = value.to_string();
    true
}

fn public_user(row: UserRow) -> PublicUser {
    PublicUser {
        id: row.public_id,
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        image_url: row.image_url,
        token: None,
    }
}
