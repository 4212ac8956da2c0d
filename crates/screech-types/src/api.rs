use serde::{Deserialize, Serialize};

// -- Users --

/// Missing fields decode as empty strings; the services treat empty as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub id: String,
    pub token: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    pub id: String,
    pub username: String,
}

/// Public view of a user. `token` is only populated in the creation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// -- Screeches --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateScreechRequest {
    pub token: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateScreechRequest {
    pub token: String,
    pub id: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScreechQuery {
    pub id: String,
}

/// Query string of `GET /screeches`. Every field is optional and `count` is
/// kept raw so that unparsable values fall back to the default page size.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListScreechesQuery {
    pub count: String,
    pub username: String,
    pub user_id: String,
    pub order: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicScreech {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub content: String,
}
