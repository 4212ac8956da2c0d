use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode, header},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use screech_types::api::{
    CreateScreechRequest, CreateUserRequest, ListScreechesQuery, PublicScreech, PublicUser,
    ScreechQuery, UpdateScreechRequest, UpdateUserRequest, UserQuery,
};

use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::{AppState, run_blocking, screeches, users};

/// 64 KB request body limit
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Build the service router: `/user`, `/screech` and `/screeches`, with
/// permissive CORS and a JSON content type on every response.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/user",
            get(get_user).post(create_user).put(update_user).options(options),
        )
        .route(
            "/screech",
            get(get_screech).post(create_screech).put(update_screech).options(options),
        )
        .route("/screeches", get(list_screeches).options(options))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn options() -> StatusCode {
    StatusCode::OK
}

// -- /user --

/// GET /user?id=&username=
async fn get_user(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = run_blocking(&state, move |db| users::get_user(db, query)).await?;
    Ok(Json(user))
}

/// POST /user — the response includes the new account's token.
async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = run_blocking(&state, move |db| users::create_user(db, req)).await?;
    Ok(Json(user))
}

/// PUT /user
async fn update_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = run_blocking(&state, move |db| users::update_user(db, req)).await?;
    Ok(Json(user))
}

// -- /screech --

async fn get_screech(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ScreechQuery>,
) -> Result<Json<PublicScreech>, ApiError> {
    let screech = run_blocking(&state, move |db| screeches::get_screech(db, query)).await?;
    Ok(Json(screech))
}

async fn create_screech(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateScreechRequest>,
) -> Result<Json<PublicScreech>, ApiError> {
    let screech = run_blocking(&state, move |db| screeches::create_screech(db, req)).await?;
    Ok(Json(screech))
}

async fn update_screech(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateScreechRequest>,
) -> Result<Json<PublicScreech>, ApiError> {
    let screech = run_blocking(&state, move |db| screeches::update_screech(db, req)).await?;
    Ok(Json(screech))
}

// -- /screeches --

async fn list_screeches(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListScreechesQuery>,
) -> Result<Json<Vec<PublicScreech>>, ApiError> {
    let list = run_blocking(&state, move |db| screeches::list_screeches(db, query)).await?;
    Ok(Json(list))
}
