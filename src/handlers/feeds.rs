use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppResult,
    middleware::AuthUser,
    models::{CreateFeedInput, CreatedFeedResponse, FeedResponse, FeedsResponse, UpdateFeedInput},
};

pub async fn create_feed(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<CreateFeedInput>,
) -> AppResult<(StatusCode, Json<CreatedFeedResponse>)> {
    let response = state.feed_service.add(user_id, input).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_feeds(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<FeedsResponse>> {
    Ok(Json(state.feed_service.list(user_id).await?))
}

pub async fn update_feed(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(feed_id): Path<i32>,
    Json(input): Json<UpdateFeedInput>,
) -> AppResult<Json<FeedResponse>> {
    let response = state.feed_service.update(user_id, feed_id, input).await?;

    Ok(Json(response))
}

pub async fn delete_feed(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(feed_id): Path<i32>,
) -> AppResult<StatusCode> {
    state.feed_service.delete(user_id, feed_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
