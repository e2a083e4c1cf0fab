use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::AppResult,
    middleware::AuthUser,
    models::{ArticleScore, ArticleScoreInput, ReadingTime, ReadingTimeInput},
};

pub async fn record_article_score(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<ArticleScoreInput>,
) -> AppResult<Json<ArticleScore>> {
    let score = state.engagement_service.record_score(user_id, input).await?;

    Ok(Json(score))
}

pub async fn record_reading_time(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<ReadingTimeInput>,
) -> AppResult<(StatusCode, Json<ReadingTime>)> {
    let reading_time = state
        .engagement_service
        .record_reading_time(user_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(reading_time)))
}
