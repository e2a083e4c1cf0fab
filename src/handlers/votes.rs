use axum::{Json, extract::State};

use crate::{
    AppState,
    error::AppResult,
    middleware::AuthUser,
    models::{Vote, VoteInput},
};

/// Responds with the stored vote, or `null` once a zero vote has cleared it.
pub async fn cast_vote(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(input): Json<VoteInput>,
) -> AppResult<Json<Option<Vote>>> {
    let vote = state.vote_service.cast(user_id, input).await?;

    Ok(Json(vote))
}
