use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    error::AppResult,
    middleware::OptionalAuthUser,
    models::{ArticlesResponse, ListArticlesQuery},
};

pub async fn list_articles(
    State(state): State<AppState>,
    OptionalAuthUser(user_id): OptionalAuthUser,
    Query(query): Query<ListArticlesQuery>,
) -> AppResult<Json<ArticlesResponse>> {
    let response = state.article_service.list(user_id, query).await?;

    Ok(Json(response))
}
