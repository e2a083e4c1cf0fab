use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState, error::AppResult, feeds::ReadableArticle, middleware::AuthUser,
    models::ArticleContentQuery,
};

pub async fn article_content(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<ArticleContentQuery>,
) -> AppResult<Json<ReadableArticle>> {
    let article = state.content_service.read(query.url.as_deref()).await?;

    Ok(Json(article))
}
