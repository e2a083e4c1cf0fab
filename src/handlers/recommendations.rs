use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    middleware::AuthUser,
    models::{RecommendationsResponse, RecommendedQuery},
};

pub async fn recommended_articles(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<RecommendedQuery>,
) -> Json<RecommendationsResponse> {
    let recommendations = state
        .recommendation_service
        .recommend(user_id, query.include_external, query.sort_order)
        .await;

    Json(recommendations.into())
}
