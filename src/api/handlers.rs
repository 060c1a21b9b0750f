use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::catalog::load_catalog;
use crate::error::{AppError, AppResult};
use crate::models::{Movie, MovieId, Recommendation, RecommendationSet};
use crate::services::enrichment::trailer_search_url;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
    pub poster_url: String,
    pub trailer_url: Option<String>,
    /// Only set when no trailer was found
    pub trailer_search_url: Option<String>,
}

impl From<Recommendation> for RecommendedMovie {
    fn from(rec: Recommendation) -> Self {
        let trailer_search_url = match rec.enrichment.trailer_url {
            Some(_) => None,
            None => trailer_search_url(&rec.movie.title),
        };

        Self {
            movie_id: rec.movie.id,
            title: rec.movie.title,
            score: rec.score,
            poster_url: rec.enrichment.poster_url,
            trailer_url: rec.enrichment.trailer_url,
            trailer_search_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub source: Movie,
    pub recommendations: Vec<RecommendedMovie>,
    pub generated_at: DateTime<Utc>,
}

impl From<RecommendationSet> for RecommendationResponse {
    fn from(set: RecommendationSet) -> Self {
        Self {
            source: set.source,
            recommendations: set.recommendations.into_iter().map(Into::into).collect(),
            generated_at: set.generated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub count: usize,
    pub titles: Vec<Movie>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Every movie in the catalog, in catalog order
pub async fn list_titles(State(state): State<AppState>) -> Json<TitlesResponse> {
    let catalog = state.catalog().await;
    Json(TitlesResponse {
        count: catalog.len(),
        titles: catalog.movies().to_vec(),
    })
}

/// Movies similar to `title`, enriched with posters and trailers
pub async fn recommend(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    if query.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }

    let k = query.k.unwrap_or(state.settings.default_recommendations);
    if k > state.settings.max_recommendations {
        return Err(AppError::InvalidInput(format!(
            "k must be at most {}",
            state.settings.max_recommendations
        )));
    }

    let catalog = state.catalog().await;
    let set = state.engine.recommend(&catalog, &query.title, k).await?;

    Ok(Json(set.into()))
}

/// Reloads the catalog artifacts from disk
///
/// On failure the current catalog stays in service.
pub async fn reload_catalog(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let dir = state.settings.catalog_dir.clone();

    let catalog = load_catalog(dir.clone()).await.map_err(|e| {
        tracing::error!(error = %e, dir = %dir.display(), "Catalog reload failed");
        e
    })?;
    let movies = catalog.len();
    state.replace_catalog(catalog).await;

    tracing::info!(movies = movies, "Catalog reloaded");

    Ok(Json(json!({ "status": "reloaded", "movies": movies })))
}
