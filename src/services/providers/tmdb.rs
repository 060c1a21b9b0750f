/// TMDB (The Movie Database) v3 provider
///
/// API Flow:
/// 1. Details: /movie/{id} → `poster_path`
/// 2. Videos: /movie/{id}/videos → `results[]` with `site`, `type`, `key`
///
/// Both endpoints authenticate with the `api_key` query parameter.
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, TmdbMovieDetails, TmdbVideo},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(
                error = %e,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    /// Treats an empty `poster_path` the same as a missing one
    fn poster_path(details: TmdbMovieDetails) -> Option<String> {
        details.poster_path.filter(|path| !path.trim().is_empty())
    }

    /// Extracts the `results` array, skipping entries that do not look like videos
    fn parse_videos(payload: &serde_json::Value) -> Vec<TmdbVideo> {
        let Some(results) = payload["results"].as_array() else {
            return Vec::new();
        };

        results
            .iter()
            .filter_map(|result| serde_json::from_value::<TmdbVideo>(result.clone()).ok())
            .collect()
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_poster_path(&self, movie_id: MovieId) -> AppResult<Option<String>> {
        let details: TmdbMovieDetails = self.get_json(&format!("/movie/{}", movie_id)).await?;
        let poster_path = Self::poster_path(details);

        tracing::debug!(
            movie_id = movie_id,
            has_poster = poster_path.is_some(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(poster_path)
    }

    async fn fetch_videos(&self, movie_id: MovieId) -> AppResult<Vec<TmdbVideo>> {
        let payload: serde_json::Value = self
            .get_json(&format!("/movie/{}/videos", movie_id))
            .await?;
        let videos = Self::parse_videos(&payload);

        tracing::debug!(
            movie_id = movie_id,
            videos = videos.len(),
            provider = "tmdb",
            "Movie videos fetched"
        );

        Ok(videos)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
