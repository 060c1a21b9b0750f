use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// TMDB movie identifier, as stored in the catalog artifact
pub type MovieId = u64;

/// A movie from the precomputed catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(rename = "movie_id")]
    pub id: MovieId,
    pub title: String,
}

/// Poster and trailer links attached to a recommended movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentResult {
    /// Always set; falls back to the placeholder poster
    pub poster_url: String,
    pub trailer_url: Option<String>,
}

impl EnrichmentResult {
    /// Result used when nothing could be fetched for a movie
    pub fn placeholder(placeholder_poster_url: &str) -> Self {
        Self {
            poster_url: placeholder_poster_url.to_string(),
            trailer_url: None,
        }
    }
}

/// One ranked neighbor of the selected movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub score: f64,
    pub enrichment: EnrichmentResult,
}

/// Recommendations for a selected movie, most similar first
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSet {
    pub source: Movie,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

impl RecommendationSet {
    pub fn movie_ids(&self) -> Vec<MovieId> {
        self.recommendations.iter().map(|r| r.movie.id).collect()
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of `GET /movie/{id}` that we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Entry of the `results` array from `GET /movie/{id}/videos`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TmdbVideo {
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default, rename = "type")]
    pub video_type: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl TmdbVideo {
    pub fn is_on(&self, site: &str) -> bool {
        self.site.as_deref() == Some(site)
    }

    pub fn has_type(&self, video_type: &str) -> bool {
        self.video_type.as_deref() == Some(video_type)
    }
}
