use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{EnrichmentResult, MovieId, TmdbVideo},
    services::providers::MetadataProvider,
};

/// Only videos hosted here are turned into trailer links
pub const TRAILER_SITE: &str = "YouTube";
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";
const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results";

/// Fetches poster and trailer links for a single movie
///
/// Every remote failure (non-2xx, timeout, network error, malformed payload)
/// degrades to the placeholder poster or a missing trailer, so
/// [`EnrichmentClient::fetch_one`] always produces a usable result.
#[derive(Clone)]
pub struct EnrichmentClient {
    provider: Arc<dyn MetadataProvider>,
    image_base_url: String,
    placeholder_poster_url: String,
    call_timeout: Duration,
}

impl EnrichmentClient {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        image_base_url: String,
        placeholder_poster_url: String,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            image_base_url,
            placeholder_poster_url,
            call_timeout,
        }
    }

    pub fn from_config(provider: Arc<dyn MetadataProvider>, config: &Config) -> Self {
        Self::new(
            provider,
            config.tmdb_image_base_url.clone(),
            config.placeholder_poster_url.clone(),
            config.request_timeout(),
        )
    }

    /// Result used when nothing at all could be fetched
    pub fn placeholder(&self) -> EnrichmentResult {
        EnrichmentResult::placeholder(&self.placeholder_poster_url)
    }

    /// Details first, then videos
    ///
    /// A non-2xx or unparsable details response still goes on to the videos
    /// call. If the details call never got an answer (timeout or transport
    /// failure) the movie gets the placeholder result and no videos call is
    /// made.
    #[tracing::instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch_one(&self, movie_id: MovieId) -> EnrichmentResult {
        let poster_url = match self
            .guarded(movie_id, "details", self.provider.fetch_poster_path(movie_id))
            .await
        {
            Ok(Some(path)) => self.poster_url(&path),
            Ok(None) => self.placeholder_poster_url.clone(),
            Err(e) if e.is_transport() => return self.placeholder(),
            Err(_) => self.placeholder_poster_url.clone(),
        };

        let trailer_url = self
            .guarded(movie_id, "videos", self.provider.fetch_videos(movie_id))
            .await
            .ok()
            .and_then(|videos| select_trailer(&videos));

        EnrichmentResult {
            poster_url,
            trailer_url,
        }
    }

    /// Applies the per-call timeout and logs any failure
    async fn guarded<T>(
        &self,
        movie_id: MovieId,
        call: &'static str,
        request: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let error = match tokio::time::timeout(self.call_timeout, request).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e,
            Err(_) => AppError::Timeout(self.call_timeout),
        };

        tracing::warn!(
            movie_id = movie_id,
            call = call,
            error = %error,
            "Enrichment call failed, using fallback"
        );
        Err(error)
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }
}

/// Picks the trailer link from a movie's videos
///
/// Among videos on [`TRAILER_SITE`], the first "Trailer" wins, then the first
/// "Teaser", then the first video of any type. Entries without a key are
/// never selected.
pub fn select_trailer(videos: &[TmdbVideo]) -> Option<String> {
    let candidates: Vec<&TmdbVideo> = videos
        .iter()
        .filter(|video| video.is_on(TRAILER_SITE))
        .filter(|video| video.key.as_deref().is_some_and(|key| !key.is_empty()))
        .collect();

    candidates
        .iter()
        .find(|video| video.has_type("Trailer"))
        .or_else(|| candidates.iter().find(|video| video.has_type("Teaser")))
        .or_else(|| candidates.first())
        .and_then(|video| video.key.as_deref())
        .and_then(watch_url)
}

fn watch_url(key: &str) -> Option<String> {
    Url::parse_with_params(YOUTUBE_WATCH_URL, &[("v", key)])
        .map(String::from)
        .ok()
}

/// Search link offered when a movie has no trailer
pub fn trailer_search_url(title: &str) -> Option<String> {
    let query = format!("{} official trailer", title);
    Url::parse_with_params(YOUTUBE_SEARCH_URL, &[("search_query", query.as_str())])
        .map(String::from)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockMetadataProvider;

    const PLACEHOLDER: &str = "https://placehold.co/500x750/222/FFF?text=No+Poster";

    fn video(site: &str, video_type: &str, key: &str) -> TmdbVideo {
        TmdbVideo {
            site: Some(site.to_string()),
            video_type: Some(video_type.to_string()),
            key: Some(key.to_string()),
        }
    }

    fn client(provider: MockMetadataProvider) -> EnrichmentClient {
        EnrichmentClient::new(
            Arc::new(provider),
            "https://image.tmdb.org/t/p/w500".to_string(),
            PLACEHOLDER.to_string(),
            Duration::from_secs(5),
        )
    }

    fn mock_provider() -> MockMetadataProvider {
        let mut provider = MockMetadataProvider::new();
        provider.expect_name().return_const("mock");
        provider
    }

    #[test]
    fn test_select_trailer_prefers_trailer_over_teaser() {
        let videos = vec![
            video("YouTube", "Teaser", "teaser"),
            video("YouTube", "Trailer", "trailer"),
        ];
        assert_eq!(
            select_trailer(&videos),
            Some("https://www.youtube.com/watch?v=trailer".to_string())
        );
    }

    #[test]
    fn test_select_trailer_falls_back_to_teaser() {
        let videos = vec![
            video("YouTube", "Featurette", "featurette"),
            video("YouTube", "Teaser", "teaser"),
            video("Vimeo", "Trailer", "vimeo"),
        ];
        assert_eq!(
            select_trailer(&videos),
            Some("https://www.youtube.com/watch?v=teaser".to_string())
        );
    }

    #[test]
    fn test_select_trailer_falls_back_to_any_site_video() {
        let videos = vec![
            video("Vimeo", "Trailer", "vimeo"),
            video("YouTube", "Clip", "clip"),
            video("YouTube", "Featurette", "featurette"),
        ];
        assert_eq!(
            select_trailer(&videos),
            Some("https://www.youtube.com/watch?v=clip".to_string())
        );
    }

    #[test]
    fn test_select_trailer_first_match_within_tier() {
        let videos = vec![
            video("YouTube", "Trailer", "first"),
            video("YouTube", "Trailer", "second"),
        ];
        assert_eq!(
            select_trailer(&videos),
            Some("https://www.youtube.com/watch?v=first".to_string())
        );
    }

    #[test]
    fn test_select_trailer_none_on_other_sites() {
        let videos = vec![video("Vimeo", "Trailer", "vimeo")];
        assert_eq!(select_trailer(&videos), None);
        assert_eq!(select_trailer(&[]), None);
    }

    #[test]
    fn test_select_trailer_skips_entries_without_key() {
        let videos = vec![
            TmdbVideo {
                site: Some("YouTube".to_string()),
                video_type: Some("Trailer".to_string()),
                key: None,
            },
            video("YouTube", "Teaser", "teaser"),
        ];
        assert_eq!(
            select_trailer(&videos),
            Some("https://www.youtube.com/watch?v=teaser".to_string())
        );
    }

    #[test]
    fn test_trailer_search_url_encodes_title() {
        let url = trailer_search_url("Pirates of the Caribbean: At World's End").unwrap();
        assert!(url.starts_with("https://www.youtube.com/results?search_query="));
        assert!(url.contains("official+trailer"));
        assert!(!url.contains(' '));
    }

    #[tokio::test]
    async fn test_fetch_one_success() {
        let mut provider = mock_provider();
        provider
            .expect_fetch_poster_path()
            .returning(|_| Ok(Some("/poster.jpg".to_string())));
        provider
            .expect_fetch_videos()
            .returning(|_| Ok(vec![video("YouTube", "Trailer", "abc123")]));

        let result = client(provider).fetch_one(550).await;

        assert_eq!(result.poster_url, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(
            result.trailer_url,
            Some("https://www.youtube.com/watch?v=abc123".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_one_missing_poster_uses_placeholder() {
        let mut provider = mock_provider();
        provider.expect_fetch_poster_path().returning(|_| Ok(None));
        provider.expect_fetch_videos().returning(|_| Ok(vec![]));

        let result = client(provider).fetch_one(550).await;

        assert_eq!(result.poster_url, PLACEHOLDER);
        assert_eq!(result.trailer_url, None);
    }

    #[tokio::test]
    async fn test_fetch_one_details_failure_keeps_trailer() {
        let mut provider = mock_provider();
        provider
            .expect_fetch_poster_path()
            .returning(|_| Err(AppError::ExternalApi("status 500".to_string())));
        provider
            .expect_fetch_videos()
            .returning(|_| Ok(vec![video("YouTube", "Teaser", "tease")]));

        let result = client(provider).fetch_one(550).await;

        assert_eq!(result.poster_url, PLACEHOLDER);
        assert_eq!(
            result.trailer_url,
            Some("https://www.youtube.com/watch?v=tease".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_one_videos_failure_keeps_poster() {
        let mut provider = mock_provider();
        provider
            .expect_fetch_poster_path()
            .returning(|_| Ok(Some("/p.jpg".to_string())));
        provider
            .expect_fetch_videos()
            .returning(|_| Err(AppError::ExternalApi("status 404".to_string())));

        let result = client(provider).fetch_one(550).await;

        assert_eq!(result.poster_url, "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(result.trailer_url, None);
    }

    #[tokio::test]
    async fn test_fetch_one_details_transport_failure_skips_videos() {
        let mut provider = mock_provider();
        provider
            .expect_fetch_poster_path()
            .returning(|_| Err(AppError::Timeout(Duration::from_secs(5))));
        provider.expect_fetch_videos().never();

        let result = client(provider).fetch_one(550).await;

        assert_eq!(result, EnrichmentResult::placeholder(PLACEHOLDER));
    }

    /// Details never answer; videos answer immediately
    struct SlowDetailsProvider;

    #[async_trait::async_trait]
    impl MetadataProvider for SlowDetailsProvider {
        async fn fetch_poster_path(&self, _movie_id: MovieId) -> AppResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Some("/late.jpg".to_string()))
        }

        async fn fetch_videos(&self, _movie_id: MovieId) -> AppResult<Vec<TmdbVideo>> {
            Ok(vec![video("YouTube", "Trailer", "quick")])
        }

        fn name(&self) -> &'static str {
            "slow-details"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_one_details_timeout_has_no_trailer() {
        let client = EnrichmentClient::new(
            Arc::new(SlowDetailsProvider),
            "https://image.tmdb.org/t/p/w500".to_string(),
            PLACEHOLDER.to_string(),
            Duration::from_secs(5),
        );

        let result = client.fetch_one(1).await;

        assert_eq!(result.poster_url, PLACEHOLDER);
        assert_eq!(result.trailer_url, None);
    }

    struct SlowProvider;

    #[async_trait::async_trait]
    impl MetadataProvider for SlowProvider {
        async fn fetch_poster_path(&self, _movie_id: MovieId) -> AppResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Some("/late.jpg".to_string()))
        }

        async fn fetch_videos(&self, _movie_id: MovieId) -> AppResult<Vec<TmdbVideo>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![video("YouTube", "Trailer", "late")])
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_one_timeout_degrades() {
        let client = EnrichmentClient::new(
            Arc::new(SlowProvider),
            "https://image.tmdb.org/t/p/w500".to_string(),
            PLACEHOLDER.to_string(),
            Duration::from_secs(5),
        );

        let result = client.fetch_one(1).await;
        assert_eq!(result, EnrichmentResult::placeholder(PLACEHOLDER));
    }
}
