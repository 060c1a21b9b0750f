use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, required for poster and trailer enrichment
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a movie's `poster_path`
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Poster served when a movie has none (or the lookup failed)
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,

    /// Directory holding `movie_list.json` and `similarity.json`
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,

    /// Timeout applied to each individual TMDB call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on enrichment tasks in flight for one request
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Number of recommendations returned when the caller gives no `k`
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Largest `k` a caller may ask for
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_placeholder_poster_url() -> String {
    "https://placehold.co/500x750/222/FFF?text=No+Poster".to_string()
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_max_concurrent_fetches() -> usize {
    5
}

fn default_recommendations() -> usize {
    5
}

fn default_max_recommendations() -> usize {
    50
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit `(NAME, value)` pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("Failed to load config: TMDB_API_KEY is empty");
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_when_only_api_key_set() {
        let vars = vec![("TMDB_API_KEY".to_string(), "secret".to_string())];
        let config = Config::from_vars(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog_dir, PathBuf::from("artifacts"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_concurrent_fetches, 5);
        assert_eq!(config.default_recommendations, 5);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![("PORT".to_string(), "8080".to_string())];
        let result = Config::from_vars(vars);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        for key in ["", "   "] {
            let vars = vec![("TMDB_API_KEY".to_string(), key.to_string())];
            let err = Config::from_vars(vars).unwrap_err();
            assert!(err.to_string().contains("TMDB_API_KEY"));
        }
    }

    #[test]
    fn test_overrides_are_parsed() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "k".to_string()),
            ("MAX_CONCURRENT_FETCHES".to_string(), "8".to_string()),
            ("CATALOG_DIR".to_string(), "/srv/catalog".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config = Config::from_vars(vars).unwrap();

        assert_eq!(config.max_concurrent_fetches, 8);
        assert_eq!(config.catalog_dir, PathBuf::from("/srv/catalog"));
        assert_eq!(config.port, 8080);
    }
}
