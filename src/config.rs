use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file holding the movie catalog
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// JSON file holding the music catalog
    #[serde(default = "default_music_path")]
    pub music_path: String,

    /// Ranked list length when a request does not ask for one
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Largest `top_k` a request may ask for
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// tracing-subscriber filter used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_movies_path() -> String {
    "data/movies.json".to_string()
}

fn default_music_path() -> String {
    "data/music.json".to_string()
}

fn default_top_k() -> usize {
    crate::services::DEFAULT_TOP_K
}

fn default_max_top_k() -> usize {
    500
}

fn default_log_filter() -> String {
    "media_recs=info,tower_http=info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            movies_path: default_movies_path(),
            music_path: default_music_path(),
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_k == 0 || self.default_top_k > self.max_top_k {
            anyhow::bail!(
                "DEFAULT_TOP_K must be between 1 and MAX_TOP_K ({}), got {}",
                self.max_top_k,
                self.default_top_k
            );
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_top_k, 50);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_iter_overrides() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("MUSIC_PATH".to_string(), "/srv/music.json".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.music_path, "/srv/music.json");
        assert_eq!(config.movies_path, "data/movies.json");
    }

    #[test]
    fn test_validate_rejects_oversized_default() {
        let config = Config {
            default_top_k: 1000,
            max_top_k: 10,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
