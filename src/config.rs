pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl TmdbConfig {
    /// Resolved once at startup. A missing `TMDB_API_KEY` is not fatal here,
    /// every fetch reports it as a configuration error instead.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("TMDB_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            base_url: var_or("TMDB_BASE_URL", DEFAULT_BASE_URL),
            image_base_url: var_or("TMDB_IMAGE_BASE_URL", DEFAULT_IMAGE_BASE_URL),
            language: var_or("TMDB_LANGUAGE", DEFAULT_LANGUAGE),
        }
    }

    /// Display URL for a poster path as returned by the API, e.g. `/abc.jpg`.
    pub fn poster_url(&self, poster_path: Option<&str>) -> Option<String> {
        poster_path.map(|path| {
            format!("{}{}", self.image_base_url.trim_end_matches('/'), path)
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
