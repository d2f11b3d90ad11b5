use serde::Deserialize;

/// A single title as returned by the catalog, immutable after parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Movie {
    pub fn year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|date| date.get(..4))
    }
}

/// Wire shape of both list endpoints. Only the first page is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    pub results: Vec<Movie>,
}
