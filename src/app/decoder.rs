use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::app::error::ParseError;
use crate::app::movie::Movie;

const RESULTS_FIELD: &str = "results";

/// One element of the `results` array as TMDB sends it.
///
/// `id` and `title` are required; everything else is read leniently so that a
/// single odd value does not cost the whole page.
#[derive(Debug, Deserialize)]
struct RawMovie {
    id: u64,
    title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    original_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    vote_average: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    overview: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Turns a catalog response body into movies, resolving poster paths against
/// the image host.
#[derive(Debug, Clone)]
pub struct CatalogDecoder {
    image_base: String,
    image_size: String,
}

impl CatalogDecoder {
    pub fn new(image_base: impl Into<String>, image_size: impl Into<String>) -> Self {
        Self {
            image_base: image_base.into(),
            image_size: image_size.into(),
        }
    }

    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}{}", self.image_base, self.image_size, poster_path)
    }

    pub fn decode(&self, body: &str) -> Result<Vec<Movie>, ParseError> {
        let mut document: Value = serde_json::from_str(body)?;

        let Some(Value::Array(elements)) = document.get_mut(RESULTS_FIELD).map(Value::take) else {
            return Err(ParseError::MissingResults(RESULTS_FIELD));
        };

        let movies = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| match serde_json::from_value::<RawMovie>(element) {
                Ok(raw) => Some(self.build_movie(raw)),
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed catalog entry");
                    None
                }
            })
            .collect();

        Ok(movies)
    }

    fn build_movie(&self, raw: RawMovie) -> Movie {
        let image_url = raw
            .poster_path
            .as_deref()
            .map(|path| self.poster_url(path))
            .unwrap_or_default();

        Movie::new(
            raw.id,
            raw.title,
            raw.original_title,
            image_url,
            raw.release_date.unwrap_or_default(),
            raw.vote_average,
            raw.overview.unwrap_or_default(),
        )
    }
}
