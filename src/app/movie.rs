/// One catalog entry. Built by the decoder, read by the grid and the detail screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Movie {
    id: u64,
    title: String,
    original_title: Option<String>,
    image_url: String,
    release_date: String,
    vote_average: f64,
    plot_synopsis: String,
}

impl Movie {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        original_title: Option<String>,
        image_url: impl Into<String>,
        release_date: impl Into<String>,
        vote_average: f64,
        plot_synopsis: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            original_title,
            image_url: image_url.into(),
            release_date: release_date.into(),
            vote_average,
            plot_synopsis: plot_synopsis.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn original_title(&self) -> Option<&str> {
        self.original_title.as_deref()
    }

    /// Absolute poster URL, empty when the entry has no poster.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn release_date(&self) -> &str {
        &self.release_date
    }

    pub fn vote_average(&self) -> f64 {
        self.vote_average
    }

    pub fn plot_synopsis(&self) -> &str {
        &self.plot_synopsis
    }

    /// Payload handed to the detail screen when this movie is selected.
    pub fn detail_payload(&self) -> DetailPayload {
        DetailPayload {
            title: self.title.clone(),
            original_title: self.original_title.clone().unwrap_or_default(),
            vote_average: self.vote_average,
            image_url: self.image_url.clone(),
            plot_synopsis: self.plot_synopsis.clone(),
            release_date: self.release_date.clone(),
        }
    }
}

/// The six display fields passed along with a "navigate to detail" event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPayload {
    pub title: String,
    pub original_title: String,
    pub vote_average: f64,
    pub image_url: String,
    pub plot_synopsis: String,
    pub release_date: String,
}

impl DetailPayload {
    pub const TITLE: &'static str = "title";
    pub const ORIGINAL_TITLE: &'static str = "original_title";
    pub const VOTE_AVERAGE: &'static str = "vote_average";
    pub const IMAGE_URL: &'static str = "image_url";
    pub const PLOT_SYNOPSIS: &'static str = "plot_synopsis";
    pub const RELEASE_DATE: &'static str = "release_date";

    /// Flat key-value view of the payload.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (Self::TITLE, self.title.clone()),
            (Self::ORIGINAL_TITLE, self.original_title.clone()),
            (Self::VOTE_AVERAGE, self.vote_average.to_string()),
            (Self::IMAGE_URL, self.image_url.clone()),
            (Self::PLOT_SYNOPSIS, self.plot_synopsis.clone()),
            (Self::RELEASE_DATE, self.release_date.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jaws() -> Movie {
        Movie::new(
            1,
            "Jaws",
            None,
            "movieDatabase",
            "1965",
            4.9,
            "A deadly shark, a deadly game.",
        )
    }

    #[test]
    fn movie_has_default_constructor() {
        let movie = Movie::default();
        assert_eq!(movie.id(), 0);
        assert!(movie.title().is_empty());
    }

    #[test]
    fn movie_getters_return_constructor_values() {
        let movie = jaws();
        assert_eq!(movie.id(), 1);
        assert_eq!(movie.title(), "Jaws");
        assert_eq!(movie.original_title(), None);
        assert_eq!(movie.image_url(), "movieDatabase");
        assert_eq!(movie.release_date(), "1965");
        assert!((movie.vote_average() - 4.9).abs() < 0.01);
        assert_eq!(movie.plot_synopsis(), "A deadly shark, a deadly game.");
    }

    #[test]
    fn detail_payload_carries_display_fields() {
        let payload = jaws().detail_payload();
        let pairs = payload.to_pairs();

        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&(DetailPayload::TITLE, "Jaws".to_string())));
        assert!(pairs.contains(&(DetailPayload::ORIGINAL_TITLE, String::new())));
        assert!(pairs.contains(&(DetailPayload::VOTE_AVERAGE, "4.9".to_string())));
        assert!(pairs.contains(&(DetailPayload::RELEASE_DATE, "1965".to_string())));
    }
}
