/// Which ranking endpoint backs the catalog on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Nothing has been loaded successfully under a ranking yet (offline start).
    #[default]
    None,
    Popular,
    TopRated,
}

impl SortMode {
    pub fn endpoint_path(self) -> Option<&'static str> {
        match self {
            SortMode::None => None,
            SortMode::Popular => Some("popular"),
            SortMode::TopRated => Some("top_rated"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::None => "Unsorted",
            SortMode::Popular => "Most popular",
            SortMode::TopRated => "Top rated",
        }
    }

    /// Notice shown when the user picks the mode that is already active.
    pub fn already_sorted_notice(self) -> &'static str {
        match self {
            SortMode::None => "",
            SortMode::Popular => "Already sorted by popularity",
            SortMode::TopRated => "Already sorted by rating",
        }
    }
}
