use crate::app::movie::{DetailPayload, Movie};

pub const GRID_COLUMNS: usize = 2;

/// Movies laid out row-major in a fixed number of columns, with one selected cell.
#[derive(Debug, Clone)]
pub struct MovieGrid {
    movies: Vec<Movie>,
    selected: usize,
    columns: usize,
}

impl Default for MovieGrid {
    fn default() -> Self {
        Self::new(GRID_COLUMNS)
    }
}

impl MovieGrid {
    pub fn new(columns: usize) -> Self {
        Self {
            movies: Vec::new(),
            selected: 0,
            columns: columns.max(1),
        }
    }

    /// Replace the whole catalog and go back to the first cell.
    pub fn set_movies(&mut self, movies: Vec<Movie>) {
        self.movies = movies;
        self.selected = 0;
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    pub fn selected_row(&self) -> usize {
        self.selected / self.columns
    }

    pub fn row_count(&self) -> usize {
        self.movies.len().div_ceil(self.columns)
    }

    pub fn move_right(&mut self) {
        if self.selected + 1 < self.movies.len() {
            self.selected += 1;
        }
    }

    pub fn move_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let target = self.selected + self.columns;
        if target < self.movies.len() {
            self.selected = target;
        } else if self.selected_row() + 1 < self.row_count() {
            // last row is short: land on its final cell
            self.selected = self.movies.len() - 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    /// Item-selection event: the payload for the detail screen.
    pub fn activate(&self) -> Option<DetailPayload> {
        self.selected_movie().map(Movie::detail_payload)
    }
}
