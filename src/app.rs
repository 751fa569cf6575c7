pub mod config;
pub mod decoder;
pub mod error;
pub mod grid;
pub mod movie;
pub mod network;
pub mod orchestrator;
pub mod sort;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, info, warn};

use crate::app::config::Config;
use crate::app::error::FetchError;
use crate::app::grid::MovieGrid;
use crate::app::movie::{DetailPayload, Movie};
use crate::app::orchestrator::{
    FetchMessage, Pipeline, spawn_catalog_fetch, spawn_connectivity_watch, spawn_poster_fetch,
};
use crate::app::sort::SortMode;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";
pub const NETWORK_UNAVAILABLE_NOTICE: &str = "Network unavailable";

pub enum CurrentScreen {
    Main,
    MovieDetail,
}

/// Where the catalog screen is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Idle,
    Loading,
    Displaying,
    ErrorConnectivity,
    ErrorOther,
}

/// Events the controller hands to its navigation collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    NavigateToDetail(DetailPayload),
}

pub struct Notice {
    pub text: String,
    expires_at: Instant,
}

pub enum PosterState {
    /// The movie has no poster
    Missing,
    Loading,
    Ready(StatefulProtocol),
    /// Downloaded, but this terminal cannot draw images
    Unsupported,
    Failed(String),
}

pub struct DetailView {
    pub payload: DetailPayload,
    pub poster: PosterState,
}

pub struct App {
    pub config: Config,
    pub current_screen: CurrentScreen,
    pub state: ScreenState,
    pub sort_mode: SortMode,
    pub grid: MovieGrid,
    pub notice: Option<Notice>,
    pub detail: Option<DetailView>,
    pub last_updated: Option<DateTime<Local>>,
    pub throbber_state: ThrobberState,
    pub picker: Option<Picker>,
    /// Last reachability reported by a background task
    online: bool,
    pipeline: Pipeline,
    sender: Sender<FetchMessage>,
    receiver: Receiver<FetchMessage>,
    alive: Arc<AtomicBool>,
}

impl App {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        let (sender, receiver) = mpsc::channel();

        Self {
            config,
            current_screen: CurrentScreen::Main,
            state: ScreenState::Idle,
            sort_mode: SortMode::None,
            grid: MovieGrid::default(),
            notice: None,
            detail: None,
            last_updated: None,
            throbber_state: ThrobberState::default(),
            picker: None,
            online: true,
            pipeline,
            sender,
            receiver,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn api_key_missing(&self) -> bool {
        self.config.api_key.is_none()
    }

    pub fn online(&self) -> bool {
        self.online
    }

    /// Keep the cached reachability fresh from a background thread.
    pub fn watch_connectivity(&self, interval: Duration) {
        spawn_connectivity_watch(
            Arc::clone(&self.pipeline.connectivity),
            self.sender.clone(),
            Arc::clone(&self.alive),
            interval,
        );
    }

    /// Initial load: always the popular catalog. If it fails for lack of a
    /// connection the sort mode is reset, so picking "popular" later is not
    /// treated as a repeat.
    pub fn start(&mut self) {
        if self.api_key_missing() {
            warn!("no TMDB API key configured; not fetching");
            return;
        }
        self.fetch(SortMode::Popular);
    }

    /// Menu action: switch the catalog to `mode`. Gated on the cached
    /// reachability, never on a fresh check.
    pub fn select_sort(&mut self, mode: SortMode) {
        if mode == SortMode::None {
            return;
        }
        if !self.online {
            self.show_notice(NETWORK_UNAVAILABLE_NOTICE);
            return;
        }
        if self.sort_mode == mode {
            self.show_notice(mode.already_sorted_notice());
            return;
        }
        self.fetch(mode);
    }

    fn fetch(&mut self, mode: SortMode) {
        let Some(url) = self.config.endpoint(mode) else {
            return;
        };

        info!(sort = ?mode, "loading catalog");
        self.set_state(ScreenState::Loading);
        self.sort_mode = mode;

        spawn_catalog_fetch(
            self.pipeline.clone(),
            url,
            self.sender.clone(),
            Arc::clone(&self.alive),
        );
    }

    /// Drain finished background work. Called once per UI tick.
    pub fn handle_fetch_messages(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.apply_message(message);
        }
    }

    fn apply_message(&mut self, message: FetchMessage) {
        if !self.alive.load(Ordering::Acquire) {
            return;
        }
        match message {
            FetchMessage::Catalog { result, connected } => self.finish_catalog(result, connected),
            FetchMessage::Connectivity(connected) => self.set_online(connected),
            FetchMessage::Poster { url, result } => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                if detail.payload.image_url != url {
                    return;
                }
                detail.poster = match (result, self.picker.as_mut()) {
                    (Ok(image), Some(picker)) => PosterState::Ready(picker.new_resize_protocol(image)),
                    (Ok(_), None) => PosterState::Unsupported,
                    (Err(e), _) => PosterState::Failed(e.to_string()),
                };
            }
        }
    }

    fn finish_catalog(&mut self, result: Result<Vec<Movie>, FetchError>, connected: bool) {
        self.set_online(connected);
        match result {
            Ok(movies) => {
                self.grid.set_movies(movies);
                self.last_updated = Some(Local::now());
                self.set_state(ScreenState::Displaying);
            }
            Err(_) if connected => self.set_state(ScreenState::ErrorOther),
            Err(_) => {
                self.sort_mode = SortMode::None;
                self.set_state(ScreenState::ErrorConnectivity);
            }
        }
    }

    fn set_online(&mut self, online: bool) {
        if self.online != online {
            info!(online, "connectivity changed");
        }
        self.online = online;
    }

    fn set_state(&mut self, state: ScreenState) {
        debug!(from = ?self.state, to = ?state, "screen state");
        self.state = state;
    }

    pub fn progress_visible(&self) -> bool {
        self.state == ScreenState::Loading
    }

    pub fn grid_visible(&self) -> bool {
        self.state == ScreenState::Displaying
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self.state {
            ScreenState::ErrorConnectivity => Some(NETWORK_ERROR_MESSAGE),
            ScreenState::ErrorOther => Some(GENERIC_ERROR_MESSAGE),
            _ => None,
        }
    }

    pub fn show_notice(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            expires_at: Instant::now() + self.config.notice_duration(),
        });
    }

    pub fn active_notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| Instant::now() < n.expires_at)
            .map(|n| n.text.as_str())
    }

    /// Per-frame housekeeping: expire notices, advance the spinner.
    pub fn tick(&mut self) {
        if self.notice.as_ref().is_some_and(|n| Instant::now() >= n.expires_at) {
            self.notice = None;
        }
        if self.progress_visible() {
            self.throbber_state.calc_next();
        }
    }

    /// Item selection on the grid. Only meaningful while a catalog is shown.
    pub fn select_current_movie(&self) -> Option<AppEvent> {
        if self.state != ScreenState::Displaying {
            return None;
        }
        let movie = self.grid.selected_movie()?;
        debug!(id = movie.id(), title = movie.title(), "movie selected");
        self.grid.activate().map(AppEvent::NavigateToDetail)
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::NavigateToDetail(payload) => {
                debug!(payload = ?payload.to_pairs(), "navigate to detail");
                self.open_detail(payload);
            }
        }
    }

    pub fn open_detail(&mut self, payload: DetailPayload) {
        let poster = if payload.image_url.is_empty() {
            PosterState::Missing
        } else {
            spawn_poster_fetch(
                self.pipeline.clone(),
                payload.image_url.clone(),
                self.sender.clone(),
                Arc::clone(&self.alive),
            );
            PosterState::Loading
        };

        self.detail = Some(DetailView { payload, poster });
        self.current_screen = CurrentScreen::MovieDetail;
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.current_screen = CurrentScreen::Main;
    }

    /// Stop applying results from work still in flight.
    pub fn shutdown(&mut self) {
        self.alive.store(false, Ordering::Release);
    }

    #[cfg(test)]
    fn wait_for_message(&mut self) -> bool {
        match self.receiver.recv_timeout(Duration::from_secs(2)) {
            Ok(message) => {
                self.apply_message(message);
                true
            }
            Err(_) => false,
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::orchestrator::testing::{FakeConnectivity, FakeFetcher, ONE_MOVIE, pipeline};

    fn app_with(fetcher: Arc<FakeFetcher>, connectivity: Arc<FakeConnectivity>) -> App {
        let config = Config::default().with_api_key(Some("key".to_string()));
        App::new(config, pipeline(fetcher, connectivity))
    }

    #[test]
    fn start_online_loads_popular_catalog() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let mut app = app_with(fetcher.clone(), FakeConnectivity::new(true));

        app.start();
        assert_eq!(app.state, ScreenState::Loading);
        assert!(app.progress_visible());
        assert_eq!(app.sort_mode, SortMode::Popular);

        assert!(app.wait_for_message());
        assert_eq!(app.state, ScreenState::Displaying);
        assert!(app.grid_visible());
        assert!(!app.progress_visible());
        assert_eq!(app.error_message(), None);
        assert_eq!(app.grid.len(), 1);
        assert!(app.last_updated.is_some());
        assert!(fetcher.urls.lock().unwrap()[0].contains("/movie/popular?api_key=key"));
    }

    #[test]
    fn start_offline_ends_in_connectivity_error_with_no_sort_mode() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let mut app = app_with(fetcher.clone(), FakeConnectivity::new(false));

        app.start();
        assert!(app.wait_for_message());

        assert_eq!(app.state, ScreenState::ErrorConnectivity);
        assert_eq!(app.sort_mode, SortMode::None);
        assert_eq!(app.error_message(), Some(NETWORK_ERROR_MESSAGE));
        assert!(!app.progress_visible());
        assert!(!app.grid_visible());
        assert!(!app.online());
        assert_eq!(fetcher.calls(), 0);

        app.select_sort(SortMode::Popular);
        assert_eq!(app.active_notice(), Some(NETWORK_UNAVAILABLE_NOTICE));
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn sort_while_offline_only_shows_notice() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let mut app = app_with(fetcher.clone(), FakeConnectivity::new(false));
        app.watch_connectivity(Duration::from_secs(60));
        assert!(app.wait_for_message());
        assert!(!app.online());

        app.select_sort(SortMode::Popular);

        assert_eq!(app.state, ScreenState::Idle);
        assert_eq!(app.sort_mode, SortMode::None);
        assert_eq!(app.active_notice(), Some(NETWORK_UNAVAILABLE_NOTICE));
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn repeated_sort_selection_fetches_once() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let mut app = app_with(fetcher.clone(), FakeConnectivity::new(true));

        app.select_sort(SortMode::TopRated);
        assert!(app.wait_for_message());
        assert_eq!(app.state, ScreenState::Displaying);

        app.select_sort(SortMode::TopRated);
        assert_eq!(app.state, ScreenState::Displaying);
        assert_eq!(app.active_notice(), Some("Already sorted by rating"));

        assert!(!app.wait_for_message());
        assert_eq!(fetcher.calls(), 1);
        assert!(fetcher.urls.lock().unwrap()[0].contains("/movie/top_rated?"));
    }

    #[test]
    fn switching_modes_refetches() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let mut app = app_with(fetcher.clone(), FakeConnectivity::new(true));

        app.start();
        assert!(app.wait_for_message());
        app.select_sort(SortMode::TopRated);
        assert_eq!(app.sort_mode, SortMode::TopRated);
        assert!(app.wait_for_message());
        app.select_sort(SortMode::Popular);
        assert!(app.wait_for_message());

        assert_eq!(fetcher.calls(), 3);
        assert_eq!(app.sort_mode, SortMode::Popular);
    }

    #[test]
    fn bad_status_while_connected_is_generic_error() {
        let mut app = app_with(FakeFetcher::status(503), FakeConnectivity::new(true));

        app.start();
        assert!(app.wait_for_message());

        assert_eq!(app.state, ScreenState::ErrorOther);
        assert_eq!(app.error_message(), Some(GENERIC_ERROR_MESSAGE));
        assert!(!app.progress_visible());
        assert!(!app.grid_visible());
    }

    #[test]
    fn unparseable_body_is_generic_error() {
        let mut app = app_with(FakeFetcher::ok("not json"), FakeConnectivity::new(true));

        app.select_sort(SortMode::Popular);
        assert!(app.wait_for_message());
        assert_eq!(app.state, ScreenState::ErrorOther);
    }

    #[test]
    fn failure_after_connection_drops_is_connectivity_error() {
        // online when the fetch starts, offline when the failure is examined
        let connectivity = FakeConnectivity::drops_after(1);
        let mut app = app_with(FakeFetcher::status(500), connectivity);

        app.start();
        assert!(app.wait_for_message());

        assert_eq!(app.state, ScreenState::ErrorConnectivity);
        assert_eq!(app.sort_mode, SortMode::None);
        assert!(!app.progress_visible());
        assert!(!app.online());
    }

    #[test]
    fn slow_reachability_check_never_stalls_the_controller() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let connectivity = FakeConnectivity::slow(true, Duration::from_millis(1500));
        let mut app = app_with(fetcher, connectivity);

        let began = Instant::now();
        app.watch_connectivity(Duration::from_secs(60));
        app.start();
        app.select_sort(SortMode::TopRated);
        app.handle_fetch_messages();
        assert!(began.elapsed() < Duration::from_millis(200));
        assert_eq!(app.state, ScreenState::Loading);
        assert_eq!(app.sort_mode, SortMode::TopRated);

        app.shutdown();
    }

    #[test]
    fn connectivity_updates_gate_the_sort_menu() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let mut app = app_with(fetcher.clone(), FakeConnectivity::new(true));

        app.apply_message(FetchMessage::Connectivity(false));
        app.select_sort(SortMode::TopRated);
        assert_eq!(app.active_notice(), Some(NETWORK_UNAVAILABLE_NOTICE));

        app.apply_message(FetchMessage::Connectivity(true));
        app.select_sort(SortMode::TopRated);
        assert!(app.wait_for_message());
        assert_eq!(app.state, ScreenState::Displaying);
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn empty_catalog_is_displayed() {
        let mut app = app_with(FakeFetcher::ok(r#"{"results": []}"#), FakeConnectivity::new(true));

        app.start();
        assert!(app.wait_for_message());
        assert_eq!(app.state, ScreenState::Displaying);
        assert!(app.grid.is_empty());
        assert_eq!(app.select_current_movie(), None);
    }

    #[test]
    fn selecting_item_emits_detail_event_without_changing_state() {
        let mut app = app_with(FakeFetcher::ok(ONE_MOVIE), FakeConnectivity::new(true));
        assert_eq!(app.select_current_movie(), None);

        app.start();
        assert!(app.wait_for_message());

        let event = app.select_current_movie().unwrap();
        let AppEvent::NavigateToDetail(payload) = &event;
        assert_eq!(payload.title, "Jaws");
        assert_eq!(payload.image_url, "https://image.tmdb.org/t/p/w185/jaws.jpg");
        assert!((payload.vote_average - 4.9).abs() < 0.01);
        assert_eq!(app.state, ScreenState::Displaying);

        app.handle_event(event);
        assert!(matches!(app.current_screen, CurrentScreen::MovieDetail));
        assert!(matches!(
            app.detail.as_ref().unwrap().poster,
            PosterState::Loading
        ));

        // the fake serves JSON, not an image
        assert!(app.wait_for_message());
        assert!(matches!(
            app.detail.as_ref().unwrap().poster,
            PosterState::Failed(_)
        ));

        app.close_detail();
        assert!(matches!(app.current_screen, CurrentScreen::Main));
        assert!(app.detail.is_none());
    }

    #[test]
    fn results_after_shutdown_are_ignored() {
        let mut app = app_with(FakeFetcher::ok(ONE_MOVIE), FakeConnectivity::new(true));

        app.select_sort(SortMode::Popular);
        app.shutdown();
        app.handle_fetch_messages();
        app.wait_for_message();

        assert_eq!(app.state, ScreenState::Loading);
        assert!(app.grid.is_empty());
    }

    #[test]
    fn missing_api_key_does_not_fetch() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let mut app = App::new(
            Config::default(),
            pipeline(fetcher.clone(), FakeConnectivity::new(true)),
        );

        app.start();
        assert!(app.api_key_missing());
        assert_eq!(app.state, ScreenState::Idle);
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn expired_notice_is_cleared_on_tick() {
        let mut config = Config::default().with_api_key(Some("key".to_string()));
        config.notice_duration_ms = 0;
        let mut app = App::new(
            config,
            pipeline(FakeFetcher::ok(ONE_MOVIE), FakeConnectivity::new(false)),
        );
        app.apply_message(FetchMessage::Connectivity(false));

        app.select_sort(SortMode::Popular);
        assert!(app.notice.is_some());
        assert_eq!(app.active_notice(), None);
        app.tick();
        assert!(app.notice.is_none());
    }
}
