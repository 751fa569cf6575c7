use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::app::decoder::CatalogDecoder;
use crate::app::error::{ConnectivityError, FetchError, PosterError};
use crate::app::movie::Movie;
use crate::app::network::{Connectivity, Fetcher, redact_api_key};

/// Messages sent from background tasks back to the UI loop.
pub enum FetchMessage {
    /// `connected` is the reachability seen by the task once the fetch ended.
    Catalog {
        result: Result<Vec<Movie>, FetchError>,
        connected: bool,
    },
    Poster {
        url: String,
        result: Result<DynamicImage, PosterError>,
    },
    Connectivity(bool),
}

/// Fetcher, reachability check and decoder bundled for use off the UI thread.
#[derive(Clone)]
pub struct Pipeline {
    pub fetcher: Arc<dyn Fetcher>,
    pub connectivity: Arc<dyn Connectivity>,
    pub decoder: CatalogDecoder,
}

impl Pipeline {
    /// Connectivity check, GET, decode. Blocks.
    pub fn load_catalog(&self, url: &str) -> Result<Vec<Movie>, FetchError> {
        if !self.connectivity.is_connected() {
            return Err(ConnectivityError.into());
        }
        let body = self.fetcher.fetch_text(url)?;
        Ok(self.decoder.decode(&body)?)
    }

    pub fn load_poster(&self, url: &str) -> Result<DynamicImage, PosterError> {
        let bytes = self.fetcher.fetch_bytes(url)?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

/// Run the catalog pipeline on its own thread and report back over `sender`.
///
/// Nothing is sent once `alive` has been cleared.
pub fn spawn_catalog_fetch(
    pipeline: Pipeline,
    url: String,
    sender: Sender<FetchMessage>,
    alive: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let redacted = redact_api_key(&url);
        info!(url = %redacted, "fetching catalog");

        let result = pipeline.load_catalog(&url);
        let connected = match &result {
            Ok(movies) => {
                info!(url = %redacted, count = movies.len(), "catalog loaded");
                true
            }
            Err(FetchError::Connectivity(_)) => {
                warn!(url = %redacted, "catalog fetch skipped: offline");
                false
            }
            Err(e) => {
                warn!(url = %redacted, error = ?e, "catalog fetch failed");
                // a failure may mean the connection dropped mid-request
                pipeline.connectivity.is_connected()
            }
        };

        if alive.load(Ordering::Acquire) {
            let _ = sender.send(FetchMessage::Catalog { result, connected });
        }
    })
}

/// Re-check reachability every `interval` and report it as
/// [`FetchMessage::Connectivity`]. The first check runs immediately.
///
/// Stops once `alive` is cleared or the receiver is gone.
pub fn spawn_connectivity_watch(
    connectivity: Arc<dyn Connectivity>,
    sender: Sender<FetchMessage>,
    alive: Arc<AtomicBool>,
    interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while alive.load(Ordering::Acquire) {
            let connected = connectivity.is_connected();
            debug!(connected, "connectivity checked");

            if !alive.load(Ordering::Acquire)
                || sender.send(FetchMessage::Connectivity(connected)).is_err()
            {
                break;
            }
            thread::sleep(interval);
        }
    })
}

pub fn spawn_poster_fetch(
    pipeline: Pipeline,
    url: String,
    sender: Sender<FetchMessage>,
    alive: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = pipeline.load_poster(&url);
        if let Err(e) = &result {
            warn!(url = %url, error = ?e, "poster download failed");
        }

        if alive.load(Ordering::Acquire) {
            let _ = sender.send(FetchMessage::Poster { url, result });
        }
    })
}


#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::testing::*;
    use super::*;

    #[test]
    fn catalog_task_reports_movies() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let pipeline = pipeline(fetcher.clone(), FakeConnectivity::new(true));
        let (tx, rx) = mpsc::channel();

        spawn_catalog_fetch(pipeline, "u".into(), tx, Arc::new(AtomicBool::new(true)))
            .join()
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(1)).unwrap() {
            FetchMessage::Catalog {
                result: Ok(movies),
                connected,
            } => {
                assert!(connected);
                assert_eq!(movies.len(), 1);
                assert_eq!(movies[0].image_url(), "https://image.tmdb.org/t/p/w185/jaws.jpg");
            }
            _ => panic!("expected a decoded catalog"),
        }
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn offline_pipeline_never_calls_fetcher() {
        let fetcher = FakeFetcher::ok(ONE_MOVIE);
        let pipeline = pipeline(fetcher.clone(), FakeConnectivity::new(false));

        let err = pipeline.load_catalog("u").unwrap_err();
        assert!(matches!(err, FetchError::Connectivity(_)));
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn network_and_parse_failures_are_errors() {
        let pipeline_500 = pipeline(FakeFetcher::status(500), FakeConnectivity::new(true));
        assert!(matches!(
            pipeline_500.load_catalog("u"),
            Err(FetchError::Network(_))
        ));

        let pipeline_html = pipeline(FakeFetcher::ok("<html>"), FakeConnectivity::new(true));
        assert!(matches!(
            pipeline_html.load_catalog("u"),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn failed_catalog_task_reports_reachability() {
        let connectivity = FakeConnectivity::drops_after(1);
        let pipeline = pipeline(FakeFetcher::status(500), connectivity.clone());
        let (tx, rx) = mpsc::channel();

        spawn_catalog_fetch(pipeline, "u".into(), tx, Arc::new(AtomicBool::new(true)))
            .join()
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(1)).unwrap() {
            FetchMessage::Catalog {
                result: Err(FetchError::Network(_)),
                connected,
            } => assert!(!connected),
            _ => panic!("expected a network failure"),
        }
        assert_eq!(connectivity.checks(), 2);
    }

    #[test]
    fn offline_catalog_task_does_not_recheck() {
        let connectivity = FakeConnectivity::new(false);
        let pipeline = pipeline(FakeFetcher::ok(ONE_MOVIE), connectivity.clone());
        let (tx, rx) = mpsc::channel();

        spawn_catalog_fetch(pipeline, "u".into(), tx, Arc::new(AtomicBool::new(true)))
            .join()
            .unwrap();

        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)).unwrap(),
            FetchMessage::Catalog {
                result: Err(FetchError::Connectivity(_)),
                connected: false,
            }
        ));
        assert_eq!(connectivity.checks(), 1);
    }

    #[test]
    fn connectivity_watch_reports_and_stops() {
        let connectivity = FakeConnectivity::new(true);
        let alive = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel();

        let handle = spawn_connectivity_watch(
            connectivity.clone(),
            tx,
            Arc::clone(&alive),
            Duration::from_millis(10),
        );
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)).unwrap(),
            FetchMessage::Connectivity(true)
        ));

        connectivity.set(false);
        let went_offline = rx
            .iter()
            .take(50)
            .any(|m| matches!(m, FetchMessage::Connectivity(false)));
        assert!(went_offline);

        alive.store(false, Ordering::Release);
        handle.join().unwrap();
    }

    #[test]
    fn dead_receiver_gets_nothing() {
        let pipeline = pipeline(FakeFetcher::ok(ONE_MOVIE), FakeConnectivity::new(true));
        let (tx, rx) = mpsc::channel();

        spawn_catalog_fetch(pipeline, "u".into(), tx, Arc::new(AtomicBool::new(false)))
            .join()
            .unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn undecodable_poster_is_an_image_error() {
        let pipeline = pipeline(FakeFetcher::ok("not a png"), FakeConnectivity::new(true));
        assert!(matches!(
            pipeline.load_poster("p"),
            Err(PosterError::Image(_))
        ));
    }
}
