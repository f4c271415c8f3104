use std::time::Duration;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::library::{Library, TrackMetadata};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WatchStatus {
    pub playing_track: Option<TrackMetadata>,
}

impl WatchStatus {
    /// Applies one poll result. Returns whether anything visible changed; a
    /// track that is still the same song only refreshes in place.
    pub fn observe(&mut self, seen: Option<TrackMetadata>) -> bool {
        let unchanged = match (&self.playing_track, &seen) {
            (None, None) => true,
            (Some(current), Some(seen)) => current.same_song(seen),
            _ => false,
        };
        if !unchanged {
            self.playing_track = seen;
        }
        !unchanged
    }
}

/// Polls the now-playing state on a fixed interval and publishes changes.
/// Dropping the watcher stops the polling task, aborting any request that
/// is still in flight.
pub struct NowPlayingWatcher {
    status_rx: watch::Receiver<WatchStatus>,
    task: JoinHandle<()>,
}

impl NowPlayingWatcher {
    pub fn new(library: Library, period: Duration) -> NowPlayingWatcher {
        let (status_tx, status_rx) = watch::channel(WatchStatus::default());
        let task = tokio::spawn(poll(library, period, status_tx));
        NowPlayingWatcher { status_rx, task }
    }

    pub fn status_rx(&self) -> watch::Receiver<WatchStatus> {
        self.status_rx.clone()
    }
}

impl Drop for NowPlayingWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll(library: Library, period: Duration, status_tx: watch::Sender<WatchStatus>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match library.now_playing().await {
            Ok(seen) => {
                let changed = status_tx.send_if_modified(|status| status.observe(seen));
                if changed {
                    let status = status_tx.borrow();
                    match &status.playing_track {
                        Some(track) => info!(
                            track = track.name.as_str(),
                            artist = track.artist.as_str(),
                            url = track.url.as_str(),
                            "Now playing"
                        ),
                        None => info!(user = library.username(), "Playback stopped"),
                    }
                }
            }
            Err(e) => warn!(error = %e, "Now playing poll failed"),
        }

        if status_tx.is_closed() {
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use lastfm_client::{Client, LastFmAuth};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    const LIVE: &str = r##"{"recenttracks":{"track":[{"artist":{"#text":"Burial"},"name":"Archangel","url":"","album":{"#text":"Untrue"},"@attr":{"nowplaying":"true"}}],"@attr":{"user":"rj","totalPages":"1","page":"1","perPage":"1","total":"1"}}}"##;
    const IDLE: &str = r##"{"recenttracks":{"track":[{"artist":{"#text":"Burial"},"name":"Archangel","url":"","album":{"#text":"Untrue"},"date":{"uts":"1700000000"}}],"@attr":{"user":"rj","totalPages":"1","page":"1","perPage":"1","total":"1"}}}"##;

    /// Answers the n-th connection with the n-th canned response, repeating
    /// the last one. Returns the base url and the number of requests served.
    async fn serve_in_turn(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let served = Arc::new(AtomicUsize::new(0));
        let counter = served.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 16 * 1024];
                let mut read = 0;
                while read < buf.len() {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let turn = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses[turn.min(responses.len() - 1)];
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/2.0/"), served)
    }

    #[tokio::test(start_paused = true)]
    async fn poll_publishes_once_per_changed_track() {
        let (base_url, served) = serve_in_turn(vec![
            ("200 OK", LIVE),
            ("503 Service Unavailable", "<html>busy</html>"),
            ("200 OK", LIVE),
            ("200 OK", IDLE),
        ])
        .await;
        let client = Client::with_base_url(LastFmAuth::new("KEY"), "rj", &base_url).unwrap();
        let watcher = NowPlayingWatcher::new(Library::new(client), Duration::from_secs(1));
        let mut status_rx = watcher.status_rx();

        status_rx.changed().await.unwrap();
        let playing = status_rx.borrow_and_update().playing_track.clone();
        assert_eq!(playing.map(|t| t.name).as_deref(), Some("Archangel"));

        // the failed poll and the repeated song publish nothing, so the next
        // change is playback stopping on the fourth poll
        status_rx.changed().await.unwrap();
        assert_eq!(status_rx.borrow_and_update().playing_track, None);
        assert!(served.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_watcher_stops_polling() {
        let (base_url, served) = serve_in_turn(vec![("200 OK", IDLE)]).await;
        let client = Client::with_base_url(LastFmAuth::new("KEY"), "rj", &base_url).unwrap();
        let watcher = NowPlayingWatcher::new(Library::new(client), Duration::from_secs(1));
        let mut status_rx = watcher.status_rx();

        drop(watcher);
        assert!(status_rx.changed().await.is_err());
        assert_eq!(served.load(Ordering::SeqCst), 0);
    }

    fn track(name: &str, cover: &str) -> TrackMetadata {
        TrackMetadata {
            name: name.to_owned(),
            artist: "Burial".to_owned(),
            album: "Untrue".to_owned(),
            url: String::new(),
            cover_url: cover.to_owned(),
        }
    }

    #[test]
    fn idle_stays_idle() {
        let mut status = WatchStatus::default();
        assert!(!status.observe(None));
        assert_eq!(status.playing_track, None);
    }

    #[test]
    fn new_song_is_a_change() {
        let mut status = WatchStatus::default();
        assert!(status.observe(Some(track("Archangel", "a.png"))));
        assert!(status.observe(Some(track("Etched Headplate", "a.png"))));
        assert_eq!(
            status.playing_track.as_ref().map(|t| t.name.as_str()),
            Some("Etched Headplate")
        );
    }

    #[test]
    fn same_song_is_not_a_change() {
        let mut status = WatchStatus::default();
        status.observe(Some(track("Archangel", "a.png")));
        assert!(!status.observe(Some(track("Archangel", "b.png"))));
        assert_eq!(
            status.playing_track.as_ref().map(|t| t.cover_url.as_str()),
            Some("a.png")
        );
    }

    #[test]
    fn stopping_clears_the_track() {
        let mut status = WatchStatus::default();
        status.observe(Some(track("Archangel", "a.png")));
        assert!(status.observe(None));
        assert_eq!(status.playing_track, None);
    }
}
