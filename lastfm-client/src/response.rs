use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{raw, types::*, ApiError, ApiResult, RemoteError};

/// Which collection a response body carries. The API does not tag bodies;
/// the kind is the one known top-level key that is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    UserInfo,
    RecentTracks,
    TopTracks,
    LovedTracks,
    Friends,
    TopAlbums,
    TopArtists,
    WeeklyAlbumChart,
    WeeklyArtistChart,
    WeeklyTrackChart,
    WeeklyChartList,
    TopTags,
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 12] = [
        ResponseKind::UserInfo,
        ResponseKind::RecentTracks,
        ResponseKind::TopTracks,
        ResponseKind::LovedTracks,
        ResponseKind::Friends,
        ResponseKind::TopAlbums,
        ResponseKind::TopArtists,
        ResponseKind::WeeklyAlbumChart,
        ResponseKind::WeeklyArtistChart,
        ResponseKind::WeeklyTrackChart,
        ResponseKind::WeeklyChartList,
        ResponseKind::TopTags,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ResponseKind::UserInfo => "user",
            ResponseKind::RecentTracks => "recenttracks",
            ResponseKind::TopTracks => "toptracks",
            ResponseKind::LovedTracks => "lovedtracks",
            ResponseKind::Friends => "friends",
            ResponseKind::TopAlbums => "topalbums",
            ResponseKind::TopArtists => "topartists",
            ResponseKind::WeeklyAlbumChart => "weeklyalbumchart",
            ResponseKind::WeeklyArtistChart => "weeklyartistchart",
            ResponseKind::WeeklyTrackChart => "weeklytrackchart",
            ResponseKind::WeeklyChartList => "weeklychartlist",
            ResponseKind::TopTags => "toptags",
        }
    }

    pub fn from_key(key: &str) -> Option<ResponseKind> {
        ResponseKind::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    UserInfo(User),
    RecentTracks(RecentTracks),
    TopTracks(TopTracks),
    LovedTracks(LovedTracks),
    Friends(Friends),
    TopAlbums(TopAlbums),
    TopArtists(TopArtists),
    WeeklyAlbumChart(WeeklyAlbumChart),
    WeeklyArtistChart(WeeklyArtistChart),
    WeeklyTrackChart(WeeklyTrackChart),
    WeeklyChartList(WeeklyChartList),
    TopTags(TopTags),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: u32,
    #[serde(default)]
    message: String,
}

/// Outcome of looking at a body before it is normalized.
pub(crate) enum Envelope {
    Error(RemoteError),
    Payload(ResponseKind, Value),
}

impl Envelope {
    pub(crate) fn parse(body: &str) -> ApiResult<Envelope> {
        let mut map: Map<String, Value> = serde_json::from_str(body)?;

        if map.contains_key("error") {
            let err: ErrorBody = serde_json::from_value(Value::Object(map))?;
            return Ok(Envelope::Error(RemoteError::new(err.error, err.message)));
        }

        let kind = map
            .keys()
            .find_map(|key| ResponseKind::from_key(key))
            .ok_or_else(|| ApiError::UnrecognizedResponse {
                keys: map.keys().cloned().collect(),
            })?;

        let payload = map.remove(kind.key()).unwrap_or(Value::Null);
        Ok(Envelope::Payload(kind, payload))
    }
}

impl Response {
    /// Decodes and normalizes a response body. Error envelopes are
    /// classified the same way the client classifies them, without a
    /// username attached.
    pub fn decode(body: &str) -> ApiResult<Response> {
        match Envelope::parse(body)? {
            Envelope::Error(remote) => Err(ApiError::from_remote(remote, None)),
            Envelope::Payload(kind, payload) => Response::normalize(kind, payload),
        }
    }

    pub(crate) fn normalize(kind: ResponseKind, payload: Value) -> ApiResult<Response> {
        debug!(kind = kind.key(), "Normalizing Last.fm response");
        let res = match kind {
            ResponseKind::UserInfo => {
                Response::UserInfo(from_payload::<raw::UserBody>(payload)?.normalize()?)
            }
            ResponseKind::RecentTracks => Response::RecentTracks(
                from_payload::<raw::RecentTracksBody>(payload)?.normalize()?,
            ),
            ResponseKind::TopTracks => {
                Response::TopTracks(from_payload::<raw::TopTracksBody>(payload)?.normalize()?)
            }
            ResponseKind::LovedTracks => Response::LovedTracks(
                from_payload::<raw::LovedTracksBody>(payload)?.normalize()?,
            ),
            ResponseKind::Friends => {
                Response::Friends(from_payload::<raw::FriendsBody>(payload)?.normalize()?)
            }
            ResponseKind::TopAlbums => {
                Response::TopAlbums(from_payload::<raw::TopAlbumsBody>(payload)?.normalize()?)
            }
            ResponseKind::TopArtists => {
                Response::TopArtists(from_payload::<raw::TopArtistsBody>(payload)?.normalize()?)
            }
            ResponseKind::WeeklyAlbumChart => Response::WeeklyAlbumChart(
                from_payload::<raw::WeeklyAlbumChartBody>(payload)?.normalize()?,
            ),
            ResponseKind::WeeklyArtistChart => Response::WeeklyArtistChart(
                from_payload::<raw::WeeklyArtistChartBody>(payload)?.normalize()?,
            ),
            ResponseKind::WeeklyTrackChart => Response::WeeklyTrackChart(
                from_payload::<raw::WeeklyTrackChartBody>(payload)?.normalize()?,
            ),
            ResponseKind::WeeklyChartList => Response::WeeklyChartList(
                from_payload::<raw::WeeklyChartListBody>(payload)?.normalize()?,
            ),
            ResponseKind::TopTags => {
                Response::TopTags(from_payload::<raw::TopTagsBody>(payload)?.normalize()?)
            }
        };
        Ok(res)
    }

    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::UserInfo(_) => ResponseKind::UserInfo,
            Response::RecentTracks(_) => ResponseKind::RecentTracks,
            Response::TopTracks(_) => ResponseKind::TopTracks,
            Response::LovedTracks(_) => ResponseKind::LovedTracks,
            Response::Friends(_) => ResponseKind::Friends,
            Response::TopAlbums(_) => ResponseKind::TopAlbums,
            Response::TopArtists(_) => ResponseKind::TopArtists,
            Response::WeeklyAlbumChart(_) => ResponseKind::WeeklyAlbumChart,
            Response::WeeklyArtistChart(_) => ResponseKind::WeeklyArtistChart,
            Response::WeeklyTrackChart(_) => ResponseKind::WeeklyTrackChart,
            Response::WeeklyChartList(_) => ResponseKind::WeeklyChartList,
            Response::TopTags(_) => ResponseKind::TopTags,
        }
    }
}

fn from_payload<T: serde::de::DeserializeOwned>(payload: Value) -> ApiResult<T> {
    Ok(serde_json::from_value(payload)?)
}

/// Extracts one variant of [`Response`]; hands the response back when it
/// is another variant.
pub trait FromResponse: Sized {
    fn from_response(res: Response) -> Result<Self, Response>;
}

macro_rules! impl_from_response {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl FromResponse for $ty {
                fn from_response(res: Response) -> Result<Self, Response> {
                    match res {
                        Response::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_from_response! {
    UserInfo => User,
    RecentTracks => RecentTracks,
    TopTracks => TopTracks,
    LovedTracks => LovedTracks,
    Friends => Friends,
    TopAlbums => TopAlbums,
    TopArtists => TopArtists,
    WeeklyAlbumChart => WeeklyAlbumChart,
    WeeklyArtistChart => WeeklyArtistChart,
    WeeklyTrackChart => WeeklyTrackChart,
    WeeklyChartList => WeeklyChartList,
    TopTags => TopTags,
}

#[cfg(test)]
mod test {
    use super::*;

    #[track_caller]
    fn check_example(path: &str, kind: ResponseKind) -> Response {
        let json = std::fs::read_to_string(path).unwrap();
        match Response::decode(&json) {
            Ok(res) => {
                assert_eq!(res.kind(), kind, "wrong kind for {path}");
                res
            }
            Err(e) => panic!("Normalization failed for {path}: {e}"),
        }
    }

    #[test]
    fn decode_examples() {
        check_example("test-data/lastfm/getInfo.json", ResponseKind::UserInfo);
        check_example("test-data/lastfm/getRecentTracks.json", ResponseKind::RecentTracks);
        check_example("test-data/lastfm/getTopTracks.json", ResponseKind::TopTracks);
        check_example("test-data/lastfm/getLovedTracks.json", ResponseKind::LovedTracks);
        check_example("test-data/lastfm/getFriends.json", ResponseKind::Friends);
        check_example("test-data/lastfm/getTopAlbums.json", ResponseKind::TopAlbums);
        check_example("test-data/lastfm/getTopArtists.json", ResponseKind::TopArtists);
        check_example(
            "test-data/lastfm/getWeeklyAlbumChart.json",
            ResponseKind::WeeklyAlbumChart,
        );
        check_example(
            "test-data/lastfm/getWeeklyArtistChart.json",
            ResponseKind::WeeklyArtistChart,
        );
        check_example(
            "test-data/lastfm/getWeeklyTrackChart.json",
            ResponseKind::WeeklyTrackChart,
        );
        check_example(
            "test-data/lastfm/getWeeklyChartList.json",
            ResponseKind::WeeklyChartList,
        );
        check_example("test-data/lastfm/getTopTags.json", ResponseKind::TopTags);
    }

    #[test]
    fn top_tracks_are_coerced() {
        let res = check_example("test-data/lastfm/getTopTracks.json", ResponseKind::TopTracks);
        let top = TopTracks::from_response(res).unwrap();
        let track = &top.tracks[0];
        assert!(track.streamable.full_track);
        assert!(!track.streamable.streamable);
        assert_eq!(track.duration, 215);
        assert_eq!(track.playcount, 42);
        assert_eq!(track.rank, 3);
        assert_eq!(top.page.page, 1);
        assert_eq!(top.page.per_page, 5);
        assert_eq!(top.page.user, "rj");
    }

    #[test]
    fn user_info_is_coerced() {
        let res = check_example("test-data/lastfm/getInfo.json", ResponseKind::UserInfo);
        let user = User::from_response(res).unwrap();
        assert_eq!(user.name, "rj");
        assert_eq!(user.playcount, 150316);
        assert_eq!(user.album_count, Some(15033));
        assert_eq!(user.artist_count, Some(6745));
        assert_eq!(user.track_count, Some(51812));
        assert_eq!(user.playlists, Some(0));
        assert_eq!(user.age, None);
        assert!(user.subscriber);
        assert!(!user.bootstrap);
        assert_eq!(user.registered, Some(1037793040));
    }

    #[test]
    fn missing_now_playing_marker_defaults_to_false() {
        let res = check_example(
            "test-data/lastfm/getRecentTracks.json",
            ResponseKind::RecentTracks,
        );
        let recent = RecentTracks::from_response(res).unwrap();
        assert_eq!(recent.tracks.len(), 2);
        assert!(recent.tracks[0].now_playing);
        assert_eq!(recent.tracks[0].scrobbled_at, None);
        assert!(!recent.tracks[1].now_playing);
        assert_eq!(recent.tracks[1].scrobbled_at, Some(1700000000));
        assert_eq!(recent.tracks[1].artist.name, "Radiohead");
    }

    #[test]
    fn extended_recent_tracks_carry_artist_objects_and_loved() {
        let res = check_example(
            "test-data/lastfm/getRecentTracksExtended.json",
            ResponseKind::RecentTracks,
        );
        let recent = RecentTracks::from_response(res).unwrap();
        assert_eq!(recent.page.per_page, 2);

        let words = &recent.tracks[0];
        assert_eq!(words.artist.name, "Low");
        assert_eq!(
            words.artist.url.as_deref(),
            Some("https://www.last.fm/music/Low")
        );
        assert_eq!(words.artist.image.len(), 2);
        assert_eq!(words.loved, Some(true));
        assert_eq!(words.scrobbled_at, Some(1700000300));
        assert!(!words.now_playing);

        let alison = &recent.tracks[1];
        assert_eq!(alison.artist.name, "Slowdive");
        assert_eq!(alison.artist.mbid, None);
        assert_eq!(alison.loved, Some(false));
        assert_eq!(alison.album, None);
    }

    #[test]
    fn error_body_wins_over_payload_keys() {
        let body = r#"{"error":8,"message":"Operation failed","toptags":{"tag":[],"@attr":{"user":"rj"}}}"#;
        match Response::decode(body) {
            Err(ApiError::Api(remote)) => {
                assert_eq!(remote.code, 8);
                assert_eq!(remote.message, "Operation failed");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decoded_user_not_found_is_discriminated() {
        let err = Response::decode(r#"{"error":6,"message":"User not found"}"#).unwrap_err();
        assert!(
            matches!(&err, ApiError::UserNotFound { username: None, remote } if remote.code == 6),
            "{err:?}"
        );
        assert!(err
            .to_string()
            .contains("STATUS_INVALID_PARAMS (6): User not found"));
        assert_eq!(err.remote_code(), Some(6));

        let err = Response::decode(r#"{"error":6,"message":"Invalid period"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Api(_)), "{err:?}");
    }

    #[test]
    fn unknown_shapes_fail_loudly() {
        match Response::decode(r#"{"session":{"name":"rj"}}"#) {
            Err(ApiError::UnrecognizedResponse { keys }) => assert_eq!(keys, vec!["session"]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            Response::decode("not json"),
            Err(ApiError::MalformedApiResponse(_))
        ));
    }

    #[test]
    fn malformed_numbers_are_reported_with_their_field() {
        let body = r#"{"toptags":{"tag":[{"name":"rock","count":"lots","url":""}],"@attr":{"user":"rj"}}}"#;
        match Response::decode(body) {
            Err(ApiError::MalformedField { field, value }) => {
                assert_eq!(field, "count");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn kinds_round_trip_through_their_keys() {
        for kind in ResponseKind::ALL {
            assert_eq!(ResponseKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ResponseKind::from_key("error"), None);
    }

    #[test]
    fn from_response_hands_back_other_variants() {
        let res = check_example("test-data/lastfm/getTopTags.json", ResponseKind::TopTags);
        let res = User::from_response(res).unwrap_err();
        assert_eq!(res.kind(), ResponseKind::TopTags);
    }
}
