//! Wire shapes as the API sends them.
//!
//! Numbers and flags are usually strings, sometimes native JSON values, so
//! both are accepted. Coercion to the types in [`crate::types`] is total:
//! a malformed value is an error, never a silent zero.

use serde::Deserialize;
use serde_json::Number;

use crate::{types::*, ApiError, ApiResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Num(Number),
    Str(String),
}

impl Numeric {
    fn to_u64(&self, field: &'static str) -> ApiResult<u64> {
        let parsed = match self {
            Numeric::Num(n) => n.as_u64(),
            Numeric::Str(s) => s.trim().parse().ok(),
        };
        parsed.ok_or_else(|| ApiError::MalformedField {
            field,
            value: self.to_string(),
        })
    }

    fn is_blank(&self) -> bool {
        matches!(self, Numeric::Str(s) if s.trim().is_empty())
    }
}

impl std::fmt::Display for Numeric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Num(n) => write!(f, "{n}"),
            Numeric::Str(s) => f.write_str(s),
        }
    }
}

fn required_u64(field: &'static str, value: Option<&Numeric>) -> ApiResult<u64> {
    match value {
        Some(value) => value.to_u64(field),
        None => Err(ApiError::MalformedField {
            field,
            value: String::new(),
        }),
    }
}

fn optional_u64(field: &'static str, value: Option<&Numeric>) -> ApiResult<Option<u64>> {
    match value {
        Some(value) if !value.is_blank() => value.to_u64(field).map(Some),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Num(Number),
    Str(String),
}

impl Flag {
    /// Strict: only `"1"` (or native `true`/`1`) is true.
    pub fn to_bool(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Num(n) => n.as_u64() == Some(1),
            Flag::Str(s) => s == "1",
        }
    }

    /// Presence markers such as `nowplaying="true"` are true unless they
    /// spell out a false value.
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Num(n) => n.as_u64() != Some(0),
            Flag::Str(s) => !matches!(s.trim(), "" | "0" | "false"),
        }
    }
}

fn flag(value: Option<&Flag>) -> bool {
    value.map_or(false, Flag::to_bool)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// The API returns a bare object instead of a one-element array in some
/// list responses.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaybeMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for MaybeMany<T> {
    fn default() -> Self {
        MaybeMany::Many(vec![])
    }
}

impl<T> From<MaybeMany<T>> for Vec<T> {
    fn from(val: MaybeMany<T>) -> Self {
        match val {
            MaybeMany::Many(vec) => vec,
            MaybeMany::One(single) => vec![single],
        }
    }
}

fn normalize_all<R, T>(
    items: MaybeMany<R>,
    normalize: impl Fn(R) -> ApiResult<T>,
) -> ApiResult<Vec<T>> {
    Vec::from(items).into_iter().map(normalize).collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAttr {
    #[serde(default)]
    user: String,
    page: Numeric,
    per_page: Numeric,
    total_pages: Numeric,
    total: Numeric,
}

impl PageAttr {
    fn normalize(self) -> ApiResult<Pagination> {
        Ok(Pagination {
            page: self.page.to_u64("page")?,
            per_page: self.per_page.to_u64("perPage")?,
            total_pages: self.total_pages.to_u64("totalPages")?,
            total: self.total.to_u64("total")?,
            user: self.user,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RankAttr {
    rank: Numeric,
}

#[derive(Debug, Deserialize)]
pub struct UserAttr {
    #[serde(default)]
    user: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtistRefBody {
    #[serde(rename = "#text")]
    text: Option<String>,
    name: Option<String>,
    mbid: Option<String>,
    url: Option<String>,
    #[serde(default)]
    image: Vec<Image>,
}

impl ArtistRefBody {
    fn normalize(self) -> ArtistRef {
        ArtistRef {
            name: self.name.or(self.text).unwrap_or_default(),
            mbid: non_empty(self.mbid),
            url: non_empty(self.url),
            image: self.image,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    #[serde(rename = "#text", default)]
    text: String,
    mbid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateBody {
    uts: Numeric,
}

#[derive(Debug, Deserialize)]
pub struct StreamableBody {
    fulltrack: Option<Flag>,
    #[serde(rename = "#text")]
    text: Option<Flag>,
}

impl StreamableBody {
    fn normalize(self) -> Streamable {
        Streamable {
            streamable: flag(self.text.as_ref()),
            full_track: flag(self.fulltrack.as_ref()),
        }
    }
}

//////////////////
// user.getInfo //
//////////////////

#[derive(Debug, Deserialize)]
pub struct RegisteredBody {
    unixtime: Option<Numeric>,
    #[serde(rename = "#text")]
    text: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
pub struct UserBody {
    name: String,
    realname: Option<String>,
    #[serde(default)]
    url: String,
    country: Option<String>,
    gender: Option<String>,
    age: Option<Numeric>,
    subscriber: Option<Flag>,
    bootstrap: Option<Flag>,
    playcount: Option<Numeric>,
    artist_count: Option<Numeric>,
    album_count: Option<Numeric>,
    track_count: Option<Numeric>,
    playlists: Option<Numeric>,
    #[serde(default)]
    image: Vec<Image>,
    registered: Option<RegisteredBody>,
    #[serde(rename = "type")]
    user_type: Option<String>,
}

impl UserBody {
    pub fn normalize(self) -> ApiResult<User> {
        let registered = match self.registered {
            Some(reg) => match optional_u64("registered", reg.unixtime.as_ref())? {
                Some(ts) => Some(ts),
                None => optional_u64("registered", reg.text.as_ref())?,
            },
            None => None,
        };

        Ok(User {
            age: optional_u64("age", self.age.as_ref())?,
            subscriber: flag(self.subscriber.as_ref()),
            bootstrap: flag(self.bootstrap.as_ref()),
            playcount: required_u64("playcount", self.playcount.as_ref())?,
            artist_count: optional_u64("artist_count", self.artist_count.as_ref())?,
            album_count: optional_u64("album_count", self.album_count.as_ref())?,
            track_count: optional_u64("track_count", self.track_count.as_ref())?,
            playlists: optional_u64("playlists", self.playlists.as_ref())?,
            registered,
            name: self.name,
            real_name: non_empty(self.realname),
            url: self.url,
            country: non_empty(self.country).filter(|c| c != "None"),
            gender: non_empty(self.gender),
            image: self.image,
            user_type: non_empty(self.user_type),
        })
    }
}

//////////////////////////
// user.getRecentTracks //
//////////////////////////

#[derive(Debug, Deserialize)]
pub struct NowPlayingAttr {
    nowplaying: Option<Flag>,
}

#[derive(Debug, Deserialize)]
pub struct RecentTrackBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    artist: ArtistRefBody,
    album: Option<TextBody>,
    #[serde(default)]
    image: Vec<Image>,
    streamable: Option<Flag>,
    #[serde(rename = "@attr")]
    attr: Option<NowPlayingAttr>,
    date: Option<DateBody>,
    loved: Option<Flag>,
}

impl RecentTrackBody {
    fn normalize(self) -> ApiResult<RecentTrack> {
        let now_playing = self
            .attr
            .and_then(|attr| attr.nowplaying)
            .map_or(false, |marker| marker.is_set());

        Ok(RecentTrack {
            scrobbled_at: match self.date {
                Some(date) => Some(date.uts.to_u64("date")?),
                None => None,
            },
            now_playing,
            streamable: flag(self.streamable.as_ref()),
            loved: self.loved.as_ref().map(Flag::to_bool),
            album: self
                .album
                .filter(|album| !album.text.is_empty())
                .map(|album| AlbumRef {
                    title: album.text,
                    mbid: non_empty(album.mbid),
                }),
            artist: self.artist.normalize(),
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
            image: self.image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentTracksBody {
    #[serde(default)]
    track: MaybeMany<RecentTrackBody>,
    #[serde(rename = "@attr")]
    attr: PageAttr,
}

impl RecentTracksBody {
    pub fn normalize(self) -> ApiResult<RecentTracks> {
        Ok(RecentTracks {
            tracks: normalize_all(self.track, RecentTrackBody::normalize)?,
            page: self.attr.normalize()?,
        })
    }
}

///////////////////////
// user.getTopTracks //
///////////////////////

#[derive(Debug, Deserialize)]
pub struct TopTrackBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    artist: ArtistRefBody,
    #[serde(default)]
    image: Vec<Image>,
    streamable: Option<StreamableBody>,
    duration: Option<Numeric>,
    #[serde(rename = "@attr")]
    attr: RankAttr,
    playcount: Numeric,
}

impl TopTrackBody {
    fn normalize(self) -> ApiResult<TopTrack> {
        Ok(TopTrack {
            rank: self.attr.rank.to_u64("rank")?,
            duration: optional_u64("duration", self.duration.as_ref())?.unwrap_or(0),
            playcount: self.playcount.to_u64("playcount")?,
            streamable: self
                .streamable
                .map(StreamableBody::normalize)
                .unwrap_or_default(),
            artist: self.artist.normalize(),
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
            image: self.image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TopTracksBody {
    #[serde(default)]
    track: MaybeMany<TopTrackBody>,
    #[serde(rename = "@attr")]
    attr: PageAttr,
}

impl TopTracksBody {
    pub fn normalize(self) -> ApiResult<TopTracks> {
        Ok(TopTracks {
            tracks: normalize_all(self.track, TopTrackBody::normalize)?,
            page: self.attr.normalize()?,
        })
    }
}

/////////////////////////
// user.getLovedTracks //
/////////////////////////

#[derive(Debug, Deserialize)]
pub struct LovedTrackBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    artist: ArtistRefBody,
    #[serde(default)]
    image: Vec<Image>,
    streamable: Option<StreamableBody>,
    date: Option<DateBody>,
}

impl LovedTrackBody {
    fn normalize(self) -> ApiResult<LovedTrack> {
        Ok(LovedTrack {
            loved_at: match self.date {
                Some(date) => Some(date.uts.to_u64("date")?),
                None => None,
            },
            streamable: self
                .streamable
                .map(StreamableBody::normalize)
                .unwrap_or_default(),
            artist: self.artist.normalize(),
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
            image: self.image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LovedTracksBody {
    #[serde(default)]
    track: MaybeMany<LovedTrackBody>,
    #[serde(rename = "@attr")]
    attr: PageAttr,
}

impl LovedTracksBody {
    pub fn normalize(self) -> ApiResult<LovedTracks> {
        Ok(LovedTracks {
            tracks: normalize_all(self.track, LovedTrackBody::normalize)?,
            page: self.attr.normalize()?,
        })
    }
}

/////////////////////
// user.getFriends //
/////////////////////

#[derive(Debug, Deserialize)]
pub struct FriendsBody {
    #[serde(default)]
    user: MaybeMany<UserBody>,
    #[serde(rename = "@attr")]
    attr: PageAttr,
}

impl FriendsBody {
    pub fn normalize(self) -> ApiResult<Friends> {
        Ok(Friends {
            users: normalize_all(self.user, UserBody::normalize)?,
            page: self.attr.normalize()?,
        })
    }
}

///////////////////////
// user.getTopAlbums //
///////////////////////

#[derive(Debug, Deserialize)]
pub struct TopAlbumBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    artist: ArtistRefBody,
    #[serde(default)]
    image: Vec<Image>,
    playcount: Numeric,
    #[serde(rename = "@attr")]
    attr: RankAttr,
}

impl TopAlbumBody {
    fn normalize(self) -> ApiResult<TopAlbum> {
        Ok(TopAlbum {
            rank: self.attr.rank.to_u64("rank")?,
            playcount: self.playcount.to_u64("playcount")?,
            artist: self.artist.normalize(),
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
            image: self.image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TopAlbumsBody {
    #[serde(default)]
    album: MaybeMany<TopAlbumBody>,
    #[serde(rename = "@attr")]
    attr: PageAttr,
}

impl TopAlbumsBody {
    pub fn normalize(self) -> ApiResult<TopAlbums> {
        Ok(TopAlbums {
            albums: normalize_all(self.album, TopAlbumBody::normalize)?,
            page: self.attr.normalize()?,
        })
    }
}

////////////////////////
// user.getTopArtists //
////////////////////////

#[derive(Debug, Deserialize)]
pub struct TopArtistBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    #[serde(default)]
    image: Vec<Image>,
    streamable: Option<Flag>,
    playcount: Numeric,
    #[serde(rename = "@attr")]
    attr: RankAttr,
}

impl TopArtistBody {
    fn normalize(self) -> ApiResult<TopArtist> {
        Ok(TopArtist {
            rank: self.attr.rank.to_u64("rank")?,
            playcount: self.playcount.to_u64("playcount")?,
            streamable: flag(self.streamable.as_ref()),
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
            image: self.image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TopArtistsBody {
    #[serde(default)]
    artist: MaybeMany<TopArtistBody>,
    #[serde(rename = "@attr")]
    attr: PageAttr,
}

impl TopArtistsBody {
    pub fn normalize(self) -> ApiResult<TopArtists> {
        Ok(TopArtists {
            artists: normalize_all(self.artist, TopArtistBody::normalize)?,
            page: self.attr.normalize()?,
        })
    }
}

//////////////////////////
// user.getWeekly*Chart //
//////////////////////////

#[derive(Debug, Deserialize)]
pub struct ChartAttr {
    #[serde(default)]
    user: String,
    from: Numeric,
    to: Numeric,
}

impl ChartAttr {
    fn into_chart<T>(self, entries: Vec<T>) -> ApiResult<WeeklyChart<T>> {
        Ok(WeeklyChart {
            from: self.from.to_u64("from")?,
            to: self.to.to_u64("to")?,
            user: self.user,
            entries,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartAlbumBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    artist: ArtistRefBody,
    playcount: Numeric,
    #[serde(rename = "@attr")]
    attr: RankAttr,
}

impl ChartAlbumBody {
    fn normalize(self) -> ApiResult<ChartAlbum> {
        Ok(ChartAlbum {
            rank: self.attr.rank.to_u64("rank")?,
            playcount: self.playcount.to_u64("playcount")?,
            artist: self.artist.normalize(),
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WeeklyAlbumChartBody {
    #[serde(default)]
    album: MaybeMany<ChartAlbumBody>,
    #[serde(rename = "@attr")]
    attr: ChartAttr,
}

impl WeeklyAlbumChartBody {
    pub fn normalize(self) -> ApiResult<WeeklyAlbumChart> {
        let entries = normalize_all(self.album, ChartAlbumBody::normalize)?;
        self.attr.into_chart(entries)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartArtistBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    playcount: Numeric,
    #[serde(rename = "@attr")]
    attr: RankAttr,
}

impl ChartArtistBody {
    fn normalize(self) -> ApiResult<ChartArtist> {
        Ok(ChartArtist {
            rank: self.attr.rank.to_u64("rank")?,
            playcount: self.playcount.to_u64("playcount")?,
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WeeklyArtistChartBody {
    #[serde(default)]
    artist: MaybeMany<ChartArtistBody>,
    #[serde(rename = "@attr")]
    attr: ChartAttr,
}

impl WeeklyArtistChartBody {
    pub fn normalize(self) -> ApiResult<WeeklyArtistChart> {
        let entries = normalize_all(self.artist, ChartArtistBody::normalize)?;
        self.attr.into_chart(entries)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartTrackBody {
    name: String,
    #[serde(default)]
    url: String,
    mbid: Option<String>,
    artist: ArtistRefBody,
    #[serde(default)]
    image: Vec<Image>,
    playcount: Numeric,
    #[serde(rename = "@attr")]
    attr: RankAttr,
}

impl ChartTrackBody {
    fn normalize(self) -> ApiResult<ChartTrack> {
        Ok(ChartTrack {
            rank: self.attr.rank.to_u64("rank")?,
            playcount: self.playcount.to_u64("playcount")?,
            artist: self.artist.normalize(),
            name: self.name,
            url: self.url,
            mbid: non_empty(self.mbid),
            image: self.image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WeeklyTrackChartBody {
    #[serde(default)]
    track: MaybeMany<ChartTrackBody>,
    #[serde(rename = "@attr")]
    attr: ChartAttr,
}

impl WeeklyTrackChartBody {
    pub fn normalize(self) -> ApiResult<WeeklyTrackChart> {
        let entries = normalize_all(self.track, ChartTrackBody::normalize)?;
        self.attr.into_chart(entries)
    }
}

//////////////////////////////
// user.getWeeklyChartList //
//////////////////////////////

#[derive(Debug, Deserialize)]
pub struct ChartRangeBody {
    from: Numeric,
    to: Numeric,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyChartListBody {
    #[serde(default)]
    chart: MaybeMany<ChartRangeBody>,
    #[serde(rename = "@attr")]
    attr: UserAttr,
}

impl WeeklyChartListBody {
    pub fn normalize(self) -> ApiResult<WeeklyChartList> {
        Ok(WeeklyChartList {
            charts: normalize_all(self.chart, |range| {
                Ok(ChartRange {
                    from: range.from.to_u64("from")?,
                    to: range.to.to_u64("to")?,
                })
            })?,
            user: self.attr.user,
        })
    }
}

/////////////////////
// user.getTopTags //
/////////////////////

#[derive(Debug, Deserialize)]
pub struct TagBody {
    name: String,
    count: Numeric,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
pub struct TopTagsBody {
    #[serde(default)]
    tag: MaybeMany<TagBody>,
    #[serde(rename = "@attr")]
    attr: UserAttr,
}

impl TopTagsBody {
    pub fn normalize(self) -> ApiResult<TopTags> {
        Ok(TopTags {
            tags: normalize_all(self.tag, |tag| {
                Ok(Tag {
                    count: tag.count.to_u64("count")?,
                    name: tag.name,
                    url: tag.url,
                })
            })?,
            user: self.attr.user,
        })
    }
}
