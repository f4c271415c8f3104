//! Normalized response types.
//!
//! Numbers and flags that arrive as strings on the wire are native values
//! here. Empty `mbid` strings become `None`.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    pub size: String,
    #[serde(rename = "#text")]
    pub url: String,
}

/// Picks the largest non-empty image; the API lists sizes small to large.
pub fn largest_image(images: &[Image]) -> Option<&str> {
    images
        .iter()
        .rev()
        .map(|image| image.url.as_str())
        .find(|url| !url.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub user: String,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRef {
    pub name: String,
    pub mbid: Option<String>,
    pub url: Option<String>,
    /// Only populated by extended recent tracks.
    pub image: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRef {
    pub title: String,
    pub mbid: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streamable {
    pub streamable: bool,
    pub full_track: bool,
}

//////////////////
// user.getInfo //
//////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub real_name: Option<String>,
    pub url: String,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u64>,
    pub subscriber: bool,
    pub bootstrap: bool,
    pub playcount: u64,
    pub artist_count: Option<u64>,
    pub album_count: Option<u64>,
    pub track_count: Option<u64>,
    pub playlists: Option<u64>,
    pub image: Vec<Image>,
    /// Unix timestamp of registration.
    pub registered: Option<u64>,
    pub user_type: Option<String>,
}

//////////////////////////
// user.getRecentTracks //
//////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTracks {
    pub tracks: Vec<RecentTrack>,
    pub page: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTrack {
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub artist: ArtistRef,
    pub album: Option<AlbumRef>,
    pub image: Vec<Image>,
    pub streamable: bool,
    /// Always present; `false` when the API omitted the marker.
    pub now_playing: bool,
    /// Scrobble time. Absent on the track that is currently playing.
    pub scrobbled_at: Option<u64>,
    /// Only reported with `extended=1`.
    pub loved: Option<bool>,
}

///////////////////////
// user.getTopTracks //
///////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopTracks {
    pub tracks: Vec<TopTrack>,
    pub page: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopTrack {
    pub rank: u64,
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub artist: ArtistRef,
    pub image: Vec<Image>,
    pub streamable: Streamable,
    /// Seconds; 0 when unknown.
    pub duration: u64,
    pub playcount: u64,
}

/////////////////////////
// user.getLovedTracks //
/////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LovedTracks {
    pub tracks: Vec<LovedTrack>,
    pub page: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LovedTrack {
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub artist: ArtistRef,
    pub image: Vec<Image>,
    pub streamable: Streamable,
    pub loved_at: Option<u64>,
}

/////////////////////
// user.getFriends //
/////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friends {
    pub users: Vec<User>,
    pub page: Pagination,
}

///////////////////////
// user.getTopAlbums //
///////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopAlbums {
    pub albums: Vec<TopAlbum>,
    pub page: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopAlbum {
    pub rank: u64,
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub artist: ArtistRef,
    pub image: Vec<Image>,
    pub playcount: u64,
}

////////////////////////
// user.getTopArtists //
////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopArtists {
    pub artists: Vec<TopArtist>,
    pub page: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopArtist {
    pub rank: u64,
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub image: Vec<Image>,
    pub streamable: bool,
    pub playcount: u64,
}

//////////////////////////
// user.getWeekly*Chart //
//////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyChart<T> {
    pub user: String,
    pub from: u64,
    pub to: u64,
    pub entries: Vec<T>,
}

pub type WeeklyAlbumChart = WeeklyChart<ChartAlbum>;
pub type WeeklyArtistChart = WeeklyChart<ChartArtist>;
pub type WeeklyTrackChart = WeeklyChart<ChartTrack>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartAlbum {
    pub rank: u64,
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub artist: ArtistRef,
    pub playcount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtist {
    pub rank: u64,
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub playcount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTrack {
    pub rank: u64,
    pub name: String,
    pub url: String,
    pub mbid: Option<String>,
    pub artist: ArtistRef,
    pub image: Vec<Image>,
    pub playcount: u64,
}

//////////////////////////////
// user.getWeeklyChartList //
//////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyChartList {
    pub user: String,
    pub charts: Vec<ChartRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRange {
    pub from: u64,
    pub to: u64,
}

/////////////////////
// user.getTopTags //
/////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopTags {
    pub user: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub count: u64,
    pub url: String,
}

#[cfg(test)]
mod test {
    use super::*;

    fn image(size: &str, url: &str) -> Image {
        Image {
            size: size.to_owned(),
            url: url.to_owned(),
        }
    }

    #[test]
    fn largest_image_skips_empty_urls() {
        let images = vec![
            image("small", "https://img/s.png"),
            image("large", "https://img/l.png"),
            image("extralarge", ""),
        ];
        assert_eq!(largest_image(&images), Some("https://img/l.png"));
        assert_eq!(largest_image(&[]), None);
    }
}
