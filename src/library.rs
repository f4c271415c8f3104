use lastfm_client::{
    largest_image, ApiError, ApiResult, ChartRangeParams, Client, Friends, FriendsParams,
    LovedTracks, PageParams, Period, RecentTrack, RecentTracks, RecentTracksParams, TopAlbums,
    TopArtists, TopItemsParams, TopTags, TopTagsParams, TopTrack, User, WeeklyChartList,
    WeeklyTrackChart,
};

/// Shown when a track has no artwork.
pub const EMPTY_ALBUM_COVER: &str =
    "https://lastfm.freetls.fastly.net/i/u/300x300/2a96cbd8b46e442fc41c2b86b821562f.png";

const PROFILE_TOP_TRACKS: u32 = 5;

#[derive(Default, Clone, Debug, Eq, PartialEq)]
pub struct TrackMetadata {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub url: String,
    pub cover_url: String,
}

impl TrackMetadata {
    pub fn same_song(&self, other: &TrackMetadata) -> bool {
        self.name == other.name && self.artist == other.artist && self.album == other.album
    }
}

impl From<&RecentTrack> for TrackMetadata {
    fn from(track: &RecentTrack) -> Self {
        TrackMetadata {
            name: track.name.clone(),
            artist: track.artist.name.clone(),
            album: track
                .album
                .as_ref()
                .map(|album| album.title.clone())
                .unwrap_or_default(),
            url: track.url.clone(),
            cover_url: largest_image(&track.image)
                .unwrap_or(EMPTY_ALBUM_COVER)
                .to_owned(),
        }
    }
}

#[derive(Debug)]
pub struct Profile {
    pub user: User,
    pub top_tracks: Vec<TopTrack>,
}

#[derive(Debug)]
pub struct Charts {
    pub available: WeeklyChartList,
    pub latest: WeeklyTrackChart,
}

#[derive(Clone)]
pub struct Library {
    client: Client,
}

impl Library {
    pub fn new(client: Client) -> Library {
        Library { client }
    }

    pub fn username(&self) -> &str {
        self.client.username()
    }

    /// `None` when nothing is playing; other failures pass through.
    pub async fn now_playing(&self) -> ApiResult<Option<TrackMetadata>> {
        match self.client.now_playing().await {
            Ok(track) => Ok(Some(TrackMetadata::from(&track))),
            Err(ApiError::NoCurrentlyPlayingTrack) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn profile(&self) -> ApiResult<Profile> {
        let user = self.client.get_user_info().await?;
        let top = self
            .client
            .get_user_top_tracks(&TopItemsParams {
                period: Some(Period::SevenDay),
                limit: Some(PROFILE_TOP_TRACKS),
                page: Some(1),
            })
            .await?;

        Ok(Profile {
            user,
            top_tracks: top.tracks,
        })
    }

    pub async fn recent(&self, limit: u32) -> ApiResult<RecentTracks> {
        self.client
            .get_user_recent_tracks(&RecentTracksParams {
                limit: Some(limit),
                ..Default::default()
            })
            .await
    }

    pub async fn top_artists(&self, period: Option<Period>) -> ApiResult<TopArtists> {
        self.client
            .get_user_top_artists(&TopItemsParams {
                period,
                ..Default::default()
            })
            .await
    }

    pub async fn top_albums(&self, period: Option<Period>) -> ApiResult<TopAlbums> {
        self.client
            .get_user_top_albums(&TopItemsParams {
                period,
                ..Default::default()
            })
            .await
    }

    pub async fn loved(&self) -> ApiResult<LovedTracks> {
        self.client
            .get_user_loved_tracks(&PageParams::default())
            .await
    }

    pub async fn friends(&self) -> ApiResult<Friends> {
        self.client
            .get_user_friends(&FriendsParams::default())
            .await
    }

    pub async fn tags(&self) -> ApiResult<TopTags> {
        self.client.get_user_top_tags(&TopTagsParams::default()).await
    }

    /// The chart list plus the track chart of its most recent week.
    pub async fn charts(&self) -> ApiResult<Charts> {
        let available = self.client.get_user_weekly_chart_list().await?;
        let range = match available.charts.last() {
            Some(range) => ChartRangeParams {
                from: Some(range.from),
                to: Some(range.to),
            },
            None => ChartRangeParams::default(),
        };
        let latest = self.client.get_user_weekly_track_chart(&range).await?;

        Ok(Charts { available, latest })
    }
}
