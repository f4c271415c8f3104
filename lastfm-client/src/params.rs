//! Optional per-method request parameters.
//!
//! Every field is optional and only fields that are set are sent, in the
//! order they are declared. No parameter has a client-side default.

use std::str::FromStr;

use thiserror::Error;

pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Methods without parameters.
impl QueryParams for () {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![]
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_owned()
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Period {
    Overall,
    SevenDay,
    OneMonth,
    ThreeMonth,
    SixMonth,
    TwelveMonth,
}

impl Period {
    pub fn to_param_str(&self) -> &'static str {
        match self {
            Period::Overall => "overall",
            Period::SevenDay => "7day",
            Period::OneMonth => "1month",
            Period::ThreeMonth => "3month",
            Period::SixMonth => "6month",
            Period::TwelveMonth => "12month",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown period '{0}', expected one of overall, 7day, 1month, 3month, 6month, 12month")]
pub struct UnknownPeriod(pub String);

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overall" => Ok(Period::Overall),
            "7day" => Ok(Period::SevenDay),
            "1month" => Ok(Period::OneMonth),
            "3month" => Ok(Period::ThreeMonth),
            "6month" => Ok(Period::SixMonth),
            "12month" => Ok(Period::TwelveMonth),
            other => Err(UnknownPeriod(other.to_owned())),
        }
    }
}

/// Shared by `user.getTopTracks`, `user.getTopAlbums` and `user.getTopArtists`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TopItemsParams {
    pub period: Option<Period>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl QueryParams for TopItemsParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(period) = self.period {
            params.push(("period", period.to_param_str().to_owned()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RecentTracksParams {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    /// Unix timestamp (UTC), inclusive.
    pub from: Option<u64>,
    /// Adds extended artist data and the user's loved flag to each track.
    pub extended: Option<bool>,
    /// Unix timestamp (UTC), inclusive.
    pub to: Option<u64>,
}

impl QueryParams for RecentTracksParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(from) = self.from {
            params.push(("from", from.to_string()));
        }
        if let Some(extended) = self.extended {
            params.push(("extended", flag(extended)));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl QueryParams for PageParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FriendsParams {
    /// Include each friend's latest track.
    pub recent_tracks: Option<bool>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl QueryParams for FriendsParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(recent_tracks) = self.recent_tracks {
            params.push(("recenttracks", flag(recent_tracks)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

/// Date range for the weekly chart methods. Both bounds come from
/// `user.getWeeklyChartList`; omitting them selects the most recent week.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ChartRangeParams {
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl QueryParams for ChartRangeParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(from) = self.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TopTagsParams {
    pub limit: Option<u32>,
}

impl QueryParams for TopTagsParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}
