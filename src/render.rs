//! Plain-text output for each command.

use lastfm_client::{
    Friends, LovedTracks, Pagination, RecentTracks, TopAlbums, TopArtists, TopTags,
};

use crate::library::{Charts, Profile, TrackMetadata};

pub fn now_playing(track: Option<&TrackMetadata>) -> String {
    match track {
        Some(track) if track.album.is_empty() => {
            format!("♫ {} - {}\n  {}", track.name, track.artist, track.cover_url)
        }
        Some(track) => format!(
            "♫ {} - {} ({})\n  {}",
            track.name, track.artist, track.album, track.cover_url
        ),
        None => "Nothing playing.".to_owned(),
    }
}

pub fn profile(profile: &Profile) -> String {
    let user = &profile.user;
    let mut out = match &user.real_name {
        Some(real_name) => format!("{} ({})\n", user.name, real_name),
        None => format!("{}\n", user.name),
    };
    out += &format!("  {}\n", user.url);
    out += &format!("  scrobbles: {}\n", user.playcount);
    if let Some(artists) = user.artist_count {
        out += &format!("  artists:   {}\n", artists);
    }
    if let Some(albums) = user.album_count {
        out += &format!("  albums:    {}\n", albums);
    }
    if let Some(tracks) = user.track_count {
        out += &format!("  tracks:    {}\n", tracks);
    }

    out += "\nTop tracks, last 7 days:\n";
    for track in &profile.top_tracks {
        out += &format!(
            "  {:>2}. {} - {} ({} plays)\n",
            track.rank, track.name, track.artist.name, track.playcount
        );
    }
    out
}

fn footer(page: &Pagination) -> String {
    format!(
        "page {} of {} ({} total)",
        page.page, page.total_pages, page.total
    )
}

pub fn recent(recent: &RecentTracks) -> String {
    let mut out = String::new();
    for track in &recent.tracks {
        let when = match (track.now_playing, track.scrobbled_at) {
            (true, _) => "now".to_owned(),
            (false, Some(ts)) => ts.to_string(),
            (false, None) => "-".to_owned(),
        };
        out += &format!("  {:>10}  {} - {}\n", when, track.name, track.artist.name);
    }
    out + &footer(&recent.page)
}

pub fn top_artists(top: &TopArtists) -> String {
    let mut out = String::new();
    for artist in &top.artists {
        out += &format!(
            "  {:>3}. {} ({} plays)\n",
            artist.rank, artist.name, artist.playcount
        );
    }
    out + &footer(&top.page)
}

pub fn top_albums(top: &TopAlbums) -> String {
    let mut out = String::new();
    for album in &top.albums {
        out += &format!(
            "  {:>3}. {} - {} ({} plays)\n",
            album.rank, album.name, album.artist.name, album.playcount
        );
    }
    out + &footer(&top.page)
}

pub fn loved(loved: &LovedTracks) -> String {
    let mut out = String::new();
    for track in &loved.tracks {
        out += &format!("  ♥ {} - {}\n", track.name, track.artist.name);
    }
    out + &footer(&loved.page)
}

pub fn friends(friends: &Friends) -> String {
    let mut out = String::new();
    for user in &friends.users {
        out += &format!("  {} ({} scrobbles)\n", user.name, user.playcount);
    }
    out + &footer(&friends.page)
}

pub fn tags(tags: &TopTags) -> String {
    tags.tags
        .iter()
        .map(|tag| format!("  {} ({})\n", tag.name, tag.count))
        .collect()
}

pub fn charts(charts: &Charts) -> String {
    let mut out = format!(
        "{} weekly charts available\n\nWeek {} - {}:\n",
        charts.available.charts.len(),
        charts.latest.from,
        charts.latest.to
    );
    for track in &charts.latest.entries {
        out += &format!(
            "  {:>3}. {} - {} ({} plays)\n",
            track.rank, track.name, track.artist.name, track.playcount
        );
    }
    out
}
