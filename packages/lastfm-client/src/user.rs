//! User models and the `user.*` read-method catalog

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::album::{Album, RawAlbum};
use crate::artist::{Artist, RawArtist};
use crate::client::{num_param, LastfmClient};
use crate::error::LastfmResult;
use crate::models::{images, non_empty, Image, Numeric, PageOptions, RawImage, RawNameRef};

/// A Last.fm user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Account name
    pub name: String,
    /// Display name, if the user set one
    pub real_name: Option<String>,
    /// URL to the Last.fm profile page
    pub url: Option<String>,
    pub country: Option<String>,
    pub age: Option<u32>,
    /// Total scrobble count
    pub playcount: Option<u64>,
    /// Registration time as a unix timestamp
    pub registered_at: Option<u64>,
    pub images: Vec<Image>,
}

/// One entry of a user's listening history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentTrack {
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub mbid: Option<String>,
    pub url: Option<String>,
    /// True for the entry currently scrobbling; such entries carry no date
    pub now_playing: bool,
    /// Scrobble time as reported by the service
    pub played_at: Option<String>,
}

/// Aggregation window for the user top listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Overall,
    SevenDay,
    OneMonth,
    ThreeMonth,
    SixMonth,
    TwelveMonth,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
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

/// Options for the user top listings (`user.getTopAlbums` / `user.getTopArtists`)
#[derive(Debug, Clone, Default)]
pub struct TopPeriodOptions {
    /// Aggregation window; the service defaults to overall
    pub period: Period,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "realname", default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub age: Option<Numeric>,
    #[serde(default)]
    pub playcount: Option<Numeric>,
    #[serde(default)]
    pub registered: Option<RawRegistered>,
    #[serde(default)]
    pub image: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRegistered {
    #[serde(default)]
    pub unixtime: Option<Numeric>,
    #[serde(rename = "#text", default)]
    pub text: Option<Numeric>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        Self {
            name: raw.name,
            real_name: non_empty(raw.real_name),
            url: non_empty(raw.url),
            country: non_empty(raw.country),
            age: raw.age.map(|n| n.as_u64("user.age") as u32),
            playcount: raw.playcount.map(|n| n.as_u64("user.playcount")),
            registered_at: raw
                .registered
                .and_then(|r| r.unixtime.or(r.text))
                .map(|n| n.as_u64("user.registered")),
            images: images(raw.image),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRecentTrack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: Option<RawNameRef>,
    #[serde(default)]
    pub album: Option<RawNameRef>,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<RawScrobbleDate>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<RawNowPlaying>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawScrobbleDate {
    #[serde(rename = "#text", default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNowPlaying {
    #[serde(default)]
    pub nowplaying: Option<String>,
}

impl From<RawRecentTrack> for RecentTrack {
    fn from(raw: RawRecentTrack) -> Self {
        Self {
            name: raw.name,
            artist: raw.artist.map(RawNameRef::into_name).unwrap_or_default(),
            album: raw
                .album
                .map(RawNameRef::into_name)
                .filter(|s| !s.is_empty()),
            mbid: non_empty(raw.mbid),
            url: non_empty(raw.url),
            now_playing: raw
                .attr
                .and_then(|a| a.nowplaying)
                .map(|flag| flag == "true" || flag == "1")
                .unwrap_or(false),
            played_at: raw.date.and_then(|d| d.text),
        }
    }
}

/// User endpoints
impl LastfmClient {
    /// Get a user's profile
    ///
    /// Returns `None` when the response carries no user section.
    #[instrument(skip(self))]
    pub async fn get_user_info(&self, user: &str) -> LastfmResult<Option<User>> {
        let user = Self::validate_name(user, "user name")?;

        debug!(user, "Fetching user info from Last.fm");

        #[derive(Deserialize)]
        struct UserInfoResponse {
            #[serde(default)]
            user: Option<RawUser>,
        }

        let response: UserInfoResponse = self
            .call("user.getInfo", &[("user", Some(user.to_string()))])
            .await?;

        Ok(response.user.map(Into::into))
    }

    /// Get a user's listening history, newest first as the service returns it
    #[instrument(skip(self))]
    pub async fn get_user_recent_tracks(
        &self,
        user: &str,
        options: &PageOptions,
    ) -> LastfmResult<Vec<RecentTrack>> {
        let user = Self::validate_name(user, "user name")?;

        #[derive(Deserialize)]
        struct RecentTracksSection {
            #[serde(default)]
            track: Vec<RawRecentTrack>,
        }

        #[derive(Deserialize)]
        struct RecentTracksResponse {
            #[serde(default)]
            recenttracks: Option<RecentTracksSection>,
        }

        let response: RecentTracksResponse = self
            .call(
                "user.getRecentTracks",
                &[
                    ("user", Some(user.to_string())),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let tracks: Vec<RecentTrack> = response
            .recenttracks
            .map(|s| s.track.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(user, result_count = tracks.len(), "Fetched recent tracks");

        Ok(tracks)
    }

    /// Get the albums a user listened to most within a period, in ranked order
    #[instrument(skip(self))]
    pub async fn get_user_top_albums(
        &self,
        user: &str,
        options: &TopPeriodOptions,
    ) -> LastfmResult<Vec<Album>> {
        let user = Self::validate_name(user, "user name")?;

        #[derive(Deserialize)]
        struct TopAlbumsSection {
            #[serde(default)]
            album: Vec<RawAlbum>,
        }

        #[derive(Deserialize)]
        struct TopAlbumsResponse {
            #[serde(default)]
            topalbums: Option<TopAlbumsSection>,
        }

        let response: TopAlbumsResponse = self
            .call(
                "user.getTopAlbums",
                &[
                    ("user", Some(user.to_string())),
                    ("period", Some(options.period.as_str().to_string())),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let albums: Vec<Album> = response
            .topalbums
            .map(|s| s.album.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(user, result_count = albums.len(), "Fetched user top albums");

        Ok(albums)
    }

    /// Get the artists a user listened to most within a period, in ranked order
    #[instrument(skip(self))]
    pub async fn get_user_top_artists(
        &self,
        user: &str,
        options: &TopPeriodOptions,
    ) -> LastfmResult<Vec<Artist>> {
        let user = Self::validate_name(user, "user name")?;

        #[derive(Deserialize)]
        struct TopArtistsSection {
            #[serde(default)]
            artist: Vec<RawArtist>,
        }

        #[derive(Deserialize)]
        struct TopArtistsResponse {
            #[serde(default)]
            topartists: Option<TopArtistsSection>,
        }

        let response: TopArtistsResponse = self
            .call(
                "user.getTopArtists",
                &[
                    ("user", Some(user.to_string())),
                    ("period", Some(options.period.as_str().to_string())),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let artists: Vec<Artist> = response
            .topartists
            .map(|s| s.artist.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(user, result_count = artists.len(), "Fetched user top artists");

        Ok(artists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_period_as_str() {
        assert_eq!(Period::Overall.as_str(), "overall");
        assert_eq!(Period::SevenDay.as_str(), "7day");
        assert_eq!(Period::OneMonth.as_str(), "1month");
        assert_eq!(Period::ThreeMonth.as_str(), "3month");
        assert_eq!(Period::SixMonth.as_str(), "6month");
        assert_eq!(Period::TwelveMonth.as_str(), "12month");
    }

    #[test]
    fn test_period_defaults_to_overall() {
        assert_eq!(TopPeriodOptions::default().period, Period::Overall);
    }

    #[test]
    fn test_user_conversion() {
        let raw: RawUser = serde_json::from_value(json!({
            "name": "rj",
            "realname": "Richard",
            "url": "https://www.last.fm/user/rj",
            "country": "UK",
            "age": "41",
            "playcount": "125061",
            "registered": {"#text": 1037793040, "unixtime": "1037793040"},
            "image": [{"#text": "https://example.com/avatar.png", "size": "medium"}]
        }))
        .unwrap();

        let user: User = raw.into();
        assert_eq!(user.name, "rj");
        assert_eq!(user.real_name.as_deref(), Some("Richard"));
        assert_eq!(user.age, Some(41));
        assert_eq!(user.playcount, Some(125061));
        assert_eq!(user.registered_at, Some(1037793040));
        assert_eq!(user.images.len(), 1);
    }

    #[test]
    fn test_recent_track_now_playing() {
        let raw: RawRecentTrack = serde_json::from_value(json!({
            "name": "Sugar for the Pill",
            "artist": {"#text": "Slowdive", "mbid": ""},
            "album": {"#text": "Slowdive", "mbid": ""},
            "@attr": {"nowplaying": "true"}
        }))
        .unwrap();

        let track: RecentTrack = raw.into();
        assert!(track.now_playing);
        assert_eq!(track.artist, "Slowdive");
        assert_eq!(track.album.as_deref(), Some("Slowdive"));
        assert!(track.played_at.is_none());
    }

    #[test]
    fn test_recent_track_dated() {
        let raw: RawRecentTrack = serde_json::from_value(json!({
            "name": "Star Roving",
            "artist": {"#text": "Slowdive", "mbid": ""},
            "date": {"#text": "13 Jun 2025, 18:04", "uts": "1749837840"}
        }))
        .unwrap();

        let track: RecentTrack = raw.into();
        assert!(!track.now_playing);
        assert_eq!(track.played_at.as_deref(), Some("13 Jun 2025, 18:04"));
    }
}
