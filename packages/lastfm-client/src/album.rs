//! Album models and the `album.*` method catalog

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::{flag_param, num_param, LastfmClient};
use crate::error::LastfmResult;
use crate::models::{
    group_affiliations, images, index_by, non_empty, shouts_in_order, tags_by_name, Affiliation,
    AffiliationKind, AffiliationsSection, BuylinkOptions, Image, Numeric, PageOptions,
    RawNameRef, RawImage, Shout, ShoutOptions, ShoutsSection, Tag, TagOptions, TagsSection, Wiki,
};

/// An album as returned by the metadata and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    /// Service-assigned album id; the key used for search-result mappings
    pub id: u64,
    /// Album name
    pub name: String,
    /// Album artist name
    pub artist: String,
    /// MusicBrainz id (if available)
    pub mbid: Option<String>,
    /// URL to the Last.fm album page
    pub url: Option<String>,
    /// Release date as reported by the service
    pub release_date: Option<String>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
    pub images: Vec<Image>,
    /// Top tags embedded in the info payload
    pub top_tags: Vec<Tag>,
    /// Tracklist embedded in the info payload
    pub tracks: Vec<AlbumTrack>,
    /// Wiki fragment embedded in the info payload
    pub wiki: Option<Wiki>,
}

/// One tracklist entry of an album info payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub name: String,
    pub url: Option<String>,
    /// Track duration as reported by the service
    pub duration: Option<u64>,
    /// Position within the album
    pub rank: Option<u64>,
}

/// Options for `album.getInfo`
#[derive(Debug, Clone)]
pub struct AlbumInfoOptions {
    /// MusicBrainz id for the album, as an alternative to name-based lookup
    pub mbid: Option<String>,
    /// Transform misspelled artist names into correct artist names
    pub autocorrect: bool,
    /// Username whose listening context should be embedded in the response
    pub username: Option<String>,
    /// ISO 639 alpha-2 language code for the wiki content
    pub lang: Option<String>,
}

impl Default for AlbumInfoOptions {
    fn default() -> Self {
        Self {
            mbid: None,
            autocorrect: true,
            username: None,
            lang: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAlbum {
    #[serde(default)]
    pub id: Option<Numeric>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: Option<RawNameRef>,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "releasedate", default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub listeners: Option<Numeric>,
    #[serde(default)]
    pub playcount: Option<Numeric>,
    #[serde(default)]
    pub image: Vec<RawImage>,
    #[serde(default)]
    pub toptags: Option<TagsSection>,
    #[serde(default)]
    pub tracks: Option<AlbumTracksSection>,
    #[serde(default)]
    pub wiki: Option<Wiki>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AlbumTracksSection {
    #[serde(default)]
    pub track: Vec<RawAlbumTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAlbumTrack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<Numeric>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<RawTrackRank>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrackRank {
    #[serde(default)]
    pub rank: Option<Numeric>,
}

impl From<RawAlbumTrack> for AlbumTrack {
    fn from(raw: RawAlbumTrack) -> Self {
        Self {
            name: raw.name,
            url: non_empty(raw.url),
            duration: raw.duration.map(|d| d.as_u64("album.track.duration")),
            rank: raw
                .attr
                .and_then(|a| a.rank)
                .map(|r| r.as_u64("album.track.rank")),
        }
    }
}

impl From<RawAlbum> for Album {
    fn from(raw: RawAlbum) -> Self {
        Self {
            id: raw.id.map(|n| n.as_u64("album.id")).unwrap_or_default(),
            name: raw.name,
            artist: raw
                .artist
                .map(RawNameRef::into_name)
                .unwrap_or_default(),
            mbid: non_empty(raw.mbid),
            url: non_empty(raw.url),
            release_date: raw
                .release_date
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            listeners: raw.listeners.map(|n| n.as_u64("album.listeners")),
            playcount: raw.playcount.map(|n| n.as_u64("album.playcount")),
            images: images(raw.image),
            top_tags: raw
                .toptags
                .map(|s| s.tag.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
            tracks: raw
                .tracks
                .map(|s| s.track.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
            wiki: raw.wiki,
        }
    }
}

/// Album endpoints
impl LastfmClient {
    /// Get the metadata and tracklist for an album, by name or MusicBrainz id
    ///
    /// Returns `None` when the response carries no album section.
    ///
    /// # Errors
    /// - `LastfmError::InvalidInput` - Empty or overlong artist/album name
    /// - `LastfmError::NotFound` / `LastfmError::Api` - Service error envelope
    /// - `LastfmError::Http` - Transport failure
    #[instrument(skip(self))]
    pub async fn get_album_info(
        &self,
        artist: &str,
        album: &str,
        options: &AlbumInfoOptions,
    ) -> LastfmResult<Option<Album>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let album = Self::validate_name(album, "album name")?;

        debug!(artist, album, "Fetching album info from Last.fm");

        #[derive(Deserialize)]
        struct AlbumInfoResponse {
            #[serde(default)]
            album: Option<RawAlbum>,
        }

        let response: AlbumInfoResponse = self
            .call(
                "album.getInfo",
                &[
                    ("artist", Some(artist.to_string())),
                    ("album", Some(album.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("username", options.username.clone()),
                    ("lang", options.lang.clone()),
                ],
            )
            .await?;

        Ok(response.album.map(Into::into))
    }

    /// Get the tags applied by an individual user to an album
    ///
    /// For the aggregate list across all users use
    /// [`get_album_top_tags`](Self::get_album_top_tags). Returns a mapping
    /// keyed by tag name; duplicate names overwrite.
    #[instrument(skip(self))]
    pub async fn get_album_tags(
        &self,
        artist: &str,
        album: &str,
        user: &str,
        options: &TagOptions,
    ) -> LastfmResult<HashMap<String, Tag>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let album = Self::validate_name(album, "album name")?;
        let user = Self::validate_name(user, "user name")?;

        #[derive(Deserialize)]
        struct AlbumTagsResponse {
            #[serde(default)]
            tags: Option<TagsSection>,
        }

        let response: AlbumTagsResponse = self
            .call(
                "album.getTags",
                &[
                    ("artist", Some(artist.to_string())),
                    ("album", Some(album.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("user", Some(user.to_string())),
                ],
            )
            .await?;

        let tags = tags_by_name(response.tags);
        debug!(artist, album, tag_count = tags.len(), "Fetched album tags");
        Ok(tags)
    }

    /// Get the top tags for an album, ordered by popularity on the service
    ///
    /// Returns a mapping keyed by tag name.
    #[instrument(skip(self))]
    pub async fn get_album_top_tags(
        &self,
        artist: &str,
        album: &str,
        options: &TagOptions,
    ) -> LastfmResult<HashMap<String, Tag>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let album = Self::validate_name(album, "album name")?;

        #[derive(Deserialize)]
        struct AlbumTopTagsResponse {
            #[serde(default)]
            toptags: Option<TagsSection>,
        }

        let response: AlbumTopTagsResponse = self
            .call(
                "album.getTopTags",
                &[
                    ("artist", Some(artist.to_string())),
                    ("album", Some(album.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                ],
            )
            .await?;

        let tags = tags_by_name(response.toptags);
        debug!(artist, album, tag_count = tags.len(), "Fetched album top tags");
        Ok(tags)
    }

    /// Search for an album by name
    ///
    /// Returns the matches keyed by album id.
    #[instrument(skip(self))]
    pub async fn search_albums(
        &self,
        album: &str,
        options: &PageOptions,
    ) -> LastfmResult<HashMap<u64, Album>> {
        let album = Self::validate_name(album, "album name")?;

        #[derive(Deserialize)]
        struct AlbumMatches {
            #[serde(default)]
            album: Vec<RawAlbum>,
        }

        #[derive(Deserialize)]
        struct SearchResults {
            #[serde(default)]
            albummatches: Option<AlbumMatches>,
        }

        #[derive(Deserialize)]
        struct AlbumSearchResponse {
            #[serde(default)]
            results: Option<SearchResults>,
        }

        let response: AlbumSearchResponse = self
            .call(
                "album.search",
                &[
                    ("album", Some(album.to_string())),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let matches: Vec<Album> = response
            .results
            .and_then(|r| r.albummatches)
            .map(|m| m.album.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(album, result_count = matches.len(), "Album search complete");

        Ok(index_by(matches, |a: &Album| a.id))
    }

    /// Get shouts for an album, in the order the service returns them
    #[instrument(skip(self))]
    pub async fn get_album_shouts(
        &self,
        artist: &str,
        album: &str,
        options: &ShoutOptions,
    ) -> LastfmResult<Vec<Shout>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let album = Self::validate_name(album, "album name")?;

        #[derive(Deserialize)]
        struct AlbumShoutsResponse {
            #[serde(default)]
            shouts: Option<ShoutsSection>,
        }

        let response: AlbumShoutsResponse = self
            .call(
                "album.getShouts",
                &[
                    ("artist", Some(artist.to_string())),
                    ("album", Some(album.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                ],
            )
            .await?;

        let shouts = shouts_in_order(response.shouts);
        debug!(artist, album, shout_count = shouts.len(), "Fetched album shouts");
        Ok(shouts)
    }

    /// Get buy links for an album, grouped into physical/download buckets
    ///
    /// A bucket is present only if the response contained at least one
    /// affiliation for it.
    #[instrument(skip(self))]
    pub async fn get_album_buylinks(
        &self,
        artist: &str,
        album: &str,
        options: &BuylinkOptions,
    ) -> LastfmResult<HashMap<AffiliationKind, Vec<Affiliation>>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let album = Self::validate_name(album, "album name")?;

        #[derive(Deserialize)]
        struct AlbumBuylinksResponse {
            #[serde(default)]
            affiliations: Option<AffiliationsSection>,
        }

        let response: AlbumBuylinksResponse = self
            .call(
                "album.getBuylinks",
                &[
                    ("artist", Some(artist.to_string())),
                    ("album", Some(album.to_string())),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("mbid", options.mbid.clone()),
                    ("country", options.country.clone()),
                ],
            )
            .await?;

        Ok(group_affiliations(response.affiliations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_album_info_options_default_autocorrect() {
        let options = AlbumInfoOptions::default();
        assert!(options.autocorrect);
        assert!(options.mbid.is_none());
        assert!(options.username.is_none());
        assert!(options.lang.is_none());
    }

    #[test]
    fn test_album_conversion_full_payload() {
        let raw: RawAlbum = serde_json::from_value(json!({
            "id": "2026126",
            "name": "Souvlaki",
            "artist": "Slowdive",
            "mbid": "3f3b7b4b-6a7e-4c05-8b3c-0c99b5b2a111",
            "url": "https://www.last.fm/music/Slowdive/Souvlaki",
            "releasedate": " 17 May 1993, 00:00",
            "listeners": "325401",
            "playcount": 9735271,
            "image": [
                {"#text": "https://example.com/small.png", "size": "small"},
                {"#text": "", "size": "mega"}
            ],
            "toptags": {"tag": [{"name": "shoegaze", "url": "https://www.last.fm/tag/shoegaze"}]},
            "tracks": {"track": [
                {"name": "Alison", "duration": "218", "@attr": {"rank": "1"}},
                {"name": "Machine Gun", "duration": "268", "@attr": {"rank": "2"}}
            ]},
            "wiki": {"summary": "Second studio album."}
        }))
        .unwrap();

        let album: Album = raw.into();
        assert_eq!(album.id, 2026126);
        assert_eq!(album.name, "Souvlaki");
        assert_eq!(album.artist, "Slowdive");
        assert_eq!(album.release_date.as_deref(), Some("17 May 1993, 00:00"));
        assert_eq!(album.listeners, Some(325401));
        assert_eq!(album.playcount, Some(9735271));
        assert_eq!(album.images.len(), 1);
        assert_eq!(album.top_tags[0].name, "shoegaze");
        assert_eq!(album.tracks.len(), 2);
        assert_eq!(album.tracks[0].rank, Some(1));
        assert_eq!(album.tracks[1].duration, Some(268));
        assert_eq!(album.wiki.unwrap().summary.as_deref(), Some("Second studio album."));
    }

    #[test]
    fn test_album_conversion_search_match_payload() {
        // Search matches carry a flat artist string and no nested sections
        let raw: RawAlbum = serde_json::from_value(json!({
            "id": "12345",
            "name": "Pygmalion",
            "artist": "Slowdive",
            "url": "https://www.last.fm/music/Slowdive/Pygmalion",
            "mbid": ""
        }))
        .unwrap();

        let album: Album = raw.into();
        assert_eq!(album.id, 12345);
        assert_eq!(album.artist, "Slowdive");
        assert!(album.mbid.is_none());
        assert!(album.top_tags.is_empty());
        assert!(album.tracks.is_empty());
    }

    #[test]
    fn test_album_conversion_detailed_artist_payload() {
        // Top-album entries nest the artist as an object
        let raw: RawAlbum = serde_json::from_value(json!({
            "name": "Just for a Day",
            "artist": {"name": "Slowdive", "mbid": "x", "url": "y"},
            "playcount": "100"
        }))
        .unwrap();

        let album: Album = raw.into();
        assert_eq!(album.id, 0);
        assert_eq!(album.artist, "Slowdive");
        assert_eq!(album.playcount, Some(100));
    }
}
