//! Track models and the `track.*` method catalog

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::{flag_param, num_param, LastfmClient};
use crate::error::LastfmResult;
use crate::models::{
    group_affiliations, images, non_empty, shouts_in_order, tags_by_name, Affiliation,
    AffiliationKind, AffiliationsSection, BuylinkOptions, Image, Numeric, RawImage, RawNameRef,
    Shout, ShoutOptions, ShoutsSection, SimilarOptions, Tag, TagOptions, TagsSection,
};

/// A track as returned by the metadata, listing and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Track name
    pub name: String,
    /// Artist name
    pub artist: String,
    /// MusicBrainz ID (if available)
    pub mbid: Option<String>,
    /// URL to the Last.fm track page
    pub url: Option<String>,
    /// Duration as reported by the service
    pub duration: Option<u64>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
    pub images: Vec<Image>,
}

/// A similar track with its similarity score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarTrack {
    pub name: String,
    pub artist: String,
    pub mbid: Option<String>,
    /// Similarity score (0.0 - 1.0)
    pub match_score: f64,
    pub url: Option<String>,
    pub playcount: Option<u64>,
}

/// Options for `track.getInfo`
#[derive(Debug, Clone)]
pub struct TrackInfoOptions {
    /// MusicBrainz id for the track, as an alternative to name-based lookup
    pub mbid: Option<String>,
    /// Transform misspelled artist names into correct artist names
    pub autocorrect: bool,
    /// Username whose listening context should be embedded in the response
    pub username: Option<String>,
}

impl Default for TrackInfoOptions {
    fn default() -> Self {
        Self {
            mbid: None,
            autocorrect: true,
            username: None,
        }
    }
}

/// Options for `track.search`
#[derive(Debug, Clone, Default)]
pub struct TrackSearchOptions {
    /// Narrow the search to one artist's tracks
    pub artist: Option<String>,
    /// Results per page; the service defaults to 30
    pub limit: Option<u32>,
    /// Page number; the service defaults to the first page
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: Option<RawNameRef>,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<Numeric>,
    #[serde(default)]
    pub listeners: Option<Numeric>,
    #[serde(default)]
    pub playcount: Option<Numeric>,
    #[serde(default)]
    pub image: Vec<RawImage>,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        Self {
            name: raw.name,
            artist: raw
                .artist
                .map(RawNameRef::into_name)
                .unwrap_or_default(),
            mbid: non_empty(raw.mbid),
            url: non_empty(raw.url),
            duration: raw.duration.map(|d| d.as_u64("track.duration")),
            listeners: raw.listeners.map(|n| n.as_u64("track.listeners")),
            playcount: raw.playcount.map(|n| n.as_u64("track.playcount")),
            images: images(raw.image),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSimilarTrack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: Option<RawNameRef>,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(rename = "match", default)]
    pub match_score: Option<Numeric>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub playcount: Option<Numeric>,
}

impl From<RawSimilarTrack> for SimilarTrack {
    fn from(raw: RawSimilarTrack) -> Self {
        let parsed = raw
            .match_score
            .map(|m| m.as_f64("track.similar.match"))
            .unwrap_or(0.0);

        let match_score = if parsed.is_finite() {
            parsed.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            name: raw.name,
            artist: raw
                .artist
                .map(RawNameRef::into_name)
                .unwrap_or_default(),
            mbid: non_empty(raw.mbid),
            match_score,
            url: non_empty(raw.url),
            playcount: raw.playcount.map(|n| n.as_u64("track.similar.playcount")),
        }
    }
}

/// Track endpoints
impl LastfmClient {
    /// Get the metadata for a track, by name or MusicBrainz id
    ///
    /// Returns `None` when the response carries no track section.
    #[instrument(skip(self))]
    pub async fn get_track_info(
        &self,
        artist: &str,
        track: &str,
        options: &TrackInfoOptions,
    ) -> LastfmResult<Option<Track>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let track = Self::validate_name(track, "track name")?;

        debug!(artist, track, "Fetching track info from Last.fm");

        #[derive(Deserialize)]
        struct TrackInfoResponse {
            #[serde(default)]
            track: Option<RawTrack>,
        }

        let response: TrackInfoResponse = self
            .call(
                "track.getInfo",
                &[
                    ("artist", Some(artist.to_string())),
                    ("track", Some(track.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("username", options.username.clone()),
                ],
            )
            .await?;

        Ok(response.track.map(Into::into))
    }

    /// Get similar tracks, ranked by similarity
    #[instrument(skip(self))]
    pub async fn get_similar_tracks(
        &self,
        artist: &str,
        track: &str,
        options: &SimilarOptions,
    ) -> LastfmResult<Vec<SimilarTrack>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let track = Self::validate_name(track, "track name")?;

        #[derive(Deserialize)]
        struct SimilarTracksSection {
            #[serde(default)]
            track: Vec<RawSimilarTrack>,
        }

        #[derive(Deserialize)]
        struct SimilarTracksResponse {
            #[serde(default)]
            similartracks: Option<SimilarTracksSection>,
        }

        let response: SimilarTracksResponse = self
            .call(
                "track.getSimilar",
                &[
                    ("artist", Some(artist.to_string())),
                    ("track", Some(track.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("limit", num_param(options.limit)),
                ],
            )
            .await?;

        let tracks: Vec<SimilarTrack> = response
            .similartracks
            .map(|s| s.track.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(artist, track, result_count = tracks.len(), "Found similar tracks");

        Ok(tracks)
    }

    /// Get the tags applied by an individual user to a track
    ///
    /// Returns a mapping keyed by tag name; duplicate names overwrite.
    #[instrument(skip(self))]
    pub async fn get_track_tags(
        &self,
        artist: &str,
        track: &str,
        user: &str,
        options: &TagOptions,
    ) -> LastfmResult<HashMap<String, Tag>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let track = Self::validate_name(track, "track name")?;
        let user = Self::validate_name(user, "user name")?;

        #[derive(Deserialize)]
        struct TrackTagsResponse {
            #[serde(default)]
            tags: Option<TagsSection>,
        }

        let response: TrackTagsResponse = self
            .call(
                "track.getTags",
                &[
                    ("artist", Some(artist.to_string())),
                    ("track", Some(track.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("user", Some(user.to_string())),
                ],
            )
            .await?;

        let tags = tags_by_name(response.tags);
        debug!(artist, track, tag_count = tags.len(), "Fetched track tags");
        Ok(tags)
    }

    /// Get the top tags for a track, keyed by tag name
    #[instrument(skip(self))]
    pub async fn get_track_top_tags(
        &self,
        artist: &str,
        track: &str,
        options: &TagOptions,
    ) -> LastfmResult<HashMap<String, Tag>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let track = Self::validate_name(track, "track name")?;

        #[derive(Deserialize)]
        struct TrackTopTagsResponse {
            #[serde(default)]
            toptags: Option<TagsSection>,
        }

        let response: TrackTopTagsResponse = self
            .call(
                "track.getTopTags",
                &[
                    ("artist", Some(artist.to_string())),
                    ("track", Some(track.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                ],
            )
            .await?;

        let tags = tags_by_name(response.toptags);
        debug!(artist, track, tag_count = tags.len(), "Fetched track top tags");
        Ok(tags)
    }

    /// Search for a track by name, in relevance order
    #[instrument(skip(self))]
    pub async fn search_tracks(
        &self,
        track: &str,
        options: &TrackSearchOptions,
    ) -> LastfmResult<Vec<Track>> {
        let track = Self::validate_name(track, "track name")?;

        #[derive(Deserialize)]
        struct TrackMatches {
            #[serde(default)]
            track: Vec<RawTrack>,
        }

        #[derive(Deserialize)]
        struct SearchResults {
            #[serde(default)]
            trackmatches: Option<TrackMatches>,
        }

        #[derive(Deserialize)]
        struct TrackSearchResponse {
            #[serde(default)]
            results: Option<SearchResults>,
        }

        let response: TrackSearchResponse = self
            .call(
                "track.search",
                &[
                    ("track", Some(track.to_string())),
                    ("artist", options.artist.clone()),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let matches: Vec<Track> = response
            .results
            .and_then(|r| r.trackmatches)
            .map(|m| m.track.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(track, result_count = matches.len(), "Track search complete");

        Ok(matches)
    }

    /// Get buy links for a track, grouped into physical/download buckets
    #[instrument(skip(self))]
    pub async fn get_track_buylinks(
        &self,
        artist: &str,
        track: &str,
        options: &BuylinkOptions,
    ) -> LastfmResult<HashMap<AffiliationKind, Vec<Affiliation>>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let track = Self::validate_name(track, "track name")?;

        #[derive(Deserialize)]
        struct TrackBuylinksResponse {
            #[serde(default)]
            affiliations: Option<AffiliationsSection>,
        }

        let response: TrackBuylinksResponse = self
            .call(
                "track.getBuylinks",
                &[
                    ("artist", Some(artist.to_string())),
                    ("track", Some(track.to_string())),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("mbid", options.mbid.clone()),
                    ("country", options.country.clone()),
                ],
            )
            .await?;

        Ok(group_affiliations(response.affiliations))
    }

    /// Get shouts for a track, in the order the service returns them
    #[instrument(skip(self))]
    pub async fn get_track_shouts(
        &self,
        artist: &str,
        track: &str,
        options: &ShoutOptions,
    ) -> LastfmResult<Vec<Shout>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let track = Self::validate_name(track, "track name")?;

        #[derive(Deserialize)]
        struct TrackShoutsResponse {
            #[serde(default)]
            shouts: Option<ShoutsSection>,
        }

        let response: TrackShoutsResponse = self
            .call(
                "track.getShouts",
                &[
                    ("artist", Some(artist.to_string())),
                    ("track", Some(track.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                ],
            )
            .await?;

        let shouts = shouts_in_order(response.shouts);
        debug!(artist, track, shout_count = shouts.len(), "Fetched track shouts");
        Ok(shouts)
    }
}
