//! Artist models and the `artist.*` method catalog

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::album::{Album, RawAlbum};
use crate::client::{flag_param, num_param, LastfmClient};
use crate::error::LastfmResult;
use crate::models::{
    images, non_empty, shouts_in_order, tags_by_name, Image, Numeric, PageOptions, RawImage,
    Shout, ShoutOptions, ShoutsSection, SimilarOptions, Tag, TagOptions, TagsSection, TopOptions,
    Wiki,
};
use crate::track::{RawTrack, Track};

/// An artist as returned by the metadata and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    /// Artist name
    pub name: String,
    /// MusicBrainz ID (if available)
    pub mbid: Option<String>,
    /// URL to the Last.fm artist page
    pub url: Option<String>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
    pub images: Vec<Image>,
    /// Tags embedded in the info payload
    pub tags: Vec<Tag>,
    /// Biography embedded in the info payload
    pub bio: Option<Wiki>,
}

/// A similar artist with its similarity score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarArtist {
    /// Artist name
    pub name: String,
    /// MusicBrainz ID (if available)
    pub mbid: Option<String>,
    /// Similarity score (0.0 - 1.0)
    pub match_score: f64,
    /// URL to the Last.fm artist page
    pub url: Option<String>,
}

/// Options for `artist.getInfo`
#[derive(Debug, Clone)]
pub struct ArtistInfoOptions {
    /// MusicBrainz id for the artist, as an alternative to name-based lookup
    pub mbid: Option<String>,
    /// Transform misspelled artist names into correct artist names
    pub autocorrect: bool,
    /// Username whose listening context should be embedded in the response
    pub username: Option<String>,
    /// ISO 639 alpha-2 language code for the biography
    pub lang: Option<String>,
}

impl Default for ArtistInfoOptions {
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
pub(crate) struct RawArtist {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub listeners: Option<Numeric>,
    #[serde(default)]
    pub playcount: Option<Numeric>,
    #[serde(default)]
    pub stats: Option<RawArtistStats>,
    #[serde(default)]
    pub image: Vec<RawImage>,
    #[serde(default)]
    pub tags: Option<TagsSection>,
    #[serde(default)]
    pub bio: Option<Wiki>,
}

/// Info payloads nest listener counts under `stats`; listings keep them flat
#[derive(Debug, Deserialize)]
pub(crate) struct RawArtistStats {
    #[serde(default)]
    pub listeners: Option<Numeric>,
    #[serde(default)]
    pub playcount: Option<Numeric>,
}

impl From<RawArtist> for Artist {
    fn from(raw: RawArtist) -> Self {
        let (stats_listeners, stats_playcount) = raw
            .stats
            .map(|s| (s.listeners, s.playcount))
            .unwrap_or((None, None));
        Self {
            name: raw.name,
            mbid: non_empty(raw.mbid),
            url: non_empty(raw.url),
            listeners: raw
                .listeners
                .or(stats_listeners)
                .map(|n| n.as_u64("artist.listeners")),
            playcount: raw
                .playcount
                .or(stats_playcount)
                .map(|n| n.as_u64("artist.playcount")),
            images: images(raw.image),
            tags: raw
                .tags
                .map(|s| s.tag.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
            bio: raw.bio,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSimilarArtist {
    pub name: String,
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(rename = "match", default)]
    pub match_score: Option<Numeric>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<RawSimilarArtist> for SimilarArtist {
    fn from(raw: RawSimilarArtist) -> Self {
        let parsed = raw
            .match_score
            .map(|m| m.as_f64("artist.similar.match"))
            .unwrap_or(0.0);

        // Clamp the score to the documented [0.0, 1.0] range
        let match_score = if parsed.is_finite() {
            parsed.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            name: raw.name,
            mbid: non_empty(raw.mbid),
            match_score,
            url: non_empty(raw.url),
        }
    }
}

/// Artist endpoints
impl LastfmClient {
    /// Get the metadata for an artist, by name or MusicBrainz id
    ///
    /// Returns `None` when the response carries no artist section.
    #[instrument(skip(self))]
    pub async fn get_artist_info(
        &self,
        artist: &str,
        options: &ArtistInfoOptions,
    ) -> LastfmResult<Option<Artist>> {
        let artist = Self::validate_name(artist, "artist name")?;

        debug!(artist, "Fetching artist info from Last.fm");

        #[derive(Deserialize)]
        struct ArtistInfoResponse {
            #[serde(default)]
            artist: Option<RawArtist>,
        }

        let response: ArtistInfoResponse = self
            .call(
                "artist.getInfo",
                &[
                    ("artist", Some(artist.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("username", options.username.clone()),
                    ("lang", options.lang.clone()),
                ],
            )
            .await?;

        Ok(response.artist.map(Into::into))
    }

    /// Get similar artists for a given artist, ranked by similarity
    #[instrument(skip(self))]
    pub async fn get_similar_artists(
        &self,
        artist: &str,
        options: &SimilarOptions,
    ) -> LastfmResult<Vec<SimilarArtist>> {
        let artist = Self::validate_name(artist, "artist name")?;

        debug!(artist, "Fetching similar artists from Last.fm");

        #[derive(Deserialize)]
        struct SimilarArtistsSection {
            #[serde(default)]
            artist: Vec<RawSimilarArtist>,
        }

        #[derive(Deserialize)]
        struct SimilarArtistsResponse {
            #[serde(default)]
            similarartists: Option<SimilarArtistsSection>,
        }

        let response: SimilarArtistsResponse = self
            .call(
                "artist.getSimilar",
                &[
                    ("artist", Some(artist.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("limit", num_param(options.limit)),
                ],
            )
            .await?;

        let artists: Vec<SimilarArtist> = response
            .similarartists
            .map(|s| s.artist.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(artist, result_count = artists.len(), "Found similar artists");

        Ok(artists)
    }

    /// Get the tags applied by an individual user to an artist
    ///
    /// Returns a mapping keyed by tag name; duplicate names overwrite.
    #[instrument(skip(self))]
    pub async fn get_artist_tags(
        &self,
        artist: &str,
        user: &str,
        options: &TagOptions,
    ) -> LastfmResult<HashMap<String, Tag>> {
        let artist = Self::validate_name(artist, "artist name")?;
        let user = Self::validate_name(user, "user name")?;

        #[derive(Deserialize)]
        struct ArtistTagsResponse {
            #[serde(default)]
            tags: Option<TagsSection>,
        }

        let response: ArtistTagsResponse = self
            .call(
                "artist.getTags",
                &[
                    ("artist", Some(artist.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("user", Some(user.to_string())),
                ],
            )
            .await?;

        let tags = tags_by_name(response.tags);
        debug!(artist, tag_count = tags.len(), "Fetched artist tags");
        Ok(tags)
    }

    /// Get the top tags for an artist, keyed by tag name
    #[instrument(skip(self))]
    pub async fn get_artist_top_tags(
        &self,
        artist: &str,
        options: &TagOptions,
    ) -> LastfmResult<HashMap<String, Tag>> {
        let artist = Self::validate_name(artist, "artist name")?;

        #[derive(Deserialize)]
        struct ArtistTopTagsResponse {
            #[serde(default)]
            toptags: Option<TagsSection>,
        }

        let response: ArtistTopTagsResponse = self
            .call(
                "artist.getTopTags",
                &[
                    ("artist", Some(artist.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                ],
            )
            .await?;

        let tags = tags_by_name(response.toptags);
        debug!(artist, tag_count = tags.len(), "Fetched artist top tags");
        Ok(tags)
    }

    /// Get the top albums for an artist, in ranked order
    #[instrument(skip(self))]
    pub async fn get_artist_top_albums(
        &self,
        artist: &str,
        options: &TopOptions,
    ) -> LastfmResult<Vec<Album>> {
        let artist = Self::validate_name(artist, "artist name")?;

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
                "artist.getTopAlbums",
                &[
                    ("artist", Some(artist.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let albums: Vec<Album> = response
            .topalbums
            .map(|s| s.album.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(artist, result_count = albums.len(), "Fetched artist top albums");

        Ok(albums)
    }

    /// Get the top tracks for an artist, in ranked order
    #[instrument(skip(self))]
    pub async fn get_artist_top_tracks(
        &self,
        artist: &str,
        options: &TopOptions,
    ) -> LastfmResult<Vec<Track>> {
        let artist = Self::validate_name(artist, "artist name")?;

        #[derive(Deserialize)]
        struct TopTracksSection {
            #[serde(default)]
            track: Vec<RawTrack>,
        }

        #[derive(Deserialize)]
        struct TopTracksResponse {
            #[serde(default)]
            toptracks: Option<TopTracksSection>,
        }

        let response: TopTracksResponse = self
            .call(
                "artist.getTopTracks",
                &[
                    ("artist", Some(artist.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let tracks: Vec<Track> = response
            .toptracks
            .map(|s| s.track.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(artist, result_count = tracks.len(), "Fetched artist top tracks");

        Ok(tracks)
    }

    /// Search for an artist by name, in relevance order
    ///
    /// Artist matches carry no service-assigned id, so the result is a
    /// sequence rather than a keyed mapping.
    #[instrument(skip(self))]
    pub async fn search_artists(
        &self,
        artist: &str,
        options: &PageOptions,
    ) -> LastfmResult<Vec<Artist>> {
        let artist = Self::validate_name(artist, "artist name")?;

        #[derive(Deserialize)]
        struct ArtistMatches {
            #[serde(default)]
            artist: Vec<RawArtist>,
        }

        #[derive(Deserialize)]
        struct SearchResults {
            #[serde(default)]
            artistmatches: Option<ArtistMatches>,
        }

        #[derive(Deserialize)]
        struct ArtistSearchResponse {
            #[serde(default)]
            results: Option<SearchResults>,
        }

        let response: ArtistSearchResponse = self
            .call(
                "artist.search",
                &[
                    ("artist", Some(artist.to_string())),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                ],
            )
            .await?;

        let matches: Vec<Artist> = response
            .results
            .and_then(|r| r.artistmatches)
            .map(|m| m.artist.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(artist, result_count = matches.len(), "Artist search complete");

        Ok(matches)
    }

    /// Get shouts for an artist, in the order the service returns them
    #[instrument(skip(self))]
    pub async fn get_artist_shouts(
        &self,
        artist: &str,
        options: &ShoutOptions,
    ) -> LastfmResult<Vec<Shout>> {
        let artist = Self::validate_name(artist, "artist name")?;

        #[derive(Deserialize)]
        struct ArtistShoutsResponse {
            #[serde(default)]
            shouts: Option<ShoutsSection>,
        }

        let response: ArtistShoutsResponse = self
            .call(
                "artist.getShouts",
                &[
                    ("artist", Some(artist.to_string())),
                    ("mbid", options.mbid.clone()),
                    ("limit", num_param(options.limit)),
                    ("page", num_param(options.page)),
                    ("autocorrect", Some(flag_param(options.autocorrect))),
                ],
            )
            .await?;

        let shouts = shouts_in_order(response.shouts);
        debug!(artist, shout_count = shouts.len(), "Fetched artist shouts");
        Ok(shouts)
    }
}
