//! Typed client for the Last.fm web service API
//!
//! One async method per remote operation, grouped by resource (album,
//! artist, track, user). Each method assembles the operation's parameter
//! set, dispatches through the shared transport, and maps the response
//! tree into plain value objects. Missing or empty response sections
//! yield empty results rather than errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use lastfm_client::{AlbumInfoOptions, LastfmClient, PageOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LastfmClient::new("your_api_key")?;
//!
//! // Album metadata, including the tracklist
//! let options = AlbumInfoOptions::default();
//! if let Some(album) = client.get_album_info("Slowdive", "Souvlaki", &options).await? {
//!     println!("{} by {} ({} tracks)", album.name, album.artist, album.tracks.len());
//! }
//!
//! // Search results come back keyed by album id
//! let matches = client.search_albums("Souvlaki", &PageOptions::default()).await?;
//! for (id, album) in &matches {
//!     println!("{id}: {}", album.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `LASTFM_API_KEY`: API key for Last.fm (used by [`LastfmClient::from_env`])

mod album;
mod artist;
mod client;
mod error;
mod models;
mod track;
mod user;

pub use album::{Album, AlbumInfoOptions, AlbumTrack};
pub use artist::{Artist, ArtistInfoOptions, SimilarArtist};
pub use client::{ApiKeyStatus, LastfmClient};
pub use error::{LastfmError, LastfmResult};
pub use models::{
    Affiliation, AffiliationKind, BuylinkOptions, Image, PageOptions, Price, Shout, ShoutOptions,
    SimilarOptions, Tag, TagOptions, TopOptions, Wiki,
};
pub use track::{SimilarTrack, Track, TrackInfoOptions, TrackSearchOptions};
pub use user::{Period, RecentTrack, TopPeriodOptions, User};
