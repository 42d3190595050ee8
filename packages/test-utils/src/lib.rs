//! Shared test utilities for the Last.fm client workspace
//!
//! This crate provides a mock Last.fm server and response fixtures for
//! testing the client without network dependencies.
//!
//! # Example
//!
//! ```rust,ignore
//! use lastfm_test_utils::{album_search_body, AlbumFixture, MockLastfmServer};
//!
//! #[tokio::test]
//! async fn test_search() {
//!     let server = MockLastfmServer::start().await;
//!     let albums = vec![AlbumFixture::new(1, "Souvlaki", "Slowdive")];
//!     server.mock_method_success("album.search", album_search_body(&albums)).await;
//!
//!     // Point your client at server.url() with server.api_key()
//! }
//! ```

mod lastfm;

pub use lastfm::{
    album_info_body, album_search_body, buylinks_body, shouts_body, tags_body, top_tags_body,
    AffiliationFixture, AlbumFixture, MockLastfmServer, ShoutFixture, TagFixture,
};
