//! Integration tests for the artist method catalog

use assert_matches::assert_matches;
use serde_json::json;

use lastfm_client::{
    ApiKeyStatus, ArtistInfoOptions, LastfmClient, LastfmError, PageOptions, ShoutOptions,
    SimilarOptions, TagOptions, TopOptions,
};
use lastfm_test_utils::{
    shouts_body, top_tags_body, AlbumFixture, MockLastfmServer, ShoutFixture, TagFixture,
};

fn client_for(server: &MockLastfmServer) -> LastfmClient {
    LastfmClient::new(server.api_key())
        .unwrap()
        .with_base_url(server.url())
        .with_retry_config(0, 0)
}

fn query_pairs(request: &wiremock::Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn has_pair(pairs: &[(String, String)], key: &str, value: &str) -> bool {
    pairs.iter().any(|(k, v)| k == key && v == value)
}

fn has_key(pairs: &[(String, String)], key: &str) -> bool {
    pairs.iter().any(|(k, _)| k == key)
}

#[tokio::test]
async fn test_get_similar_artists_parses_and_orders() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success(
            "artist.getSimilar",
            json!({
                "similarartists": {
                    "artist": [
                        {"name": "Ride", "mbid": "abc", "match": "1.0", "url": "https://last.fm/music/Ride"},
                        {"name": "Chapterhouse", "mbid": "", "match": "0.82"}
                    ]
                }
            }),
        )
        .await;

    let client = client_for(&server);
    let similar = client
        .get_similar_artists("Slowdive", &SimilarOptions::default())
        .await
        .unwrap();

    assert_eq!(similar.len(), 2);
    assert_eq!(similar[0].name, "Ride");
    assert!((similar[0].match_score - 1.0).abs() < f64::EPSILON);
    assert_eq!(similar[1].name, "Chapterhouse");
    assert!(similar[1].mbid.is_none());
}

#[tokio::test]
async fn test_get_similar_artists_sends_limit_when_supplied() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success("artist.getSimilar", json!({}))
        .await;

    let client = client_for(&server);
    let options = SimilarOptions {
        limit: Some(5),
        ..SimilarOptions::default()
    };
    client.get_similar_artists("Slowdive", &options).await.unwrap();

    let requests = server.received_requests().await;
    let pairs = query_pairs(&requests[0]);
    assert!(has_pair(&pairs, "method", "artist.getSimilar"));
    assert!(has_pair(&pairs, "limit", "5"));
    assert!(has_pair(&pairs, "autocorrect", "1"));
    assert!(!has_key(&pairs, "mbid"));
}

#[tokio::test]
async fn test_get_similar_artists_absent_section_is_empty() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success("artist.getSimilar", json!({}))
        .await;

    let client = client_for(&server);
    let similar = client
        .get_similar_artists("Slowdive", &SimilarOptions::default())
        .await
        .unwrap();

    assert!(similar.is_empty());
}

#[tokio::test]
async fn test_get_artist_info_reads_nested_stats() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success(
            "artist.getInfo",
            json!({
                "artist": {
                    "name": "Slowdive",
                    "mbid": "72c536dc-7137-4477-a521-567eeb840fa8",
                    "url": "https://www.last.fm/music/Slowdive",
                    "stats": {"listeners": "325401", "playcount": "9735271"},
                    "tags": {"tag": [{"name": "shoegaze"}, {"name": "dream pop"}]},
                    "bio": {"summary": "English rock band formed in Reading in 1989."}
                }
            }),
        )
        .await;

    let client = client_for(&server);
    let artist = client
        .get_artist_info("Slowdive", &ArtistInfoOptions::default())
        .await
        .unwrap()
        .expect("artist section present");

    assert_eq!(artist.name, "Slowdive");
    assert_eq!(artist.listeners, Some(325401));
    assert_eq!(artist.playcount, Some(9735271));
    assert_eq!(artist.tags.len(), 2);
    assert!(artist.bio.unwrap().summary.unwrap().contains("Reading"));
}

#[tokio::test]
async fn test_get_artist_info_absent_section_is_none() {
    let server = MockLastfmServer::start().await;
    server.mock_method_success("artist.getInfo", json!({})).await;

    let client = client_for(&server);
    let artist = client
        .get_artist_info("Slowdive", &ArtistInfoOptions::default())
        .await
        .unwrap();

    assert!(artist.is_none());
}

#[tokio::test]
async fn test_get_artist_top_tags_keyed_by_name() {
    let server = MockLastfmServer::start().await;
    let tags = vec![TagFixture::new("shoegaze", 100), TagFixture::new("dream pop", 60)];
    server
        .mock_method_success("artist.getTopTags", top_tags_body(&tags))
        .await;

    let client = client_for(&server);
    let tags = client
        .get_artist_top_tags("Slowdive", &TagOptions::default())
        .await
        .unwrap();

    assert_eq!(tags.len(), 2);
    assert_eq!(tags["shoegaze"].count, Some(100));
    assert_eq!(tags["dream pop"].count, Some(60));
}

#[tokio::test]
async fn test_get_artist_top_albums_in_ranked_order() {
    let server = MockLastfmServer::start().await;
    let albums = vec![
        AlbumFixture::new(1, "Souvlaki", "Slowdive"),
        AlbumFixture::new(2, "Just for a Day", "Slowdive"),
    ];
    let albums_json: Vec<serde_json::Value> = albums.iter().map(|a| a.to_json()).collect();
    server
        .mock_method_success(
            "artist.getTopAlbums",
            json!({"topalbums": {"album": albums_json}}),
        )
        .await;

    let client = client_for(&server);
    let top = client
        .get_artist_top_albums("Slowdive", &TopOptions::default())
        .await
        .unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Souvlaki");
    assert_eq!(top[1].name, "Just for a Day");
}

#[tokio::test]
async fn test_get_artist_top_tracks_parses() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success(
            "artist.getTopTracks",
            json!({
                "toptracks": {
                    "track": [
                        {"name": "Alison", "artist": {"name": "Slowdive"}, "playcount": "500000"},
                        {"name": "When the Sun Hits", "artist": {"name": "Slowdive"}, "playcount": "450000"}
                    ]
                }
            }),
        )
        .await;

    let client = client_for(&server);
    let top = client
        .get_artist_top_tracks("Slowdive", &TopOptions::default())
        .await
        .unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Alison");
    assert_eq!(top[0].artist, "Slowdive");
    assert_eq!(top[0].playcount, Some(500000));
}

#[tokio::test]
async fn test_search_artists_in_relevance_order() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success(
            "artist.search",
            json!({
                "results": {
                    "artistmatches": {
                        "artist": [
                            {"name": "Slowdive", "listeners": "325401", "mbid": "abc"},
                            {"name": "Slow Pulp", "listeners": "120000", "mbid": ""}
                        ]
                    }
                }
            }),
        )
        .await;

    let client = client_for(&server);
    let matches = client
        .search_artists("slow", &PageOptions::default())
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].name, "Slowdive");
    assert_eq!(matches[0].listeners, Some(325401));
    assert!(matches[1].mbid.is_none());
}

#[tokio::test]
async fn test_get_artist_shouts_preserves_order() {
    let server = MockLastfmServer::start().await;
    let shouts = vec![ShoutFixture::new("a", "first"), ShoutFixture::new("b", "second")];
    server
        .mock_method_success("artist.getShouts", shouts_body(&shouts))
        .await;

    let client = client_for(&server);
    let shouts = client
        .get_artist_shouts("Slowdive", &ShoutOptions::default())
        .await
        .unwrap();

    assert_eq!(shouts.len(), 2);
    assert_eq!(shouts[0].author, "a");
    assert_eq!(shouts[1].author, "b");
}

#[tokio::test]
async fn test_get_artist_tags_requires_user() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success("artist.getTags", json!({"tags": {}}))
        .await;

    let client = client_for(&server);
    let result = client
        .get_artist_tags("Slowdive", "", &TagOptions::default())
        .await;

    assert_matches!(result, Err(LastfmError::InvalidInput(_)));
}

#[tokio::test]
async fn test_validate_api_key_valid() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_success("artist.getSimilar", json!({"similarartists": {"artist": []}}))
        .await;

    let client = client_for(&server);
    assert_eq!(client.validate_api_key().await, ApiKeyStatus::Valid);
}

#[tokio::test]
async fn test_validate_api_key_invalid() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_error("artist.getSimilar", 10, "Invalid API key")
        .await;

    let client = client_for(&server);
    assert_eq!(client.validate_api_key().await, ApiKeyStatus::Invalid);
}
