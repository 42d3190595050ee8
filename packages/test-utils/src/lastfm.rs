//! Mock Last.fm server for testing the client without network access
//!
//! Provides a [`MockLastfmServer`] that simulates the single Last.fm REST
//! endpoint, routing on the `method` query parameter, plus fixtures for
//! building the per-method response envelopes.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Mock Last.fm server
///
/// Wraps a [`wiremock::MockServer`] and provides convenience methods for
/// mounting per-method success bodies, service error envelopes and rate
/// limiting. All mounts additionally match the configured API key and the
/// JSON format flag, so a client that fails to send either will not match.
///
/// # Example
///
/// ```rust,ignore
/// let server = MockLastfmServer::start().await;
/// server
///     .mock_method_success("album.getShouts", shouts_body(&[ShoutFixture::new("rj", "great")]))
///     .await;
/// ```
pub struct MockLastfmServer {
    server: MockServer,
    api_key: String,
}

impl MockLastfmServer {
    /// Start a new mock server with the default API key
    pub async fn start() -> Self {
        Self::start_with_api_key("test-api-key").await
    }

    /// Start a new mock server with a custom API key
    pub async fn start_with_api_key(api_key: &str) -> Self {
        let server = MockServer::start().await;
        Self {
            server,
            api_key: api_key.to_string(),
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Mount a success body for one remote method
    pub async fn mock_method_success(&self, api_method: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("method", api_method))
            .and(query_param("api_key", self.api_key.as_str()))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a Last.fm error envelope for one remote method
    ///
    /// The service reports its errors in the body of an HTTP 200 response.
    pub async fn mock_method_error(&self, api_method: &str, code: i32, message: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("method", api_method))
            .and(query_param("api_key", self.api_key.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": code,
                "message": message
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a rate-limiting response for one remote method
    pub async fn mock_rate_limited(&self, api_method: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("method", api_method))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("Retry-After", "60")
                    .set_body_json(json!({
                        "error": 29,
                        "message": "Rate limit exceeded"
                    })),
            )
            .mount(&self.server)
            .await;
    }

    /// Requests the server has received so far
    ///
    /// Useful for asserting which query parameters a client actually sent.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

/// Fixture for album payloads
#[derive(Debug, Clone)]
pub struct AlbumFixture {
    pub id: u64,
    pub name: String,
    pub artist: String,
    pub mbid: Option<String>,
    pub url: Option<String>,
    pub listeners: u64,
    pub playcount: u64,
}

impl AlbumFixture {
    /// Create an album fixture with generated mbid and URL
    pub fn new(id: u64, name: &str, artist: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            artist: artist.to_string(),
            mbid: Some(uuid::Uuid::new_v4().to_string()),
            url: Some(format!(
                "https://www.last.fm/music/{}/{}",
                artist.replace(' ', "+"),
                name.replace(' ', "+")
            )),
            listeners: 1000,
            playcount: 5000,
        }
    }

    /// Convert to the JSON shape shared by info payloads and search matches
    ///
    /// Numbers are rendered as strings, matching the service's encoding.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "artist": self.artist,
            "mbid": self.mbid,
            "url": self.url,
            "listeners": self.listeners.to_string(),
            "playcount": self.playcount.to_string(),
            "image": [
                {"#text": "https://example.com/cover-small.png", "size": "small"},
                {"#text": "https://example.com/cover-large.png", "size": "large"}
            ]
        })
    }
}

/// Fixture for tag payloads
#[derive(Debug, Clone)]
pub struct TagFixture {
    pub name: String,
    pub count: u64,
}

impl TagFixture {
    pub fn new(name: &str, count: u64) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "count": self.count.to_string(),
            "url": format!("https://www.last.fm/tag/{}", self.name.replace(' ', "+"))
        })
    }
}

/// Fixture for shout payloads
#[derive(Debug, Clone)]
pub struct ShoutFixture {
    pub author: String,
    pub body: String,
    pub date: String,
}

impl ShoutFixture {
    pub fn new(author: &str, body: &str) -> Self {
        Self {
            author: author.to_string(),
            body: body.to_string(),
            date: "Tue, 3 Jun 2025 18:04:00".to_string(),
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        json!({
            "author": self.author,
            "body": self.body,
            "date": self.date
        })
    }
}

/// Fixture for buy-link affiliation payloads
#[derive(Debug, Clone)]
pub struct AffiliationFixture {
    pub supplier_name: String,
    pub buy_link: String,
    pub price_amount: Option<f64>,
    pub price_currency: String,
    pub is_search: bool,
}

impl AffiliationFixture {
    pub fn new(supplier_name: &str) -> Self {
        Self {
            supplier_name: supplier_name.to_string(),
            buy_link: format!(
                "https://example.com/buy/{}",
                supplier_name.to_lowercase().replace(' ', "-")
            ),
            price_amount: None,
            price_currency: "GBP".to_string(),
            is_search: false,
        }
    }

    /// Attach a price to the affiliation
    pub fn with_price(mut self, amount: f64, currency: &str) -> Self {
        self.price_amount = Some(amount);
        self.price_currency = currency.to_string();
        self
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "supplierName": self.supplier_name,
            "buyLink": self.buy_link,
            "supplierIcon": "https://example.com/icon.png",
            "isSearch": if self.is_search { "1" } else { "0" }
        });
        if let Some(amount) = self.price_amount {
            value["price"] = json!({
                "amount": format!("{amount:.2}"),
                "currency": self.price_currency,
                "formatted": format!("{} {amount:.2}", self.price_currency)
            });
        }
        value
    }
}

/// Build an `album.getInfo` response envelope
pub fn album_info_body(album: &AlbumFixture) -> Value {
    json!({ "album": album.to_json() })
}

/// Build a `*.getTags` response envelope
pub fn tags_body(tags: &[TagFixture]) -> Value {
    let tags_json: Vec<Value> = tags.iter().map(|t| t.to_json()).collect();
    json!({ "tags": { "tag": tags_json } })
}

/// Build a `*.getTopTags` response envelope
pub fn top_tags_body(tags: &[TagFixture]) -> Value {
    let tags_json: Vec<Value> = tags.iter().map(|t| t.to_json()).collect();
    json!({ "toptags": { "tag": tags_json } })
}

/// Build an `album.search` response envelope
pub fn album_search_body(albums: &[AlbumFixture]) -> Value {
    let albums_json: Vec<Value> = albums.iter().map(|a| a.to_json()).collect();
    json!({ "results": { "albummatches": { "album": albums_json } } })
}

/// Build a `*.getShouts` response envelope
pub fn shouts_body(shouts: &[ShoutFixture]) -> Value {
    let shouts_json: Vec<Value> = shouts.iter().map(|s| s.to_json()).collect();
    json!({ "shouts": { "shout": shouts_json } })
}

/// Build a `*.getBuylinks` response envelope
///
/// A bucket key appears in the body only when it has at least one entry,
/// matching the service's behavior.
pub fn buylinks_body(physicals: &[AffiliationFixture], downloads: &[AffiliationFixture]) -> Value {
    let mut affiliations = serde_json::Map::new();
    if !physicals.is_empty() {
        let entries: Vec<Value> = physicals.iter().map(|a| a.to_json()).collect();
        affiliations.insert("physicals".to_string(), json!({ "affiliation": entries }));
    }
    if !downloads.is_empty() {
        let entries: Vec<Value> = downloads.iter().map(|a| a.to_json()).collect();
        affiliations.insert("downloads".to_string(), json!({ "affiliation": entries }));
    }
    json!({ "affiliations": Value::Object(affiliations) })
}
