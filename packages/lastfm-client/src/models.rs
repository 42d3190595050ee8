//! Shared response models and wire-format plumbing
//!
//! Public types here are plain value objects, fully populated from a single
//! response fragment and never mutated afterwards. The private `Raw*` types
//! mirror the wire shapes and convert via `From`.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Last.fm API error response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: i32,
    pub message: String,
}

/// Numeric wire value
///
/// Last.fm encodes numbers inconsistently, sometimes as JSON numbers and
/// sometimes as strings. Accept both and decode on demand.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Numeric {
    Int(u64),
    Float(f64),
    Text(String),
}

impl Numeric {
    pub(crate) fn as_u64(&self, field: &'static str) -> u64 {
        match self {
            Numeric::Int(n) => *n,
            Numeric::Float(f) => *f as u64,
            Numeric::Text(s) => s.trim().parse().unwrap_or_else(|e| {
                warn!(field, raw = %s, error = %e, "Failed to parse numeric field, defaulting to 0");
                0
            }),
        }
    }

    pub(crate) fn as_f64(&self, field: &'static str) -> f64 {
        match self {
            Numeric::Int(n) => *n as f64,
            Numeric::Float(f) => *f,
            Numeric::Text(s) => s.trim().parse().unwrap_or_else(|e| {
                warn!(field, raw = %s, error = %e, "Failed to parse numeric field, defaulting to 0");
                0.0
            }),
        }
    }
}

/// Normalize an optional string field, treating the empty string as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Build a keyed map from a sequence; later duplicates overwrite earlier ones
pub(crate) fn index_by<K, T, F>(items: Vec<T>, key: F) -> HashMap<K, T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.insert(key(&item), item);
    }
    map
}

/// An image in one of the service's fixed size slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Image URL
    pub url: String,
    /// Size label (small, medium, large, extralarge, mega)
    pub size: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawImage {
    #[serde(rename = "#text", default)]
    pub url: String,
    #[serde(default)]
    pub size: String,
}

impl From<RawImage> for Image {
    fn from(raw: RawImage) -> Self {
        Self {
            url: raw.url,
            size: raw.size,
        }
    }
}

/// Convert raw images, dropping empty placeholder slots
pub(crate) fn images(raw: Vec<RawImage>) -> Vec<Image> {
    raw.into_iter()
        .filter(|i| !i.url.is_empty())
        .map(Into::into)
        .collect()
}

/// A tag (genre/descriptor) applied to an album, artist or track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "rock", "electronic")
    pub name: String,
    /// Usage count/weight, where the endpoint reports one
    pub count: Option<u64>,
    /// URL to the Last.fm tag page
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTag {
    pub name: String,
    #[serde(default)]
    pub count: Option<Numeric>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<RawTag> for Tag {
    fn from(raw: RawTag) -> Self {
        Self {
            name: raw.name,
            count: raw.count.map(|c| c.as_u64("tag.count")),
            url: non_empty(raw.url),
        }
    }
}

/// Shared `{"tag": [...]}` wrapper used by every tag endpoint
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TagsSection {
    #[serde(default)]
    pub tag: Vec<RawTag>,
}

/// Collect a tags section into the name-keyed mapping; duplicates overwrite
pub(crate) fn tags_by_name(section: Option<TagsSection>) -> HashMap<String, Tag> {
    let tags: Vec<Tag> = section
        .map(|s| s.tag.into_iter().map(Into::into).collect())
        .unwrap_or_default();
    index_by(tags, |tag: &Tag| tag.name.clone())
}

/// A user comment on an album, artist or track page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shout {
    /// Name of the user who posted the shout
    pub author: String,
    /// Comment text
    pub body: String,
    /// Post date as reported by the service
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawShout {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl From<RawShout> for Shout {
    fn from(raw: RawShout) -> Self {
        Self {
            author: raw.author,
            body: raw.body,
            date: non_empty(raw.date),
        }
    }
}

/// Shared `{"shout": [...]}` wrapper
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShoutsSection {
    #[serde(default)]
    pub shout: Vec<RawShout>,
}

/// Collect a shouts section into an ordered sequence
pub(crate) fn shouts_in_order(section: Option<ShoutsSection>) -> Vec<Shout> {
    section
        .map(|s| s.shout.into_iter().map(Into::into).collect())
        .unwrap_or_default()
}

/// Price attached to a purchase affiliation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
    /// Human-readable rendering, e.g. "£7.99"
    pub formatted: Option<String>,
}

/// A purchase/download link for an album or track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Affiliation {
    /// Supplier name, e.g. "Amazon MP3"
    pub supplier_name: String,
    /// Link to the supplier's product page
    pub buy_link: Option<String>,
    /// Price, where the supplier reports one
    pub price: Option<Price>,
    /// Supplier icon URL
    pub supplier_icon: Option<String>,
    /// Whether the link is a search page rather than a direct product page
    pub is_search: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPrice {
    #[serde(default)]
    pub amount: Option<Numeric>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAffiliation {
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub buy_link: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub supplier_icon: Option<String>,
    #[serde(default)]
    pub is_search: Option<Numeric>,
}

impl From<RawAffiliation> for Affiliation {
    fn from(raw: RawAffiliation) -> Self {
        Self {
            supplier_name: raw.supplier_name,
            buy_link: non_empty(raw.buy_link),
            price: raw.price.map(|p| Price {
                amount: p
                    .amount
                    .map(|a| a.as_f64("affiliation.price.amount"))
                    .unwrap_or(0.0),
                currency: p.currency,
                formatted: non_empty(p.formatted),
            }),
            supplier_icon: non_empty(raw.supplier_icon),
            is_search: raw
                .is_search
                .map(|v| v.as_u64("affiliation.isSearch") != 0)
                .unwrap_or(false),
        }
    }
}

/// Bucket a buy-link affiliation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffiliationKind {
    /// Physical media purchases
    Physicals,
    /// Digital download purchases
    Downloads,
}

impl AffiliationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliationKind::Physicals => "physicals",
            AffiliationKind::Downloads => "downloads",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AffiliationList {
    #[serde(default)]
    pub affiliation: Vec<RawAffiliation>,
}

/// The `{"affiliations": {"physicals": ..., "downloads": ...}}` section
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AffiliationsSection {
    #[serde(default)]
    pub physicals: Option<AffiliationList>,
    #[serde(default)]
    pub downloads: Option<AffiliationList>,
}

/// Group affiliations into named buckets; a bucket is present only if the
/// response contained at least one entry for it
pub(crate) fn group_affiliations(
    section: Option<AffiliationsSection>,
) -> HashMap<AffiliationKind, Vec<Affiliation>> {
    let mut buckets = HashMap::new();
    let section = match section {
        Some(section) => section,
        None => return buckets,
    };

    let lists = [
        (AffiliationKind::Physicals, section.physicals),
        (AffiliationKind::Downloads, section.downloads),
    ];
    for (kind, list) in lists {
        let affiliations: Vec<Affiliation> = list
            .map(|l| l.affiliation.into_iter().map(Into::into).collect())
            .unwrap_or_default();
        if !affiliations.is_empty() {
            buckets.insert(kind, affiliations);
        }
    }
    buckets
}

/// Wiki/biography fragment attached to albums, artists and tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wiki {
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Name reference (artist or album) as it appears inside other payloads
///
/// Depending on the endpoint this is a bare name string, a nested object
/// with a `name` field, or an XML-style `#text` node.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawNameRef {
    Name(String),
    Detailed { name: String },
    Tagged {
        #[serde(rename = "#text")]
        text: String,
    },
}

impl RawNameRef {
    pub(crate) fn into_name(self) -> String {
        match self {
            RawNameRef::Name(name) => name,
            RawNameRef::Detailed { name } => name,
            RawNameRef::Tagged { text } => text,
        }
    }
}

/// Options for tag lookups (`*.getTags` / `*.getTopTags`)
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// MusicBrainz id of the target, as an alternative to name-based lookup
    pub mbid: Option<String>,
    /// Transform misspelled names into corrected ones
    pub autocorrect: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            mbid: None,
            autocorrect: true,
        }
    }
}

/// Options for similarity lookups (`*.getSimilar`)
#[derive(Debug, Clone)]
pub struct SimilarOptions {
    pub mbid: Option<String>,
    pub autocorrect: bool,
    /// Maximum number of results to return
    pub limit: Option<u32>,
}

impl Default for SimilarOptions {
    fn default() -> Self {
        Self {
            mbid: None,
            autocorrect: true,
            limit: None,
        }
    }
}

/// Options for shout listings (`*.getShouts`)
#[derive(Debug, Clone)]
pub struct ShoutOptions {
    pub mbid: Option<String>,
    pub autocorrect: bool,
    /// Results per page; the service defaults to 30
    pub limit: Option<u32>,
    /// Page number; the service defaults to the first page
    pub page: Option<u32>,
}

impl Default for ShoutOptions {
    fn default() -> Self {
        Self {
            mbid: None,
            autocorrect: true,
            limit: None,
            page: None,
        }
    }
}

/// Options for ranked listings (`artist.getTopAlbums` / `artist.getTopTracks`)
#[derive(Debug, Clone)]
pub struct TopOptions {
    pub mbid: Option<String>,
    pub autocorrect: bool,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl Default for TopOptions {
    fn default() -> Self {
        Self {
            mbid: None,
            autocorrect: true,
            limit: None,
            page: None,
        }
    }
}

/// Pagination for searches and other plainly paged listings
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Results per page; the service defaults to 30
    pub limit: Option<u32>,
    /// Page number; the service defaults to the first page
    pub page: Option<u32>,
}

/// Options for buy-link lookups (`*.getBuylinks`)
#[derive(Debug, Clone)]
pub struct BuylinkOptions {
    pub mbid: Option<String>,
    pub autocorrect: bool,
    /// ISO 3166-1 country name the affiliations should be valid in
    pub country: Option<String>,
}

impl Default for BuylinkOptions {
    fn default() -> Self {
        Self {
            mbid: None,
            autocorrect: true,
            country: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_accepts_numbers_and_strings() {
        let n: Numeric = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(n.as_u64("n"), 42);

        let n: Numeric = serde_json::from_value(json!("1337")).unwrap();
        assert_eq!(n.as_u64("n"), 1337);

        let n: Numeric = serde_json::from_value(json!("0.75")).unwrap();
        assert!((n.as_f64("n") - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_numeric_garbage_defaults_to_zero() {
        let n: Numeric = serde_json::from_value(json!("not a number")).unwrap();
        assert_eq!(n.as_u64("n"), 0);
        assert_eq!(n.as_f64("n"), 0.0);
    }

    #[test]
    fn test_non_empty_filters_empty_strings() {
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_index_by_last_one_wins() {
        let tags = vec![
            Tag {
                name: "rock".to_string(),
                count: Some(1),
                url: None,
            },
            Tag {
                name: "rock".to_string(),
                count: Some(2),
                url: None,
            },
        ];
        let map = index_by(tags, |t: &Tag| t.name.clone());
        assert_eq!(map.len(), 1);
        assert_eq!(map["rock"].count, Some(2));
    }

    #[test]
    fn test_tags_by_name_absent_section_is_empty() {
        assert!(tags_by_name(None).is_empty());
    }

    #[test]
    fn test_tags_by_name_duplicates_overwrite() {
        let section: TagsSection = serde_json::from_value(json!({
            "tag": [
                {"name": "shoegaze", "count": "10"},
                {"name": "shoegaze", "count": "90"}
            ]
        }))
        .unwrap();
        let map = tags_by_name(Some(section));
        assert_eq!(map.len(), 1);
        assert_eq!(map["shoegaze"].count, Some(90));
    }

    #[test]
    fn test_shouts_preserve_order() {
        let section: ShoutsSection = serde_json::from_value(json!({
            "shout": [
                {"author": "a", "body": "first"},
                {"author": "b", "body": "second"},
                {"author": "c", "body": "third"}
            ]
        }))
        .unwrap();
        let shouts = shouts_in_order(Some(section));
        assert_eq!(shouts.len(), 3);
        assert_eq!(shouts[0].body, "first");
        assert_eq!(shouts[2].body, "third");
    }

    #[test]
    fn test_group_affiliations_absent_section() {
        assert!(group_affiliations(None).is_empty());
    }

    #[test]
    fn test_group_affiliations_skips_empty_buckets() {
        let section: AffiliationsSection = serde_json::from_value(json!({
            "downloads": {
                "affiliation": [
                    {"supplierName": "Amazon MP3", "buyLink": "https://example.com/buy"}
                ]
            }
        }))
        .unwrap();
        let buckets = group_affiliations(Some(section));
        assert_eq!(buckets.len(), 1);
        assert!(buckets.contains_key(&AffiliationKind::Downloads));
        assert!(!buckets.contains_key(&AffiliationKind::Physicals));
        assert_eq!(buckets[&AffiliationKind::Downloads][0].supplier_name, "Amazon MP3");
    }

    #[test]
    fn test_affiliation_conversion() {
        let raw: RawAffiliation = serde_json::from_value(json!({
            "supplierName": "iTunes",
            "buyLink": "https://example.com/itunes",
            "price": {"amount": "7.99", "currency": "GBP", "formatted": "£7.99"},
            "isSearch": "0"
        }))
        .unwrap();
        let affiliation: Affiliation = raw.into();
        assert_eq!(affiliation.supplier_name, "iTunes");
        assert!(!affiliation.is_search);
        let price = affiliation.price.unwrap();
        assert!((price.amount - 7.99).abs() < f64::EPSILON);
        assert_eq!(price.currency, "GBP");
    }

    #[test]
    fn test_affiliation_kind_as_str() {
        assert_eq!(AffiliationKind::Physicals.as_str(), "physicals");
        assert_eq!(AffiliationKind::Downloads.as_str(), "downloads");
    }

    #[test]
    fn test_images_drop_empty_slots() {
        let raw = vec![
            RawImage {
                url: "https://example.com/cover.png".to_string(),
                size: "large".to_string(),
            },
            RawImage {
                url: String::new(),
                size: "mega".to_string(),
            },
        ];
        let converted = images(raw);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].size, "large");
    }

    #[test]
    fn test_artist_ref_variants() {
        let bare: RawNameRef = serde_json::from_value(json!("Slowdive")).unwrap();
        assert_eq!(bare.into_name(), "Slowdive");

        let detailed: RawNameRef =
            serde_json::from_value(json!({"name": "Slowdive", "mbid": "x", "url": "y"})).unwrap();
        assert_eq!(detailed.into_name(), "Slowdive");

        let tagged: RawNameRef =
            serde_json::from_value(json!({"#text": "Slowdive", "mbid": ""})).unwrap();
        assert_eq!(tagged.into_name(), "Slowdive");
    }

    #[test]
    fn test_options_default_to_sending_autocorrect() {
        assert!(TagOptions::default().autocorrect);
        assert!(SimilarOptions::default().autocorrect);
        assert!(ShoutOptions::default().autocorrect);
        assert!(TopOptions::default().autocorrect);
        assert!(BuylinkOptions::default().autocorrect);
    }
}
