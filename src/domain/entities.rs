//! Domain entities. Pure data structures for the core business.
//!
//! All of these are request-scoped value objects: built per user action and
//! dropped when the next action starts. Wire names are camelCase.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Event details scraped from a page. Every field is optional because source
/// pages vary wildly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    /// The title of the event.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A detailed description of the event.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The date of the event in YYYY-MM-DD format.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// The start time of the event, HH:MM if possible.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// The physical address or virtual location of the event.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// A direct URL to a featured image. Prefer Open Graph (og:image) tags.
    #[serde(default, deserialize_with = "absolute_url", skip_serializing_if = "Option::is_none")]
    #[schemars(url)]
    pub image_url: Option<String>,

    /// A direct link for event registration, if available.
    #[serde(default, deserialize_with = "absolute_url", skip_serializing_if = "Option::is_none")]
    #[schemars(url)]
    pub registration_url: Option<String>,
}

impl EventDetails {
    /// Event date as a calendar date, when the model returned `YYYY-MM-DD`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }
}

/// Models love to answer `""` for "leave it empty". Treat that as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Like [`empty_as_none`], but the value must parse as an absolute URL. The
/// string is kept as written.
fn absolute_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_as_none(deserializer)? {
        Some(raw) => {
            let raw = raw.trim().to_string();
            Url::parse(&raw).map_err(serde::de::Error::custom)?;
            Ok(Some(raw))
        }
        None => Ok(None),
    }
}

/// Input for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractEventDetailsRequest {
    /// The URL of the event page.
    pub url: String,
}

impl ExtractEventDetailsRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    #[default]
    Casual,
    Inspirational,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Professional, Tone::Casual, Tone::Inspirational];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Inspirational => "inspirational",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported social platforms. The lowercase id doubles as the key in a
/// generated [`SocialPostSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    X,
    Instagram,
    Facebook,
    Threads,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Linkedin,
        Platform::X,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Threads,
    ];

    /// Wire identifier, e.g. `linkedin`.
    pub fn id(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::X => "x",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Threads => "threads",
        }
    }

    /// Human label for previews.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::X => "X (Twitter)",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Threads => "Threads",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Input for promotional post generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialPostRequest {
    pub title: String,
    pub description: String,
    /// The date of the event (e.g. YYYY-MM-DD).
    pub date: String,
    /// The time of the event (e.g. HH:MM AM/PM).
    pub time: String,
    pub target_audience: String,
    pub tone: Tone,
    pub platforms: Vec<Platform>,
    /// Relevant hashtags, comma separated.
    #[serde(default)]
    pub hashtags: String,
}

/// Generated posts keyed by platform id. Keys come from the model, so they
/// may not match the requested platforms exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SocialPostSet(pub BTreeMap<String, String>);

impl SocialPostSet {
    pub fn get(&self, platform: Platform) -> Option<&str> {
        self.0.get(platform.id()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Requested platforms the model did not answer for.
    pub fn missing_platforms(&self, requested: &[Platform]) -> Vec<Platform> {
        requested
            .iter()
            .copied()
            .filter(|p| !self.0.contains_key(p.id()))
            .collect()
    }

    /// Keys the model produced that were not requested.
    pub fn unexpected_keys(&self, requested: &[Platform]) -> Vec<String> {
        self.0
            .keys()
            .filter(|k| !requested.iter().any(|p| p.id() == k.as_str()))
            .cloned()
            .collect()
    }
}

/// Input for recap post generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecapRequest {
    /// What happened at the event, free text.
    pub event_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecapResult {
    /// The generated event recap post.
    pub recap_post: String,
}

/// Input for hashtag suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HashtagRequest {
    pub event_title: String,
    pub event_description: String,
    pub target_audience: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HashtagSuggestions {
    /// Relevant and trending hashtags.
    pub hashtags: Vec<String>,
}

impl HashtagSuggestions {
    /// Comma-separated form used by [`SocialPostRequest::hashtags`].
    pub fn joined(&self) -> String {
        self.hashtags.join(", ")
    }
}

/// Returned by the fetcher in place of page text when a page cannot be read.
pub const FETCH_FAILED_SENTINEL: &str =
    "Error: Could not retrieve content from the URL. It might be invalid, down, or blocked.";

/// Cap on the text handed to the model for one page, metadata included.
pub const MAX_CONTENT_CHARS: usize = 15_000;

/// Cap on a single metadata value, e.g. a long `og:description`.
pub const MAX_META_VALUE_CHARS: usize = 300;

/// Cleaned page content handed to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageContent {
    /// Visible body text, whitespace-collapsed and capped. Holds
    /// [`FETCH_FAILED_SENTINEL`] when the fetch failed.
    pub text: String,
    /// `(name, value)` pairs from `<head>`, e.g. `("og:image", "https://...")`.
    pub metadata: Vec<(String, String)>,
}

impl PageContent {
    pub fn unavailable() -> Self {
        Self {
            text: FETCH_FAILED_SENTINEL.to_string(),
            metadata: Vec::new(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.text == FETCH_FAILED_SENTINEL
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Text form given to the model: metadata lines first, then the body.
    /// Never longer than [`MAX_CONTENT_CHARS`] chars; the metadata block
    /// comes out of the body's budget.
    pub fn to_prompt_text(&self) -> String {
        if self.metadata.is_empty() {
            return truncate_chars(&self.text, MAX_CONTENT_CHARS);
        }
        let mut header = String::from("Page metadata:\n");
        for (name, value) in &self.metadata {
            header.push_str(&format!(
                "{name}: {}\n",
                truncate_chars(value, MAX_META_VALUE_CHARS)
            ));
        }
        header.push_str("\nPage text:\n");

        let mut out = truncate_chars(&header, MAX_CONTENT_CHARS);
        let budget = MAX_CONTENT_CHARS.saturating_sub(out.chars().count());
        out.push_str(&truncate_chars(&self.text, budget));
        out
    }
}

/// First `max` chars of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
