//! Input rules checked before a request reaches the model.

use crate::domain::entities::{
    ExtractEventDetailsRequest, HashtagRequest, RecapRequest, SocialPostRequest,
};
use crate::domain::DomainError;
use url::Url;

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const MIN_AUDIENCE_CHARS: usize = 3;

/// Implemented by every request type a prompt accepts.
pub trait Validate {
    fn validate(&self) -> Result<(), DomainError>;
}

fn min_chars(field: &str, value: &str, min: usize, message: &str) -> Result<(), DomainError> {
    if value.chars().count() < min {
        return Err(DomainError::validation(field, message));
    }
    Ok(())
}

fn required(field: &str, value: &str, message: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, message));
    }
    Ok(())
}

/// Parse a user supplied page URL. Only absolute http(s) URLs are fetchable.
pub fn parse_page_url(raw: &str) -> Result<Url, DomainError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DomainError::validation("url", &format!("Invalid URL ({e}).")))?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => Err(DomainError::validation(
            "url",
            "Only http and https URLs can be fetched.",
        )),
    }
}

impl Validate for ExtractEventDetailsRequest {
    fn validate(&self) -> Result<(), DomainError> {
        parse_page_url(&self.url).map(|_| ())
    }
}

impl Validate for SocialPostRequest {
    fn validate(&self) -> Result<(), DomainError> {
        min_chars(
            "title",
            &self.title,
            MIN_TITLE_CHARS,
            "Title must be at least 5 characters.",
        )?;
        required("date", &self.date, "Date is required.")?;
        required("time", &self.time, "Time is required.")?;
        min_chars(
            "description",
            &self.description,
            MIN_DESCRIPTION_CHARS,
            "Description must be at least 20 characters.",
        )?;
        min_chars(
            "targetAudience",
            &self.target_audience,
            MIN_AUDIENCE_CHARS,
            "Target audience is required.",
        )?;
        if self.platforms.is_empty() {
            return Err(DomainError::validation(
                "platforms",
                "You have to select at least one platform.",
            ));
        }
        Ok(())
    }
}

impl SocialPostRequest {
    /// Drops repeated platforms, keeping first-seen order.
    pub fn with_unique_platforms(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.platforms.len());
        self.platforms.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(*p);
                true
            }
        });
        self
    }
}

impl Validate for RecapRequest {
    fn validate(&self) -> Result<(), DomainError> {
        min_chars(
            "eventDescription",
            &self.event_description,
            MIN_DESCRIPTION_CHARS,
            "Description must be at least 20 characters.",
        )
    }
}

impl Validate for HashtagRequest {
    fn validate(&self) -> Result<(), DomainError> {
        required("eventTitle", &self.event_title, "Title is required.")?;
        required(
            "eventDescription",
            &self.event_description,
            "Description is required.",
        )?;
        required(
            "targetAudience",
            &self.target_audience,
            "Target audience is required.",
        )
    }
}
